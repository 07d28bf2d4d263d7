//! API request handlers.

mod datasets;
mod groups;
mod views;

pub use datasets::*;
pub use groups::*;
pub use views::*;
