//! Local JSON API over a deck.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
