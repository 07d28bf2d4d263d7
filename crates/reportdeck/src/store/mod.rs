//! Dataset storage and lifecycle.
//!
//! The [`DatasetStore`] is the single owner of every ingested dataset. Only
//! its lifecycle operations (ingest, tag, activate, remove) change a
//! dataset; views and groups only read.

mod dataset;
mod store;

pub use dataset::Dataset;
pub use store::{DatasetStore, IngestPolicy, IngestReport};
