//! Error types for the reportdeck library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for reportdeck operations.
#[derive(Debug, Error)]
pub enum DeckError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single file's content could not be split into a table.
    #[error("Error parsing {file}: {message}")]
    Parse { file: String, message: String },

    /// One or more files of a batch failed; nothing from the batch was kept
    /// unless the partial ingest policy was selected.
    #[error("Failed to ingest {} of {attempted} files: {}", .failures.len(), summarize(.failures))]
    BatchIngest {
        failures: Vec<DeckError>,
        attempted: usize,
    },

    /// A dataset with this id is already in the store.
    #[error("Duplicate dataset: {0}")]
    DuplicateDataset(String),

    /// Page size that is neither a positive integer nor "All".
    #[error("Invalid page size: {0}")]
    InvalidPageSize(String),

    /// Grouping mode other than none, date or tags.
    #[error("Unknown grouping mode: {0}")]
    UnknownGroupMode(String),

    /// Date title pattern chrono cannot format.
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    /// Error from the CSV writer.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeckError {
    /// Build a parse error for the named file.
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        DeckError::Parse {
            file: file.into(),
            message: message.into(),
        }
    }
}

fn summarize(failures: &[DeckError]) -> String {
    failures
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for reportdeck operations.
pub type Result<T> = std::result::Result<T, DeckError>;
