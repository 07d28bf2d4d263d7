//! Parsed tables and their source metadata.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{DeckError, Result};

/// Metadata about the file a table was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// File name without path; also the dataset id.
    pub file: String,
    /// SHA-256 hash of the raw contents.
    pub hash: String,
    /// Size of the raw contents in bytes (sum of cell bytes for tables
    /// built in memory).
    pub size_bytes: u64,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
}

impl SourceInfo {
    /// Describe a table that arrived without raw file contents.
    ///
    /// The hash covers headers and cells with unit/record separators, so two
    /// tables hash equal only if every cell matches.
    pub fn for_table(file: impl Into<String>, table: &DataTable) -> Self {
        let mut hasher = Sha256::new();
        let mut size_bytes = 0u64;
        for line in std::iter::once(&table.headers).chain(table.rows.iter()) {
            for cell in line {
                hasher.update(cell.as_bytes());
                hasher.update([0x1f]);
                size_bytes += cell.len() as u64;
            }
            hasher.update([0x1e]);
        }

        Self {
            file: file.into(),
            hash: format!("sha256:{:x}", hasher.finalize()),
            size_bytes,
            row_count: table.row_count(),
            column_count: table.column_count(),
        }
    }
}

/// Represents parsed tabular data.
///
/// Every row holds exactly one cell per header. Tables are never modified
/// after parsing; datasets share them behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from string literals. Handy in tests and examples.
    pub fn from_strs(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a header, if present.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Check that headers are unique and every row has one cell per header.
    /// `name` labels the parse error.
    pub fn validate(&self, name: &str) -> Result<()> {
        for (i, header) in self.headers.iter().enumerate() {
            if self.headers[..i].contains(header) {
                return Err(DeckError::parse(
                    name,
                    format!("duplicate header '{}'", header),
                ));
            }
        }

        let expected_cols = self.column_count();
        if let Some((i, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected_cols)
        {
            return Err(DeckError::parse(
                name,
                format!(
                    "row {} has {} cells, expected {}",
                    i + 1,
                    row.len(),
                    expected_cols
                ),
            ));
        }

        Ok(())
    }
}
