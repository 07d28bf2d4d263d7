//! Ingested tables with their display metadata.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::input::{DataTable, SourceInfo};
use crate::view::{compute_filter_options, FilterOptions};

/// A table plus its id, ingestion time, tags and active flag.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    /// Unique id, normally the file name.
    pub id: String,
    pub ingested_at: DateTime<Utc>,
    /// Tags in the order they were added.
    pub tags: IndexSet<String>,
    pub active: bool,
    pub source: SourceInfo,
    #[serde(skip)]
    pub(crate) table: Arc<DataTable>,
    #[serde(skip)]
    filter_options: OnceCell<Arc<FilterOptions>>,
}

impl Dataset {
    pub(crate) fn new(
        id: String,
        table: DataTable,
        source: SourceInfo,
        ingested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            ingested_at,
            tags: IndexSet::new(),
            active: true,
            source,
            table: Arc::new(table),
            filter_options: OnceCell::new(),
        }
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    /// Distinct values per column. Computed on first use and kept, since the
    /// table never changes.
    pub fn filter_options(&self) -> &FilterOptions {
        self.filter_options
            .get_or_init(|| Arc::new(compute_filter_options(&self.table)))
    }

    /// Tags in display order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.as_str())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_options_are_cached() {
        let table = DataTable::from_strs(&["a"], &[&["2"], &["1"], &["2"]]);
        let source = SourceInfo {
            file: "t.csv".to_string(),
            hash: String::new(),
            size_bytes: 0,
            row_count: 3,
            column_count: 1,
        };
        let dataset = Dataset::new("t.csv".to_string(), table, source, Utc::now());

        let first = dataset.filter_options() as *const FilterOptions;
        let second = dataset.filter_options() as *const FilterOptions;

        assert_eq!(first, second);
        assert_eq!(dataset.filter_options()["a"], vec!["1", "2"]);
    }
}
