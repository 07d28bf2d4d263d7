//! Per-column equality filters.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::DataTable;

/// Distinct values per column, keyed by header in table order.
pub type FilterOptions = IndexMap<String, Vec<String>>;

/// Selected filter value per header. Headers without an entry are unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(IndexMap<String, String>);

impl Filters {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `value` for `header`. `None` or an empty string clears it.
    pub fn set(&mut self, header: impl Into<String>, value: Option<&str>) {
        let header = header.into();
        match value {
            Some(v) if !v.is_empty() => {
                self.0.insert(header, v.to_string());
            }
            _ => {
                self.0.shift_remove(&header);
            }
        }
    }

    /// Builder form of [`Filters::set`].
    pub fn with(mut self, header: impl Into<String>, value: &str) -> Self {
        self.set(header, Some(value));
        self
    }

    /// Current selection for a header.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.0.get(header).map(|s| s.as_str())
    }

    /// Remove every selection.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(header, value)` pairs in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

/// Collect the sorted distinct values of every column.
///
/// Values are ordered by ordinal string comparison; headers keep table order.
pub fn compute_filter_options(table: &DataTable) -> FilterOptions {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let distinct: BTreeSet<&str> = table.column_values(index).collect();
            (
                header.clone(),
                distinct.into_iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

/// Indices of the rows that satisfy every filter, in table order.
///
/// A filter on a header the table does not have constrains nothing.
pub fn matching_rows(table: &DataTable, filters: &Filters) -> Vec<usize> {
    let constraints: Vec<(usize, &str)> = filters
        .iter()
        .filter_map(|(header, value)| table.column_index(header).map(|i| (i, value)))
        .collect();

    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            constraints
                .iter()
                .all(|&(col, value)| row.get(col).map(|c| c.as_str()) == Some(value))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Rows that satisfy every filter, in table order.
pub fn apply_filters<'a>(table: &'a DataTable, filters: &Filters) -> Vec<&'a [String]> {
    matching_rows(table, filters)
        .into_iter()
        .map(|i| table.rows[i].as_slice())
        .collect()
}
