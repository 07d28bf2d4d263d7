//! Single-column stable sorting.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::input::DataTable;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Active sort column and direction. The default sorts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: Option<String>,
    pub direction: Option<SortDirection>,
}

impl SortSpec {
    /// Sort by `header` in the given direction.
    pub fn by(header: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(header.into()),
            direction: Some(direction),
        }
    }

    /// Header selection: the current key flips direction, any other key
    /// starts ascending. There is no way back to "unsorted" from here.
    pub fn select(&mut self, header: &str) {
        let direction = if self.key.as_deref() == Some(header)
            && self.direction == Some(SortDirection::Asc)
        {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        self.key = Some(header.to_string());
        self.direction = Some(direction);
    }

    /// Direction to show next to `header`, if it is the active key.
    pub fn indicator(&self, header: &str) -> Option<SortDirection> {
        if self.key.as_deref() == Some(header) {
            Some(self.direction.unwrap_or(SortDirection::Asc))
        } else {
            None
        }
    }

    fn resolve(&self, headers: &[String]) -> Option<(usize, SortDirection)> {
        let key = self.key.as_deref()?;
        let col = headers.iter().position(|h| h == key)?;
        Some((col, self.direction.unwrap_or(SortDirection::Asc)))
    }
}

fn compare(a: &str, b: &str, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => a.cmp(b),
        SortDirection::Desc => b.cmp(a),
    }
}

fn cell<R: AsRef<[String]>>(row: &R, col: usize) -> &str {
    row.as_ref().get(col).map(|s| s.as_str()).unwrap_or("")
}

/// Sort rows by the sort key. Without a key (or with a key the headers do
/// not contain) rows come back in their original order. Ties keep input order.
pub fn apply_sort<R: AsRef<[String]>>(
    mut rows: Vec<R>,
    headers: &[String],
    sort: &SortSpec,
) -> Vec<R> {
    if let Some((col, direction)) = sort.resolve(headers) {
        // `sort_by` is stable.
        rows.sort_by(|a, b| compare(cell(a, col), cell(b, col), direction));
    }
    rows
}

/// Sort a list of row indices into `table` in place.
pub fn sort_indices(table: &DataTable, order: &mut [usize], sort: &SortSpec) {
    if let Some((col, direction)) = sort.resolve(&table.headers) {
        order.sort_by(|&a, &b| {
            compare(cell(&table.rows[a], col), cell(&table.rows[b], col), direction)
        });
    }
}
