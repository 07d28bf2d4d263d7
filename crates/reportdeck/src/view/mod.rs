//! Filtered, sorted and paginated views over a single table.
//!
//! The pipeline always runs in the same order:
//!
//! ```text
//! table -> filter -> sort -> paginate -> rows on screen
//! ```

mod config;
pub mod export;
mod filter;
mod page;
mod sort;

use serde::Serialize;

pub use config::ViewConfig;
pub use export::{write_view, ExportFormat};
pub use filter::{apply_filters, compute_filter_options, matching_rows, FilterOptions, Filters};
pub use page::{paginate, Page, PageSize, PAGE_SIZE_OPTIONS};
pub use sort::{apply_sort, sort_indices, SortDirection, SortSpec};

/// "Showing X to Y of Z results" for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowRange {
    /// 1-based first row on the page; 0 when nothing matches.
    pub from: usize,
    /// 1-based last row on the page.
    pub to: usize,
    /// Rows that passed the filters.
    pub total: usize,
}

/// The rows to display for one dataset plus the state that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct View<'a> {
    pub dataset: &'a str,
    pub headers: &'a [String],
    pub rows: Vec<&'a [String]>,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: PageSize,
    pub sort: &'a SortSpec,
    pub filters: &'a Filters,
    pub range: RowRange,
}

impl View<'_> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

impl RowRange {
    pub(crate) fn new(total: usize, page_size: PageSize, current_page: usize) -> Self {
        match page_size {
            PageSize::All => Self {
                from: usize::from(total > 0),
                to: total,
                total,
            },
            PageSize::Rows(size) => {
                let size = size.get();
                let from = if total == 0 {
                    0
                } else {
                    current_page.saturating_sub(1) * size + 1
                };
                Self {
                    from,
                    to: (current_page * size).min(total),
                    total,
                }
            }
        }
    }
}
