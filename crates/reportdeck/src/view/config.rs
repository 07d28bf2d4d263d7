//! Per-dataset view state and its invalidation rules.

use serde::{Deserialize, Serialize};

use super::filter::Filters;
use super::page::PageSize;
use super::sort::SortSpec;

/// Filter, sort and paging state for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub filters: Filters,
    pub sort: SortSpec,
    pub page_size: PageSize,
    pub current_page: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::with_page_size(PageSize::default())
    }
}

impl ViewConfig {
    /// Fresh state: no filters, unsorted, first page.
    pub fn with_page_size(page_size: PageSize) -> Self {
        Self {
            filters: Filters::new(),
            sort: SortSpec::default(),
            page_size,
            current_page: 1,
        }
    }

    /// Change one filter. Always returns to the first page.
    pub fn set_filter(&mut self, header: &str, value: Option<&str>) {
        self.filters.set(header, value);
        self.current_page = 1;
    }

    /// Drop every filter and return to the first page.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.current_page = 1;
    }

    /// Header selection for sorting. The page is kept.
    pub fn select_sort(&mut self, header: &str) {
        self.sort.select(header);
    }

    /// Change the page size and return to the first page.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.current_page = 1;
    }

    /// Move to `page` if it lies in `1..=total_pages`. Out-of-range requests
    /// leave the state untouched and return `false`.
    pub fn change_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page < 1 || page > total_pages {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Pull `current_page` back into `1..=total_pages`.
    pub fn repair(&mut self, total_pages: usize) {
        if self.page_size == PageSize::All {
            self.current_page = 1;
        } else {
            self.current_page = self.current_page.clamp(1, total_pages.max(1));
        }
    }
}
