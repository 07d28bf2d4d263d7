//! Page sizes and page slicing.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};

/// Rows per page, or every row on a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PageSizeRepr", into = "PageSizeRepr")]
pub enum PageSize {
    Rows(NonZeroUsize),
    All,
}

const fn fixed(n: usize) -> PageSize {
    match NonZeroUsize::new(n) {
        Some(n) => PageSize::Rows(n),
        None => PageSize::All,
    }
}

/// The page sizes offered to users. Other positive sizes are still accepted.
pub const PAGE_SIZE_OPTIONS: [PageSize; 5] = [
    fixed(20),
    fixed(50),
    fixed(100),
    fixed(1000),
    PageSize::All,
];

impl PageSize {
    /// A bounded page size; fails on zero.
    pub fn rows(n: usize) -> Result<Self> {
        NonZeroUsize::new(n)
            .map(PageSize::Rows)
            .ok_or_else(|| DeckError::InvalidPageSize(n.to_string()))
    }

    /// Number of pages needed for `len` rows. Never less than one.
    pub fn total_pages(&self, len: usize) -> usize {
        match self {
            PageSize::All => 1,
            PageSize::Rows(size) => len.div_ceil(size.get()).max(1),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        fixed(20)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Rows(n) => write!(f, "{}", n),
            PageSize::All => write!(f, "All"),
        }
    }
}

impl FromStr for PageSize {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(PageSize::All);
        }
        let n: usize = s
            .parse()
            .map_err(|_| DeckError::InvalidPageSize(s.to_string()))?;
        PageSize::rows(n)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PageSizeRepr {
    Rows(usize),
    Label(String),
}

impl TryFrom<PageSizeRepr> for PageSize {
    type Error = DeckError;

    fn try_from(repr: PageSizeRepr) -> Result<Self> {
        match repr {
            PageSizeRepr::Rows(n) => PageSize::rows(n),
            PageSizeRepr::Label(s) => s.parse(),
        }
    }
}

impl From<PageSize> for PageSizeRepr {
    fn from(size: PageSize) -> Self {
        match size {
            PageSize::Rows(n) => PageSizeRepr::Rows(n.get()),
            PageSize::All => PageSizeRepr::Label("All".to_string()),
        }
    }
}

/// One page of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub rows: &'a [T],
    pub total_pages: usize,
}

/// Slice out page `current_page` (1-based).
///
/// With [`PageSize::All`] the page number is ignored. A page past the end
/// yields an empty slice rather than panicking.
pub fn paginate<T>(rows: &[T], page_size: PageSize, current_page: usize) -> Page<'_, T> {
    let total_pages = page_size.total_pages(rows.len());
    let slice = match page_size {
        PageSize::All => rows,
        PageSize::Rows(size) => {
            let size = size.get();
            let start = current_page.saturating_sub(1).saturating_mul(size).min(rows.len());
            let end = start.saturating_add(size).min(rows.len());
            &rows[start..end]
        }
    };

    Page {
        rows: slice,
        total_pages,
    }
}
