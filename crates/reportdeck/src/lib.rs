//! reportdeck: filtered, sorted, paginated and grouped views over tabular
//! reports.
//!
//! A [`Deck`] holds any number of ingested tables ("datasets"). Each dataset
//! gets its own view state: one equality filter per column, a single sort
//! column and a page window. Across datasets, the active ones can be grouped
//! by ingestion day or by tag.
//!
//! # Core Principles
//!
//! - **Derived, never stale**: every view is recomputed from the current
//!   filters, sort and page; changing a filter or the page size returns to
//!   page 1.
//! - **Stable**: sorting keeps the input order of equal values.
//! - **Tolerant**: operations on unknown datasets are no-ops, and out-of-range
//!   page requests are ignored.
//!
//! # Example
//!
//! ```
//! use reportdeck::{Deck, GroupMode};
//!
//! let mut deck = Deck::new();
//! deck.ingest_sources([
//!     ("sales.csv", "region,total\neast,10\nwest,7\n"),
//!     ("costs.csv", "region,total\neast,4\n"),
//! ])
//! .unwrap();
//!
//! deck.add_tag("sales.csv", "Q1");
//! deck.set_filter("sales.csv", "region", Some("east"));
//!
//! let view = deck.view("sales.csv").unwrap();
//! assert_eq!(view.rows.len(), 1);
//!
//! for group in deck.groups(GroupMode::Tags) {
//!     println!("{} ({} reports)", group.title, group.count);
//! }
//! ```

pub mod error;
pub mod group;
pub mod input;
pub mod store;
pub mod view;

mod deck;

pub use crate::deck::{Deck, DeckConfig};
pub use error::{DeckError, Result};
pub use group::{Group, GroupMode, GroupingConfig};
pub use input::{DataTable, Parser, ParserConfig, SourceInfo};
pub use store::{Dataset, DatasetStore, IngestPolicy, IngestReport};
pub use view::{
    ExportFormat, FilterOptions, Filters, PageSize, SortDirection, SortSpec, View, ViewConfig,
    PAGE_SIZE_OPTIONS,
};
