//! The `Deck`: datasets, their views and their groups behind one API.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Result;
use crate::group::{group, Group, GroupMode, GroupingConfig, INACTIVE_REPORTS};
use crate::input::{DataTable, Parser, ParserConfig, SourceInfo};
use crate::store::{Dataset, DatasetStore, IngestPolicy, IngestReport};
use crate::view::{
    matching_rows, paginate, sort_indices, FilterOptions, PageSize, RowRange, View, ViewConfig,
};

/// Configuration for a [`Deck`].
#[derive(Debug, Clone, Default)]
pub struct DeckConfig {
    /// How raw text is split into tables.
    pub parser: ParserConfig,
    /// Date titles and date group ordering.
    pub grouping: GroupingConfig,
    /// Page size every new dataset starts with.
    pub default_page_size: PageSize,
    /// What a batch does when some of its files fail.
    pub ingest_policy: IngestPolicy,
}

impl DeckConfig {
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_grouping(mut self, grouping: GroupingConfig) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_default_page_size(mut self, page_size: PageSize) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn with_ingest_policy(mut self, policy: IngestPolicy) -> Self {
        self.ingest_policy = policy;
        self
    }
}

/// View state for one dataset plus the cached filter+sort result.
#[derive(Debug, Clone)]
struct ViewState {
    config: ViewConfig,
    /// Indices of the filtered rows in sorted order.
    order: Vec<usize>,
}

impl ViewState {
    fn new(table: &DataTable, page_size: PageSize) -> Self {
        let mut state = Self {
            config: ViewConfig::with_page_size(page_size),
            order: Vec::new(),
        };
        state.recompute(table);
        state
    }

    /// Rebuild the row order from the current filters and sort.
    fn recompute(&mut self, table: &DataTable) {
        self.order = matching_rows(table, &self.config.filters);
        sort_indices(table, &mut self.order, &self.config.sort);
        let total_pages = self.total_pages();
        self.config.repair(total_pages);
    }

    fn total_pages(&self) -> usize {
        self.config.page_size.total_pages(self.order.len())
    }
}

/// Owns the dataset store and one view per dataset.
///
/// Every read derives from current state: a view is never computed from
/// filters that have since changed. Operations naming an unknown dataset do
/// nothing and report `false`/`None`.
///
/// # Example
///
/// ```
/// use reportdeck::{DataTable, Deck, GroupMode, PageSize};
///
/// let mut deck = Deck::new();
/// let table = DataTable::from_strs(&["a", "b"], &[&["1", "z"], &["2", "y"], &["1", "y"]]);
/// deck.ingest_table("report.csv", table).unwrap();
///
/// deck.set_filter("report.csv", "a", Some("1"));
/// deck.set_sort("report.csv", "b");
/// deck.set_page_size("report.csv", PageSize::rows(1).unwrap());
/// deck.set_page("report.csv", 2);
///
/// let view = deck.view("report.csv").unwrap();
/// assert_eq!(view.rows, vec![&["1".to_string(), "z".to_string()][..]]);
/// assert_eq!(view.total_pages, 2);
///
/// let groups = deck.groups(GroupMode::None);
/// assert_eq!(groups[0].count, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Deck {
    config: DeckConfig,
    parser: Parser,
    store: DatasetStore,
    views: HashMap<String, ViewState>,
}

impl Deck {
    /// Create a deck with default configuration.
    pub fn new() -> Self {
        Self::with_config(DeckConfig::default())
    }

    /// Create a deck with custom configuration.
    pub fn with_config(config: DeckConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self {
            config,
            parser,
            store: DatasetStore::new(),
            views: HashMap::new(),
        }
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.store.get(id)
    }

    /// All datasets in ingestion order.
    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.store.iter()
    }

    // ----- ingestion -----

    /// Add an already split table, ingested now.
    pub fn ingest_table(&mut self, id: impl Into<String>, table: DataTable) -> Result<&Dataset> {
        self.ingest_table_at(id, table, Utc::now())
    }

    /// Add an already split table with an explicit ingestion time.
    pub fn ingest_table_at(
        &mut self,
        id: impl Into<String>,
        table: DataTable,
        ingested_at: DateTime<Utc>,
    ) -> Result<&Dataset> {
        let dataset = self.store.ingest_at(id, table, ingested_at)?;
        open_view(&mut self.views, dataset, self.config.default_page_size);
        Ok(dataset)
    }

    /// Parse and add a single file's text.
    pub fn ingest_str(&mut self, name: &str, text: &str) -> Result<&Dataset> {
        let (table, source) = self.parser.parse_str(name, text)?;
        let dataset = self.store.ingest_parsed(table, source, Utc::now())?;
        open_view(&mut self.views, dataset, self.config.default_page_size);
        Ok(dataset)
    }

    /// Parse and add several in-memory files as one batch.
    pub fn ingest_sources<N, T>(
        &mut self,
        sources: impl IntoIterator<Item = (N, T)>,
    ) -> Result<IngestReport>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let parsed = sources
            .into_iter()
            .map(|(name, text)| self.parser.parse_str(name.as_ref(), text.as_ref()))
            .collect();
        self.commit_batch(parsed, Utc::now())
    }

    /// Read, parse and add several files as one batch.
    pub fn ingest_files<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<IngestReport> {
        let parsed = paths
            .into_iter()
            .map(|path| self.parser.parse_file(path))
            .collect();
        self.commit_batch(parsed, Utc::now())
    }

    fn commit_batch(
        &mut self,
        parsed: Vec<Result<(DataTable, SourceInfo)>>,
        ingested_at: DateTime<Utc>,
    ) -> Result<IngestReport> {
        let report = self
            .store
            .ingest_batch(parsed, ingested_at, self.config.ingest_policy)?;
        for id in &report.ingested {
            if let Some(dataset) = self.store.get(id) {
                open_view(&mut self.views, dataset, self.config.default_page_size);
            }
        }
        Ok(report)
    }

    // ----- per-dataset views -----

    /// Distinct values per column of a dataset.
    pub fn filter_options(&self, id: &str) -> Option<&FilterOptions> {
        self.store.get(id).map(|d| d.filter_options())
    }

    /// Current view state (filters, sort, paging) of a dataset.
    pub fn view_config(&self, id: &str) -> Option<&ViewConfig> {
        self.views.get(id).map(|s| &s.config)
    }

    /// The page of rows to display for a dataset.
    pub fn view(&self, id: &str) -> Option<View<'_>> {
        let dataset = self.store.get(id)?;
        let state = self.views.get(id)?;
        let table = dataset.table();
        let config = &state.config;

        let page = paginate(&state.order, config.page_size, config.current_page);
        let rows = page
            .rows
            .iter()
            .map(|&i| table.rows[i].as_slice())
            .collect();

        Some(View {
            dataset: &dataset.id,
            headers: &table.headers,
            rows,
            total_pages: page.total_pages,
            current_page: config.current_page,
            page_size: config.page_size,
            sort: &config.sort,
            filters: &config.filters,
            range: RowRange::new(state.order.len(), config.page_size, config.current_page),
        })
    }

    /// Runs `update` on the view of `id` and recomputes the row order.
    fn update_view(&mut self, id: &str, update: impl FnOnce(&mut ViewConfig)) -> bool {
        let Some(dataset) = self.store.get(id) else {
            debug!(dataset = id, "ignoring view change for unknown dataset");
            return false;
        };
        let table = Arc::clone(&dataset.table);
        let Some(state) = self.views.get_mut(id) else {
            return false;
        };
        update(&mut state.config);
        state.recompute(&table);
        true
    }

    fn has_column(&self, id: &str, header: &str) -> bool {
        let found = self
            .store
            .get(id)
            .is_some_and(|d| d.table().column_index(header).is_some());
        if !found {
            debug!(dataset = id, header, "ignoring unknown column");
        }
        found
    }

    /// Select a filter value for a column (`None` or `""` clears it). Goes
    /// back to page 1. Unknown datasets and columns are ignored.
    pub fn set_filter(&mut self, id: &str, header: &str, value: Option<&str>) -> bool {
        if !self.has_column(id, header) {
            return false;
        }
        self.update_view(id, |config| config.set_filter(header, value))
    }

    /// Remove every filter of a dataset. Goes back to page 1.
    pub fn clear_filters(&mut self, id: &str) -> bool {
        self.update_view(id, |config| config.clear_filters())
    }

    /// Header selection for sorting: same column flips direction, a new
    /// column sorts ascending. The page is kept.
    pub fn set_sort(&mut self, id: &str, header: &str) -> bool {
        if !self.has_column(id, header) {
            return false;
        }
        self.update_view(id, |config| config.select_sort(header))
    }

    /// Go to page `page`. Out-of-range pages are rejected and change nothing.
    pub fn set_page(&mut self, id: &str, page: usize) -> bool {
        let Some(state) = self.views.get_mut(id) else {
            debug!(dataset = id, "ignoring page change for unknown dataset");
            return false;
        };
        let total_pages = state.total_pages();
        let accepted = state.config.change_page(page, total_pages);
        if !accepted {
            debug!(dataset = id, page, total_pages, "rejected out-of-range page");
        }
        accepted
    }

    /// Change the page size. Goes back to page 1.
    pub fn set_page_size(&mut self, id: &str, page_size: PageSize) -> bool {
        self.update_view(id, |config| config.set_page_size(page_size))
    }

    // ----- groups -----

    /// Active datasets grouped by `mode`.
    pub fn groups(&self, mode: GroupMode) -> Vec<Group<'_>> {
        group(self.store.iter(), mode, &self.config.grouping)
    }

    /// Inactive datasets in ingestion order.
    pub fn inactive(&self) -> Vec<&Dataset> {
        self.store.inactive().collect()
    }

    /// The "Inactive Reports" section, or `None` when every dataset is active.
    pub fn inactive_group(&self) -> Option<Group<'_>> {
        let inactive = self.inactive();
        if inactive.is_empty() {
            None
        } else {
            Some(Group::new(INACTIVE_REPORTS, inactive))
        }
    }

    // ----- lifecycle -----

    /// Flip a dataset between active and inactive. Returns the new state.
    pub fn toggle_active(&mut self, id: &str) -> Option<bool> {
        self.store.toggle_active(id)
    }

    pub fn set_active(&mut self, id: &str, active: bool) -> bool {
        self.store.set_active(id, active)
    }

    pub fn add_tag(&mut self, id: &str, tag: &str) -> bool {
        self.store.add_tag(id, tag)
    }

    pub fn remove_tag(&mut self, id: &str, tag: &str) -> bool {
        self.store.remove_tag(id, tag)
    }

    /// Drop a dataset and its view.
    pub fn remove(&mut self, id: &str) -> Option<Dataset> {
        self.views.remove(id);
        self.store.remove(id)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

fn open_view(views: &mut HashMap<String, ViewState>, dataset: &Dataset, page_size: PageSize) {
    views.insert(dataset.id.clone(), ViewState::new(dataset.table(), page_size));
}
