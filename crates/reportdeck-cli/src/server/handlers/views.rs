//! Per-dataset view handlers: read the page, change filters, sort and paging.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use reportdeck::view::RowRange;
use reportdeck::{FilterOptions, Filters, PageSize, SortSpec, View, PAGE_SIZE_OPTIONS};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// One page of a dataset plus the state that produced it.
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub dataset: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: PageSize,
    /// Sizes to offer in a page size picker.
    pub page_size_options: Vec<PageSize>,
    pub sort: SortSpec,
    pub filters: Filters,
    pub showing: ShowingRange,
    pub has_previous: bool,
    pub has_next: bool,
}

/// "Showing X to Y of Z results".
#[derive(Debug, Serialize)]
pub struct ShowingRange {
    pub from: usize,
    pub to: usize,
    pub total: usize,
}

impl From<RowRange> for ShowingRange {
    fn from(range: RowRange) -> Self {
        Self {
            from: range.from,
            to: range.to,
            total: range.total,
        }
    }
}

impl From<&View<'_>> for ViewResponse {
    fn from(view: &View<'_>) -> Self {
        Self {
            dataset: view.dataset.to_string(),
            headers: view.headers.to_vec(),
            rows: view.rows.iter().map(|r| r.to_vec()).collect(),
            total_pages: view.total_pages,
            current_page: view.current_page,
            page_size: view.page_size,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            sort: view.sort.clone(),
            filters: view.filters.clone(),
            showing: view.range.into(),
            has_previous: view.has_previous(),
            has_next: view.has_next(),
        }
    }
}

/// Result of a view change. Unknown datasets are a no-op: `changed` is
/// false and `view` is null.
#[derive(Debug, Serialize)]
pub struct ViewChangeResponse {
    pub changed: bool,
    pub view: Option<ViewResponse>,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub header: String,
    /// Null or empty clears the filter.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub header: String,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: usize,
}

#[derive(Debug, Deserialize)]
pub struct PageSizeRequest {
    /// A positive number or "All".
    pub page_size: PageSize,
}

/// Get the current page of a dataset.
pub async fn get_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ViewResponse>, ApiError> {
    let deck = state.deck.read().await;
    let view = deck
        .view(&id)
        .ok_or_else(|| ApiError::dataset_not_found(&id))?;
    Ok(Json(ViewResponse::from(&view)))
}

/// Get the distinct values of every column of a dataset.
pub async fn get_filter_options(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FilterOptions>, ApiError> {
    let deck = state.deck.read().await;
    let options = deck
        .filter_options(&id)
        .ok_or_else(|| ApiError::dataset_not_found(&id))?;
    Ok(Json(options.clone()))
}

/// Run a view change under the write lock and report the resulting page.
async fn change_view(
    state: &AppState,
    id: &str,
    change: impl FnOnce(&mut reportdeck::Deck) -> bool,
) -> Json<ViewChangeResponse> {
    let mut deck = state.deck.write().await;
    let changed = change(&mut *deck);
    let view = deck.view(id).as_ref().map(ViewResponse::from);
    Json(ViewChangeResponse { changed, view })
}

/// Select or clear a filter value. Returns to page 1.
pub async fn set_filter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FilterRequest>,
) -> Json<ViewChangeResponse> {
    change_view(&state, &id, |deck| {
        deck.set_filter(&id, &req.header, req.value.as_deref())
    })
    .await
}

/// Select a sort header (same header flips direction).
pub async fn set_sort(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SortRequest>,
) -> Json<ViewChangeResponse> {
    change_view(&state, &id, |deck| deck.set_sort(&id, &req.header)).await
}

/// Go to a page. Out-of-range pages report `changed: false`.
pub async fn set_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PageRequest>,
) -> Json<ViewChangeResponse> {
    change_view(&state, &id, |deck| deck.set_page(&id, req.page)).await
}

/// Change the page size. Returns to page 1.
pub async fn set_page_size(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PageSizeRequest>,
) -> Json<ViewChangeResponse> {
    change_view(&state, &id, |deck| deck.set_page_size(&id, req.page_size)).await
}
