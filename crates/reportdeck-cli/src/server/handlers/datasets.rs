//! Dataset lifecycle handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use reportdeck::{Dataset, Deck};

use crate::server::state::AppState;

/// Result of a lifecycle change. Unknown datasets are a no-op: `changed` is
/// false and `dataset` is null.
#[derive(Debug, Serialize)]
pub struct DatasetChangeResponse {
    pub changed: bool,
    pub dataset: Option<Dataset>,
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub tag: String,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: bool,
}

/// List every dataset in ingestion order.
pub async fn list_datasets(State(state): State<AppState>) -> Json<Vec<Dataset>> {
    let deck = state.deck.read().await;
    Json(deck.datasets().cloned().collect())
}

async fn change_dataset(
    state: &AppState,
    id: &str,
    change: impl FnOnce(&mut Deck) -> bool,
) -> Json<DatasetChangeResponse> {
    let mut deck = state.deck.write().await;
    let changed = change(&mut *deck);
    Json(DatasetChangeResponse {
        changed,
        dataset: deck.dataset(id).cloned(),
    })
}

/// Flip a dataset between active and inactive.
pub async fn toggle_dataset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<DatasetChangeResponse> {
    change_dataset(&state, &id, |deck| deck.toggle_active(&id).is_some()).await
}

pub async fn add_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TagRequest>,
) -> Json<DatasetChangeResponse> {
    change_dataset(&state, &id, |deck| deck.add_tag(&id, &req.tag)).await
}

pub async fn remove_tag(
    State(state): State<AppState>,
    Path((id, tag)): Path<(String, String)>,
) -> Json<DatasetChangeResponse> {
    change_dataset(&state, &id, |deck| deck.remove_tag(&id, &tag)).await
}

/// Drop a dataset and its view state.
pub async fn remove_dataset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<RemoveResponse> {
    let mut deck = state.deck.write().await;
    Json(RemoveResponse {
        removed: deck.remove(&id).is_some(),
    })
}
