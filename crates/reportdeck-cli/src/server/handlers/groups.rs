//! Grouping handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use reportdeck::{Dataset, Group, GroupMode};

use crate::server::error::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GroupsQuery {
    /// none, date or tags. Missing means none.
    pub mode: Option<String>,
}

/// A group with its member datasets.
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub title: String,
    pub count: usize,
    pub datasets: Vec<Dataset>,
}

impl From<Group<'_>> for GroupResponse {
    fn from(group: Group<'_>) -> Self {
        Self {
            title: group.title,
            count: group.count,
            datasets: group.datasets.into_iter().cloned().collect(),
        }
    }
}

/// Active datasets grouped by `mode`.
pub async fn get_groups(
    State(state): State<AppState>,
    Query(query): Query<GroupsQuery>,
) -> Result<Json<Vec<GroupResponse>>, ApiError> {
    let mode: GroupMode = query.mode.as_deref().unwrap_or_default().parse()?;
    let deck = state.deck.read().await;
    Ok(Json(
        deck.groups(mode).into_iter().map(GroupResponse::from).collect(),
    ))
}

/// Inactive datasets in ingestion order.
pub async fn get_inactive(State(state): State<AppState>) -> Json<Vec<Dataset>> {
    let deck = state.deck.read().await;
    Json(deck.inactive().into_iter().cloned().collect())
}
