//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Error from the reportdeck library.
    Deck(reportdeck::DeckError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    pub fn dataset_not_found(id: &str) -> Self {
        ApiError::NotFound(format!("No dataset named {}", id))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Deck(e) => {
                let status = match e {
                    reportdeck::DeckError::Io { .. }
                    | reportdeck::DeckError::Csv(_)
                    | reportdeck::DeckError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, "deck_error", e.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<reportdeck::DeckError> for ApiError {
    fn from(err: reportdeck::DeckError) -> Self {
        ApiError::Deck(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Deck(e) => write!(f, "Deck error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
