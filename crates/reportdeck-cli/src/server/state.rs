//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::RwLock;

use reportdeck::Deck;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The deck being browsed. View and lifecycle changes take the write lock.
    pub deck: Arc<RwLock<Deck>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(deck: Deck) -> Self {
        Self {
            deck: Arc::new(RwLock::new(deck)),
        }
    }
}
