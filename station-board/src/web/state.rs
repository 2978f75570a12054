//! Application state for the web layer.

use std::sync::Arc;

use crate::board::StationBoard;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The board answering `/infos`
    pub board: Arc<StationBoard>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(board: StationBoard) -> Self {
        Self {
            board: Arc::new(board),
        }
    }
}
