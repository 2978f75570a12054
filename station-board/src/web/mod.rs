//! Web layer for the station board.
//!
//! Serves the board as JSON for the display page to poll.

mod routes;
mod state;

pub use routes::{AppError, InfosQuery, create_router};
pub use state::AppState;
