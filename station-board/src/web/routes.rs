//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::board::BoardItem;
use crate::domain::localize;

use super::state::AppState;

/// Format of the `at` query parameter.
const AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/infos", get(infos))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Query parameters of `/infos`.
#[derive(Debug, Default, Deserialize)]
pub struct InfosQuery {
    /// Local time to show the board for, `YYYY-MM-DDTHH:MM:SS`. Defaults to now.
    pub at: Option<String>,
}

/// The board as a JSON array.
async fn infos(
    State(state): State<AppState>,
    Query(query): Query<InfosQuery>,
) -> Result<Json<Vec<BoardItem>>, AppError> {
    let tz = state.board.timezone();
    let reference = match query.at.as_deref() {
        Some(at) => {
            let naive = NaiveDateTime::parse_from_str(at, AT_FORMAT).map_err(|_| AppError::BadRequest {
                message: format!("invalid time {at:?}, expected YYYY-MM-DDTHH:MM:SS"),
            })?;
            Some(localize(tz, naive).map_err(|e| AppError::BadRequest { message: e.to_string() })?)
        }
        None => None,
    };

    // Cache files and the RMV client are blocking
    let board = state.board.clone();
    let items = tokio::task::spawn_blocking(move || board.infos(reference))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("board task failed: {e}"),
        })?;

    Ok(Json(items))
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "Request failed");

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
