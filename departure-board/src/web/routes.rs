//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Serialize;
use tower_http::services::ServeDir;
use tracing::error;

use crate::board::BoardState;

use super::state::AppState;
use super::templates::BoardTemplate;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(board_page))
        .route("/api/board", get(board_json))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The rendered departure board.
async fn board_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let board = state.board.snapshot().await;
    let html = BoardTemplate::new(&board, &state.route)
        .render()
        .map_err(|e| AppError::Internal {
            message: format!("Template error: {e}"),
        })?;
    Ok(Html(html))
}

/// The last published board as JSON.
async fn board_json(State(state): State<AppState>) -> Json<BoardState> {
    let board = state.board.snapshot().await;
    Json(board.as_ref().clone())
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        error!(%status, "{message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
