//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::board::{BoardState, Renderer};

/// The last published board, shared between the poller and HTTP handlers.
///
/// Publishing swaps in a new `Arc`, so a handler that already took a
/// snapshot keeps reading the old board until it is done.
#[derive(Clone, Default)]
pub struct SharedBoard {
    inner: Arc<RwLock<Arc<BoardState>>>,
}

impl SharedBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently published board.
    pub async fn snapshot(&self) -> Arc<BoardState> {
        self.inner.read().await.clone()
    }
}

impl Renderer for SharedBoard {
    async fn render(&self, state: &BoardState) {
        let next = Arc::new(state.clone());
        *self.inner.write().await = next;
    }
}

/// Station pair shown in the board header.
#[derive(Debug, Clone, Default)]
pub struct RouteLabel {
    pub from: String,
    pub to: String,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Board published by the poller
    pub board: SharedBoard,

    /// Header labels
    pub route: Arc<RouteLabel>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(board: SharedBoard, route: RouteLabel) -> Self {
        Self {
            board,
            route: Arc::new(route),
        }
    }
}
