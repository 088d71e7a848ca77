//! Web dashboard for the departure board.
//!
//! Serves the last published board as HTML and JSON.

mod routes;
mod state;
pub mod templates;

pub use routes::{AppError, create_router};
pub use state::{AppState, RouteLabel, SharedBoard};
