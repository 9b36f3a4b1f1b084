//! Route modules and the success envelope shared by all of them.

use axum::Router;
use serde::Serialize;

use crate::state::AppState;

pub mod categories;
pub mod health;

/// JSON body returned for successful catalog responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Optional human-readable note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    /// The payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying only `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// A successful response carrying `data` and a message.
    pub fn with_message(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message),
            data,
        }
    }
}

/// Builds the full application router. Used by `main.rs` and the
/// integration tests.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/categories", categories::router())
        .with_state(state)
}
