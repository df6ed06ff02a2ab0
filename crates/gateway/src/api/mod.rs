pub mod auth;
pub mod chat;
pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/api/chat", post(chat::chat_stream))
}
