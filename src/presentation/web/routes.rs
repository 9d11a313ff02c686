use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use super::handlers::ChatHandler;

pub fn ui_routes(handler: Arc<ChatHandler>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(ChatHandler::index))
        .route("/api/status", get(ChatHandler::status))
        .route("/api/ask", post(ChatHandler::ask))
        .route("/api/upload", post(ChatHandler::upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(handler)
}
