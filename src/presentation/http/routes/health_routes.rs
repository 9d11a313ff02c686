use axum::{Json, Router, response::IntoResponse, routing::get};
use serde_json::json;
use std::sync::Arc;

use crate::presentation::http::handlers::HealthHandler;

pub fn health_routes(handler: Arc<HealthHandler>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(HealthHandler::health))
        .route("/health/dependencies", get(HealthHandler::dependencies))
        .with_state(handler)
}

async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "name": "Document Q&A API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/docs",
    }))
}
