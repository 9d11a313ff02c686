use axum::{Router, extract::DefaultBodyLimit, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::UploadHandler;

pub fn upload_routes(handler: Arc<UploadHandler>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/upload/batch", post(UploadHandler::upload_batch))
        // multipart bodies are otherwise capped at axum's 2 MB default
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(handler)
}
