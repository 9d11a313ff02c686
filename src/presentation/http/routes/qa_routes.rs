use axum::{Router, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::QaHandler;

pub fn qa_routes(handler: Arc<QaHandler>) -> Router {
    Router::new()
        .route("/ask", post(QaHandler::ask))
        .with_state(handler)
}
