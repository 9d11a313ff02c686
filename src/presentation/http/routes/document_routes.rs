use axum::{Router, routing::delete, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::DocumentHandler;

pub fn document_routes(handler: Arc<DocumentHandler>) -> Router {
    Router::new()
        .route("/documents", get(DocumentHandler::list_documents))
        .route(
            "/documents/{document_id}",
            delete(DocumentHandler::delete_document),
        )
        .with_state(handler)
}
