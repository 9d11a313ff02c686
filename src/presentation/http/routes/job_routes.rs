use axum::{Router, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::JobHandler;

pub fn job_routes(handler: Arc<JobHandler>) -> Router {
    Router::new()
        .route("/jobs", get(JobHandler::list_jobs))
        .route("/jobs/active", get(JobHandler::get_active_jobs))
        .route("/jobs/{job_id}", get(JobHandler::get_job_status))
        .with_state(handler)
}
