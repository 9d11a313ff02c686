use axum::{
    Json,
    extract::{Path, Query, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::{GetJobStatusUseCase, get_job_status::GetJobStatusRequest};
use crate::presentation::http::dto::{JobListDto, JobListQuery, JobStatusDto};
use crate::presentation::http::errors::ApiError;

pub struct JobHandler {
    get_job_status_use_case: Arc<GetJobStatusUseCase>,
}

impl JobHandler {
    pub fn new(get_job_status_use_case: Arc<GetJobStatusUseCase>) -> Self {
        Self {
            get_job_status_use_case,
        }
    }

    pub async fn get_job_status(
        State(handler): State<Arc<JobHandler>>,
        job_id: Result<Path<Uuid>, PathRejection>,
    ) -> Result<impl IntoResponse, ApiError> {
        let Path(job_id) = job_id.map_err(|e| ApiError::bad_request(e.body_text()))?;

        let response = handler
            .get_job_status_use_case
            .execute(GetJobStatusRequest { job_id })
            .await?;

        Ok((StatusCode::OK, Json(JobStatusDto::from(response))))
    }

    // Most recent first
    pub async fn list_jobs(
        State(handler): State<Arc<JobHandler>>,
        Query(query): Query<JobListQuery>,
    ) -> Result<impl IntoResponse, ApiError> {
        let jobs = handler
            .get_job_status_use_case
            .recent_jobs(query.limit)
            .await?;

        Ok((StatusCode::OK, Json(JobListDto::from(jobs))))
    }

    pub async fn get_active_jobs(
        State(handler): State<Arc<JobHandler>>,
    ) -> Result<impl IntoResponse, ApiError> {
        let jobs = handler.get_job_status_use_case.active_jobs().await?;
        Ok((StatusCode::OK, Json(JobListDto::from(jobs))))
    }
}
