use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::ProcessingJob;
use crate::domain::repositories::{JobRepository, job_repository::JobRepositoryError};

const DEFAULT_RECENT_LIMIT: usize = 50;

#[derive(Debug, Error)]
pub enum GetJobStatusError {
    #[error("Job not found: {0}")]
    JobNotFound(Uuid),
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<JobRepositoryError> for GetJobStatusError {
    fn from(error: JobRepositoryError) -> Self {
        match error {
            JobRepositoryError::NotFound(id) => GetJobStatusError::JobNotFound(id),
            _ => GetJobStatusError::RepositoryError(error.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetJobStatusRequest {
    pub job_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct GetJobStatusResponse {
    pub job: ProcessingJob,
    pub duration: Option<chrono::Duration>,
}

pub struct GetJobStatusUseCase {
    job_repository: Arc<dyn JobRepository>,
}

impl GetJobStatusUseCase {
    pub fn new(job_repository: Arc<dyn JobRepository>) -> Self {
        Self { job_repository }
    }

    pub async fn execute(
        &self,
        request: GetJobStatusRequest,
    ) -> Result<GetJobStatusResponse, GetJobStatusError> {
        let job = self
            .job_repository
            .find_by_id(request.job_id)
            .await?
            .ok_or(GetJobStatusError::JobNotFound(request.job_id))?;

        Ok(GetJobStatusResponse {
            duration: job.duration(),
            job,
        })
    }

    pub async fn recent_jobs(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ProcessingJob>, GetJobStatusError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, 500);
        Ok(self.job_repository.find_recent(limit).await?)
    }

    pub async fn active_jobs(&self) -> Result<Vec<ProcessingJob>, GetJobStatusError> {
        Ok(self.job_repository.find_active_jobs().await?)
    }
}
