use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::ProcessingJob;

#[derive(Debug, Error)]
pub enum JobRepositoryError {
    #[error("Job not found: {0}")]
    NotFound(Uuid),
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn save(&self, job: &ProcessingJob) -> Result<(), JobRepositoryError>;
    async fn find_by_id(&self, job_id: Uuid) -> Result<Option<ProcessingJob>, JobRepositoryError>;
    /// Most recent first.
    async fn find_recent(&self, limit: usize) -> Result<Vec<ProcessingJob>, JobRepositoryError>;
    async fn find_active_jobs(&self) -> Result<Vec<ProcessingJob>, JobRepositoryError>;
    async fn update(&self, job: &ProcessingJob) -> Result<(), JobRepositoryError>;
    async fn count_active_jobs(&self) -> Result<usize, JobRepositoryError>;
}
