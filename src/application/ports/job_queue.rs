use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::ProcessingJob;

#[derive(Debug, Error)]
pub enum JobQueueError {
    #[error("Job queue is closed")]
    Closed,
    #[error("Invalid job: {0}")]
    InvalidJob(String),
}

#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a job for processing
    async fn enqueue(&self, job: ProcessingJob) -> Result<(), JobQueueError>;

    /// Jobs enqueued but not yet picked up by a worker
    async fn size(&self) -> Result<usize, JobQueueError>;

    async fn is_empty(&self) -> Result<bool, JobQueueError> {
        Ok(self.size().await? == 0)
    }

    async fn health_check(&self) -> Result<QueueHealth, JobQueueError>;
}

#[derive(Debug, Clone)]
pub struct QueueHealth {
    pub queue_size: usize,
    pub total_enqueued: u64,
    pub total_dequeued: u64,
    pub is_healthy: bool,
    pub last_activity: Option<chrono::DateTime<chrono::Utc>>,
}
