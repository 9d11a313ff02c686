use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::ProcessingJob;
use crate::domain::repositories::job_repository::{JobRepository, JobRepositoryError};

/// Job records kept for the lifetime of the API process.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<Uuid, ProcessingJob>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn save(&self, job: &ProcessingJob) -> Result<(), JobRepositoryError> {
        self.jobs.write().await.insert(job.id(), job.clone());
        Ok(())
    }

    async fn find_by_id(&self, job_id: Uuid) -> Result<Option<ProcessingJob>, JobRepositoryError> {
        Ok(self.jobs.read().await.get(&job_id).cloned())
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<ProcessingJob>, JobRepositoryError> {
        let jobs = self.jobs.read().await;
        let mut recent: Vec<ProcessingJob> = jobs.values().cloned().collect();
        recent.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn find_active_jobs(&self) -> Result<Vec<ProcessingJob>, JobRepositoryError> {
        let jobs = self.jobs.read().await;
        let mut active: Vec<ProcessingJob> =
            jobs.values().filter(|j| j.is_active()).cloned().collect();
        active.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        Ok(active)
    }

    async fn update(&self, job: &ProcessingJob) -> Result<(), JobRepositoryError> {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(&job.id()) {
            Some(existing) => {
                *existing = job.clone();
                Ok(())
            }
            None => Err(JobRepositoryError::NotFound(job.id())),
        }
    }

    async fn count_active_jobs(&self) -> Result<usize, JobRepositoryError> {
        Ok(self.jobs.read().await.values().filter(|j| j.is_active()).count())
    }
}
