use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

use crate::application::ports::job_queue::{JobQueue, JobQueueError, QueueHealth};
use crate::domain::entities::ProcessingJob;

#[derive(Debug, Clone, Default)]
struct QueueStats {
    total_enqueued: u64,
    total_dequeued: u64,
    last_activity: Option<chrono::DateTime<chrono::Utc>>,
}

impl QueueStats {
    fn pending(&self) -> usize {
        self.total_enqueued.saturating_sub(self.total_dequeued) as usize
    }
}

/// Sending half of the in-process job queue. Jobs are handed to the
/// background workers through an unbounded tokio channel.
pub struct MpscJobQueue {
    sender: mpsc::UnboundedSender<ProcessingJob>,
    stats: Arc<Mutex<QueueStats>>,
}

impl MpscJobQueue {
    pub fn create_pair() -> (Self, MpscJobQueueReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let stats = Arc::new(Mutex::new(QueueStats::default()));

        let queue = Self {
            sender,
            stats: stats.clone(),
        };
        let receiver = MpscJobQueueReceiver {
            receiver: Arc::new(Mutex::new(receiver)),
            stats,
        };

        (queue, receiver)
    }
}

#[async_trait]
impl JobQueue for MpscJobQueue {
    async fn enqueue(&self, job: ProcessingJob) -> Result<(), JobQueueError> {
        if !job.status().is_queued() {
            return Err(JobQueueError::InvalidJob(format!(
                "job {} is {}",
                job.id(),
                job.status()
            )));
        }

        // count first so a fast worker never sees dequeued > enqueued
        let mut stats = self.stats.lock().await;
        self.sender.send(job).map_err(|_| JobQueueError::Closed)?;
        stats.total_enqueued += 1;
        stats.last_activity = Some(chrono::Utc::now());

        Ok(())
    }

    async fn size(&self) -> Result<usize, JobQueueError> {
        Ok(self.stats.lock().await.pending())
    }

    async fn health_check(&self) -> Result<QueueHealth, JobQueueError> {
        let stats = self.stats.lock().await;

        Ok(QueueHealth {
            queue_size: stats.pending(),
            total_enqueued: stats.total_enqueued,
            total_dequeued: stats.total_dequeued,
            is_healthy: !self.sender.is_closed(),
            last_activity: stats.last_activity,
        })
    }
}

/// Receiving half, shared by every worker of the background processor.
pub struct MpscJobQueueReceiver {
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<ProcessingJob>>>,
    stats: Arc<Mutex<QueueStats>>,
}

impl MpscJobQueueReceiver {
    /// Waits for the next job. `None` once every sender is gone.
    pub async fn recv(&self) -> Option<ProcessingJob> {
        let job = {
            let mut receiver = self.receiver.lock().await;
            receiver.recv().await
        };

        if job.is_some() {
            let mut stats = self.stats.lock().await;
            stats.total_dequeued += 1;
            stats.last_activity = Some(chrono::Utc::now());
        }

        job
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn job(name: &str) -> ProcessingJob {
        ProcessingJob::new(Uuid::new_v4(), name.to_string(), format!("/tmp/{}", name))
    }

    #[tokio::test]
    async fn test_fifo_and_stats() {
        let (queue, receiver) = MpscJobQueue::create_pair();

        queue.enqueue(job("a.txt")).await.unwrap();
        queue.enqueue(job("b.txt")).await.unwrap();
        assert_eq!(queue.size().await.unwrap(), 2);

        assert_eq!(receiver.recv().await.unwrap().filename(), "a.txt");
        assert_eq!(receiver.recv().await.unwrap().filename(), "b.txt");
        assert!(queue.is_empty().await.unwrap());

        let health = queue.health_check().await.unwrap();
        assert_eq!(health.total_enqueued, 2);
        assert_eq!(health.total_dequeued, 2);
        assert!(health.is_healthy);
        assert!(health.last_activity.is_some());
    }

    #[tokio::test]
    async fn test_rejects_started_jobs() {
        let (queue, _receiver) = MpscJobQueue::create_pair();
        let mut started = job("c.txt");
        started.start_processing().unwrap();

        assert!(matches!(
            queue.enqueue(started).await,
            Err(JobQueueError::InvalidJob(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_queue() {
        let (queue, receiver) = MpscJobQueue::create_pair();
        drop(receiver);

        assert!(matches!(
            queue.enqueue(job("d.txt")).await,
            Err(JobQueueError::Closed)
        ));
        assert!(!queue.health_check().await.unwrap().is_healthy);
    }
}
