use std::sync::Arc;

use crate::application::use_cases::ProcessDocumentUseCase;
use crate::domain::entities::ProcessingJob;
use crate::domain::repositories::JobRepository;
use crate::infrastructure::messaging::MpscJobQueueReceiver;

/// Pool of workers draining the job queue. Each worker runs one ingestion at
/// a time and records every status change in the job repository.
pub struct BackgroundProcessor {
    job_receiver: Arc<MpscJobQueueReceiver>,
    job_repository: Arc<dyn JobRepository>,
    process_document: Arc<ProcessDocumentUseCase>,
    worker_count: usize,
}

impl BackgroundProcessor {
    pub fn new(
        job_receiver: Arc<MpscJobQueueReceiver>,
        job_repository: Arc<dyn JobRepository>,
        process_document: Arc<ProcessDocumentUseCase>,
    ) -> Self {
        Self {
            job_receiver,
            job_repository,
            process_document,
            worker_count: 2,
        }
    }

    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count.max(1);
        self
    }

    /// Runs until the queue's senders are all dropped.
    pub async fn start(&self) {
        tracing::info!(
            "Starting background processor with {} workers",
            self.worker_count
        );

        let handles: Vec<_> = (0..self.worker_count)
            .map(|worker_id| {
                let worker = self.clone_for_worker();
                tokio::spawn(async move { worker.worker_loop(worker_id).await })
            })
            .collect();

        for (i, result) in futures::future::join_all(handles).await.into_iter().enumerate() {
            if let Err(e) = result {
                tracing::error!("Worker {} panicked: {}", i, e);
            }
        }

        tracing::info!("Background processor stopped");
    }

    async fn worker_loop(&self, worker_id: usize) {
        tracing::debug!("Worker {} started", worker_id);

        while let Some(job) = self.job_receiver.recv().await {
            tracing::info!(
                "Worker {} processing job {} ({})",
                worker_id,
                job.id(),
                job.filename()
            );
            self.process_job(job).await;
        }

        tracing::debug!("Worker {} stopped", worker_id);
    }

    pub async fn process_job(&self, mut job: ProcessingJob) {
        let job_id = job.id();

        if let Err(e) = job.start_processing() {
            tracing::error!("Failed to start job {}: {}", job_id, e);
            return;
        }

        if let Err(e) = self.job_repository.update(&job).await {
            tracing::error!("Failed to update job {} status: {}", job_id, e);
            return;
        }

        match self.process_document.execute(&mut job).await {
            Ok(result) => {
                let chunks = result.chunks_stored;
                let elapsed = result.processing_time_ms;
                match job.complete_processing(result) {
                    Ok(()) => tracing::info!(
                        "Job {} completed: {} chunks stored in {}ms",
                        job_id,
                        chunks,
                        elapsed
                    ),
                    Err(e) => tracing::error!("Failed to complete job {}: {}", job_id, e),
                }
            }
            Err(error) => {
                let message = format!("Document processing failed: {}", error);
                tracing::warn!("Job {} failed: {}", job_id, message);
                if let Err(e) = job.fail_processing(message) {
                    tracing::error!("Failed to mark job {} as failed: {}", job_id, e);
                }
            }
        }

        if let Err(e) = self.job_repository.update(&job).await {
            tracing::error!("Failed to save final job {} state: {}", job_id, e);
        }
    }

    fn clone_for_worker(&self) -> Self {
        Self {
            job_receiver: self.job_receiver.clone(),
            job_repository: self.job_repository.clone(),
            process_document: self.process_document.clone(),
            worker_count: self.worker_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{FileStorage, JobQueue};
    use crate::application::services::embedding_service::test_support::LetterEmbeddingProvider;
    use crate::application::services::{DocumentProcessorService, EmbeddingService};
    use crate::infrastructure::external_services::document_extractors::CompositeDocumentExtractor;
    use crate::infrastructure::file_system::LocalFileStorage;
    use crate::infrastructure::memory::InMemoryJobRepository;
    use crate::infrastructure::messaging::MpscJobQueue;
    use crate::infrastructure::text_processing::RecursiveCharacterSplitter;
    use crate::infrastructure::vector_store::LocalVectorRepository;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_workers_drain_queue() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = Arc::new(LocalFileStorage::new(dir.path().join("documents")));
        let jobs = Arc::new(InMemoryJobRepository::new());
        let vectors = Arc::new(
            LocalVectorRepository::open(&dir.path().join("vectordb"), 26)
                .await
                .unwrap(),
        );

        let use_case = Arc::new(ProcessDocumentUseCase::new(
            Arc::new(DocumentProcessorService::new(
                Arc::new(CompositeDocumentExtractor::new()),
                Arc::new(RecursiveCharacterSplitter::new(1000, 200).unwrap()),
            )),
            Arc::new(EmbeddingService::new(
                Arc::new(LetterEmbeddingProvider::new()),
                vectors,
            )),
            uploads.clone(),
            Arc::new(LocalFileStorage::new(dir.path().join("processed"))),
            jobs.clone(),
        ));

        let (queue, receiver) = MpscJobQueue::create_pair();
        let processor =
            BackgroundProcessor::new(Arc::new(receiver), jobs.clone(), use_case).with_worker_count(2);

        let mut ids = Vec::new();
        for (name, body) in [("good.txt", "Some useful text."), ("empty.txt", "   ")] {
            let id = Uuid::new_v4();
            let stored = uploads
                .store_file(body.as_bytes(), &format!("{}-{}", id, name))
                .await
                .unwrap();
            let job = ProcessingJob::new(id, name.to_string(), stored.path.to_string_lossy().to_string());
            jobs.save(&job).await.unwrap();
            queue.enqueue(job).await.unwrap();
            ids.push(id);
        }

        drop(queue);
        processor.start().await;

        let good = jobs.find_by_id(ids[0]).await.unwrap().unwrap();
        assert!(good.status().is_completed());
        assert_eq!(good.result_summary().unwrap().chunks_stored, 1);

        let empty = jobs.find_by_id(ids[1]).await.unwrap().unwrap();
        assert!(empty.status().is_failed());
        assert_eq!(
            empty.error_message(),
            Some("Document processing failed: No text chunks generated from document")
        );
    }
}
