use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{FileStorage, JobQueue};
use crate::domain::entities::ProcessingJob;
use crate::domain::repositories::JobRepository;

pub const QUEUED_MESSAGE: &str = "Documents queued for processing";

#[derive(Debug, Error)]
pub enum UploadBatchError {
    #[error("No files provided")]
    NoFiles,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadBatchRequest {
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueuedFile {
    pub filename: String,
    pub status: String,
    pub job_id: Option<Uuid>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadBatchResponse {
    pub message: String,
    pub results: Vec<QueuedFile>,
}

/// Stages every uploaded file on disk and queues one processing job per file.
pub struct UploadBatchUseCase {
    file_storage: Arc<dyn FileStorage>,
    job_repository: Arc<dyn JobRepository>,
    job_queue: Arc<dyn JobQueue>,
}

impl UploadBatchUseCase {
    pub fn new(
        file_storage: Arc<dyn FileStorage>,
        job_repository: Arc<dyn JobRepository>,
        job_queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            file_storage,
            job_repository,
            job_queue,
        }
    }

    pub async fn execute(
        &self,
        request: UploadBatchRequest,
    ) -> Result<UploadBatchResponse, UploadBatchError> {
        if request.files.is_empty() {
            return Err(UploadBatchError::NoFiles);
        }

        let mut results = Vec::with_capacity(request.files.len());
        for file in request.files {
            let filename = sanitize_filename(&file.filename);

            match self.queue_file(&filename, &file.content).await {
                Ok(job_id) => results.push(QueuedFile {
                    filename,
                    status: "queued".to_string(),
                    job_id: Some(job_id),
                    error: None,
                }),
                Err(error) => {
                    tracing::error!("Failed to queue {}: {}", filename, error);
                    results.push(QueuedFile {
                        filename,
                        status: "failed".to_string(),
                        job_id: None,
                        error: Some(error),
                    });
                }
            }
        }

        Ok(UploadBatchResponse {
            message: QUEUED_MESSAGE.to_string(),
            results,
        })
    }

    async fn queue_file(&self, filename: &str, content: &[u8]) -> Result<Uuid, String> {
        let job_id = Uuid::new_v4();

        // job id prefix keeps concurrent uploads of the same name apart
        let stored = self
            .file_storage
            .store_file(content, &format!("{}-{}", job_id, filename))
            .await
            .map_err(|e| e.to_string())?;

        let mut job = ProcessingJob::new(
            job_id,
            filename.to_string(),
            stored.path.to_string_lossy().to_string(),
        );

        if let Err(e) = self.job_repository.save(&job).await {
            self.discard_staged(&stored.path).await;
            return Err(e.to_string());
        }

        if let Err(e) = self.job_queue.enqueue(job.clone()).await {
            let error = e.to_string();
            self.discard_staged(&stored.path).await;

            match job.reject(format!("Failed to queue job: {}", error)) {
                Ok(()) => {
                    if let Err(e) = self.job_repository.update(&job).await {
                        tracing::error!("Failed to mark job {} as failed: {}", job_id, e);
                    }
                }
                Err(e) => tracing::error!("Failed to mark job {} as failed: {}", job_id, e),
            }
            return Err(error);
        }

        tracing::info!(
            "Queued {} ({} bytes) as job {}",
            filename,
            content.len(),
            job_id
        );
        Ok(job_id)
    }

    async fn discard_staged(&self, path: &Path) {
        if let Err(e) = self.file_storage.delete_file(path).await {
            tracing::warn!("Failed to remove staged upload {}: {}", path.display(), e);
        }
    }
}

/// Keeps only the final path component of a client-supplied filename.
pub fn sanitize_filename(raw: &str) -> String {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    if name.is_empty() || name == "." || name == ".." {
        "upload".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::file_system::LocalFileStorage;
    use crate::infrastructure::memory::InMemoryJobRepository;
    use crate::domain::repositories::job_repository::JobRepositoryError;
    use crate::infrastructure::messaging::MpscJobQueue;
    use async_trait::async_trait;

    struct ReadOnlyJobRepository;

    #[async_trait]
    impl JobRepository for ReadOnlyJobRepository {
        async fn save(&self, _job: &ProcessingJob) -> Result<(), JobRepositoryError> {
            Err(JobRepositoryError::StorageError("read-only".to_string()))
        }

        async fn find_by_id(
            &self,
            _job_id: Uuid,
        ) -> Result<Option<ProcessingJob>, JobRepositoryError> {
            Ok(None)
        }

        async fn find_recent(&self, _limit: usize) -> Result<Vec<ProcessingJob>, JobRepositoryError> {
            Ok(Vec::new())
        }

        async fn find_active_jobs(&self) -> Result<Vec<ProcessingJob>, JobRepositoryError> {
            Ok(Vec::new())
        }

        async fn update(&self, job: &ProcessingJob) -> Result<(), JobRepositoryError> {
            Err(JobRepositoryError::NotFound(job.id()))
        }

        async fn count_active_jobs(&self) -> Result<usize, JobRepositoryError> {
            Ok(0)
        }
    }

    fn one_file(name: &str) -> UploadBatchRequest {
        UploadBatchRequest {
            files: vec![UploadedFile {
                filename: name.to_string(),
                content: b"content".to_vec(),
            }],
        }
    }

    fn staged_files(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\scan.png"), "scan.png");
        assert_eq!(sanitize_filename("dir/"), "upload");
        assert_eq!(sanitize_filename(".."), "upload");
    }

    #[tokio::test]
    async fn test_queues_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalFileStorage::new(dir.path().to_path_buf()));
        let jobs = Arc::new(InMemoryJobRepository::new());
        let (queue, receiver) = MpscJobQueue::create_pair();
        let use_case = UploadBatchUseCase::new(storage, jobs.clone(), Arc::new(queue));

        let response = use_case
            .execute(UploadBatchRequest {
                files: vec![
                    UploadedFile {
                        filename: "a.txt".to_string(),
                        content: b"alpha".to_vec(),
                    },
                    UploadedFile {
                        filename: "nested/b.txt".to_string(),
                        content: b"beta".to_vec(),
                    },
                ],
            })
            .await
            .unwrap();

        assert_eq!(response.message, QUEUED_MESSAGE);
        assert_eq!(response.results.len(), 2);
        assert!(response.results.iter().all(|r| r.status == "queued"));
        assert_eq!(response.results[1].filename, "b.txt");

        let first = receiver.recv().await.unwrap();
        assert_eq!(first.filename(), "a.txt");
        assert_eq!(tokio::fs::read(first.file_path()).await.unwrap(), b"alpha");

        let job_id = response.results[0].job_id.unwrap();
        assert!(jobs.find_by_id(job_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_empty_request() {
        let dir = tempfile::tempdir().unwrap();
        let (queue, _receiver) = MpscJobQueue::create_pair();
        let use_case = UploadBatchUseCase::new(
            Arc::new(LocalFileStorage::new(dir.path().to_path_buf())),
            Arc::new(InMemoryJobRepository::new()),
            Arc::new(queue),
        );

        assert!(matches!(
            use_case.execute(UploadBatchRequest { files: vec![] }).await,
            Err(UploadBatchError::NoFiles)
        ));
    }

    #[tokio::test]
    async fn test_closed_queue_marks_job_failed() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = Arc::new(InMemoryJobRepository::new());
        let (queue, receiver) = MpscJobQueue::create_pair();
        drop(receiver);
        let use_case = UploadBatchUseCase::new(
            Arc::new(LocalFileStorage::new(dir.path().to_path_buf())),
            jobs.clone(),
            Arc::new(queue),
        );

        let response = use_case.execute(one_file("a.txt")).await.unwrap();
        assert_eq!(response.results[0].status, "failed");
        assert!(response.results[0].job_id.is_none());

        let recorded = jobs.find_recent(10).await.unwrap();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].status().is_failed());
        assert!(jobs.find_active_jobs().await.unwrap().is_empty());
        assert_eq!(staged_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_unsaved_job_removes_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let (queue, _receiver) = MpscJobQueue::create_pair();
        let use_case = UploadBatchUseCase::new(
            Arc::new(LocalFileStorage::new(dir.path().to_path_buf())),
            Arc::new(ReadOnlyJobRepository),
            Arc::new(queue),
        );

        let response = use_case.execute(one_file("b.txt")).await.unwrap();
        assert_eq!(response.results[0].status, "failed");
        assert_eq!(
            response.results[0].error.as_deref(),
            Some("Storage error: read-only")
        );
        assert_eq!(staged_files(dir.path()), 0);
    }
}
