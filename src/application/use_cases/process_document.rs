use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::application::ports::FileStorage;
use crate::application::ports::file_storage::FileStorageError;
use crate::application::services::document_processor::DocumentProcessingError;
use crate::application::services::embedding_service::EmbeddingServiceError;
use crate::application::services::{DocumentProcessorService, EmbeddingService};
use crate::domain::entities::{ContentChunk, JobResult, ProcessedDocument, ProcessingJob};
use crate::domain::repositories::JobRepository;
use crate::domain::value_objects::{DocumentId, DocumentType, FileHash};

#[derive(Debug, Error)]
pub enum ProcessDocumentError {
    #[error("No text chunks generated from document")]
    NoChunks,
    #[error(transparent)]
    Processing(#[from] DocumentProcessingError),
    #[error(transparent)]
    Embedding(#[from] EmbeddingServiceError),
    #[error("Storage error: {0}")]
    Storage(#[from] FileStorageError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON record written to the processed-documents directory for each ingested file.
#[derive(Debug, Serialize)]
pub struct ProcessedArtifact<'a> {
    pub document_id: &'a str,
    pub file_hash: &'a str,
    pub filename: &'a str,
    pub file_type: DocumentType,
    pub total_chunks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_format: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_mode: Option<&'a str>,
    pub processed_at: DateTime<Utc>,
    pub text: &'a str,
    pub chunks: &'a [String],
}

/// Runs one queued job end to end. The staged upload is always removed afterwards.
pub struct ProcessDocumentUseCase {
    document_processor: Arc<DocumentProcessorService>,
    embedding_service: Arc<EmbeddingService>,
    upload_storage: Arc<dyn FileStorage>,
    processed_storage: Arc<dyn FileStorage>,
    job_repository: Arc<dyn JobRepository>,
}

impl ProcessDocumentUseCase {
    pub fn new(
        document_processor: Arc<DocumentProcessorService>,
        embedding_service: Arc<EmbeddingService>,
        upload_storage: Arc<dyn FileStorage>,
        processed_storage: Arc<dyn FileStorage>,
        job_repository: Arc<dyn JobRepository>,
    ) -> Self {
        Self {
            document_processor,
            embedding_service,
            upload_storage,
            processed_storage,
            job_repository,
        }
    }

    pub async fn execute(
        &self,
        job: &mut ProcessingJob,
    ) -> Result<JobResult, ProcessDocumentError> {
        let file_path = Path::new(job.file_path()).to_path_buf();
        let result = self.run(job, &file_path).await;

        match self.upload_storage.delete_file(&file_path).await {
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", file_path.display(), e),
        }

        result
    }

    async fn run(
        &self,
        job: &mut ProcessingJob,
        file_path: &Path,
    ) -> Result<JobResult, ProcessDocumentError> {
        let start_time = std::time::Instant::now();
        let filename = job.filename().to_string();

        self.report(job, 0.2, "Extracting text").await;
        let processed = self
            .document_processor
            .process_document(file_path, &filename)
            .await?;

        if !processed.has_chunks() {
            return Err(ProcessDocumentError::NoChunks);
        }

        let content = self.upload_storage.retrieve_file(file_path).await?;
        let file_hash = FileHash::from_bytes(&content);
        let document_id = DocumentId::new(&filename, &file_hash);

        let chunks: Vec<ContentChunk> = processed
            .chunks
            .iter()
            .enumerate()
            .map(|(index, text)| {
                ContentChunk::new(
                    &document_id,
                    index,
                    text.clone(),
                    &filename,
                    processed.file_type,
                )
            })
            .collect();

        self.report(job, 0.5, "Generating embeddings").await;
        let stored = self.embedding_service.store_embeddings(&chunks).await?;

        self.report(job, 0.9, "Saving processed document").await;
        self.write_artifact(&document_id, &file_hash, &processed)
            .await?;

        Ok(JobResult {
            document_id: document_id.to_string(),
            file_type: processed.file_type,
            chunks_created: chunks.len(),
            chunks_stored: stored,
            page_count: processed.page_count,
            extracted_text_length: processed.text.chars().count(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    async fn write_artifact(
        &self,
        document_id: &DocumentId,
        file_hash: &FileHash,
        processed: &ProcessedDocument,
    ) -> Result<(), ProcessDocumentError> {
        let artifact = ProcessedArtifact {
            document_id: document_id.as_str(),
            file_hash: file_hash.as_str(),
            filename: &processed.filename,
            file_type: processed.file_type,
            total_chunks: processed.total_chunks(),
            page_count: processed.page_count,
            image_format: processed.image_format.as_deref(),
            image_mode: processed.image_mode.as_deref(),
            processed_at: Utc::now(),
            text: &processed.text,
            chunks: &processed.chunks,
        };

        let bytes = serde_json::to_vec_pretty(&artifact)?;
        self.processed_storage
            .store_file(&bytes, &artifact_name(document_id.as_str()))
            .await?;
        Ok(())
    }

    async fn report(&self, job: &mut ProcessingJob, progress: f32, stage: &str) {
        if job.update_progress(progress, stage).is_err() {
            return;
        }
        if let Err(e) = self.job_repository.update(job).await {
            tracing::warn!("Failed to record progress for job {}: {}", job.id(), e);
        }
    }
}

pub fn artifact_name(document_id: &str) -> String {
    format!("{}.json", document_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::embedding_service::test_support::LetterEmbeddingProvider;
    use crate::infrastructure::external_services::document_extractors::CompositeDocumentExtractor;
    use crate::infrastructure::file_system::LocalFileStorage;
    use crate::infrastructure::memory::InMemoryJobRepository;
    use crate::infrastructure::text_processing::RecursiveCharacterSplitter;
    use crate::infrastructure::vector_store::LocalVectorRepository;
    use crate::domain::repositories::VectorRepository;
    use uuid::Uuid;

    struct Fixture {
        use_case: ProcessDocumentUseCase,
        uploads: Arc<LocalFileStorage>,
        processed_dir: std::path::PathBuf,
        vectors: Arc<LocalVectorRepository>,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let uploads = Arc::new(LocalFileStorage::new(dir.path().join("documents")));
        let processed_dir = dir.path().join("processed");
        let processed = Arc::new(LocalFileStorage::new(processed_dir.clone()));
        let vectors = Arc::new(
            LocalVectorRepository::open(&dir.path().join("vectordb"), 26)
                .await
                .unwrap(),
        );

        let processor = Arc::new(DocumentProcessorService::new(
            Arc::new(CompositeDocumentExtractor::new()),
            Arc::new(RecursiveCharacterSplitter::new(100, 20).unwrap()),
        ));
        let embeddings = Arc::new(EmbeddingService::new(
            Arc::new(LetterEmbeddingProvider::new()),
            vectors.clone(),
        ));

        Fixture {
            use_case: ProcessDocumentUseCase::new(
                processor,
                embeddings,
                uploads.clone(),
                processed,
                Arc::new(InMemoryJobRepository::new()),
            ),
            uploads,
            processed_dir,
            vectors,
            _dir: dir,
        }
    }

    async fn staged_job(uploads: &LocalFileStorage, name: &str, content: &[u8]) -> ProcessingJob {
        let id = Uuid::new_v4();
        let stored = uploads
            .store_file(content, &format!("{}-{}", id, name))
            .await
            .unwrap();
        let mut job = ProcessingJob::new(
            id,
            name.to_string(),
            stored.path.to_string_lossy().to_string(),
        );
        job.start_processing().unwrap();
        job
    }

    #[tokio::test]
    async fn test_text_document_is_indexed() {
        let fx = fixture().await;
        let text = "Rust is a systems programming language. ".repeat(10);
        let mut job = staged_job(&fx.uploads, "rust.txt", text.as_bytes()).await;

        let result = fx.use_case.execute(&mut job).await.unwrap();

        let expected_id = DocumentId::new("rust.txt", &FileHash::from_bytes(text.as_bytes()));
        assert_eq!(result.document_id, expected_id.as_str());
        assert_eq!(result.file_type, DocumentType::Text);
        assert!(result.chunks_created > 1);
        assert_eq!(result.chunks_stored, result.chunks_created);
        assert_eq!(fx.vectors.count().await.unwrap(), result.chunks_created);

        // staged upload removed, artifact written
        assert!(!Path::new(job.file_path()).exists());
        let artifact = fx.processed_dir.join(artifact_name(expected_id.as_str()));
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(artifact).unwrap()).unwrap();
        assert_eq!(json["filename"], "rust.txt");
        assert_eq!(json["file_type"], "text");
        assert_eq!(json["total_chunks"], result.chunks_created);
    }

    #[tokio::test]
    async fn test_reupload_adds_nothing() {
        let fx = fixture().await;
        let text = b"The same document uploaded twice under one name.";

        let mut first = staged_job(&fx.uploads, "twice.txt", text).await;
        let first_result = fx.use_case.execute(&mut first).await.unwrap();

        let mut second = staged_job(&fx.uploads, "twice.txt", text).await;
        let second_result = fx.use_case.execute(&mut second).await.unwrap();

        assert_eq!(first_result.document_id, second_result.document_id);
        assert_eq!(first_result.chunks_stored, 1);
        assert_eq!(second_result.chunks_stored, 0);
        assert_eq!(fx.vectors.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_blank_document_fails_and_is_cleaned_up() {
        let fx = fixture().await;
        let mut job = staged_job(&fx.uploads, "blank.txt", b"   \n\n  ").await;

        let err = fx.use_case.execute(&mut job).await.unwrap_err();

        assert_eq!(err.to_string(), "No text chunks generated from document");
        assert!(!Path::new(job.file_path()).exists());
    }

    #[tokio::test]
    async fn test_excel_fails() {
        let fx = fixture().await;
        let mut job = staged_job(&fx.uploads, "book.xlsx", b"PK\x03\x04xl/workbook.xml").await;

        let err = fx.use_case.execute(&mut job).await.unwrap_err();
        assert_eq!(err.to_string(), "Unsupported document type: excel");
    }
}
