use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::FileStorage;
use crate::application::use_cases::process_document::artifact_name;
use crate::domain::repositories::VectorRepository;
use crate::domain::repositories::vector_repository::VectorRepositoryError;

#[derive(Debug, Error)]
pub enum DeleteDocumentError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Vector store error: {0}")]
    Repository(#[from] VectorRepositoryError),
}

#[derive(Debug, Clone)]
pub struct DeleteDocumentResponse {
    pub document_id: String,
    pub chunks_deleted: usize,
}

/// Drops a document's chunks from the index along with its processed artifact.
pub struct DeleteDocumentUseCase {
    vector_repository: Arc<dyn VectorRepository>,
    processed_storage: Arc<dyn FileStorage>,
}

impl DeleteDocumentUseCase {
    pub fn new(
        vector_repository: Arc<dyn VectorRepository>,
        processed_storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            vector_repository,
            processed_storage,
        }
    }

    pub async fn execute(
        &self,
        document_id: &str,
    ) -> Result<DeleteDocumentResponse, DeleteDocumentError> {
        let chunks_deleted = self.vector_repository.delete_document(document_id).await?;
        if chunks_deleted == 0 {
            return Err(DeleteDocumentError::NotFound(document_id.to_string()));
        }

        let artifact = self
            .processed_storage
            .base_path()
            .join(artifact_name(document_id));
        if let Err(e) = self.processed_storage.delete_file(&artifact).await {
            tracing::warn!("Failed to remove artifact for {}: {}", document_id, e);
        }

        tracing::info!("Deleted {} chunks of {}", chunks_deleted, document_id);
        Ok(DeleteDocumentResponse {
            document_id: document_id.to_string(),
            chunks_deleted,
        })
    }
}
