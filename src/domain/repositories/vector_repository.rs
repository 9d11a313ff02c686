use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::{ContentChunk, Embedding, RetrievedContext};
use crate::domain::value_objects::DocumentType;

/// Name of the single collection every backend stores chunks in.
pub const COLLECTION_NAME: &str = "document_embeddings";

#[derive(Debug, Error)]
pub enum VectorRepositoryError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// A chunk together with its embedding, as written to the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedChunk {
    pub chunk: ContentChunk,
    pub embedding: Embedding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub document_id: String,
    pub filename: String,
    pub file_type: DocumentType,
    pub chunk_count: usize,
}

#[async_trait]
pub trait VectorRepository: Send + Sync {
    /// Adds chunks, skipping ids that are already present. Returns how many were inserted.
    async fn add(&self, records: &[IndexedChunk]) -> Result<usize, VectorRepositoryError>;

    async fn existing_ids(&self, ids: &[String]) -> Result<HashSet<String>, VectorRepositoryError>;

    /// Closest chunks by cosine distance, ascending, at most `top_k`.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedContext>, VectorRepositoryError>;

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, VectorRepositoryError>;

    /// Removes every chunk of a document. Returns the number of chunks removed.
    async fn delete_document(&self, document_id: &str) -> Result<usize, VectorRepositoryError>;

    async fn count(&self) -> Result<usize, VectorRepositoryError>;
}
