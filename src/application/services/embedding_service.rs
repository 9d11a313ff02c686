use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, EmbeddingProvider, EmbeddingProviderError, EmbeddingRequest,
};
use crate::domain::entities::{ContentChunk, Embedding, RetrievedContext};
use crate::domain::repositories::VectorRepository;
use crate::domain::repositories::vector_repository::{IndexedChunk, VectorRepositoryError};

const BATCH_SIZE: usize = 10;

#[derive(Debug, Error)]
pub enum EmbeddingServiceError {
    #[error("Embedding generation failed: {0}")]
    ProviderError(#[from] EmbeddingProviderError),
    #[error("Vector store error: {0}")]
    RepositoryError(#[from] VectorRepositoryError),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Embeds chunks into the vector index and runs similarity search over it.
pub struct EmbeddingService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_repository: Arc<dyn VectorRepository>,
}

impl EmbeddingService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_repository: Arc<dyn VectorRepository>,
    ) -> Self {
        Self {
            embedding_provider,
            vector_repository,
        }
    }

    /// Embeds and stores chunks whose ids are not indexed yet.
    /// Returns the number of chunks newly stored.
    pub async fn store_embeddings(
        &self,
        chunks: &[ContentChunk],
    ) -> Result<usize, EmbeddingServiceError> {
        let ids: Vec<String> = chunks.iter().map(|c| c.id().to_string()).collect();
        let existing = self.vector_repository.existing_ids(&ids).await?;

        let pending: Vec<&ContentChunk> = chunks
            .iter()
            .filter(|chunk| !chunk.is_empty() && !existing.contains(chunk.id()))
            .collect();

        if pending.len() < chunks.len() {
            tracing::info!(
                "Skipping {} chunks that are empty or already indexed",
                chunks.len() - pending.len()
            );
        }

        let mut stored = 0;
        for batch in pending.chunks(BATCH_SIZE) {
            let request = BatchEmbeddingRequest {
                texts: batch.iter().map(|c| c.chunk_text().to_string()).collect(),
            };

            let response = self.embedding_provider.generate_embeddings(request).await?;

            if response.embeddings.len() != batch.len() {
                return Err(EmbeddingServiceError::ValidationError(format!(
                    "Expected {} embeddings, received {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }

            let records: Vec<IndexedChunk> = batch
                .iter()
                .zip(response.embeddings)
                .map(|(chunk, vector)| IndexedChunk {
                    chunk: (*chunk).clone(),
                    embedding: Embedding::new(
                        chunk.id().to_string(),
                        response.model_name.clone(),
                        vector,
                    ),
                })
                .collect();

            stored += self.vector_repository.add(&records).await?;
        }

        Ok(stored)
    }

    pub async fn search_embeddings(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedContext>, EmbeddingServiceError> {
        if query.trim().is_empty() {
            return Err(EmbeddingServiceError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }

        let response = self
            .embedding_provider
            .generate_embedding(EmbeddingRequest {
                text: query.to_string(),
            })
            .await?;

        let results = self
            .vector_repository
            .query(&response.embedding, top_k)
            .await?;

        Ok(results)
    }

    pub async fn indexed_chunk_count(&self) -> Result<usize, EmbeddingServiceError> {
        Ok(self.vector_repository.count().await?)
    }

    pub fn model_name(&self) -> &str {
        self.embedding_provider.model_name()
    }

    pub async fn provider_healthy(&self) -> bool {
        match self.embedding_provider.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Embedding provider health check failed: {}", e);
                false
            }
        }
    }
}
