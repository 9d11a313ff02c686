use std::sync::Arc;

use thiserror::Error;

use crate::application::services::embedding_service::EmbeddingServiceError;
use crate::application::services::{EmbeddingService, QaService};
use crate::domain::entities::RetrievedContext;

#[derive(Debug, Error)]
pub enum AskQuestionError {
    #[error("Query cannot be empty")]
    EmptyQuery,
    #[error("Question answering failed: {0}")]
    Retrieval(#[from] EmbeddingServiceError),
}

#[derive(Debug, Clone)]
pub struct AskQuestionRequest {
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct AskQuestionResponse {
    pub answer: String,
    pub sources: Vec<RetrievedContext>,
}

pub struct AskQuestionUseCase {
    embedding_service: Arc<EmbeddingService>,
    qa_service: Arc<QaService>,
    top_k: usize,
}

impl AskQuestionUseCase {
    pub fn new(
        embedding_service: Arc<EmbeddingService>,
        qa_service: Arc<QaService>,
        top_k: usize,
    ) -> Self {
        Self {
            embedding_service,
            qa_service,
            top_k: top_k.max(1),
        }
    }

    pub async fn execute(
        &self,
        request: AskQuestionRequest,
    ) -> Result<AskQuestionResponse, AskQuestionError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(AskQuestionError::EmptyQuery);
        }

        let sources = self
            .embedding_service
            .search_embeddings(query, self.top_k)
            .await?;

        tracing::info!("Retrieved {} chunks for question", sources.len());

        let answer = self.qa_service.generate_answer(query, &sources).await;

        Ok(AskQuestionResponse { answer, sources })
    }
}
