use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::application::ports::JobQueue;
use crate::application::services::{EmbeddingService, QaService};
use crate::presentation::http::dto::{
    DependenciesResponseDto, DependencyStatusDto, HealthResponseDto, QueueStatusDto,
};

pub struct HealthHandler {
    embedding_service: Arc<EmbeddingService>,
    qa_service: Arc<QaService>,
    job_queue: Arc<dyn JobQueue>,
}

impl HealthHandler {
    pub fn new(
        embedding_service: Arc<EmbeddingService>,
        qa_service: Arc<QaService>,
        job_queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            embedding_service,
            qa_service,
            job_queue,
        }
    }

    pub async fn health(State(handler): State<Arc<HealthHandler>>) -> impl IntoResponse {
        let (status, documents_indexed) =
            match handler.embedding_service.indexed_chunk_count().await {
                Ok(count) => ("healthy", count),
                Err(e) => {
                    tracing::error!("Vector store unavailable: {}", e);
                    ("degraded", 0)
                }
            };

        (
            StatusCode::OK,
            Json(HealthResponseDto {
                status: status.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                documents_indexed,
            }),
        )
    }

    /// Probes the embedding service and the language model.
    pub async fn dependencies(State(handler): State<Arc<HealthHandler>>) -> impl IntoResponse {
        let (embeddings_ok, llm_ok, queue) = tokio::join!(
            handler.embedding_service.provider_healthy(),
            handler.qa_service.validate_api_key(),
            handler.job_queue.health_check(),
        );

        let job_queue = match queue {
            Ok(health) => QueueStatusDto {
                healthy: health.is_healthy,
                pending: health.queue_size,
                total_enqueued: health.total_enqueued,
                total_dequeued: health.total_dequeued,
            },
            Err(e) => {
                tracing::error!("Job queue health check failed: {}", e);
                QueueStatusDto {
                    healthy: false,
                    pending: 0,
                    total_enqueued: 0,
                    total_dequeued: 0,
                }
            }
        };

        let all_ok = embeddings_ok && llm_ok && job_queue.healthy;
        let status_code = if all_ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        (
            status_code,
            Json(DependenciesResponseDto {
                status: if all_ok { "healthy" } else { "degraded" }.to_string(),
                embedding_service: DependencyStatusDto {
                    healthy: embeddings_ok,
                    model: handler.embedding_service.model_name().to_string(),
                },
                language_model: DependencyStatusDto {
                    healthy: llm_ok,
                    model: handler.qa_service.model_name().to_string(),
                },
                job_queue,
            }),
        )
    }
}
