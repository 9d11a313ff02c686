use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::infrastructure::container::AppContainer;
use crate::infrastructure::messaging::BackgroundProcessor;
use crate::presentation::http::{
    handlers::{DocumentHandler, HealthHandler, JobHandler, QaHandler, UploadHandler},
    routes::{
        docs_routes, document_routes, health_routes, job_routes, qa_routes, upload_routes,
    },
};

pub struct HttpServer {
    qa_handler: Arc<QaHandler>,
    upload_handler: Arc<UploadHandler>,
    job_handler: Arc<JobHandler>,
    document_handler: Arc<DocumentHandler>,
    health_handler: Arc<HealthHandler>,
    background_processor: Arc<BackgroundProcessor>,
    host: String,
    port: u16,
    max_upload_bytes: usize,
}

impl HttpServer {
    pub fn new(container: &AppContainer) -> Self {
        Self {
            qa_handler: container.qa_handler.clone(),
            upload_handler: container.upload_handler.clone(),
            job_handler: container.job_handler.clone(),
            document_handler: container.document_handler.clone(),
            health_handler: container.health_handler.clone(),
            background_processor: container.background_processor.clone(),
            host: container.config.host.clone(),
            port: container.config.port,
            max_upload_bytes: container.config.max_upload_bytes,
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(health_routes(self.health_handler.clone()))
            .merge(docs_routes())
            .merge(qa_routes(self.qa_handler.clone()))
            .merge(upload_routes(
                self.upload_handler.clone(),
                self.max_upload_bytes,
            ))
            .merge(job_routes(self.job_handler.clone()))
            .merge(document_routes(self.document_handler.clone()))
            .layer(cors)
            .layer(RequestBodyLimitLayer::new(self.max_upload_bytes))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                "Received request: {} {}",
                                request.method(),
                                request.uri()
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "Response: {} (took {} ms)",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                "Request failed: {:?} (took {} ms)",
                                error,
                                latency.as_millis()
                            );
                        },
                    ),
            )
    }

    /// Starts the ingestion workers, then serves until the listener fails.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let background_processor = self.background_processor.clone();
        tokio::spawn(async move {
            background_processor.start().await;
        });

        let app = self.router();

        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        let addr = listener.local_addr()?;
        tracing::info!("API listening on http://{}", addr);
        tracing::info!("Swagger UI available at http://{}/docs", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
