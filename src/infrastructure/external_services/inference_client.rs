use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
    EmbeddingRequest, EmbeddingResponse,
};
use crate::config::EmbeddingSettings;

#[derive(Serialize)]
pub struct EmbeddingsRequest {
    pub text: TextInput,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Deserialize)]
pub struct EmbeddingsResponse {
    pub embeddings: Vec<Vec<f32>>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub shape: Option<Vec<usize>>,
}

#[derive(Debug)]
pub enum EmbeddingsError {
    RequestError(String),
    RateLimited,
    Status { status: u16, body: String },
    ParseError(String),
}

impl EmbeddingsError {
    fn is_retryable(&self) -> bool {
        match self {
            EmbeddingsError::RequestError(_) | EmbeddingsError::RateLimited => true,
            EmbeddingsError::Status { status, .. } => *status >= 500,
            EmbeddingsError::ParseError(_) => false,
        }
    }
}

impl From<EmbeddingsError> for EmbeddingProviderError {
    fn from(error: EmbeddingsError) -> Self {
        match error {
            EmbeddingsError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
            EmbeddingsError::RateLimited => EmbeddingProviderError::RateLimitExceeded,
            EmbeddingsError::Status { status, body } if status >= 500 => {
                EmbeddingProviderError::ServiceUnavailable(format!("{}: {}", status, body))
            }
            EmbeddingsError::Status { status, body } => {
                EmbeddingProviderError::ApiError(format!("{}: {}", status, body))
            }
            EmbeddingsError::ParseError(msg) => EmbeddingProviderError::ApiError(msg),
        }
    }
}

/// HTTP client for the sentence-embedding service.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    settings: EmbeddingSettings,
}

impl InferenceClient {
    pub fn new(settings: EmbeddingSettings) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { client, settings })
    }

    pub async fn get_embedding(&self, text: &str) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let request = EmbeddingsRequest {
            text: TextInput::Single(text.to_string()),
        };

        self.send_request(request).await
    }

    pub async fn get_embeddings(
        &self,
        texts: &[String],
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let request = EmbeddingsRequest {
            text: TextInput::Multiple(texts.to_vec()),
        };

        self.send_request(request).await
    }

    async fn send_request(
        &self,
        request: EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_request(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if !e.is_retryable() || attempts > self.settings.max_retries => {
                    return Err(e);
                }
                Err(e) => {
                    let backoff_time = backoff(self.settings.backoff_factor, attempts);
                    tracing::warn!(
                        "Embedding request failed (attempt {}): {:?}; retrying in {:?}",
                        attempts,
                        e,
                        backoff_time
                    );
                    tokio::time::sleep(backoff_time).await;
                }
            }
        }
    }

    async fn execute_request(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let response = self
            .client
            .post(&self.settings.service_url)
            .json(request)
            .send()
            .await
            .map_err(|e| EmbeddingsError::RequestError(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbeddingsError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<EmbeddingsResponse>()
            .await
            .map_err(|e| EmbeddingsError::ParseError(e.to_string()))
    }
}

fn backoff(factor: f64, attempt: u32) -> Duration {
    Duration::from_millis((factor.powi(attempt as i32 - 1) * 1000.0) as u64)
}

// Adapter to implement the EmbeddingProvider trait
pub struct InferenceEmbeddingProvider {
    client: InferenceClient,
    model_name: String,
    dimension: usize,
}

impl InferenceEmbeddingProvider {
    pub fn new(settings: EmbeddingSettings) -> Result<Self, ReqwestError> {
        let model_name = settings.model_name.clone();
        let dimension = settings.dimension;
        let client = InferenceClient::new(settings)?;

        Ok(Self {
            client,
            model_name,
            dimension,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for InferenceEmbeddingProvider {
    async fn generate_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        if request.text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "text must not be empty".to_string(),
            ));
        }

        let response = self.client.get_embedding(&request.text).await?;

        let embedding = response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingProviderError::ApiError("No embeddings returned".to_string()))?;

        Ok(EmbeddingResponse {
            embedding,
            model_name: self.model_name.clone(),
        })
    }

    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        if request.texts.is_empty() {
            return Ok(BatchEmbeddingResponse {
                embeddings: Vec::new(),
                model_name: self.model_name.clone(),
            });
        }

        let response = self.client.get_embeddings(&request.texts).await?;

        if response.embeddings.len() != request.texts.len() {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Expected {} embeddings, got {}",
                request.texts.len(),
                response.embeddings.len()
            )));
        }

        Ok(BatchEmbeddingResponse {
            embeddings: response.embeddings,
            model_name: self.model_name.clone(),
        })
    }

    async fn health_check(&self) -> Result<bool, EmbeddingProviderError> {
        let test_request = EmbeddingRequest {
            text: "health check".to_string(),
        };

        match self.generate_embedding(test_request).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Embedding service health check failed: {}", e);
                Ok(false)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::State, http::StatusCode as AxumStatus, routing::post};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Embedding service that answers `failures` (status) first, then succeeds.
    async fn spawn_flaky_service(failures: Vec<u16>) -> (String, Arc<AtomicUsize>) {
        let attempts = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(failures);

        let router = Router::new()
            .route(
                "/embed",
                post(
                    |State((attempts, failures)): State<(Arc<AtomicUsize>, Arc<Vec<u16>>)>,
                     Json(body): Json<Value>| async move {
                        let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                        match failures.get(attempt) {
                            Some(&status) => (
                                AxumStatus::from_u16(status).unwrap(),
                                Json(json!({"detail": "busy"})),
                            ),
                            None => {
                                let count = body["text"].as_array().map_or(1, |texts| texts.len());
                                (
                                    AxumStatus::OK,
                                    Json(json!({"embeddings": vec![vec![0.5, 0.5]; count]})),
                                )
                            }
                        }
                    },
                ),
            )
            .with_state((attempts.clone(), failures));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (format!("http://{}/embed", addr), attempts)
    }

    fn settings(service_url: String, max_retries: u32) -> EmbeddingSettings {
        EmbeddingSettings {
            service_url,
            model_name: "all-MiniLM-L6-v2".to_string(),
            dimension: 2,
            max_retries,
            timeout_secs: 5,
            backoff_factor: 1.5,
        }
    }

    #[tokio::test]
    async fn test_retries_until_service_recovers() {
        let (url, attempts) = spawn_flaky_service(vec![429, 503]).await;
        let provider = InferenceEmbeddingProvider::new(settings(url, 3)).unwrap();

        let response = provider
            .generate_embeddings(BatchEmbeddingRequest {
                texts: vec!["one".to_string(), "two".to_string()],
            })
            .await
            .unwrap();

        assert_eq!(response.embeddings.len(), 2);
        assert_eq!(response.model_name, "all-MiniLM-L6-v2");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_rate_limit_after_retries_exhausted() {
        let (url, attempts) = spawn_flaky_service(vec![429, 429, 429]).await;
        let provider = InferenceEmbeddingProvider::new(settings(url, 1)).unwrap();

        let result = provider
            .generate_embedding(EmbeddingRequest {
                text: "hello".to_string(),
            })
            .await;

        assert!(matches!(result, Err(EmbeddingProviderError::RateLimitExceeded)));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let (url, attempts) = spawn_flaky_service(vec![422]).await;
        let provider = InferenceEmbeddingProvider::new(settings(url, 3)).unwrap();

        let result = provider
            .generate_embedding(EmbeddingRequest {
                text: "hello".to_string(),
            })
            .await;

        assert!(matches!(result, Err(EmbeddingProviderError::ApiError(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_request_wire_format() {
        let single = EmbeddingsRequest {
            text: TextInput::Single("Hello world".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&single).unwrap(),
            serde_json::json!({"text": "Hello world"})
        );

        let multiple = EmbeddingsRequest {
            text: TextInput::Multiple(vec!["Hello".to_string(), "World".to_string()]),
        };
        assert_eq!(
            serde_json::to_value(&multiple).unwrap(),
            serde_json::json!({"text": ["Hello", "World"]})
        );
    }

    #[test]
    fn test_response_parsing() {
        let minimal: EmbeddingsResponse =
            serde_json::from_str(r#"{"embeddings": [[0.1, 0.2]]}"#).unwrap();
        assert_eq!(minimal.embeddings, vec![vec![0.1, 0.2]]);

        let full: EmbeddingsResponse = serde_json::from_str(
            r#"{"success": true, "input_text": "x", "embeddings": [[1.0]], "shape": [1, 1]}"#,
        )
        .unwrap();
        assert_eq!(full.shape, Some(vec![1, 1]));
    }

    #[test]
    fn test_backoff_schedule() {
        assert_eq!(backoff(1.5, 1), Duration::from_millis(1000));
        assert_eq!(backoff(1.5, 2), Duration::from_millis(1500));
        assert_eq!(backoff(1.5, 3), Duration::from_millis(2250));
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            EmbeddingProviderError::from(EmbeddingsError::RateLimited),
            EmbeddingProviderError::RateLimitExceeded
        ));
        assert!(matches!(
            EmbeddingProviderError::from(EmbeddingsError::Status {
                status: 503,
                body: String::new()
            }),
            EmbeddingProviderError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            EmbeddingProviderError::from(EmbeddingsError::Status {
                status: 422,
                body: "bad".to_string()
            }),
            EmbeddingProviderError::ApiError(_)
        ));
        assert!(!EmbeddingsError::Status { status: 400, body: String::new() }.is_retryable());
        assert!(EmbeddingsError::RateLimited.is_retryable());
    }
}
