use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LanguageModelError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Model returned no text")]
    EmptyResponse,
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Text generation backend used to answer questions.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LanguageModelError>;

    fn model_name(&self) -> &str;
}
