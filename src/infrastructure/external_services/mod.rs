pub mod document_extractors;
pub mod gemini_client;
pub mod inference_client;

pub use gemini_client::GeminiClient;
pub use inference_client::InferenceEmbeddingProvider;
