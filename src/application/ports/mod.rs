pub mod document_extractor;
pub mod embedding_provider;
pub mod file_storage;
pub mod job_queue;
pub mod language_model;
pub mod text_splitter;

pub use document_extractor::DocumentExtractor;
pub use embedding_provider::EmbeddingProvider;
pub use file_storage::FileStorage;
pub use job_queue::JobQueue;
pub use language_model::LanguageModel;
pub use text_splitter::TextSplitter;
