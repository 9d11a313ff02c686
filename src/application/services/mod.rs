pub mod document_processor;
pub mod embedding_service;
pub mod qa_service;

pub use document_processor::DocumentProcessorService;
pub use embedding_service::EmbeddingService;
pub use qa_service::QaService;
