pub mod content_chunk;
pub mod embedding;
pub mod processed_document;
pub mod processing_job;
pub mod retrieved_context;

pub use content_chunk::{ChunkMetadata, ContentChunk};
pub use embedding::{Embedding, cosine_similarity};
pub use processed_document::ProcessedDocument;
pub use processing_job::{JobResult, ProcessingJob};
pub use retrieved_context::RetrievedContext;
