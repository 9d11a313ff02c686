pub mod document_type;
pub mod file_hash;
pub mod processing_status;

pub use document_type::DocumentType;
pub use file_hash::{DocumentId, FileHash};
pub use processing_status::ProcessingStatus;
