pub mod document_dto;
pub mod health_dto;
pub mod job_dto;
pub mod qa_dto;
pub mod upload_dto;

pub use document_dto::*;
pub use health_dto::*;
pub use job_dto::*;
pub use qa_dto::*;
pub use upload_dto::*;
