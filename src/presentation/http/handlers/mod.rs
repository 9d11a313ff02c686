pub mod document_handler;
pub mod health_handler;
pub mod job_handler;
pub mod qa_handler;
pub mod upload_handler;

pub use document_handler::DocumentHandler;
pub use health_handler::HealthHandler;
pub use job_handler::JobHandler;
pub use qa_handler::QaHandler;
pub use upload_handler::UploadHandler;
