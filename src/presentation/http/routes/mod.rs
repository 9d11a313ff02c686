pub mod docs_routes;
pub mod document_routes;
pub mod health_routes;
pub mod job_routes;
pub mod qa_routes;
pub mod upload_routes;

pub use docs_routes::*;
pub use document_routes::*;
pub use health_routes::*;
pub use job_routes::*;
pub use qa_routes::*;
pub use upload_routes::*;
