pub mod ask_question;
pub mod delete_document;
pub mod get_job_status;
pub mod list_documents;
pub mod process_document;
pub mod upload_batch;

pub use ask_question::AskQuestionUseCase;
pub use delete_document::DeleteDocumentUseCase;
pub use get_job_status::GetJobStatusUseCase;
pub use list_documents::ListDocumentsUseCase;
pub use process_document::ProcessDocumentUseCase;
pub use upload_batch::UploadBatchUseCase;
