use serde::{Deserialize, Serialize};

use crate::application::use_cases::delete_document::DeleteDocumentResponse;
use crate::domain::repositories::vector_repository::DocumentSummary;

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentListDto {
    pub documents: Vec<DocumentSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteDocumentResponseDto {
    pub document_id: String,
    pub chunks_deleted: usize,
}

impl From<Vec<DocumentSummary>> for DocumentListDto {
    fn from(documents: Vec<DocumentSummary>) -> Self {
        Self {
            total: documents.len(),
            documents,
        }
    }
}

impl From<DeleteDocumentResponse> for DeleteDocumentResponseDto {
    fn from(response: DeleteDocumentResponse) -> Self {
        Self {
            document_id: response.document_id,
            chunks_deleted: response.chunks_deleted,
        }
    }
}
