use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{DeleteDocumentUseCase, ListDocumentsUseCase};
use crate::presentation::http::dto::{DeleteDocumentResponseDto, DocumentListDto};
use crate::presentation::http::errors::ApiError;

pub struct DocumentHandler {
    list_documents_use_case: Arc<ListDocumentsUseCase>,
    delete_document_use_case: Arc<DeleteDocumentUseCase>,
}

impl DocumentHandler {
    pub fn new(
        list_documents_use_case: Arc<ListDocumentsUseCase>,
        delete_document_use_case: Arc<DeleteDocumentUseCase>,
    ) -> Self {
        Self {
            list_documents_use_case,
            delete_document_use_case,
        }
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
    ) -> Result<impl IntoResponse, ApiError> {
        let documents = handler.list_documents_use_case.execute().await?;
        Ok((StatusCode::OK, Json(DocumentListDto::from(documents))))
    }

    pub async fn delete_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<String>,
    ) -> Result<impl IntoResponse, ApiError> {
        let response = handler
            .delete_document_use_case
            .execute(&document_id)
            .await?;

        Ok((StatusCode::OK, Json(DeleteDocumentResponseDto::from(response))))
    }
}
