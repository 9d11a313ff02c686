use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::application::use_cases::ask_question::AskQuestionError;
use crate::application::use_cases::delete_document::DeleteDocumentError;
use crate::application::use_cases::get_job_status::GetJobStatusError;
use crate::application::use_cases::upload_batch::UploadBatchError;
use crate::domain::repositories::vector_repository::VectorRepositoryError;

/// Error response with a `{"detail": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}: {}", self.status, self.detail);
        }
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<AskQuestionError> for ApiError {
    fn from(error: AskQuestionError) -> Self {
        match error {
            AskQuestionError::EmptyQuery => ApiError::bad_request(error.to_string()),
            AskQuestionError::Retrieval(_) => ApiError::internal(error.to_string()),
        }
    }
}

impl From<UploadBatchError> for ApiError {
    fn from(error: UploadBatchError) -> Self {
        match error {
            UploadBatchError::NoFiles => ApiError::unprocessable(error.to_string()),
        }
    }
}

impl From<GetJobStatusError> for ApiError {
    fn from(error: GetJobStatusError) -> Self {
        match error {
            GetJobStatusError::JobNotFound(_) => ApiError::not_found(error.to_string()),
            GetJobStatusError::RepositoryError(_) => ApiError::internal(error.to_string()),
        }
    }
}

impl From<DeleteDocumentError> for ApiError {
    fn from(error: DeleteDocumentError) -> Self {
        match error {
            DeleteDocumentError::NotFound(_) => ApiError::not_found(error.to_string()),
            DeleteDocumentError::Repository(_) => ApiError::internal(error.to_string()),
        }
    }
}

impl From<VectorRepositoryError> for ApiError {
    fn from(error: VectorRepositoryError) -> Self {
        ApiError::internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(AskQuestionError::EmptyQuery).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(UploadBatchError::NoFiles).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(GetJobStatusError::JobNotFound(Uuid::nil())).status(),
            StatusCode::NOT_FOUND
        );
        let missing = ApiError::from(DeleteDocumentError::NotFound("x".to_string()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.detail(), "Document not found: x");
    }

    #[tokio::test]
    async fn test_detail_body() {
        let response = ApiError::bad_request("Query cannot be empty").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({"detail": "Query cannot be empty"}));
    }
}
