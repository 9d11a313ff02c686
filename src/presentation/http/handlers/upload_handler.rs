use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{
    UploadBatchUseCase,
    upload_batch::{UploadBatchRequest, UploadedFile},
};
use crate::presentation::http::dto::UploadBatchResponseDto;
use crate::presentation::http::errors::ApiError;

const FILES_FIELD: &str = "files";

pub struct UploadHandler {
    upload_batch_use_case: Arc<UploadBatchUseCase>,
}

impl UploadHandler {
    pub fn new(upload_batch_use_case: Arc<UploadBatchUseCase>) -> Self {
        Self {
            upload_batch_use_case,
        }
    }

    /// Accepts repeated `files` parts and queues one job per file.
    pub async fn upload_batch(
        State(handler): State<Arc<UploadHandler>>,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, ApiError> {
        let mut files = Vec::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?
        {
            if field.name() != Some(FILES_FIELD) {
                continue;
            }

            let filename = field.file_name().unwrap_or("upload").to_string();
            let content = field
                .bytes()
                .await
                .map_err(|e| ApiError::new(e.status(), e.body_text()))?
                .to_vec();

            files.push(UploadedFile { filename, content });
        }

        let response = handler
            .upload_batch_use_case
            .execute(UploadBatchRequest { files })
            .await?;

        Ok((StatusCode::OK, Json(UploadBatchResponseDto::from(response))))
    }
}
