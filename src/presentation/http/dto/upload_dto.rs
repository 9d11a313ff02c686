use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::upload_batch::{QueuedFile, UploadBatchResponse};

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResultDto {
    pub filename: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadBatchResponseDto {
    pub message: String,
    pub results: Vec<UploadResultDto>,
}

impl From<QueuedFile> for UploadResultDto {
    fn from(file: QueuedFile) -> Self {
        Self {
            filename: file.filename,
            status: file.status,
            job_id: file.job_id,
            error: file.error,
        }
    }
}

impl From<UploadBatchResponse> for UploadBatchResponseDto {
    fn from(response: UploadBatchResponse) -> Self {
        Self {
            message: response.message,
            results: response.results.into_iter().map(Into::into).collect(),
        }
    }
}
