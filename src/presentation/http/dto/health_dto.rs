use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub version: String,
    pub documents_indexed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatusDto {
    pub healthy: bool,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueueStatusDto {
    pub healthy: bool,
    pub pending: usize,
    pub total_enqueued: u64,
    pub total_dequeued: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DependenciesResponseDto {
    pub status: String,
    pub embedding_service: DependencyStatusDto,
    pub language_model: DependencyStatusDto,
    pub job_queue: QueueStatusDto,
}
