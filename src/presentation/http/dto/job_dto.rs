use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::get_job_status::GetJobStatusResponse;
use crate::domain::entities::{JobResult, ProcessingJob};

#[derive(Debug, Serialize, Deserialize)]
pub struct JobStatusDto {
    pub job_id: Uuid,
    pub filename: String,
    pub status: String,
    pub progress: f32,
    pub stage: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub error: Option<String>,
    pub result: Option<JobResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobListDto {
    pub jobs: Vec<JobStatusDto>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub limit: Option<usize>,
}

impl From<ProcessingJob> for JobStatusDto {
    fn from(job: ProcessingJob) -> Self {
        Self {
            job_id: job.id(),
            filename: job.filename().to_string(),
            status: job.status().as_str().to_string(),
            progress: job.progress(),
            stage: job.stage().map(str::to_string),
            created_at: job.created_at(),
            started_at: job.started_at(),
            completed_at: job.completed_at(),
            duration_ms: job.duration().map(|d| d.num_milliseconds()),
            error: job.error_message().map(str::to_string),
            result: job.result_summary().cloned(),
        }
    }
}

impl From<GetJobStatusResponse> for JobStatusDto {
    fn from(response: GetJobStatusResponse) -> Self {
        let mut dto = Self::from(response.job);
        dto.duration_ms = response.duration.map(|d| d.num_milliseconds());
        dto
    }
}

impl From<Vec<ProcessingJob>> for JobListDto {
    fn from(jobs: Vec<ProcessingJob>) -> Self {
        let jobs: Vec<JobStatusDto> = jobs.into_iter().map(Into::into).collect();
        Self {
            total: jobs.len(),
            jobs,
        }
    }
}
