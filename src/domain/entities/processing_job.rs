use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{DocumentType, ProcessingStatus};

/// Background ingestion of a single uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingJob {
    id: Uuid,
    filename: String,
    file_path: String,
    status: ProcessingStatus,
    progress: f32, // 0.0 to 1.0
    stage: Option<String>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
    result_summary: Option<JobResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub document_id: String,
    pub file_type: DocumentType,
    pub chunks_created: usize,
    pub chunks_stored: usize,
    pub page_count: Option<usize>,
    pub extracted_text_length: usize,
    pub processing_time_ms: u64,
}

impl ProcessingJob {
    pub fn new(id: Uuid, filename: String, file_path: String) -> Self {
        Self {
            id,
            filename,
            file_path,
            status: ProcessingStatus::Queued,
            progress: 0.0,
            stage: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            error_message: None,
            result_summary: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn status(&self) -> &ProcessingStatus {
        &self.status
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn result_summary(&self) -> Option<&JobResult> {
        self.result_summary.as_ref()
    }

    pub fn start_processing(&mut self) -> Result<(), String> {
        if !self.status.can_transition_to(&ProcessingStatus::Processing) {
            return Err(format!("Job is not queued: {}", self.status));
        }

        self.status = ProcessingStatus::Processing;
        self.started_at = Some(Utc::now());
        self.progress = 0.1;
        self.stage = Some("Starting".to_string());
        Ok(())
    }

    pub fn update_progress(&mut self, progress: f32, stage: &str) -> Result<(), String> {
        if !self.status.is_processing() {
            return Err("Job is not in processing state".to_string());
        }

        if !(0.0..=1.0).contains(&progress) {
            return Err("Progress must be between 0.0 and 1.0".to_string());
        }

        self.progress = progress;
        self.stage = Some(stage.to_string());
        Ok(())
    }

    pub fn complete_processing(&mut self, result: JobResult) -> Result<(), String> {
        if !self.status.is_processing() {
            return Err("Job is not in processing state".to_string());
        }

        self.status = ProcessingStatus::Completed;
        self.progress = 1.0;
        self.stage = Some("Completed".to_string());
        self.completed_at = Some(Utc::now());
        self.result_summary = Some(result);
        Ok(())
    }

    pub fn fail_processing(&mut self, error: String) -> Result<(), String> {
        if !self.status.is_processing() {
            return Err("Job is not in processing state".to_string());
        }

        self.status = ProcessingStatus::Failed(error.clone());
        self.stage = Some("Failed".to_string());
        self.completed_at = Some(Utc::now());
        self.error_message = Some(error);
        Ok(())
    }

    /// Fails a job that never reached a worker.
    pub fn reject(&mut self, error: String) -> Result<(), String> {
        if !self.status.is_queued() {
            return Err(format!("Job is not queued: {}", self.status));
        }

        self.status = ProcessingStatus::Failed(error.clone());
        self.stage = Some("Failed".to_string());
        self.completed_at = Some(Utc::now());
        self.error_message = Some(error);
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            (Some(start), None) if self.status.is_processing() => Some(Utc::now() - start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> ProcessingJob {
        ProcessingJob::new(
            Uuid::new_v4(),
            "notes.txt".to_string(),
            "/tmp/notes.txt".to_string(),
        )
    }

    fn result() -> JobResult {
        JobResult {
            document_id: "notes.txt_abc".to_string(),
            file_type: DocumentType::Text,
            chunks_created: 4,
            chunks_stored: 4,
            page_count: None,
            extracted_text_length: 3000,
            processing_time_ms: 120,
        }
    }

    #[test]
    fn test_job_creation() {
        let job = job();

        assert_eq!(job.filename(), "notes.txt");
        assert_eq!(job.status(), &ProcessingStatus::Queued);
        assert_eq!(job.progress(), 0.0);
        assert!(job.is_active());
        assert!(job.duration().is_none());
    }

    #[test]
    fn test_job_workflow() {
        let mut job = job();

        assert!(job.start_processing().is_ok());
        assert_eq!(job.status(), &ProcessingStatus::Processing);
        assert!(job.started_at().is_some());

        assert!(job.update_progress(0.5, "Generating embeddings").is_ok());
        assert_eq!(job.progress(), 0.5);
        assert_eq!(job.stage(), Some("Generating embeddings"));
        assert!(job.update_progress(1.5, "too far").is_err());

        assert!(job.complete_processing(result()).is_ok());
        assert_eq!(job.status(), &ProcessingStatus::Completed);
        assert_eq!(job.progress(), 1.0);
        assert!(job.completed_at().is_some());
        assert!(job.duration().is_some());
        assert!(!job.is_active());
    }

    #[test]
    fn test_job_failure() {
        let mut job = job();

        job.start_processing().unwrap();
        job.fail_processing("Something went wrong".to_string())
            .unwrap();

        assert_eq!(
            job.status(),
            &ProcessingStatus::Failed("Something went wrong".to_string())
        );
        assert_eq!(job.error_message(), Some("Something went wrong"));
        assert_eq!(job.stage(), Some("Failed"));
        assert!(!job.is_active());
        assert!(job.update_progress(0.5, "late").is_err());
    }

    #[test]
    fn test_reject_queued_job() {
        let mut job = job();

        job.reject("Job queue is closed".to_string()).unwrap();
        assert!(job.status().is_failed());
        assert_eq!(job.error_message(), Some("Job queue is closed"));
        assert!(job.started_at().is_none());
        assert!(!job.is_active());

        let mut running = self::job();
        running.start_processing().unwrap();
        assert!(running.reject("late".to_string()).is_err());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut job = job();

        assert!(job.complete_processing(result()).is_err());
        assert!(job.fail_processing("nope".to_string()).is_err());

        job.start_processing().unwrap();
        assert!(job.start_processing().is_err());
    }
}
