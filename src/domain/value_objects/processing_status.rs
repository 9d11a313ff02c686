use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum ProcessingStatus {
    #[default]
    Queued,
    Processing,
    Completed,
    Failed(String),
}

impl ProcessingStatus {
    pub fn is_queued(&self) -> bool {
        matches!(self, ProcessingStatus::Queued)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, ProcessingStatus::Processing)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ProcessingStatus::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProcessingStatus::Failed(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProcessingStatus::Completed | ProcessingStatus::Failed(_)
        )
    }

    pub fn can_transition_to(&self, new_status: &ProcessingStatus) -> bool {
        matches!(
            (self, new_status),
            (ProcessingStatus::Queued, ProcessingStatus::Processing)
                | (ProcessingStatus::Processing, ProcessingStatus::Completed)
                | (ProcessingStatus::Processing, ProcessingStatus::Failed(_))
                | (ProcessingStatus::Failed(_), ProcessingStatus::Queued)
        )
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ProcessingStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Queued => "queued",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            // error text lives on the job
            ProcessingStatus::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        let failed = ProcessingStatus::Failed("error".to_string());

        assert!(ProcessingStatus::Queued.is_queued());
        assert!(ProcessingStatus::Processing.is_processing());
        assert!(ProcessingStatus::Completed.is_completed());
        assert!(failed.is_failed());

        assert!(!ProcessingStatus::Queued.is_terminal());
        assert!(!ProcessingStatus::Processing.is_terminal());
        assert!(ProcessingStatus::Completed.is_terminal());
        assert!(failed.is_terminal());
    }

    #[test]
    fn test_transitions() {
        let failed = ProcessingStatus::Failed("error".to_string());

        assert!(ProcessingStatus::Queued.can_transition_to(&ProcessingStatus::Processing));
        assert!(ProcessingStatus::Processing.can_transition_to(&ProcessingStatus::Completed));
        assert!(ProcessingStatus::Processing.can_transition_to(&failed));
        assert!(failed.can_transition_to(&ProcessingStatus::Queued));

        assert!(!ProcessingStatus::Queued.can_transition_to(&ProcessingStatus::Completed));
        assert!(!ProcessingStatus::Completed.can_transition_to(&ProcessingStatus::Processing));
        assert!(!ProcessingStatus::Completed.can_transition_to(&ProcessingStatus::Queued));
    }

    #[test]
    fn test_display() {
        assert_eq!(ProcessingStatus::Queued.to_string(), "queued");
        assert_eq!(
            ProcessingStatus::Failed("boom".to_string()).to_string(),
            "failed"
        );
        assert_eq!(
            ProcessingStatus::Failed("boom".to_string()).error_message(),
            Some("boom")
        );
    }
}
