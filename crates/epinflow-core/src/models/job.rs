//! Processing job model and its lifecycle state machine.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EpinError, EpinResult};
use crate::models::common::{FileType, ReportFormat};

/// Lifecycle status of a processing job.
///
/// ```text
/// UPLOADED --start--> PROCESSING --ok--> COMPLETED
///                        |
///                        +--fail--> FAILED --retry--> UPLOADED
///                        +--cancel--> CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Uploaded,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Whether the state machine permits moving from `self` to `to`.
    pub fn can_transition_to(&self, to: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, to),
            (Uploaded, Processing)
                | (Uploaded, Cancelled)
                | (Processing, Completed)
                | (Processing, Failed)
                | (Processing, Cancelled)
                | (Failed, Uploaded)
                | (Completed, Uploaded)
        )
    }

    /// Whether the job is still live (may be cancelled).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Uploaded | Self::Processing)
    }

    /// Whether the job reached a terminal outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Whether a retry may be started from this status. A completed job
    /// may be re-run, e.g. after a corrected file version arrives.
    pub fn allows_retry(&self) -> bool {
        matches!(self, Self::Failed | Self::Completed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Uploaded => "UPLOADED",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// One processing job per uploaded EPIN file.
///
/// Created on upload, mutated only by the orchestrator, never deleted;
/// a retry first purges the job's dependent records and re-runs submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingJob {
    /// Opaque job id
    pub id: Uuid,
    /// Original filename as uploaded
    pub original_filename: String,
    /// Uploaded file size in bytes
    pub file_size: u64,
    /// File-type tag
    pub file_type: FileType,
    /// Report family detected from the parsed records
    pub report_format: ReportFormat,
    /// Client id taken from the file header, when present
    pub client_id: Option<String>,
    /// Current lifecycle status
    pub status: JobStatus,
    /// Total record lines seen
    pub total_records: u64,
    /// Records parsed and persisted as valid
    pub processed_records: u64,
    /// Records that failed validation or parsing
    pub failed_records: u64,
    /// When processing began
    pub processing_started_at: Option<DateTime<Utc>>,
    /// When processing reached a terminal state
    pub processing_completed_at: Option<DateTime<Utc>>,
    /// Retries performed so far
    pub retry_count: u32,
    /// Upper bound on retries
    pub max_retries: u32,
    /// First error lines plus overflow count, truncated for display
    pub error_summary: Option<String>,
    /// Free-form metadata
    pub metadata: HashMap<String, String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency token
    pub version: u64,
}

impl ProcessingJob {
    /// Default retry bound applied to new jobs.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Create a job in UPLOADED for a freshly received file.
    pub fn new(original_filename: impl Into<String>, file_size: u64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            original_filename: original_filename.into(),
            file_size,
            file_type: FileType::Epin,
            report_format: ReportFormat::Unknown,
            client_id: None,
            status: JobStatus::Uploaded,
            total_records: 0,
            processed_records: 0,
            failed_records: 0,
            processing_started_at: None,
            processing_completed_at: None,
            retry_count: 0,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            error_summary: None,
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Move the job to a new status, enforcing the lifecycle state machine.
    ///
    /// Every status write goes through here; a forbidden transition is a
    /// `StateTransition` error and leaves the job untouched.
    pub fn transition(&mut self, to: JobStatus) -> EpinResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(EpinError::StateTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        match to {
            JobStatus::Processing => self.processing_started_at = Some(Utc::now()),
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled => {
                self.processing_completed_at = Some(Utc::now());
            }
            JobStatus::Uploaded => {}
        }
        self.touch();
        Ok(())
    }

    /// Whether another retry attempt is permitted.
    pub fn can_retry(&self) -> bool {
        self.status.allows_retry() && self.retry_count < self.max_retries
    }

    /// Reset counters and detection state for a retry run.
    pub fn reset_for_retry(&mut self) {
        self.total_records = 0;
        self.processed_records = 0;
        self.failed_records = 0;
        self.report_format = ReportFormat::Unknown;
        self.error_summary = None;
        self.processing_started_at = None;
        self.processing_completed_at = None;
        self.retry_count += 1;
        self.touch();
    }

    /// Seconds spent processing, when both boundary timestamps exist.
    pub fn processing_seconds(&self) -> Option<f64> {
        match (self.processing_started_at, self.processing_completed_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64 / 1000.0),
            _ => None,
        }
    }

    /// Bump the update timestamp and version token.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.version += 1;
    }
}

/// Build the truncated error summary stored on a failed or partially
/// failed job: the first `limit` lines plus an overflow count.
pub fn summarize_errors(errors: &[String], limit: usize) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    let mut summary: String = errors
        .iter()
        .take(limit)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    if errors.len() > limit {
        summary.push_str(&format!("\n... and {} more errors", errors.len() - limit));
    }
    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut job = ProcessingJob::new("epin_2024.txt", 1024);
        job.transition(JobStatus::Processing).unwrap();
        assert!(job.processing_started_at.is_some());
        job.transition(JobStatus::Completed).unwrap();
        assert!(job.processing_completed_at.is_some());
        assert!(job.status.is_terminal());
    }

    #[test]
    fn test_forbidden_transitions_rejected() {
        let mut job = ProcessingJob::new("epin_2024.txt", 1024);
        // UPLOADED -> COMPLETED skips PROCESSING
        let err = job.transition(JobStatus::Completed).unwrap_err();
        assert!(matches!(err, EpinError::StateTransition { .. }));
        assert_eq!(job.status, JobStatus::Uploaded);

        job.transition(JobStatus::Processing).unwrap();
        job.transition(JobStatus::Completed).unwrap();
        // Terminal states are sticky except FAILED -> UPLOADED
        assert!(job.transition(JobStatus::Processing).is_err());
    }

    #[test]
    fn test_failed_job_may_return_to_uploaded() {
        let mut job = ProcessingJob::new("epin_2024.txt", 1024);
        job.transition(JobStatus::Processing).unwrap();
        job.transition(JobStatus::Failed).unwrap();
        assert!(job.can_retry());
        job.transition(JobStatus::Uploaded).unwrap();
        assert_eq!(job.status, JobStatus::Uploaded);
    }

    #[test]
    fn test_retry_bound() {
        let mut job = ProcessingJob::new("epin_2024.txt", 1024);
        job.transition(JobStatus::Processing).unwrap();
        job.transition(JobStatus::Failed).unwrap();
        job.retry_count = job.max_retries;
        assert!(!job.can_retry());
    }

    #[test]
    fn test_error_summary_truncation() {
        let errors: Vec<String> = (1..=14).map(|i| format!("line {i}: bad field")).collect();
        let summary = summarize_errors(&errors, 10).unwrap();
        assert!(summary.contains("line 1:"));
        assert!(summary.contains("line 10:"));
        assert!(!summary.contains("line 11:"));
        assert!(summary.ends_with("... and 4 more errors"));
        assert_eq!(summarize_errors(&[], 10), None);
    }
}
