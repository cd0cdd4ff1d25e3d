//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use epinflow_core::codec::ParseMode;
use epinflow_core::error::{EpinError, EpinResult};

/// Tunables for the batch pipeline and retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Lines per batch transaction (recommended 100-500)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Per-batch transaction budget in seconds (recommended 30-120)
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,
    /// Top-level per-job processing budget in seconds
    #[serde(default = "default_job_timeout_secs")]
    pub job_timeout_secs: u64,
    /// Attempts per batch write, transient store failures only
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Field codec strictness
    #[serde(default)]
    pub parse_mode: ParseMode,
    /// When false, an invalid record aborts its whole batch instead of
    /// being persisted with the audit trail and skipped
    #[serde(default = "default_true")]
    pub skip_invalid_records: bool,
    /// Error lines kept in the job's truncated summary
    #[serde(default = "default_error_summary_limit")]
    pub error_summary_limit: usize,
}

fn default_batch_size() -> usize {
    250
}
fn default_batch_timeout_secs() -> u64 {
    60
}
fn default_job_timeout_secs() -> u64 {
    300
}
fn default_max_attempts() -> u32 {
    3
}
fn default_true() -> bool {
    true
}
fn default_error_summary_limit() -> usize {
    10
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_timeout_secs: default_batch_timeout_secs(),
            job_timeout_secs: default_job_timeout_secs(),
            max_attempts: default_max_attempts(),
            parse_mode: ParseMode::default(),
            skip_invalid_records: true,
            error_summary_limit: default_error_summary_limit(),
        }
    }
}

impl PipelineConfig {
    /// Validate the configured bounds.
    pub fn validate(&self) -> EpinResult<()> {
        if self.batch_size == 0 {
            return Err(EpinError::config("batch_size must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(EpinError::config("max_attempts must be at least 1"));
        }
        if self.batch_timeout_secs == 0 || self.job_timeout_secs == 0 {
            return Err(EpinError::config("timeouts must be non-zero"));
        }
        if self.batch_timeout_secs > self.job_timeout_secs {
            return Err(EpinError::config(
                "batch_timeout_secs cannot exceed job_timeout_secs",
            ));
        }
        Ok(())
    }
}
