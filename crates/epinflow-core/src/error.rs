//! Error types for EPIN settlement file processing.

use thiserror::Error;

use crate::models::JobStatus;

/// Record layout family a field belongs to, carried in field-level errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordFormat {
    /// VSS-110 / VSS-111 TCR0 layout (report group V, subgroup 2)
    Vss110,
    /// Subgroup-4 TCR0 layout (VSS-120/130/140 and related report ids)
    VssSubGroup4,
    /// Subgroup-4 TCR1 amount-row layout
    Vss120Tcr1,
    /// EPIN file header line
    FileHeader,
}

impl std::fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Vss110 => "VSS-110",
            Self::VssSubGroup4 => "VSS-SubGroup4",
            Self::Vss120Tcr1 => "VSS-120-TCR1",
            Self::FileHeader => "FILE-HEADER",
        };
        write!(f, "{}", tag)
    }
}

/// Main error type for EPIN settlement operations.
#[derive(Error, Debug, Clone)]
pub enum EpinError {
    /// A positional field failed its pattern or numeric contract
    #[error("Malformed field '{field}' at line {line_number} ({format}): expected {expected}, got '{actual}'")]
    MalformedField {
        field: String,
        expected: String,
        actual: String,
        line_number: u64,
        format: RecordFormat,
    },

    /// A required field is absent or the line is shorter than its end position
    #[error("Missing field '{field}' at line {line_number} ({format})")]
    MissingField {
        field: String,
        line_number: u64,
        format: RecordFormat,
    },

    /// A parsed date falls outside the accepted reporting window
    #[error("Date '{raw}' in field '{field}' at line {line_number} is outside the accepted range")]
    OutOfRangeDate {
        field: String,
        raw: String,
        line_number: u64,
    },

    /// A cross-field or parent/child invariant does not hold
    #[error("Invariant violation at line {line_number}: {message}")]
    InvariantViolation { message: String, line_number: u64 },

    /// Attempted job status change violates the job lifecycle
    #[error("Invalid job status transition: {from} -> {to}")]
    StateTransition { from: JobStatus, to: JobStatus },

    /// Persistence-layer failure; transient variants are retried
    #[error("Store error: {message}")]
    Store { message: String, transient: bool },

    /// The classifier could not recognize the record type
    #[error("Unknown record type at line {line_number}")]
    UnknownRecordType { line_number: u64 },

    /// Job lookup failed
    #[error("Job not found: {job_id}")]
    JobNotFound { job_id: uuid::Uuid },

    /// Operation not permitted in the job's current status
    #[error("Job {job_id} is {status}: {message}")]
    BadJobState {
        job_id: uuid::Uuid,
        status: JobStatus,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error while reading the input blob
    #[error("IO error: {0}")]
    Io(String),
}

impl EpinError {
    /// Create a malformed-field error.
    pub fn malformed(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        line_number: u64,
        format: RecordFormat,
    ) -> Self {
        Self::MalformedField {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
            line_number,
            format,
        }
    }

    /// Create a missing-field error.
    pub fn missing(field: impl Into<String>, line_number: u64, format: RecordFormat) -> Self {
        Self::MissingField {
            field: field.into(),
            line_number,
            format,
        }
    }

    /// Create an out-of-range date error.
    pub fn out_of_range_date(field: impl Into<String>, raw: impl Into<String>, line_number: u64) -> Self {
        Self::OutOfRangeDate {
            field: field.into(),
            raw: raw.into(),
            line_number,
        }
    }

    /// Create an invariant-violation error.
    pub fn invariant(message: impl Into<String>, line_number: u64) -> Self {
        Self::InvariantViolation {
            message: message.into(),
            line_number,
        }
    }

    /// Create a permanent store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            transient: false,
        }
    }

    /// Create a transient store error (eligible for retry).
    pub fn store_transient(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            transient: true,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the retry policy may reschedule the failed operation.
    ///
    /// Parse and validation failures never retry; only transient store
    /// failures do.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store { transient: true, .. })
    }
}

impl From<std::io::Error> for EpinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for EPIN settlement operations.
pub type EpinResult<T> = Result<T, EpinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_predicate() {
        assert!(EpinError::store_transient("connection reset").is_transient());
        assert!(!EpinError::store("constraint violated").is_transient());
        assert!(!EpinError::missing("destinationId", 4, RecordFormat::Vss110).is_transient());
    }

    #[test]
    fn test_display_carries_context() {
        let err = EpinError::malformed(
            "transactionCode",
            "46",
            "99",
            12,
            RecordFormat::VssSubGroup4,
        );
        let text = err.to_string();
        assert!(text.contains("transactionCode"));
        assert!(text.contains("line 12"));
        assert!(text.contains("VSS-SubGroup4"));
    }
}
