//! Shared record envelope and code enums used across all VSS record types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata shared by every persisted record: identity, ownership, audit
/// trail, and optimistic-concurrency token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEnvelope {
    /// Opaque record id
    pub id: Uuid,
    /// Owning processing job
    pub job_id: Uuid,
    /// Complete input line, preserved verbatim for audit
    pub raw_line: String,
    /// 1-based line number within the source file
    pub line_number: u64,
    /// Whether every field passed its pattern contract
    pub is_valid: bool,
    /// Collected validation error texts
    pub validation_errors: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency token, bumped on every save
    pub version: u64,
}

impl RecordEnvelope {
    /// Create a fresh envelope for a record owned by `job_id`.
    pub fn new(job_id: Uuid, raw_line: impl Into<String>, line_number: u64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            job_id,
            raw_line: raw_line.into(),
            line_number,
            is_valid: true,
            validation_errors: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Record a validation error and clear the validity flag.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.is_valid = false;
        self.validation_errors.push(message.into());
    }

    /// Bump the update timestamp and version token.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.version += 1;
    }
}

/// Two-character credit/debit sign indicator attached to amount fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSign {
    /// "CR" - positive
    Credit,
    /// "DB" - negative
    Debit,
    /// "  " - positive, or indeterminate for a zero net amount
    #[default]
    Empty,
}

impl AmountSign {
    /// Decode the two-character sign field. Returns `None` for anything
    /// other than "CR", "DB", or blank.
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim() {
            "CR" => Some(Self::Credit),
            "DB" => Some(Self::Debit),
            "" => Some(Self::Empty),
            _ => None,
        }
    }

    /// The wire representation of this sign.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Credit => "CR",
            Self::Debit => "DB",
            Self::Empty => "  ",
        }
    }

    /// Apply the sign convention: CR and blank are positive, DB negates.
    pub fn apply(&self, amount: Decimal) -> Decimal {
        match self {
            Self::Debit => -amount,
            Self::Credit | Self::Empty => amount,
        }
    }

    /// Reconstruct the sign for an aggregated signed amount: CR when
    /// positive, DB when negative, blank when zero.
    pub fn of(amount: Decimal) -> Self {
        if amount.is_sign_negative() && !amount.is_zero() {
            Self::Debit
        } else if amount.is_zero() {
            Self::Empty
        } else {
            Self::Credit
        }
    }
}

/// VSS-110 amount classification (position 94).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountType {
    /// 'I' - interchange value
    Interchange,
    /// 'F' - reimbursement fees
    ReimbursementFee,
    /// 'C' - Visa charges
    VisaCharge,
    /// 'T' - total
    Total,
    /// ' ' - unclassified
    #[default]
    Blank,
}

impl AmountType {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'I' => Some(Self::Interchange),
            'F' => Some(Self::ReimbursementFee),
            'C' => Some(Self::VisaCharge),
            'T' => Some(Self::Total),
            ' ' => Some(Self::Blank),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Self::Interchange => 'I',
            Self::ReimbursementFee => 'F',
            Self::VisaCharge => 'C',
            Self::Total => 'T',
            Self::Blank => ' ',
        }
    }

    /// Human label for report output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Interchange => "Interchange",
            Self::ReimbursementFee => "Reimbursement Fees",
            Self::VisaCharge => "Visa Charges",
            Self::Total => "Total",
            Self::Blank => "Unclassified",
        }
    }
}

/// Which side of the transaction a record describes (position 95 for
/// VSS-110, position 56 for subgroup 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessMode {
    /// '1'
    Acquirer,
    /// '2'
    Issuer,
    /// '3'
    Other,
    /// '9'
    Total,
    /// ' '
    #[default]
    Blank,
}

impl BusinessMode {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '1' => Some(Self::Acquirer),
            '2' => Some(Self::Issuer),
            '3' => Some(Self::Other),
            '9' => Some(Self::Total),
            ' ' => Some(Self::Blank),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Self::Acquirer => '1',
            Self::Issuer => '2',
            Self::Other => '3',
            Self::Total => '9',
            Self::Blank => ' ',
        }
    }

    /// Human label for report output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Acquirer => "Acquirer",
            Self::Issuer => "Issuer",
            Self::Other => "Other",
            Self::Total => "Total",
            Self::Blank => "Unspecified",
        }
    }
}

/// Report family detected for a processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportFormat {
    Vss110,
    Vss120,
    Vss130,
    Vss140,
    /// Records of more than one VSS family in the same file
    Mixed,
    #[default]
    Unknown,
}

impl ReportFormat {
    /// Fold a newly observed family into the job's detected format.
    ///
    /// The first observation sets the format; a differing later family
    /// upgrades it to `Mixed`.
    pub fn merge(self, observed: ReportFormat) -> ReportFormat {
        match (self, observed) {
            (_, Self::Unknown) => self,
            (Self::Unknown, f) => f,
            (current, f) if current == f => current,
            _ => Self::Mixed,
        }
    }
}

/// File-type tag carried by a processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileType {
    #[default]
    Epin,
}
