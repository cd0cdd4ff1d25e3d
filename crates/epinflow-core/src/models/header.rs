//! EPIN file header model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::common::RecordEnvelope;

/// The optional first line of an EPIN file: a 13-digit routing number
/// followed by space-separated timestamp, sequence number, client id, and
/// file-sequence tokens. Preserved verbatim and parsed best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpinFileHeader {
    /// Shared record metadata
    pub envelope: RecordEnvelope,
    /// 13-digit routing number
    pub routing_number: String,
    /// Timestamp token exactly as it appears in the file
    pub raw_timestamp: String,
    /// Parsed timestamp, when the raw token matches a known form
    pub file_timestamp: Option<NaiveDateTime>,
    /// Sequence-number token
    pub sequence_number: String,
    /// Client id token; copied onto the owning job
    pub client_id: String,
    /// File-sequence token
    pub file_sequence: String,
}
