//! EPIN file header parser.

use chrono::NaiveDateTime;
use uuid::Uuid;

use epinflow_core::error::{EpinError, EpinResult, RecordFormat};
use epinflow_core::models::{EpinFileHeader, RecordEnvelope};

const FMT: RecordFormat = RecordFormat::FileHeader;

/// Timestamp token forms seen in header lines, tried in order.
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d-%H.%M.%S", "%Y%m%d%H%M%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse the optional file header line: a 13-digit routing number followed
/// by space-separated timestamp, sequence-number, client-id, and
/// file-sequence tokens. The line is preserved verbatim; token parsing is
/// best-effort and missing tokens are recorded as validation errors
/// without failing the parse.
pub fn parse_header(line: &str, line_number: u64, job_id: Uuid) -> EpinResult<EpinFileHeader> {
    let mut tokens = line.split_whitespace();
    let routing_number = tokens
        .next()
        .ok_or_else(|| EpinError::missing("routingNumber", line_number, FMT))?
        .to_string();

    let mut env = RecordEnvelope::new(job_id, line, line_number);
    if routing_number.len() != 13 || !routing_number.bytes().all(|b| b.is_ascii_digit()) {
        env.add_error(format!(
            "routingNumber: expected 13 digits, got '{routing_number}'"
        ));
    }

    let raw_timestamp = tokens.next().unwrap_or_default().to_string();
    if raw_timestamp.is_empty() {
        env.add_error("fileTimestamp: token missing".to_string());
    }
    let file_timestamp = TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&raw_timestamp, fmt).ok());

    let sequence_number = tokens.next().unwrap_or_default().to_string();
    let client_id = tokens.next().unwrap_or_default().to_string();
    if client_id.is_empty() {
        env.add_error("clientId: token missing".to_string());
    }
    let file_sequence = tokens.next().unwrap_or_default().to_string();

    Ok(EpinFileHeader {
        envelope: env,
        routing_number,
        raw_timestamp,
        file_timestamp,
        sequence_number,
        client_id,
        file_sequence,
    })
}
