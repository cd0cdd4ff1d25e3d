//! Shared field-validation helpers for the record parsers.
//!
//! Pattern mismatches are recorded on the record's envelope (clearing the
//! validity flag) rather than aborting the parse, so every line survives
//! to persistence with its audit trail intact.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use epinflow_core::error::EpinResult;
use epinflow_core::models::{AmountSign, RecordEnvelope};

/// Require an exact literal value.
pub(crate) fn check_literal(env: &mut RecordEnvelope, field: &str, actual: &str, expected: &str) {
    if actual != expected {
        env.add_error(format!("{field}: expected '{expected}', got '{actual}'"));
    }
}

/// Require a fully numeric field.
pub(crate) fn check_digits(env: &mut RecordEnvelope, field: &str, actual: &str) {
    if !actual.bytes().all(|b| b.is_ascii_digit()) {
        env.add_error(format!("{field}: expected digits, got '{actual}'"));
    }
}

/// Require the trimmed value to be one of the allowed tokens.
pub(crate) fn check_one_of(env: &mut RecordEnvelope, field: &str, actual: &str, allowed: &[&str]) {
    let trimmed = actual.trim();
    if !allowed.contains(&trimmed) {
        env.add_error(format!(
            "{field}: '{actual}' is not one of {}",
            allowed.join("|")
        ));
    }
}

/// Unwrap a strict-mode amount result, substituting zero and recording the
/// error on the envelope when the field is malformed.
pub(crate) fn amount_or_default(env: &mut RecordEnvelope, result: EpinResult<Decimal>) -> Decimal {
    result.unwrap_or_else(|err| {
        env.add_error(err.to_string());
        Decimal::new(0, 2)
    })
}

/// Unwrap a strict-mode count result, substituting zero on error.
pub(crate) fn count_or_default(env: &mut RecordEnvelope, result: EpinResult<u64>) -> u64 {
    result.unwrap_or_else(|err| {
        env.add_error(err.to_string());
        0
    })
}

/// Unwrap a strict-mode date result, substituting `None` on error.
pub(crate) fn date_or_default(
    env: &mut RecordEnvelope,
    result: EpinResult<Option<NaiveDate>>,
) -> Option<NaiveDate> {
    result.unwrap_or_else(|err| {
        env.add_error(err.to_string());
        None
    })
}

/// Decode a two-character sign field, recording unknown indicators.
pub(crate) fn sign_or_default(env: &mut RecordEnvelope, field: &str, raw: &str) -> AmountSign {
    AmountSign::from_code(raw).unwrap_or_else(|| {
        env.add_error(format!("{field}: expected CR, DB, or blank, got '{raw}'"));
        AmountSign::Empty
    })
}
