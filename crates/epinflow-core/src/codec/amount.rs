//! Fixed-point amount and count decoding.
//!
//! Amount fields are 15 ASCII characters holding an integer number of
//! cents, optionally left-padded with '0' or ' '. The decoded value is a
//! `Decimal` with scale 2, so `000000000050000` is exactly `500.00`.

use rust_decimal::Decimal;
use tracing::warn;

use super::ParseMode;
use crate::error::{EpinError, EpinResult, RecordFormat};

/// Decode a 15-digit amount field into a scale-2 decimal.
///
/// All-zero and all-space fields decode to exactly zero. A field with
/// non-digit, non-space characters is a format error in strict mode and is
/// coerced to zero with a warning in lenient mode.
pub fn parse_amount(
    raw: &str,
    field: &str,
    line_number: u64,
    format: RecordFormat,
    mode: ParseMode,
) -> EpinResult<Decimal> {
    match decode_padded_integer(raw) {
        Some(cents) => Ok(Decimal::new(cents, 2)),
        None => {
            if mode.is_lenient() {
                warn!(field, line_number, raw, "coercing malformed amount to zero");
                Ok(Decimal::new(0, 2))
            } else {
                Err(EpinError::malformed(
                    field,
                    "15 digits with optional left padding",
                    raw,
                    line_number,
                    format,
                ))
            }
        }
    }
}

/// Decode a 15-digit count field into an unsigned integer.
pub fn parse_count(
    raw: &str,
    field: &str,
    line_number: u64,
    format: RecordFormat,
    mode: ParseMode,
) -> EpinResult<u64> {
    match decode_padded_integer(raw) {
        Some(n) => Ok(n as u64),
        None => {
            if mode.is_lenient() {
                warn!(field, line_number, raw, "coercing malformed count to zero");
                Ok(0)
            } else {
                Err(EpinError::malformed(
                    field,
                    "15 digits with optional left padding",
                    raw,
                    line_number,
                    format,
                ))
            }
        }
    }
}

/// Decode digits left-padded by '0' or ' '. Returns `None` on any other
/// character. An all-space field decodes to zero.
fn decode_padded_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start_matches(' ');
    if trimmed.is_empty() {
        return Some(0);
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // 15 digits fit in i64 without overflow.
    trimmed.parse::<i64>().ok()
}
