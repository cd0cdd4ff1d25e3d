//! Julian date decoding for VSS record fields.
//!
//! Settlement and report dates use CCYYDDD (four-digit year plus
//! day-of-year). The funds-transfer date uses the shorter CCYDDD form; the
//! four-digit year is recovered by prefixing the digit '2', so `025001`
//! decodes to day 1 of 2025. Lenient mode additionally accepts the
//! truncated YYDDD settlement-date form found in older files, decoded as
//! year 2000 + YY.

use chrono::{Months, NaiveDate, Utc};
use tracing::warn;

use super::ParseMode;
use crate::error::{EpinError, EpinResult, RecordFormat};

/// Which positional date layout a field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateForm {
    /// Four-digit year + three-digit day-of-year (7 digits).
    Ccyyddd,
    /// Three-digit year + three-digit day-of-year (6 digits, funds-transfer
    /// date only). The field itself is 7 characters wide, so a 7-digit
    /// value is tolerated and decoded as CCYYDDD.
    Ccyddd,
}

/// Substitute value for malformed dates in lenient mode.
pub fn lenient_default_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch is a valid date")
}

/// Decode a Julian date field.
///
/// Empty and space-only fields decode to `None`. Strict mode rejects
/// malformed digits and dates outside [2000-01-01, today + 1 year];
/// lenient mode substitutes the epoch default with a warning.
pub fn parse_date(
    raw: &str,
    form: DateForm,
    field: &str,
    line_number: u64,
    format: RecordFormat,
    mode: ParseMode,
) -> EpinResult<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match decode(trimmed, form, mode) {
        Some(date) => {
            if mode == ParseMode::Strict && !in_reporting_window(date) {
                return Err(EpinError::out_of_range_date(field, raw, line_number));
            }
            Ok(Some(date))
        }
        None => {
            if mode.is_lenient() {
                warn!(field, line_number, raw, "substituting default for malformed date");
                Ok(Some(lenient_default_date()))
            } else {
                Err(EpinError::malformed(
                    field,
                    match form {
                        DateForm::Ccyyddd => "CCYYDDD",
                        DateForm::Ccyddd => "CCYDDD",
                    },
                    raw,
                    line_number,
                    format,
                ))
            }
        }
    }
}

fn decode(digits: &str, form: DateForm, mode: ParseMode) -> Option<NaiveDate> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (year, day) = match (form, digits.len()) {
        (DateForm::Ccyyddd, 7) | (DateForm::Ccyddd, 7) => {
            (digits[..4].parse::<i32>().ok()?, digits[4..].parse::<u32>().ok()?)
        }
        (DateForm::Ccyddd, 6) => {
            // Century convention: prefix '2' to the three-digit year.
            let year = format!("2{}", &digits[..3]).parse::<i32>().ok()?;
            (year, digits[3..].parse::<u32>().ok()?)
        }
        // Truncated YYDDD settlement-date form, lenient compatibility only.
        (DateForm::Ccyyddd, 5) if mode.is_lenient() => {
            (2000 + digits[..2].parse::<i32>().ok()?, digits[2..].parse::<u32>().ok()?)
        }
        _ => return None,
    };
    NaiveDate::from_yo_opt(year, day)
}

fn in_reporting_window(date: NaiveDate) -> bool {
    let floor = NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date");
    let today = Utc::now().date_naive();
    let ceiling = today
        .checked_add_months(Months::new(12))
        .unwrap_or(NaiveDate::MAX);
    date >= floor && date <= ceiling
}
