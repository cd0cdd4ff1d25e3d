//! Positional substring extraction.

use crate::error::{EpinError, EpinResult, RecordFormat};

/// Extract the field occupying 1-based inclusive positions `start..=end`.
///
/// The line must reach at least `end` characters; shorter lines produce a
/// `MissingField` error carrying the field name, line number, and layout
/// family.
pub fn extract<'a>(
    line: &'a str,
    start: usize,
    end: usize,
    field: &str,
    line_number: u64,
    format: RecordFormat,
) -> EpinResult<&'a str> {
    debug_assert!(start >= 1 && end >= start);
    if line.len() < end {
        return Err(EpinError::missing(field, line_number, format));
    }
    // Record lines are ASCII; byte slicing matches character positions.
    line.get(start - 1..end)
        .ok_or_else(|| EpinError::missing(field, line_number, format))
}

/// Extract a field that may be cut short by a truncated line tail.
///
/// Returns whatever portion of the field is present, or an empty string
/// when the line ends before `start`.
pub fn extract_optional<'a>(line: &'a str, start: usize, end: usize) -> &'a str {
    debug_assert!(start >= 1 && end >= start);
    if line.len() < start {
        return "";
    }
    let end = end.min(line.len());
    line.get(start - 1..end).unwrap_or("")
}
