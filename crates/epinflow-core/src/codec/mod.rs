//! Positional field codec for fixed-width EPIN record lines.
//!
//! All VSS record layouts address fields by 1-based inclusive character
//! positions. This module provides the shared decoding primitives:
//!
//! - substring extraction with missing-field diagnostics
//! - 15-digit amounts with implied two decimals
//! - CR/DB sign application
//! - CCYYDDD / CCYDDD / YYDDD date forms

mod amount;
mod date;
mod position;

pub use amount::{parse_amount, parse_count};
pub use date::{lenient_default_date, parse_date, DateForm};
pub use position::{extract, extract_optional};

/// Parsing strictness applied by the field codec and record parsers.
///
/// Strict mode surfaces malformed fields as validation errors on the
/// record; lenient mode coerces them to a documented default and logs a
/// warning. Either way the raw line is preserved for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Reject pattern mismatches and out-of-range dates.
    #[default]
    Strict,
    /// Coerce malformed values to defaults with a warning.
    Lenient,
}

impl ParseMode {
    /// Whether this mode coerces malformed values instead of rejecting them.
    pub fn is_lenient(&self) -> bool {
        matches!(self, Self::Lenient)
    }
}
