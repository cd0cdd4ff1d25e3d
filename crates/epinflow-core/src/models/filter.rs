//! Report filter predicate applied to persisted records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::vss110::Vss110Record;
use crate::models::vss120::Vss120Record;

/// Conjunction of optional predicates over settlement date, currency, and
/// destination id. An empty filter matches every record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilter {
    /// Inclusive lower bound on the settlement date
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the settlement date
    pub end_date: Option<NaiveDate>,
    /// Exact settlement currency code (numeric ISO-4217)
    pub currency_code: Option<String>,
    /// Destination id prefix, e.g. a 6-digit BIN
    pub destination_id_prefix: Option<String>,
}

impl ReportFilter {
    /// Filter matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_currency(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = Some(currency_code.into());
        self
    }

    pub fn with_destination_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.destination_id_prefix = Some(prefix.into());
        self
    }

    fn matches(
        &self,
        settlement_date: Option<NaiveDate>,
        currency_code: &str,
        destination_id: &str,
    ) -> bool {
        if let Some(start) = self.start_date {
            match settlement_date {
                Some(d) if d >= start => {}
                _ => return false,
            }
        }
        if let Some(end) = self.end_date {
            match settlement_date {
                Some(d) if d <= end => {}
                _ => return false,
            }
        }
        if let Some(ref currency) = self.currency_code {
            if currency_code != currency {
                return false;
            }
        }
        if let Some(ref prefix) = self.destination_id_prefix {
            if !destination_id.starts_with(prefix.as_str()) {
                return false;
            }
        }
        true
    }

    /// Apply the predicate to a VSS-110 record.
    pub fn matches_vss110(&self, record: &Vss110Record) -> bool {
        self.matches(
            record.settlement_date,
            &record.currency_code,
            &record.destination_id,
        )
    }

    /// Apply the predicate to a subgroup-4 TCR0 record.
    pub fn matches_vss120(&self, record: &Vss120Record) -> bool {
        self.matches(
            record.settlement_date,
            &record.settlement_currency_code,
            &record.destination_id,
        )
    }
}
