//! Subgroup-4 TCR0 record (VSS-120/130/140 and related report ids).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::common::{BusinessMode, RecordEnvelope};

/// Report ids accepted in a subgroup-4 TCR0 (positions 61-63).
pub const VALID_SUBGROUP4_REPORT_IDS: [&str; 10] = [
    "120", "130", "131", "135", "136", "140", "210", "215", "230", "640",
];

/// The three reportable subgroup-4 families.
///
/// Report ids 130/131/135/136 all roll up to the VSS-130 reimbursement-fee
/// family; 210/215/230/640 are persisted but belong to none of the three
/// reportable families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportFamily {
    Vss120,
    Vss130,
    Vss140,
}

impl ReportFamily {
    /// Map a report-id-number to its reportable family.
    pub fn from_report_id(report_id: &str) -> Option<Self> {
        match report_id {
            "120" => Some(Self::Vss120),
            "130" | "131" | "135" | "136" => Some(Self::Vss130),
            "140" => Some(Self::Vss140),
            _ => None,
        }
    }

    /// The family's canonical report number.
    pub fn number(&self) -> u16 {
        match self {
            Self::Vss120 => 120,
            Self::Vss130 => 130,
            Self::Vss140 => 140,
        }
    }
}

/// One subgroup-4 TCR0 line: the context row that the following TCR1
/// amount rows attach to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vss120Record {
    /// Shared record metadata
    pub envelope: RecordEnvelope,

    /// Positions 1-2, always "46"
    pub transaction_code: String,
    /// Position 3, always "0"
    pub transaction_code_qualifier: String,
    /// Position 4, "0" for a TCR0
    pub transaction_component_seq: String,
    /// Positions 5-10
    pub destination_id: String,
    /// Positions 11-16
    pub source_id: String,
    /// Positions 17-26
    pub reporting_sre_id: String,
    /// Positions 27-36
    pub rollup_sre_id: String,
    /// Positions 37-46
    pub funds_transfer_sre_id: String,
    /// Positions 47-49
    pub settlement_service: String,
    /// Positions 50-52
    pub settlement_currency_code: String,
    /// Positions 53-55
    pub clearing_currency_code: String,
    /// Position 56
    pub business_mode: BusinessMode,
    /// Position 57, V | Y | ' '
    pub no_data_indicator: String,
    /// Position 59, always "V"
    pub report_group: String,
    /// Position 60, always "4"
    pub report_subgroup: String,
    /// Positions 61-63, one of `VALID_SUBGROUP4_REPORT_IDS`
    pub report_id_number: String,
    /// Positions 64-65
    pub report_id_suffix: String,

    pub settlement_date: Option<NaiveDate>,
    pub raw_settlement_date: String,
    pub report_date: Option<NaiveDate>,
    pub raw_report_date: String,
    pub from_date: Option<NaiveDate>,
    pub raw_from_date: String,
    pub to_date: Option<NaiveDate>,
    pub raw_to_date: String,

    /// Positions 94-96
    pub charge_type_code: String,
    /// Positions 97-99
    pub business_transaction_type: String,
    /// Position 100, cycle code '0'..'8'
    pub business_transaction_cycle: String,
    /// Position 101
    pub reversal_indicator: String,
    /// Position 102
    pub return_indicator: String,
    /// Positions 103-104, "00".."11"
    pub jurisdiction_code: String,
    /// Position 105
    pub interregional_routing_indicator: String,
    /// Positions 106-108
    pub source_country_code: String,
    /// Positions 109-111
    pub destination_country_code: String,
    /// Positions 112-113
    pub source_region_code: String,
    /// Positions 114-115
    pub destination_region_code: String,
    /// Positions 116-131
    pub fee_level_descriptor: String,
    /// Position 132, CR/DB/NET indicator
    pub cr_db_net_indicator: String,
    /// Positions 133-134
    pub summary_level: String,
    /// Position 168
    pub reimbursement_attribute: String,
}

impl Vss120Record {
    /// The reportable family this record belongs to, if any.
    pub fn report_family(&self) -> Option<ReportFamily> {
        ReportFamily::from_report_id(self.report_id_number.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_mapping() {
        assert_eq!(ReportFamily::from_report_id("120"), Some(ReportFamily::Vss120));
        for id in ["130", "131", "135", "136"] {
            assert_eq!(ReportFamily::from_report_id(id), Some(ReportFamily::Vss130));
        }
        assert_eq!(ReportFamily::from_report_id("140"), Some(ReportFamily::Vss140));
        for id in ["210", "215", "230", "640"] {
            assert_eq!(ReportFamily::from_report_id(id), None);
        }
    }
}
