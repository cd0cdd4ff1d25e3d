//! VSS-110 / VSS-111 settlement record (report group V, subgroup 2).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::common::{AmountSign, AmountType, BusinessMode, RecordEnvelope};

/// One VSS-110 or VSS-111 TCR0 line: settlement position for a
/// destination, classified by amount type and business mode, with
/// credit/debit/net amounts at scale 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vss110Record {
    /// Shared record metadata
    pub envelope: RecordEnvelope,

    // -- header fields (positions 1-65) --
    /// Positions 1-2, always "46"
    pub transaction_code: String,
    /// Position 3, always "0"
    pub transaction_code_qualifier: String,
    /// Position 4, "0" for a TCR0
    pub transaction_component_seq: String,
    /// Positions 5-10, six digits
    pub destination_id: String,
    /// Positions 11-16, six digits, often zero
    pub source_id: String,
    /// Positions 17-26
    pub reporting_sre_id: String,
    /// Positions 27-36
    pub rollup_sre_id: String,
    /// Positions 37-46
    pub funds_transfer_sre_id: String,
    /// Positions 47-49
    pub settlement_service: String,
    /// Positions 50-52, numeric ISO-4217; defaults to 978 (EUR) when blank
    pub currency_code: String,
    /// Position 53, V | Y | ' '
    pub no_data_indicator: String,
    /// Position 59, always "V"
    pub report_group: String,
    /// Position 60, always "2"
    pub report_subgroup: String,
    /// Positions 61-63, "110" or "111"
    pub report_id_number: String,
    /// Positions 64-65
    pub report_id_suffix: String,

    // -- date fields, parsed plus raw positional strings --
    pub settlement_date: Option<NaiveDate>,
    pub raw_settlement_date: String,
    pub report_date: Option<NaiveDate>,
    pub raw_report_date: String,
    pub from_date: Option<NaiveDate>,
    pub raw_from_date: String,
    pub to_date: Option<NaiveDate>,
    pub raw_to_date: String,
    pub funds_transfer_date: Option<NaiveDate>,
    pub raw_funds_transfer_date: String,

    // -- classification --
    /// Position 94
    pub amount_type: AmountType,
    /// Position 95
    pub business_mode: BusinessMode,

    // -- financials --
    /// Positions 96-110
    pub transaction_count: u64,
    /// Positions 111-125, scale 2
    pub credit_amount: Decimal,
    /// Positions 126-140, scale 2
    pub debit_amount: Decimal,
    /// Positions 141-155, scale 2
    pub net_amount: Decimal,
    /// Positions 156-157
    pub amount_sign: AmountSign,
    /// Position 168
    pub reimbursement_attribute: String,
}

impl Vss110Record {
    /// Net-amount consistency check.
    ///
    /// When the calculated net (credit - debit) is non-zero, the reported
    /// net must equal its absolute value and the sign indicator must match
    /// its direction. A zero calculated net accepts any sign indicator.
    /// Returns the violation text, or `None` when the invariant holds.
    pub fn net_consistency_violation(&self) -> Option<String> {
        let calculated = self.credit_amount - self.debit_amount;
        if calculated.is_zero() {
            return None;
        }
        if calculated.abs() != self.net_amount {
            return Some(format!(
                "net amount {} does not equal |credit - debit| = {}",
                self.net_amount,
                calculated.abs()
            ));
        }
        if self.amount_sign == AmountSign::Empty {
            // Sign indicator absent; only the magnitude clause applies.
            return None;
        }
        let expected_sign = AmountSign::of(calculated);
        if self.amount_sign != expected_sign {
            return Some(format!(
                "amount sign {} does not match calculated net direction {}",
                self.amount_sign.code(),
                expected_sign.code()
            ));
        }
        None
    }

    /// The net amount with the CR/DB convention applied.
    pub fn signed_net_amount(&self) -> Decimal {
        self.amount_sign.apply(self.net_amount)
    }
}
