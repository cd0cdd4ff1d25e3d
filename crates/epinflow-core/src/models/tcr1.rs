//! Subgroup-4 TCR1 record: the amount row companion to a TCR0.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::common::{AmountSign, RecordEnvelope};

/// One TCR1 line: two counts and six amounts, each amount with its own
/// CR/DB sign. The semantic meaning of the six amount slots depends on the
/// parent TCR0's report id. A TCR1 line carries no destination id of its
/// own; it is inherited from the preceding TCR0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vss120Tcr1Record {
    /// Shared record metadata
    pub envelope: RecordEnvelope,

    /// Positions 1-2, always "46"
    pub transaction_code: String,
    /// Position 3, always "0"
    pub transaction_code_qualifier: String,
    /// Position 4, "1" for a TCR1
    pub transaction_component_seq: String,
    /// Positions 5-9
    pub rate_table_id: String,
    /// Inherited from the parent TCR0; "000000" when no parent was found
    pub destination_id: String,

    /// Positions 12-26
    pub first_count: u64,
    /// Positions 27-41
    pub second_count: u64,

    /// Positions 42-56
    pub first_amount: Decimal,
    /// Positions 57-58
    pub first_amount_sign: AmountSign,
    /// Positions 59-73
    pub second_amount: Decimal,
    /// Positions 74-75
    pub second_amount_sign: AmountSign,
    /// Positions 76-90
    pub third_amount: Decimal,
    /// Positions 91-92
    pub third_amount_sign: AmountSign,
    /// Positions 93-107
    pub fourth_amount: Decimal,
    /// Positions 108-109
    pub fourth_amount_sign: AmountSign,
    /// Positions 110-124
    pub fifth_amount: Decimal,
    /// Positions 125-126
    pub fifth_amount_sign: AmountSign,
    /// Positions 127-141
    pub sixth_amount: Decimal,
    /// Positions 142-143
    pub sixth_amount_sign: AmountSign,

    /// Id of the owning TCR0 context row, when one is known
    pub parent_tcr0_id: Option<Uuid>,
    /// Denormalised family number of the parent (120 | 130 | 140)
    pub parent_report_number: u16,
}
