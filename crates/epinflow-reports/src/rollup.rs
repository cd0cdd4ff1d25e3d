//! Per-BIN settlement rollup over VSS-110 rows.
//!
//! A destination id is the settlement entity's BIN, so grouping by it
//! gives the revenue position per reporting institution, split by
//! settlement currency.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use epinflow_core::error::EpinResult;
use epinflow_core::labels::currency_label;
use epinflow_core::models::{AmountSign, ReportFilter, Vss110Record};
use epinflow_store::RecordStore;

/// Settlement position for one (destination id, currency) bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationRollup {
    pub destination_id: String,
    pub currency_code: String,
    pub currency: String,
    pub transaction_count: u64,
    pub credit_amount: Decimal,
    pub debit_amount: Decimal,
    /// Absolute value of the summed signed net amounts
    pub net_amount: Decimal,
    pub net_sign: AmountSign,
}

/// Produce the per-destination rollup for records matching the filter,
/// ordered by destination id then currency.
pub fn vss110_destination_rollup<S: RecordStore>(
    store: &S,
    filter: &ReportFilter,
) -> EpinResult<Vec<DestinationRollup>> {
    let rows = store.vss110_matching(filter)?;
    Ok(build_destination_rollup(&rows))
}

/// Pure fold over VSS-110 rows.
pub fn build_destination_rollup(rows: &[Vss110Record]) -> Vec<DestinationRollup> {
    let mut buckets: BTreeMap<(String, String), (u64, Decimal, Decimal, Decimal)> = BTreeMap::new();
    for row in rows {
        let entry = buckets
            .entry((row.destination_id.clone(), row.currency_code.clone()))
            .or_insert((0, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        entry.0 += row.transaction_count;
        entry.1 += row.credit_amount;
        entry.2 += row.debit_amount;
        entry.3 += row.signed_net_amount();
    }

    buckets
        .into_iter()
        .map(|((destination_id, currency_code), (count, credit, debit, signed_net))| {
            DestinationRollup {
                currency: currency_label(&currency_code),
                destination_id,
                currency_code,
                transaction_count: count,
                credit_amount: credit,
                debit_amount: debit,
                net_amount: signed_net.abs(),
                net_sign: AmountSign::of(signed_net),
            }
        })
        .collect()
}
