//! VSS-110 settlement statistics: amount type -> business mode rollup.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use epinflow_core::error::EpinResult;
use epinflow_core::models::{AmountSign, AmountType, BusinessMode, ReportFilter, Vss110Record};
use epinflow_store::RecordStore;

/// Full VSS-110 statistics tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss110StatsReport {
    pub amount_types: Vec<Vss110AmountTypeGroup>,
}

/// One amount-type bucket (interchange, fees, charges, total).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss110AmountTypeGroup {
    pub amount_type: String,
    pub label: String,
    pub business_modes: Vec<Vss110BusinessModeStats>,
}

/// Leaf statistics for one (amount type, business mode) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss110BusinessModeStats {
    pub business_mode: String,
    pub label: String,
    /// Sum of transaction counts
    pub credit_count: u64,
    pub credit_amount: Decimal,
    pub debit_amount: Decimal,
    /// Absolute value of the summed signed net amounts
    pub total_amount: Decimal,
    /// CR when the summed net is positive, DB when negative, blank at zero
    pub total_sign: AmountSign,
}

#[derive(Default, Clone, Copy)]
struct Vss110Acc {
    count: u64,
    credit: Decimal,
    debit: Decimal,
    signed_net: Decimal,
}

/// Produce the VSS-110 statistics tree for records matching the filter.
pub fn vss110_stats<S: RecordStore>(
    store: &S,
    filter: &ReportFilter,
) -> EpinResult<Vss110StatsReport> {
    let rows = store.vss110_matching(filter)?;
    Ok(build_vss110_stats(&rows))
}

/// Pure fold over VSS-110 rows. Leaf aggregates are sums of signed values,
/// so the result is independent of how the rows are partitioned.
pub fn build_vss110_stats(rows: &[Vss110Record]) -> Vss110StatsReport {
    let mut groups: BTreeMap<(char, char), Vss110Acc> = BTreeMap::new();
    let mut kinds: BTreeMap<char, (AmountType, BTreeMap<char, BusinessMode>)> = BTreeMap::new();

    for row in rows {
        let key = (row.amount_type.code(), row.business_mode.code());
        let acc = groups.entry(key).or_default();
        acc.count += row.transaction_count;
        acc.credit += row.credit_amount;
        acc.debit += row.debit_amount;
        acc.signed_net += row.signed_net_amount();

        kinds
            .entry(row.amount_type.code())
            .or_insert_with(|| (row.amount_type, BTreeMap::new()))
            .1
            .insert(row.business_mode.code(), row.business_mode);
    }

    let amount_types = kinds
        .into_iter()
        .map(|(type_code, (amount_type, modes))| Vss110AmountTypeGroup {
            amount_type: type_code.to_string(),
            label: amount_type.label().to_string(),
            business_modes: modes
                .into_iter()
                .map(|(mode_code, mode)| {
                    let acc = groups[&(type_code, mode_code)];
                    Vss110BusinessModeStats {
                        business_mode: mode_code.to_string(),
                        label: mode.label().to_string(),
                        credit_count: acc.count,
                        credit_amount: acc.credit,
                        debit_amount: acc.debit,
                        total_amount: acc.signed_net.abs(),
                        total_sign: AmountSign::of(acc.signed_net),
                    }
                })
                .collect(),
        })
        .collect();

    Vss110StatsReport { amount_types }
}
