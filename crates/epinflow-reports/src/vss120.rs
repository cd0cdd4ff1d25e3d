//! VSS-120 interchange report: business mode -> transaction type ->
//! (cycle, rate table) leaves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use epinflow_core::error::EpinResult;
use epinflow_core::labels::cycle_label;
use epinflow_core::models::{ReportFamily, ReportFilter, Vss120Record, Vss120Tcr1Record};
use epinflow_store::RecordStore;

use crate::totals::{tcr1_totals, ReportTotals, SignedTotals};

/// Full VSS-120 report tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss120Report {
    pub business_modes: Vec<Vss120BusinessModeGroup>,
    pub totals: ReportTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss120BusinessModeGroup {
    pub business_mode: String,
    pub label: String,
    pub transaction_types: Vec<Vss120TransactionTypeGroup>,
    pub totals: ReportTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss120TransactionTypeGroup {
    pub transaction_type: String,
    pub cycles: Vec<Vss120CycleLeaf>,
    pub totals: ReportTotals,
}

/// Leaf: one (cycle, rate table) bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss120CycleLeaf {
    pub cycle: String,
    pub label: String,
    pub rate_table_id: String,
    pub totals: ReportTotals,
}

/// Produce the VSS-120 report for records matching the filter.
pub fn vss120_report<S: RecordStore>(
    store: &S,
    filter: &ReportFilter,
) -> EpinResult<Vss120Report> {
    let pairs = store.vss120_with_children(filter, ReportFamily::Vss120)?;
    Ok(build_vss120(&pairs))
}

/// Pure fold over joined (TCR0, TCR1) pairs.
pub fn build_vss120(pairs: &[(Vss120Record, Vec<Vss120Tcr1Record>)]) -> Vss120Report {
    // mode -> transaction type -> (cycle, rate table) -> signed totals
    type CycleKey = (String, String);
    let mut tree: BTreeMap<(char, String), BTreeMap<String, BTreeMap<CycleKey, SignedTotals>>> =
        BTreeMap::new();

    for (tcr0, children) in pairs {
        let mode_key = (tcr0.business_mode.code(), tcr0.business_mode.label().to_string());
        let type_key = tcr0.business_transaction_type.trim().to_string();
        for tcr1 in children {
            let cycle_key = (
                tcr0.business_transaction_cycle.clone(),
                tcr1.rate_table_id.trim().to_string(),
            );
            tree.entry(mode_key.clone())
                .or_default()
                .entry(type_key.clone())
                .or_default()
                .entry(cycle_key)
                .or_default()
                .merge(&tcr1_totals(tcr1));
        }
    }

    let mut report_totals = SignedTotals::default();
    let business_modes = tree
        .into_iter()
        .map(|((mode_code, mode_label), types)| {
            let mut mode_totals = SignedTotals::default();
            let transaction_types = types
                .into_iter()
                .map(|(transaction_type, cycles)| {
                    let mut type_totals = SignedTotals::default();
                    let cycles = cycles
                        .into_iter()
                        .map(|((cycle, rate_table_id), totals)| {
                            type_totals.merge(&totals);
                            Vss120CycleLeaf {
                                label: cycle_label(&cycle),
                                cycle,
                                rate_table_id,
                                totals: totals.emit(),
                            }
                        })
                        .collect();
                    mode_totals.merge(&type_totals);
                    Vss120TransactionTypeGroup {
                        transaction_type,
                        cycles,
                        totals: type_totals.emit(),
                    }
                })
                .collect();
            report_totals.merge(&mode_totals);
            Vss120BusinessModeGroup {
                business_mode: mode_code.to_string(),
                label: mode_label,
                transaction_types,
                totals: mode_totals.emit(),
            }
        })
        .collect();

    Vss120Report {
        business_modes,
        totals: report_totals.emit(),
    }
}
