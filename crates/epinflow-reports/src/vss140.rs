//! VSS-140 Visa-charges report: business mode -> charge type ->
//! transaction type -> cycle -> (jurisdiction, routing) leaves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use epinflow_core::error::EpinResult;
use epinflow_core::labels::{cycle_label, jurisdiction_label, routing_label};
use epinflow_core::models::{ReportFamily, ReportFilter, Vss120Record, Vss120Tcr1Record};
use epinflow_store::RecordStore;

use crate::totals::{tcr1_totals, ReportTotals, SignedTotals};

/// Full VSS-140 report tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss140Report {
    pub business_modes: Vec<Vss140BusinessModeGroup>,
    pub totals: ReportTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss140BusinessModeGroup {
    pub business_mode: String,
    pub label: String,
    pub charge_types: Vec<Vss140ChargeTypeGroup>,
    pub totals: ReportTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss140ChargeTypeGroup {
    pub charge_type_code: String,
    pub transaction_types: Vec<Vss140TransactionTypeGroup>,
    pub totals: ReportTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss140TransactionTypeGroup {
    pub transaction_type: String,
    pub cycles: Vec<Vss140CycleGroup>,
    pub totals: ReportTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss140CycleGroup {
    pub cycle: String,
    pub label: String,
    pub routings: Vec<Vss140RoutingLeaf>,
    pub totals: ReportTotals,
}

/// Leaf: one (jurisdiction, routing) bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss140RoutingLeaf {
    pub jurisdiction: String,
    pub jurisdiction_label: String,
    pub routing: String,
    pub totals: ReportTotals,
}

/// Produce the VSS-140 report for records matching the filter.
pub fn vss140_report<S: RecordStore>(
    store: &S,
    filter: &ReportFilter,
) -> EpinResult<Vss140Report> {
    let pairs = store.vss120_with_children(filter, ReportFamily::Vss140)?;
    Ok(build_vss140(&pairs))
}

/// Pure fold over joined (TCR0, TCR1) pairs.
pub fn build_vss140(pairs: &[(Vss120Record, Vec<Vss120Tcr1Record>)]) -> Vss140Report {
    // mode -> charge type -> transaction type -> cycle -> (jurisdiction, routing)
    type LeafKey = (String, String);
    #[allow(clippy::type_complexity)]
    let mut tree: BTreeMap<
        (char, String),
        BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<LeafKey, SignedTotals>>>>,
    > = BTreeMap::new();

    for (tcr0, children) in pairs {
        let mode_key = (tcr0.business_mode.code(), tcr0.business_mode.label().to_string());
        let charge_key = tcr0.charge_type_code.trim().to_string();
        let type_key = tcr0.business_transaction_type.trim().to_string();
        let cycle_key = tcr0.business_transaction_cycle.clone();
        let routing = routing_label(
            &tcr0.source_country_code,
            &tcr0.destination_country_code,
            &tcr0.source_region_code,
            &tcr0.destination_region_code,
        );
        for tcr1 in children {
            let leaf_key = (tcr0.jurisdiction_code.clone(), routing.clone());
            tree.entry(mode_key.clone())
                .or_default()
                .entry(charge_key.clone())
                .or_default()
                .entry(type_key.clone())
                .or_default()
                .entry(cycle_key.clone())
                .or_default()
                .entry(leaf_key)
                .or_default()
                .merge(&tcr1_totals(tcr1));
        }
    }

    let mut report_totals = SignedTotals::default();
    let business_modes = tree
        .into_iter()
        .map(|((mode_code, mode_label), charge_types)| {
            let mut mode_totals = SignedTotals::default();
            let charge_types = charge_types
                .into_iter()
                .map(|(charge_type_code, types)| {
                    let mut charge_totals = SignedTotals::default();
                    let transaction_types = types
                        .into_iter()
                        .map(|(transaction_type, cycles)| {
                            let mut type_totals = SignedTotals::default();
                            let cycles = cycles
                                .into_iter()
                                .map(|(cycle, leaves)| {
                                    let mut cycle_totals = SignedTotals::default();
                                    let routings = leaves
                                        .into_iter()
                                        .map(|((jurisdiction, routing), totals)| {
                                            cycle_totals.merge(&totals);
                                            Vss140RoutingLeaf {
                                                jurisdiction_label: jurisdiction_label(&jurisdiction),
                                                jurisdiction,
                                                routing,
                                                totals: totals.emit(),
                                            }
                                        })
                                        .collect();
                                    type_totals.merge(&cycle_totals);
                                    Vss140CycleGroup {
                                        label: cycle_label(&cycle),
                                        cycle,
                                        routings,
                                        totals: cycle_totals.emit(),
                                    }
                                })
                                .collect();
                            charge_totals.merge(&type_totals);
                            Vss140TransactionTypeGroup {
                                transaction_type,
                                cycles,
                                totals: type_totals.emit(),
                            }
                        })
                        .collect();
                    mode_totals.merge(&charge_totals);
                    Vss140ChargeTypeGroup {
                        charge_type_code,
                        transaction_types,
                        totals: charge_totals.emit(),
                    }
                })
                .collect();
            report_totals.merge(&mode_totals);
            Vss140BusinessModeGroup {
                business_mode: mode_code.to_string(),
                label: mode_label,
                charge_types,
                totals: mode_totals.emit(),
            }
        })
        .collect();

    Vss140Report {
        business_modes,
        totals: report_totals.emit(),
    }
}
