//! VSS-130 reimbursement-fee report: business mode -> transaction type ->
//! (cycle, jurisdiction, routing, fee level) leaves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use epinflow_core::error::EpinResult;
use epinflow_core::labels::{cycle_label, jurisdiction_label, routing_label};
use epinflow_core::models::{ReportFamily, ReportFilter, Vss120Record, Vss120Tcr1Record};
use epinflow_store::RecordStore;

use crate::totals::{tcr1_totals, ReportTotals, SignedTotals};

/// Full VSS-130 report tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss130Report {
    pub business_modes: Vec<Vss130BusinessModeGroup>,
    pub totals: ReportTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss130BusinessModeGroup {
    pub business_mode: String,
    pub label: String,
    pub transaction_types: Vec<Vss130TransactionTypeGroup>,
    pub totals: ReportTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss130TransactionTypeGroup {
    pub transaction_type: String,
    pub fee_buckets: Vec<Vss130FeeLeaf>,
    pub totals: ReportTotals,
}

/// Leaf: one (cycle, jurisdiction, routing, fee level) bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vss130FeeLeaf {
    pub cycle: String,
    pub cycle_label: String,
    pub jurisdiction: String,
    pub jurisdiction_label: String,
    pub routing: String,
    pub fee_level_descriptor: String,
    pub totals: ReportTotals,
}

/// Produce the VSS-130 report for records matching the filter.
pub fn vss130_report<S: RecordStore>(
    store: &S,
    filter: &ReportFilter,
) -> EpinResult<Vss130Report> {
    let pairs = store.vss120_with_children(filter, ReportFamily::Vss130)?;
    Ok(build_vss130(&pairs))
}

/// Pure fold over joined (TCR0, TCR1) pairs.
pub fn build_vss130(pairs: &[(Vss120Record, Vec<Vss120Tcr1Record>)]) -> Vss130Report {
    // mode -> transaction type -> (cycle, jurisdiction, routing, fee) -> totals
    type LeafKey = (String, String, String, String);
    let mut tree: BTreeMap<(char, String), BTreeMap<String, BTreeMap<LeafKey, SignedTotals>>> =
        BTreeMap::new();

    for (tcr0, children) in pairs {
        let mode_key = (tcr0.business_mode.code(), tcr0.business_mode.label().to_string());
        let type_key = tcr0.business_transaction_type.trim().to_string();
        let routing = routing_label(
            &tcr0.source_country_code,
            &tcr0.destination_country_code,
            &tcr0.source_region_code,
            &tcr0.destination_region_code,
        );
        for tcr1 in children {
            let leaf_key = (
                tcr0.business_transaction_cycle.clone(),
                tcr0.jurisdiction_code.clone(),
                routing.clone(),
                tcr0.fee_level_descriptor.trim().to_string(),
            );
            tree.entry(mode_key.clone())
                .or_default()
                .entry(type_key.clone())
                .or_default()
                .entry(leaf_key)
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
                .map(|(transaction_type, leaves)| {
                    let mut type_totals = SignedTotals::default();
                    let fee_buckets = leaves
                        .into_iter()
                        .map(|((cycle, jurisdiction, routing, fee_level), totals)| {
                            type_totals.merge(&totals);
                            Vss130FeeLeaf {
                                cycle_label: cycle_label(&cycle),
                                cycle,
                                jurisdiction_label: jurisdiction_label(&jurisdiction),
                                jurisdiction,
                                routing,
                                fee_level_descriptor: fee_level,
                                totals: totals.emit(),
                            }
                        })
                        .collect();
                    mode_totals.merge(&type_totals);
                    Vss130TransactionTypeGroup {
                        transaction_type,
                        fee_buckets,
                        totals: type_totals.emit(),
                    }
                })
                .collect();
            report_totals.merge(&mode_totals);
            Vss130BusinessModeGroup {
                business_mode: mode_code.to_string(),
                label: mode_label,
                transaction_types,
                totals: mode_totals.emit(),
            }
        })
        .collect();

    Vss130Report {
        business_modes,
        totals: report_totals.emit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epinflow_core::codec::ParseMode;
    use epinflow_parser::{parse_subgroup4, parse_tcr1};
    use epinflow_test_utils::{subgroup4_line, tcr1_line, Subgroup4Spec, Tcr1Spec};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn spec_130() -> Subgroup4Spec {
        Subgroup4Spec {
            report_id: "130".to_string(),
            ..Default::default()
        }
    }

    fn pair(
        tcr0_spec: &Subgroup4Spec,
        tcr1_specs: &[Tcr1Spec],
    ) -> (Vss120Record, Vec<Vss120Tcr1Record>) {
        let job_id = Uuid::new_v4();
        let parent = parse_subgroup4(&subgroup4_line(tcr0_spec), 1, job_id, ParseMode::Strict).unwrap();
        let children = tcr1_specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let mut child =
                    parse_tcr1(&tcr1_line(spec), 2 + i as u64, job_id, ParseMode::Strict).unwrap();
                child.parent_tcr0_id = Some(parent.envelope.id);
                child.parent_report_number = 130;
                child
            })
            .collect();
        (parent, children)
    }

    #[test]
    fn test_leaf_carries_labels_and_routing() {
        let pairs = vec![pair(&spec_130(), &[Tcr1Spec::default()])];
        let report = build_vss130(&pairs);

        let leaf = &report.business_modes[0].transaction_types[0].fee_buckets[0];
        assert_eq!(leaf.cycle, "1");
        assert_eq!(leaf.cycle_label, "Originals");
        assert_eq!(leaf.jurisdiction, "00");
        assert_eq!(leaf.jurisdiction_label, "Interregional");
        // Both region codes present -> region-based routing
        assert_eq!(leaf.routing, "United States - Europe");
        assert_eq!(leaf.fee_level_descriptor, "STANDARD");
        assert_eq!(leaf.totals.net_amount, dec!(150.00));
    }

    #[test]
    fn test_country_fallback_routing() {
        let tcr0 = Subgroup4Spec {
            source_region: "  ".to_string(),
            destination_region: "  ".to_string(),
            ..spec_130()
        };
        let pairs = vec![pair(&tcr0, &[Tcr1Spec::default()])];
        let report = build_vss130(&pairs);
        let leaf = &report.business_modes[0].transaction_types[0].fee_buckets[0];
        assert_eq!(leaf.routing, "United States - Germany");
    }

    #[test]
    fn test_distinct_jurisdictions_split_leaves() {
        let us = Subgroup4Spec {
            jurisdiction: "01".to_string(),
            ..spec_130()
        };
        let eu = Subgroup4Spec {
            jurisdiction: "03".to_string(),
            ..spec_130()
        };
        let pairs = vec![
            pair(&us, &[Tcr1Spec::default()]),
            pair(&eu, &[Tcr1Spec::default()]),
        ];
        let report = build_vss130(&pairs);
        let buckets = &report.business_modes[0].transaction_types[0].fee_buckets;
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].jurisdiction_label, "United States");
        assert_eq!(buckets[1].jurisdiction_label, "Europe");

        // Level totals sum both leaves
        let type_totals = &report.business_modes[0].transaction_types[0].totals;
        assert_eq!(type_totals.count, 100);
        assert_eq!(type_totals.net_amount, dec!(300.00));
    }
}
