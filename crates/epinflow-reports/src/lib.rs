//! # epinflow-reports
//!
//! Hierarchical settlement report aggregators. Each report is a pure fold
//! from filtered records to a nested tree: VSS-110 statistics (amount
//! type -> business mode) and the three subgroup-4 trees (VSS-120
//! interchange, VSS-130 reimbursement fees, VSS-140 Visa charges), with
//! credit/debit sign semantics applied per amount and reconstructed at
//! emission.

mod rollup;
mod totals;
mod vss110;
mod vss120;
mod vss130;
mod vss140;

pub use rollup::{build_destination_rollup, vss110_destination_rollup, DestinationRollup};
pub use totals::{tcr1_totals, ReportTotals, SignedTotals};
pub use vss110::{
    build_vss110_stats, vss110_stats, Vss110AmountTypeGroup, Vss110BusinessModeStats,
    Vss110StatsReport,
};
pub use vss120::{
    build_vss120, vss120_report, Vss120BusinessModeGroup, Vss120CycleLeaf, Vss120Report,
    Vss120TransactionTypeGroup,
};
pub use vss130::{
    build_vss130, vss130_report, Vss130BusinessModeGroup, Vss130FeeLeaf, Vss130Report,
    Vss130TransactionTypeGroup,
};
pub use vss140::{
    build_vss140, vss140_report, Vss140BusinessModeGroup, Vss140ChargeTypeGroup,
    Vss140CycleGroup, Vss140Report, Vss140RoutingLeaf, Vss140TransactionTypeGroup,
};
