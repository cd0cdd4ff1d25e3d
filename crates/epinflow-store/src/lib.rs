//! # epinflow-store
//!
//! Persistence contract for EPIN settlement data: typed inserts with
//! parent/child linking, filtered range scans, a TCR0+TCR1 join query,
//! per-job cascade deletion, and atomic per-batch commits. Ships with an
//! in-memory reference implementation used by tests and the service
//! facade's default wiring.

mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::{RecordBatch, RecordStore};
