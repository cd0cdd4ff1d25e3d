//! # epinflow-parser
//!
//! Line-oriented decoding of VSS EPIN settlement files: a record type
//! dispatcher plus one positional parser per record kind (VSS-110 TCR0,
//! subgroup-4 TCR0, subgroup-4 TCR1, file header). Parsers collect field
//! validation errors on the record envelope instead of aborting, so every
//! recognizable line survives to persistence with its audit trail.

mod dispatcher;
mod fields;
mod header;
mod tcr1;
mod vss110;
mod vss120;

pub use dispatcher::{classify, RecordType};
pub use header::parse_header;
pub use tcr1::{parse_tcr1, ORPHAN_DESTINATION_ID, TCR1_MIN_LINE_LEN};
pub use vss110::{parse_vss110, TCR0_MIN_LINE_LEN};
pub use vss120::parse_subgroup4;
