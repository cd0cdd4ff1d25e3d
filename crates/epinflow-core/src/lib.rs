//! # epinflow-core
//!
//! Core domain types for VSS EPIN settlement file processing:
//! - Positional field codec (substring extraction, implied-decimal
//!   amounts, CR/DB signs, CCYYDDD/CCYDDD dates)
//! - Domain models (processing jobs, file headers, VSS-110 records,
//!   subgroup-4 TCR0/TCR1 records) over a shared record envelope
//! - Error taxonomy with transient/permanent classification
//! - Code-to-label lookup tables for report output

pub mod codec;
pub mod error;
pub mod labels;
pub mod models;

pub use codec::*;
pub use error::*;
pub use models::*;
