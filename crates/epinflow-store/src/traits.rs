//! The record store contract.
//!
//! The relational store is modeled as a transactional key-addressed record
//! sink with range/filter queries. Per-batch isolation comes from
//! `commit_batch`: one call applies a whole batch's typed inserts plus the
//! job-counter snapshot atomically, or not at all. Serialisation of
//! concurrent submit/retry for the same job is the caller's
//! responsibility; reads are consistent with the most recent committed
//! batch.

use std::collections::HashMap;

use uuid::Uuid;

use epinflow_core::error::EpinResult;
use epinflow_core::models::{
    EpinFileHeader, JobStatus, ProcessingJob, ReportFamily, ReportFilter, Vss110Record,
    Vss120Record, Vss120Tcr1Record,
};

/// One batch's worth of typed inserts plus the owning job's updated
/// counter snapshot, applied atomically by `RecordStore::commit_batch`.
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    /// Updated job snapshot committed with the records
    pub job: Option<ProcessingJob>,
    pub headers: Vec<EpinFileHeader>,
    pub vss110: Vec<Vss110Record>,
    pub vss120: Vec<Vss120Record>,
    pub tcr1: Vec<Vss120Tcr1Record>,
}

impl RecordBatch {
    /// Number of records carried by this batch.
    pub fn len(&self) -> usize {
        self.headers.len() + self.vss110.len() + self.vss120.len() + self.tcr1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Typed persistence contract for all EPIN settlement entities.
pub trait RecordStore: Send + Sync {
    /// Verify the store is reachable before processing starts.
    fn health_check(&self) -> EpinResult<()>;

    // -- jobs --

    /// Insert a freshly created job. Fails if the id already exists.
    fn insert_job(&self, job: &ProcessingJob) -> EpinResult<()>;

    /// Persist an updated job snapshot. The incoming version token must be
    /// newer than the stored one; a stale write is a permanent error.
    fn save_job(&self, job: &ProcessingJob) -> EpinResult<()>;

    fn find_job(&self, job_id: Uuid) -> EpinResult<Option<ProcessingJob>>;

    /// Jobs for one client, most recent first.
    fn jobs_by_client(&self, client_id: &str) -> EpinResult<Vec<ProcessingJob>>;

    /// Every job, most recent first.
    fn all_jobs(&self) -> EpinResult<Vec<ProcessingJob>>;

    /// Job counts grouped by lifecycle status.
    fn count_jobs_by_status(&self) -> EpinResult<HashMap<JobStatus, u64>>;

    // -- batch write --

    /// Apply a whole batch atomically: every record insert plus the job
    /// snapshot, or nothing.
    fn commit_batch(&self, batch: RecordBatch) -> EpinResult<()>;

    // -- per-record reads --

    fn find_vss110(&self, id: Uuid) -> EpinResult<Option<Vss110Record>>;
    fn find_vss120(&self, id: Uuid) -> EpinResult<Option<Vss120Record>>;
    fn find_tcr1(&self, id: Uuid) -> EpinResult<Option<Vss120Tcr1Record>>;

    // -- per-job reads --

    fn find_header_by_job(&self, job_id: Uuid) -> EpinResult<Option<EpinFileHeader>>;
    fn vss110_by_job(&self, job_id: Uuid) -> EpinResult<Vec<Vss110Record>>;
    fn vss120_by_job(&self, job_id: Uuid) -> EpinResult<Vec<Vss120Record>>;
    fn tcr1_by_job(&self, job_id: Uuid) -> EpinResult<Vec<Vss120Tcr1Record>>;

    /// The most recently persisted subgroup-4 TCR0 of the given family for
    /// this job, by line number. Used by orphan-TCR1 parent recovery.
    fn latest_vss120_by_job_and_family(
        &self,
        job_id: Uuid,
        family: ReportFamily,
    ) -> EpinResult<Option<Vss120Record>>;

    /// Delete every record owned by the job across all typed collections.
    /// The job row itself is never deleted. Returns the number of records
    /// removed. Used by retry cleanup.
    fn delete_job_records(&self, job_id: Uuid) -> EpinResult<u64>;

    // -- report queries --

    /// VSS-110 rows matching the filter, ordered by line number.
    fn vss110_matching(&self, filter: &ReportFilter) -> EpinResult<Vec<Vss110Record>>;

    /// Subgroup-4 TCR0 rows of one family matching the filter, each paired
    /// with its TCR1 children, ordered by (business mode, business
    /// transaction type, cycle).
    fn vss120_with_children(
        &self,
        filter: &ReportFilter,
        family: ReportFamily,
    ) -> EpinResult<Vec<(Vss120Record, Vec<Vss120Tcr1Record>)>>;
}
