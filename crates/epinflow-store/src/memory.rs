//! In-memory reference implementation of the record store.
//!
//! Typed maps behind one `RwLock`; `commit_batch` holds the write lock for
//! the whole batch so readers only ever observe committed batches.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;
use uuid::Uuid;

use epinflow_core::error::{EpinError, EpinResult};
use epinflow_core::models::{
    EpinFileHeader, JobStatus, ProcessingJob, ReportFamily, ReportFilter, Vss110Record,
    Vss120Record, Vss120Tcr1Record,
};

use crate::traits::{RecordBatch, RecordStore};

#[derive(Default)]
struct Collections {
    jobs: HashMap<Uuid, ProcessingJob>,
    headers: HashMap<Uuid, EpinFileHeader>,
    vss110: HashMap<Uuid, Vss110Record>,
    vss120: HashMap<Uuid, Vss120Record>,
    tcr1: HashMap<Uuid, Vss120Tcr1Record>,
}

/// In-memory record store.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EpinResult<std::sync::RwLockReadGuard<'_, Collections>> {
        self.inner
            .read()
            .map_err(|_| EpinError::store("store lock poisoned"))
    }

    fn write(&self) -> EpinResult<std::sync::RwLockWriteGuard<'_, Collections>> {
        self.inner
            .write()
            .map_err(|_| EpinError::store("store lock poisoned"))
    }
}

fn save_job_in(collections: &mut Collections, job: &ProcessingJob) -> EpinResult<()> {
    match collections.jobs.get(&job.id) {
        None => Err(EpinError::store(format!("job {} does not exist", job.id))),
        Some(stored) if job.version <= stored.version => Err(EpinError::store(format!(
            "version conflict on job {}: stored {}, incoming {}",
            job.id, stored.version, job.version
        ))),
        Some(_) => {
            collections.jobs.insert(job.id, job.clone());
            Ok(())
        }
    }
}

impl RecordStore for MemoryStore {
    fn health_check(&self) -> EpinResult<()> {
        self.read().map(|_| ())
    }

    fn insert_job(&self, job: &ProcessingJob) -> EpinResult<()> {
        let mut collections = self.write()?;
        if collections.jobs.contains_key(&job.id) {
            return Err(EpinError::store(format!("job {} already exists", job.id)));
        }
        collections.jobs.insert(job.id, job.clone());
        Ok(())
    }

    fn save_job(&self, job: &ProcessingJob) -> EpinResult<()> {
        let mut collections = self.write()?;
        save_job_in(&mut collections, job)
    }

    fn find_job(&self, job_id: Uuid) -> EpinResult<Option<ProcessingJob>> {
        Ok(self.read()?.jobs.get(&job_id).cloned())
    }

    fn jobs_by_client(&self, client_id: &str) -> EpinResult<Vec<ProcessingJob>> {
        let collections = self.read()?;
        let mut jobs: Vec<ProcessingJob> = collections
            .jobs
            .values()
            .filter(|j| j.client_id.as_deref() == Some(client_id))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    fn all_jobs(&self) -> EpinResult<Vec<ProcessingJob>> {
        let collections = self.read()?;
        let mut jobs: Vec<ProcessingJob> = collections.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    fn count_jobs_by_status(&self) -> EpinResult<HashMap<JobStatus, u64>> {
        let collections = self.read()?;
        let mut counts = HashMap::new();
        for job in collections.jobs.values() {
            *counts.entry(job.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn commit_batch(&self, batch: RecordBatch) -> EpinResult<()> {
        let mut collections = self.write()?;
        debug!(records = batch.len(), "committing batch");
        for header in batch.headers {
            collections.headers.insert(header.envelope.id, header);
        }
        for record in batch.vss110 {
            collections.vss110.insert(record.envelope.id, record);
        }
        for record in batch.vss120 {
            collections.vss120.insert(record.envelope.id, record);
        }
        for record in batch.tcr1 {
            collections.tcr1.insert(record.envelope.id, record);
        }
        if let Some(job) = batch.job {
            save_job_in(&mut collections, &job)?;
        }
        Ok(())
    }

    fn find_vss110(&self, id: Uuid) -> EpinResult<Option<Vss110Record>> {
        Ok(self.read()?.vss110.get(&id).cloned())
    }

    fn find_vss120(&self, id: Uuid) -> EpinResult<Option<Vss120Record>> {
        Ok(self.read()?.vss120.get(&id).cloned())
    }

    fn find_tcr1(&self, id: Uuid) -> EpinResult<Option<Vss120Tcr1Record>> {
        Ok(self.read()?.tcr1.get(&id).cloned())
    }

    fn find_header_by_job(&self, job_id: Uuid) -> EpinResult<Option<EpinFileHeader>> {
        Ok(self
            .read()?
            .headers
            .values()
            .find(|h| h.envelope.job_id == job_id)
            .cloned())
    }

    fn vss110_by_job(&self, job_id: Uuid) -> EpinResult<Vec<Vss110Record>> {
        let collections = self.read()?;
        let mut records: Vec<Vss110Record> = collections
            .vss110
            .values()
            .filter(|r| r.envelope.job_id == job_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.envelope.line_number);
        Ok(records)
    }

    fn vss120_by_job(&self, job_id: Uuid) -> EpinResult<Vec<Vss120Record>> {
        let collections = self.read()?;
        let mut records: Vec<Vss120Record> = collections
            .vss120
            .values()
            .filter(|r| r.envelope.job_id == job_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.envelope.line_number);
        Ok(records)
    }

    fn tcr1_by_job(&self, job_id: Uuid) -> EpinResult<Vec<Vss120Tcr1Record>> {
        let collections = self.read()?;
        let mut records: Vec<Vss120Tcr1Record> = collections
            .tcr1
            .values()
            .filter(|r| r.envelope.job_id == job_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.envelope.line_number);
        Ok(records)
    }

    fn latest_vss120_by_job_and_family(
        &self,
        job_id: Uuid,
        family: ReportFamily,
    ) -> EpinResult<Option<Vss120Record>> {
        let collections = self.read()?;
        Ok(collections
            .vss120
            .values()
            .filter(|r| r.envelope.job_id == job_id && r.report_family() == Some(family))
            .max_by_key(|r| r.envelope.line_number)
            .cloned())
    }

    fn delete_job_records(&self, job_id: Uuid) -> EpinResult<u64> {
        let mut collections = self.write()?;
        let before = collections.headers.len()
            + collections.vss110.len()
            + collections.vss120.len()
            + collections.tcr1.len();
        collections.headers.retain(|_, h| h.envelope.job_id != job_id);
        collections.vss110.retain(|_, r| r.envelope.job_id != job_id);
        collections.vss120.retain(|_, r| r.envelope.job_id != job_id);
        collections.tcr1.retain(|_, r| r.envelope.job_id != job_id);
        let after = collections.headers.len()
            + collections.vss110.len()
            + collections.vss120.len()
            + collections.tcr1.len();
        let removed = (before - after) as u64;
        debug!(%job_id, removed, "deleted job records");
        Ok(removed)
    }

    fn vss110_matching(&self, filter: &ReportFilter) -> EpinResult<Vec<Vss110Record>> {
        let collections = self.read()?;
        let mut records: Vec<Vss110Record> = collections
            .vss110
            .values()
            .filter(|r| filter.matches_vss110(r))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.envelope.line_number);
        Ok(records)
    }

    fn vss120_with_children(
        &self,
        filter: &ReportFilter,
        family: ReportFamily,
    ) -> EpinResult<Vec<(Vss120Record, Vec<Vss120Tcr1Record>)>> {
        let collections = self.read()?;
        let mut parents: Vec<Vss120Record> = collections
            .vss120
            .values()
            .filter(|r| r.report_family() == Some(family) && filter.matches_vss120(r))
            .cloned()
            .collect();
        parents.sort_by(|a, b| {
            (a.business_mode, &a.business_transaction_type, &a.business_transaction_cycle).cmp(&(
                b.business_mode,
                &b.business_transaction_type,
                &b.business_transaction_cycle,
            ))
        });

        let mut children_by_parent: HashMap<Uuid, Vec<Vss120Tcr1Record>> = HashMap::new();
        for tcr1 in collections.tcr1.values() {
            if let Some(parent_id) = tcr1.parent_tcr0_id {
                children_by_parent
                    .entry(parent_id)
                    .or_default()
                    .push(tcr1.clone());
            }
        }

        Ok(parents
            .into_iter()
            .map(|parent| {
                let mut children = children_by_parent
                    .remove(&parent.envelope.id)
                    .unwrap_or_default();
                children.sort_by_key(|c| c.envelope.line_number);
                (parent, children)
            })
            .collect())
    }
}
