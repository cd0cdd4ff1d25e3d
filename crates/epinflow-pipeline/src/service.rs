//! The settlement service facade: job lifecycle operations plus the
//! report surface consumed by the REST layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use epinflow_core::error::{EpinError, EpinResult};
use epinflow_core::models::{JobStatus, ProcessingJob, ReportFilter};
use epinflow_reports::{
    vss110_destination_rollup, vss110_stats, vss120_report, vss130_report, vss140_report,
    DestinationRollup, Vss110StatsReport, Vss120Report, Vss130Report, Vss140Report,
};
use epinflow_store::RecordStore;

use crate::config::PipelineConfig;
use crate::pipeline::run_processing;

/// Synchronous settlement-file service over a record store.
///
/// Each submit or retry runs the whole pipeline to a terminal state on the
/// caller's thread. Concurrent calls on different jobs are independent;
/// serialising concurrent submit/retry for the same job is the caller's
/// responsibility.
pub struct SettlementService<S: RecordStore> {
    store: Arc<S>,
    config: PipelineConfig,
    /// Original file content per job, retained so a retry without a
    /// replacement blob can re-run the original submission.
    blobs: Mutex<HashMap<Uuid, Vec<u8>>>,
}

impl<S: RecordStore> SettlementService<S> {
    /// Create a service with default pipeline configuration.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            config: PipelineConfig::default(),
            blobs: Mutex::new(HashMap::new()),
        }
    }

    /// Create a service with a validated custom configuration.
    pub fn with_config(store: Arc<S>, config: PipelineConfig) -> EpinResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            blobs: Mutex::new(HashMap::new()),
        })
    }

    /// The underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Accept an uploaded file and synchronously drive it to a terminal
    /// state. Returns the job's final snapshot.
    pub fn submit(&self, filename: &str, content: Vec<u8>, size: u64) -> EpinResult<ProcessingJob> {
        let job = ProcessingJob::new(filename, size);
        info!(job_id = %job.id, filename, size, "file submitted");
        self.store.insert_job(&job)?;
        self.store.health_check()?;
        self.remember_blob(job.id, &content)?;
        run_processing(self.store.as_ref(), &self.config, job, &content)
    }

    /// Current snapshot of a job.
    pub fn status(&self, job_id: Uuid) -> EpinResult<ProcessingJob> {
        self.store
            .find_job(job_id)?
            .ok_or(EpinError::JobNotFound { job_id })
    }

    /// Jobs for one client, most recent first.
    pub fn list_by_client(&self, client_id: &str) -> EpinResult<Vec<ProcessingJob>> {
        self.store.jobs_by_client(client_id)
    }

    /// Re-run a terminal job. Purges every record owned by the job, then
    /// re-runs submit semantics over the replacement content, or the
    /// retained original when none is supplied.
    pub fn retry(&self, job_id: Uuid, new_content: Option<Vec<u8>>) -> EpinResult<ProcessingJob> {
        let mut job = self.status(job_id)?;
        if !job.status.allows_retry() {
            return Err(EpinError::BadJobState {
                job_id,
                status: job.status,
                message: "job status does not permit retry".to_string(),
            });
        }
        if job.retry_count >= job.max_retries {
            return Err(EpinError::BadJobState {
                job_id,
                status: job.status,
                message: format!("retry limit of {} reached", job.max_retries),
            });
        }
        let content = match new_content {
            Some(content) => {
                self.remember_blob(job_id, &content)?;
                content
            }
            None => self.recall_blob(job_id)?,
        };

        let removed = self.store.delete_job_records(job_id)?;
        info!(job_id = %job_id, removed, retry = job.retry_count + 1, "retrying job");
        job.transition(JobStatus::Uploaded)?;
        job.reset_for_retry();
        self.store.save_job(&job)?;
        run_processing(self.store.as_ref(), &self.config, job, &content)
    }

    /// Mark an active job CANCELLED. The processing thread observes the
    /// cancellation at its next batch boundary; progress committed so far
    /// is preserved.
    pub fn cancel(&self, job_id: Uuid) -> EpinResult<ProcessingJob> {
        let mut job = self.status(job_id)?;
        if !job.status.is_active() {
            return Err(EpinError::BadJobState {
                job_id,
                status: job.status,
                message: "only active jobs can be cancelled".to_string(),
            });
        }
        job.transition(JobStatus::Cancelled)?;
        self.store.save_job(&job)?;
        info!(job_id = %job_id, "job cancelled");
        Ok(job)
    }

    /// Aggregate job statistics plus a recent-jobs window.
    pub fn stats(&self) -> EpinResult<ServiceStats> {
        let jobs = self.store.all_jobs()?;
        let status_counts = self.store.count_jobs_by_status()?;

        let completed = *status_counts.get(&JobStatus::Completed).unwrap_or(&0);
        let failed = *status_counts.get(&JobStatus::Failed).unwrap_or(&0);
        let active = *status_counts.get(&JobStatus::Uploaded).unwrap_or(&0)
            + *status_counts.get(&JobStatus::Processing).unwrap_or(&0);

        let terminal = completed + failed;
        let success_rate = if terminal > 0 {
            completed as f64 / terminal as f64
        } else {
            0.0
        };

        let durations: Vec<f64> = jobs.iter().filter_map(|j| j.processing_seconds()).collect();
        let avg_processing_seconds = if durations.is_empty() {
            0.0
        } else {
            durations.iter().sum::<f64>() / durations.len() as f64
        };

        let record_counts: Vec<u64> = jobs
            .iter()
            .filter(|j| j.status.is_terminal())
            .map(|j| j.processed_records)
            .collect();
        let avg_records_per_job = if record_counts.is_empty() {
            0.0
        } else {
            record_counts.iter().sum::<u64>() as f64 / record_counts.len() as f64
        };

        Ok(ServiceStats {
            total_jobs: jobs.len() as u64,
            active_jobs: active,
            completed_jobs: completed,
            failed_jobs: failed,
            success_rate,
            avg_processing_seconds,
            avg_records_per_job,
            max_records_per_job: record_counts.iter().max().copied().unwrap_or(0),
            min_records_per_job: record_counts.iter().min().copied().unwrap_or(0),
            status_distribution: status_counts
                .into_iter()
                .map(|(status, count)| (status.to_string(), count))
                .collect(),
            recent_jobs: jobs.into_iter().take(5).collect(),
        })
    }

    // -- report surface --

    pub fn vss110_stats(&self, filter: &ReportFilter) -> EpinResult<Vss110StatsReport> {
        vss110_stats(self.store.as_ref(), filter)
    }

    pub fn vss120_report(&self, filter: &ReportFilter) -> EpinResult<Vss120Report> {
        vss120_report(self.store.as_ref(), filter)
    }

    pub fn vss130_report(&self, filter: &ReportFilter) -> EpinResult<Vss130Report> {
        vss130_report(self.store.as_ref(), filter)
    }

    pub fn vss140_report(&self, filter: &ReportFilter) -> EpinResult<Vss140Report> {
        vss140_report(self.store.as_ref(), filter)
    }

    pub fn vss110_destination_rollup(
        &self,
        filter: &ReportFilter,
    ) -> EpinResult<Vec<DestinationRollup>> {
        vss110_destination_rollup(self.store.as_ref(), filter)
    }

    fn remember_blob(&self, job_id: Uuid, content: &[u8]) -> EpinResult<()> {
        self.blobs
            .lock()
            .map_err(|_| EpinError::store("blob cache lock poisoned"))?
            .insert(job_id, content.to_vec());
        Ok(())
    }

    fn recall_blob(&self, job_id: Uuid) -> EpinResult<Vec<u8>> {
        self.blobs
            .lock()
            .map_err(|_| EpinError::store("blob cache lock poisoned"))?
            .get(&job_id)
            .cloned()
            .ok_or_else(|| EpinError::BadJobState {
                job_id,
                status: JobStatus::Failed,
                message: "original file content is no longer retained; supply a new blob"
                    .to_string(),
            })
    }
}

/// Aggregate counts and a recent-jobs window for the dashboard surface.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub total_jobs: u64,
    pub active_jobs: u64,
    pub completed_jobs: u64,
    pub failed_jobs: u64,
    /// Completed over terminal (completed + failed) jobs
    pub success_rate: f64,
    pub avg_processing_seconds: f64,
    /// Mean processed records across terminal jobs
    pub avg_records_per_job: f64,
    pub max_records_per_job: u64,
    pub min_records_per_job: u64,
    pub status_distribution: HashMap<String, u64>,
    pub recent_jobs: Vec<ProcessingJob>,
}
