//! The per-job processing loop: stream lines, batch, commit, finish.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use epinflow_core::error::{EpinError, EpinResult};
use epinflow_core::models::{summarize_errors, JobStatus, ProcessingJob};
use epinflow_store::RecordStore;

use crate::batch::{write_batch, BatchContext};
use crate::config::PipelineConfig;

/// Drive one job from UPLOADED to a terminal state over the given file
/// content. Runs synchronously on the caller's thread; cancellation from
/// another thread is observed at batch boundaries.
pub(crate) fn run_processing<S: RecordStore>(
    store: &S,
    config: &PipelineConfig,
    mut job: ProcessingJob,
    content: &[u8],
) -> EpinResult<ProcessingJob> {
    job.transition(JobStatus::Processing)?;
    store.save_job(&job)?;
    info!(job_id = %job.id, filename = %job.original_filename, "processing started");

    let text = match std::str::from_utf8(content) {
        Ok(text) => text,
        Err(err) => {
            return fail_job(store, config, job, vec![format!("file is not valid UTF-8: {err}")]);
        }
    };

    let deadline = Instant::now() + Duration::from_secs(config.job_timeout_secs);
    let batch_budget = Duration::from_secs(config.batch_timeout_secs);
    let mut ctx = BatchContext::default();
    let mut errors: Vec<String> = Vec::new();
    let mut pending: Vec<(u64, String)> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        pending.push((index as u64 + 1, line.to_string()));
        if pending.len() < config.batch_size {
            continue;
        }
        match commit_pending(store, config, &mut job, &mut ctx, &mut pending, deadline, batch_budget)
        {
            Ok(BoundaryOutcome::Continue(batch_errors)) => errors.extend(batch_errors),
            Ok(BoundaryOutcome::Cancelled(observed)) => return Ok(observed),
            Err(err) => {
                errors.push(err.to_string());
                return fail_job(store, config, job, errors);
            }
        }
    }

    if !pending.is_empty() {
        match commit_pending(store, config, &mut job, &mut ctx, &mut pending, deadline, batch_budget)
        {
            Ok(BoundaryOutcome::Continue(batch_errors)) => errors.extend(batch_errors),
            Ok(BoundaryOutcome::Cancelled(observed)) => return Ok(observed),
            Err(err) => {
                errors.push(err.to_string());
                return fail_job(store, config, job, errors);
            }
        }
    }

    // COMPLETED iff at least one valid record was persisted.
    if job.processed_records > 0 {
        job.error_summary = summarize_errors(&errors, config.error_summary_limit);
        job.transition(JobStatus::Completed)?;
        store.save_job(&job)?;
        info!(
            job_id = %job.id,
            processed = job.processed_records,
            failed = job.failed_records,
            format = ?job.report_format,
            "processing completed"
        );
        Ok(job)
    } else {
        if errors.is_empty() {
            errors.push("no records found in file".to_string());
        }
        fail_job(store, config, job, errors)
    }
}

enum BoundaryOutcome {
    Continue(Vec<String>),
    /// The job was cancelled from another thread; further batches are not
    /// scheduled and the observed snapshot is returned.
    Cancelled(ProcessingJob),
}

#[allow(clippy::too_many_arguments)]
fn commit_pending<S: RecordStore>(
    store: &S,
    config: &PipelineConfig,
    job: &mut ProcessingJob,
    ctx: &mut BatchContext,
    pending: &mut Vec<(u64, String)>,
    deadline: Instant,
    batch_budget: Duration,
) -> EpinResult<BoundaryOutcome> {
    // Cancellation and concurrent-writer reconciliation at the boundary.
    if let Some(stored) = store.find_job(job.id)? {
        if stored.status == JobStatus::Cancelled {
            info!(job_id = %job.id, "cancellation observed at batch boundary");
            return Ok(BoundaryOutcome::Cancelled(stored));
        }
        job.version = job.version.max(stored.version);
    }

    if Instant::now() >= deadline {
        return Err(EpinError::store(format!(
            "job processing budget of {}s exceeded",
            config.job_timeout_secs
        )));
    }

    let lines = std::mem::take(pending);
    let started = Instant::now();
    let outcome = write_batch(store, config, job, ctx, &lines)?;
    let elapsed = started.elapsed();
    if elapsed > batch_budget {
        warn!(
            job_id = %job.id,
            elapsed_ms = elapsed.as_millis() as u64,
            budget_ms = batch_budget.as_millis() as u64,
            "batch exceeded its time budget"
        );
    }
    Ok(BoundaryOutcome::Continue(outcome.errors))
}

fn fail_job<S: RecordStore>(
    store: &S,
    config: &PipelineConfig,
    mut job: ProcessingJob,
    errors: Vec<String>,
) -> EpinResult<ProcessingJob> {
    job.error_summary = summarize_errors(&errors, config.error_summary_limit);
    job.transition(JobStatus::Failed)?;
    store.save_job(&job)?;
    warn!(
        job_id = %job.id,
        failed = job.failed_records,
        "processing failed: {}",
        job.error_summary.as_deref().unwrap_or("unknown error")
    );
    Ok(job)
}
