//! The transactional batch writer.
//!
//! Each batch dispatches its lines to the record parsers, links TCR1
//! amount rows to their parent TCR0 context, and commits the typed
//! records plus the job's counter snapshot in one atomic store write.
//! The active-parent slot survives batch boundaries through
//! `BatchContext`, which is confined to one job's processing thread.

use tracing::{debug, warn};
use uuid::Uuid;

use epinflow_core::error::{EpinError, EpinResult};
use epinflow_core::models::{ProcessingJob, ReportFamily, ReportFormat, Vss120Record};
use epinflow_parser::{
    classify, parse_header, parse_subgroup4, parse_tcr1, parse_vss110, RecordType,
};
use epinflow_store::{RecordBatch, RecordStore};

use crate::config::PipelineConfig;
use crate::retry::with_retry;

/// Parent TCR0 reference carried across lines and batch boundaries.
#[derive(Debug, Clone)]
pub(crate) struct ActiveParent {
    pub id: Uuid,
    pub destination_id: String,
    pub report_number: u16,
}

impl ActiveParent {
    fn from_record(record: &Vss120Record) -> Self {
        Self {
            id: record.envelope.id,
            destination_id: record.destination_id.clone(),
            report_number: record
                .report_family()
                .map(|f| f.number())
                .unwrap_or(120),
        }
    }
}

/// Pipeline-local carry-over state passed between batch invocations.
#[derive(Debug, Default)]
pub(crate) struct BatchContext {
    pub active_parent: Option<ActiveParent>,
}

/// Per-batch counter deltas and collected error lines.
#[derive(Debug, Default)]
pub(crate) struct BatchOutcome {
    pub processed: u64,
    pub failed: u64,
    pub errors: Vec<String>,
}

/// Parse one batch of lines and commit it atomically, updating the job's
/// counters in the same write. Transient store failures are retried with
/// linear backoff; parse failures never are.
pub(crate) fn write_batch<S: RecordStore>(
    store: &S,
    config: &PipelineConfig,
    job: &mut ProcessingJob,
    ctx: &mut BatchContext,
    lines: &[(u64, String)],
) -> EpinResult<BatchOutcome> {
    let mut outcome = BatchOutcome::default();
    let mut batch = RecordBatch::default();

    for (line_number, line) in lines {
        job.total_records += 1;
        match parse_line(store, config, job, ctx, &mut batch, *line_number, line) {
            Ok(LineResult::Valid) => {
                job.processed_records += 1;
                outcome.processed += 1;
            }
            Ok(LineResult::Invalid(message)) => {
                job.failed_records += 1;
                outcome.failed += 1;
                outcome.errors.push(format!("line {line_number}: {message}"));
                if !config.skip_invalid_records {
                    return Err(EpinError::invariant(message, *line_number));
                }
            }
            Err(err) => {
                // Unparseable line: nothing could be persisted for it.
                // The error text already carries the line number.
                job.failed_records += 1;
                outcome.failed += 1;
                outcome.errors.push(err.to_string());
                if !config.skip_invalid_records {
                    return Err(err);
                }
            }
        }
    }

    job.touch();
    batch.job = Some(job.clone());
    debug!(
        job_id = %job.id,
        records = batch.len(),
        processed = outcome.processed,
        failed = outcome.failed,
        "committing batch"
    );
    with_retry(config.max_attempts, |_| store.commit_batch(batch.clone()))?;
    Ok(outcome)
}

enum LineResult {
    Valid,
    /// Record persisted with `is_valid = false`; message summarizes why.
    Invalid(String),
}

#[allow(clippy::too_many_arguments)]
fn parse_line<S: RecordStore>(
    store: &S,
    config: &PipelineConfig,
    job: &mut ProcessingJob,
    ctx: &mut BatchContext,
    batch: &mut RecordBatch,
    line_number: u64,
    line: &str,
) -> EpinResult<LineResult> {
    let mode = config.parse_mode;
    match classify(line) {
        RecordType::Header => {
            let header = parse_header(line, line_number, job.id)?;
            if !header.client_id.is_empty() {
                job.client_id = Some(header.client_id.clone());
            }
            let result = line_result(header.envelope.is_valid, &header.envelope.validation_errors);
            batch.headers.push(header);
            Ok(result)
        }
        RecordType::V2110 => {
            let record = parse_vss110(line, line_number, job.id, mode)?;
            job.report_format = job.report_format.merge(ReportFormat::Vss110);
            let result = line_result(record.envelope.is_valid, &record.envelope.validation_errors);
            batch.vss110.push(record);
            Ok(result)
        }
        RecordType::V4120 | RecordType::V4130 | RecordType::V4140 => {
            let record = parse_subgroup4(line, line_number, job.id, mode)?;
            if let Some(family) = record.report_family() {
                job.report_format = job.report_format.merge(family_format(family));
            }
            ctx.active_parent = Some(ActiveParent::from_record(&record));
            let result = line_result(record.envelope.is_valid, &record.envelope.validation_errors);
            batch.vss120.push(record);
            Ok(result)
        }
        RecordType::Tcr1 => {
            let mut record = parse_tcr1(line, line_number, job.id, mode)?;
            match &ctx.active_parent {
                Some(parent) => {
                    record.parent_tcr0_id = Some(parent.id);
                    record.destination_id = parent.destination_id.clone();
                    record.parent_report_number = parent.report_number;
                }
                None => match recover_parent(store, job.id)? {
                    Some(parent) => {
                        warn!(job_id = %job.id, line_number, "recovered TCR1 parent from store");
                        record.parent_tcr0_id = Some(parent.id);
                        record.destination_id = parent.destination_id.clone();
                        record.parent_report_number = parent.report_number;
                        ctx.active_parent = Some(parent);
                    }
                    None => {
                        record
                            .envelope
                            .add_error("no parent TCR0 found; orphan defaults applied".to_string());
                    }
                },
            }
            let result = line_result(record.envelope.is_valid, &record.envelope.validation_errors);
            batch.tcr1.push(record);
            Ok(result)
        }
        RecordType::Unknown => Err(EpinError::UnknownRecordType { line_number }),
    }
}

fn line_result(is_valid: bool, errors: &[String]) -> LineResult {
    if is_valid {
        LineResult::Valid
    } else {
        LineResult::Invalid(errors.join("; "))
    }
}

/// Orphan-TCR1 parent recovery: the most recently persisted subgroup-4
/// TCR0 of this job, preferring VSS-140, then VSS-130, then VSS-120.
fn recover_parent<S: RecordStore>(store: &S, job_id: Uuid) -> EpinResult<Option<ActiveParent>> {
    for family in [ReportFamily::Vss140, ReportFamily::Vss130, ReportFamily::Vss120] {
        if let Some(record) = store.latest_vss120_by_job_and_family(job_id, family)? {
            return Ok(Some(ActiveParent::from_record(&record)));
        }
    }
    Ok(None)
}

fn family_format(family: ReportFamily) -> ReportFormat {
    match family {
        ReportFamily::Vss120 => ReportFormat::Vss120,
        ReportFamily::Vss130 => ReportFormat::Vss130,
        ReportFamily::Vss140 => ReportFormat::Vss140,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epinflow_core::models::ReportFormat;
    use epinflow_store::MemoryStore;
    use epinflow_test_utils::{
        subgroup4_line, tcr1_line, vss110_line, Subgroup4Spec, Tcr1Spec, Vss110Spec,
    };

    fn setup() -> (MemoryStore, PipelineConfig, ProcessingJob) {
        let store = MemoryStore::new();
        let job = ProcessingJob::new("settlement.txt", 1024);
        store.insert_job(&job).unwrap();
        (store, PipelineConfig::default(), job)
    }

    fn numbered(lines: &[String]) -> Vec<(u64, String)> {
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| (i as u64 + 1, l.clone()))
            .collect()
    }

    #[test]
    fn test_tcr1_links_to_preceding_tcr0() {
        let (store, config, mut job) = setup();
        let mut ctx = BatchContext::default();
        let lines = numbered(&[
            subgroup4_line(&Subgroup4Spec::default()),
            tcr1_line(&Tcr1Spec::default()),
        ]);
        let outcome = write_batch(&store, &config, &mut job, &mut ctx, &lines).unwrap();
        assert_eq!(outcome.processed, 2);
        assert_eq!(outcome.failed, 0);

        let parents = store.vss120_by_job(job.id).unwrap();
        let children = store.tcr1_by_job(job.id).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].parent_tcr0_id, Some(parents[0].envelope.id));
        assert_eq!(children[0].destination_id, parents[0].destination_id);
        assert_eq!(children[0].parent_report_number, 120);
        assert!(children[0].envelope.is_valid);
    }

    #[test]
    fn test_active_parent_survives_batch_boundary() {
        let (store, config, mut job) = setup();
        let mut ctx = BatchContext::default();

        let first = numbered(&[subgroup4_line(&Subgroup4Spec::default())]);
        write_batch(&store, &config, &mut job, &mut ctx, &first).unwrap();

        let second = vec![(2u64, tcr1_line(&Tcr1Spec::default()))];
        write_batch(&store, &config, &mut job, &mut ctx, &second).unwrap();

        let children = store.tcr1_by_job(job.id).unwrap();
        assert_eq!(children.len(), 1);
        assert!(children[0].parent_tcr0_id.is_some());
        assert_eq!(children[0].destination_id, "123456");
        assert!(children[0].envelope.is_valid);
    }

    #[test]
    fn test_orphan_recovery_prefers_latest_vss140() {
        let (store, config, mut job) = setup();

        // Persist parents of all three families with one context...
        let mut seed_ctx = BatchContext::default();
        let lines = numbered(&[
            subgroup4_line(&Subgroup4Spec::default()),
            subgroup4_line(&Subgroup4Spec {
                report_id: "130".to_string(),
                destination_id: "130130".to_string(),
                ..Default::default()
            }),
            subgroup4_line(&Subgroup4Spec {
                report_id: "140".to_string(),
                destination_id: "140140".to_string(),
                ..Default::default()
            }),
        ]);
        write_batch(&store, &config, &mut job, &mut seed_ctx, &lines).unwrap();

        // ...then process a TCR1 with a fresh context, as after a restart.
        let mut ctx = BatchContext::default();
        let orphan = vec![(9u64, tcr1_line(&Tcr1Spec::default()))];
        write_batch(&store, &config, &mut job, &mut ctx, &orphan).unwrap();

        let children = store.tcr1_by_job(job.id).unwrap();
        assert_eq!(children[0].destination_id, "140140");
        assert_eq!(children[0].parent_report_number, 140);
        assert!(children[0].envelope.is_valid);
    }

    #[test]
    fn test_orphan_without_any_parent_gets_defaults() {
        let (store, config, mut job) = setup();
        let mut ctx = BatchContext::default();
        let orphan = vec![(1u64, tcr1_line(&Tcr1Spec::default()))];
        let outcome = write_batch(&store, &config, &mut job, &mut ctx, &orphan).unwrap();
        assert_eq!(outcome.failed, 1);

        let children = store.tcr1_by_job(job.id).unwrap();
        assert_eq!(children[0].destination_id, "000000");
        assert_eq!(children[0].parent_tcr0_id, None);
        assert_eq!(children[0].parent_report_number, 120);
        assert!(!children[0].envelope.is_valid);
    }

    #[test]
    fn test_unknown_line_counted_not_persisted() {
        let (store, config, mut job) = setup();
        let mut ctx = BatchContext::default();
        let lines = vec![
            (1u64, vss110_line(&Vss110Spec::default())),
            (2u64, "this is not a settlement record".to_string()),
        ];
        let outcome = write_batch(&store, &config, &mut job, &mut ctx, &lines).unwrap();
        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.failed, 1);
        assert!(outcome.errors[0].contains("line 2"));
        assert_eq!(job.total_records, 2);
        assert_eq!(store.vss110_by_job(job.id).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_record_aborts_batch_when_skip_disabled() {
        let (store, _, mut job) = setup();
        let config = PipelineConfig {
            skip_invalid_records: false,
            ..Default::default()
        };
        let mut ctx = BatchContext::default();
        let lines = numbered(&[subgroup4_line(&Subgroup4Spec {
            jurisdiction: "ZZ".to_string(),
            ..Default::default()
        })]);
        assert!(write_batch(&store, &config, &mut job, &mut ctx, &lines).is_err());
        // The batch never committed
        assert!(store.vss120_by_job(job.id).unwrap().is_empty());
    }

    #[test]
    fn test_report_format_upgrades_to_mixed() {
        let (store, config, mut job) = setup();
        let mut ctx = BatchContext::default();
        let lines = numbered(&[
            vss110_line(&Vss110Spec::default()),
            subgroup4_line(&Subgroup4Spec::default()),
        ]);
        write_batch(&store, &config, &mut job, &mut ctx, &lines).unwrap();
        assert_eq!(job.report_format, ReportFormat::Mixed);
    }
}
