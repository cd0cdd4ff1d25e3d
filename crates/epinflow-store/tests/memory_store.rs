//! Behavioral tests for the in-memory record store.

use uuid::Uuid;

use epinflow_core::codec::ParseMode;
use epinflow_core::error::EpinError;
use epinflow_core::models::{JobStatus, ProcessingJob, ReportFamily, ReportFilter};
use epinflow_parser::{parse_subgroup4, parse_tcr1, parse_vss110};
use epinflow_store::{MemoryStore, RecordBatch, RecordStore};
use epinflow_test_utils::{subgroup4_line, tcr1_line, vss110_line, Subgroup4Spec, Tcr1Spec, Vss110Spec};

fn parsed_vss110(job_id: Uuid, line_number: u64, spec: &Vss110Spec) -> epinflow_core::models::Vss110Record {
    parse_vss110(&vss110_line(spec), line_number, job_id, ParseMode::Strict).unwrap()
}

fn parsed_subgroup4(
    job_id: Uuid,
    line_number: u64,
    spec: &Subgroup4Spec,
) -> epinflow_core::models::Vss120Record {
    parse_subgroup4(&subgroup4_line(spec), line_number, job_id, ParseMode::Strict).unwrap()
}

fn parsed_tcr1(job_id: Uuid, line_number: u64) -> epinflow_core::models::Vss120Tcr1Record {
    parse_tcr1(&tcr1_line(&Tcr1Spec::default()), line_number, job_id, ParseMode::Strict).unwrap()
}

#[test]
fn insert_and_find_job() {
    let store = MemoryStore::new();
    let job = ProcessingJob::new("epin_2024_061.txt", 2048);
    store.insert_job(&job).unwrap();

    let found = store.find_job(job.id).unwrap().unwrap();
    assert_eq!(found.original_filename, "epin_2024_061.txt");
    assert_eq!(found.status, JobStatus::Uploaded);
    assert!(store.find_job(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn duplicate_insert_rejected() {
    let store = MemoryStore::new();
    let job = ProcessingJob::new("a.txt", 1);
    store.insert_job(&job).unwrap();
    assert!(store.insert_job(&job).is_err());
}

#[test]
fn save_job_requires_newer_version() {
    let store = MemoryStore::new();
    let mut job = ProcessingJob::new("a.txt", 1);
    store.insert_job(&job).unwrap();

    // Stale snapshot (same version) is rejected
    let err = store.save_job(&job).unwrap_err();
    assert!(matches!(err, EpinError::Store { transient: false, .. }));

    job.touch();
    store.save_job(&job).unwrap();
    assert_eq!(store.find_job(job.id).unwrap().unwrap().version, job.version);
}

#[test]
fn commit_batch_is_atomic_with_job_snapshot() {
    let store = MemoryStore::new();
    let mut job = ProcessingJob::new("a.txt", 1);
    store.insert_job(&job).unwrap();

    job.total_records = 2;
    job.processed_records = 2;
    job.touch();
    let batch = RecordBatch {
        job: Some(job.clone()),
        vss110: vec![
            parsed_vss110(job.id, 1, &Vss110Spec::default()),
            parsed_vss110(job.id, 2, &Vss110Spec::default()),
        ],
        ..Default::default()
    };
    store.commit_batch(batch).unwrap();

    assert_eq!(store.vss110_by_job(job.id).unwrap().len(), 2);
    assert_eq!(store.find_job(job.id).unwrap().unwrap().processed_records, 2);
}

#[test]
fn records_ordered_by_line_number() {
    let store = MemoryStore::new();
    let job = ProcessingJob::new("a.txt", 1);
    store.insert_job(&job).unwrap();

    let batch = RecordBatch {
        vss110: vec![
            parsed_vss110(job.id, 30, &Vss110Spec::default()),
            parsed_vss110(job.id, 10, &Vss110Spec::default()),
            parsed_vss110(job.id, 20, &Vss110Spec::default()),
        ],
        ..Default::default()
    };
    store.commit_batch(batch).unwrap();

    let lines: Vec<u64> = store
        .vss110_by_job(job.id)
        .unwrap()
        .iter()
        .map(|r| r.envelope.line_number)
        .collect();
    assert_eq!(lines, vec![10, 20, 30]);
}

#[test]
fn latest_by_family_picks_highest_line_number() {
    let store = MemoryStore::new();
    let job = ProcessingJob::new("a.txt", 1);
    store.insert_job(&job).unwrap();

    let spec_120 = Subgroup4Spec::default();
    let spec_130 = Subgroup4Spec {
        report_id: "130".to_string(),
        ..Default::default()
    };
    let batch = RecordBatch {
        vss120: vec![
            parsed_subgroup4(job.id, 1, &spec_120),
            parsed_subgroup4(job.id, 5, &spec_120),
            parsed_subgroup4(job.id, 3, &spec_130),
        ],
        ..Default::default()
    };
    store.commit_batch(batch).unwrap();

    let latest = store
        .latest_vss120_by_job_and_family(job.id, ReportFamily::Vss120)
        .unwrap()
        .unwrap();
    assert_eq!(latest.envelope.line_number, 5);
    assert!(store
        .latest_vss120_by_job_and_family(job.id, ReportFamily::Vss140)
        .unwrap()
        .is_none());
}

#[test]
fn delete_job_records_cascades_but_keeps_job() {
    let store = MemoryStore::new();
    let job = ProcessingJob::new("a.txt", 1);
    let other = ProcessingJob::new("b.txt", 1);
    store.insert_job(&job).unwrap();
    store.insert_job(&other).unwrap();

    let mut tcr1 = parsed_tcr1(job.id, 3);
    let parent = parsed_subgroup4(job.id, 2, &Subgroup4Spec::default());
    tcr1.parent_tcr0_id = Some(parent.envelope.id);

    let batch = RecordBatch {
        vss110: vec![
            parsed_vss110(job.id, 1, &Vss110Spec::default()),
            parsed_vss110(other.id, 1, &Vss110Spec::default()),
        ],
        vss120: vec![parent],
        tcr1: vec![tcr1],
        ..Default::default()
    };
    store.commit_batch(batch).unwrap();

    let removed = store.delete_job_records(job.id).unwrap();
    assert_eq!(removed, 3);
    assert!(store.vss110_by_job(job.id).unwrap().is_empty());
    assert!(store.vss120_by_job(job.id).unwrap().is_empty());
    assert!(store.tcr1_by_job(job.id).unwrap().is_empty());
    // The job row and other jobs' records survive
    assert!(store.find_job(job.id).unwrap().is_some());
    assert_eq!(store.vss110_by_job(other.id).unwrap().len(), 1);
}

#[test]
fn filtered_scan_applies_all_predicates() {
    let store = MemoryStore::new();
    let job = ProcessingJob::new("a.txt", 1);
    store.insert_job(&job).unwrap();

    let eur = Vss110Spec::default();
    let usd = Vss110Spec {
        currency_code: "840".to_string(),
        destination_id: "999999".to_string(),
        ..Default::default()
    };
    let batch = RecordBatch {
        vss110: vec![parsed_vss110(job.id, 1, &eur), parsed_vss110(job.id, 2, &usd)],
        ..Default::default()
    };
    store.commit_batch(batch).unwrap();

    let filter = ReportFilter::all().with_currency("840");
    let matched = store.vss110_matching(&filter).unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].destination_id, "999999");

    let filter = ReportFilter::all().with_destination_prefix("4001");
    assert_eq!(store.vss110_matching(&filter).unwrap().len(), 1);
}

#[test]
fn join_query_orders_parents_and_attaches_children() {
    let store = MemoryStore::new();
    let job = ProcessingJob::new("a.txt", 1);
    store.insert_job(&job).unwrap();

    let issuer = Subgroup4Spec {
        business_mode: '2',
        transaction_type: "AA ".to_string(),
        ..Default::default()
    };
    let acquirer_bb = Subgroup4Spec {
        business_mode: '1',
        transaction_type: "BB ".to_string(),
        ..Default::default()
    };
    let acquirer_aa = Subgroup4Spec {
        business_mode: '1',
        transaction_type: "AA ".to_string(),
        ..Default::default()
    };

    let parent_issuer = parsed_subgroup4(job.id, 1, &issuer);
    let parent_bb = parsed_subgroup4(job.id, 3, &acquirer_bb);
    let parent_aa = parsed_subgroup4(job.id, 5, &acquirer_aa);
    let mut child = parsed_tcr1(job.id, 6);
    child.parent_tcr0_id = Some(parent_aa.envelope.id);
    child.destination_id = parent_aa.destination_id.clone();

    let batch = RecordBatch {
        vss120: vec![parent_issuer, parent_bb, parent_aa],
        tcr1: vec![child],
        ..Default::default()
    };
    store.commit_batch(batch).unwrap();

    let pairs = store
        .vss120_with_children(&ReportFilter::all(), ReportFamily::Vss120)
        .unwrap();
    assert_eq!(pairs.len(), 3);
    // Acquirer (mode 1) before Issuer (mode 2); AA before BB within a mode
    assert_eq!(pairs[0].0.business_transaction_type, "AA ");
    assert_eq!(pairs[0].0.business_mode.code(), '1');
    assert_eq!(pairs[1].0.business_transaction_type, "BB ");
    assert_eq!(pairs[2].0.business_mode.code(), '2');
    assert_eq!(pairs[0].1.len(), 1);
    assert!(pairs[1].1.is_empty());
}

#[test]
fn count_jobs_by_status() {
    let store = MemoryStore::new();
    let mut completed = ProcessingJob::new("a.txt", 1);
    completed.transition(JobStatus::Processing).unwrap();
    completed.transition(JobStatus::Completed).unwrap();
    store.insert_job(&completed).unwrap();
    store.insert_job(&ProcessingJob::new("b.txt", 1)).unwrap();
    store.insert_job(&ProcessingJob::new("c.txt", 1)).unwrap();

    let counts = store.count_jobs_by_status().unwrap();
    assert_eq!(counts.get(&JobStatus::Uploaded), Some(&2));
    assert_eq!(counts.get(&JobStatus::Completed), Some(&1));
}

#[test]
fn find_records_by_id() {
    let store = MemoryStore::new();
    let job = ProcessingJob::new("a.txt", 1);
    store.insert_job(&job).unwrap();

    let parent = parsed_subgroup4(job.id, 1, &Subgroup4Spec::default());
    let mut child = parsed_tcr1(job.id, 2);
    child.parent_tcr0_id = Some(parent.envelope.id);
    let vss110 = parsed_vss110(job.id, 3, &Vss110Spec::default());

    let batch = RecordBatch {
        vss110: vec![vss110.clone()],
        vss120: vec![parent.clone()],
        tcr1: vec![child.clone()],
        ..Default::default()
    };
    store.commit_batch(batch).unwrap();

    assert_eq!(
        store.find_vss110(vss110.envelope.id).unwrap().unwrap().destination_id,
        vss110.destination_id
    );
    assert!(store.find_vss110(Uuid::new_v4()).unwrap().is_none());

    // The child's parent reference is a lookup key: fetch on demand
    let fetched_child = store.find_tcr1(child.envelope.id).unwrap().unwrap();
    let fetched_parent = store
        .find_vss120(fetched_child.parent_tcr0_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(fetched_parent.envelope.id, parent.envelope.id);
}
