//! Workspace-level end-to-end scenarios: full files driven through the
//! settlement service, checked down to the report trees.

use std::io::Write;
use std::sync::Arc;

use rust_decimal_macros::dec;

use epinflow_core::codec::ParseMode;
use epinflow_core::models::{AmountSign, JobStatus, ReportFilter};
use epinflow_parser::parse_vss110;
use epinflow_pipeline::{PipelineConfig, SettlementService};
use epinflow_store::{MemoryStore, RecordStore};
use epinflow_test_utils::{
    epin_file, header_line, subgroup4_line, tcr1_line, vss110_line, Subgroup4Spec, Tcr1Spec,
    Vss110Spec,
};

fn service() -> SettlementService<MemoryStore> {
    SettlementService::new(Arc::new(MemoryStore::new()))
}

fn submit(service: &SettlementService<MemoryStore>, lines: &[String]) -> epinflow_core::models::ProcessingJob {
    let content = epin_file(lines);
    let size = content.len() as u64;
    service.submit("epin_settlement.txt", content, size).unwrap()
}

// Counts and amounts decode with implied two decimals, CR direction.
#[test]
fn vss110_credit_line_parses_and_balances() {
    let service = service();
    let job = submit(
        &service,
        &[vss110_line(&Vss110Spec {
            count_cents: 100,
            credit_cents: 50_000,
            debit_cents: 20_000,
            net_cents: 30_000,
            sign: "CR".to_string(),
            ..Default::default()
        })],
    );

    assert_eq!(job.status, JobStatus::Completed);
    let records = service.store().vss110_by_job(job.id).unwrap();
    let record = &records[0];
    assert_eq!(record.transaction_count, 100);
    assert_eq!(record.credit_amount, dec!(500.00));
    assert_eq!(record.debit_amount, dec!(200.00));
    assert_eq!(record.net_amount, dec!(300.00));
    assert_eq!(record.amount_sign, AmountSign::Credit);
    assert!(record.envelope.is_valid);
}

// The DB direction satisfies the net-consistency invariant.
#[test]
fn vss110_debit_line_satisfies_net_consistency() {
    let service = service();
    let job = submit(
        &service,
        &[vss110_line(&Vss110Spec {
            credit_cents: 10_000,
            debit_cents: 30_000,
            net_cents: 20_000,
            sign: "DB".to_string(),
            ..Default::default()
        })],
    );

    let records = service.store().vss110_by_job(job.id).unwrap();
    assert!(records[0].envelope.is_valid);
    assert_eq!(records[0].signed_net_amount(), dec!(-200.00));
}

// One TCR0/TCR1 pair produces the expected VSS-120 tree.
#[test]
fn vss120_report_from_single_pair() {
    let service = service();
    let job = submit(
        &service,
        &[
            header_line("CLIENT01"),
            subgroup4_line(&Subgroup4Spec {
                destination_id: "123456".to_string(),
                business_mode: '1',
                transaction_type: "AA ".to_string(),
                cycle: '1',
                ..Default::default()
            }),
            tcr1_line(&Tcr1Spec {
                first_count: 50,
                amounts: [
                    (100_000, "CR"),
                    (20_000, "CR"),
                    (5_000, "DB"),
                    (0, "  "),
                    (0, "  "),
                    (0, "  "),
                ],
                ..Default::default()
            }),
        ],
    );
    assert_eq!(job.status, JobStatus::Completed);

    let report = service.vss120_report(&ReportFilter::all()).unwrap();
    assert_eq!(report.business_modes.len(), 1);
    let mode = &report.business_modes[0];
    assert_eq!(mode.label, "Acquirer");
    let ttype = &mode.transaction_types[0];
    assert_eq!(ttype.transaction_type, "AA");
    let leaf = &ttype.cycles[0];
    assert_eq!(leaf.label, "Originals");
    assert_eq!(leaf.totals.count, 50);
    assert_eq!(leaf.totals.clearing_amount, dec!(1000.00));
    assert_eq!(leaf.totals.credits_amount, dec!(200.00));
    assert_eq!(leaf.totals.debits_amount, dec!(50.00));
    assert_eq!(leaf.totals.net_amount, dec!(150.00));
    assert_eq!(leaf.totals.net_sign, AmountSign::Credit);
}

// Retry with the same content reproduces a bitwise-equal report.
#[test]
fn retry_of_completed_job_reproduces_report() {
    let service = service();
    let lines = vec![
        header_line("CLIENT01"),
        vss110_line(&Vss110Spec::default()),
        subgroup4_line(&Subgroup4Spec::default()),
        tcr1_line(&Tcr1Spec::default()),
    ];
    let first = submit(&service, &lines);
    assert_eq!(first.status, JobStatus::Completed);

    let before = serde_json::to_string(&service.vss120_report(&ReportFilter::all()).unwrap()).unwrap();

    let second = service.retry(first.id, None).unwrap();
    assert_eq!(second.status, JobStatus::Completed);
    assert_eq!(second.processed_records, first.processed_records);

    let after = serde_json::to_string(&service.vss120_report(&ReportFilter::all()).unwrap()).unwrap();
    assert_eq!(before, after);
}

// A malformed record in a later batch is persisted invalid and the
// job still completes on the strength of the valid records.
#[test]
fn malformed_second_batch_record_does_not_fail_job() {
    let store = Arc::new(MemoryStore::new());
    let config = PipelineConfig {
        batch_size: 1,
        ..Default::default()
    };
    let service = SettlementService::with_config(store, config).unwrap();

    let lines = vec![
        subgroup4_line(&Subgroup4Spec::default()),
        subgroup4_line(&Subgroup4Spec {
            report_id: "130".to_string(),
            jurisdiction: "ZZ".to_string(),
            ..Default::default()
        }),
    ];
    let content = epin_file(&lines);
    let size = content.len() as u64;
    let job = service.submit("epin.txt", content, size).unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.failed_records, 1);
    let records = service.store().vss120_by_job(job.id).unwrap();
    assert_eq!(records.len(), 2);
    assert!(!records[1].envelope.is_valid);
}

// The parsed record's field raw strings reassemble to the stored
// raw line at their documented positions.
#[test]
fn parsed_fields_reassemble_to_raw_line() {
    let line = vss110_line(&Vss110Spec::default());
    let record = parse_vss110(&line, 1, uuid::Uuid::new_v4(), ParseMode::Strict).unwrap();

    let reassembled = format!(
        "{}{}{}{}{}{}{}{}{}{}{}     {}{}{}{}{}{}{}{}{}{:015}{:015}{:015}{:015}{}{}   {}",
        record.transaction_code,
        record.transaction_code_qualifier,
        record.transaction_component_seq,
        record.destination_id,
        record.source_id,
        record.reporting_sre_id,
        record.rollup_sre_id,
        record.funds_transfer_sre_id,
        record.settlement_service,
        record.currency_code,
        record.no_data_indicator,
        record.report_group,
        record.report_subgroup,
        record.report_id_number,
        record.report_id_suffix,
        record.raw_settlement_date,
        record.raw_report_date,
        record.raw_from_date,
        record.raw_to_date,
        format!("{}{}", record.amount_type.code(), record.business_mode.code()),
        record.transaction_count,
        record.credit_amount.mantissa(),
        record.debit_amount.mantissa(),
        record.net_amount.mantissa(),
        record.amount_sign.code(),
        record.raw_funds_transfer_date,
        record.reimbursement_attribute,
    );
    assert_eq!(reassembled, record.envelope.raw_line);
}

// Files arrive as blobs but round-trip through disk unchanged.
#[test]
fn file_streamed_from_disk_processes_cleanly() {
    let lines = vec![
        header_line("CLIENT01"),
        vss110_line(&Vss110Spec::default()),
        subgroup4_line(&Subgroup4Spec::default()),
        tcr1_line(&Tcr1Spec::default()),
    ];
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&epin_file(&lines)).unwrap();

    let content = std::fs::read(file.path()).unwrap();
    let size = content.len() as u64;
    let service = service();
    let job = service.submit("epin_2024_061.txt", content, size).unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.processed_records, 4);
    assert!(service.store().find_header_by_job(job.id).unwrap().is_some());
}

// Per-BIN rollup splits by destination and currency via the facade.
#[test]
fn destination_rollup_over_mixed_destinations() {
    let service = service();
    submit(
        &service,
        &[
            vss110_line(&Vss110Spec::default()),
            vss110_line(&Vss110Spec {
                destination_id: "999999".to_string(),
                currency_code: "840".to_string(),
                ..Default::default()
            }),
        ],
    );

    let rollup = service.vss110_destination_rollup(&ReportFilter::all()).unwrap();
    assert_eq!(rollup.len(), 2);
    assert_eq!(rollup[0].destination_id, "400123");
    assert_eq!(rollup[0].currency, "EUR");
    assert_eq!(rollup[1].destination_id, "999999");
    assert_eq!(rollup[1].currency, "USD");
    assert_eq!(rollup[1].net_amount, dec!(300.00));
    assert_eq!(rollup[1].net_sign, AmountSign::Credit);
}
