//! Subgroup-4 TCR0 parser (VSS-120/130/140 context rows).

use uuid::Uuid;

use epinflow_core::codec::{extract, extract_optional, parse_date, DateForm, ParseMode};
use epinflow_core::error::{EpinError, EpinResult, RecordFormat};
use epinflow_core::models::{
    BusinessMode, RecordEnvelope, Vss120Record, VALID_SUBGROUP4_REPORT_IDS,
};

use crate::fields::{check_digits, check_literal, check_one_of, date_or_default};
use crate::vss110::TCR0_MIN_LINE_LEN;

const FMT: RecordFormat = RecordFormat::VssSubGroup4;

/// Parse one subgroup-4 TCR0 line.
///
/// The layout shares positions 1-49 with VSS-110; positions 50+ carry the
/// subgroup-4 classification block (dual currencies, business transaction
/// type/cycle, jurisdiction, routing, fee level).
pub fn parse_subgroup4(
    line: &str,
    line_number: u64,
    job_id: Uuid,
    mode: ParseMode,
) -> EpinResult<Vss120Record> {
    if line.len() < TCR0_MIN_LINE_LEN {
        return Err(EpinError::missing("summaryLevel", line_number, FMT));
    }
    let mut env = RecordEnvelope::new(job_id, line, line_number);

    let transaction_code = extract(line, 1, 2, "transactionCode", line_number, FMT)?.to_string();
    let qualifier = extract(line, 3, 3, "transactionCodeQualifier", line_number, FMT)?.to_string();
    let component_seq = extract(line, 4, 4, "transactionComponentSeq", line_number, FMT)?.to_string();
    let destination_id = extract(line, 5, 10, "destinationId", line_number, FMT)?.to_string();
    let source_id = extract(line, 11, 16, "sourceId", line_number, FMT)?.to_string();
    let reporting_sre_id = extract(line, 17, 26, "reportingSreId", line_number, FMT)?.to_string();
    let rollup_sre_id = extract(line, 27, 36, "rollupSreId", line_number, FMT)?.to_string();
    let funds_transfer_sre_id =
        extract(line, 37, 46, "fundsTransferSreId", line_number, FMT)?.to_string();
    let settlement_service =
        extract(line, 47, 49, "settlementService", line_number, FMT)?.to_string();
    let settlement_currency_code =
        extract(line, 50, 52, "settlementCurrencyCode", line_number, FMT)?.to_string();
    let clearing_currency_code =
        extract(line, 53, 55, "clearingCurrencyCode", line_number, FMT)?.to_string();

    let business_mode_code = extract(line, 56, 56, "businessMode", line_number, FMT)?
        .chars()
        .next()
        .unwrap_or(' ');
    let business_mode = BusinessMode::from_code(business_mode_code).unwrap_or_else(|| {
        env.add_error(format!("businessMode: '{business_mode_code}' is not one of 1|2|3|9|blank"));
        BusinessMode::Blank
    });

    let no_data_indicator = extract(line, 57, 57, "noDataIndicator", line_number, FMT)?.to_string();
    let report_group = extract(line, 59, 59, "reportGroup", line_number, FMT)?.to_string();
    let report_subgroup = extract(line, 60, 60, "reportSubgroup", line_number, FMT)?.to_string();
    let report_id_number = extract(line, 61, 63, "reportIdNumber", line_number, FMT)?.to_string();
    let report_id_suffix = extract(line, 64, 65, "reportIdSuffix", line_number, FMT)?.to_string();

    check_literal(&mut env, "transactionCode", &transaction_code, "46");
    check_literal(&mut env, "transactionCodeQualifier", &qualifier, "0");
    check_literal(&mut env, "transactionComponentSeq", &component_seq, "0");
    check_digits(&mut env, "destinationId", &destination_id);
    check_digits(&mut env, "sourceId", &source_id);
    check_one_of(&mut env, "noDataIndicator", &no_data_indicator, &["V", "Y", ""]);
    check_literal(&mut env, "reportGroup", &report_group, "V");
    check_literal(&mut env, "reportSubgroup", &report_subgroup, "4");
    check_one_of(
        &mut env,
        "reportIdNumber",
        &report_id_number,
        &VALID_SUBGROUP4_REPORT_IDS,
    );

    let raw_settlement_date = extract(line, 66, 72, "settlementDate", line_number, FMT)?.to_string();
    let raw_report_date = extract(line, 73, 79, "reportDate", line_number, FMT)?.to_string();
    let raw_from_date = extract(line, 80, 86, "fromDate", line_number, FMT)?.to_string();
    let raw_to_date = extract(line, 87, 93, "toDate", line_number, FMT)?.to_string();

    let settlement_date = date_or_default(
        &mut env,
        parse_date(&raw_settlement_date, DateForm::Ccyyddd, "settlementDate", line_number, FMT, mode),
    );
    let report_date = date_or_default(
        &mut env,
        parse_date(&raw_report_date, DateForm::Ccyyddd, "reportDate", line_number, FMT, mode),
    );
    let from_date = date_or_default(
        &mut env,
        parse_date(&raw_from_date, DateForm::Ccyyddd, "fromDate", line_number, FMT, mode),
    );
    let to_date = date_or_default(
        &mut env,
        parse_date(&raw_to_date, DateForm::Ccyyddd, "toDate", line_number, FMT, mode),
    );

    let charge_type_code = extract(line, 94, 96, "chargeTypeCode", line_number, FMT)?.to_string();
    let business_transaction_type =
        extract(line, 97, 99, "businessTransactionType", line_number, FMT)?.to_string();
    let business_transaction_cycle =
        extract(line, 100, 100, "businessTransactionCycle", line_number, FMT)?.to_string();
    let reversal_indicator = extract(line, 101, 101, "reversalIndicator", line_number, FMT)?.to_string();
    let return_indicator = extract(line, 102, 102, "returnIndicator", line_number, FMT)?.to_string();
    let jurisdiction_code = extract(line, 103, 104, "jurisdictionCode", line_number, FMT)?.to_string();
    let interregional_routing_indicator =
        extract(line, 105, 105, "interregionalRoutingIndicator", line_number, FMT)?.to_string();
    let source_country_code =
        extract(line, 106, 108, "sourceCountryCode", line_number, FMT)?.to_string();
    let destination_country_code =
        extract(line, 109, 111, "destinationCountryCode", line_number, FMT)?.to_string();
    let source_region_code =
        extract(line, 112, 113, "sourceRegionCode", line_number, FMT)?.to_string();
    let destination_region_code =
        extract(line, 114, 115, "destinationRegionCode", line_number, FMT)?.to_string();
    let fee_level_descriptor =
        extract(line, 116, 131, "feeLevelDescriptor", line_number, FMT)?.to_string();
    let cr_db_net_indicator =
        extract(line, 132, 132, "crDbNetIndicator", line_number, FMT)?.to_string();
    let summary_level = extract(line, 133, 134, "summaryLevel", line_number, FMT)?.to_string();
    let reimbursement_attribute = extract_optional(line, 168, 168).to_string();

    if !business_transaction_cycle.trim().is_empty() {
        check_digits(&mut env, "businessTransactionCycle", &business_transaction_cycle);
    }
    if !jurisdiction_code.trim().is_empty() {
        check_digits(&mut env, "jurisdictionCode", &jurisdiction_code);
    }

    Ok(Vss120Record {
        envelope: env,
        transaction_code,
        transaction_code_qualifier: qualifier,
        transaction_component_seq: component_seq,
        destination_id,
        source_id,
        reporting_sre_id,
        rollup_sre_id,
        funds_transfer_sre_id,
        settlement_service,
        settlement_currency_code,
        clearing_currency_code,
        business_mode,
        no_data_indicator,
        report_group,
        report_subgroup,
        report_id_number,
        report_id_suffix,
        settlement_date,
        raw_settlement_date,
        report_date,
        raw_report_date,
        from_date,
        raw_from_date,
        to_date,
        raw_to_date,
        charge_type_code,
        business_transaction_type,
        business_transaction_cycle,
        reversal_indicator,
        return_indicator,
        jurisdiction_code,
        interregional_routing_indicator,
        source_country_code,
        destination_country_code,
        source_region_code,
        destination_region_code,
        fee_level_descriptor,
        cr_db_net_indicator,
        summary_level,
        reimbursement_attribute,
    })
}
