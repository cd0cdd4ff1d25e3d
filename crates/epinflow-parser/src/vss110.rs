//! VSS-110 / VSS-111 TCR0 parser (30 fields over positions 1-168).

use uuid::Uuid;

use epinflow_core::codec::{
    extract, extract_optional, parse_amount, parse_count, parse_date, DateForm, ParseMode,
};
use epinflow_core::error::{EpinError, EpinResult, RecordFormat};
use epinflow_core::models::{AmountType, BusinessMode, RecordEnvelope, Vss110Record};

use crate::fields::{
    amount_or_default, check_digits, check_literal, check_one_of, count_or_default,
    date_or_default, sign_or_default,
};

/// Minimum tolerated line length for a TCR0; shorter is a format error.
pub const TCR0_MIN_LINE_LEN: usize = 155;

const FMT: RecordFormat = RecordFormat::Vss110;

/// Parse one VSS-110/111 line.
///
/// Field pattern mismatches are collected on the record's envelope; the
/// only hard failure is a line too short to hold the mandatory positions.
pub fn parse_vss110(
    line: &str,
    line_number: u64,
    job_id: Uuid,
    mode: ParseMode,
) -> EpinResult<Vss110Record> {
    if line.len() < TCR0_MIN_LINE_LEN {
        return Err(EpinError::missing("netAmount", line_number, FMT));
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
    let raw_currency = extract(line, 50, 52, "settlementCurrencyCode", line_number, FMT)?;
    let no_data_indicator = extract(line, 53, 53, "noDataIndicator", line_number, FMT)?.to_string();
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
    check_literal(&mut env, "reportSubgroup", &report_subgroup, "2");
    check_one_of(&mut env, "reportIdNumber", &report_id_number, &["110", "111"]);
    check_one_of(&mut env, "reportIdSuffix", &report_id_suffix, &["", "M"]);

    // Blank settlement currency defaults to 978 (EUR).
    let currency_code = if raw_currency.trim().is_empty() {
        "978".to_string()
    } else {
        check_digits(&mut env, "settlementCurrencyCode", raw_currency);
        raw_currency.to_string()
    };

    let raw_settlement_date = extract(line, 66, 72, "settlementDate", line_number, FMT)?.to_string();
    let raw_report_date = extract(line, 73, 79, "reportDate", line_number, FMT)?.to_string();
    let raw_from_date = extract(line, 80, 86, "fromDate", line_number, FMT)?.to_string();
    let raw_to_date = extract(line, 87, 93, "toDate", line_number, FMT)?.to_string();
    let raw_funds_transfer_date = extract_optional(line, 158, 164).to_string();

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
    let funds_transfer_date = date_or_default(
        &mut env,
        parse_date(
            &raw_funds_transfer_date,
            DateForm::Ccyddd,
            "fundsTransferDate",
            line_number,
            FMT,
            mode,
        ),
    );

    let amount_type_code = extract(line, 94, 94, "amountType", line_number, FMT)?
        .chars()
        .next()
        .unwrap_or(' ');
    let amount_type = AmountType::from_code(amount_type_code).unwrap_or_else(|| {
        env.add_error(format!("amountType: '{amount_type_code}' is not one of I|F|C|T|blank"));
        AmountType::Blank
    });

    let business_mode_code = extract(line, 95, 95, "businessMode", line_number, FMT)?
        .chars()
        .next()
        .unwrap_or(' ');
    let business_mode = BusinessMode::from_code(business_mode_code).unwrap_or_else(|| {
        env.add_error(format!("businessMode: '{business_mode_code}' is not one of 1|2|3|9|blank"));
        BusinessMode::Blank
    });

    let transaction_count = count_or_default(
        &mut env,
        parse_count(
            extract(line, 96, 110, "transactionCount", line_number, FMT)?,
            "transactionCount",
            line_number,
            FMT,
            mode,
        ),
    );
    let credit_amount = amount_or_default(
        &mut env,
        parse_amount(
            extract(line, 111, 125, "creditAmount", line_number, FMT)?,
            "creditAmount",
            line_number,
            FMT,
            mode,
        ),
    );
    let debit_amount = amount_or_default(
        &mut env,
        parse_amount(
            extract(line, 126, 140, "debitAmount", line_number, FMT)?,
            "debitAmount",
            line_number,
            FMT,
            mode,
        ),
    );
    let net_amount = amount_or_default(
        &mut env,
        parse_amount(
            extract(line, 141, 155, "netAmount", line_number, FMT)?,
            "netAmount",
            line_number,
            FMT,
            mode,
        ),
    );

    let amount_sign = sign_or_default(&mut env, "netAmountSign", extract_optional(line, 156, 157));
    let reimbursement_attribute = extract_optional(line, 168, 168).to_string();
    check_one_of(&mut env, "reimbursementAttribute", &reimbursement_attribute, &["0", ""]);

    let mut record = Vss110Record {
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
        currency_code,
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
        funds_transfer_date,
        raw_funds_transfer_date,
        amount_type,
        business_mode,
        transaction_count,
        credit_amount,
        debit_amount,
        net_amount,
        amount_sign,
        reimbursement_attribute,
    };

    if let Some(violation) = record.net_consistency_violation() {
        record.envelope.add_error(violation);
    }

    Ok(record)
}
