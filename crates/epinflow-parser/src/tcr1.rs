//! Subgroup-4 TCR1 parser (amount rows).

use uuid::Uuid;

use epinflow_core::codec::{extract, extract_optional, parse_amount, parse_count, ParseMode};
use epinflow_core::error::{EpinError, EpinResult, RecordFormat};
use epinflow_core::models::{RecordEnvelope, Vss120Tcr1Record};

use crate::fields::{amount_or_default, check_literal, count_or_default, sign_or_default};

/// Minimum tolerated line length for a TCR1; shorter is a format error.
pub const TCR1_MIN_LINE_LEN: usize = 143;

/// Destination id applied when no parent TCR0 can be recovered.
pub const ORPHAN_DESTINATION_ID: &str = "000000";

const FMT: RecordFormat = RecordFormat::Vss120Tcr1;

/// Parse one TCR1 line.
///
/// A TCR1 carries no destination id of its own; the parser leaves the
/// orphan default in place and the pipeline overwrites it from the active
/// parent TCR0 (or the store-recovered fallback).
pub fn parse_tcr1(
    line: &str,
    line_number: u64,
    job_id: Uuid,
    mode: ParseMode,
) -> EpinResult<Vss120Tcr1Record> {
    if line.len() < TCR1_MIN_LINE_LEN {
        return Err(EpinError::missing("sixthAmountSign", line_number, FMT));
    }
    let mut env = RecordEnvelope::new(job_id, line, line_number);

    let transaction_code = extract(line, 1, 2, "transactionCode", line_number, FMT)?.to_string();
    let qualifier = extract(line, 3, 3, "transactionCodeQualifier", line_number, FMT)?.to_string();
    let component_seq = extract(line, 4, 4, "transactionComponentSeq", line_number, FMT)?.to_string();
    let rate_table_id = extract(line, 5, 9, "rateTableId", line_number, FMT)?.to_string();

    check_literal(&mut env, "transactionCode", &transaction_code, "46");
    check_literal(&mut env, "transactionCodeQualifier", &qualifier, "0");
    check_literal(&mut env, "transactionComponentSeq", &component_seq, "1");

    let first_count = count_or_default(
        &mut env,
        parse_count(
            extract(line, 12, 26, "firstCount", line_number, FMT)?,
            "firstCount",
            line_number,
            FMT,
            mode,
        ),
    );
    let second_count = count_or_default(
        &mut env,
        parse_count(
            extract(line, 27, 41, "secondCount", line_number, FMT)?,
            "secondCount",
            line_number,
            FMT,
            mode,
        ),
    );

    // Six (amount, sign) pairs at fixed 17-character strides.
    let mut amounts = [rust_decimal::Decimal::new(0, 2); 6];
    let mut signs = [epinflow_core::models::AmountSign::Empty; 6];
    let layout: [(usize, &str, &str); 6] = [
        (42, "firstAmount", "firstAmountSign"),
        (59, "secondAmount", "secondAmountSign"),
        (76, "thirdAmount", "thirdAmountSign"),
        (93, "fourthAmount", "fourthAmountSign"),
        (110, "fifthAmount", "fifthAmountSign"),
        (127, "sixthAmount", "sixthAmountSign"),
    ];
    for (i, (start, amount_field, sign_field)) in layout.into_iter().enumerate() {
        amounts[i] = amount_or_default(
            &mut env,
            parse_amount(
                extract(line, start, start + 14, amount_field, line_number, FMT)?,
                amount_field,
                line_number,
                FMT,
                mode,
            ),
        );
        signs[i] = sign_or_default(
            &mut env,
            sign_field,
            extract_optional(line, start + 15, start + 16),
        );
    }

    Ok(Vss120Tcr1Record {
        envelope: env,
        transaction_code,
        transaction_code_qualifier: qualifier,
        transaction_component_seq: component_seq,
        rate_table_id,
        destination_id: ORPHAN_DESTINATION_ID.to_string(),
        first_count,
        second_count,
        first_amount: amounts[0],
        first_amount_sign: signs[0],
        second_amount: amounts[1],
        second_amount_sign: signs[1],
        third_amount: amounts[2],
        third_amount_sign: signs[2],
        fourth_amount: amounts[3],
        fourth_amount_sign: signs[3],
        fifth_amount: amounts[4],
        fifth_amount_sign: signs[4],
        sixth_amount: amounts[5],
        sixth_amount_sign: signs[5],
        parent_tcr0_id: None,
        parent_report_number: 120,
    })
}
