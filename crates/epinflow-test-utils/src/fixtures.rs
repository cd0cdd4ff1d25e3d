//! Fixture builders for the three VSS record layouts and the file header.

/// Format an integer cents value as a 15-digit amount field.
pub fn amount15(cents: i64) -> String {
    format!("{:015}", cents)
}

/// Field values for a VSS-110 TCR0 fixture line.
#[derive(Debug, Clone)]
pub struct Vss110Spec {
    pub destination_id: String,
    pub currency_code: String,
    pub report_id: String,
    pub settlement_date: String,
    pub amount_type: char,
    pub business_mode: char,
    pub count_cents: i64,
    pub credit_cents: i64,
    pub debit_cents: i64,
    pub net_cents: i64,
    pub sign: String,
}

impl Default for Vss110Spec {
    fn default() -> Self {
        Self {
            destination_id: "400123".to_string(),
            currency_code: "978".to_string(),
            report_id: "110".to_string(),
            settlement_date: "2024032".to_string(),
            amount_type: 'I',
            business_mode: '1',
            count_cents: 100,
            credit_cents: 50_000,
            debit_cents: 20_000,
            net_cents: 30_000,
            sign: "CR".to_string(),
        }
    }
}

/// Assemble a 168-character VSS-110 line.
pub fn vss110_line(spec: &Vss110Spec) -> String {
    let mut line = String::new();
    line.push_str("46");
    line.push('0');
    line.push('0');
    line.push_str(&spec.destination_id); // 5-10
    line.push_str("000000"); // 11-16
    line.push_str("SRE0000001"); // 17-26
    line.push_str("SRE0000002"); // 27-36
    line.push_str("SRE0000003"); // 37-46
    line.push_str("001"); // 47-49
    line.push_str(&spec.currency_code); // 50-52
    line.push(' '); // 53
    line.push_str("     "); // 54-58
    line.push_str("V2"); // 59-60
    line.push_str(&spec.report_id); // 61-63
    line.push_str("  "); // 64-65
    line.push_str(&spec.settlement_date); // 66-72
    line.push_str(&spec.settlement_date); // 73-79 report date
    line.push_str(&spec.settlement_date); // 80-86 from date
    line.push_str(&spec.settlement_date); // 87-93 to date
    line.push(spec.amount_type); // 94
    line.push(spec.business_mode); // 95
    line.push_str(&amount15(spec.count_cents)); // 96-110
    line.push_str(&amount15(spec.credit_cents)); // 111-125
    line.push_str(&amount15(spec.debit_cents)); // 126-140
    line.push_str(&amount15(spec.net_cents)); // 141-155
    line.push_str(&spec.sign); // 156-157
    line.push_str("024032 "); // 158-164 funds transfer date
    line.push_str("   "); // 165-167
    line.push('0'); // 168
    assert_eq!(line.len(), 168, "VSS-110 fixture must be 168 characters");
    line
}

/// Field values for a subgroup-4 TCR0 fixture line.
#[derive(Debug, Clone)]
pub struct Subgroup4Spec {
    pub report_id: String,
    pub destination_id: String,
    pub settlement_currency: String,
    pub clearing_currency: String,
    pub business_mode: char,
    pub settlement_date: String,
    pub charge_type: String,
    pub transaction_type: String,
    pub cycle: char,
    pub jurisdiction: String,
    pub source_country: String,
    pub destination_country: String,
    pub source_region: String,
    pub destination_region: String,
    pub fee_level: String,
}

impl Default for Subgroup4Spec {
    fn default() -> Self {
        Self {
            report_id: "120".to_string(),
            destination_id: "123456".to_string(),
            settlement_currency: "978".to_string(),
            clearing_currency: "978".to_string(),
            business_mode: '1',
            settlement_date: "2024032".to_string(),
            charge_type: "   ".to_string(),
            transaction_type: "AA ".to_string(),
            cycle: '1',
            jurisdiction: "00".to_string(),
            source_country: "USA".to_string(),
            destination_country: "DEU".to_string(),
            source_region: "US".to_string(),
            destination_region: "EU".to_string(),
            fee_level: "STANDARD".to_string(),
        }
    }
}

/// Assemble a 168-character subgroup-4 TCR0 line.
pub fn subgroup4_line(spec: &Subgroup4Spec) -> String {
    let mut line = String::new();
    line.push_str("46");
    line.push('0');
    line.push('0');
    line.push_str(&spec.destination_id); // 5-10
    line.push_str("000000"); // 11-16
    line.push_str("SRE0000001"); // 17-26
    line.push_str("SRE0000002"); // 27-36
    line.push_str("SRE0000003"); // 37-46
    line.push_str("001"); // 47-49
    line.push_str(&spec.settlement_currency); // 50-52
    line.push_str(&spec.clearing_currency); // 53-55
    line.push(spec.business_mode); // 56
    line.push(' '); // 57
    line.push(' '); // 58
    line.push_str("V4"); // 59-60
    line.push_str(&spec.report_id); // 61-63
    line.push_str("  "); // 64-65
    line.push_str(&spec.settlement_date); // 66-72
    line.push_str(&spec.settlement_date); // 73-79
    line.push_str(&spec.settlement_date); // 80-86
    line.push_str(&spec.settlement_date); // 87-93
    line.push_str(&spec.charge_type); // 94-96
    line.push_str(&spec.transaction_type); // 97-99
    line.push(spec.cycle); // 100
    line.push(' '); // 101
    line.push(' '); // 102
    line.push_str(&spec.jurisdiction); // 103-104
    line.push(' '); // 105
    line.push_str(&spec.source_country); // 106-108
    line.push_str(&spec.destination_country); // 109-111
    line.push_str(&spec.source_region); // 112-113
    line.push_str(&spec.destination_region); // 114-115
    line.push_str(&format!("{:<16}", spec.fee_level)); // 116-131
    line.push('N'); // 132
    line.push_str("01"); // 133-134
    line.push_str("  "); // 135-136
    line.push_str(&" ".repeat(31)); // 137-167
    line.push('0'); // 168
    assert_eq!(line.len(), 168, "subgroup-4 fixture must be 168 characters");
    line
}

/// Field values for a TCR1 fixture line: two counts and six signed
/// amounts in cents.
#[derive(Debug, Clone)]
pub struct Tcr1Spec {
    pub rate_table_id: String,
    pub first_count: i64,
    pub second_count: i64,
    /// (cents, sign) per amount slot; sign is "CR", "DB", or "  "
    pub amounts: [(i64, &'static str); 6],
}

impl Default for Tcr1Spec {
    fn default() -> Self {
        Self {
            rate_table_id: "RT001".to_string(),
            first_count: 50,
            second_count: 0,
            amounts: [
                (100_000, "CR"),
                (20_000, "CR"),
                (5_000, "DB"),
                (0, "  "),
                (0, "  "),
                (0, "  "),
            ],
        }
    }
}

/// Assemble a 168-character TCR1 line.
pub fn tcr1_line(spec: &Tcr1Spec) -> String {
    let mut line = String::new();
    line.push_str("46");
    line.push('0');
    line.push('1');
    line.push_str(&format!("{:<5}", spec.rate_table_id)); // 5-9
    line.push_str("  "); // 10-11
    line.push_str(&amount15(spec.first_count)); // 12-26
    line.push_str(&amount15(spec.second_count)); // 27-41
    for (cents, sign) in &spec.amounts {
        line.push_str(&amount15(*cents));
        line.push_str(sign);
    } // 42-143
    line.push_str(&" ".repeat(25)); // 144-168
    assert_eq!(line.len(), 168, "TCR1 fixture must be 168 characters");
    line
}

/// Assemble a file header line for the given client id.
pub fn header_line(client_id: &str) -> String {
    format!("9990001234567 2024-03-01-08.30.00 001 {client_id} 0001")
}

/// Join record lines into a file blob.
pub fn epin_file(lines: &[String]) -> Vec<u8> {
    let mut content = lines.join("\n");
    content.push('\n');
    content.into_bytes()
}
