//! Code-to-label lookup tables for report output.
//!
//! Unknown codes pass through as their raw value so new codes never break
//! report generation.

/// Business transaction cycle labels (position 100 of a subgroup-4 TCR0).
pub fn cycle_label(code: &str) -> String {
    match code.trim() {
        "0" => "Total".to_string(),
        "1" => "Originals".to_string(),
        "2" => "Chargebacks".to_string(),
        "3" => "Representments".to_string(),
        "4" => "Chargeback Reversals".to_string(),
        "5" => "Adjustments".to_string(),
        "6" => "Fee Collection".to_string(),
        "7" => "Funds Disbursement".to_string(),
        "8" => "Accumulated Total".to_string(),
        other => other.to_string(),
    }
}

/// Jurisdiction labels (positions 103-104 of a subgroup-4 TCR0).
pub fn jurisdiction_label(code: &str) -> String {
    match code.trim() {
        "00" => "Interregional".to_string(),
        "01" => "United States".to_string(),
        "02" => "Canada".to_string(),
        "03" => "Europe".to_string(),
        "04" => "Asia-Pacific".to_string(),
        "05" => "Latin America & Caribbean".to_string(),
        "06" => "CEMEA".to_string(),
        "07" => "US / Canada".to_string(),
        "08" => "Intraregional".to_string(),
        "09" => "National".to_string(),
        "10" => "Regional".to_string(),
        "11" => "International".to_string(),
        other => other.to_string(),
    }
}

/// Region labels (positions 112-115 of a subgroup-4 TCR0).
pub fn region_label(code: &str) -> String {
    match code.trim() {
        "US" => "United States".to_string(),
        "CA" => "Canada".to_string(),
        "EU" => "Europe".to_string(),
        "AP" => "Asia-Pacific".to_string(),
        "LA" => "Latin America & Caribbean".to_string(),
        "ME" => "Middle East & Africa".to_string(),
        other => other.to_string(),
    }
}

/// Country labels for the ISO alpha-3 codes seen in settlement files.
pub fn country_label(code: &str) -> String {
    match code.trim() {
        "USA" => "United States".to_string(),
        "CAN" => "Canada".to_string(),
        "GBR" => "United Kingdom".to_string(),
        "DEU" => "Germany".to_string(),
        "FRA" => "France".to_string(),
        "ESP" => "Spain".to_string(),
        "ITA" => "Italy".to_string(),
        "NLD" => "Netherlands".to_string(),
        "BEL" => "Belgium".to_string(),
        "PRT" => "Portugal".to_string(),
        "IRL" => "Ireland".to_string(),
        "AUT" => "Austria".to_string(),
        "CHE" => "Switzerland".to_string(),
        "POL" => "Poland".to_string(),
        "ROU" => "Romania".to_string(),
        "GRC" => "Greece".to_string(),
        "SWE" => "Sweden".to_string(),
        "NOR" => "Norway".to_string(),
        "DNK" => "Denmark".to_string(),
        "FIN" => "Finland".to_string(),
        "CZE" => "Czechia".to_string(),
        "HUN" => "Hungary".to_string(),
        "BGR" => "Bulgaria".to_string(),
        "HRV" => "Croatia".to_string(),
        "LUX" => "Luxembourg".to_string(),
        "AUS" => "Australia".to_string(),
        "NZL" => "New Zealand".to_string(),
        "JPN" => "Japan".to_string(),
        "KOR" => "South Korea".to_string(),
        "CHN" => "China".to_string(),
        "HKG" => "Hong Kong".to_string(),
        "SGP" => "Singapore".to_string(),
        "IND" => "India".to_string(),
        "BRA" => "Brazil".to_string(),
        "MEX" => "Mexico".to_string(),
        "ARG" => "Argentina".to_string(),
        "CHL" => "Chile".to_string(),
        "COL" => "Colombia".to_string(),
        "ARE" => "United Arab Emirates".to_string(),
        "SAU" => "Saudi Arabia".to_string(),
        "ZAF" => "South Africa".to_string(),
        "EGY" => "Egypt".to_string(),
        "TUR" => "Turkey".to_string(),
        other => other.to_string(),
    }
}

/// Alpha codes for the numeric ISO-4217 settlement currencies seen in
/// EPIN files.
pub fn currency_label(code: &str) -> String {
    match code.trim() {
        "978" => "EUR".to_string(),
        "840" => "USD".to_string(),
        "826" => "GBP".to_string(),
        "756" => "CHF".to_string(),
        "124" => "CAD".to_string(),
        "036" => "AUD".to_string(),
        "392" => "JPY".to_string(),
        "752" => "SEK".to_string(),
        "578" => "NOK".to_string(),
        "208" => "DKK".to_string(),
        "985" => "PLN".to_string(),
        "949" => "TRY".to_string(),
        "986" => "BRL".to_string(),
        "484" => "MXN".to_string(),
        "344" => "HKD".to_string(),
        "702" => "SGD".to_string(),
        other => other.to_string(),
    }
}

/// Routing label for VSS-130/140 report leaves.
///
/// When both region codes are non-blank the label joins the two region
/// names; otherwise it falls back to the two country names.
pub fn routing_label(
    source_country: &str,
    destination_country: &str,
    source_region: &str,
    destination_region: &str,
) -> String {
    if !source_region.trim().is_empty() && !destination_region.trim().is_empty() {
        format!(
            "{} - {}",
            region_label(source_region),
            region_label(destination_region)
        )
    } else {
        format!(
            "{} - {}",
            country_label(source_country),
            country_label(destination_country)
        )
    }
}
