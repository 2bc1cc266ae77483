use crate::domain::model::{ClassificationResult, NormalizedRecord, Record, RecordBatch};
use regex::Regex;
use std::sync::LazyLock;

pub const REQUIRED_FIELDS: [&str; 3] = ["name", "email", "address"];

/// Exactly ten decimal digits, in any script.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("phone pattern is valid"));

/// Strip `+` and spaces; the rest must be exactly ten decimal digits.
pub fn normalize_phone(raw: Option<&str>) -> Option<String> {
    let phone: String = raw?.chars().filter(|c| *c != '+' && *c != ' ').collect();

    PHONE_PATTERN.is_match(&phone).then_some(phone)
}

/// Drop everything except ASCII letters and digits, whitespace and commas.
pub fn clean_description(field: Option<&str>) -> Option<String> {
    field.map(|text| {
        text.chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == ',')
            .collect()
    })
}

fn normalize(record: &Record) -> Option<NormalizedRecord> {
    // A usable primary phone is checked before the required fields.
    let contact1 = normalize_phone(record.get("phone1"))?;

    if REQUIRED_FIELDS.iter().any(|field| record.is_null(field)) {
        return None;
    }

    Some(NormalizedRecord {
        name: record.get("name")?.to_string(),
        email: record.get("email")?.to_string(),
        contact1,
        contact2: normalize_phone(record.get("phone2")),
        address: clean_description(record.get("address"))?,
        reviews_list: clean_description(record.get("reviews_list")),
    })
}

/// Partition a batch into normalized clean rows and untouched bad rows,
/// preserving input order within each side.
pub fn classify(batch: &RecordBatch) -> ClassificationResult {
    let mut result = ClassificationResult {
        input_headers: batch.headers.clone(),
        ..ClassificationResult::default()
    };

    for record in &batch.records {
        match normalize(record) {
            Some(clean) => result.clean.push(clean),
            None => result.bad.push(record.clone()),
        }
    }

    tracing::debug!(
        "Classified {} records: {} clean, {} bad",
        batch.len(),
        result.clean.len(),
        result.bad.len()
    );
    result
}
