use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One input row. Missing columns and NA cells are both `None`.
///
/// `cells` keeps the row exactly as read, in column order; `data` is the
/// lookup by column name, where a repeated column name resolves to its
/// first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, Option<String>>,
    pub cells: Vec<Option<String>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell under `field`.
    pub fn with(mut self, field: &str, value: Option<&str>) -> Self {
        let value = value.map(str::to_string);
        self.data
            .entry(field.to_string())
            .or_insert_with(|| value.clone());
        self.cells.push(value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_deref())
    }

    pub fn is_null(&self, field: &str) -> bool {
        self.get(field).is_none()
    }
}

/// All rows of one input file plus its header row, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBatch {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl RecordBatch {
    pub fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        Self { headers, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A row that passed every check, with phones and descriptive fields canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub name: String,
    pub email: String,
    pub contact1: String,
    pub contact2: Option<String>,
    pub address: String,
    pub reviews_list: Option<String>,
}

impl NormalizedRecord {
    pub const HEADERS: [&'static str; 6] = [
        "name",
        "email",
        "contact1",
        "contact2",
        "address",
        "reviews_list",
    ];

    pub fn to_row(&self) -> [&str; 6] {
        [
            self.name.as_str(),
            self.email.as_str(),
            self.contact1.as_str(),
            self.contact2.as_deref().unwrap_or(""),
            self.address.as_str(),
            self.reviews_list.as_deref().unwrap_or(""),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    pub clean: Vec<NormalizedRecord>,
    pub bad: Vec<Record>,
    /// Header row of the input, which bad records are written back under.
    pub input_headers: Vec<String>,
}

impl ClassificationResult {
    pub fn total(&self) -> usize {
        self.clean.len() + self.bad.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered,
    NotDelivered(String),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

/// Where the writer put the two output files for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub cleaned_path: String,
    pub bad_records_path: String,
    pub clean_count: usize,
    pub bad_count: usize,
}
