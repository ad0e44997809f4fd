use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::calendar::same_fin_year;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::types::{NormalizedRecord, RawRecord};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    /// Rows that were not objects or could not be read as CSV.
    pub parse_errors: usize,
    pub districts: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Which rows of a dump belong to the requested state and financial year.
/// Empty filters match everything.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub state_name: String,
    pub fin_year: String,
    pub district: Option<String>,
}

impl RecordFilter {
    pub fn from_config(config: &Config) -> Self {
        Self {
            state_name: config.state_name.clone(),
            fin_year: config.fin_year.clone(),
            district: None,
        }
    }

    pub fn with_district(mut self, district: &str) -> Self {
        let district = district.trim();
        self.district = (!district.is_empty()).then(|| district.to_string());
        self
    }

    pub fn matches(&self, record: &NormalizedRecord) -> bool {
        let state = self.state_name.trim();
        if !state.is_empty() && !record.state_name.eq_ignore_ascii_case(state) {
            return false;
        }
        if !self.fin_year.trim().is_empty() && !same_fin_year(&record.fin_year, &self.fin_year) {
            return false;
        }
        match &self.district {
            Some(d) => record.district_key.eq_ignore_ascii_case(d.trim()),
            None => true,
        }
    }
}

/// Parse a data.gov.in JSON response: either `{"records": [...]}` or a bare
/// array. A response without `records` is an empty result; `records` that is
/// not an array is a broken contract. Returns the records and the number of
/// non-object entries skipped.
pub fn parse_json_records(text: &str) -> Result<(Vec<RawRecord>, usize)> {
    let items = match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items,
        Value::Object(mut body) => match body.remove("records") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => {
                warn!("response has no records field, treating as empty");
                Vec::new()
            }
            Some(other) => return Err(Error::NotARecordArray(json_kind(&other).to_string())),
        },
        other => return Err(Error::NotARecordArray(json_kind(&other).to_string())),
    };

    let mut skipped = 0usize;
    let records = items
        .into_iter()
        .filter_map(|item| {
            let record = RawRecord::from_value(item);
            if record.is_none() {
                skipped += 1;
            }
            record
        })
        .collect();
    Ok((records, skipped))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read CSV rows into raw records keyed by header. Every cell stays a string
/// and is coerced later by the normalizer.
pub fn read_csv_records<R: Read>(reader: R) -> Result<(Vec<RawRecord>, usize)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut parse_errors = 0usize;
    let mut records = Vec::new();

    for result in rdr.records() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "skipping unreadable CSV row");
                parse_errors += 1;
                continue;
            }
        };
        let mut record = RawRecord::default();
        for (header, cell) in headers.iter().zip(row.iter()) {
            record.insert(header.trim(), Value::String(cell.to_string()));
        }
        records.push(record);
    }
    Ok((records, parse_errors))
}

pub fn read_raw_records(path: &Path) -> Result<(Vec<RawRecord>, usize)> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "json" => parse_json_records(&std::fs::read_to_string(path)?),
        "csv" => read_csv_records(std::fs::File::open(path)?),
        other => Err(Error::UnsupportedFormat(if other.is_empty() {
            path.display().to_string()
        } else {
            format!(".{}", other)
        })),
    }
}

/// Normalize raw records and keep the ones matching `filter`.
pub fn select_records(raw: &[RawRecord], filter: &RecordFilter) -> Vec<NormalizedRecord> {
    raw.iter()
        .map(normalize)
        .filter(|r| filter.matches(r))
        .collect()
}

pub fn load_records(
    path: &Path,
    filter: &RecordFilter,
) -> Result<(Vec<NormalizedRecord>, LoadReport)> {
    let (raw, parse_errors) = read_raw_records(path)?;
    let total_rows = raw.len() + parse_errors;
    let records = select_records(&raw, filter);
    let districts: BTreeSet<&str> = records.iter().map(|r| r.district_key.as_str()).collect();

    let report = LoadReport {
        total_rows,
        kept_rows: records.len(),
        parse_errors,
        districts: districts.len(),
        loaded_at: Utc::now(),
    };
    info!(
        path = %path.display(),
        total = report.total_rows,
        kept = report.kept_rows,
        districts = report.districts,
        "loaded period records"
    );
    Ok((records, report))
}
