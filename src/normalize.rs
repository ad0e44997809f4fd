// Record normalization.
//
// Upstream rows are unreliable: numbers arrive as JSON numbers, as strings
// with thousands separators, as empty strings or as `null`. Everything that
// cannot be read as a finite number becomes `None`; nothing here fails.
use serde_json::Value;

use crate::calendar::canonical_month;
use crate::policy::FIELD_TABLE;
use crate::types::{NormalizedRecord, RawRecord};
use crate::util::parse_f64_safe;

const STATE_NAME: &[&str] = &["state_name", "State_Name"];
const STATE_CODE: &[&str] = &["state_code", "State_Code"];
const DISTRICT_NAME: &[&str] = &["district_name", "District_Name"];
const DISTRICT_CODE: &[&str] = &["district_code", "District_Code"];
const FIN_YEAR: &[&str] = &["fin_year", "fin year"];
const MONTH: &[&str] = &["month", "Month"];

/// Coerce a single JSON value into a finite `f64`.
pub fn numeric_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_f64_safe(Some(s)),
        _ => None,
    }
}

/// Text form of an identity field. Numbers are accepted because some dumps
/// publish codes as integers.
fn text_value(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn identity(raw: &RawRecord, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| text_value(raw.get(k)))
        .unwrap_or_default()
}

pub fn normalize(raw: &RawRecord) -> NormalizedRecord {
    let district_name = identity(raw, DISTRICT_NAME);
    let month = identity(raw, MONTH);
    let month = canonical_month(&month)
        .map(str::to_string)
        .unwrap_or(month);

    let mut record = NormalizedRecord::new(
        &identity(raw, STATE_NAME),
        &district_name,
        &identity(raw, FIN_YEAR),
        &month,
    );
    record.state_code = identity(raw, STATE_CODE);
    record.district_code = identity(raw, DISTRICT_CODE);

    for spec in FIELD_TABLE.iter() {
        record.set_value(spec.metric, numeric_value(raw.get(spec.column)));
    }
    record
}

pub fn normalize_all(raws: &[RawRecord]) -> Vec<NormalizedRecord> {
    raws.iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Metric;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        RawRecord::from_value(value).unwrap()
    }

    #[test]
    fn malformed_numbers_become_absent() {
        let record = normalize(&raw(json!({
            "Wages": null,
            "Total_Exp": "",
            "Women_Persondays": "abc",
            "SC_persondays": "1,234",
            "ST_persondays": true,
            "Total_Households_Worked": 42,
        })));
        assert_eq!(record.value(Metric::Wages), None);
        assert_eq!(record.value(Metric::TotalExpenditure), None);
        assert_eq!(record.value(Metric::WomenPersondays), None);
        assert_eq!(record.value(Metric::ScPersondays), Some(1234.0));
        assert_eq!(record.value(Metric::StPersondays), None);
        assert_eq!(record.value(Metric::HouseholdsWorked), Some(42.0));
        assert_eq!(record.value(Metric::CompletedWorks), None);
    }

    #[test]
    fn zero_stays_distinct_from_absent() {
        let record = normalize(&raw(json!({
            "Average_Wage_rate_per_day_per_person": "0",
        })));
        assert_eq!(record.value(Metric::AverageWageRate), Some(0.0));
        assert_eq!(record.value(Metric::AverageDaysOfEmployment), None);
    }

    #[test]
    fn identity_fields_are_cleaned() {
        let record = normalize(&raw(json!({
            "state_name": " manipur ",
            "District_Name": " Imphal West ",
            "fin year": "2024-25",
            "Month": "april",
            "district_code": 1401,
        })));
        assert_eq!(record.state_name, "MANIPUR");
        assert_eq!(record.district_name, "Imphal West");
        assert_eq!(record.district_key, "IMPHAL WEST");
        assert_eq!(record.fin_year, "2024-25");
        assert_eq!(record.month, "Apr");
        assert_eq!(record.district_code, "1401");
    }

    #[test]
    fn unknown_month_is_kept_trimmed() {
        let record = normalize(&raw(json!({ "month": " Q3 " })));
        assert_eq!(record.month, "Q3");
    }

    #[test]
    fn empty_record_normalizes() {
        let record = normalize(&RawRecord::default());
        assert_eq!(record.state_name, "");
        assert_eq!(record.month, "");
        assert!(Metric::all().all(|m| record.value(m).is_none()));
    }
}
