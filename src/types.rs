use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

use crate::policy::{Metric, METRIC_COUNT};

/// One upstream row (district × month × financial year) exactly as
/// published: string keys, values of whatever JSON type the source chose.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Map<String, Value>);

impl RawRecord {
    /// Wrap a JSON value; only objects are records.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// First of `keys` holding a non-null value.
    pub fn first_of(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find(|v| !v.is_null())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A period record with identity fields cleaned and every numeric column
/// coerced to a finite number or `None` when absent/garbled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    /// Upper-cased and trimmed.
    pub state_name: String,
    pub state_code: String,
    /// Trimmed, otherwise as published.
    pub district_name: String,
    /// Upper-cased `district_name`, used for matching.
    pub district_key: String,
    pub district_code: String,
    pub fin_year: String,
    /// Canonical three-letter abbreviation when recognized.
    pub month: String,
    values: [Option<f64>; METRIC_COUNT],
}

impl NormalizedRecord {
    pub fn new(state_name: &str, district_name: &str, fin_year: &str, month: &str) -> Self {
        Self {
            state_name: state_name.trim().to_uppercase(),
            district_name: district_name.trim().to_string(),
            district_key: district_name.trim().to_uppercase(),
            fin_year: fin_year.trim().to_string(),
            month: month.trim().to_string(),
            ..Self::default()
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values[metric.index()]
    }

    pub fn set_value(&mut self, metric: Metric, value: Option<f64>) {
        self.values[metric.index()] = value.filter(|v| v.is_finite());
    }

    pub fn with_value(mut self, metric: Metric, value: Option<f64>) -> Self {
        self.set_value(metric, value);
        self
    }
}

/// Cumulative figures for a district or state over one financial year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    pub total_active_workers: f64,
    pub assets_created: f64,
    pub persondays_generated: f64,
    /// Wage payouts standing in for direct-benefit-transfer volume.
    pub dbt_transactions: f64,
    pub households_benefitted: f64,
    pub individuals_worked: f64,
    /// Approximation: no real-time attendance feed exists, so this mirrors
    /// `total_active_workers`.
    pub attendance_today: f64,
    pub number_of_worksites: f64,
    /// Approximation, see `attendance_today`.
    pub number_of_workers: f64,
    pub total_workers: f64,
    pub job_cards_issued: f64,
    pub job_cards_active: f64,
    pub hh_completed_100_days: f64,
    pub records: usize,
    /// `"{fin_year}-{month}"` of the latest record, empty without records.
    pub latest_period: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentSection {
    pub total_households: f64,
    pub total_individuals: f64,
    pub average_days: f64,
    pub hh_completed_100_days: f64,
    pub job_cards_issued: f64,
    pub job_cards_active: f64,
    /// `job_cards_issued - job_cards_active`, never below 0.
    pub inactive_job_cards: f64,
    pub total_active_workers: f64,
    pub differently_abled_persons_worked: f64,
    pub approved_labour_budget: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WagesSection {
    pub average_wage: f64,
    pub total_wages: f64,
    pub total_wages_lakhs: f64,
    pub total_expenditure: f64,
    pub material_and_skilled_wages: f64,
    pub admin_expenditure: f64,
    pub wage_growth_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkProgressSection {
    pub completed_works: f64,
    pub ongoing_works: f64,
    pub total_works_taken_up: f64,
    pub percent_category_b_works: f64,
    pub percent_category_a_works: f64,
    pub completion_pct: f64,
    pub number_of_worksites: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusivitySection {
    pub women_persondays: f64,
    pub sc_persondays: f64,
    pub st_persondays: f64,
    pub total_persondays: f64,
    pub women_participation_pct: f64,
    pub sc_participation_pct: f64,
    pub st_participation_pct: f64,
    pub sc_st_participation_pct: f64,
}

/// One chart point per raw record, labelled `"{fin_year}-{month}"`.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct TrendPoint {
    #[tabled(rename = "Period")]
    pub period: String,
    #[tabled(rename = "Value")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyWorksPoint {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "CompletedWorks")]
    pub completed_works: f64,
    #[tabled(rename = "OngoingWorks")]
    pub ongoing_works: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyWagesPoint {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "WagesLakhs")]
    pub wages_lakhs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailMeta {
    pub fin_year: String,
    pub district: String,
    pub records: usize,
    pub latest_month: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictDetail {
    pub employment: EmploymentSection,
    pub wages: WagesSection,
    pub work_progress: WorkProgressSection,
    pub inclusivity: InclusivitySection,
    pub trends: Vec<TrendPoint>,
    pub monthly_works_trends: Vec<MonthlyWorksPoint>,
    pub monthly_wages_trends: Vec<MonthlyWagesPoint>,
    pub meta: DetailMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct InclusionMonth {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Women")]
    pub women: f64,
    #[tabled(rename = "SC")]
    pub sc: f64,
    #[tabled(rename = "ST")]
    pub st: f64,
    #[tabled(rename = "DifferentlyAbled")]
    pub differently_abled: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionTotals {
    pub women: f64,
    pub sc: f64,
    pub st: f64,
    pub differently_abled: f64,
}

/// Whole-number share of each group in the combined inclusion total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionShares {
    pub women: f64,
    pub sc: f64,
    pub st: f64,
    pub differently_abled: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionTrends {
    pub monthly_trends: Vec<InclusionMonth>,
    pub totals: InclusionTotals,
    pub shares: InclusionShares,
    pub inclusion_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[tabled(rename = "District")]
    pub district: String,
    #[tabled(rename = "Value")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSummary {
    pub total_districts: usize,
    pub top_performer: String,
    pub top_value: f64,
    pub average_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct WagesComparisonRow {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "District1")]
    pub district1: f64,
    #[tabled(rename = "District2")]
    pub district2: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct WorksComparisonRow {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "D1Completed")]
    pub district1_completed: f64,
    #[tabled(rename = "D1Ongoing")]
    pub district1_ongoing: f64,
    #[tabled(rename = "D2Completed")]
    pub district2_completed: f64,
    #[tabled(rename = "D2Ongoing")]
    pub district2_ongoing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison {
    #[tabled(rename = "Metric")]
    pub label: String,
    #[tabled(rename = "District1")]
    pub district1: f64,
    #[tabled(rename = "District2")]
    pub district2: f64,
}
