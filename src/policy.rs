//! Per-field aggregation policies.
//!
//! Every numeric column of a period record is listed exactly once in
//! [`FIELD_TABLE`] together with the rule used to fold a district-year of
//! monthly rows into one number. Views never branch on field names; they read
//! resolved values out of [`ResolvedMetrics`].
use std::cmp::Ordering;
use std::ops::Index;

use crate::calendar::{calendar_index, normalize_fin_year};
use crate::types::NormalizedRecord;
use crate::util::{average, finite_or_zero, finite_sum, round_to};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    ApprovedLabourBudget,
    AverageWageRate,
    AverageDaysOfEmployment,
    DifferentlyAbledWorked,
    MaterialAndSkilledWages,
    CompletedWorks,
    OngoingWorks,
    ScPersondays,
    StPersondays,
    AdminExpenditure,
    TotalExpenditure,
    HouseholdsWorked,
    IndividualsWorked,
    ActiveJobCards,
    ActiveWorkers,
    HouseholdsCompleted100Days,
    JobCardsIssued,
    TotalWorkers,
    WorksTakenUp,
    Wages,
    WomenPersondays,
    PercentCategoryBWorks,
}

pub const METRIC_COUNT: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Latest record's value; cumulative max when that is zero or absent.
    CumulativeLatest,
    /// Largest value seen across the period.
    CumulativeMax,
    /// Sum over every record, absent counting as zero.
    MonthlySum,
    /// Mean of present, nonzero values rounded to one decimal.
    MonthlyAverage,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub metric: Metric,
    /// Column name as published by the upstream dataset.
    pub column: &'static str,
    pub policy: Policy,
}

const fn field(metric: Metric, column: &'static str, policy: Policy) -> FieldSpec {
    FieldSpec {
        metric,
        column,
        policy,
    }
}

/// Ordered by `Metric` discriminant so `FIELD_TABLE[m as usize].metric == m`.
pub const FIELD_TABLE: [FieldSpec; METRIC_COUNT] = [
    field(Metric::ApprovedLabourBudget, "Approved_Labour_Budget", Policy::CumulativeMax),
    field(Metric::AverageWageRate, "Average_Wage_rate_per_day_per_person", Policy::MonthlyAverage),
    field(
        Metric::AverageDaysOfEmployment,
        "Average_days_of_employment_provided_per_Household",
        Policy::MonthlyAverage,
    ),
    field(Metric::DifferentlyAbledWorked, "Differently_abled_persons_worked", Policy::MonthlySum),
    field(Metric::MaterialAndSkilledWages, "Material_and_skilled_Wages", Policy::MonthlySum),
    field(Metric::CompletedWorks, "Number_of_Completed_Works", Policy::CumulativeMax),
    field(Metric::OngoingWorks, "Number_of_Ongoing_Works", Policy::CumulativeMax),
    field(Metric::ScPersondays, "SC_persondays", Policy::MonthlySum),
    field(Metric::StPersondays, "ST_persondays", Policy::MonthlySum),
    field(Metric::AdminExpenditure, "Total_Adm_Expenditure", Policy::MonthlySum),
    field(Metric::TotalExpenditure, "Total_Exp", Policy::MonthlySum),
    field(Metric::HouseholdsWorked, "Total_Households_Worked", Policy::CumulativeLatest),
    field(Metric::IndividualsWorked, "Total_Individuals_Worked", Policy::CumulativeLatest),
    field(Metric::ActiveJobCards, "Total_No_of_Active_Job_Cards", Policy::CumulativeLatest),
    field(Metric::ActiveWorkers, "Total_No_of_Active_Workers", Policy::CumulativeLatest),
    field(
        Metric::HouseholdsCompleted100Days,
        "Total_No_of_HHs_completed_100_Days_of_Wage_Employment",
        Policy::CumulativeLatest,
    ),
    field(Metric::JobCardsIssued, "Total_No_of_JobCards_issued", Policy::CumulativeLatest),
    field(Metric::TotalWorkers, "Total_No_of_Workers", Policy::CumulativeLatest),
    field(Metric::WorksTakenUp, "Total_No_of_Works_Takenup", Policy::CumulativeMax),
    field(Metric::Wages, "Wages", Policy::MonthlySum),
    field(Metric::WomenPersondays, "Women_Persondays", Policy::MonthlySum),
    field(Metric::PercentCategoryBWorks, "percent_of_Category_B_Works", Policy::MonthlyAverage),
];

impl Metric {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_TABLE[self.index()]
    }

    pub fn column(self) -> &'static str {
        self.spec().column
    }

    pub fn policy(self) -> Policy {
        self.spec().policy
    }

    pub fn all() -> impl Iterator<Item = Metric> {
        FIELD_TABLE.iter().map(|f| f.metric)
    }
}

/// Later periods compare as `Less`, so the minimum is the latest record.
fn latest_first(a: &NormalizedRecord, b: &NormalizedRecord) -> Ordering {
    let month_rank = |r: &NormalizedRecord| calendar_index(&r.month).map_or(-1, |i| i as i32);
    normalize_fin_year(&b.fin_year)
        .cmp(&normalize_fin_year(&a.fin_year))
        .then_with(|| month_rank(b).cmp(&month_rank(a)))
}

/// The record a `(fin_year desc, calendar month desc)` stable sort would put
/// first. Ties keep input order.
pub fn latest_record(records: &[NormalizedRecord]) -> Option<&NormalizedRecord> {
    // `min_by` returns the first of several equal minima.
    records.iter().min_by(|a, b| latest_first(a, b))
}

fn present(records: &[NormalizedRecord], metric: Metric) -> impl Iterator<Item = f64> + '_ {
    records
        .iter()
        .filter_map(move |r| r.value(metric))
        .map(finite_or_zero)
}

pub fn cumulative_max(records: &[NormalizedRecord], metric: Metric) -> f64 {
    present(records, metric)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(0.0)
}

pub fn cumulative_latest(
    records: &[NormalizedRecord],
    latest: Option<&NormalizedRecord>,
    metric: Metric,
) -> f64 {
    let latest_value = latest
        .and_then(|r| r.value(metric))
        .map(finite_or_zero)
        .unwrap_or(0.0);
    if latest_value != 0.0 {
        latest_value
    } else {
        cumulative_max(records, metric)
    }
}

pub fn monthly_sum(records: &[NormalizedRecord], metric: Metric) -> f64 {
    finite_sum(present(records, metric))
}

pub fn monthly_average(records: &[NormalizedRecord], metric: Metric) -> f64 {
    let values: Vec<f64> = present(records, metric).filter(|v| *v != 0.0).collect();
    round_to(average(&values), 1)
}

pub fn resolve(
    records: &[NormalizedRecord],
    latest: Option<&NormalizedRecord>,
    metric: Metric,
) -> f64 {
    match metric.policy() {
        Policy::CumulativeLatest => cumulative_latest(records, latest, metric),
        Policy::CumulativeMax => cumulative_max(records, metric),
        Policy::MonthlySum => monthly_sum(records, metric),
        Policy::MonthlyAverage => monthly_average(records, metric),
    }
}

/// Every metric of [`FIELD_TABLE`] folded under its policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetrics {
    values: [f64; METRIC_COUNT],
}

impl ResolvedMetrics {
    pub fn from_records(records: &[NormalizedRecord]) -> Self {
        let latest = latest_record(records);
        let mut values = [0.0; METRIC_COUNT];
        for metric in Metric::all() {
            values[metric.index()] = resolve(records, latest, metric);
        }
        Self { values }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }
}

impl Index<Metric> for ResolvedMetrics {
    type Output = f64;

    fn index(&self, metric: Metric) -> &f64 {
        &self.values[metric.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rec(month: &str, metric: Metric, value: Option<f64>) -> NormalizedRecord {
        NormalizedRecord::new("MANIPUR", "Imphal West", "2024-2025", month).with_value(metric, value)
    }

    #[test]
    fn field_table_is_indexed_by_metric() {
        for (i, spec) in FIELD_TABLE.iter().enumerate() {
            assert_eq!(spec.metric.index(), i, "{:?} out of place", spec.metric);
        }
        let columns: HashSet<&str> = FIELD_TABLE.iter().map(|f| f.column).collect();
        assert_eq!(columns.len(), METRIC_COUNT);
    }

    #[test]
    fn field_classification() {
        assert_eq!(Metric::HouseholdsWorked.policy(), Policy::CumulativeLatest);
        assert_eq!(Metric::JobCardsIssued.policy(), Policy::CumulativeLatest);
        assert_eq!(Metric::CompletedWorks.policy(), Policy::CumulativeMax);
        assert_eq!(Metric::WomenPersondays.policy(), Policy::MonthlySum);
        assert_eq!(Metric::Wages.policy(), Policy::MonthlySum);
        assert_eq!(Metric::AverageWageRate.policy(), Policy::MonthlyAverage);
        assert_eq!(Metric::PercentCategoryBWorks.policy(), Policy::MonthlyAverage);
    }

    #[test]
    fn latest_uses_calendar_month_order() {
        let records = vec![
            rec("Apr", Metric::HouseholdsWorked, Some(100.0)),
            rec("May", Metric::HouseholdsWorked, Some(150.0)),
        ];
        assert_eq!(latest_record(&records).map(|r| r.month.as_str()), Some("May"));
        let resolved = ResolvedMetrics::from_records(&records);
        assert_eq!(resolved[Metric::HouseholdsWorked], 150.0);
    }

    #[test]
    fn latest_within_one_fin_year_follows_the_calendar() {
        // March closes the financial year but April is later in the calendar.
        let records = vec![
            rec("Apr", Metric::ActiveWorkers, Some(400.0)),
            rec("Mar", Metric::ActiveWorkers, Some(300.0)),
        ];
        assert_eq!(latest_record(&records).map(|r| r.month.as_str()), Some("Apr"));
        assert_eq!(ResolvedMetrics::from_records(&records)[Metric::ActiveWorkers], 400.0);

        let records = vec![
            rec("Dec", Metric::ActiveWorkers, Some(120.0)),
            rec("Jan", Metric::ActiveWorkers, Some(110.0)),
        ];
        assert_eq!(latest_record(&records).map(|r| r.month.as_str()), Some("Dec"));
        assert_eq!(ResolvedMetrics::from_records(&records)[Metric::ActiveWorkers], 120.0);
    }

    #[test]
    fn latest_prefers_later_fin_year_then_keeps_input_order() {
        let mut older = rec("Dec", Metric::ActiveWorkers, Some(1.0));
        older.fin_year = "2023-24".to_string();
        let first = rec("Jan", Metric::ActiveWorkers, Some(2.0));
        let second = rec("Jan", Metric::ActiveWorkers, Some(3.0));
        let records = vec![older, first, second];
        let latest = latest_record(&records).and_then(|r| r.value(Metric::ActiveWorkers));
        assert_eq!(latest, Some(2.0));
    }

    #[test]
    fn cumulative_latest_falls_back_to_max() {
        let records = vec![
            rec("Apr", Metric::JobCardsIssued, Some(900.0)),
            rec("May", Metric::JobCardsIssued, Some(0.0)),
        ];
        let resolved = ResolvedMetrics::from_records(&records);
        assert_eq!(resolved[Metric::JobCardsIssued], 900.0);

        let records = vec![
            rec("Apr", Metric::JobCardsIssued, Some(900.0)),
            rec("May", Metric::JobCardsIssued, None),
        ];
        assert_eq!(ResolvedMetrics::from_records(&records)[Metric::JobCardsIssued], 900.0);
    }

    #[test]
    fn average_skips_zero_and_absent() {
        let records = vec![
            rec("Apr", Metric::AverageWageRate, Some(200.0)),
            rec("May", Metric::AverageWageRate, Some(0.0)),
            rec("Jun", Metric::AverageWageRate, Some(300.0)),
            rec("Jul", Metric::AverageWageRate, None),
        ];
        assert_eq!(monthly_average(&records, Metric::AverageWageRate), 250.0);
    }

    #[test]
    fn empty_sum_is_positive_zero() {
        let sum = monthly_sum(&[], Metric::Wages);
        assert!(sum == 0.0 && sum.is_sign_positive());
        let records = vec![rec("Apr", Metric::Wages, None)];
        assert!(monthly_sum(&records, Metric::Wages).is_sign_positive());
    }

    #[test]
    fn sum_and_max() {
        let records = vec![
            rec("Apr", Metric::CompletedWorks, Some(4.0)),
            rec("May", Metric::CompletedWorks, Some(9.0)),
            rec("Jun", Metric::CompletedWorks, None),
        ];
        assert_eq!(cumulative_max(&records, Metric::CompletedWorks), 9.0);
        assert_eq!(monthly_sum(&records, Metric::CompletedWorks), 13.0);
    }

    #[test]
    fn empty_input_resolves_to_zero() {
        let resolved = ResolvedMetrics::from_records(&[]);
        for metric in Metric::all() {
            assert_eq!(resolved.get(metric), 0.0, "{:?}", metric);
        }
    }
}
