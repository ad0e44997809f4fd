//! Snapshot and district breakdown views.
//!
//! All functions here are pure folds over a borrowed slice of records: no
//! caching, no I/O, and an empty slice yields a zero-valued result.
use std::collections::BTreeMap;

use crate::policy::{latest_record, Metric, ResolvedMetrics};
use crate::trends::{
    expenditure_trend, monthly_wages_trend, monthly_works_trend, wage_amount, wage_growth_pct,
};
use crate::types::{
    AggregateSnapshot, DetailMeta, DistrictDetail, EmploymentSection, InclusivitySection,
    NormalizedRecord, WagesSection, WorkProgressSection,
};
use crate::util::{finite_add, finite_or_zero, finite_sum, round_to, safe_div, to_lakhs};

/// `part / whole * 100` to one decimal, 0 when `whole` is 0.
pub fn participation_pct(part: f64, whole: f64) -> f64 {
    round_to(safe_div(part, whole) * 100.0, 1)
}

fn latest_period(records: &[NormalizedRecord]) -> (String, String) {
    latest_record(records)
        .map(|r| (format!("{}-{}", r.fin_year, r.month), r.month.clone()))
        .unwrap_or_default()
}

fn total_wages(records: &[NormalizedRecord]) -> f64 {
    finite_sum(records.iter().map(wage_amount))
}

pub fn aggregate_state_snapshot(records: &[NormalizedRecord]) -> AggregateSnapshot {
    let m = ResolvedMetrics::from_records(records);
    let active_workers = m[Metric::ActiveWorkers];
    AggregateSnapshot {
        total_active_workers: active_workers,
        assets_created: m[Metric::CompletedWorks],
        persondays_generated: finite_sum([
            m[Metric::WomenPersondays],
            m[Metric::ScPersondays],
            m[Metric::StPersondays],
        ]),
        dbt_transactions: total_wages(records),
        households_benefitted: m[Metric::HouseholdsWorked],
        individuals_worked: m[Metric::IndividualsWorked],
        attendance_today: active_workers,
        number_of_worksites: finite_add(m[Metric::CompletedWorks], m[Metric::OngoingWorks]),
        number_of_workers: active_workers,
        total_workers: m[Metric::TotalWorkers],
        job_cards_issued: m[Metric::JobCardsIssued],
        job_cards_active: m[Metric::ActiveJobCards],
        hh_completed_100_days: m[Metric::HouseholdsCompleted100Days],
        records: records.len(),
        latest_period: latest_period(records).0,
    }
}

impl AggregateSnapshot {
    /// Add another snapshot's counts into this one. `latest_period` is left
    /// to the caller.
    pub fn absorb(&mut self, other: &AggregateSnapshot) {
        let add = |total: &mut f64, part: f64| *total = finite_add(*total, part);
        add(&mut self.total_active_workers, other.total_active_workers);
        add(&mut self.assets_created, other.assets_created);
        add(&mut self.persondays_generated, other.persondays_generated);
        add(&mut self.dbt_transactions, other.dbt_transactions);
        add(&mut self.households_benefitted, other.households_benefitted);
        add(&mut self.individuals_worked, other.individuals_worked);
        add(&mut self.attendance_today, other.attendance_today);
        add(&mut self.number_of_worksites, other.number_of_worksites);
        add(&mut self.number_of_workers, other.number_of_workers);
        add(&mut self.total_workers, other.total_workers);
        add(&mut self.job_cards_issued, other.job_cards_issued);
        add(&mut self.job_cards_active, other.job_cards_active);
        add(&mut self.hh_completed_100_days, other.hh_completed_100_days);
        self.records += other.records;
    }
}

/// Group records by district key. Records with no district are dropped.
pub fn group_by_district(records: &[NormalizedRecord]) -> BTreeMap<String, Vec<NormalizedRecord>> {
    let mut groups: BTreeMap<String, Vec<NormalizedRecord>> = BTreeMap::new();
    for r in records {
        if r.district_key.is_empty() {
            continue;
        }
        groups.entry(r.district_key.clone()).or_default().push(r.clone());
    }
    groups
}

/// State totals as the sum of independent per-district snapshots, so one
/// district's latest month never stands in for the others.
pub fn rollup_districts(records: &[NormalizedRecord]) -> AggregateSnapshot {
    let mut total = AggregateSnapshot::default();
    for district_records in group_by_district(records).values() {
        total.absorb(&aggregate_state_snapshot(district_records));
    }
    total.latest_period = latest_period(records).0;
    total
}

/// `100 - B` clamped to `[0, 100]`. Without any reported category-B share
/// there is nothing to complement, so the result is 0 rather than 100.
fn category_a_share(records: &[NormalizedRecord], category_b: f64) -> f64 {
    let reported = records
        .iter()
        .any(|r| r.value(Metric::PercentCategoryBWorks).is_some());
    if reported {
        (100.0 - category_b).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn aggregate_district_detail(
    records: &[NormalizedRecord],
    fin_year: &str,
    district: &str,
) -> DistrictDetail {
    let m = ResolvedMetrics::from_records(records);

    let employment = EmploymentSection {
        total_households: m[Metric::HouseholdsWorked],
        total_individuals: m[Metric::IndividualsWorked],
        average_days: m[Metric::AverageDaysOfEmployment],
        hh_completed_100_days: m[Metric::HouseholdsCompleted100Days],
        job_cards_issued: m[Metric::JobCardsIssued],
        job_cards_active: m[Metric::ActiveJobCards],
        inactive_job_cards: finite_or_zero(m[Metric::JobCardsIssued] - m[Metric::ActiveJobCards])
            .max(0.0),
        total_active_workers: m[Metric::ActiveWorkers],
        differently_abled_persons_worked: m[Metric::DifferentlyAbledWorked],
        approved_labour_budget: m[Metric::ApprovedLabourBudget],
    };

    let monthly_wages_trends = monthly_wages_trend(records);
    let total_wages = total_wages(records);
    let wages = WagesSection {
        average_wage: m[Metric::AverageWageRate],
        total_wages,
        total_wages_lakhs: to_lakhs(total_wages),
        total_expenditure: m[Metric::TotalExpenditure],
        material_and_skilled_wages: m[Metric::MaterialAndSkilledWages],
        admin_expenditure: m[Metric::AdminExpenditure],
        wage_growth_pct: wage_growth_pct(&monthly_wages_trends),
    };

    let completed = m[Metric::CompletedWorks];
    let ongoing = m[Metric::OngoingWorks];
    let taken_up = m[Metric::WorksTakenUp];
    let category_b = m[Metric::PercentCategoryBWorks];
    let work_progress = WorkProgressSection {
        completed_works: completed,
        ongoing_works: ongoing,
        total_works_taken_up: taken_up,
        percent_category_b_works: category_b,
        percent_category_a_works: category_a_share(records, category_b),
        completion_pct: round_to(safe_div(completed, taken_up) * 100.0, 0).clamp(0.0, 100.0),
        number_of_worksites: finite_add(completed, ongoing),
    };

    let women = m[Metric::WomenPersondays];
    let sc = m[Metric::ScPersondays];
    let st = m[Metric::StPersondays];
    let persondays = finite_sum([women, sc, st]);
    let inclusivity = InclusivitySection {
        women_persondays: women,
        sc_persondays: sc,
        st_persondays: st,
        total_persondays: persondays,
        women_participation_pct: participation_pct(women, persondays),
        sc_participation_pct: participation_pct(sc, persondays),
        st_participation_pct: participation_pct(st, persondays),
        sc_st_participation_pct: participation_pct(finite_add(sc, st), persondays),
    };

    DistrictDetail {
        employment,
        wages,
        work_progress,
        inclusivity,
        trends: expenditure_trend(records, fin_year),
        monthly_works_trends: monthly_works_trend(records),
        monthly_wages_trends,
        meta: DetailMeta {
            fin_year: fin_year.trim().to_string(),
            district: district.trim().to_uppercase(),
            records: records.len(),
            latest_month: latest_period(records).1,
        },
    }
}
