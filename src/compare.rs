//! Side-by-side views of two district breakdowns.
use crate::calendar::cmp_financial_year_order;
use crate::types::{DistrictDetail, MetricComparison, WagesComparisonRow, WorksComparisonRow};

/// Months seen in either series, first-seen order, then sorted April → March.
fn joined_months<'a>(
    left: impl Iterator<Item = &'a str>,
    right: impl Iterator<Item = &'a str>,
) -> Vec<String> {
    let mut months: Vec<String> = Vec::new();
    for m in left.chain(right) {
        if !months.iter().any(|seen| seen == m) {
            months.push(m.to_string());
        }
    }
    months.sort_by(|a, b| cmp_financial_year_order(a, b));
    months
}

pub fn compare_monthly_wages(a: &DistrictDetail, b: &DistrictDetail) -> Vec<WagesComparisonRow> {
    let lookup = |d: &DistrictDetail, month: &str| {
        d.monthly_wages_trends
            .iter()
            .find(|p| p.month == month)
            .map_or(0.0, |p| p.wages_lakhs)
    };
    joined_months(
        a.monthly_wages_trends.iter().map(|p| p.month.as_str()),
        b.monthly_wages_trends.iter().map(|p| p.month.as_str()),
    )
    .into_iter()
    .map(|month| WagesComparisonRow {
        district1: lookup(a, &month),
        district2: lookup(b, &month),
        month,
    })
    .collect()
}

pub fn compare_monthly_works(a: &DistrictDetail, b: &DistrictDetail) -> Vec<WorksComparisonRow> {
    let lookup = |d: &DistrictDetail, month: &str| {
        d.monthly_works_trends
            .iter()
            .find(|p| p.month == month)
            .map_or((0.0, 0.0), |p| (p.completed_works, p.ongoing_works))
    };
    joined_months(
        a.monthly_works_trends.iter().map(|p| p.month.as_str()),
        b.monthly_works_trends.iter().map(|p| p.month.as_str()),
    )
    .into_iter()
    .map(|month| {
        let (c1, o1) = lookup(a, &month);
        let (c2, o2) = lookup(b, &month);
        WorksComparisonRow {
            month,
            district1_completed: c1,
            district1_ongoing: o1,
            district2_completed: c2,
            district2_ongoing: o2,
        }
    })
    .collect()
}

/// Headline figures of both districts in a fixed order.
pub fn compare_summary(a: &DistrictDetail, b: &DistrictDetail) -> Vec<MetricComparison> {
    let row = |label: &str, pick: fn(&DistrictDetail) -> f64| MetricComparison {
        label: label.to_string(),
        district1: pick(a),
        district2: pick(b),
    };
    vec![
        row("Total Wages (₹)", |d| d.wages.total_wages),
        row("Average Wage (₹/Day)", |d| d.wages.average_wage),
        row("Households Worked", |d| d.employment.total_households),
        row("Individuals Worked", |d| d.employment.total_individuals),
        row("Completed Works", |d| d.work_progress.completed_works),
        row("Ongoing Works", |d| d.work_progress.ongoing_works),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_district_detail;
    use crate::policy::Metric;
    use crate::types::NormalizedRecord;

    fn detail(district: &str, rows: &[(&str, f64, f64)]) -> DistrictDetail {
        let records: Vec<NormalizedRecord> = rows
            .iter()
            .map(|(month, wages, completed)| {
                NormalizedRecord::new("MANIPUR", district, "2024-2025", month)
                    .with_value(Metric::Wages, Some(*wages))
                    .with_value(Metric::CompletedWorks, Some(*completed))
            })
            .collect();
        aggregate_district_detail(&records, "2024-2025", district)
    }

    #[test]
    fn wages_join_fills_missing_months_with_zero() {
        let a = detail("Thoubal", &[("May", 200_000.0, 1.0), ("Apr", 100_000.0, 1.0)]);
        let b = detail("Ukhrul", &[("Jun", 300_000.0, 2.0), ("Apr", 50_000.0, 2.0)]);
        let rows = compare_monthly_wages(&a, &b);
        let months: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, vec!["Apr", "May", "Jun"]);
        assert_eq!(rows[0].district1, 1.0);
        assert_eq!(rows[0].district2, 0.5);
        assert_eq!(rows[1].district2, 0.0);
        assert_eq!(rows[2].district1, 0.0);
    }

    #[test]
    fn works_join_and_summary() {
        let a = detail("Thoubal", &[("Apr", 0.0, 4.0)]);
        let b = detail("Ukhrul", &[("Apr", 0.0, 9.0)]);
        let works = compare_monthly_works(&a, &b);
        assert_eq!(works.len(), 1);
        assert_eq!(works[0].district1_completed, 4.0);
        assert_eq!(works[0].district2_completed, 9.0);

        let summary = compare_summary(&a, &b);
        assert_eq!(summary.len(), 6);
        assert_eq!(summary[4].label, "Completed Works");
        assert_eq!(summary[4].district2, 9.0);
    }
}
