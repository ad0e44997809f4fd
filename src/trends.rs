//! Chart series built from period records.
//!
//! The expenditure trend keeps one point per record. Monthly series merge
//! records sharing a month and come back in April → March order.
use std::collections::HashMap;

use crate::calendar::cmp_financial_year_order;
use crate::policy::Metric;
use crate::types::{
    InclusionMonth, InclusionShares, InclusionTotals, InclusionTrends, MonthlyWagesPoint,
    MonthlyWorksPoint, NormalizedRecord, TrendPoint,
};
use crate::util::{finite_add, finite_or_zero, finite_sum, round_to, safe_div, to_lakhs};

fn amount(record: &NormalizedRecord, metric: Metric) -> f64 {
    record.value(metric).map(finite_or_zero).unwrap_or(0.0)
}

/// Wages paid by a record, falling back to total expenditure when the
/// wages column is absent.
pub fn wage_amount(record: &NormalizedRecord) -> f64 {
    record
        .value(Metric::Wages)
        .or_else(|| record.value(Metric::TotalExpenditure))
        .map(finite_or_zero)
        .unwrap_or(0.0)
}

/// Fold records into one accumulator per distinct month. Records without a
/// month are skipped. Output is in financial-year order; months that are not
/// recognized keep their first-seen order at the end.
fn fold_by_month<A, F>(records: &[NormalizedRecord], mut fold: F) -> Vec<(String, A)>
where
    A: Default,
    F: FnMut(&mut A, &NormalizedRecord),
{
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, A)> = Vec::new();
    for r in records {
        let month = r.month.trim();
        if month.is_empty() {
            continue;
        }
        let idx = *slots.entry(month).or_insert_with(|| {
            groups.push((month.to_string(), A::default()));
            groups.len() - 1
        });
        fold(&mut groups[idx].1, r);
    }
    // Stable sort keeps first-seen order among unknown months.
    groups.sort_by(|a, b| cmp_financial_year_order(&a.0, &b.0));
    groups
}

/// Expenditure over time, one point per record in input order. The value is
/// `Total_Exp`, falling back to `Wages`; negative values are dropped.
pub fn expenditure_trend(records: &[NormalizedRecord], fallback_fin_year: &str) -> Vec<TrendPoint> {
    records
        .iter()
        .filter_map(|r| {
            let fin_year = if r.fin_year.is_empty() {
                fallback_fin_year.trim()
            } else {
                r.fin_year.as_str()
            };
            let period = format!("{}-{}", fin_year, r.month).trim().to_string();
            let value = r
                .value(Metric::TotalExpenditure)
                .or_else(|| r.value(Metric::Wages))
                .map(finite_or_zero)
                .unwrap_or(0.0);
            (!period.is_empty() && value >= 0.0).then_some(TrendPoint { period, value })
        })
        .collect()
}

/// Completed and ongoing works per month. Counts are cumulative upstream, so
/// duplicate months merge by taking the larger value.
pub fn monthly_works_trend(records: &[NormalizedRecord]) -> Vec<MonthlyWorksPoint> {
    fold_by_month(records, |acc: &mut (f64, f64), r| {
        acc.0 = acc.0.max(amount(r, Metric::CompletedWorks));
        acc.1 = acc.1.max(amount(r, Metric::OngoingWorks));
    })
    .into_iter()
    .map(|(month, (completed, ongoing))| MonthlyWorksPoint {
        month,
        completed_works: completed,
        ongoing_works: ongoing,
    })
    .collect()
}

/// Wages per month in lakhs. Duplicate months are summed before conversion.
pub fn monthly_wages_trend(records: &[NormalizedRecord]) -> Vec<MonthlyWagesPoint> {
    fold_by_month(records, |acc: &mut f64, r| *acc = finite_add(*acc, wage_amount(r)))
        .into_iter()
        .map(|(month, total)| MonthlyWagesPoint {
            month,
            wages_lakhs: to_lakhs(total),
        })
        .collect()
}

/// Percent change between the last two months of a wages series, one
/// decimal. Zero with fewer than two months or a zero previous month.
pub fn wage_growth_pct(series: &[MonthlyWagesPoint]) -> f64 {
    let mut sorted: Vec<&MonthlyWagesPoint> = series.iter().collect();
    sorted.sort_by(|a, b| cmp_financial_year_order(&a.month, &b.month));
    match sorted.as_slice() {
        [.., previous, current] if previous.wages_lakhs != 0.0 => round_to(
            safe_div(current.wages_lakhs - previous.wages_lakhs, previous.wages_lakhs) * 100.0,
            1,
        ),
        _ => 0.0,
    }
}

impl InclusionTotals {
    pub fn combined(&self) -> f64 {
        finite_sum([self.women, self.sc, self.st, self.differently_abled])
    }

    fn absorb(&mut self, record: &NormalizedRecord) {
        let add = |total: &mut f64, metric: Metric| {
            *total = finite_add(*total, amount(record, metric));
        };
        add(&mut self.women, Metric::WomenPersondays);
        add(&mut self.sc, Metric::ScPersondays);
        add(&mut self.st, Metric::StPersondays);
        add(&mut self.differently_abled, Metric::DifferentlyAbledWorked);
    }

    pub fn shares(&self) -> InclusionShares {
        let total = self.combined();
        let share = |part: f64| round_to(safe_div(part, total) * 100.0, 0);
        InclusionShares {
            women: share(self.women),
            sc: share(self.sc),
            st: share(self.st),
            differently_abled: share(self.differently_abled),
        }
    }
}

pub fn inclusion_totals(records: &[NormalizedRecord]) -> InclusionTotals {
    records.iter().fold(InclusionTotals::default(), |mut acc, r| {
        acc.absorb(r);
        acc
    })
}

/// Women, SC, ST and differently-abled participation per month plus totals.
pub fn aggregate_inclusion_trends(records: &[NormalizedRecord]) -> InclusionTrends {
    let monthly_trends = fold_by_month(records, |acc: &mut InclusionTotals, r| acc.absorb(r))
    .into_iter()
    .map(|(month, t)| InclusionMonth {
        month,
        women: t.women,
        sc: t.sc,
        st: t.st,
        differently_abled: t.differently_abled,
    })
    .collect();

    let totals = inclusion_totals(records);
    InclusionTrends {
        monthly_trends,
        shares: totals.shares(),
        inclusion_index: totals.combined(),
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(month: &str) -> NormalizedRecord {
        NormalizedRecord::new("MANIPUR", "Thoubal", "2024-2025", month)
    }

    #[test]
    fn works_trend_merges_duplicate_months_by_max() {
        let records = vec![
            rec("May").with_value(Metric::CompletedWorks, Some(12.0)),
            rec("Apr").with_value(Metric::CompletedWorks, Some(3.0)),
            rec("May").with_value(Metric::CompletedWorks, Some(7.0)),
        ];
        let trend = monthly_works_trend(&records);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].month, "Apr");
        assert_eq!(trend[1].month, "May");
        assert_eq!(trend[1].completed_works, 12.0);
        assert_eq!(trend[1].ongoing_works, 0.0);
    }

    #[test]
    fn wages_trend_sums_duplicate_months_in_lakhs() {
        let records = vec![
            rec("Jun").with_value(Metric::Wages, Some(50_000.0)),
            rec("Jun").with_value(Metric::Wages, Some(70_000.0)),
        ];
        let trend = monthly_wages_trend(&records);
        assert_eq!(trend, vec![MonthlyWagesPoint { month: "Jun".into(), wages_lakhs: 1.2 }]);
    }

    #[test]
    fn wages_fall_back_to_expenditure() {
        let r = rec("Jul").with_value(Metric::TotalExpenditure, Some(250_000.0));
        assert_eq!(wage_amount(&r), 250_000.0);
        let r = r.with_value(Metric::Wages, Some(0.0));
        assert_eq!(wage_amount(&r), 0.0);
    }

    #[test]
    fn monthly_series_follow_financial_year_order() {
        let records = vec![rec("Jan"), rec("Mar"), rec("Apr"), rec("Dec"), rec("")];
        let months: Vec<String> = monthly_wages_trend(&records)
            .into_iter()
            .map(|p| p.month)
            .collect();
        assert_eq!(months, vec!["Apr", "Dec", "Jan", "Mar"]);
    }

    #[test]
    fn expenditure_trend_keeps_every_record() {
        let mut no_year = rec("Jun").with_value(Metric::Wages, Some(10.0));
        no_year.fin_year.clear();
        let records = vec![
            rec("May").with_value(Metric::TotalExpenditure, Some(5.0)),
            rec("May").with_value(Metric::TotalExpenditure, Some(6.0)),
            no_year,
            rec("Jul").with_value(Metric::TotalExpenditure, Some(-1.0)),
        ];
        let trend = expenditure_trend(&records, "2025-2026");
        let periods: Vec<&str> = trend.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["2024-2025-May", "2024-2025-May", "2025-2026-Jun"]);
        assert_eq!(trend[2].value, 10.0);
    }

    #[test]
    fn wage_growth_compares_last_two_months() {
        let series = vec![
            MonthlyWagesPoint { month: "May".into(), wages_lakhs: 3.0 },
            MonthlyWagesPoint { month: "Apr".into(), wages_lakhs: 2.0 },
        ];
        assert_eq!(wage_growth_pct(&series), 50.0);
        assert_eq!(wage_growth_pct(&series[..1]), 0.0);

        let flat_start = vec![
            MonthlyWagesPoint { month: "Apr".into(), wages_lakhs: 0.0 },
            MonthlyWagesPoint { month: "May".into(), wages_lakhs: 4.0 },
        ];
        assert_eq!(wage_growth_pct(&flat_start), 0.0);
    }

    #[test]
    fn inclusion_trends_sum_per_month() {
        let records = vec![
            rec("Apr")
                .with_value(Metric::WomenPersondays, Some(30.0))
                .with_value(Metric::ScPersondays, Some(10.0)),
            rec("Apr").with_value(Metric::WomenPersondays, Some(20.0)),
            rec("May")
                .with_value(Metric::StPersondays, Some(40.0))
                .with_value(Metric::DifferentlyAbledWorked, Some(0.0)),
        ];
        let trends = aggregate_inclusion_trends(&records);
        assert_eq!(trends.monthly_trends.len(), 2);
        assert_eq!(trends.monthly_trends[0].women, 50.0);
        assert_eq!(trends.totals.women, 50.0);
        assert_eq!(trends.totals.st, 40.0);
        assert_eq!(trends.inclusion_index, 100.0);
        assert_eq!(trends.shares.women, 50.0);
        assert_eq!(trends.shares.sc, 10.0);
    }

    #[test]
    fn empty_inclusion_is_zeroed() {
        let trends = aggregate_inclusion_trends(&[]);
        assert!(trends.monthly_trends.is_empty());
        assert_eq!(trends.totals, InclusionTotals::default());
        assert_eq!(trends.shares, InclusionShares::default());
    }

    #[test]
    fn inclusion_totals_survive_overflow() {
        let records = vec![
            rec("Apr").with_value(Metric::WomenPersondays, Some(f64::MAX)),
            rec("May").with_value(Metric::WomenPersondays, Some(f64::MAX)),
        ];
        let trends = aggregate_inclusion_trends(&records);
        assert_eq!(trends.monthly_trends[0].women, f64::MAX);
        assert_eq!(trends.totals.women, 0.0);
        assert!(trends.inclusion_index.is_finite());
    }
}
