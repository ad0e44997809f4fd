//! Month and financial-year conventions.
//!
//! Two orderings are in play and must not be mixed up:
//! [`CALENDAR_MONTHS`] ranks months for picking the latest record, while
//! [`FINANCIAL_YEAR_MONTHS`] orders every chart series April through March.
use chrono::{Datelike, Local, NaiveDate};
use std::cmp::Ordering;

use crate::util::parse_i32_safe;

/// Calendar order, `Jan = 0 .. Dec = 11`. Used for latest-record selection.
pub const CALENDAR_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Financial-year order, `Apr = 0 .. Mar = 11`. Used for trend series.
pub const FINANCIAL_YEAR_MONTHS: [&str; 12] = [
    "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar",
];

/// Map `"apr"`, `"APR"`, `"April"` and friends to the canonical abbreviation.
pub fn canonical_month(raw: &str) -> Option<&'static str> {
    let prefix = raw.trim().get(..3)?;
    CALENDAR_MONTHS
        .iter()
        .copied()
        .find(|m| m.eq_ignore_ascii_case(prefix))
}

pub fn calendar_index(month: &str) -> Option<usize> {
    let m = canonical_month(month)?;
    CALENDAR_MONTHS.iter().position(|c| *c == m)
}

pub fn financial_year_index(month: &str) -> Option<usize> {
    let m = canonical_month(month)?;
    FINANCIAL_YEAR_MONTHS.iter().position(|c| *c == m)
}

/// Ascending April → March comparison with unrecognized months sorted last.
pub fn cmp_financial_year_order(a: &str, b: &str) -> Ordering {
    let rank = |m: &str| financial_year_index(m).unwrap_or(FINANCIAL_YEAR_MONTHS.len());
    rank(a).cmp(&rank(b))
}

/// Expand the short financial-year form: `"2025-26"` becomes `"2025-2026"`.
/// Already-expanded values pass through; anything unrecognized is returned
/// trimmed.
pub fn normalize_fin_year(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some((start, end)) = trimmed.split_once('-') else {
        return trimmed.to_string();
    };
    let (start, end) = (start.trim(), end.trim());
    let Some(start_year) = parse_i32_safe(Some(start)).filter(|_| start.len() == 4) else {
        return trimmed.to_string();
    };
    match end.len() {
        4 if parse_i32_safe(Some(end)).is_some() => format!("{}-{}", start_year, end),
        2 => match parse_i32_safe(Some(end)) {
            Some(short) => {
                let mut end_year = start_year / 100 * 100 + short;
                if end_year < start_year {
                    end_year += 100;
                }
                format!("{}-{}", start_year, end_year)
            }
            None => trimmed.to_string(),
        },
        _ => trimmed.to_string(),
    }
}

/// First calendar year of a financial year, e.g. `2025` for `"2025-26"`.
pub fn fin_year_start(fin_year: &str) -> Option<i32> {
    let start = fin_year.trim().split('-').next()?;
    parse_i32_safe(Some(start))
}

pub fn same_fin_year(a: &str, b: &str) -> bool {
    normalize_fin_year(a) == normalize_fin_year(b)
}

/// The financial year a date falls in. April opens a new year.
pub fn fin_year_for(date: NaiveDate) -> String {
    let start = if date.month() >= 4 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}-{}", start, start + 1)
}

pub fn current_fin_year() -> String {
    fin_year_for(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_orders_are_distinct() {
        assert_eq!(calendar_index("Apr"), Some(3));
        assert_eq!(financial_year_index("Apr"), Some(0));
        assert_eq!(calendar_index("Mar"), Some(2));
        assert_eq!(financial_year_index("Mar"), Some(11));
    }

    #[test]
    fn canonical_month_accepts_variants() {
        assert_eq!(canonical_month("april"), Some("Apr"));
        assert_eq!(canonical_month(" SEPT "), Some("Sep"));
        assert_eq!(canonical_month("Q1"), None);
        assert_eq!(canonical_month(""), None);
    }

    #[test]
    fn unknown_months_sort_last_in_financial_order() {
        let mut months = vec!["Mar", "???", "Apr", "Dec"];
        months.sort_by(|a, b| cmp_financial_year_order(a, b));
        assert_eq!(months, vec!["Apr", "Dec", "Mar", "???"]);
    }

    #[test]
    fn fin_year_normalization() {
        assert_eq!(normalize_fin_year("2025-26"), "2025-2026");
        assert_eq!(normalize_fin_year("2025-2026"), "2025-2026");
        assert_eq!(normalize_fin_year("2099-00"), "2099-2100");
        assert_eq!(normalize_fin_year(" FY25 "), "FY25");
        assert!(same_fin_year("2024-25", "2024-2025"));
        assert_eq!(fin_year_start("2024-25"), Some(2024));
    }

    #[test]
    fn fin_year_for_date() {
        let march = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let april = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(fin_year_for(march), "2024-2025");
        assert_eq!(fin_year_for(april), "2025-2026");
    }
}
