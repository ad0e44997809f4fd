// Utility helpers for parsing and guarded arithmetic.
//
// This module centralizes all the "dirty" number handling so the aggregation
// code can assume clean, finite values.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in open-data exports.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be parsed or is not finite
///   (`"NaN"`, `"inf"` and friends parse in Rust but are rejected here).
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Replace `NaN`/`±inf` with zero so one bad value cannot poison a fold.
pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Division that yields 0 instead of `NaN`/`inf` for a zero or non-finite
/// denominator.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    finite_or_zero(numerator / denominator)
}

/// Round to `decimals` places with halves going up (`2.25 -> 2.3`,
/// `-2.25 -> -2.2`), the same way the dashboard rounds its figures.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor + 0.5).floor() / factor;
    // Avoid emitting `-0.0` into serialized output.
    if rounded == 0.0 {
        0.0
    } else {
        finite_or_zero(rounded)
    }
}

/// `a + b`, or 0 when the addition overflows.
pub fn finite_add(a: f64, b: f64) -> f64 {
    finite_or_zero(a + b)
}

/// Sum from `+0.0` through [`finite_add`], so an empty input is a positive
/// zero and an overflowing running total restarts at 0.
pub fn finite_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .fold(0.0, |acc, v| finite_add(acc, finite_or_zero(v)))
}

pub const LAKH: f64 = 100_000.0;

/// Convert a base-currency amount into lakhs, two decimals.
pub fn to_lakhs(amount: f64) -> f64 {
    round_to(safe_div(amount, LAKH), 2)
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    safe_div(finite_sum(v.iter().copied()), v.len() as f64)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let n = finite_or_zero(n);
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for counts in console messages (e.g., `1,284 records loaded`).
    n.to_formatted_string(&Locale::en)
}
