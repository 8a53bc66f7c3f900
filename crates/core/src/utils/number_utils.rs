//! Normalization of raw numeric input before it reaches the calculators.
//!
//! Form fields hand us floats or strings that may be empty, `NaN` or
//! infinite. All of those collapse to zero here so the calculators only ever
//! see finite decimals.

use std::str::FromStr;

use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Converts a float coming from the UI into a `Decimal`.
///
/// `NaN` and infinities become zero.
pub fn decimal_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Parses user-entered text as a decimal, falling back to zero.
///
/// Accepts surrounding whitespace, thousands separators (`1,250.50`) and
/// scientific notation (`1e3`).
pub fn parse_decimal_or_zero(input: &str) -> Decimal {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .unwrap_or(Decimal::ZERO)
}

/// `part / whole * 100`, or zero when `whole` is zero.
///
/// Saturates at the `Decimal` bounds when the ratio does not fit.
pub fn ratio_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    match part.checked_div(whole).and_then(|r| r.checked_mul(dec!(100))) {
        Some(percent) => percent,
        None if part.is_sign_negative() != whole.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Sums an iterator of decimals.
pub fn sum_decimals<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}
