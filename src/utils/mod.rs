//! Utility functions for numeric input and display
//!
//! Input fields reach the engine as numbers. Whatever the user typed is
//! coerced here, and figures are rounded for display only at this layer.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::PropcalcError;

/// `pct` percent of `value`, with `pct` as a whole-number percentage.
///
/// Saturates at the `Decimal` range instead of overflowing.
///
/// # Examples
/// ```
/// use propcalc::utils::percent_of;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(percent_of(dec!(300000), dec!(4)), dec!(12000));
/// assert_eq!(percent_of(Decimal::MAX, dec!(200)), Decimal::MAX);
/// ```
pub fn percent_of(value: Decimal, pct: Decimal) -> Decimal {
    (value / Decimal::ONE_HUNDRED).saturating_mul(pct)
}

/// `numerator / denominator`, saturating when the quotient is too large.
///
/// Callers guard against a zero denominator; a zero here yields zero.
pub fn saturating_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or_else(|| {
        if numerator.is_sign_negative() == denominator.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

/// Sum that saturates at the `Decimal` range
pub fn saturating_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |total, value| total.saturating_add(value))
}

/// The longest leading number in canonical form: optional minus sign, digits
/// with an optional fraction, then an exponent only when it carries digits.
/// `None` when the input does not start with a number.
fn numeric_prefix(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut pos = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_end = digits_from(pos);
    let int_part = &input[pos..int_end];
    let mut frac_part = "";
    let mut end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        end = digits_from(int_end + 1);
        frac_part = &input[int_end + 1..end];
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut canonical = String::new();
    if negative {
        canonical.push('-');
    }
    canonical.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        canonical.push('.');
        canonical.push_str(frac_part);
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        let exp_negative = bytes.get(exp_start) == Some(&b'-');
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            canonical.push('e');
            if exp_negative {
                canonical.push('-');
            }
            canonical.push_str(&input[exp_start..exp_end]);
        }
    }

    Some(canonical)
}

/// Lenient numeric coercion for user input.
///
/// Reads the longest leading number (exponent included) and ignores anything
/// after it. Input with no leading number becomes zero. A number that does
/// not fit in a `Decimal` is a [`PropcalcError::Validation`].
///
/// # Examples
/// ```
/// use propcalc::utils::coerce_decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(coerce_decimal("3.5").unwrap(), dec!(3.5));
/// assert_eq!(coerce_decimal("400eur").unwrap(), dec!(400));
/// assert_eq!(coerce_decimal("1e3abc").unwrap(), dec!(1000));
/// assert_eq!(coerce_decimal("abc").unwrap(), dec!(0));
/// assert!(coerce_decimal("1e100").is_err());
/// ```
pub fn coerce_decimal(input: &str) -> Result<Decimal, PropcalcError> {
    let trimmed = input.trim();
    let Some(number) = numeric_prefix(trimmed) else {
        return Ok(Decimal::ZERO);
    };

    let parsed = if number.contains('e') {
        Decimal::from_scientific(&number)
    } else {
        Decimal::from_str(&number)
    };

    parsed.map_err(|_| {
        PropcalcError::Validation(format!(
            "'{}' is outside the supported numeric range",
            trimmed
        ))
    })
}

/// Amount rounded to cents: "1234.56"
///
/// # Examples
/// ```
/// use propcalc::utils::format_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(833.333333)), "833.33");
/// assert_eq!(format_amount(dec!(-500)), "-500.00");
/// ```
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_cents(value))
}

/// Amount right-aligned to a minimum width.
pub fn format_amount_aligned(value: Decimal, width: usize) -> String {
    format!("{:>width$}", format_amount(value), width = width)
}

/// A fraction shown as a percentage: 0.0523 -> "5.23%"
///
/// # Examples
/// ```
/// use propcalc::utils::format_percent;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_percent(dec!(0.0523)), "5.23%");
/// ```
pub fn format_percent(fraction: Decimal) -> String {
    format!("{:.2}%", round_cents(fraction.saturating_mul(Decimal::ONE_HUNDRED)))
}

/// Half-up rounding to two places; `round_dp` alone rounds half to even.
fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
