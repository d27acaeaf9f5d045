//! Common utility functions for checkout calculations.
//!
//! This module provides the shared building blocks used by the derived
//! metrics: coercion of typed text into amounts, whole-number rounding and
//! zero-safe ratios.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// Normalizes input for amount parsing: trims whitespace and removes commas (thousands separator).
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses the text of a numeric form field into an amount.
///
/// Blank input, unparsable input and negative values all become zero. A
/// field that cannot be read is not an error for the checkout sheet; it
/// simply contributes nothing. Anything other than blank input is logged
/// when coerced so that typos stay visible.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use checkout_core::calculations::common::parse_amount;
///
/// assert_eq!(parse_amount("12,500"), dec!(12500));
/// assert_eq!(parse_amount(""), dec!(0));
/// assert_eq!(parse_amount("abc"), dec!(0));
/// assert_eq!(parse_amount("-3"), dec!(0));
/// ```
pub fn parse_amount(s: &str) -> Decimal {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    let parsed = normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized));

    match parsed {
        Ok(value) if value < Decimal::ZERO => {
            warn!(input = %s, "negative amount coerced to zero");
            Decimal::ZERO
        }
        Ok(value) => value,
        Err(e) => {
            warn!(input = %s, "unparsable amount coerced to zero: {}", e);
            Decimal::ZERO
        }
    }
}

/// Rounds a value to a whole number using half-up rounding.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use checkout_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(249.4)), dec!(249));
/// assert_eq!(round_whole(dec!(249.5)), dec!(250));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Divides `part` by `whole`, returning zero when `whole` is not positive.
///
/// The result is always finite: a non-positive denominator or an overflowing
/// quotient both yield zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use checkout_core::calculations::common::ratio;
///
/// assert_eq!(ratio(dec!(5), dec!(20)), dec!(0.25));
/// assert_eq!(ratio(dec!(5), dec!(0)), dec!(0));
/// ```
pub fn ratio(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole).unwrap_or(Decimal::ZERO)
}
