//! Display formatting for amounts and ratios.
//!
//! These are the display paths only; the submission record carries raw
//! numbers and fractions.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::calculations::DerivedMetrics;

/// Formats an amount as `$` plus thousands-grouped digits (`$10,000`).
///
/// Fractions are kept up to three places with trailing zeros dropped.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = format!("${sign}{}", group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Formats a fraction as a percentage with one decimal place (`0.7` → `70.0%`).
///
/// A ratio too large to scale by 100 saturates at [`Decimal::MAX`].
pub fn format_percent(ratio: Decimal) -> String {
    let percent = ratio
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::MAX)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.1}%")
}

/// The live calculation panel: average price and the three ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsPanel<'a>(pub &'a DerivedMetrics);

impl fmt::Display for MetricsPanel<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let m = self.0;
        writeln!(f, "Average price:  {}", format_currency(m.average_price))?;
        writeln!(f, "Food ratio:     {}", format_percent(m.food_ratio))?;
        writeln!(f, "Set ratio:      {}", format_percent(m.set_ratio))?;
        writeln!(f, "Return rate:    {}", format_percent(m.return_rate))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
