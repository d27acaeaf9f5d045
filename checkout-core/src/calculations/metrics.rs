//! Derived metrics for the closing-shift sheet.
//!
//! Four values on the sheet are never typed in; they are computed from the
//! entered figures every time the form is read:
//!
//! | Metric        | Formula                                   | Zero policy                    |
//! |---------------|-------------------------------------------|--------------------------------|
//! | Average price | round(total revenue / total customers)    | customers ≤ 0 → 0              |
//! | Food ratio    | food revenue / (food + set revenue)       | food + set ≤ 0 → 0             |
//! | Set ratio     | set revenue / (food + set revenue)        | food + set ≤ 0 → 0             |
//! | Return rate   | return groups / reservation groups        | reservation groups ≤ 0 → 0     |
//!
//! Ratios are fractions. Display code turns them into percentages through
//! [`crate::format::format_percent`]; the submission record sends the
//! fractions unchanged.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use checkout_core::calculations::{DerivedMetrics, MetricInputs};
//!
//! let metrics = DerivedMetrics::calculate(&MetricInputs {
//!     total_revenue: dec!(10000),
//!     total_customers: dec!(40),
//!     food_revenue: dec!(700),
//!     set_revenue: dec!(300),
//!     return_groups: dec!(5),
//!     reservation_groups: dec!(20),
//! });
//!
//! assert_eq!(metrics.average_price, dec!(250));
//! assert_eq!(metrics.food_ratio, dec!(0.7));
//! assert_eq!(metrics.set_ratio, dec!(0.3));
//! assert_eq!(metrics.return_rate, dec!(0.25));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{ratio, round_whole};

/// The entered figures the derived metrics depend on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricInputs {
    pub total_revenue: Decimal,
    pub total_customers: Decimal,
    pub food_revenue: Decimal,
    pub set_revenue: Decimal,
    pub return_groups: Decimal,
    pub reservation_groups: Decimal,
}

/// Computed values shown in the live summary and sent with the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Revenue per customer, rounded half-up to a whole amount.
    pub average_price: Decimal,

    /// Share of item revenue coming from à la carte food, in `[0, 1]`.
    pub food_ratio: Decimal,

    /// Share of item revenue coming from set meals, in `[0, 1]`.
    pub set_ratio: Decimal,

    /// Returning groups per reservation group.
    pub return_rate: Decimal,
}

impl DerivedMetrics {
    /// Computes every derived metric from the entered figures.
    pub fn calculate(inputs: &MetricInputs) -> Self {
        Self {
            average_price: average_price(inputs.total_revenue, inputs.total_customers),
            food_ratio: food_ratio(inputs.food_revenue, inputs.set_revenue),
            set_ratio: set_ratio(inputs.food_revenue, inputs.set_revenue),
            return_rate: return_rate(inputs.return_groups, inputs.reservation_groups),
        }
    }
}

/// Average spend per customer.
pub fn average_price(
    total_revenue: Decimal,
    total_customers: Decimal,
) -> Decimal {
    round_whole(ratio(total_revenue, total_customers))
}

/// Food share of the combined food and set revenue.
pub fn food_ratio(
    food_revenue: Decimal,
    set_revenue: Decimal,
) -> Decimal {
    ratio(food_revenue, item_revenue(food_revenue, set_revenue))
}

/// Set-meal share of the combined food and set revenue.
pub fn set_ratio(
    food_revenue: Decimal,
    set_revenue: Decimal,
) -> Decimal {
    ratio(set_revenue, item_revenue(food_revenue, set_revenue))
}

/// Returning groups relative to reservation groups.
pub fn return_rate(
    return_groups: Decimal,
    reservation_groups: Decimal,
) -> Decimal {
    ratio(return_groups, reservation_groups)
}

// Saturates instead of panicking on absurd inputs.
fn item_revenue(
    food_revenue: Decimal,
    set_revenue: Decimal,
) -> Decimal {
    food_revenue.saturating_add(set_revenue)
}
