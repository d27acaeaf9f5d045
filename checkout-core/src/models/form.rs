use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::parse_amount;
use crate::calculations::{DerivedMetrics, MetricInputs};
use crate::models::weekday::weekday_label;

/// Separator placed between quick tags in the remarks field.
pub const TAG_SEPARATOR: &str = "、";

static EDGE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[、\s]+|[、\s]+$").expect("static regex"));
static REPEATED_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[、\s]{2,}").expect("static regex"));

/// The checkout sheet exactly as typed: every field is text.
///
/// Numeric fields are coerced when a [`FormSnapshot`] is captured, never
/// here, so the raw form can always be shown back to the user unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawForm {
    pub date: String,
    pub remarks: String,

    // Reservations
    pub reservation_count: String,
    pub reservation_groups: String,

    // Revenue
    pub total_revenue: String,
    pub total_customers: String,
    pub cash_amount: String,
    pub card_amount: String,

    // Item mix
    pub food_revenue: String,
    pub set_revenue: String,
    pub set_groups: String,

    // Customers by time slot
    pub lunch_customers: String,
    pub afternoon_customers: String,
    pub dinner_customers: String,

    // Customers by age band
    pub age_under35: String,
    pub age35to50: String,
    pub age_over50: String,

    // Customer origin (groups)
    pub veg_groups: String,
    pub local_groups: String,
    pub meat_groups: String,
    pub media_groups: String,
    pub return_groups: String,
    pub social_groups: String,
    pub walkin_groups: String,
    pub outtown_groups: String,

    // Loyalty cards
    pub card_signed: String,
    pub card_used: String,
}

impl RawForm {
    /// Create an empty form dated `date`.
    pub fn dated(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }

    /// Clear every field except the date, ready for the next entry.
    pub fn reset(&mut self) {
        let date = std::mem::take(&mut self.date);
        *self = Self::dated(date);
    }

    /// Toggle a quick tag in the remarks.
    ///
    /// A tag already present is removed and leftover separators are tidied;
    /// otherwise the tag is appended after a [`TAG_SEPARATOR`].
    pub fn toggle_tag(
        &mut self,
        tag: &str,
    ) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }

        let current = self.remarks.trim();
        self.remarks = if current.is_empty() {
            tag.to_string()
        } else if current.contains(tag) {
            let removed = current.replacen(tag, "", 1);
            let trimmed = EDGE_SEPARATORS.replace_all(&removed, "");
            REPEATED_SEPARATORS
                .replace_all(&trimmed, TAG_SEPARATOR)
                .into_owned()
        } else {
            format!("{current}{TAG_SEPARATOR}{tag}")
        };
    }
}

/// A coerced, computed view of the form, rebuilt on every read.
///
/// Every numeric field is zero when its source text was blank or
/// unparsable. `staff` comes from the session, not from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub remarks: String,
    pub date: String,
    /// Empty when the date cannot be parsed.
    pub weekday: String,

    pub reservation_count: Decimal,
    pub reservation_groups: Decimal,

    pub total_revenue: Decimal,
    pub total_customers: Decimal,
    pub cash_amount: Decimal,
    pub card_amount: Decimal,

    pub food_revenue: Decimal,
    pub set_revenue: Decimal,
    pub set_groups: Decimal,

    pub lunch_customers: Decimal,
    pub afternoon_customers: Decimal,
    pub dinner_customers: Decimal,

    pub age_under35: Decimal,
    pub age35to50: Decimal,
    pub age_over50: Decimal,

    pub veg_groups: Decimal,
    pub local_groups: Decimal,
    pub meat_groups: Decimal,
    pub media_groups: Decimal,
    pub return_groups: Decimal,
    pub social_groups: Decimal,
    pub walkin_groups: Decimal,
    pub outtown_groups: Decimal,

    pub card_signed: Decimal,
    pub card_used: Decimal,

    pub metrics: DerivedMetrics,

    pub staff: Option<String>,
}

impl FormSnapshot {
    /// Read the raw form, coercing numbers and computing derived metrics.
    pub fn capture(
        form: &RawForm,
        staff: Option<&str>,
    ) -> Self {
        let mut snapshot = Self {
            remarks: form.remarks.trim().to_string(),
            date: form.date.trim().to_string(),
            weekday: weekday_label(&form.date).unwrap_or_default().to_string(),

            reservation_count: parse_amount(&form.reservation_count),
            reservation_groups: parse_amount(&form.reservation_groups),

            total_revenue: parse_amount(&form.total_revenue),
            total_customers: parse_amount(&form.total_customers),
            cash_amount: parse_amount(&form.cash_amount),
            card_amount: parse_amount(&form.card_amount),

            food_revenue: parse_amount(&form.food_revenue),
            set_revenue: parse_amount(&form.set_revenue),
            set_groups: parse_amount(&form.set_groups),

            lunch_customers: parse_amount(&form.lunch_customers),
            afternoon_customers: parse_amount(&form.afternoon_customers),
            dinner_customers: parse_amount(&form.dinner_customers),

            age_under35: parse_amount(&form.age_under35),
            age35to50: parse_amount(&form.age35to50),
            age_over50: parse_amount(&form.age_over50),

            veg_groups: parse_amount(&form.veg_groups),
            local_groups: parse_amount(&form.local_groups),
            meat_groups: parse_amount(&form.meat_groups),
            media_groups: parse_amount(&form.media_groups),
            return_groups: parse_amount(&form.return_groups),
            social_groups: parse_amount(&form.social_groups),
            walkin_groups: parse_amount(&form.walkin_groups),
            outtown_groups: parse_amount(&form.outtown_groups),

            card_signed: parse_amount(&form.card_signed),
            card_used: parse_amount(&form.card_used),

            metrics: DerivedMetrics::default(),

            staff: staff
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };
        snapshot.metrics = DerivedMetrics::calculate(&snapshot.metric_inputs());
        snapshot
    }

    /// The entered figures the derived metrics are computed from.
    pub fn metric_inputs(&self) -> MetricInputs {
        MetricInputs {
            total_revenue: self.total_revenue,
            total_customers: self.total_customers,
            food_revenue: self.food_revenue,
            set_revenue: self.set_revenue,
            return_groups: self.return_groups,
            reservation_groups: self.reservation_groups,
        }
    }
}
