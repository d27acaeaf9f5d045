use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Serialize, Serializer};

use crate::models::FormSnapshot;

/// Number of columns in the checkout sheet.
pub const COLUMN_COUNT: usize = 33;

/// Sheet column names, in the positional order of a [`SubmissionRecord`].
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "remarks",
    "date",
    "weekday",
    "reservationCount",
    "totalRevenue",
    "totalCustomers",
    "avgPrice",
    "cashAmount",
    "cardAmount",
    "foodRevenue",
    "foodRatio",
    "setRevenue",
    "setRatio",
    "reservationGroups",
    "setGroups",
    "lunchCustomers",
    "afternoonCustomers",
    "dinnerCustomers",
    "ageUnder35",
    "age35to50",
    "ageOver50",
    "vegGroups",
    "localGroups",
    "meatGroups",
    "mediaGroups",
    "returnGroups",
    "returnRate",
    "socialGroups",
    "walkinGroups",
    "outtownGroups",
    "cardSigned",
    "cardUsed",
    "staff",
];

/// One value in the sheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(Decimal),
    /// Sent as an empty string so the sheet cell stays blank.
    Empty,
}

impl Cell {
    /// A number, or [`Cell::Empty`] when it is zero.
    pub fn number_or_empty(value: Decimal) -> Self {
        if value.is_zero() {
            Self::Empty
        } else {
            Self::Number(value)
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

/// Whole numbers go out as JSON integers, everything else as floats.
impl Serialize for Cell {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Cell::Text(text) => serializer.serialize_str(text),
            Cell::Empty => serializer.serialize_str(""),
            Cell::Number(value) => {
                let value = value.normalize();
                match (value.fract().is_zero(), value.to_i64()) {
                    (true, Some(whole)) => serializer.serialize_i64(whole),
                    _ => serializer.serialize_f64(value.to_f64().unwrap_or_default()),
                }
            }
        }
    }
}

/// The positional row sent to the sheet. Write-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmissionRecord {
    cells: Vec<Cell>,
}

impl SubmissionRecord {
    /// Project a snapshot onto the sheet's column order.
    pub fn from_snapshot(snapshot: &FormSnapshot) -> Self {
        let metrics = &snapshot.metrics;
        let cells = vec![
            Cell::from(snapshot.remarks.as_str()),
            Cell::from(snapshot.date.as_str()),
            Cell::from(snapshot.weekday.as_str()),
            Cell::number_or_empty(snapshot.reservation_count),
            Cell::from(snapshot.total_revenue),
            Cell::from(snapshot.total_customers),
            Cell::from(metrics.average_price),
            Cell::number_or_empty(snapshot.cash_amount),
            Cell::number_or_empty(snapshot.card_amount),
            Cell::from(snapshot.food_revenue),
            Cell::from(metrics.food_ratio),
            Cell::from(snapshot.set_revenue),
            Cell::from(metrics.set_ratio),
            Cell::from(snapshot.reservation_groups),
            Cell::from(snapshot.set_groups),
            Cell::from(snapshot.lunch_customers),
            Cell::from(snapshot.afternoon_customers),
            Cell::from(snapshot.dinner_customers),
            Cell::from(snapshot.age_under35),
            Cell::from(snapshot.age35to50),
            Cell::from(snapshot.age_over50),
            Cell::from(snapshot.veg_groups),
            Cell::from(snapshot.local_groups),
            Cell::from(snapshot.meat_groups),
            Cell::from(snapshot.media_groups),
            Cell::from(snapshot.return_groups),
            Cell::from(metrics.return_rate),
            Cell::from(snapshot.social_groups),
            Cell::from(snapshot.walkin_groups),
            Cell::from(snapshot.outtown_groups),
            Cell::from(snapshot.card_signed),
            Cell::from(snapshot.card_used),
            Cell::from(snapshot.staff.as_deref().unwrap_or_default()),
        ];
        debug_assert_eq!(cells.len(), COLUMN_COUNT);

        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell under a named column, if the name is a sheet column.
    pub fn get(
        &self,
        column: &str,
    ) -> Option<&Cell> {
        COLUMNS
            .iter()
            .position(|c| *c == column)
            .and_then(|idx| self.cells.get(idx))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::models::RawForm;

    fn snapshot() -> FormSnapshot {
        let form = RawForm {
            date: "2024-05-01".to_string(),
            remarks: "holiday".to_string(),
            reservation_groups: "20".to_string(),
            total_revenue: "10000".to_string(),
            total_customers: "40".to_string(),
            card_amount: "6500".to_string(),
            food_revenue: "700".to_string(),
            set_revenue: "300".to_string(),
            lunch_customers: "12".to_string(),
            return_groups: "5".to_string(),
            card_used: "2".to_string(),
            ..Default::default()
        };
        FormSnapshot::capture(&form, Some("Alice"))
    }

    #[test]
    fn record_has_one_cell_per_column() {
        let record = SubmissionRecord::from_snapshot(&snapshot());

        assert_eq!(record.len(), COLUMN_COUNT);
        assert_eq!(record.cells().len(), COLUMNS.len());
    }

    #[test]
    fn record_follows_sheet_column_order() {
        let record = SubmissionRecord::from_snapshot(&snapshot());

        assert_eq!(record.cells()[0], Cell::from("holiday"));
        assert_eq!(record.cells()[1], Cell::from("2024-05-01"));
        assert_eq!(record.cells()[2], Cell::from("星期三"));
        assert_eq!(record.get("avgPrice"), Some(&Cell::Number(dec!(250))));
        assert_eq!(record.get("foodRatio"), Some(&Cell::Number(dec!(0.7))));
        assert_eq!(record.get("returnRate"), Some(&Cell::Number(dec!(0.25))));
        assert_eq!(record.get("lunchCustomers"), Some(&Cell::Number(dec!(12))));
        assert_eq!(record.cells()[COLUMN_COUNT - 1], Cell::from("Alice"));
    }

    #[test]
    fn record_blanks_zero_optional_amounts() {
        let record = SubmissionRecord::from_snapshot(&snapshot());

        assert_eq!(record.get("reservationCount"), Some(&Cell::Empty));
        assert_eq!(record.get("cashAmount"), Some(&Cell::Empty));
        assert_eq!(record.get("cardAmount"), Some(&Cell::Number(dec!(6500))));
    }

    #[test]
    fn record_keeps_zero_for_other_counts() {
        let record = SubmissionRecord::from_snapshot(&snapshot());

        assert_eq!(record.get("dinnerCustomers"), Some(&Cell::Number(dec!(0))));
    }

    #[test]
    fn get_unknown_column_is_none() {
        let record = SubmissionRecord::from_snapshot(&snapshot());

        assert_eq!(record.get("tips"), None);
    }

    #[test]
    fn record_serializes_as_json_array() {
        let record = SubmissionRecord::from_snapshot(&snapshot());

        let value = serde_json::to_value(&record).unwrap();
        let cells = value.as_array().expect("array");

        assert_eq!(cells.len(), COLUMN_COUNT);
        assert_eq!(cells[3], json!(""));
        assert_eq!(cells[4], json!(10000));
        assert_eq!(cells[6], json!(250));
        assert_eq!(cells[10], json!(0.7));
        assert_eq!(cells[32], json!("Alice"));
    }

    #[test]
    fn whole_decimals_with_scale_serialize_as_integers() {
        let value = serde_json::to_value(Cell::Number(dec!(1500.00))).unwrap();

        assert_eq!(value, json!(1500));
    }
}
