use chrono::{Datelike, NaiveDate};

/// Date format used by the checkout sheet (`2024-05-01`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Weekday labels as written in the sheet, indexed from Sunday.
pub const WEEKDAY_LABELS: [&str; 7] = [
    "星期日", "星期一", "星期二", "星期三", "星期四", "星期五", "星期六",
];

/// Returns the sheet's weekday label for a `YYYY-MM-DD` date.
///
/// Returns `None` when the date cannot be parsed.
pub fn weekday_label(date: &str) -> Option<&'static str> {
    let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()?;
    Some(WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize])
}
