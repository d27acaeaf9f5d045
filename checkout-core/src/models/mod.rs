mod form;
mod record;
mod weekday;

pub use form::{FormSnapshot, RawForm, TAG_SEPARATOR};
pub use record::{COLUMN_COUNT, COLUMNS, Cell, SubmissionRecord};
pub use weekday::{DATE_FORMAT, WEEKDAY_LABELS, weekday_label};
