//! CSV loader for closing-shift sheets.
//!
//! ## CSV Format
//!
//! One header row naming form fields, then one row per shift. Column order
//! does **not** matter and missing columns are read as empty. Values are
//! kept as typed; numeric coercion happens when the form is captured, so
//! `"12,500"` and blank cells are fine.
//!
//! | Column                | Notes                                 |
//! |-----------------------|---------------------------------------|
//! | `date`                | `YYYY-MM-DD`; blank means today       |
//! | `remarks`             | free text, quick tags separated by `、` |
//! | `reservation_count`   |                                       |
//! | `reservation_groups`  |                                       |
//! | `total_revenue`       | required to submit                    |
//! | `total_customers`     | required to submit                    |
//! | `cash_amount`         |                                       |
//! | `card_amount`         |                                       |
//! | `food_revenue`        |                                       |
//! | `set_revenue`         |                                       |
//! | `set_groups`          |                                       |
//! | `lunch_customers`, `afternoon_customers`, `dinner_customers` | |
//! | `age_under35`, `age35to50`, `age_over50` |                    |
//! | `veg_groups`, `local_groups`, `meat_groups`, `media_groups` | |
//! | `return_groups`, `social_groups`, `walkin_groups`, `outtown_groups` | |
//! | `card_signed`, `card_used` |                                  |
//!
//! ### Example
//!
//! ```csv
//! date,total_revenue,total_customers,food_revenue,set_revenue,return_groups,reservation_groups
//! 2024-05-01,"10,000",40,700,300,5,20
//! ```

use std::path::{Path, PathBuf};

use checkout_core::RawForm;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FormLoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("the sheet has no data rows")]
    Empty,

    /// `row` is 1-based, as given on the command line.
    #[error("row {row} does not exist; the sheet has {rows} data row(s)")]
    RowOutOfRange { row: usize, rows: usize },
}

/// Parse CSV text into forms, in file order.
pub fn load_from_str(input: &str) -> Result<Vec<RawForm>, FormLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let forms = reader
        .deserialize::<RawForm>()
        .collect::<Result<Vec<_>, _>>()?;
    debug!(rows = forms.len(), "parsed checkout sheet");
    Ok(forms)
}

pub fn load_from_file(path: &Path) -> Result<Vec<RawForm>, FormLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FormLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

/// Pick one form: the 1-based `row`, or the last row when `None`.
pub fn select_row(
    mut forms: Vec<RawForm>,
    row: Option<usize>,
) -> Result<RawForm, FormLoadError> {
    let rows = forms.len();
    if rows == 0 {
        return Err(FormLoadError::Empty);
    }

    let index = match row {
        None => rows - 1,
        Some(row) if (1..=rows).contains(&row) => row - 1,
        Some(row) => return Err(FormLoadError::RowOutOfRange { row, rows }),
    };
    Ok(forms.swap_remove(index))
}
