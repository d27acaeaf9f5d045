//! Presence and positivity checks run before the confirmation summary.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::FormSnapshot;

/// Reasons a snapshot cannot be submitted. Only the first failure is reported.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please choose the checkout date")]
    MissingDate,

    #[error("not logged in; please log in again")]
    NotAuthenticated,

    #[error("please enter the total revenue")]
    MissingRevenue,

    #[error("please enter the customer count")]
    MissingCustomers,
}

/// Check a snapshot in sheet order, stopping at the first failure.
///
/// # Errors
///
/// * [`ValidationError::MissingDate`]: the date is empty.
/// * [`ValidationError::NotAuthenticated`]: no staff identity.
/// * [`ValidationError::MissingRevenue`]: total revenue is not positive.
/// * [`ValidationError::MissingCustomers`]: total customers is not positive.
pub fn validate(snapshot: &FormSnapshot) -> Result<(), ValidationError> {
    if snapshot.date.trim().is_empty() {
        return Err(ValidationError::MissingDate);
    }

    if snapshot.staff.is_none() {
        return Err(ValidationError::NotAuthenticated);
    }

    if snapshot.total_revenue <= Decimal::ZERO {
        return Err(ValidationError::MissingRevenue);
    }

    if snapshot.total_customers <= Decimal::ZERO {
        return Err(ValidationError::MissingCustomers);
    }

    Ok(())
}
