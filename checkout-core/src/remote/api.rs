//! Typed wrappers over the two functions the checkout web app exposes.

use serde_json::Value;
use tracing::{debug, info};

use super::service::{RemoteError, RemoteParams, RemoteResponse, RemoteService};
use crate::models::SubmissionRecord;

/// Looks up a staff member by the last four digits of their ID.
pub const VERIFY_USER: &str = "verifyUser";

/// Appends one row to the checkout sheet.
pub const SUBMIT_CHECKOUT: &str = "submitCheckout";

/// Call `verifyUser(lastFour)`.
///
/// # Errors
/// * [`RemoteError::Rejected`]: the web app answered with any status other
///   than `"success"`.
/// * Timeout and transport errors from the service.
pub async fn verify_user(
    service: &dyn RemoteService,
    last_four: &str,
) -> Result<RemoteResponse, RemoteError> {
    let mut params = RemoteParams::new();
    params.insert("lastFour".to_string(), Value::from(last_four));

    debug!(function = VERIFY_USER, "calling remote function");
    accepted(service.invoke(VERIFY_USER, &params).await?)
}

/// Call `submitCheckout(rowData, staffName)`.
///
/// # Errors
/// * [`RemoteError::Rejected`]: the web app answered with any status other
///   than `"success"`.
/// * Timeout and transport errors from the service.
pub async fn submit_checkout(
    service: &dyn RemoteService,
    record: &SubmissionRecord,
    staff_name: &str,
) -> Result<RemoteResponse, RemoteError> {
    let row_data = serde_json::to_value(record)
        .map_err(|e| RemoteError::Transport(format!("cannot encode row: {e}")))?;

    let mut params = RemoteParams::new();
    params.insert("rowData".to_string(), row_data);
    params.insert("staffName".to_string(), Value::from(staff_name));

    debug!(function = SUBMIT_CHECKOUT, staff = staff_name, "calling remote function");
    let response = accepted(service.invoke(SUBMIT_CHECKOUT, &params).await?)?;
    info!(staff = staff_name, "checkout row accepted");
    Ok(response)
}

fn accepted(response: RemoteResponse) -> Result<RemoteResponse, RemoteError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(RemoteError::Rejected(response.message))
    }
}
