//! Login, review and submission of a closing-shift checkout.
//!
//! The flow runs `idle → validating → confirming → submitting → idle`:
//!
//! 1. [`login`] verifies the staff code and fills the [`Session`].
//! 2. [`review`] captures the form, validates it and returns a
//!    [`PendingCheckout`] whose [`CheckoutSummary`] is shown for confirmation.
//! 3. [`submit`] consumes the confirmed [`PendingCheckout`], so nothing
//!    reaches the network without a review first.
//!
//! Every failure is recoverable: the form keeps its contents unless the row
//! was accepted.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::format::format_currency;
use crate::models::{FormSnapshot, RawForm, SubmissionRecord};
use crate::remote::api::{submit_checkout, verify_user};
use crate::remote::{RemoteError, RemoteService};
use crate::session::Session;
use crate::validation::{ValidationError, validate};

/// Shown whenever the web app could not be reached.
pub const CONNECTION_ERROR: &str = "Connection error, please try again later";

/// Shown after a row is accepted.
pub const SUBMITTED: &str = "Checkout submitted!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Error,
}

/// A transient notification for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageType,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageType::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageType::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ─── login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("please enter the last four digits of your ID")]
    MissingCode,

    #[error("please enter exactly 4 digits")]
    InvalidCode,

    #[error("{}", .0.as_deref().unwrap_or("verification failed"))]
    Rejected(Option<String>),

    #[error("verification succeeded but no user name was returned")]
    MissingUserName,

    #[error("{}", CONNECTION_ERROR)]
    Connection(#[source] RemoteError),
}

/// Verify a 4-digit staff code and sign the session in.
///
/// Returns the display name now stored in the session.
///
/// # Errors
/// * [`LoginError::MissingCode`] / [`LoginError::InvalidCode`]: checked
///   locally, no call is made.
/// * [`LoginError::Rejected`]: the directory did not recognise the code.
/// * [`LoginError::MissingUserName`]: success without a `userName`.
/// * [`LoginError::Connection`]: timeout or transport failure.
pub async fn login(
    session: &mut Session,
    service: &dyn RemoteService,
    code: &str,
) -> Result<String, LoginError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(LoginError::MissingCode);
    }
    if code.len() != 4 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LoginError::InvalidCode);
    }

    let response = verify_user(service, code).await.map_err(|e| match e {
        RemoteError::Rejected(message) => LoginError::Rejected(message),
        other => {
            warn!(error = %other, "login request failed");
            LoginError::Connection(other)
        }
    })?;

    let user_name = response
        .user_name()
        .ok_or(LoginError::MissingUserName)?
        .to_string();

    session.sign_in(user_name.as_str(), code);
    info!(user = %user_name, "staff member logged in");
    Ok(user_name)
}

// ─── review ──────────────────────────────────────────────────────────────────

/// The human-readable summary shown before a submission is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub date: String,
    pub weekday: String,
    pub staff: String,
    pub total_revenue: Decimal,
    pub total_customers: Decimal,
    pub average_price: Decimal,
    pub cash_amount: Decimal,
    pub card_amount: Decimal,
    pub remarks: Option<String>,
}

impl fmt::Display for CheckoutSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Date:           {} ({})", self.date, self.weekday)?;
        writeln!(f, "Staff:          {}", self.staff)?;
        writeln!(f, "Revenue:        {}", format_currency(self.total_revenue))?;
        writeln!(f, "Customers:      {}", self.total_customers.normalize())?;
        writeln!(f, "Average price:  {}", format_currency(self.average_price))?;
        writeln!(
            f,
            "Cash / card:    {} / {}",
            format_currency(self.cash_amount),
            format_currency(self.card_amount)
        )?;
        if let Some(remarks) = &self.remarks {
            writeln!(f, "Remarks:        {remarks}")?;
        }
        Ok(())
    }
}

/// A validated snapshot waiting for the user's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheckout {
    snapshot: FormSnapshot,
    staff: String,
}

impl PendingCheckout {
    pub fn snapshot(&self) -> &FormSnapshot {
        &self.snapshot
    }

    pub fn staff(&self) -> &str {
        &self.staff
    }

    pub fn summary(&self) -> CheckoutSummary {
        let s = &self.snapshot;
        CheckoutSummary {
            date: s.date.clone(),
            weekday: s.weekday.clone(),
            staff: self.staff.clone(),
            total_revenue: s.total_revenue,
            total_customers: s.total_customers,
            average_price: s.metrics.average_price,
            cash_amount: s.cash_amount,
            card_amount: s.card_amount,
            remarks: Some(s.remarks.clone()).filter(|r| !r.is_empty()),
        }
    }
}

/// Capture and validate the form for confirmation.
///
/// # Errors
/// The first [`ValidationError`] found; nothing is sent.
pub fn review(
    session: &Session,
    form: &RawForm,
) -> Result<PendingCheckout, ValidationError> {
    let snapshot = FormSnapshot::capture(form, session.current_user());
    validate(&snapshot).inspect_err(|e| debug!(error = %e, "checkout failed validation"))?;

    let staff = snapshot.staff.clone().ok_or(ValidationError::NotAuthenticated)?;
    Ok(PendingCheckout { snapshot, staff })
}

// ─── submit ──────────────────────────────────────────────────────────────────

/// What happened to a submit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission was already in flight; nothing was sent.
    Ignored,

    /// The row was accepted and the form reset.
    Submitted(StatusMessage),

    /// The row was not accepted; the form is unchanged.
    Failed {
        message: StatusMessage,
        error: RemoteError,
    },
}

impl SubmitOutcome {
    /// The notification to show, if any.
    pub fn message(&self) -> Option<&StatusMessage> {
        match self {
            SubmitOutcome::Ignored => None,
            SubmitOutcome::Submitted(message) => Some(message),
            SubmitOutcome::Failed { message, .. } => Some(message),
        }
    }
}

/// Send a confirmed checkout.
///
/// While another submission holds the session's in-flight guard this is a
/// silent no-op. The guard is released on every path. On success the form is
/// reset, keeping its date; the session keeps the staff identity.
pub async fn submit(
    service: &dyn RemoteService,
    session: &Session,
    form: &mut RawForm,
    pending: PendingCheckout,
) -> SubmitOutcome {
    let Some(_guard) = session.begin_submission() else {
        debug!("submission already in flight; ignoring request");
        return SubmitOutcome::Ignored;
    };

    let record = SubmissionRecord::from_snapshot(&pending.snapshot);
    match submit_checkout(service, &record, &pending.staff).await {
        Ok(_) => {
            form.reset();
            info!(date = %pending.snapshot.date, staff = %pending.staff, "checkout submitted");
            SubmitOutcome::Submitted(StatusMessage::success(SUBMITTED))
        }
        Err(error) => {
            let text = match &error {
                RemoteError::Rejected(message) => format!(
                    "Submission failed: {}",
                    message.as_deref().unwrap_or("unknown error")
                ),
                _ => CONNECTION_ERROR.to_string(),
            };
            warn!(error = %error, "checkout submission failed");
            SubmitOutcome::Failed {
                message: StatusMessage::error(text),
                error,
            }
        }
    }
}
