//! Session state for one running checkout terminal.
//!
//! The session holds who is logged in and whether a submission is currently
//! in flight. It lives as long as the process and is never persisted.

use std::sync::atomic::{AtomicBool, Ordering};

/// Login identity plus the in-flight submission flag.
#[derive(Debug, Default)]
pub struct Session {
    current_user: Option<String>,
    last_four: Option<String>,
    submitting: AtomicBool,
}

impl Session {
    /// Create a logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name of the logged-in staff member, if any.
    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    /// The code the current user logged in with.
    pub fn last_four(&self) -> Option<&str> {
        self.last_four.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// Record a successful login.
    pub fn sign_in(
        &mut self,
        user_name: impl Into<String>,
        last_four: impl Into<String>,
    ) {
        self.current_user = Some(user_name.into());
        self.last_four = Some(last_four.into());
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Claim the submission slot.
    ///
    /// Returns `None` while another submission holds it. The slot is released
    /// when the returned guard is dropped, whatever the outcome.
    pub fn begin_submission(&self) -> Option<SubmissionGuard<'_>> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionGuard { flag: &self.submitting })
    }
}

/// Holds the in-flight flag for the duration of one submission.
#[derive(Debug)]
pub struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
