use std::io::{BufRead, Write};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use checkout_core::checkout::{login, review, submit};
use checkout_core::format::MetricsPanel;
use checkout_core::models::DATE_FORMAT;
use checkout_core::{FormSnapshot, RawForm, RemoteService, Session, StatusMessage, SubmitOutcome};
use tracing::info;

use crate::prompt::Prompter;

const CODE_PROMPT: &str = "Last 4 digits of your ID: ";

/// How an interactive submission ended without an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRun {
    Submitted(StatusMessage),
    Cancelled,
}

/// Apply command-line adjustments to a loaded form.
///
/// `date` always wins; otherwise a blank date becomes `today`. Each tag is
/// toggled in the remarks in the order given.
pub fn prepare_form(
    mut form: RawForm,
    date: Option<&str>,
    today: NaiveDate,
    tags: &[String],
) -> RawForm {
    match date {
        Some(date) => form.date = date.trim().to_string(),
        None if form.date.trim().is_empty() => {
            form.date = today.format(DATE_FORMAT).to_string();
        }
        None => {}
    }
    for tag in tags {
        form.toggle_tag(tag);
    }
    form
}

/// The date line plus the live metrics panel.
pub fn render_summary(form: &RawForm) -> String {
    let snapshot = FormSnapshot::capture(form, None);
    let weekday = if snapshot.weekday.is_empty() {
        "?"
    } else {
        snapshot.weekday.as_str()
    };
    format!("{} ({weekday})\n{}", snapshot.date, MetricsPanel(&snapshot.metrics))
}

/// Ask for a staff code until one is accepted.
///
/// # Errors
/// End of input before a successful login, or a terminal I/O failure.
pub async fn log_in<R: BufRead, W: Write>(
    session: &mut Session,
    service: &dyn RemoteService,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<String> {
    loop {
        let Some(code) = prompter.ask(CODE_PROMPT)? else {
            bail!("login cancelled");
        };
        match login(session, service, &code).await {
            Ok(name) => {
                prompter.say(format!("Welcome, {name}"))?;
                return Ok(name);
            }
            Err(e) => prompter.say(format!("Login failed: {e}"))?,
        }
    }
}

/// The full interactive flow: summary, login, review, confirm, submit.
///
/// On success `form` is reset to a blank sheet for the same date. Every
/// other path leaves it untouched.
///
/// # Errors
/// Login cancelled, validation failure, rejected or failed submission, or
/// terminal I/O failure.
pub async fn run_submit<R: BufRead, W: Write>(
    service: &dyn RemoteService,
    form: &mut RawForm,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<SubmitRun> {
    prompter.say(render_summary(form))?;

    let mut session = Session::new();
    log_in(&mut session, service, prompter).await?;

    let pending = review(&session, form).context("checkout is incomplete")?;
    prompter.say(pending.summary())?;

    if !prompter.confirm("Submit this checkout?")? {
        prompter.say("Submission cancelled.")?;
        info!("submission cancelled at confirmation");
        return Ok(SubmitRun::Cancelled);
    }

    match submit(service, &session, form, pending).await {
        SubmitOutcome::Submitted(message) => {
            prompter.say(&message)?;
            Ok(SubmitRun::Submitted(message))
        }
        SubmitOutcome::Failed { message, error } => Err(anyhow::Error::new(error).context(message.text)),
        SubmitOutcome::Ignored => bail!("a submission is already in progress"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use checkout_core::remote::api::VERIFY_USER;
    use checkout_core::remote::{RemoteError, RemoteParams, RemoteResponse};
    use checkout_remote::SimulatedService;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn simulated() -> SimulatedService {
        SimulatedService::new(Duration::ZERO)
    }

    fn complete_form() -> RawForm {
        RawForm {
            total_revenue: "10,000".to_string(),
            total_customers: "40".to_string(),
            food_revenue: "700".to_string(),
            set_revenue: "300".to_string(),
            return_groups: "5".to_string(),
            reservation_groups: "20".to_string(),
            ..RawForm::dated("2024-05-01")
        }
    }

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    fn output(p: Prompter<&[u8], Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    /// Logs everyone in as Alice and rejects every submission.
    struct RejectingSheet;

    #[async_trait]
    impl RemoteService for RejectingSheet {
        async fn invoke(
            &self,
            function: &str,
            _params: &RemoteParams,
        ) -> Result<RemoteResponse, RemoteError> {
            if function == VERIFY_USER {
                Ok(RemoteResponse::success(None).with_extra("userName", json!("Alice")))
            } else {
                Ok(RemoteResponse::error(Some("sheet locked")))
            }
        }
    }

    // =========================================================================
    // prepare_form / render_summary
    // =========================================================================

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()
    }

    #[test]
    fn blank_date_becomes_today() {
        let form = prepare_form(RawForm::default(), None, today(), &[]);

        assert_eq!(form.date, "2024-05-03");
    }

    #[test]
    fn sheet_date_is_kept_without_override() {
        let form = prepare_form(RawForm::dated("2024-05-01"), None, today(), &[]);

        assert_eq!(form.date, "2024-05-01");
    }

    #[test]
    fn date_override_wins() {
        let form = prepare_form(RawForm::dated("2024-05-01"), Some("2024-05-02"), today(), &[]);

        assert_eq!(form.date, "2024-05-02");
    }

    #[test]
    fn tags_are_toggled_in_order() {
        let form = RawForm {
            remarks: "rainy".to_string(),
            ..RawForm::dated("2024-05-01")
        };
        let tags = vec!["busy".to_string(), "rainy".to_string()];

        let form = prepare_form(form, None, today(), &tags);

        assert_eq!(form.remarks, "busy");
    }

    #[test]
    fn summary_shows_weekday_and_metrics() {
        let text = render_summary(&complete_form());

        assert!(text.starts_with("2024-05-01 (星期三)\n"), "{text}");
        assert!(text.contains("Average price:  $250"));
        assert!(text.contains("Food ratio:     70.0%"));
        assert!(text.contains("Return rate:    25.0%"));
    }

    #[test]
    fn summary_handles_enormous_return_groups() {
        let form = RawForm {
            return_groups: "1000000000000000000000000000".to_string(),
            reservation_groups: "1".to_string(),
            ..RawForm::dated("2024-05-01")
        };

        let text = render_summary(&form);

        assert!(text.contains("Return rate:    79228162514264337593543950335"), "{text}");
    }

    #[test]
    fn summary_marks_unparsable_date() {
        assert!(render_summary(&RawForm::dated("someday")).starts_with("someday (?)"));
    }

    // =========================================================================
    // run_submit
    // =========================================================================

    #[tokio::test]
    async fn retries_bad_code_then_submits_and_resets_form() {
        let mut form = complete_form();
        let mut p = prompter("12\n1234\ny\n");

        let run = run_submit(&simulated(), &mut form, &mut p).await.unwrap();

        assert_eq!(run, SubmitRun::Submitted(StatusMessage::success("Checkout submitted!")));
        assert_eq!(form, RawForm::dated("2024-05-01"));

        let out = output(p);
        assert!(out.contains("Login failed: please enter exactly 4 digits"));
        assert!(out.contains("Welcome, Test User"));
        assert!(out.contains("Staff:          Test User"));
        assert!(out.contains("Checkout submitted!"));
    }

    #[tokio::test]
    async fn declining_keeps_form() {
        let mut form = complete_form();
        let mut p = prompter("1234\nn\n");

        let run = run_submit(&simulated(), &mut form, &mut p).await.unwrap();

        assert_eq!(run, SubmitRun::Cancelled);
        assert_eq!(form, complete_form());
        assert!(output(p).contains("Submission cancelled."));
    }

    #[tokio::test]
    async fn incomplete_form_is_not_sent() {
        let mut form = RawForm::dated("2024-05-01");
        let mut p = prompter("1234\ny\n");

        let err = run_submit(&simulated(), &mut form, &mut p).await.unwrap_err();

        assert_eq!(err.to_string(), "checkout is incomplete");
        assert_eq!(
            err.root_cause().to_string(),
            "please enter the total revenue"
        );
        assert!(!output(p).contains("Submit this checkout?"));
    }

    #[tokio::test]
    async fn end_of_input_cancels_login() {
        let mut form = complete_form();
        let mut p = prompter("");

        let err = run_submit(&simulated(), &mut form, &mut p).await.unwrap_err();

        assert_eq!(err.to_string(), "login cancelled");
    }

    #[tokio::test]
    async fn rejected_submission_keeps_form() {
        let mut form = complete_form();
        let mut p = prompter("1234\nyes\n");

        let err = run_submit(&RejectingSheet, &mut form, &mut p).await.unwrap_err();

        assert_eq!(err.to_string(), "Submission failed: sheet locked");
        assert_eq!(form, complete_form());
    }
}
