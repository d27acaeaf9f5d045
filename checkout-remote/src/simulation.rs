use std::time::Duration;

use async_trait::async_trait;
use checkout_core::remote::api::{SUBMIT_CHECKOUT, VERIFY_USER};
use checkout_core::remote::{RemoteError, RemoteParams, RemoteResponse, RemoteService};
use serde_json::json;
use tracing::debug;

/// Delay before a simulated answer arrives.
pub const SIMULATED_DELAY: Duration = Duration::from_secs(1);

/// Name reported for every simulated login.
pub const SIMULATED_USER: &str = "Test User";

/// Answers every call locally after a fixed delay. Used while no web-app
/// endpoint has been configured.
#[derive(Debug, Clone)]
pub struct SimulatedService {
    delay: Duration,
}

impl SimulatedService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedService {
    fn default() -> Self {
        Self::new(SIMULATED_DELAY)
    }
}

#[async_trait]
impl RemoteService for SimulatedService {
    async fn invoke(
        &self,
        function: &str,
        params: &RemoteParams,
    ) -> Result<RemoteResponse, RemoteError> {
        debug!(function, ?params, "simulating remote call");
        tokio::time::sleep(self.delay).await;

        let response = match function {
            VERIFY_USER => RemoteResponse::success(Some("Verified"))
                .with_extra("userName", json!(SIMULATED_USER)),
            SUBMIT_CHECKOUT => RemoteResponse::success(Some("Simulated submission succeeded")),
            _ => RemoteResponse::success(None),
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn instant() -> SimulatedService {
        SimulatedService::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn verify_user_succeeds_with_test_user() {
        let mut params = RemoteParams::new();
        params.insert("lastFour".to_string(), json!("0000"));

        let response = instant().invoke(VERIFY_USER, &params).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.user_name(), Some(SIMULATED_USER));
    }

    #[tokio::test]
    async fn submit_checkout_succeeds_with_simulated_message() {
        let response = instant()
            .invoke(SUBMIT_CHECKOUT, &RemoteParams::new())
            .await
            .unwrap();

        assert_eq!(
            response,
            RemoteResponse::success(Some("Simulated submission succeeded"))
        );
    }

    #[tokio::test]
    async fn unknown_function_gets_bare_success() {
        let response = instant().invoke("ping", &RemoteParams::new()).await.unwrap();

        assert_eq!(response, RemoteResponse::success(None));
    }

    #[tokio::test]
    async fn answers_only_after_the_delay() {
        let delay = Duration::from_millis(50);
        let started = tokio::time::Instant::now();

        SimulatedService::new(delay)
            .invoke(VERIFY_USER, &RemoteParams::new())
            .await
            .unwrap();

        assert!(started.elapsed() >= delay);
    }
}
