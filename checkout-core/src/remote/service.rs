use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Named parameters passed to a remote function.
pub type RemoteParams = Map<String, Value>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request rejected: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),

    #[error("configuration error: {0}")]
    Configuration(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
    /// Any other status string; treated as a rejection.
    #[serde(other)]
    Unknown,
}

/// The `{status, message?, ...}` object every remote function answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteResponse {
    pub status: ResponseStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Function-specific fields such as `userName`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RemoteResponse {
    pub fn success(message: Option<&str>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.map(str::to_string),
            extra: Map::new(),
        }
    }

    pub fn error(message: Option<&str>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.map(str::to_string),
            extra: Map::new(),
        }
    }

    /// Attach a function-specific field.
    pub fn with_extra(
        mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// The `userName` returned by a successful `verifyUser`.
    pub fn user_name(&self) -> Option<&str> {
        self.extra
            .get("userName")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// A remote function endpoint.
///
/// Implementations resolve every call exactly once: either the decoded
/// response (whatever its `status`) or a [`RemoteError`] for timeouts and
/// transport failures.
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn invoke(
        &self,
        function: &str,
        params: &RemoteParams,
    ) -> Result<RemoteResponse, RemoteError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn response_decodes_status_message_and_extras() {
        let response: RemoteResponse = serde_json::from_value(json!({
            "status": "success",
            "message": "ok",
            "userName": "Alice",
        }))
        .unwrap();

        assert!(response.is_success());
        assert_eq!(response.message.as_deref(), Some("ok"));
        assert_eq!(response.user_name(), Some("Alice"));
    }

    #[test]
    fn response_decodes_without_message() {
        let response: RemoteResponse =
            serde_json::from_value(json!({ "status": "error" })).unwrap();

        assert_eq!(response, RemoteResponse::error(None));
    }

    #[test]
    fn unrecognised_status_decodes_as_unknown() {
        let response: RemoteResponse = serde_json::from_value(json!({
            "status": "maybe",
            "message": "sheet locked",
        }))
        .unwrap();

        assert_eq!(response.status, ResponseStatus::Unknown);
        assert!(!response.is_success());
        assert_eq!(response.message.as_deref(), Some("sheet locked"));
    }

    #[test]
    fn user_name_ignores_blank_and_non_string_values() {
        assert_eq!(
            RemoteResponse::success(None)
                .with_extra("userName", "  ")
                .user_name(),
            None
        );
        assert_eq!(
            RemoteResponse::success(None)
                .with_extra("userName", 42)
                .user_name(),
            None
        );
    }

    #[test]
    fn rejected_error_message_falls_back() {
        assert_eq!(
            RemoteError::Rejected(None).to_string(),
            "request rejected: no message"
        );
        assert_eq!(
            RemoteError::Rejected(Some("sheet locked".to_string())).to_string(),
            "request rejected: sheet locked"
        );
    }
}
