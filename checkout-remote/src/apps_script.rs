//! Google Apps Script web-app transport.
//!
//! The web app is called the way a browser page would call it with JSONP:
//! a GET request whose query string carries the function name, one entry
//! per parameter and a callback name. The body comes back as
//! `callbackName({...});`, occasionally as bare JSON, and the object inside
//! is decoded into a [`RemoteResponse`].
//!
//! | query key    | value                                                   |
//! |--------------|---------------------------------------------------------|
//! | `function`   | remote function name (`verifyUser`, `submitCheckout`)   |
//! | *param name* | string values verbatim, everything else JSON-encoded    |
//! | `callback`   | `gasCallback_<unix millis>`                             |

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use checkout_core::remote::{RemoteError, RemoteParams, RemoteResponse, RemoteService};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

/// Calls a deployed Apps Script web app over HTTP.
#[derive(Debug, Clone)]
pub struct AppsScriptService {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl AppsScriptService {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(
        &self,
        query: &[(String, String)],
    ) -> Result<RemoteResponse, RemoteError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(query)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Transport(format!("unexpected HTTP status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        debug!(%body, "received response");

        parse_jsonp(&body)
    }
}

#[async_trait]
impl RemoteService for AppsScriptService {
    async fn invoke(
        &self,
        function: &str,
        params: &RemoteParams,
    ) -> Result<RemoteResponse, RemoteError> {
        let query = build_query(function, params, &callback_name());
        debug!(function, endpoint = %self.endpoint, ?query, "sending request");

        match tokio::time::timeout(self.timeout, self.fetch(&query)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                error!(function, error = %e, "request failed");
                Err(e)
            }
            Err(_) => {
                error!(function, timeout = ?self.timeout, "request timed out");
                Err(RemoteError::Timeout(self.timeout))
            }
        }
    }
}

/// A callback name unique enough for one terminal.
fn callback_name() -> String {
    format!("gasCallback_{}", Utc::now().timestamp_millis())
}

/// Query pairs for one call, in wire order.
fn build_query(
    function: &str,
    params: &RemoteParams,
    callback: &str,
) -> Vec<(String, String)> {
    let mut query = Vec::with_capacity(params.len() + 2);
    query.push(("function".to_string(), function.to_string()));
    for (key, value) in params {
        let encoded = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        query.push((key.clone(), encoded));
    }
    query.push(("callback".to_string(), callback.to_string()));
    query
}

/// Extract the JSON object from `callback({...});` (or bare JSON) and decode it.
fn parse_jsonp(body: &str) -> Result<RemoteResponse, RemoteError> {
    let body = body.trim();
    let json = if body.starts_with('{') {
        body
    } else {
        match (body.find('('), body.rfind(')')) {
            (Some(open), Some(close)) if open < close => &body[open + 1..close],
            _ => {
                return Err(RemoteError::Transport(
                    "response is neither JSON nor a JSONP callback".to_string(),
                ));
            }
        }
    };

    serde_json::from_str(json)
        .map_err(|e| RemoteError::Transport(format!("malformed response: {e}")))
}

#[cfg(test)]
mod tests {
    use checkout_core::remote::ResponseStatus;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    // =========================================================================
    // build_query tests
    // =========================================================================

    #[test]
    fn build_query_wraps_params_between_function_and_callback() {
        let mut params = RemoteParams::new();
        params.insert("lastFour".to_string(), json!("1234"));

        let query = build_query("verifyUser", &params, "gasCallback_1");

        assert_eq!(
            query,
            vec![
                ("function".to_string(), "verifyUser".to_string()),
                ("lastFour".to_string(), "1234".to_string()),
                ("callback".to_string(), "gasCallback_1".to_string()),
            ]
        );
    }

    #[test]
    fn build_query_json_encodes_non_string_values() {
        let mut params = RemoteParams::new();
        params.insert("rowData".to_string(), json!(["", "2024-05-01", 250, 0.7]));
        params.insert("staffName".to_string(), json!("Alice"));

        let query = build_query("submitCheckout", &params, "cb");

        assert_eq!(
            query[1],
            ("rowData".to_string(), r#"["","2024-05-01",250,0.7]"#.to_string())
        );
        assert_eq!(query[2], ("staffName".to_string(), "Alice".to_string()));
    }

    #[test]
    fn callback_name_has_expected_prefix() {
        assert!(callback_name().starts_with("gasCallback_"));
    }

    // =========================================================================
    // parse_jsonp tests
    // =========================================================================

    #[test]
    fn parse_jsonp_unwraps_callback() {
        let response =
            parse_jsonp(r#"gasCallback_1({"status":"success","userName":"Alice"});"#).unwrap();

        assert_eq!(response.status, ResponseStatus::Success);
        assert_eq!(response.user_name(), Some("Alice"));
    }

    #[test]
    fn parse_jsonp_accepts_bare_json() {
        let response = parse_jsonp(r#" {"status":"error","message":"nope"} "#).unwrap();

        assert_eq!(response, RemoteResponse::error(Some("nope")));
    }

    #[test]
    fn parse_jsonp_keeps_parentheses_inside_strings() {
        let response =
            parse_jsonp(r#"cb({"status":"error","message":"quota (daily) exceeded"})"#).unwrap();

        assert_eq!(response.message.as_deref(), Some("quota (daily) exceeded"));
    }

    #[test]
    fn parse_jsonp_tolerates_unrecognised_status() {
        let response = parse_jsonp(r#"cb({"status":"fail","message":"sheet locked"})"#).unwrap();

        assert_eq!(response.status, ResponseStatus::Unknown);
        assert_eq!(response.message.as_deref(), Some("sheet locked"));
    }

    #[test]
    fn parse_jsonp_rejects_html() {
        let result = parse_jsonp("<html><body>Sign in</body></html>");

        assert!(matches!(result, Err(RemoteError::Transport(_))));
    }

    #[test]
    fn parse_jsonp_rejects_malformed_json() {
        let result = parse_jsonp("cb({status: success})");

        assert!(matches!(result, Err(RemoteError::Transport(msg)) if msg.starts_with("malformed")));
    }

    // =========================================================================
    // HTTP round trips against a throwaway listener
    // =========================================================================

    /// Serve one canned HTTP response and hand back the request line.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/exec", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let reply = format!(
                "{status_line}\r\nContent-Type: application/javascript\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (url, handle)
    }

    fn service(
        url: &str,
        timeout: Duration,
    ) -> AppsScriptService {
        let client = Client::builder().no_proxy().build().unwrap();
        AppsScriptService::new(client, url, timeout)
    }

    #[tokio::test]
    async fn invoke_decodes_jsonp_response() {
        let (url, request) = serve_once(
            "HTTP/1.1 200 OK",
            r#"gasCallback_1({"status":"success","message":"saved"})"#,
        )
        .await;
        let mut params = RemoteParams::new();
        params.insert("staffName".to_string(), json!("Alice"));

        let response = service(&url, Duration::from_secs(5))
            .invoke("submitCheckout", &params)
            .await
            .unwrap();

        assert_eq!(response, RemoteResponse::success(Some("saved")));
        let request_line = request.await.unwrap();
        assert!(request_line.starts_with("GET /exec?function=submitCheckout&staffName=Alice&callback=gasCallback_"));
    }

    #[tokio::test]
    async fn invoke_maps_http_error_status_to_transport() {
        let (url, _request) = serve_once("HTTP/1.1 500 Internal Server Error", "oops").await;

        let result = service(&url, Duration::from_secs(5))
            .invoke("verifyUser", &RemoteParams::new())
            .await;

        assert!(matches!(result, Err(RemoteError::Transport(msg)) if msg.contains("500")));
    }

    #[tokio::test]
    async fn invoke_times_out_when_peer_never_answers() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/exec", listener.local_addr().unwrap());
        let _hold = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });
        let timeout = Duration::from_millis(200);

        let result = service(&url, timeout)
            .invoke("verifyUser", &RemoteParams::new())
            .await;

        assert_eq!(result, Err(RemoteError::Timeout(timeout)));
    }

    #[tokio::test]
    async fn invoke_reports_refused_connection_as_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/exec", listener.local_addr().unwrap());
        drop(listener);

        let result = service(&url, Duration::from_secs(5))
            .invoke("verifyUser", &RemoteParams::new())
            .await;

        assert!(matches!(result, Err(RemoteError::Transport(_))));
    }
}
