//! Cloudflare Workers AI client
//!
//! Runs text-generation models through
//! `POST /client/v4/accounts/{account}/ai/run/{model}` with bearer auth.
//!
//! @module ai/cloudflare

use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::{InferencePayload, InferenceTransport, RemoteFailure};
use crate::core::config::RemoteConfig;

// =============================================================================
// CONSTANTS
// =============================================================================

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest error body kept for logs
const MAX_ERROR_BODY: usize = 512;

// =============================================================================
// CLIENT
// =============================================================================

pub struct CloudflareClient {
    client: Client,
    url: String,
    api_token: String,
    timeout: Duration,
}

impl CloudflareClient {
    /// Fails only when the HTTP client itself cannot be built
    pub fn new(
        base_url: &str,
        account_id: &str,
        api_token: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: run_url(base_url, account_id, model),
            api_token: api_token.to_string(),
            timeout,
        })
    }

    /// Build a client from config
    ///
    /// `None` when credentials are missing or the HTTP client cannot be
    /// built; either way the remote tier stays off.
    pub fn from_config(config: &RemoteConfig) -> Option<Self> {
        let (account_id, api_token) = config.credentials()?;
        match Self::new(
            &config.base_url,
            account_id,
            api_token,
            config.model(),
            Duration::from_secs(config.timeout_secs),
        ) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "Failed to build Workers AI client, remote expansion disabled");
                None
            }
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, payload: &InferencePayload) -> Result<String, RemoteFailure> {
        debug!(url = %self.url, shape = payload.shape(), "Calling Workers AI");

        let res = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            let body = truncate(&body, MAX_ERROR_BODY);
            warn!(
                status = status.as_u16(),
                shape = payload.shape(),
                body = %body,
                "Workers AI call failed"
            );
            return Err(RemoteFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response_text(&body))
    }

    fn request_error(&self, e: reqwest::Error) -> RemoteFailure {
        if e.is_timeout() {
            RemoteFailure::Timeout(self.timeout)
        } else {
            RemoteFailure::Network(e.to_string())
        }
    }
}

impl InferenceTransport for CloudflareClient {
    fn run(
        &self,
        payload: &InferencePayload,
    ) -> impl Future<Output = Result<String, RemoteFailure>> + Send {
        self.post(payload)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Model slugs contain `/`; each segment is escaped on its own
fn run_url(base_url: &str, account_id: &str, model: &str) -> String {
    let model_path = model
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    format!(
        "{}/client/v4/accounts/{}/ai/run/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(account_id),
        model_path
    )
}

/// Pull the generated text out of the Workers AI envelope
///
/// Replies usually look like `{"success": true, "result": {"response": "..."}}`;
/// some models use `output_text`, and JSON-mode models return the object
/// itself. Anything unrecognized is returned as the raw body.
pub fn response_text(body: &str) -> String {
    let Ok(root) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    let Some(result) = root.get("result") else {
        return body.to_string();
    };

    for key in ["response", "output_text"] {
        match result.get(key) {
            Some(Value::String(text)) => return text.clone(),
            Some(value @ (Value::Object(_) | Value::Array(_))) => return value.to_string(),
            _ => {}
        }
    }

    body.to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_url_escapes_model_segments() {
        let url = run_url("https://api.cloudflare.com/", "abc123", "@cf/meta/llama-3-8b-instruct");
        assert_eq!(
            url,
            "https://api.cloudflare.com/client/v4/accounts/abc123/ai/run/%40cf/meta/llama-3-8b-instruct"
        );
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let mut config = RemoteConfig::default();
        assert!(CloudflareClient::from_config(&config).is_none());

        config.account_id = Some("acct".to_string());
        config.api_token = Some("token".to_string());
        let client = CloudflareClient::from_config(&config).unwrap();
        assert!(client.url().contains("/accounts/acct/ai/run/"));
    }

    #[test]
    fn test_response_text_envelopes() {
        assert_eq!(
            response_text(r#"{"success":true,"result":{"response":"[\"bob\"]"}}"#),
            r#"["bob"]"#
        );
        assert_eq!(
            response_text(r#"{"result":{"output_text":"hello"}}"#),
            "hello"
        );
        assert_eq!(
            response_text(r#"{"result":{"response":{"canonical":"robert"}}}"#),
            r#"{"canonical":"robert"}"#
        );
        assert_eq!(response_text("plain text"), "plain text");
        assert_eq!(response_text(r#"{"other":1}"#), r#"{"other":1}"#);
    }

    // -------------------------------------------------------------------------
    // Wire tests against a local HTTP stub
    // -------------------------------------------------------------------------

    use crate::expand::{RemoteExpander, RemoteExpansionProvider};
    use crate::names::NameEquivalenceGraph;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const MODEL: &str = "@cf/meta/llama-3-8b-instruct";

    /// Serve one canned response per connection, returning the raw requests
    async fn stub_server(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);

                let reason = if status == 200 { "OK" } else { "Internal Server Error" };
                let reply = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
            requests
        });

        (base_url, handle)
    }

    /// Read headers plus a `Content-Length` body
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn test_wire_retry_and_envelope() {
        let (base_url, server) = stub_server(vec![
            (500, r#"{"success":false,"errors":[{"message":"overloaded"}]}"#),
            (
                200,
                r#"{"success":true,"result":{"response":"Sure: {\"canonical\":\"Robert\",\"nicknames\":[\"Bobby\",\"Rob\"]}"}}"#,
            ),
        ])
        .await;

        let client = CloudflareClient::new(&base_url, "acct", "tok", MODEL, Duration::from_secs(5)).unwrap();
        let provider = RemoteExpansionProvider::new(
            Arc::new(NameEquivalenceGraph::builtin()),
            Some(RemoteExpander::new(client, Duration::from_secs(5))),
        );

        let names = provider.expand("Bob").await;
        assert_eq!(names.as_slice(), &["Bob", "Robert", "Bobby", "Rob"]);

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        for request in &requests {
            assert!(request.starts_with(
                "POST /client/v4/accounts/acct/ai/run/%40cf/meta/llama-3-8b-instruct HTTP/1.1"
            ));
            assert!(request.to_lowercase().contains("authorization: bearer tok"));
        }
        assert!(requests[0].contains(r#""messages""#));
        assert!(requests[1].contains(r#""input""#));
        assert!(!requests[1].contains(r#""messages""#));
    }

    #[tokio::test]
    async fn test_wire_status_failure() {
        let (base_url, server) = stub_server(vec![(500, "upstream exploded")]).await;
        let client = CloudflareClient::new(&base_url, "acct", "tok", MODEL, Duration::from_secs(5)).unwrap();

        let result = client.run(&InferencePayload::chat("Bob")).await;
        assert_eq!(
            result,
            Err(RemoteFailure::Status {
                status: 500,
                body: "upstream exploded".to_string()
            })
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_wire_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        // Accept and read, never answer
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let timeout = Duration::from_millis(200);
        let client = CloudflareClient::new(&base_url, "acct", "tok", MODEL, timeout).unwrap();

        let result = client.run(&InferencePayload::prompt("Bob")).await;
        assert_eq!(result, Err(RemoteFailure::Timeout(timeout)));
        server.abort();
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
