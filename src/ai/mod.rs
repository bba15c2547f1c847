//! Remote model access for nickname expansion
//!
//! The transport is a trait so the expansion provider can be driven by a
//! scripted fake in tests; `CloudflareClient` is the real Workers AI client.

pub mod cloudflare;
pub mod extract;

pub use cloudflare::CloudflareClient;

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// PROMPTS
// =============================================================================

pub const SYSTEM_PROMPT: &str = "You expand personal names into common English nicknames and diminutives. \
Only output minified JSON: {\"canonical\": string, \"nicknames\": string[]}. No extra text.";

const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 128;

// =============================================================================
// PAYLOADS
// =============================================================================

/// Request body sent to the inference endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum InferencePayload {
    /// Structured system + user message list
    Chat {
        messages: Vec<ChatMessage>,
        temperature: f32,
        max_tokens: u32,
    },
    /// Single free-text prompt
    Prompt {
        input: String,
        temperature: f32,
        max_tokens: u32,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl InferencePayload {
    /// Preferred request shape
    pub fn chat(name: &str) -> Self {
        Self::Chat {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("Name: {}. Return JSON only.", name),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    /// Alternate shape used for the single retry
    pub fn prompt(name: &str) -> Self {
        Self::Prompt {
            input: format!(
                "Expand common English nicknames for the personal name '{}'. \
                Only output minified JSON: {{\"canonical\": string, \"nicknames\": string[]}}.",
                name
            ),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Chat { .. } => "chat",
            Self::Prompt { .. } => "prompt",
        }
    }
}

// =============================================================================
// FAILURES
// =============================================================================

/// Why a remote expansion attempt produced nothing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Network(String),

    #[error("unusable response: {0}")]
    Parse(String),
}

impl RemoteFailure {
    /// Transient failures earn the one alternate-shape retry; parse failures do not
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Parse(_))
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Sends one payload and returns the model's text reply
pub trait InferenceTransport: Send + Sync {
    fn run(
        &self,
        payload: &InferencePayload,
    ) -> impl Future<Output = Result<String, RemoteFailure>> + Send;
}

impl<T: InferenceTransport> InferenceTransport for Arc<T> {
    fn run(
        &self,
        payload: &InferencePayload,
    ) -> impl Future<Output = Result<String, RemoteFailure>> + Send {
        (**self).run(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_payload_shape() {
        let body = serde_json::to_value(InferencePayload::chat("Liz")).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Name: Liz. Return JSON only.");
        assert_eq!(body["max_tokens"], 128);
        assert!(body.get("input").is_none());
    }

    #[test]
    fn test_prompt_payload_shape() {
        let payload = InferencePayload::prompt("Liz");
        assert_eq!(payload.shape(), "prompt");
        let body = serde_json::to_value(payload).unwrap();
        assert!(body["input"].as_str().unwrap().contains("'Liz'"));
        assert!(body.get("messages").is_none());
    }

    #[test]
    fn test_failure_classification() {
        assert!(RemoteFailure::Timeout(Duration::from_secs(1)).is_transient());
        assert!(RemoteFailure::Status {
            status: 500,
            body: String::new()
        }
        .is_transient());
        assert!(RemoteFailure::Network("reset".into()).is_transient());
        assert!(!RemoteFailure::Parse("prose".into()).is_transient());
    }
}
