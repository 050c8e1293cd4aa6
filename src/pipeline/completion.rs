//! Completion client: one non-streaming round-trip to a local Ollama
//! instance.
//!
//! The client is intentionally narrow — prompt in, [`CompletionResult`] out —
//! so the concrete inference backend stays swappable and the pipeline can be
//! exercised with [`ScriptedClient`] in tests. Failure is a *value*, not an
//! `Err`: the orchestrator inspects the sentinel and turns it into the
//! appropriate pipeline error. No retry is attempted; a single transport
//! failure is terminal for the request, and callers must assume worst-case
//! latency equal to full model generation time (no request timeout is set).

use crate::config::AnalysisConfig;
use crate::prompt::DEFAULT_SYSTEM_PROMPT;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Outcome of one completion round-trip.
///
/// `Success` and `Unreachable` are produced by clients; `Empty` is assigned
/// by the orchestrator when a successful answer is too short to be a
/// plausible report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// The service answered; `text` is trimmed of surrounding whitespace.
    Success { text: String },
    /// Transport or service failure — the sentinel the orchestrator
    /// short-circuits on.
    Unreachable { detail: String },
    /// Answer shorter than the plausibility threshold.
    Empty { len: usize },
}

/// A text-completion backend.
///
/// Implementations must not fail: every outcome, including a dead socket,
/// is expressed through [`CompletionResult`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> CompletionResult;
}

// ── Ollama wire types ────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Request body for Ollama `/api/chat`.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

/// Response body from Ollama `/api/chat` (non-streaming).
#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

// ── Ollama client ────────────────────────────────────────────────────────

/// HTTP client for a locally-hosted Ollama instance.
pub struct OllamaClient {
    base_url: String,
    model: String,
    system_prompt: String,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Build a client from the analysis configuration.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            base_url: config.ollama_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> CompletionResult {
        let start = Instant::now();
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: false,
        };

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("completion request to {} failed: {}", url, e);
                return CompletionResult::Unreachable {
                    detail: e.to_string(),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("completion service returned HTTP {}: {}", status, body);
            return CompletionResult::Unreachable {
                detail: format!("HTTP {status}: {body}"),
            };
        }

        let parsed: ChatResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!("completion response did not parse: {}", e);
                return CompletionResult::Unreachable {
                    detail: format!("unparseable response: {e}"),
                };
            }
        };

        let text = parsed.message.content.trim().to_string();
        debug!(
            "completion: {} chars in {:?} from model '{}'",
            text.len(),
            start.elapsed(),
            self.model
        );
        CompletionResult::Success { text }
    }
}

// ── Scripted client (tests) ──────────────────────────────────────────────

/// Fake completion backend returning a scripted result.
///
/// Public (not test-gated) so integration tests and downstream consumers
/// can drive the pipeline without a live model.
pub struct ScriptedClient {
    result: CompletionResult,
}

impl ScriptedClient {
    /// A client whose every call succeeds with `text`.
    pub fn answering(text: &str) -> Self {
        Self {
            result: CompletionResult::Success {
                text: text.trim().to_string(),
            },
        }
    }

    /// A client whose every call reports the service as unreachable.
    pub fn unreachable() -> Self {
        Self {
            result: CompletionResult::Unreachable {
                detail: "scripted: connection refused".to_string(),
            },
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _prompt: &str) -> CompletionResult {
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_serialises_system_then_user() {
        let body = ChatRequest {
            model: "llama3",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "be precise",
                },
                ChatMessage {
                    role: "user",
                    content: "the prompt",
                },
            ],
            stream: false,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"model\":\"llama3\""));
        assert!(json.contains("\"stream\":false"));
        let system = json.find("\"system\"").unwrap();
        let user = json.find("\"user\"").unwrap();
        assert!(system < user);
    }

    #[test]
    fn chat_response_parses_message_content() {
        let json = r#"{"model":"llama3","message":{"role":"assistant","content":"1. Summary"},"done":true}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.message.content, "1. Summary");
    }

    #[test]
    fn from_config_trims_trailing_slash() {
        let config = AnalysisConfig::default();
        let client = OllamaClient::from_config(&config);
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.model, "llama3");
    }

    #[tokio::test]
    async fn scripted_client_returns_configured_answer() {
        let client = ScriptedClient::answering("  a report  ");
        match client.complete("ignored").await {
            CompletionResult::Success { text } => assert_eq!(text, "a report"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn scripted_client_unreachable_sentinel() {
        let client = ScriptedClient::unreachable();
        assert!(matches!(
            client.complete("ignored").await,
            CompletionResult::Unreachable { .. }
        ));
    }
}
