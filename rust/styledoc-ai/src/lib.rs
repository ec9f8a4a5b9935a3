//! The AI collaborator boundary: a single "messages in, string out"
//! operation. The rest of the system never depends on streaming, tool use,
//! or any provider-specific capability.

use std::time::Duration;

use async_trait::async_trait;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

#[async_trait]
pub trait AiService: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

/// A deterministic stand-in used in tests and whenever no AI endpoint is
/// configured. Returns a canned, well-formed response so callers that parse
/// strict JSON out of the reply still exercise their parsing logic.
pub struct StubAiService {
    response: String,
}

impl StubAiService {
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: response.into() }
    }

    /// A stub tuned for the paragraph-classification prompt: classifies
    /// every paragraph as `body`, which is always a well-formed answer even
    /// if not a useful one.
    pub fn paragraph_classifier(paragraph_count: usize) -> Self {
        let entries: Vec<String> = (0..paragraph_count)
            .map(|index| format!(r#"{{"index":{index},"type":"body"}}"#))
            .collect();
        Self::new(format!("[{}]", entries.join(",")))
    }
}

#[async_trait]
impl AiService for StubAiService {
    async fn complete(&self, _messages: &[Message]) -> Result<String> {
        Ok(self.response.clone())
    }
}

/// A thin client for an HTTP chat-completion endpoint. Kept narrow: no
/// retries beyond the underlying `reqwest` client defaults, no streaming.
pub struct HttpAiService {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl HttpAiService {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .wrap_err("building AI http client")?;
        Ok(Self { client, endpoint: endpoint.into(), api_key, model: model.into() })
    }

    /// Build from `STYLEDOC_AI_ENDPOINT` / `STYLEDOC_AI_API_KEY` /
    /// `STYLEDOC_AI_MODEL`. `STYLEDOC_AI_ENDPOINT` is required; the other
    /// two fall back to no key and `"gpt-4o-mini"` respectively.
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("STYLEDOC_AI_ENDPOINT").wrap_err("STYLEDOC_AI_ENDPOINT is not set")?;
        let api_key = std::env::var("STYLEDOC_AI_API_KEY").ok();
        let model = std::env::var("STYLEDOC_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        Self::new(endpoint, api_key, model)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageContent,
}

#[derive(Deserialize)]
struct ChatMessageContent {
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[async_trait]
impl AiService for HttpAiService {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let mut request = self.client.post(&self.endpoint).json(&ChatRequest { model: &self.model, messages });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.wrap_err("sending AI completion request")?;
        let response = response.error_for_status().wrap_err("AI endpoint returned an error status")?;
        let parsed: ChatResponse = response.json().await.wrap_err("parsing AI completion response")?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| eyre::eyre!("AI completion response had no choices"))
    }
}

/// Strip an optional ```json fenced code block wrapper from an AI reply.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_returns_configured_response() {
        let stub = StubAiService::new("hello");
        let out = stub.complete(&[Message::user("hi")]).await.unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn paragraph_classifier_stub_is_well_formed_json() {
        let stub = StubAiService::paragraph_classifier(2);
        let value: serde_json::Value = serde_json::from_str(&stub.response).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn strip_code_fence_removes_json_wrapper() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
    }
}
