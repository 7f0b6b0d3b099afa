//! Ollama Chat Client
//!
//! Wraps Ollama's /api/chat endpoint. One blocking call per request,
//! bounded timeout, no retries; a failed call degrades the current turn.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::types::ChatMessage;

/// Timeout for the installed-model listing used at startup.
const TAGS_TIMEOUT_SECS: u64 = 5;

/// Transport-level failures talking to the Ollama server.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The one network dependency of the session: send a chat request, or
/// list the installed models. Implemented over HTTP by `OllamaClient`
/// and by scripted mocks in tests.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the ordered message list (system prompt first) and return the
    /// assistant's text reply. Errors carry transport context; the caller
    /// treats them as "could not process this turn". No retries.
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// List the names of models installed on the server.
    async fn list_models(&self) -> Result<Vec<String>>;
}

/// HTTP client for a local Ollama server.
pub struct OllamaClient {
    base_url: String,
    model: String,
    timeout: Duration,
    http: Client,
}

impl OllamaClient {
    /// * `base_url` - e.g. `http://localhost:11434`.
    /// * `model` - model identifier, e.g. `deepseek-coder-v2:16b`.
    /// * `timeout_secs` - per-request timeout for chat calls.
    pub fn new(base_url: String, model: String, timeout_secs: u64) -> Self {
        Self {
            base_url,
            model,
            timeout: Duration::from_secs(timeout_secs),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ChatTransport for OllamaClient {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });

        let url = format!("{}/api/chat", self.base_url);
        let resp = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|source| TransportError::Request { url: url.clone(), source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status { status: status.as_u16(), body }.into());
        }

        let data: Value = resp
            .json()
            .await
            .context("Failed to parse chat response")?;

        let content = data["message"]["content"]
            .as_str()
            .ok_or_else(|| TransportError::Malformed("no message content".to_string()))?;

        Ok(content.to_string())
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(TAGS_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|source| TransportError::Request { url: url.clone(), source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status { status: status.as_u16(), body }.into());
        }

        let data: Value = resp
            .json()
            .await
            .context("Failed to parse model list")?;

        let models = data["models"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|m| m["name"].as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }
}
