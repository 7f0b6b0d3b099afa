//! Quill - Type Definitions
//!
//! Shared types for the assistant: chat messages, tool invocations,
//! and configuration.

use serde::{Deserialize, Serialize};

// ─── Chat ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One entry in the conversation. The session's ordered history is
/// append-only; entries are never mutated in place.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

// ─── Tool Protocol ───────────────────────────────────────────────

/// A parsed request embedded in model output to read or write a file.
/// Lives only for the duration of one reply-processing cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolInvocation {
    ReadFile { path: String },
    WriteFile { path: String, content: String },
}

// ─── Configuration ───────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuillConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Returns the default `QuillConfig`. Callers override fields from the
/// config file or CLI flags.
pub fn default_config() -> QuillConfig {
    QuillConfig {
        model: "deepseek-coder-v2:16b".to_string(),
        base_url: "http://localhost:11434".to_string(),
        timeout_secs: 60,
        log_level: LogLevel::Info,
    }
}
