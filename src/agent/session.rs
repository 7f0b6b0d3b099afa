//! The Conversation Session
//!
//! One turn: append the user message, call the transport, execute any tool
//! invocations found in the reply, feed results back, and request a single
//! follow-up. Strictly sequential; the two transport calls within a turn
//! never overlap.

use std::sync::Arc;

use colored::Colorize;
use tracing::{debug, info};

use crate::agent::protocol::{extract_invocations, strip_markup};
use crate::agent::system_prompt::build_system_prompt;
use crate::agent::tools::execute_invocations;
use crate::ollama::ChatTransport;
use crate::output::OutputSink;
use crate::types::ChatMessage;

/// Shown to the operator when the first transport call of a turn fails.
const DEGRADED_NOTICE: &str = "Sorry, I couldn't process your request.";

/// Owns the append-only conversation history for one interactive session.
/// The system prompt is prepended fresh on every request, never stored.
pub struct Session {
    system_prompt: String,
    history: Vec<ChatMessage>,
    transport: Box<dyn ChatTransport>,
    sink: Arc<dyn OutputSink>,
}

impl Session {
    pub fn new(transport: Box<dyn ChatTransport>, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            system_prompt: build_system_prompt(),
            history: Vec::new(),
            transport,
            sink,
        }
    }

    /// The conversation so far, excluding the system prompt.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Reset the conversation. Only explicit operator action clears history.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// System prompt first, then the full history.
    fn request_messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(ChatMessage::system(self.system_prompt.as_str()));
        messages.extend(self.history.iter().cloned());
        messages
    }

    /// Process one user turn. Returns the text to display; an empty string
    /// means the turn produced nothing displayable.
    pub async fn chat(&mut self, user_input: &str) -> String {
        self.history.push(ChatMessage::user(user_input));

        let reply = match self.transport.chat(self.request_messages()).await {
            Ok(text) => text,
            Err(err) => {
                self.sink
                    .emit(&format!("Error calling Ollama: {:#}", err).red().to_string());
                return DEGRADED_NOTICE.to_string();
            }
        };
        if reply.is_empty() {
            return DEGRADED_NOTICE.to_string();
        }

        let invocations = extract_invocations(&reply);
        if !invocations.is_empty() {
            info!(count = invocations.len(), "executing tool invocations");
            let results = execute_invocations(&invocations, &*self.sink);
            let report = format!("Tool results:\n{}", results.join("\n\n"));

            self.history.push(ChatMessage::assistant(reply));
            self.history.push(ChatMessage::user(report));

            // One follow-up call with the updated history. Follow-up text is
            // returned unmodified; stripping applies only to the original
            // reply when no follow-up occurs.
            let follow_up = match self.transport.chat(self.request_messages()).await {
                Ok(text) => text,
                Err(err) => {
                    self.sink
                        .emit(&format!("Error calling Ollama: {:#}", err).red().to_string());
                    String::new()
                }
            };

            if follow_up.is_empty() {
                // Tool results stay in history; the turn ends with nothing
                // new to display.
                self.sink.emit(
                    &"Follow-up reply unavailable; tool results were recorded."
                        .dimmed()
                        .to_string(),
                );
                return String::new();
            }

            self.history.push(ChatMessage::assistant(follow_up.clone()));
            return follow_up;
        }

        debug!("no tool invocations in reply");
        self.history.push(ChatMessage::assistant(reply.clone()));

        let stripped = strip_markup(&reply);
        if stripped.is_empty() {
            reply
        } else {
            stripped
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use super::*;
    use crate::output::capture::CaptureSink;
    use crate::types::ChatRole;

    /// Scripted transport: pops replies front-to-back, records every
    /// request's message list.
    struct ScriptedTransport {
        replies: Mutex<Vec<Result<String>>>,
        requests: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
            self.requests.lock().unwrap().push(messages);
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(anyhow!("script exhausted"));
            }
            replies.remove(0)
        }

        async fn list_models(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }
    }

    fn session_with(replies: Vec<Result<String>>) -> (Session, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(replies));
        let adapter = Arc::clone(&transport);

        struct TransportAdapter(Arc<ScriptedTransport>);

        #[async_trait]
        impl ChatTransport for TransportAdapter {
            async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
                self.0.chat(messages).await
            }
            async fn list_models(&self) -> Result<Vec<String>> {
                self.0.list_models().await
            }
        }

        let session = Session::new(Box::new(TransportAdapter(adapter)), Arc::new(CaptureSink::new()));
        (session, transport)
    }

    #[tokio::test]
    async fn test_plain_reply_returned_unchanged_no_follow_up() {
        let (mut session, transport) =
            session_with(vec![Ok("Here's the answer: 42".to_string())]);

        let out = session.chat("what is it?").await;

        assert_eq!(out, "Here's the answer: 42");
        assert_eq!(transport.requests.lock().unwrap().len(), 1);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].role, ChatRole::User);
        assert_eq!(session.history()[1].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn test_system_prompt_prepended_not_stored() {
        let (mut session, transport) = session_with(vec![Ok("ok".to_string())]);

        session.chat("hi").await;

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0][0].role, ChatRole::System);
        assert!(requests[0][0].content.contains("coding assistant"));
        assert!(session.history().iter().all(|m| m.role != ChatRole::System));
    }

    #[tokio::test]
    async fn test_tool_reply_executes_and_issues_follow_up() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "hello").unwrap();

        let reply = format!(
            "I'll check.<read_file><path>{}</path></read_file>",
            file.display()
        );
        let (mut session, transport) = session_with(vec![
            Ok(reply),
            Ok("The file says hello.".to_string()),
        ]);

        let out = session.chat("look at a.txt").await;

        assert_eq!(out, "The file says hello.");
        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);

        // Follow-up request carries the tool-results report.
        let report = &requests[1][requests[1].len() - 1];
        assert_eq!(report.role, ChatRole::User);
        assert!(report.content.starts_with("Tool results:"));
        assert!(report.content.contains("hello"));

        // user, assistant (original), user (tool results), assistant (follow-up)
        assert_eq!(session.history().len(), 4);
        assert_eq!(session.history()[2].role, ChatRole::User);
        assert_eq!(session.history()[3].content, "The file says hello.");
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_turn() {
        let (mut session, _transport) = session_with(vec![Err(anyhow!("connection refused"))]);

        let out = session.chat("hi").await;

        assert_eq!(out, DEGRADED_NOTICE);
        // The user message stays; no assistant message was appended.
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_failure_appends_nothing_further() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "hello").unwrap();

        let reply = format!(
            "Checking.<read_file><path>{}</path></read_file>",
            file.display()
        );
        let (mut session, _transport) =
            session_with(vec![Ok(reply), Err(anyhow!("timed out"))]);

        let out = session.chat("look").await;

        assert_eq!(out, "");
        // user, assistant (original), user (tool results) -- and no more.
        assert_eq!(session.history().len(), 3);
        assert!(session.history()[2].content.starts_with("Tool results:"));
    }

    #[tokio::test]
    async fn test_malformed_markup_reply_returned_as_is() {
        // No invocation is extracted from malformed markup; stripping leaves
        // the text untouched and the reply comes back as-is.
        let reply = "<read_file><path>a.txt</path>".to_string();
        let (mut session, transport) = session_with(vec![Ok(reply.clone())]);

        let out = session.chat("go").await;

        assert_eq!(out, reply);
        assert_eq!(transport.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_resets_history() {
        let (mut session, _transport) = session_with(vec![Ok("ok".to_string())]);

        session.chat("hi").await;
        assert!(!session.history().is_empty());

        session.clear();
        assert!(session.history().is_empty());
    }
}
