//! Quill -- Interactive Coding Assistant for Ollama
//!
//! A command-line assistant that forwards user messages to a local
//! Ollama server, executes file read/write tools the model requests
//! through an XML-ish markup, and feeds results back for a follow-up.

pub mod types;
pub mod config;
pub mod output;
pub mod ollama;
pub mod agent;
