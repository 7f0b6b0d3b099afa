//! Ollama transport layer.

pub mod client;

pub use client::{ChatTransport, OllamaClient, TransportError};
