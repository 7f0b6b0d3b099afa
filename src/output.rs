//! Output Sink
//!
//! The session and tools report operator-facing text through an injected
//! sink rather than printing directly, so tests can capture output.

/// A destination for operator-facing text. Implementations receive text
/// already formatted (including any color codes).
pub trait OutputSink: Send + Sync {
    fn emit(&self, text: &str);
}

/// Writes emitted lines to stdout.
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn emit(&self, text: &str) {
        println!("{}", text);
    }
}
