//! Tool-Call Markup
//!
//! A hand-written scanner for the two tag shapes the model may embed in a
//! reply:
//!
//! ```text
//! <read_file><path>P</path></read_file>
//! <write_to_file><path>P</path><content>C</content></write_to_file>
//! ```
//!
//! Whitespace (including newlines) is tolerated between structural tags,
//! and P/C may span multiple lines. Malformed or unterminated markup is
//! skipped silently; only well-formed matches produce invocations.
//! Extraction and stripping share the same single pass, so display cleanup
//! removes exactly what extraction would have executed.

use crate::types::ToolInvocation;

const READ_FILE_OPEN: &str = "<read_file>";
const READ_FILE_CLOSE: &str = "</read_file>";
const WRITE_FILE_OPEN: &str = "<write_to_file>";
const WRITE_FILE_CLOSE: &str = "</write_to_file>";
const PATH_OPEN: &str = "<path>";
const PATH_CLOSE: &str = "</path>";
const CONTENT_OPEN: &str = "<content>";
const CONTENT_CLOSE: &str = "</content>";

/// A well-formed tool tag found in a reply, with the byte span it occupies.
struct TagMatch {
    invocation: ToolInvocation,
    start: usize,
    end: usize,
}

/// Byte cursor over the reply text.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    /// Consume `token` at the current position, or fail without advancing.
    fn eat(&mut self, token: &str) -> bool {
        if self.text[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Capture everything up to the first occurrence of `token`, then
    /// advance past it. Returns `None` if `token` never occurs.
    fn capture_until(&mut self, token: &'_ str) -> Option<&'a str> {
        let offset = self.text[self.pos..].find(token)?;
        let captured = &self.text[self.pos..self.pos + offset];
        self.pos += offset + token.len();
        Some(captured)
    }
}

/// Parse one `<read_file>` tag starting at `start`. Returns the invocation
/// and the byte offset just past the closing tag.
fn parse_read(text: &str, start: usize) -> Option<(ToolInvocation, usize)> {
    let mut cur = Cursor { text, pos: start + READ_FILE_OPEN.len() };
    cur.skip_whitespace();
    if !cur.eat(PATH_OPEN) {
        return None;
    }
    let path = cur.capture_until(PATH_CLOSE)?;
    cur.skip_whitespace();
    if !cur.eat(READ_FILE_CLOSE) {
        return None;
    }
    Some((ToolInvocation::ReadFile { path: path.trim().to_string() }, cur.pos))
}

/// Parse one `<write_to_file>` tag starting at `start`.
fn parse_write(text: &str, start: usize) -> Option<(ToolInvocation, usize)> {
    let mut cur = Cursor { text, pos: start + WRITE_FILE_OPEN.len() };
    cur.skip_whitespace();
    if !cur.eat(PATH_OPEN) {
        return None;
    }
    let path = cur.capture_until(PATH_CLOSE)?;
    cur.skip_whitespace();
    if !cur.eat(CONTENT_OPEN) {
        return None;
    }
    let content = cur.capture_until(CONTENT_CLOSE)?;
    cur.skip_whitespace();
    if !cur.eat(WRITE_FILE_CLOSE) {
        return None;
    }
    Some((
        ToolInvocation::WriteFile {
            path: path.trim().to_string(),
            content: content.trim().to_string(),
        },
        cur.pos,
    ))
}

/// Single left-to-right pass over the text collecting well-formed matches
/// in document order. A failed parse resumes just past the offending `<`.
fn scan(text: &str) -> Vec<TagMatch> {
    let mut matches = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('<') {
        let start = pos + offset;
        let rest = &text[start..];

        let parsed = if rest.starts_with(READ_FILE_OPEN) {
            parse_read(text, start)
        } else if rest.starts_with(WRITE_FILE_OPEN) {
            parse_write(text, start)
        } else {
            None
        };

        match parsed {
            Some((invocation, end)) => {
                matches.push(TagMatch { invocation, start, end });
                pos = end;
            }
            None => pos = start + 1,
        }
    }

    matches
}

/// Extract all well-formed tool invocations from a reply, in document
/// order, with path and content trimmed of surrounding whitespace.
pub fn extract_invocations(text: &str) -> Vec<ToolInvocation> {
    scan(text).into_iter().map(|m| m.invocation).collect()
}

/// Remove every well-formed tool tag from `text` for display. Text with no
/// markup passes through unchanged; a reply that was nothing but markup and
/// whitespace strips to the empty string. Never applied to history entries.
pub fn strip_markup(text: &str) -> String {
    let matches = scan(text);
    if matches.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for m in &matches {
        out.push_str(&text[pos..m.start]);
        pos = m.end;
    }
    out.push_str(&text[pos..]);
    out.trim().to_string()
}
