//! File Tools
//!
//! Executes the two filesystem operations the model may request. Each
//! invocation produces one result string; a failed invocation never aborts
//! the batch, the error text simply becomes the result.

use std::fs;
use std::path::Path;

use colored::Colorize;
use tracing::debug;

use crate::output::OutputSink;
use crate::types::ToolInvocation;

/// Execute all invocations in extraction order, reporting each outcome to
/// the operator through `sink` and returning one result string per
/// invocation.
pub fn execute_invocations(invocations: &[ToolInvocation], sink: &dyn OutputSink) -> Vec<String> {
    invocations
        .iter()
        .map(|invocation| match invocation {
            ToolInvocation::ReadFile { path } => execute_read(path, sink),
            ToolInvocation::WriteFile { path, content } => execute_write(path, content, sink),
        })
        .collect()
}

fn execute_read(path: &str, sink: &dyn OutputSink) -> String {
    debug!(path, "read_file");

    let file_path = Path::new(path);
    if !file_path.exists() {
        let error_msg = format!("Error: File '{}' does not exist", path);
        sink.emit(&error_msg.red().to_string());
        return error_msg;
    }

    match fs::read_to_string(file_path) {
        Ok(content) => {
            sink.emit(&format!("📖 Read file: {}", path).green().to_string());
            format!("File content of '{}':\n```\n{}\n```", path, content)
        }
        Err(err) => {
            let error_msg = format!("Error reading file '{}': {}", path, err);
            sink.emit(&error_msg.red().to_string());
            error_msg
        }
    }
}

fn execute_write(path: &str, content: &str, sink: &dyn OutputSink) -> String {
    debug!(path, "write_to_file");

    let file_path = Path::new(path);
    let result = file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(fs::create_dir_all)
        .unwrap_or(Ok(()))
        .and_then(|_| fs::write(file_path, content));

    match result {
        Ok(()) => {
            sink.emit(&format!("💾 Wrote file: {}", path).green().to_string());
            format!("Successfully wrote to '{}'", path)
        }
        Err(err) => {
            let error_msg = format!("Error writing file '{}': {}", path, err);
            sink.emit(&error_msg.red().to_string());
            error_msg
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::capture::CaptureSink;

    #[test]
    fn test_write_creates_parents_and_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.txt");
        let path_str = path.to_str().unwrap();
        let sink = CaptureSink::new();

        let write_result = execute_write(path_str, "hello\nworld", &sink);
        assert_eq!(write_result, format!("Successfully wrote to '{}'", path_str));

        let read_result = execute_read(path_str, &sink);
        assert_eq!(
            read_result,
            format!("File content of '{}':\n```\nhello\nworld\n```", path_str)
        );
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let path_str = path.to_str().unwrap();
        let sink = CaptureSink::new();

        let result = execute_read(path_str, &sink);
        assert_eq!(result, format!("Error: File '{}' does not exist", path_str));
    }

    #[test]
    fn test_write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        let path_str = path.to_str().unwrap();
        let sink = CaptureSink::new();

        execute_write(path_str, "first", &sink);
        execute_write(path_str, "second", &sink);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let target = dir.path().join("target.txt");
        let sink = CaptureSink::new();

        let invocations = vec![
            ToolInvocation::ReadFile { path: missing.to_str().unwrap().to_string() },
            ToolInvocation::WriteFile {
                path: target.to_str().unwrap().to_string(),
                content: "ok".to_string(),
            },
        ];

        let results = execute_invocations(&invocations, &sink);
        assert_eq!(results.len(), 2);
        assert!(results[0].starts_with("Error: File"));
        assert!(results[1].starts_with("Successfully wrote"));
        assert!(target.exists());
    }

    #[test]
    fn test_write_bare_filename_has_no_parent_to_create() {
        let dir = tempfile::tempdir().unwrap();
        let prev = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let sink = CaptureSink::new();

        let result = execute_write("bare.txt", "x", &sink);

        std::env::set_current_dir(prev).unwrap();
        assert_eq!(result, "Successfully wrote to 'bare.txt'");
    }
}
