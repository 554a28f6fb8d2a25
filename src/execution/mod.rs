//! Execution engine: wire payload, result types and display policy.

use serde::Deserialize;
use thiserror::Error;

pub mod python;

/// Text shown when a run succeeds without writing anything to stdout.
pub const NO_OUTPUT_PLACEHOLDER: &str = "(no output)";

/// Outcome of one captured run, as reported by the capture adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExecutionResult {
    /// Everything the program wrote to stdout, possibly empty.
    pub stdout: String,
    /// Formatted traceback when compiling or executing raised.
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Parse the JSON payload produced by the capture adapter.
    ///
    /// `stdout` must be present; `error` may be a string, `null`, or missing.
    pub fn from_wire(payload: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(payload).map_err(|e| BridgeError::Payload(e.to_string()))
    }

    /// The traceback, if any. An empty traceback counts as no error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Project the result into the text shown in the output pane.
    pub fn display_text(&self) -> String {
        match self.error() {
            Some(error) => {
                let mut text = String::with_capacity(self.stdout.len() + error.len() + 1);
                if !self.stdout.is_empty() {
                    text.push_str(&self.stdout);
                    text.push('\n');
                }
                text.push_str(error);
                text
            }
            None if self.stdout.is_empty() => NO_OUTPUT_PLACEHOLDER.to_string(),
            None => self.stdout.clone(),
        }
    }
}

/// Failures of the host/interpreter bridge itself, as opposed to errors
/// raised by the user's program (those travel inside [`ExecutionResult`]).
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Python runtime is not ready")]
    NotReady,
    #[error("failed to start interpreter `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("interpreter handshake failed: {0}")]
    Handshake(String),
    #[error("interpreter process exited")]
    Disconnected,
    #[error("interpreter channel error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Python(String),
    #[error("malformed result payload: {0}")]
    Payload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(stdout: &str, error: Option<&str>) -> ExecutionResult {
        ExecutionResult {
            stdout: stdout.to_string(),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn success_shows_stdout_verbatim() {
        assert_eq!(result("2\n", None).display_text(), "2\n");
    }

    #[test]
    fn silent_success_shows_placeholder() {
        assert_eq!(result("", None).display_text(), "(no output)");
    }

    #[test]
    fn error_without_stdout_is_just_the_trace() {
        let trace = "Traceback (most recent call last):\nZeroDivisionError: division by zero\n";
        assert_eq!(result("", Some(trace)).display_text(), trace);
    }

    #[test]
    fn error_after_output_is_separated_by_blank_line() {
        let shown = result("before\n", Some("Traceback ...\nValueError\n")).display_text();
        assert_eq!(shown, "before\n\nTraceback ...\nValueError\n");
    }

    #[test]
    fn empty_error_counts_as_success() {
        let r = result("", Some(""));
        assert!(!r.is_error());
        assert_eq!(r.display_text(), "(no output)");
    }

    #[test]
    fn wire_payload_accepts_null_and_missing_error() {
        let with_null = ExecutionResult::from_wire(r#"{"stdout": "hi\n", "error": null}"#).unwrap();
        assert_eq!(with_null, result("hi\n", None));

        let missing = ExecutionResult::from_wire(r#"{"stdout": ""}"#).unwrap();
        assert_eq!(missing.error, None);
    }

    #[test]
    fn wire_payload_without_stdout_is_rejected() {
        let err = ExecutionResult::from_wire(r#"{"error": "boom"}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Payload(_)));
        assert!(err.to_string().starts_with("malformed result payload"));

        assert!(matches!(
            ExecutionResult::from_wire("not json"),
            Err(BridgeError::Payload(_))
        ));
    }
}
