//! Execution orchestrator: turns run requests into output-pane text.

use crate::execution::python::execute_captured;
use crate::process::PythonRuntime;

/// What the output pane should show. Built by the UI from its mirrored state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputView<'a> {
    Loading,
    Failed(&'a str),
    Placeholder,
    Text(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The runtime was not ready; nothing changed.
    Skipped,
    /// The output was replaced. `failed` is set for program and bridge errors alike.
    Completed { failed: bool },
}

pub struct Orchestrator<R> {
    runtime: R,
    output: String,
}

impl<R: PythonRuntime> Orchestrator<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            output: String::new(),
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Execute `source` and replace the displayed output with the result.
    pub async fn run(&mut self, source: &str) -> RunOutcome {
        if !self.runtime.is_ready() {
            tracing::debug!("run requested before the runtime is ready; ignoring");
            return RunOutcome::Skipped;
        }

        match execute_captured(&mut self.runtime, source).await {
            Ok(result) => {
                tracing::info!(
                    stdout_bytes = result.stdout.len(),
                    error = result.is_error(),
                    "run finished"
                );
                self.output = result.display_text();
                RunOutcome::Completed {
                    failed: result.is_error(),
                }
            }
            Err(e) => {
                tracing::warn!("run failed at the bridge: {e}");
                self.output = e.to_string();
                RunOutcome::Completed { failed: true }
            }
        }
    }

    /// Reset the displayed output. Leaves the source and namespace alone.
    pub fn clear(&mut self) {
        self.output.clear();
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::execution::BridgeError;

    /// Scripted runtime: records every snippet and answers from a queue.
    #[derive(Default)]
    struct ScriptedRuntime {
        ready: bool,
        installed: bool,
        seen: Vec<String>,
        answers: VecDeque<Result<Option<String>, BridgeError>>,
    }

    impl ScriptedRuntime {
        fn ready() -> Self {
            Self {
                ready: true,
                ..Self::default()
            }
        }

        fn answer(mut self, answer: Result<Option<String>, BridgeError>) -> Self {
            self.answers.push_back(answer);
            self
        }
    }

    impl PythonRuntime for ScriptedRuntime {
        fn is_ready(&self) -> bool {
            self.ready
        }

        async fn run_python(&mut self, code: &str) -> Result<Option<String>, BridgeError> {
            self.seen.push(code.to_string());
            if code.contains("except NameError") {
                return Ok(None);
            }
            self.answers.pop_front().unwrap_or(Ok(None))
        }

        fn adapter_installed(&self) -> bool {
            self.installed
        }

        fn mark_adapter_installed(&mut self) {
            self.installed = true;
        }
    }

    fn payload(json: &str) -> Result<Option<String>, BridgeError> {
        Ok(Some(json.to_string()))
    }

    #[tokio::test]
    async fn not_ready_run_changes_nothing() {
        let mut orch = Orchestrator::new(ScriptedRuntime::default());
        assert_eq!(orch.run("print(1)").await, RunOutcome::Skipped);
        assert_eq!(orch.output(), "");
        assert!(orch.runtime().seen.is_empty());
    }

    #[tokio::test]
    async fn successful_run_shows_stdout() {
        let rt = ScriptedRuntime::ready().answer(payload(r#"{"stdout": "2\n", "error": null}"#));
        let mut orch = Orchestrator::new(rt);

        assert_eq!(orch.run("print(1+1)").await, RunOutcome::Completed { failed: false });
        assert_eq!(orch.output(), "2\n");
    }

    #[tokio::test]
    async fn silent_run_shows_no_output_marker() {
        let rt = ScriptedRuntime::ready().answer(payload(r#"{"stdout": "", "error": null}"#));
        let mut orch = Orchestrator::new(rt);
        orch.run("x = 5").await;
        assert_eq!(orch.output(), "(no output)");
    }

    #[tokio::test]
    async fn program_error_is_rendered_after_stdout() {
        let rt = ScriptedRuntime::ready().answer(payload(
            r#"{"stdout": "start\n", "error": "Traceback (most recent call last):\nZeroDivisionError: division by zero\n"}"#,
        ));
        let mut orch = Orchestrator::new(rt);

        assert_eq!(orch.run("print('start')\n1/0").await, RunOutcome::Completed { failed: true });
        assert_eq!(
            orch.output(),
            "start\n\nTraceback (most recent call last):\nZeroDivisionError: division by zero\n"
        );
    }

    #[tokio::test]
    async fn bridge_error_is_shown_raw() {
        let rt = ScriptedRuntime::ready().answer(Err(BridgeError::Disconnected));
        let mut orch = Orchestrator::new(rt);

        assert_eq!(orch.run("print(1)").await, RunOutcome::Completed { failed: true });
        assert_eq!(orch.output(), "interpreter process exited");
    }

    #[tokio::test]
    async fn malformed_payload_is_a_bridge_error() {
        let rt = ScriptedRuntime::ready().answer(payload("{\"out\": 1}"));
        let mut orch = Orchestrator::new(rt);
        orch.run("print(1)").await;
        assert!(orch.output().starts_with("malformed result payload"));
    }

    #[tokio::test]
    async fn adapter_installed_once_across_runs() {
        let rt = ScriptedRuntime::ready()
            .answer(payload(r#"{"stdout": "", "error": null}"#))
            .answer(payload(r#"{"stdout": "5\n", "error": null}"#));
        let mut orch = Orchestrator::new(rt);

        orch.run("x = 5").await;
        orch.run("print(x)").await;

        let seen = &orch.runtime().seen;
        let installs = seen.iter().filter(|c| c.contains("except NameError")).count();
        assert_eq!(installs, 1);
        assert_eq!(seen.len(), 3);
        assert!(seen[2].contains("_exec_and_capture(\"print(x)\")"));
    }

    #[tokio::test]
    async fn new_run_replaces_previous_output() {
        let rt = ScriptedRuntime::ready()
            .answer(payload(r#"{"stdout": "first\n", "error": null}"#))
            .answer(payload(r#"{"stdout": "second\n", "error": null}"#));
        let mut orch = Orchestrator::new(rt);

        orch.run("print('first')").await;
        orch.run("print('second')").await;
        assert_eq!(orch.output(), "second\n");
    }

    #[tokio::test]
    async fn clear_is_idempotent_and_touches_only_output() {
        let rt = ScriptedRuntime::ready().answer(payload(r#"{"stdout": "hi\n", "error": null}"#));
        let mut orch = Orchestrator::new(rt);
        orch.run("print('hi')").await;
        let calls_before = orch.runtime().seen.len();

        orch.clear();
        orch.clear();
        assert_eq!(orch.output(), "");
        assert_eq!(orch.runtime().seen.len(), calls_before);
    }
}
