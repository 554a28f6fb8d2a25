//! Headless handler: one run, output to stdout.

use anyhow::{bail, Result};

use crate::{
    orchestrator::{Orchestrator, RunOutcome},
    printer::TextPrinter,
    process::{InterpreterSession, RuntimeConfig, SessionState},
};

/// Execute `source` once and print what the output pane would show.
///
/// Returns whether the run failed (program error or bridge failure).
pub async fn run(runtime: RuntimeConfig, source: &str) -> Result<bool> {
    let mut session = InterpreterSession::new(runtime);
    if let SessionState::Failed(message) = session.load().await {
        bail!("Python runtime failed to start: {message}");
    }

    let mut orchestrator = Orchestrator::new(session);
    let failed = match orchestrator.run(source).await {
        RunOutcome::Completed { failed } => failed,
        RunOutcome::Skipped => bail!("Python runtime is not ready"),
    };

    let printer = TextPrinter::for_stdout(if failed { Some("red") } else { None });
    printer.print(orchestrator.output())?;
    Ok(failed)
}
