//! Session worker: owns the interpreter and runs requests one at a time.

use tokio::sync::mpsc;

use super::events::{TuiEvent, WorkerCommand};
use crate::orchestrator::{Orchestrator, RunOutcome};
use crate::process::{InterpreterSession, RuntimeConfig, SessionState};

/// Load the session, then serve commands until the UI hangs up.
pub async fn run_session_worker(
    runtime: RuntimeConfig,
    commands: mpsc::UnboundedReceiver<WorkerCommand>,
    events: mpsc::UnboundedSender<TuiEvent>,
) {
    let mut session = InterpreterSession::new(runtime);
    let state = session.load().await;
    let mut orchestrator = Orchestrator::new(session);

    let announce = match state {
        SessionState::Ready => TuiEvent::RuntimeReady {
            version: orchestrator.runtime().version().unwrap_or_default().to_string(),
        },
        SessionState::Failed(message) => TuiEvent::RuntimeFailed(message),
        SessionState::Uninitialized | SessionState::Loading => {
            TuiEvent::RuntimeFailed("Python runtime did not finish loading".into())
        }
    };
    if events.send(announce).is_err() {
        return;
    }

    serve(&mut orchestrator, commands, events).await;
    tracing::debug!("session worker stopped");
}

/// Command loop, split out so it can run against any runtime.
pub async fn serve<R: crate::process::PythonRuntime>(
    orchestrator: &mut Orchestrator<R>,
    mut commands: mpsc::UnboundedReceiver<WorkerCommand>,
    events: mpsc::UnboundedSender<TuiEvent>,
) {
    while let Some(command) = commands.recv().await {
        let event = match command {
            WorkerCommand::Run(source) => match orchestrator.run(&source).await {
                RunOutcome::Skipped => TuiEvent::RunSkipped,
                RunOutcome::Completed { failed } => TuiEvent::RunFinished {
                    output: orchestrator.output().to_string(),
                    failed,
                },
            },
            WorkerCommand::Clear => {
                orchestrator.clear();
                TuiEvent::Cleared
            }
        };
        if events.send(event).is_err() {
            break; // UI is gone
        }
    }
}
