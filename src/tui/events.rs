//! Custom event types for the TUI application.

use crossterm::event::KeyEvent;

/// Events that can occur in the TUI application
#[derive(Debug)]
pub enum TuiEvent {
    /// User keyboard input
    Key(KeyEvent),
    /// Bracketed paste content
    Paste(String),
    /// Terminal resized
    Resize,
    /// No input within the poll interval; drives the loading spinner
    Tick,
    /// Interpreter session finished loading
    RuntimeReady { version: String },
    /// Interpreter session could not be started
    RuntimeFailed(String),
    /// A run completed; `output` replaces the output pane
    RunFinished { output: String, failed: bool },
    /// A run was refused because the session was not ready
    RunSkipped,
    /// Output pane was cleared
    Cleared,
}

/// Requests from the UI to the session worker, handled strictly in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerCommand {
    Run(String),
    Clear,
}
