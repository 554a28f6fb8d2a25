//! TUI application state management.

use std::time::{Duration, Instant};

use super::editor::Editor;
use crate::orchestrator::OutputView;

const DOUBLE_CTRL_C_TIMEOUT: Duration = Duration::from_millis(500);

const READY_HINT: &str = "Ctrl+R run | Ctrl+L clear | F1 help | Ctrl+Q quit";

/// Interpreter session as seen from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeStatus {
    Loading,
    Ready { version: String },
    Failed(String),
}

/// Application state for the TUI
#[derive(Debug)]
pub struct App {
    /// The source document
    pub editor: Editor,
    /// Mirror of the orchestrator's displayed output
    pub output: String,
    /// Whether the displayed output came from a failed run
    pub last_run_failed: bool,
    pub runtime: RuntimeStatus,
    /// A run has been handed to the worker and not answered yet
    pub running: bool,
    pub show_help: bool,
    /// Lines scrolled off the top of the output pane
    pub output_scroll: u16,
    /// Height of the editor viewport from the last draw, for paging
    pub editor_height: usize,
    pub status_message: String,
    /// Frame counter for the loading spinner
    pub tick: usize,
    /// Timestamp of last Ctrl+C press for double Ctrl+C detection
    pub last_ctrl_c_time: Option<Instant>,
}

impl App {
    pub fn new(source: &str, tab_width: usize) -> Self {
        Self {
            editor: Editor::new(source, tab_width),
            output: String::new(),
            last_run_failed: false,
            runtime: RuntimeStatus::Loading,
            running: false,
            show_help: false,
            output_scroll: 0,
            editor_height: 10,
            status_message: "Loading Python runtime...".to_string(),
            tick: 0,
            last_ctrl_c_time: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.runtime, RuntimeStatus::Ready { .. })
    }

    /// Run and Clear are only available with a ready runtime and no run in flight.
    pub fn controls_enabled(&self) -> bool {
        self.is_ready() && !self.running
    }

    pub fn runtime_ready(&mut self, version: String) {
        self.status_message = format!("Python {version} | {READY_HINT}");
        self.runtime = RuntimeStatus::Ready { version };
    }

    pub fn runtime_failed(&mut self, message: String) {
        self.status_message = "Python runtime unavailable | Ctrl+Q quit".to_string();
        self.runtime = RuntimeStatus::Failed(message);
    }

    /// Take a snapshot of the source for a run, or `None` if Run is disabled.
    pub fn request_run(&mut self) -> Option<String> {
        if !self.controls_enabled() {
            tracing::debug!(running = self.running, "run trigger ignored");
            return None;
        }
        self.running = true;
        self.status_message = "Running...".to_string();
        Some(self.editor.text())
    }

    pub fn finish_run(&mut self, output: String, failed: bool) {
        self.running = false;
        self.output = output;
        self.last_run_failed = failed;
        self.output_scroll = 0;
        self.restore_status();
    }

    pub fn skip_run(&mut self) {
        self.running = false;
        self.restore_status();
    }

    /// Whether a Clear request should be sent.
    pub fn request_clear(&mut self) -> bool {
        self.controls_enabled()
    }

    pub fn cleared(&mut self) {
        self.output.clear();
        self.last_run_failed = false;
        self.output_scroll = 0;
    }

    fn restore_status(&mut self) {
        self.status_message = match &self.runtime {
            RuntimeStatus::Ready { version } => format!("Python {version} | {READY_HINT}"),
            RuntimeStatus::Loading => "Loading Python runtime...".to_string(),
            RuntimeStatus::Failed(_) => "Python runtime unavailable | Ctrl+Q quit".to_string(),
        };
    }

    pub fn output_view(&self) -> OutputView<'_> {
        match &self.runtime {
            RuntimeStatus::Loading => OutputView::Loading,
            RuntimeStatus::Failed(message) => OutputView::Failed(message),
            RuntimeStatus::Ready { .. } if self.output.is_empty() => OutputView::Placeholder,
            RuntimeStatus::Ready { .. } => OutputView::Text(&self.output),
        }
    }

    /// Toggle help display
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn scroll_output_up(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    pub fn scroll_output_down(&mut self) {
        let max = self.output.lines().count().saturating_sub(1);
        if (self.output_scroll as usize) < max {
            self.output_scroll += 1;
        }
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Handle Ctrl+C press and detect double press for quit
    /// Returns true if should quit (double Ctrl+C), false otherwise
    pub fn handle_ctrl_c(&mut self) -> bool {
        let now = Instant::now();

        if let Some(last_time) = self.last_ctrl_c_time {
            if now.duration_since(last_time) <= DOUBLE_CTRL_C_TIMEOUT {
                self.last_ctrl_c_time = None;
                return true;
            }
        }

        self.last_ctrl_c_time = Some(now);
        self.status_message = "Press Ctrl+C again to quit".to_string();
        false
    }
}
