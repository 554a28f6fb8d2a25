//! Async event handler for the scratchpad TUI.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc;

use super::{
    app::App,
    events::{TuiEvent, WorkerCommand},
    ui::render_ui,
    worker::run_session_worker,
};
use crate::process::RuntimeConfig;

/// Run the scratchpad until the user quits.
pub async fn run_scratchpad(runtime: RuntimeConfig, source: &str, tab_width: usize) -> Result<()> {
    // Check if we're in a proper terminal environment
    if !io::IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!("TUI mode requires a proper terminal environment"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, tab_width);

    let (event_tx, event_rx) = mpsc::unbounded_channel::<TuiEvent>();
    let (command_tx, command_rx) = mpsc::unbounded_channel::<WorkerCommand>();

    // The interpreter starts loading right away, while the UI is already up.
    let worker = tokio::spawn(run_session_worker(runtime, command_rx, event_tx.clone()));

    let stop_input = Arc::new(AtomicBool::new(false));
    let input = spawn_input_reader(event_tx, stop_input.clone());

    let result = run_app(&mut terminal, &mut app, event_rx, command_tx).await;

    stop_input.store(true, Ordering::Relaxed);
    let _ = input.await;
    // Dropping the worker drops the session, which kills the interpreter.
    worker.abort();

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableBracketedPaste)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Forward terminal input as events; sends `Tick` whenever the poll times out.
fn spawn_input_reader(
    input_tx: mpsc::UnboundedSender<TuiEvent>,
    stop: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !stop.load(Ordering::Relaxed) {
            let event = match event::poll(Duration::from_millis(100)) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => TuiEvent::Key(key),
                    Ok(Event::Paste(text)) => TuiEvent::Paste(text),
                    Ok(Event::Resize(_, _)) => TuiEvent::Resize,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::error!("terminal input error: {e}");
                        break;
                    }
                },
                Ok(false) => TuiEvent::Tick,
                Err(e) => {
                    tracing::error!("terminal poll error: {e}");
                    break;
                }
            };
            if input_tx.send(event).is_err() {
                break; // Channel closed
            }
        }
    })
}

/// Main application loop
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut event_rx: mpsc::UnboundedReceiver<TuiEvent>,
    command_tx: mpsc::UnboundedSender<WorkerCommand>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        let Some(tui_event) = event_rx.recv().await else {
            break;
        };
        match tui_event {
            TuiEvent::Key(key) => {
                if handle_key_event(app, key, &command_tx) {
                    break; // Quit requested
                }
            }
            TuiEvent::Paste(text) => {
                if !app.show_help {
                    app.editor.insert_str(&text);
                }
            }
            TuiEvent::Resize => {}
            TuiEvent::Tick => app.on_tick(),
            TuiEvent::RuntimeReady { version } => app.runtime_ready(version),
            TuiEvent::RuntimeFailed(message) => app.runtime_failed(message),
            TuiEvent::RunFinished { output, failed } => app.finish_run(output, failed),
            TuiEvent::RunSkipped => app.skip_run(),
            TuiEvent::Cleared => app.cleared(),
        }
    }

    Ok(())
}

/// Handle keyboard events. Returns true when the user asked to quit.
fn handle_key_event(
    app: &mut App,
    key: KeyEvent,
    command_tx: &mpsc::UnboundedSender<WorkerCommand>,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Help overlay swallows every key except quit
    if app.show_help {
        match key.code {
            KeyCode::Char('q') if ctrl => return true,
            _ => app.toggle_help(),
        }
        return false;
    }

    match key.code {
        KeyCode::Char('c') if ctrl => return app.handle_ctrl_c(),
        KeyCode::Char('q') if ctrl => return true,
        KeyCode::Char('r') if ctrl => trigger_run(app, command_tx),
        KeyCode::F(5) => trigger_run(app, command_tx),
        KeyCode::Char('l') if ctrl => {
            if app.request_clear() {
                let _ = command_tx.send(WorkerCommand::Clear);
            }
        }
        KeyCode::F(1) => app.toggle_help(),
        KeyCode::Up if ctrl => app.scroll_output_up(),
        KeyCode::Down if ctrl => app.scroll_output_down(),
        KeyCode::Up => app.editor.move_up(),
        KeyCode::Down => app.editor.move_down(),
        KeyCode::Left => app.editor.move_left(),
        KeyCode::Right => app.editor.move_right(),
        KeyCode::Home => app.editor.move_home(),
        KeyCode::End => app.editor.move_end(),
        KeyCode::PageUp => app.editor.page_up(app.editor_height),
        KeyCode::PageDown => app.editor.page_down(app.editor_height),
        KeyCode::Enter => app.editor.newline(),
        KeyCode::Tab => app.editor.indent(),
        KeyCode::Backspace => app.editor.backspace(),
        KeyCode::Delete => app.editor.delete(),
        KeyCode::Char(c) if !ctrl => app.editor.insert_char(c),
        _ => {}
    }

    false
}

fn trigger_run(app: &mut App, command_tx: &mpsc::UnboundedSender<WorkerCommand>) {
    if let Some(source) = app.request_run() {
        if command_tx.send(WorkerCommand::Run(source)).is_err() {
            tracing::error!("session worker is gone");
            app.skip_run();
        }
    }
}
