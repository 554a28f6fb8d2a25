//! UI layout and rendering logic for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use super::app::App;
use crate::orchestrator::OutputView;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Panes sit side by side from this width on, stacked below it.
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 100;

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &mut App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let direction = if main_layout[0].width >= SIDE_BY_SIDE_MIN_WIDTH {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let panes = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_layout[0]);

    render_editor(frame, app, panes[0]);
    render_output(frame, app, panes[1]);
    render_status_bar(frame, app, main_layout[1]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

fn render_editor(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Python Editor")
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let editor = &mut app.editor;
    let gutter = editor.lines().len().to_string().len() + 1;
    let text_width = (inner.width as usize).saturating_sub(gutter);
    let height = inner.height as usize;
    editor.ensure_visible(text_width, height);
    app.editor_height = height;

    let number_style = Style::default().fg(Color::DarkGray);
    let lines: Vec<Line> = editor
        .lines()
        .iter()
        .enumerate()
        .skip(editor.scroll_row)
        .take(height)
        .map(|(i, line)| {
            Line::from(vec![
                Span::styled(format!("{:>w$} ", i + 1, w = gutter - 1), number_style),
                Span::raw(clip_columns(line, editor.scroll_col, text_width)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);

    if !app.show_help && text_width > 0 && height > 0 {
        let (row, _) = editor.cursor();
        let x = inner.x as usize + gutter + editor.cursor_display_col() - editor.scroll_col;
        let y = inner.y as usize + row - editor.scroll_row;
        frame.set_cursor_position((x as u16, y as u16));
    }
}

fn render_output(frame: &mut Frame, app: &App, area: Rect) {
    let (title, title_style) = if app.running {
        ("Output (running...)", Style::default().fg(Color::Yellow))
    } else if app.last_run_failed {
        ("Output (error)", Style::default().fg(Color::LightRed))
    } else {
        ("Output", Style::default())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(title_style.add_modifier(Modifier::BOLD));

    match app.output_view() {
        OutputView::Loading => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let spinner = SPINNER[app.tick % SPINNER.len()];
            let loading = Paragraph::new(vec![
                Line::from(Span::styled(spinner.to_string(), Style::default().fg(Color::Blue))),
                Line::from(""),
                Line::from(Span::styled(
                    "Loading Python runtime...",
                    Style::default().fg(Color::Gray),
                )),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(loading, centered_rect(100, 30, inner));
        }
        OutputView::Failed(message) => {
            let text = format!("Python runtime failed to start\n\n{message}");
            let paragraph = Paragraph::new(text)
                .style(Style::default().fg(Color::LightRed))
                .block(block)
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
        OutputView::Placeholder => {
            let paragraph = Paragraph::new("Press Ctrl+R to run the program.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
        }
        OutputView::Text(text) => {
            let paragraph = Paragraph::new(output_text(text))
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((app.output_scroll, 0));
            frame.render_widget(paragraph, area);
        }
    }
}

/// Split output into display lines. A trailing newline does not add an empty line.
pub fn output_text(text: &str) -> Text<'static> {
    Text::from(
        text.lines()
            .map(|line| Line::from(line.replace('\t', "    ")))
            .collect::<Vec<_>>(),
    )
}

/// The part of `line` between display columns `start` and `start + width`.
fn clip_columns(line: &str, start: usize, width: usize) -> String {
    let mut col = 0;
    let mut out = String::new();
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if col >= start {
            if col + w > start + width {
                break;
            }
            out.push(c);
        }
        col += w;
    }
    out
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status_paragraph = Paragraph::new(app.status_message.as_str())
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_paragraph, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, popup_area);

    let help_lines = vec![
        Line::from("Python Scratchpad Help"),
        Line::from(""),
        Line::from("Run:"),
        Line::from("  Ctrl+R / F5      - Run the editor contents"),
        Line::from("  Ctrl+L           - Clear the output pane"),
        Line::from(""),
        Line::from("Editing:"),
        Line::from("  Arrows, Home/End - Move the cursor"),
        Line::from("  PgUp/PgDn        - Move a page"),
        Line::from("  Tab              - Indent to next tab stop"),
        Line::from("  Enter            - New line (keeps indentation)"),
        Line::from(""),
        Line::from("Output:"),
        Line::from("  Ctrl+↑/Ctrl+↓    - Scroll output"),
        Line::from(""),
        Line::from("Variables persist between runs until you quit."),
        Line::from(""),
        Line::from("  F1               - Toggle this help"),
        Line::from("  Ctrl+Q, Ctrl+C×2 - Quit"),
    ];

    let help_paragraph = Paragraph::new(Text::from(help_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help_paragraph, popup_area);
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn screen(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render_ui(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn trailing_newline_is_not_shown() {
        let text = output_text("2\n");
        assert_eq!(text.lines.len(), 1);
        assert_eq!(text.lines[0].to_string(), "2");
    }

    #[test]
    fn blank_separator_line_is_kept() {
        let text = output_text("out\n\nTraceback\n");
        let rendered: Vec<String> = text.lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(rendered, ["out", "", "Traceback"]);
    }

    #[test]
    fn clips_by_display_columns() {
        assert_eq!(clip_columns("abcdef", 2, 3), "cde");
        assert_eq!(clip_columns("中文字", 2, 2), "文");
        assert_eq!(clip_columns("ab", 5, 3), "");
    }

    #[test]
    fn loading_state_shows_indicator() {
        let mut app = App::new("print(1)", 4);
        let shown = screen(&mut app, 120, 20);
        assert!(shown.contains("Loading Python runtime..."));
        assert!(shown.contains("Python Editor"));
    }

    #[test]
    fn ready_state_shows_output_and_placeholder() {
        let mut app = App::new("print(1+1)", 4);
        app.runtime_ready("3.12.1".into());
        assert!(screen(&mut app, 120, 20).contains("Press Ctrl+R to run"));

        app.request_run();
        app.finish_run("2\n".into(), false);
        let shown = screen(&mut app, 60, 20);
        assert!(shown.contains("print(1+1)"));
        assert!(!shown.contains("Press Ctrl+R to run"));
    }
}
