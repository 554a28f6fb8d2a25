//! Plain text printer for headless runs.

use std::io::{self, Write};

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

pub struct TextPrinter {
    pub color: Option<&'static str>,
}

impl TextPrinter {
    /// Color only when stdout is a terminal.
    pub fn for_stdout(color: Option<&'static str>) -> Self {
        let color = if io::stdout().is_terminal() { color } else { None };
        Self { color }
    }

    /// `text` with exactly one trailing newline, colored if requested.
    pub fn render(&self, text: &str) -> String {
        let body = text.strip_suffix('\n').unwrap_or(text);
        let body = match self.color {
            Some("red") => body.red().to_string(),
            Some("green") => body.green().to_string(),
            Some("yellow") => body.yellow().to_string(),
            Some("cyan") => body.cyan().to_string(),
            _ => body.to_string(),
        };
        format!("{body}\n")
    }

    pub fn print(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(self.render(text).as_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_single_trailing_newline() {
        let plain = TextPrinter { color: None };
        assert_eq!(plain.render("2\n"), "2\n");
        assert_eq!(plain.render("(no output)"), "(no output)\n");
        assert_eq!(plain.render("a\n\n"), "a\n\n");
    }

    #[test]
    fn colors_with_ansi_codes() {
        let red = TextPrinter { color: Some("red") };
        let shown = red.render("Traceback\n");
        assert!(shown.starts_with("\u{1b}["));
        assert!(shown.contains("Traceback"));
        assert!(shown.ends_with('\n'));
    }
}
