//! Line-based text buffer backing the editor pane.

use crate::utils::unicode::{char_to_byte_index, prefix_width};

#[derive(Debug, Clone)]
pub struct Editor {
    lines: Vec<String>,
    /// Cursor line.
    row: usize,
    /// Cursor position within the line, in chars.
    col: usize,
    /// First visible line.
    pub scroll_row: usize,
    /// First visible display column.
    pub scroll_col: usize,
    tab_width: usize,
}

impl Editor {
    pub fn new(text: &str, tab_width: usize) -> Self {
        let mut lines: Vec<String> = text
            .replace("\r\n", "\n")
            .split('\n')
            .map(str::to_string)
            .collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            row: 0,
            col: 0,
            scroll_row: 0,
            scroll_col: 0,
            tab_width: tab_width.max(1),
        }
    }

    /// The whole document.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn line_chars(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn current_byte(&self) -> usize {
        char_to_byte_index(&self.lines[self.row], self.col)
    }

    /// Display column of the cursor, accounting for wide characters.
    pub fn cursor_display_col(&self) -> usize {
        prefix_width(&self.lines[self.row], self.col)
    }

    pub fn insert_char(&mut self, c: char) {
        match c {
            '\n' => self.newline(),
            '\r' => {}
            '\t' => self.indent(),
            c => {
                let at = self.current_byte();
                self.lines[self.row].insert(at, c);
                self.col += 1;
            }
        }
    }

    /// Insert pasted text verbatim (no auto-indent).
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut pieces = text.split('\n');
        if let Some(first) = pieces.next() {
            let at = self.current_byte();
            self.lines[self.row].insert_str(at, first);
            self.col += first.chars().count();
        }
        for piece in pieces {
            self.split_line();
            self.lines[self.row].insert_str(0, piece);
            self.col = piece.chars().count();
        }
    }

    fn split_line(&mut self) {
        let at = self.current_byte();
        let rest = self.lines[self.row].split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    /// Break the line, carrying indentation over and indenting after a `:`.
    pub fn newline(&mut self) {
        let head = &self.lines[self.row][..self.current_byte()];
        let mut indent: String = head.chars().take_while(|c| *c == ' ').collect();
        if head.trim_end().ends_with(':') {
            indent.push_str(&" ".repeat(self.tab_width));
        }
        self.split_line();
        self.lines[self.row].insert_str(0, &indent);
        self.col = indent.chars().count();
    }

    /// Insert spaces up to the next tab stop.
    pub fn indent(&mut self) {
        let pad = self.tab_width - (self.col % self.tab_width);
        let at = self.current_byte();
        self.lines[self.row].insert_str(at, &" ".repeat(pad));
        self.col += pad;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let line = &self.lines[self.row];
            let before: String = line.chars().take(self.col).collect();
            // Inside leading whitespace, drop back to the previous tab stop.
            let remove = if !before.is_empty() && before.chars().all(|c| c == ' ') {
                let over = self.col % self.tab_width;
                if over == 0 { self.tab_width } else { over }
            } else {
                1
            };
            for _ in 0..remove {
                self.col -= 1;
                let at = self.current_byte();
                self.lines[self.row].remove(at);
            }
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_chars(self.row);
            self.lines[self.row].push_str(&current);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_chars(self.row) {
            let at = self.current_byte();
            self.lines[self.row].remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_chars(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_chars(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_chars(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_chars(self.row));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_chars(self.row);
    }

    pub fn page_up(&mut self, height: usize) {
        self.row = self.row.saturating_sub(height.max(1));
        self.col = self.col.min(self.line_chars(self.row));
    }

    pub fn page_down(&mut self, height: usize) {
        self.row = (self.row + height.max(1)).min(self.lines.len() - 1);
        self.col = self.col.min(self.line_chars(self.row));
    }

    /// Adjust scroll offsets so the cursor stays inside a `width` x `height` view.
    pub fn ensure_visible(&mut self, width: usize, height: usize) {
        if height > 0 {
            if self.row < self.scroll_row {
                self.scroll_row = self.row;
            } else if self.row >= self.scroll_row + height {
                self.scroll_row = self.row + 1 - height;
            }
        }
        if width > 0 {
            let col = self.cursor_display_col();
            if col < self.scroll_col {
                self.scroll_col = col;
            } else if col >= self.scroll_col + width {
                self.scroll_col = col + 1 - width;
            }
        }
    }
}
