//! Multi-line text buffer backing the source pane.
//!
//! Lines are split on `\n` only. A `\r` stays part of its line, so text set
//! from a file comes back out of [`TextBuffer::text`] byte for byte. The cursor
//! column counts chars, not bytes, so multi-byte input never splits a code point.

/// Editable source text with a single cursor.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

fn byte_offset(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map(|(i, _)| i).unwrap_or(line.len())
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

impl TextBuffer {
    /// Replaces the whole buffer and puts the cursor at the start.
    ///
    /// The text is kept verbatim, carriage returns included.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_owned).collect();
        self.row = 0;
        self.col = 0;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The buffer contents, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// `(row, col)` of the cursor; `col` is a char index.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let line = &mut self.lines[self.row];
        let at = byte_offset(line, self.col);
        line.insert(at, c);
        self.col += 1;
    }

    pub fn insert_newline(&mut self) {
        let line = &mut self.lines[self.row];
        let at = byte_offset(line, self.col);
        let rest = line.split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    /// Inserts pasted text at the cursor.
    ///
    /// Terminals deliver pasted newlines as CR or CRLF, so both become LF here.
    pub fn insert_str(&mut self, text: &str) {
        let normalised = text.replace("\r\n", "\n").replace('\r', "\n");
        for c in normalised.chars() {
            self.insert_char(c);
        }
    }

    /// Deletes the char before the cursor, joining lines at column 0.
    pub fn backspace(&mut self) {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let at = byte_offset(line, self.col - 1);
            line.remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = char_len(&self.lines[self.row]);
            self.lines[self.row].push_str(&current);
        }
    }

    /// Deletes the char under the cursor, joining the next line at end of line.
    pub fn delete(&mut self) {
        let len = char_len(&self.lines[self.row]);
        if self.col < len {
            let line = &mut self.lines[self.row];
            let at = byte_offset(line, self.col);
            line.remove(at);
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
            self.col = char_len(&self.lines[self.row]);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < char_len(&self.lines[self.row]) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(char_len(&self.lines[self.row]));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(char_len(&self.lines[self.row]));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = char_len(&self.lines[self.row]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_newlines_round_trip() {
        let mut buf = TextBuffer::default();
        buf.insert_str("def f():\n  pass");
        assert_eq!(buf.text(), "def f():\n  pass");
        assert_eq!(buf.cursor(), (1, 6));
    }

    #[test]
    fn set_text_keeps_carriage_returns() {
        let mut buf = TextBuffer::default();
        let contents = "a = 1\r\nb = '\r'\r\n";
        buf.set_text(contents);
        assert_eq!(buf.lines(), &["a = 1\r", "b = '\r'\r", ""]);
        assert_eq!(buf.text(), contents);
    }

    #[test]
    fn pasted_line_endings_become_newlines() {
        let mut buf = TextBuffer::default();
        buf.insert_str("a\r\nb\rc");
        assert_eq!(buf.lines(), &["a", "b", "c"]);
    }

    #[test]
    fn backspace_joins_lines() {
        let mut buf = TextBuffer::default();
        buf.insert_str("ab\ncd");
        buf.move_home();
        buf.backspace();
        assert_eq!(buf.text(), "abcd");
        assert_eq!(buf.cursor(), (0, 2));
    }

    #[test]
    fn delete_at_end_of_line_joins_next() {
        let mut buf = TextBuffer::default();
        buf.set_text("ab\ncd");
        buf.move_end();
        buf.delete();
        assert_eq!(buf.text(), "abcd");
    }

    #[test]
    fn multibyte_chars_are_edited_by_char() {
        let mut buf = TextBuffer::default();
        buf.insert_str("héllo");
        buf.move_left();
        buf.move_left();
        buf.move_left();
        buf.backspace();
        assert_eq!(buf.text(), "hllo");
        buf.insert_char('é');
        assert_eq!(buf.text(), "héllo");
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let mut buf = TextBuffer::default();
        buf.set_text("long line\nab");
        buf.move_end();
        buf.move_down();
        assert_eq!(buf.cursor(), (1, 2));
        buf.move_up();
        assert_eq!(buf.cursor(), (0, 2));
    }

    #[test]
    fn blank_detection() {
        let mut buf = TextBuffer::default();
        assert!(buf.is_blank());
        buf.set_text("  \n\t");
        assert!(buf.is_blank());
        buf.insert_char('x');
        assert!(!buf.is_blank());
        buf.clear();
        assert_eq!(buf.text(), "");
    }
}
