//! Text editing buffer behind the form's edit mode.
//!
//! The cursor is a byte offset that always sits on a char boundary.
//! Multiline fields (CP, TP) insert `\n` through `insert_newline`.

#[derive(Debug, Default)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing an existing value with the cursor at its end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let content = text.into();
        let cursor = content.len();
        Self { content, cursor }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.cursor = self.content.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.content.len())
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.next_boundary();
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor = self.next_boundary();
        }
    }

    /// Start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.content[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    /// End of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.content[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.content.len());
    }

    /// Take the content out, resetting the buffer.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Content with a caret glyph spliced in at the cursor, for rendering.
    pub fn with_caret(&self, caret: char) -> String {
        let mut shown = String::with_capacity(self.content.len() + caret.len_utf8());
        shown.push_str(&self.content[..self.cursor]);
        shown.push(caret);
        shown.push_str(&self.content[self.cursor..]);
        shown
    }
}
