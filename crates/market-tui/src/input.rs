//! Single-line text input used by the search box and the command palette

use crossterm::event::{KeyCode, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// Editable line of text with a byte-indexed cursor that always sits on a
/// char boundary
#[derive(Debug, Default, Clone)]
pub struct TextInput {
    pub text: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Text before the cursor, the char under it, and the text after that
    pub fn split_at_cursor(&self) -> (&str, Option<char>, &str) {
        let (before, after) = self.text.split_at(self.cursor);
        let mut chars = after.chars();
        let current = chars.next();
        (before, current, chars.as_str())
    }

    /// Terminal columns taken by the text before the cursor
    pub fn cursor_column(&self) -> usize {
        self.text[..self.cursor].width()
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_char_before(&mut self) {
        let start = self.prev_boundary();
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn delete_char_at(&mut self) {
        let end = self.next_boundary();
        self.text.drain(self.cursor..end);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn move_word_left(&mut self) {
        self.cursor = self.word_start_before();
    }

    pub fn move_word_right(&mut self) {
        self.cursor = self.word_end_after();
    }

    pub fn delete_word_before(&mut self) {
        let start = self.word_start_before();
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Apply an editing key. Returns true when the key was consumed.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        // macOS Option may arrive as SUPER
        let word = modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SUPER);

        match code {
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char('w') if ctrl => self.delete_word_before(),
            KeyCode::Backspace if word => self.delete_word_before(),
            KeyCode::Char('a') if ctrl => self.move_start(),
            KeyCode::Char('e') if ctrl => self.move_end(),
            KeyCode::Char('b') if word => self.move_word_left(),
            KeyCode::Char('f') if word => self.move_word_right(),
            KeyCode::Left if word || ctrl => self.move_word_left(),
            KeyCode::Right if word || ctrl => self.move_word_right(),
            KeyCode::Home => self.move_start(),
            KeyCode::End => self.move_end(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Backspace => self.delete_char_before(),
            KeyCode::Delete => self.delete_char_at(),
            KeyCode::Char(c) if !ctrl && !word => self.insert_char(c),
            _ => return false,
        }
        true
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |c| self.cursor + c.len_utf8())
    }

    /// Start of the word left of the cursor, skipping separators first
    fn word_start_before(&self) -> usize {
        let before = &self.text[..self.cursor];
        let mut chars = before.char_indices().rev().peekable();
        while chars.next_if(|(_, c)| is_separator(*c)).is_some() {}
        let mut start = 0;
        for (i, c) in chars {
            if is_separator(c) {
                start = i + c.len_utf8();
                break;
            }
        }
        start
    }

    /// End of the word right of the cursor, skipping separators first
    fn word_end_after(&self) -> usize {
        let after = &self.text[self.cursor..];
        let mut chars = after.char_indices().peekable();
        while chars.next_if(|(_, c)| is_separator(*c)).is_some() {}
        let end = chars
            .find(|(_, c)| is_separator(*c))
            .map_or(after.len(), |(i, _)| i);
        self.cursor + end
    }
}

/// Whitespace and the punctuation that separates search terms
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '/' | ',' | '，' | '。' | '、' | '·')
}
