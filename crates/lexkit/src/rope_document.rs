//! Rope-backed UTF-8 document.
//!
//! Text and the line index live in a [`ropey::Rope`], which gives O(log N) line lookup
//! and editing on large buffers. Only LF and CRLF break lines, matching the lexer line
//! model.

use crate::document::{Document, Encoding, StyleId};
use crate::error::DocumentError;
use crate::fold::FoldLevel;
use ropey::Rope;

/// UTF-8 document whose text lives in a rope.
#[derive(Debug, Clone)]
pub struct RopeDocument {
    rope: Rope,
    styles: Vec<StyleId>,
    line_states: Vec<i32>,
    levels: Vec<FoldLevel>,
}

impl RopeDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Build a document from text.
    pub fn from_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let lines = rope.len_lines();
        Self {
            styles: vec![0; rope.len_bytes()],
            line_states: vec![0; lines],
            levels: vec![FoldLevel::BASE; lines],
            rope,
        }
    }

    /// The underlying rope.
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Get complete text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// All styles, one per byte.
    pub fn styles(&self) -> &[StyleId] {
        &self.styles
    }

    /// Insert text at byte offset `pos`.
    pub fn insert(&mut self, pos: usize, text: &str) -> Result<(), DocumentError> {
        self.check_boundary(pos)?;
        let line = self.first_shifted_line(pos);
        let added_lines = text.bytes().filter(|b| *b == b'\n').count();

        let char_idx = self.rope.byte_to_char(pos);
        self.rope.insert(char_idx, text);
        self.styles
            .splice(pos..pos, std::iter::repeat_n(0, text.len()));
        self.line_states
            .splice(line..line, std::iter::repeat_n(0, added_lines));
        self.levels
            .splice(line..line, std::iter::repeat_n(FoldLevel::BASE, added_lines));
        Ok(())
    }

    /// Insert raw bytes, which must be UTF-8.
    pub fn insert_bytes(&mut self, pos: usize, bytes: &[u8]) -> Result<(), DocumentError> {
        let text = std::str::from_utf8(bytes).map_err(|_| DocumentError::InvalidUtf8)?;
        self.insert(pos, text)
    }

    /// Delete `len` bytes starting at byte offset `pos`.
    pub fn delete(&mut self, pos: usize, len: usize) -> Result<(), DocumentError> {
        let end = pos.checked_add(len).ok_or(DocumentError::OutOfRange {
            pos: usize::MAX,
            len: self.rope.len_bytes(),
        })?;
        self.check_boundary(pos)?;
        self.check_boundary(end)?;
        let removed_lines = self.rope.byte_to_line(end) - self.rope.byte_to_line(pos);
        let line = self.first_shifted_line(pos);

        let start_char = self.rope.byte_to_char(pos);
        let end_char = self.rope.byte_to_char(end);
        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
        self.styles.drain(pos..end);
        self.line_states.drain(line..line + removed_lines);
        self.levels.drain(line..line + removed_lines);
        Ok(())
    }

    /// Per-line table index where an edit at `pos` adds or removes entries.
    fn first_shifted_line(&self, pos: usize) -> usize {
        let line = self.rope.byte_to_line(pos);
        if self.rope.line_to_byte(line) == pos {
            line
        } else {
            line + 1
        }
    }

    fn check_boundary(&self, pos: usize) -> Result<(), DocumentError> {
        let len = self.rope.len_bytes();
        if pos > len {
            return Err(DocumentError::OutOfRange { pos, len });
        }
        if pos < len && self.rope.byte(pos) & 0xC0 == 0x80 {
            return Err(DocumentError::SplitsCharacter(pos));
        }
        Ok(())
    }
}

impl Default for RopeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for RopeDocument {
    fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        (pos < self.rope.len_bytes()).then(|| self.rope.byte(pos))
    }

    fn style_at(&self, pos: usize) -> StyleId {
        self.styles.get(pos).copied().unwrap_or(0)
    }

    fn set_style_range(&mut self, start: usize, end: usize, style: StyleId) {
        let end = end.min(self.styles.len());
        if start < end {
            self.styles[start..end].fill(style);
        }
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_from_position(&self, pos: usize) -> usize {
        self.rope.byte_to_line(pos.min(self.rope.len_bytes()))
    }

    fn line_start(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_bytes();
        }
        self.rope.line_to_byte(line)
    }

    fn line_state(&self, line: usize) -> i32 {
        self.line_states.get(line).copied().unwrap_or(0)
    }

    fn set_line_state(&mut self, line: usize, state: i32) -> i32 {
        match self.line_states.get_mut(line) {
            Some(slot) => std::mem::replace(slot, state),
            None => 0,
        }
    }

    fn level(&self, line: usize) -> FoldLevel {
        self.levels.get(line).copied().unwrap_or(FoldLevel::BASE)
    }

    fn set_level(&mut self, line: usize, level: FoldLevel) {
        if let Some(slot) = self.levels.get_mut(line) {
            *slot = level;
        }
    }

    fn encoding(&self) -> Encoding {
        Encoding::Utf8
    }
}
