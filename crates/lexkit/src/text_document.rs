//! A plain byte-vector document.
//!
//! `TextDocument` accepts any bytes, so it can hold legacy code page text as well as
//! UTF-8. It is the document the conformance harness lexes.

use crate::document::{Document, Encoding, StyleId, scan_line_starts};
use crate::error::DocumentError;
use crate::fold::FoldLevel;

/// In-memory document backed by a `Vec<u8>` and a line-start table.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    text: Vec<u8>,
    styles: Vec<StyleId>,
    line_starts: Vec<usize>,
    line_states: Vec<i32>,
    levels: Vec<FoldLevel>,
    encoding: Encoding,
}

impl TextDocument {
    /// Create an empty UTF-8 document.
    pub fn new() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Create a UTF-8 document from text.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes().to_vec())
    }

    /// Create a document from raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mut doc = Self {
            encoding: Encoding::Utf8,
            ..Self::default()
        };
        doc.set_bytes(bytes);
        doc
    }

    /// Builder-style encoding override.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Change the encoding lexers will see.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    /// Replace the whole text, resetting styles, line states and levels.
    pub fn set_text(&mut self, text: &str) {
        self.set_bytes(text.as_bytes().to_vec());
    }

    /// Replace the whole content with raw bytes, resetting all side tables.
    pub fn set_bytes(&mut self, bytes: Vec<u8>) {
        self.styles = vec![0; bytes.len()];
        self.line_starts = scan_line_starts(&bytes);
        self.line_states = vec![0; self.line_starts.len()];
        self.levels = vec![FoldLevel::BASE; self.line_starts.len()];
        self.text = bytes;
    }

    /// The raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.text
    }

    /// The text, with invalid UTF-8 replaced.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.text).into_owned()
    }

    /// All styles, one per byte.
    pub fn styles(&self) -> &[StyleId] {
        &self.styles
    }

    /// Whether `pos` is a character boundary in this document's encoding.
    pub fn is_char_boundary(&self, pos: usize) -> bool {
        if pos == 0 || pos >= self.text.len() {
            return pos <= self.text.len();
        }
        match self.encoding {
            Encoding::EightBit => true,
            Encoding::Utf8 => self.text[pos] & 0xC0 != 0x80,
            Encoding::Dbcs(_) => {
                // Trail bytes can look like anything, so walk from the line start.
                let mut p = self.line_start(self.line_from_position(pos));
                while p < pos {
                    p += self.char_and_width(p).1;
                }
                p == pos
            }
        }
    }

    /// Insert `bytes` at `pos`.
    ///
    /// Inserted bytes get style 0; lines created by the insertion get line state 0 and
    /// the base fold level.
    pub fn insert(&mut self, pos: usize, bytes: &[u8]) -> Result<(), DocumentError> {
        self.check_boundary(pos)?;
        let line = self.first_shifted_line(pos);
        let added_lines = bytes.iter().filter(|b| **b == b'\n').count();

        self.text.splice(pos..pos, bytes.iter().copied());
        self.styles
            .splice(pos..pos, std::iter::repeat_n(0, bytes.len()));
        self.line_states
            .splice(line..line, std::iter::repeat_n(0, added_lines));
        self.levels
            .splice(line..line, std::iter::repeat_n(FoldLevel::BASE, added_lines));
        self.line_starts = scan_line_starts(&self.text);
        Ok(())
    }

    /// Insert UTF-8 text at `pos`.
    pub fn insert_str(&mut self, pos: usize, text: &str) -> Result<(), DocumentError> {
        self.insert(pos, text.as_bytes())
    }

    /// Delete `len` bytes starting at `pos`.
    pub fn delete(&mut self, pos: usize, len: usize) -> Result<(), DocumentError> {
        let end = pos.checked_add(len).ok_or(DocumentError::OutOfRange {
            pos: usize::MAX,
            len: self.text.len(),
        })?;
        self.check_boundary(pos)?;
        self.check_boundary(end)?;
        let line = self.first_shifted_line(pos);
        let removed_lines = self.text[pos..end].iter().filter(|b| **b == b'\n').count();

        self.text.drain(pos..end);
        self.styles.drain(pos..end);
        self.line_states.drain(line..line + removed_lines);
        self.levels.drain(line..line + removed_lines);
        self.line_starts = scan_line_starts(&self.text);
        Ok(())
    }

    /// Index in the per-line tables where lines are added or removed by an edit at `pos`.
    ///
    /// An edit at a line start moves that whole line, so its entry moves with it.
    fn first_shifted_line(&self, pos: usize) -> usize {
        let line = self.line_from_position(pos);
        if self.line_start(line) == pos {
            line
        } else {
            line + 1
        }
    }

    fn check_boundary(&self, pos: usize) -> Result<(), DocumentError> {
        if pos > self.text.len() {
            return Err(DocumentError::OutOfRange {
                pos,
                len: self.text.len(),
            });
        }
        if !self.is_char_boundary(pos) {
            return Err(DocumentError::SplitsCharacter(pos));
        }
        Ok(())
    }
}

impl Document for TextDocument {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.text.get(pos).copied()
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
        self.line_starts.len()
    }

    fn line_from_position(&self, pos: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= pos) - 1
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_starts
            .get(line)
            .copied()
            .unwrap_or(self.text.len())
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
        self.encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_model() {
        let doc = TextDocument::from_text("ab\r\ncd\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_start(1), 4);
        assert_eq!(doc.line_start(2), 7);
        assert_eq!(doc.line_start(9), 7);
        assert_eq!(doc.line_end(0), 2);
        assert_eq!(doc.line_end(1), 6);
        assert_eq!(doc.line_end(2), 7);
        assert_eq!(doc.line_from_position(3), 0);
        assert_eq!(doc.line_from_position(4), 1);
        assert_eq!(doc.line_from_position(100), 2);
    }

    #[test]
    fn test_out_of_range_reads_are_safe() {
        let mut doc = TextDocument::from_text("x");
        assert_eq!(doc.byte_at(1), None);
        assert_eq!(doc.style_at(5), 0);
        assert_eq!(doc.line_state(3), 0);
        assert_eq!(doc.set_line_state(3, 7), 0);
        doc.set_style_range(0, 10, 4);
        assert_eq!(doc.styles(), &[4]);
    }

    #[test]
    fn test_insert_and_delete_keep_side_tables_aligned() {
        let mut doc = TextDocument::from_text("a\nb\nc");
        doc.set_line_state(0, 10);
        doc.set_line_state(1, 11);
        doc.set_line_state(2, 12);
        doc.set_style_range(0, 5, 3);

        doc.insert_str(2, "x\ny\n").unwrap();
        assert_eq!(doc.bytes(), b"a\nx\ny\nb\nc");
        assert_eq!(doc.line_count(), 5);
        assert_eq!(doc.line_state(1), 0);
        assert_eq!(doc.line_state(2), 0);
        assert_eq!(doc.line_state(3), 11);
        assert_eq!(doc.style_at(2), 0);
        assert_eq!(doc.style_at(6), 3);

        doc.delete(2, 4).unwrap();
        assert_eq!(doc.bytes(), b"a\nb\nc");
        assert_eq!(doc.line_state(1), 11);
        assert_eq!(doc.line_state(2), 12);

        // Inside a line the line keeps its entry and the new lines follow it.
        doc.insert_str(3, "\n").unwrap();
        assert_eq!(doc.line_state(1), 11);
        assert_eq!(doc.line_state(2), 0);
        assert_eq!(doc.line_state(3), 12);
        doc.delete(3, 1).unwrap();
        assert_eq!(doc.line_state(2), 12);
    }

    #[test]
    fn test_rejected_edits_leave_document_untouched() {
        let mut doc = TextDocument::from_text("é");
        assert_eq!(
            doc.insert_str(1, "x"),
            Err(DocumentError::SplitsCharacter(1))
        );
        assert_eq!(doc.delete(1, 1), Err(DocumentError::SplitsCharacter(1)));
        assert_eq!(
            doc.delete(0, 5),
            Err(DocumentError::OutOfRange { pos: 5, len: 2 })
        );
        assert_eq!(doc.bytes(), "é".as_bytes());
    }

    #[test]
    fn test_dbcs_boundaries() {
        // Shift-JIS: 0x83 0x41 is one character whose trail byte is 'A'.
        let doc = TextDocument::from_bytes(vec![b'a', 0x83, 0x41, b'b'])
            .with_encoding(Encoding::Dbcs(932));
        assert!(doc.is_char_boundary(1));
        assert!(!doc.is_char_boundary(2));
        assert!(doc.is_char_boundary(3));
        assert_eq!(doc.char_and_width(1), (0x8341, 2));
        assert_eq!(doc.char_and_width(3), (u32::from(b'b'), 1));
    }
}
