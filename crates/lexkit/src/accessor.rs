//! `Accessor`: the view of a [`Document`] a lexer or folder works through.
//!
//! Styling is batched: the accessor remembers the first uncoloured position (the segment
//! start) and [`Accessor::colour_to`] colours everything from there through a position in
//! one store.

use crate::document::{Document, Encoding, StyleId};
use crate::fold::FoldLevel;

/// Per-call access to a document with run-based styling.
pub struct Accessor<'d> {
    doc: &'d mut dyn Document,
    start_seg: usize,
    len: usize,
    encoding: Encoding,
}

impl<'d> Accessor<'d> {
    /// Wrap a document for one lex or fold pass.
    pub fn new(doc: &'d mut dyn Document) -> Self {
        let len = doc.len();
        let encoding = doc.encoding();
        Self {
            doc,
            start_seg: 0,
            len,
            encoding,
        }
    }

    /// The wrapped document.
    pub fn document(&self) -> &dyn Document {
        &*self.doc
    }

    /// Document length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Encoding of the document.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The byte at `pos`, 0 past the end.
    pub fn char_at(&self, pos: usize) -> u8 {
        self.doc.byte_at(pos).unwrap_or(0)
    }

    /// The byte at `pos`, or `fallback` past the end.
    pub fn safe_char_at(&self, pos: usize, fallback: u8) -> u8 {
        self.doc.byte_at(pos).unwrap_or(fallback)
    }

    /// Decode the character at `pos`.
    pub fn char_and_width(&self, pos: usize) -> (u32, usize) {
        self.doc.char_and_width(pos)
    }

    /// Position of the character after the one starting at `pos`, stepping over DBCS
    /// trail bytes and UTF-8 continuation bytes as one unit.
    pub fn next_char_pos(&self, pos: usize) -> usize {
        match self.encoding {
            Encoding::EightBit => pos + 1,
            _ => pos + self.doc.char_and_width(pos).1,
        }
    }

    /// Whether `byte` is a DBCS lead byte.
    pub fn is_lead_byte(&self, byte: u8) -> bool {
        self.encoding.is_lead_byte(byte)
    }

    /// Style of the byte at `pos`.
    pub fn style_at(&self, pos: usize) -> StyleId {
        self.doc.style_at(pos)
    }

    /// Prepare to style from `pos`.
    pub fn start_at(&mut self, pos: usize) {
        self.start_seg = pos.min(self.len);
    }

    /// Begin a new uncoloured segment at `pos`.
    pub fn start_segment(&mut self, pos: usize) {
        self.start_seg = pos;
    }

    /// First position not yet coloured in this pass.
    pub fn start_seg(&self) -> usize {
        self.start_seg
    }

    /// Colour `[start_seg, pos]` with `style` and start the next segment after `pos`.
    ///
    /// A `pos` before the segment start is an empty run and changes nothing.
    pub fn colour_to(&mut self, pos: usize, style: StyleId) {
        self.colour_until(pos + 1, style);
    }

    /// Colour `[start_seg, end)` with `style` and start the next segment at `end`.
    pub fn colour_until(&mut self, end: usize, style: StyleId) {
        if end <= self.start_seg {
            return;
        }
        self.doc
            .set_style_range(self.start_seg, end.min(self.len), style);
        self.start_seg = end;
    }

    /// Line containing `pos`.
    pub fn line_from_position(&self, pos: usize) -> usize {
        self.doc.line_from_position(pos)
    }

    /// First byte of `line`.
    pub fn line_start(&self, line: usize) -> usize {
        self.doc.line_start(line)
    }

    /// Terminator position of `line`.
    pub fn line_end(&self, line: usize) -> usize {
        self.doc.line_end(line)
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.doc.line_count()
    }

    /// Lexer state of `line`.
    pub fn line_state(&self, line: usize) -> i32 {
        self.doc.line_state(line)
    }

    /// Store the lexer state of `line`.
    pub fn set_line_state(&mut self, line: usize, state: i32) -> i32 {
        self.doc.set_line_state(line, state)
    }

    /// Fold level of `line`.
    pub fn level(&self, line: usize) -> FoldLevel {
        self.doc.level(line)
    }

    /// Store the fold level of `line` if it changed.
    pub fn set_level(&mut self, line: usize, level: FoldLevel) {
        if self.doc.level(line) != level {
            self.doc.set_level(line, level);
        }
    }

    /// Whether the bytes at `pos` spell `word`, ignoring ASCII case of the document text.
    ///
    /// `word` is expected in lower case.
    pub fn match_ignore_case(&self, pos: usize, word: &str) -> bool {
        word.bytes()
            .enumerate()
            .all(|(i, b)| self.safe_char_at(pos + i, 0).to_ascii_lowercase() == b)
    }

    /// Lower-cased copy of `[start, end]`, at most `max` bytes.
    pub fn range_lowered(&self, start: usize, end: usize, max: usize) -> String {
        (start..=end)
            .take(max)
            .map(|pos| char::from(self.safe_char_at(pos, b' ').to_ascii_lowercase()))
            .collect()
    }

    /// Whether everything from `pos` to the end of its line is whitespace.
    pub fn is_space_to_eol(&self, pos: usize) -> bool {
        let line = self.line_from_position(pos);
        let eol = self.line_start(line + 1).saturating_sub(1);
        (pos..eol).all(|i| crate::char_class::is_space(u32::from(self.char_at(i))))
    }

    /// Position of the first non-blank byte of `line`, or `None` for a blank line.
    pub fn first_non_blank(&self, line: usize) -> Option<usize> {
        let end = self.line_end(line);
        (self.line_start(line)..end).find(|&pos| !matches!(self.char_at(pos), b' ' | b'\t'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextDocument;

    #[test]
    fn test_colour_to_batches_runs() {
        let mut doc = TextDocument::from_text("abcdef");
        let mut styler = Accessor::new(&mut doc);
        styler.start_at(0);
        styler.start_segment(0);
        styler.colour_to(1, 3);
        styler.colour_to(0, 9); // empty run
        styler.colour_to(5, 4);
        assert_eq!(styler.start_seg(), 6);
        drop(styler);
        assert_eq!(doc.styles(), &[3, 3, 4, 4, 4, 4]);
    }

    #[test]
    fn test_safe_reads_past_end() {
        let mut doc = TextDocument::from_text("ab");
        let styler = Accessor::new(&mut doc);
        assert_eq!(styler.safe_char_at(10, b' '), b' ');
        assert_eq!(styler.char_at(2), 0);
        assert!(styler.match_ignore_case(0, "ab"));
        assert!(!styler.match_ignore_case(0, "abc"));
        assert_eq!(styler.range_lowered(0, 1, 10), "ab");
    }

    #[test]
    fn test_space_to_eol() {
        let mut doc = TextDocument::from_text("%{  \r\n%{ x\n%{");
        let styler = Accessor::new(&mut doc);
        assert!(styler.is_space_to_eol(2));
        assert!(!styler.is_space_to_eol(8));
        assert!(styler.is_space_to_eol(13));
        assert_eq!(styler.first_non_blank(1), Some(6));
    }

    #[test]
    fn test_next_char_pos_skips_trail_bytes() {
        let mut doc = TextDocument::from_bytes(vec![0x81, b'{', b'x'])
            .with_encoding(Encoding::Dbcs(932));
        let styler = Accessor::new(&mut doc);
        assert_eq!(styler.next_char_pos(0), 2);
        assert_eq!(styler.next_char_pos(2), 3);
    }
}
