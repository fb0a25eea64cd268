//! `StyleContext`: the forward-only cursor lexers are written against.
//!
//! A lexer loop looks like:
//!
//! ```ignore
//! let mut sc = StyleContext::new(start, len, init_style, doc);
//! while sc.more() {
//!     match sc.state {
//!         STRING if sc.ch == u32::from(b'"') => sc.forward_set_state(DEFAULT),
//!         ...
//!     }
//!     sc.forward();
//! }
//! sc.complete();
//! ```
//!
//! Bytes are never styled one at a time. The run between the last state change and the
//! current position is committed to the old state by [`StyleContext::set_state`], and
//! [`StyleContext::complete`] commits the final run.

use crate::accessor::Accessor;
use crate::char_class::to_lower;
use crate::document::{Document, StyleId};

/// Longest run copied by [`StyleContext::current_text`].
const MAX_CURRENT: usize = 128;

/// Cursor over `[start, start + length)` tracking the previous, current and next character.
pub struct StyleContext<'d> {
    styler: Accessor<'d>,
    end_pos: usize,
    length_document: usize,
    line_doc_end: usize,
    line_start_next: usize,
    /// Byte position of `ch`.
    pub current_pos: usize,
    /// Line containing `current_pos`.
    pub current_line: usize,
    /// `ch` is the first character of its line.
    pub at_line_start: bool,
    /// `ch` is the `'\n'` ending its line, or the cursor is at the document end.
    pub at_line_end: bool,
    /// Style of the open run.
    pub state: StyleId,
    /// The character before `ch`.
    pub ch_prev: u32,
    /// The character at `current_pos`; 0 at the document end.
    pub ch: u32,
    /// Byte width of `ch`.
    pub width: usize,
    /// The character after `ch`.
    pub ch_next: u32,
    /// Byte width of `ch_next`.
    pub width_next: usize,
}

impl<'d> StyleContext<'d> {
    /// Start a pass over `[start, start + length)` of `doc` in state `init_style`.
    ///
    /// When the range reaches the document end the cursor visits one extra virtual
    /// position at the end so the final line behaves like every other line.
    pub fn new(
        start: usize,
        length: usize,
        init_style: StyleId,
        doc: &'d mut dyn Document,
    ) -> Self {
        let mut styler = Accessor::new(doc);
        let length_document = styler.len();
        let start = start.min(length_document);
        styler.start_at(start);
        styler.start_segment(start);
        let current_line = styler.line_from_position(start);
        let mut end_pos = (start + length).min(length_document);
        if end_pos == length_document {
            end_pos += 1;
        }
        let mut sc = Self {
            end_pos,
            length_document,
            line_doc_end: styler.line_from_position(length_document),
            line_start_next: styler.line_start(current_line + 1),
            current_pos: start,
            current_line,
            at_line_start: styler.line_start(current_line) == start,
            at_line_end: false,
            state: init_style,
            ch_prev: 0,
            ch: 0,
            width: 0,
            ch_next: 0,
            width_next: 0,
            styler,
        };
        sc.get_next_char();
        sc.ch = sc.ch_next;
        sc.width = sc.width_next;
        sc.get_next_char();
        sc
    }

    fn get_next_char(&mut self) {
        let (ch, width) = self.styler.char_and_width(self.current_pos + self.width);
        self.ch_next = ch;
        self.width_next = width;
        self.at_line_end = if self.current_line < self.line_doc_end {
            self.current_pos + 1 >= self.line_start_next
        } else {
            self.current_pos >= self.line_start_next
        };
    }

    /// End of the committed region for the current position.
    fn run_end(&self) -> usize {
        self.current_pos.min(self.length_document)
    }

    /// The accessor behind this cursor.
    pub fn styler(&self) -> &Accessor<'d> {
        &self.styler
    }

    /// Mutable access to the accessor, for line states and direct styling.
    pub fn styler_mut(&mut self) -> &mut Accessor<'d> {
        &mut self.styler
    }

    /// Lexer state stored for `line`.
    pub fn line_state(&self, line: usize) -> i32 {
        self.styler.line_state(line)
    }

    /// Store the lexer state of `line`.
    pub fn set_line_state(&mut self, line: usize, state: i32) {
        self.styler.set_line_state(line, state);
    }

    /// Whether the cursor is still inside the range.
    pub fn more(&self) -> bool {
        self.current_pos < self.end_pos
    }

    /// Advance one character.
    pub fn forward(&mut self) {
        if self.current_pos < self.end_pos {
            self.at_line_start = self.at_line_end;
            if self.at_line_start {
                self.current_line += 1;
                self.line_start_next = self.styler.line_start(self.current_line + 1);
            }
            self.ch_prev = self.ch;
            self.current_pos += self.width;
            self.ch = self.ch_next;
            self.width = self.width_next;
            self.get_next_char();
        } else {
            self.at_line_start = false;
            self.ch_prev = u32::from(b' ');
            self.ch = u32::from(b' ');
            self.ch_next = u32::from(b' ');
            self.at_line_end = true;
        }
    }

    /// Advance `n` characters.
    pub fn forward_n(&mut self, n: usize) {
        for _ in 0..n {
            self.forward();
        }
    }

    /// Advance until at least `bytes` bytes have been consumed, or the range ends.
    pub fn forward_bytes(&mut self, bytes: usize) {
        let target = self.current_pos + bytes;
        while target > self.current_pos {
            let before = self.current_pos;
            self.forward();
            if self.current_pos == before {
                return;
            }
        }
    }

    /// Commit the open run to the current state and open a new run in `state`.
    pub fn set_state(&mut self, state: StyleId) {
        let end = self.run_end();
        self.styler.colour_until(end, self.state);
        self.state = state;
    }

    /// Relabel the open run without committing it.
    pub fn change_state(&mut self, state: StyleId) {
        self.state = state;
    }

    /// Step over the current character then [`StyleContext::set_state`].
    pub fn forward_set_state(&mut self, state: StyleId) {
        self.forward();
        self.set_state(state);
    }

    /// Commit the final run. Call once after the loop.
    pub fn complete(&mut self) {
        let end = self.run_end();
        self.styler.colour_until(end, self.state);
    }

    /// Bytes in the open run.
    pub fn length_current(&self) -> usize {
        self.current_pos.saturating_sub(self.styler.start_seg())
    }

    /// The raw byte `n` positions from the cursor, 0 outside the document.
    pub fn get_relative(&self, n: isize) -> u8 {
        self.current_pos
            .checked_add_signed(n)
            .map_or(0, |pos| self.styler.char_at(pos))
    }

    /// The character `n` characters from the cursor. Supports `n >= 0` and `n == -1`.
    pub fn get_relative_char(&self, n: isize) -> u32 {
        match n {
            -1 => self.ch_prev,
            0 => self.ch,
            1 => self.ch_next,
            n if n > 1 => {
                let mut pos = self.current_pos + self.width + self.width_next;
                for _ in 2..n {
                    pos = self.styler.next_char_pos(pos);
                }
                self.styler.char_and_width(pos).0
            }
            _ => 0,
        }
    }

    /// `ch == c`.
    pub fn match1(&self, c: u8) -> bool {
        self.ch == u32::from(c)
    }

    /// `ch == c0 && ch_next == c1`.
    pub fn match2(&self, c0: u8, c1: u8) -> bool {
        self.ch == u32::from(c0) && self.ch_next == u32::from(c1)
    }

    /// Whether the text at the cursor starts with `s` (ASCII).
    pub fn match_str(&self, s: &str) -> bool {
        let bytes = s.as_bytes();
        let Some((&first, rest)) = bytes.split_first() else {
            return true;
        };
        if self.ch != u32::from(first) {
            return false;
        }
        let Some((&second, rest)) = rest.split_first() else {
            return true;
        };
        if self.ch_next != u32::from(second) {
            return false;
        }
        rest.iter()
            .enumerate()
            .all(|(i, &b)| self.styler.safe_char_at(self.current_pos + 2 + i, 0) == b)
    }

    /// Like [`StyleContext::match_str`] ignoring ASCII case; `s` must be lower case.
    pub fn match_ignore_case(&self, s: &str) -> bool {
        let bytes = s.as_bytes();
        let Some((&first, rest)) = bytes.split_first() else {
            return true;
        };
        if to_lower(self.ch) != u32::from(first) {
            return false;
        }
        let Some((&second, rest)) = rest.split_first() else {
            return true;
        };
        if to_lower(self.ch_next) != u32::from(second) {
            return false;
        }
        rest.iter().enumerate().all(|(i, &b)| {
            self.styler
                .safe_char_at(self.current_pos + 2 + i, 0)
                .to_ascii_lowercase()
                == b
        })
    }

    /// Whether the cursor is on the line terminator (the `'\r'` of a CRLF pair).
    pub fn match_line_end(&self) -> bool {
        self.current_pos == self.styler.line_end(self.current_line)
    }

    fn current_bytes(&self) -> Vec<u8> {
        let start = self.styler.start_seg();
        let end = self.run_end().min(start + MAX_CURRENT);
        (start..end).map(|pos| self.styler.char_at(pos)).collect()
    }

    /// Text of the open run, at most 128 bytes.
    pub fn current_text(&self) -> String {
        String::from_utf8_lossy(&self.current_bytes()).into_owned()
    }

    /// ASCII lower-cased text of the open run, at most 128 bytes.
    pub fn current_lowered(&self) -> String {
        let mut bytes = self.current_bytes();
        bytes.make_ascii_lowercase();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Encoding, TextDocument};

    #[test]
    fn test_runs_cover_range() {
        let mut doc = TextDocument::from_text("ab cd");
        let mut sc = StyleContext::new(0, 5, 1, &mut doc);
        while sc.more() {
            if sc.ch == u32::from(b' ') {
                sc.set_state(2);
            } else if sc.state == 2 {
                sc.set_state(3);
            }
            sc.forward();
        }
        sc.complete();
        drop(sc);
        assert_eq!(doc.styles(), &[1, 1, 2, 3, 3]);
    }

    #[test]
    fn test_virtual_end_position() {
        let mut doc = TextDocument::from_text("ab");
        let mut sc = StyleContext::new(0, 2, 0, &mut doc);
        let mut seen = Vec::new();
        while sc.more() {
            seen.push((sc.current_pos, sc.ch, sc.at_line_end));
            sc.forward();
        }
        assert_eq!(
            seen,
            vec![
                (0, u32::from(b'a'), false),
                (1, u32::from(b'b'), false),
                (2, 0, true),
            ]
        );
        sc.set_state(5);
        sc.complete();
        drop(sc);
        assert_eq!(doc.styles(), &[0, 0]);
    }

    #[test]
    fn test_partial_range_stops_early() {
        let mut doc = TextDocument::from_text("abcd");
        let mut sc = StyleContext::new(1, 2, 4, &mut doc);
        let mut count = 0;
        while sc.more() {
            count += 1;
            sc.forward();
        }
        sc.complete();
        drop(sc);
        assert_eq!(count, 2);
        assert_eq!(doc.styles(), &[0, 4, 4, 0]);
    }

    #[test]
    fn test_line_tracking_with_crlf() {
        let mut doc = TextDocument::from_text("a\r\nb\n");
        let mut sc = StyleContext::new(0, 5, 0, &mut doc);
        let mut events = Vec::new();
        while sc.more() {
            events.push((sc.current_pos, sc.current_line, sc.at_line_start, sc.at_line_end));
            if sc.current_pos == 1 {
                assert!(sc.match_line_end());
            }
            sc.forward();
        }
        assert_eq!(
            events,
            vec![
                (0, 0, true, false),
                (1, 0, false, false),
                (2, 0, false, true),
                (3, 1, true, false),
                (4, 1, false, true),
                (5, 2, true, true),
            ]
        );
    }

    #[test]
    fn test_matching_and_current_text() {
        let mut doc = TextDocument::from_text("%{ Begin");
        let mut sc = StyleContext::new(0, 8, 0, &mut doc);
        assert!(sc.match2(b'%', b'{'));
        assert!(sc.match_str("%{ B"));
        assert!(!sc.match_str("%{ b"));
        sc.forward_n(3);
        sc.set_state(1);
        assert!(sc.match_ignore_case("begin"));
        sc.forward_n(5);
        assert_eq!(sc.length_current(), 5);
        assert_eq!(sc.current_text(), "Begin");
        assert_eq!(sc.current_lowered(), "begin");
        assert_eq!(sc.get_relative(-1), b'n');
        assert_eq!(sc.get_relative(-100), 0);
    }

    #[test]
    fn test_multibyte_characters_step_as_one() {
        let mut doc = TextDocument::from_text("é{€");
        let mut sc = StyleContext::new(0, doc.len(), 0, &mut doc);
        assert_eq!((sc.ch, sc.width), (0xE9, 2));
        assert_eq!(sc.get_relative_char(2), 0x20AC);
        sc.forward();
        assert_eq!((sc.current_pos, sc.ch), (2, u32::from(b'{')));
        sc.forward_bytes(1);
        assert_eq!((sc.current_pos, sc.ch), (3, 0x20AC));
        assert_eq!(sc.get_relative_char(-1), u32::from(b'{'));
    }

    #[test]
    fn test_dbcs_trail_byte_is_not_punctuation() {
        let mut doc =
            TextDocument::from_bytes(vec![0x81, b'{', b'}']).with_encoding(Encoding::Dbcs(932));
        let mut sc = StyleContext::new(0, 3, 0, &mut doc);
        let mut braces = 0;
        while sc.more() {
            if sc.match1(b'{') || sc.match1(b'}') {
                braces += 1;
            }
            sc.forward();
        }
        assert_eq!(braces, 1);
    }
}
