//! Incremental styling driver.
//!
//! [`Highlighter`] pairs a lexer with an "end styled" watermark. Edits lower the
//! watermark to the start of the edited line; [`Highlighter::ensure_styled`] relexes from
//! there up to the line a caller needs. Restarting at a line start with the style of the
//! byte before it is exactly the resume contract lexers support.

use crate::document::Document;
use crate::error::LexerError;
use crate::lexer::Lexer;

/// Keeps one document's styles and fold levels up to date.
pub struct Highlighter {
    lexer: Box<dyn Lexer>,
    end_styled: usize,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("lexer", &self.lexer.name())
            .field("end_styled", &self.end_styled)
            .finish()
    }
}

impl Highlighter {
    /// Drive `lexer`. Nothing is considered styled yet.
    pub fn new(lexer: Box<dyn Lexer>) -> Self {
        Self {
            lexer,
            end_styled: 0,
        }
    }

    /// The lexer.
    pub fn lexer(&self) -> &dyn Lexer {
        &*self.lexer
    }

    /// Position up to which the document is known to be styled.
    pub fn end_styled(&self) -> usize {
        self.end_styled
    }

    /// Set a lexer property; a change invalidates the whole document.
    pub fn set_property(&mut self, key: &str, value: &str) -> bool {
        let changed = self.lexer.property_set(key, value);
        if changed {
            self.end_styled = 0;
        }
        changed
    }

    /// Replace a word list; a change invalidates the whole document.
    pub fn set_word_list(&mut self, index: usize, text: &str) -> Result<bool, LexerError> {
        let changed = self.lexer.word_list_set(index, text)?;
        if changed {
            self.end_styled = 0;
        }
        Ok(changed)
    }

    /// Note that the text at `pos` changed.
    pub fn invalidate(&mut self, doc: &dyn Document, pos: usize) {
        let line_start = doc.line_start(doc.line_from_position(pos));
        if line_start < self.end_styled {
            tracing::trace!(pos, line_start, "invalidate");
            self.end_styled = line_start;
        }
    }

    /// Make sure every line up to and including the one containing `pos` is styled and
    /// folded.
    pub fn ensure_styled(&mut self, doc: &mut dyn Document, pos: usize) {
        let len = doc.len();
        let end_styled = self.end_styled.min(len);
        let start = doc.line_start(doc.line_from_position(end_styled));
        let end = doc.line_start(doc.line_from_position(pos.min(len)) + 1);
        if end <= end_styled {
            return;
        }
        let init_style = if start > 0 { doc.style_at(start - 1) } else { 0 };
        let span = tracing::debug_span!(
            "style",
            lexer = self.lexer.name(),
            start,
            len = end - start,
            init_style
        );
        let _guard = span.enter();
        self.lexer.lex(start, end - start, init_style, &mut *doc);
        self.lexer.fold(start, end - start, init_style, &mut *doc);
        tracing::trace!(end, "styled");
        self.end_styled = end;
    }

    /// Restyle and refold the whole document.
    pub fn colourise_all(&mut self, doc: &mut dyn Document) {
        self.end_styled = 0;
        let len = doc.len();
        self.ensure_styled(doc, len);
    }
}
