//! The lexer interface.
//!
//! A [`Lexer`] is configured through string properties and word lists, then asked to lex
//! and fold byte ranges of a [`Document`]. `lex` and `fold` take `&self`: everything that
//! must survive between calls lives in the document, so a lexer can resume at any line.

use crate::document::{Document, StyleId};
use crate::error::LexerError;
use crate::options::PropertyType;
use crate::word_list::WordList;

/// Metadata for one style a lexer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleInfo {
    /// Style id written to the document.
    pub style: StyleId,
    /// Symbolic name, e.g. `SCE_CSS_COMMENT`.
    pub name: &'static str,
    /// Space-separated semantic tags, e.g. `"comment"` or `"literal string error"`.
    pub tags: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// A configurable, restartable lexer and folder for one language.
pub trait Lexer: Send {
    /// Language name used by registries, e.g. `"css"`.
    fn name(&self) -> &'static str;

    /// Numeric language id, kept for hosts that still select lexers by number.
    fn identifier(&self) -> i32;

    /// Every property key the lexer understands, `'\n'`-separated.
    fn property_names(&self) -> &str;

    /// Value type of a property.
    fn property_type(&self, name: &str) -> PropertyType;

    /// Description of a property.
    fn describe_property(&self, name: &str) -> &str;

    /// Set a property. Returns `true` when the change may alter lexing or folding, so the
    /// host should restyle.
    fn property_set(&mut self, key: &str, value: &str) -> bool;

    /// The last value set for a property.
    fn property_get(&self, key: &str) -> Option<&str>;

    /// One description per word list, in index order.
    fn word_list_descriptions(&self) -> &[&'static str];

    /// Replace word list `index`. Returns whether its contents changed.
    fn word_list_set(&mut self, index: usize, text: &str) -> Result<bool, LexerError>;

    /// Every style this lexer writes.
    fn styles(&self) -> &'static [StyleInfo];

    /// Number of named styles.
    fn named_styles(&self) -> usize {
        self.styles().len()
    }

    /// Symbolic name of `style`, empty when unknown.
    fn name_of_style(&self, style: StyleId) -> &'static str {
        self.style_info(style).map_or("", |info| info.name)
    }

    /// Tags of `style`, empty when unknown.
    fn tags_of_style(&self, style: StyleId) -> &'static str {
        self.style_info(style).map_or("", |info| info.tags)
    }

    /// Description of `style`, empty when unknown.
    fn description_of_style(&self, style: StyleId) -> &'static str {
        self.style_info(style).map_or("", |info| info.description)
    }

    /// Metadata for `style`.
    fn style_info(&self, style: StyleId) -> Option<&'static StyleInfo> {
        self.styles().iter().find(|info| info.style == style)
    }

    /// Style `[start, start + len)` starting in state `init_style`.
    ///
    /// `init_style` must be the style of the byte before `start` left by an earlier pass,
    /// and `start` should be a line start.
    fn lex(&self, start: usize, len: usize, init_style: StyleId, doc: &mut dyn Document);

    /// Compute fold levels for the lines touched by `[start, start + len)`.
    fn fold(&self, start: usize, len: usize, init_style: StyleId, doc: &mut dyn Document);
}

/// Constructor registered for a language.
pub type LexerFactory = fn() -> Box<dyn Lexer>;

/// A fixed number of word lists with their descriptions.
#[derive(Debug, Clone)]
pub struct WordLists<const N: usize> {
    lexer: &'static str,
    lists: [WordList; N],
    descriptions: &'static [&'static str; N],
}

impl<const N: usize> WordLists<N> {
    /// Empty lists for the lexer named `lexer`.
    pub fn new(lexer: &'static str, descriptions: &'static [&'static str; N]) -> Self {
        Self {
            lexer,
            lists: std::array::from_fn(|_| WordList::new()),
            descriptions,
        }
    }

    /// Descriptions in index order.
    pub fn descriptions(&self) -> &[&'static str] {
        self.descriptions
    }

    fn list_mut(&mut self, index: usize) -> Result<&mut WordList, LexerError> {
        let lexer = self.lexer;
        self.lists.get_mut(index).ok_or_else(|| {
            tracing::warn!(lexer, index, lists = N, "no such word list");
            LexerError::NoSuchWordList { lexer, index }
        })
    }

    /// Replace list `index`.
    pub fn set(&mut self, index: usize, text: &str) -> Result<bool, LexerError> {
        Ok(self.list_mut(index)?.set(text))
    }

    /// Replace list `index`, lower-casing the entries.
    pub fn set_lowered(&mut self, index: usize, text: &str) -> Result<bool, LexerError> {
        Ok(self.list_mut(index)?.set_lowered(text))
    }
}

impl<const N: usize> std::ops::Index<usize> for WordLists<N> {
    type Output = WordList;

    fn index(&self, index: usize) -> &WordList {
        &self.lists[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    static DESCRIPTIONS: [&str; 2] = ["Keywords", "Types"];

    #[test]
    fn test_word_lists() {
        let mut lists = WordLists::new("test", &DESCRIPTIONS);
        assert_eq!(lists.descriptions(), &["Keywords", "Types"]);
        assert_eq!(lists.set(0, ""), Ok(false));
        assert_eq!(lists.set(1, "int char"), Ok(true));
        assert_eq!(lists.set_lowered(0, "IF"), Ok(true));
        assert!(lists[0].in_list("if"));
        assert!(lists[1].in_list("char"));
        assert_eq!(
            lists.set(2, "x"),
            Err(LexerError::NoSuchWordList {
                lexer: "test",
                index: 2
            })
        );
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_unknown_word_list_is_logged() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        let mut lists = WordLists::new("test", &DESCRIPTIONS);
        let result = tracing::subscriber::with_default(subscriber, || lists.set_lowered(5, "x"));
        assert!(result.is_err());

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("no such word list"), "{output}");
        assert!(output.contains("index=5"), "{output}");
    }
}
