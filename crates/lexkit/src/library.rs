//! The contract a lexer library satisfies.
//!
//! A library is a named bundle of lexers plus a few library-wide properties. Registries
//! aggregate libraries and resolve language names through them.

use crate::lexer::Lexer;

/// A collection of lexers that a registry can load.
pub trait LexerLibrary: Send + Sync {
    /// Number of lexers in the library.
    fn lexer_count(&self) -> usize;

    /// Name of lexer `index`, or `None` past the end.
    fn lexer_name(&self, index: usize) -> Option<&str>;

    /// Create a fresh lexer for `name`, or `None` if the library has no such lexer.
    fn create_lexer(&self, name: &str) -> Option<Box<dyn Lexer>>;

    /// Map a numeric language id to a lexer name.
    ///
    /// Kept for hosts that still select lexers by number.
    fn lexer_name_from_id(&self, _id: i32) -> Option<&str> {
        None
    }

    /// Library-wide property keys, `'\n'`-separated.
    fn library_property_names(&self) -> String {
        String::new()
    }

    /// Set a library-wide property.
    fn set_library_property(&self, _key: &str, _value: &str) {}

    /// Namespace prefix that qualifies this library's lexer names, e.g. `"lexkit"`.
    fn name_space(&self) -> Option<&str> {
        None
    }

    /// Every lexer name in index order.
    fn lexer_names(&self) -> Vec<String> {
        (0..self.lexer_count())
            .filter_map(|i| self.lexer_name(i).map(str::to_string))
            .collect()
    }
}
