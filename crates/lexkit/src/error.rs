use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced when mutating a document.
///
/// A rejected edit leaves the document exactly as it was.
pub enum DocumentError {
    #[error("position {pos} is past the end of the document (length {len})")]
    /// An edit position or range end lies beyond the document.
    OutOfRange {
        /// The offending byte position.
        pos: usize,
        /// Document length at the time of the edit.
        len: usize,
    },

    #[error("position {0} falls inside a multi-byte character")]
    /// An edit boundary would split a multi-byte character.
    SplitsCharacter(usize),

    #[error("inserted text is not valid UTF-8")]
    /// A UTF-8 only document was given bytes that are not UTF-8.
    InvalidUtf8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors reported by the configuration surface of a lexer.
pub enum LexerError {
    #[error("lexer '{lexer}' has no word list {index}")]
    /// A word list index outside the lexer's declared lists.
    NoSuchWordList {
        /// Lexer name.
        lexer: &'static str,
        /// Requested list index.
        index: usize,
    },
}
