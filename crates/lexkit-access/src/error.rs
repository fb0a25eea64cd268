use lexkit::LexerError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading libraries or language configuration.
pub enum AccessError {
    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    /// A language configuration could not be parsed.
    Yaml(#[from] serde_yaml::Error),

    #[error("no lexer library at '{}'", .0.display())]
    /// The loader has nothing registered for a library path.
    LibraryNotFound(PathBuf),

    #[error("no loaded library provides lexer '{0}'")]
    /// A configured lexer name is unknown to every loaded library.
    MissingLexer(String),

    #[error("no language is configured for '{0}'")]
    /// No language claims a file name.
    UnknownLanguage(String),

    #[error(transparent)]
    /// A configured word list was rejected by the lexer.
    Lexer(#[from] LexerError),
}
