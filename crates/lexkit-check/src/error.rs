use lexkit_access::AccessError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors that stop the harness from checking a file or directory.
pub enum CheckError {
    #[error("I/O error: {0}")]
    /// Reading an example or writing a `.new` file failed.
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    /// The directory configuration could not be loaded, or a lexer could not be configured.
    Config(#[from] AccessError),

    #[error("invalid file filter: {0}")]
    /// A `--only` pattern is not a valid regular expression.
    Filter(#[from] regex::Error),

    #[error("no lexer for '{}'", .0.display())]
    /// No configured language or loaded library covers an example file.
    NoLexer(PathBuf),
}
