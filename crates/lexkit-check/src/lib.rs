//! `lexkit-check` - conformance harness for lexkit lexers.
//!
//! Lexes example files, compares the results with golden `.styled` / `.folded`
//! renderings, and checks that each lexer behaves the same when restarted at any line,
//! run one line at a time, run twice, or given CRLF line ends.

pub mod check;
pub mod directory;
pub mod error;
pub mod render;

pub use check::{
    CheckReport, CheckSettings, Failure, check_interface, check_text, check_text_with,
    style_line_by_line,
};
pub use directory::{
    FileFilter, FileOutcome, HarnessConfig, Problem, check_file, run_directory,
    run_directory_filtered, run_tree,
};
pub use error::CheckError;
pub use render::{folded_document, marked_document};
