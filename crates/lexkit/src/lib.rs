#![warn(missing_docs)]
//! lexkit - Restartable Lexing and Code Folding
//!
//! # Overview
//!
//! `lexkit` is the framework half of an incremental syntax highlighter. Lexers are
//! character-level state machines that style byte ranges of a document and compute a
//! fold level per line. Everything a lexer needs to resume lives in the document: one
//! style per byte, one state integer per line and one fold level per line. A host can
//! therefore relex from any line start after an edit instead of from the top.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Highlighter (end-styled watermark)         │  ← Host driver
//! ├─────────────────────────────────────────────┤
//! │  Lexer / LexerLibrary traits                │  ← Language plug-ins
//! ├─────────────────────────────────────────────┤
//! │  StyleContext (run-batched cursor)          │  ← Lexer loop
//! ├─────────────────────────────────────────────┤
//! │  Accessor (segment colouring, line tables)  │  ← Per-call view
//! ├─────────────────────────────────────────────┤
//! │  Document (TextDocument / RopeDocument)     │  ← Persisted state
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use lexkit::{Document, StyleContext, TextDocument};
//!
//! let mut doc = TextDocument::from_text("let x");
//! let len = doc.len();
//! let mut sc = StyleContext::new(0, len, 0, &mut doc);
//! while sc.more() {
//!     if sc.match1(b' ') {
//!         sc.set_state(1);
//!     } else if sc.state == 1 {
//!         sc.set_state(2);
//!     }
//!     sc.forward();
//! }
//! sc.complete();
//! drop(sc);
//! assert_eq!(doc.styles(), &[0, 0, 0, 1, 2]);
//! ```
//!
//! # Module Description
//!
//! - [`document`] - The document trait and encodings
//! - [`text_document`] / [`rope_document`] - In-memory documents
//! - [`accessor`] - Per-call document view with segment colouring
//! - [`style_context`] - The lexer cursor
//! - [`char_class`] / [`word_list`] - Character sets and keyword lists
//! - [`fold`] - Fold level encoding and fold regions
//! - [`options`] - String properties
//! - [`lexer`] / [`library`] - Lexer and library interfaces
//! - [`highlighter`] - Incremental driver
//! - [`line_ending`] - LF / CRLF conversion

pub mod accessor;
pub mod char_class;
pub mod document;
pub mod error;
pub mod fold;
pub mod highlighter;
pub mod lexer;
pub mod library;
pub mod line_ending;
pub mod options;
pub mod rope_document;
pub mod style_context;
pub mod text_document;
pub mod word_list;

pub use accessor::Accessor;
pub use char_class::CharacterSet;
pub use document::{Document, Encoding, StyleId};
pub use error::{DocumentError, LexerError};
pub use fold::{
    FOLD_LEVEL_BASE, FOLD_LEVEL_HEADER_FLAG, FOLD_LEVEL_NUMBER_MASK, FOLD_LEVEL_WHITE_FLAG,
    FoldLevel, FoldRegion, fold_lines, fold_regions, start_level,
};
pub use highlighter::Highlighter;
pub use lexer::{Lexer, LexerFactory, StyleInfo, WordLists};
pub use library::LexerLibrary;
pub use line_ending::LineEnding;
pub use options::{OptionDef, OptionSet, PropertyMap, PropertyType};
pub use rope_document::RopeDocument;
pub use style_context::StyleContext;
pub use text_document::TextDocument;
pub use word_list::WordList;
