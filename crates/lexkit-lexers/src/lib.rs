#![warn(missing_docs)]
//! lexkit-lexers - Language Lexers for lexkit
//!
//! # Overview
//!
//! Each module holds one lexer: its style ids (`style` submodule), its properties and
//! word lists, and the lexing and folding passes. All of them resume from any line start
//! given the style of the byte before it, which is what [`lexkit::Highlighter`] relies on.
//!
//! | Module | Lexer names | Folding |
//! |--------|-------------|---------|
//! | [`css`] | `css` | braces, block comments |
//! | [`matlab`] | `matlab`, `octave` | block keywords, `%{ %}` comments |
//! | [`pascal`] | `pascal` | `begin`/`end` family, `{$if}` directives, comment runs |
//! | [`python`] | `python` | indentation, triple-quoted strings |
//! | [`toml`] | `toml` | table headers |
//!
//! # Quick Start
//!
//! ```rust
//! use lexkit::{Document, Lexer, LexerLibrary, TextDocument};
//! use lexkit_lexers::BuiltinLibrary;
//!
//! let library = BuiltinLibrary::new();
//! let lexer = library.create_lexer("css").unwrap();
//! let mut doc = TextDocument::from_text("a {\n  b: 1;\n}\n");
//! let len = doc.len();
//! lexer.lex(0, len, 0, &mut doc);
//! lexer.fold(0, len, 0, &mut doc);
//! assert!(doc.level(0).header);
//! ```

pub mod css;
pub mod library;
pub mod matlab;
pub mod pascal;
pub mod python;
pub mod toml;

pub use css::CssLexer;
pub use library::BuiltinLibrary;
pub use matlab::{Dialect, MatlabLexer};
pub use pascal::PascalLexer;
pub use python::PythonLexer;
pub use toml::TomlLexer;
