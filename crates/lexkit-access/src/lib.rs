#![warn(missing_docs)]
//! lexkit-access - Lexer Registry for lexkit Hosts
//!
//! A [`LexerRegistry`] owns the lexer libraries a host has loaded and turns language names
//! into configured lexers. Names may carry a library namespace (`lexkit.css`); namespaced
//! libraries are asked first, then every library by plain name, then an optional default
//! factory. [`LanguageConfig`] maps file names to languages and supplies word lists and
//! properties from YAML.
//!
//! ```rust
//! use lexkit_access::LexerRegistry;
//!
//! let mut registry = LexerRegistry::default();
//! assert!(registry.load("."));
//! assert!(registry.lexers().iter().any(|name| name == "toml"));
//! assert!(registry.make_lexer("toml").is_some());
//! assert!(registry.make_lexer("cobol").is_none());
//! ```

pub mod error;
pub mod language;
pub mod registry;

pub use error::AccessError;
pub use language::{LanguageConfig, LanguageDefinition, PropertyValue};
pub use registry::{
    CatalogueLoader, DEFAULT_LIBRARY, DefaultLexerFn, LexerRegistry, LibraryConstructor,
    LibraryLoader,
};
