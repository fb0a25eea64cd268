//! The lexers of this crate as one [`LexerLibrary`].

use std::sync::Mutex;

use lexkit::{Lexer, LexerFactory, LexerLibrary, PropertyMap};

use crate::{CssLexer, MatlabLexer, PascalLexer, PythonLexer, TomlLexer};

/// One catalogue entry: name, numeric language id and factory.
struct Entry {
    name: &'static str,
    id: i32,
    factory: LexerFactory,
}

static CATALOGUE: &[Entry] = &[
    Entry {
        name: "css",
        id: 38,
        factory: CssLexer::factory,
    },
    Entry {
        name: "matlab",
        id: 32,
        factory: MatlabLexer::matlab,
    },
    Entry {
        name: "octave",
        id: 54,
        factory: MatlabLexer::octave,
    },
    Entry {
        name: "pascal",
        id: 18,
        factory: PascalLexer::factory,
    },
    Entry {
        name: "python",
        id: 2,
        factory: PythonLexer::factory,
    },
    Entry {
        name: "toml",
        id: 136,
        factory: TomlLexer::factory,
    },
];

/// Properties a host may set once for every lexer the library creates.
const LIBRARY_PROPERTIES: &[&str] = &["fold", "fold.comment", "fold.compact"];

/// The built-in lexers.
///
/// Library properties are remembered and applied to each lexer as it is created, so a
/// host can say `fold.compact=0` once instead of per language.
#[derive(Debug, Default)]
pub struct BuiltinLibrary {
    properties: Mutex<PropertyMap>,
    name_space: Option<String>,
}

impl BuiltinLibrary {
    /// A library without a namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// A library whose lexers can also be reached as `<name_space>.<lexer>`.
    pub fn with_name_space(name_space: impl Into<String>) -> Self {
        Self {
            properties: Mutex::default(),
            name_space: Some(name_space.into()),
        }
    }

    fn entry(&self, name: &str) -> Option<&'static Entry> {
        CATALOGUE.iter().find(|entry| entry.name == name)
    }
}

impl LexerLibrary for BuiltinLibrary {
    fn lexer_count(&self) -> usize {
        CATALOGUE.len()
    }

    fn lexer_name(&self, index: usize) -> Option<&str> {
        CATALOGUE.get(index).map(|entry| entry.name)
    }

    fn create_lexer(&self, name: &str) -> Option<Box<dyn Lexer>> {
        let entry = self.entry(name)?;
        let mut lexer = (entry.factory)();
        match self.properties.lock() {
            Ok(properties) => {
                for (key, value) in properties.iter() {
                    lexer.property_set(key, value);
                }
            }
            Err(_) => tracing::warn!(lexer = name, "library properties unavailable"),
        }
        tracing::debug!(lexer = name, "created lexer");
        Some(lexer)
    }

    fn lexer_name_from_id(&self, id: i32) -> Option<&str> {
        CATALOGUE
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.name)
    }

    fn library_property_names(&self) -> String {
        LIBRARY_PROPERTIES.join("\n")
    }

    fn set_library_property(&self, key: &str, value: &str) {
        if !LIBRARY_PROPERTIES.contains(&key) {
            tracing::debug!(key, "ignoring unknown library property");
            return;
        }
        if let Ok(mut properties) = self.properties.lock() {
            properties.set(key, value);
        }
    }

    fn name_space(&self) -> Option<&str> {
        self.name_space.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue() {
        let library = BuiltinLibrary::new();
        assert_eq!(
            library.lexer_names(),
            vec!["css", "matlab", "octave", "pascal", "python", "toml"]
        );
        assert_eq!(library.lexer_name_from_id(18), Some("pascal"));
        assert_eq!(library.lexer_name_from_id(999), None);
        assert!(library.create_lexer("cobol").is_none());
        let lexer = library.create_lexer("octave").unwrap();
        assert_eq!(lexer.name(), "octave");
        assert_eq!(lexer.identifier(), 54);
    }

    #[test]
    fn test_library_properties_reach_new_lexers() {
        let library = BuiltinLibrary::new();
        assert_eq!(
            library.library_property_names(),
            "fold\nfold.comment\nfold.compact"
        );
        library.set_library_property("fold.compact", "0");
        library.set_library_property("lexer.css.scss.language", "1");
        let lexer = library.create_lexer("css").unwrap();
        assert_eq!(lexer.property_get("fold.compact"), Some("0"));
        assert_eq!(lexer.property_get("lexer.css.scss.language"), None);
    }

    #[test]
    fn test_name_space() {
        assert_eq!(BuiltinLibrary::new().name_space(), None);
        assert_eq!(
            BuiltinLibrary::with_name_space("lexkit").name_space(),
            Some("lexkit")
        );
    }
}
