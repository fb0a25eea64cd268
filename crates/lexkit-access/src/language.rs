//! Per-language lexer configuration loaded from YAML.
//!
//! ```yaml
//! languages:
//!   python:
//!     extensions: [py, pyw]
//!     keywords:
//!       - "def class return"
//!     properties:
//!       fold.quotes.python: 1
//! ```

use crate::error::AccessError;
use crate::registry::LexerRegistry;
use lexkit::Lexer;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
/// A property value as written in YAML; lexers receive it as a string.
pub enum PropertyValue {
    /// `true` / `false`, passed as `1` / `0`.
    Flag(bool),
    /// An integer.
    Number(i64),
    /// Any other scalar.
    Text(String),
}

impl PropertyValue {
    /// The string handed to [`Lexer::property_set`].
    pub fn to_property_string(&self) -> String {
        match self {
            Self::Flag(flag) => String::from(if *flag { "1" } else { "0" }),
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
/// How one language is lexed.
pub struct LanguageDefinition {
    #[serde(default)]
    /// Lexer name given to the registry. Defaults to the language name.
    pub lexer: Option<String>,

    #[serde(default)]
    /// File extensions (without the dot) or whole file names claimed by the language.
    pub extensions: Vec<String>,

    #[serde(default)]
    /// Word lists in lexer order, each a space-separated string.
    pub keywords: Vec<String>,

    #[serde(default)]
    /// Lexer properties.
    pub properties: BTreeMap<String, PropertyValue>,
}

impl LanguageDefinition {
    /// Apply word lists and properties to a freshly created lexer.
    ///
    /// Properties the lexer does not recognise are ignored.
    pub fn apply(&self, lexer: &mut dyn Lexer) -> Result<(), AccessError> {
        for (index, words) in self.keywords.iter().enumerate() {
            lexer.word_list_set(index, words)?;
        }
        for (key, value) in &self.properties {
            let value = value.to_property_string();
            lexer.property_set(key, &value);
            if lexer.property_get(key).is_none() {
                tracing::debug!(lexer = lexer.name(), key = key.as_str(), "unknown property");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Every configured language, keyed by language name.
pub struct LanguageConfig {
    #[serde(default)]
    /// Language definitions.
    pub languages: BTreeMap<String, LanguageDefinition>,
}

impl LanguageConfig {
    /// Parse a configuration from YAML text.
    pub fn load_from_str(yaml: &str) -> Result<Self, AccessError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a configuration file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, AccessError> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::load_from_str(&yaml)
    }

    /// The language claiming `file_name`, by exact name first and then by extension.
    pub fn for_file(&self, file_name: &str) -> Option<(&str, &LanguageDefinition)> {
        let path = Path::new(file_name);
        let base = path.file_name()?.to_str()?;
        let extension = path.extension().and_then(|ext| ext.to_str());
        let claims = |definition: &LanguageDefinition, wanted: &str| {
            definition
                .extensions
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(wanted))
        };
        self.languages
            .iter()
            .find(|&(_, definition)| claims(definition, base))
            .or_else(|| {
                let extension = extension?;
                self.languages
                    .iter()
                    .find(|&(_, definition)| claims(definition, extension))
            })
            .map(|(name, definition)| (name.as_str(), definition))
    }

    /// Lexer name for a configured language.
    pub fn lexer_name<'a>(&'a self, language: &'a str) -> Option<&'a str> {
        let definition = self.languages.get(language)?;
        Some(definition.lexer.as_deref().unwrap_or(language))
    }

    /// Create and configure the lexer for a file.
    pub fn make_lexer_for_file(
        &self,
        registry: &LexerRegistry,
        file_name: &str,
    ) -> Result<Box<dyn Lexer>, AccessError> {
        let (language, definition) = self
            .for_file(file_name)
            .ok_or_else(|| AccessError::UnknownLanguage(file_name.to_string()))?;
        let lexer_name = definition.lexer.as_deref().unwrap_or(language);
        let mut lexer = registry
            .make_lexer(lexer_name)
            .ok_or_else(|| AccessError::MissingLexer(lexer_name.to_string()))?;
        definition.apply(&mut *lexer)?;
        tracing::debug!(file_name, language, lexer = lexer_name, "configured lexer");
        Ok(lexer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const YAML: &str = r#"
languages:
  python:
    extensions: [py, PYW]
    keywords:
      - "def class"
    properties:
      fold.quotes.python: true
      fold.compact: 0
  build:
    lexer: python
    extensions: [SConstruct]
"#;

    #[test]
    fn test_parse() {
        let config = LanguageConfig::load_from_str(YAML).unwrap();
        let python = &config.languages["python"];
        assert_eq!(python.extensions, vec!["py", "PYW"]);
        assert_eq!(
            python.properties["fold.quotes.python"],
            PropertyValue::Flag(true)
        );
        assert_eq!(python.properties["fold.compact"].to_property_string(), "0");
        assert_eq!(config.lexer_name("build"), Some("python"));
        assert_eq!(config.lexer_name("python"), Some("python"));
        assert_eq!(config.lexer_name("cobol"), None);
    }

    #[test]
    fn test_for_file() {
        let config = LanguageConfig::load_from_str(YAML).unwrap();
        assert_eq!(config.for_file("src/app.py").map(|(name, _)| name), Some("python"));
        assert_eq!(config.for_file("APP.pyw").map(|(name, _)| name), Some("python"));
        assert_eq!(config.for_file("SConstruct").map(|(name, _)| name), Some("build"));
        assert!(config.for_file("notes.txt").is_none());
        assert!(config.for_file("").is_none());
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(
            LanguageConfig::load_from_str("languages: [1, 2"),
            Err(AccessError::Yaml(_))
        ));
        assert!(matches!(
            LanguageConfig::load_from_path("/nonexistent/languages.yaml"),
            Err(AccessError::Io(_))
        ));
    }
}
