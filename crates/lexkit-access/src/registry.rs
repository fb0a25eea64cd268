//! Resolving language names to lexers across several libraries.

use crate::error::AccessError;
use lexkit::{Lexer, LexerLibrary};
use lexkit_lexers::BuiltinLibrary;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

/// Library name used for a `.` entry in a library list.
pub const DEFAULT_LIBRARY: &str = "lexkit";

/// Separator between a library namespace and a lexer name.
pub const NAME_SPACE_SEPARATOR: char = '.';

/// Fallback consulted when no loaded library knows a language.
pub type DefaultLexerFn = fn(&str) -> Option<Box<dyn Lexer>>;

/// Builds one library instance.
pub type LibraryConstructor = fn() -> Box<dyn LexerLibrary>;

/// Turns a library path into a library.
pub trait LibraryLoader {
    /// Load the library at `path`.
    fn load(&self, path: &Path) -> Result<Box<dyn LexerLibrary>, AccessError>;
}

/// A loader backed by constructors registered under a file stem.
///
/// Paths resolve by stem, so `./lexers/lexkit.so` and `lexkit` name the same library.
#[derive(Clone)]
pub struct CatalogueLoader {
    constructors: HashMap<String, LibraryConstructor>,
}

impl fmt::Debug for CatalogueLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stems: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        stems.sort_unstable();
        f.debug_struct("CatalogueLoader")
            .field("stems", &stems)
            .finish()
    }
}

impl Default for CatalogueLoader {
    /// A loader that knows the built-in lexers as [`DEFAULT_LIBRARY`].
    fn default() -> Self {
        let mut loader = Self::empty();
        loader.register(DEFAULT_LIBRARY, builtin_library);
        loader
    }
}

fn builtin_library() -> Box<dyn LexerLibrary> {
    Box::new(BuiltinLibrary::new())
}

impl CatalogueLoader {
    /// A loader with nothing registered.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register (or replace) the library built for paths with this stem.
    pub fn register(&mut self, stem: impl Into<String>, constructor: LibraryConstructor) {
        self.constructors.insert(stem.into(), constructor);
    }
}

impl LibraryLoader for CatalogueLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn LexerLibrary>, AccessError> {
        let constructor = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| self.constructors.get(stem))
            .ok_or_else(|| AccessError::LibraryNotFound(path.to_path_buf()))?;
        Ok(constructor())
    }
}

struct LoadedLibrary {
    library: Box<dyn LexerLibrary>,
    /// Namespace with the separator appended, empty when the library has none.
    prefix: String,
}

/// The set of loaded lexer libraries and the names they provide.
///
/// Construct one at startup, [`load`](Self::load) a library list, then resolve languages
/// with [`make_lexer`](Self::make_lexer).
pub struct LexerRegistry {
    loader: Box<dyn LibraryLoader>,
    libraries: Vec<LoadedLibrary>,
    lexers: Vec<String>,
    library_properties: Vec<String>,
    last_loaded: Option<String>,
    default_directory: Option<PathBuf>,
    default_lexer: Option<DefaultLexerFn>,
}

impl fmt::Debug for LexerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexerRegistry")
            .field("libraries", &self.libraries.len())
            .field("lexers", &self.lexers)
            .field("last_loaded", &self.last_loaded)
            .finish_non_exhaustive()
    }
}

impl Default for LexerRegistry {
    fn default() -> Self {
        Self::new(CatalogueLoader::default())
    }
}

impl LexerRegistry {
    /// An empty registry that loads libraries through `loader`.
    pub fn new(loader: impl LibraryLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            libraries: Vec::new(),
            lexers: Vec::new(),
            library_properties: Vec::new(),
            last_loaded: None,
            default_directory: None,
            default_lexer: None,
        }
    }

    /// Directory used for `.` entries of a library list.
    pub fn set_default_directory(&mut self, directory: impl Into<PathBuf>) {
        self.default_directory = Some(directory.into());
    }

    /// Factory tried after every loaded library has declined a name.
    pub fn set_default(&mut self, factory: DefaultLexerFn) {
        self.default_lexer = Some(factory);
    }

    /// Replace the loaded libraries with those named by a `;`-separated list.
    ///
    /// Loading the same list again changes nothing. Entries that fail to load are
    /// skipped. Returns whether at least one library is loaded.
    pub fn load(&mut self, path_list: &str) -> bool {
        if self.last_loaded.as_deref() == Some(path_list) {
            return self.libraries_loaded();
        }
        self.libraries.clear();
        self.lexers.clear();
        self.library_properties.clear();

        for entry in path_list.split(';').filter(|entry| !entry.is_empty()) {
            let path = self.resolve(entry);
            match self.loader.load(&path) {
                Ok(library) => {
                    self.lexers.extend(library.lexer_names());
                    let prefix = library
                        .name_space()
                        .map(|name_space| format!("{name_space}{NAME_SPACE_SEPARATOR}"))
                        .unwrap_or_default();
                    tracing::debug!(
                        path = %path.display(),
                        prefix = prefix.as_str(),
                        "loaded lexer library"
                    );
                    self.libraries.push(LoadedLibrary { library, prefix });
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping lexer library");
                }
            }
        }

        let names: BTreeSet<String> = self
            .libraries
            .iter()
            .flat_map(|loaded| {
                loaded
                    .library
                    .library_property_names()
                    .split('\n')
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        self.library_properties = names.into_iter().collect();
        self.last_loaded = Some(path_list.to_string());
        tracing::info!(
            libraries = self.libraries.len(),
            lexers = self.lexers.len(),
            "lexer libraries loaded"
        );
        self.libraries_loaded()
    }

    fn resolve(&self, entry: &str) -> PathBuf {
        let mut path = if entry == "." {
            match &self.default_directory {
                Some(directory) => directory.join(DEFAULT_LIBRARY),
                None => PathBuf::from(DEFAULT_LIBRARY),
            }
        } else {
            PathBuf::from(entry)
        };
        if !name_contains_dot(&path) {
            let mut name = path.into_os_string();
            name.push(".");
            name.push(std::env::consts::DLL_EXTENSION);
            path = PathBuf::from(name);
        }
        path
    }

    /// Whether any library is loaded.
    pub fn libraries_loaded(&self) -> bool {
        !self.libraries.is_empty()
    }

    /// Create a lexer for `name`.
    ///
    /// Libraries whose namespace prefixes `name` are asked first with the prefix
    /// stripped, then every library is asked for `name` as given, then the default
    /// factory. `None` means no one knows the language.
    pub fn make_lexer(&self, name: &str) -> Option<Box<dyn Lexer>> {
        let by_name_space = self.libraries.iter().find_map(|loaded| {
            if loaded.prefix.is_empty() {
                return None;
            }
            let inner = name.strip_prefix(loaded.prefix.as_str())?;
            loaded.library.create_lexer(inner)
        });
        if let Some(lexer) = by_name_space {
            return Some(lexer);
        }
        if let Some(lexer) = self
            .libraries
            .iter()
            .find_map(|loaded| loaded.library.create_lexer(name))
        {
            return Some(lexer);
        }
        let lexer = self.default_lexer.and_then(|factory| factory(name));
        if lexer.is_none() {
            tracing::debug!(name, "no lexer for language");
        }
        lexer
    }

    /// Lexer names of every loaded library, in load order.
    pub fn lexers(&self) -> Vec<String> {
        self.lexers.clone()
    }

    /// Name of the lexer with a numeric language id.
    pub fn name_from_id(&self, id: i32) -> Option<&str> {
        self.libraries
            .iter()
            .find_map(|loaded| loaded.library.lexer_name_from_id(id))
    }

    /// Sorted, de-duplicated library property names.
    pub fn library_properties(&self) -> Vec<String> {
        self.library_properties.clone()
    }

    /// Pass a library property to every loaded library.
    pub fn set_property(&self, key: &str, value: &str) {
        for loaded in &self.libraries {
            loaded.library.set_library_property(key, value);
        }
    }
}

/// Whether the final path component has an extension-like `.`.
fn name_contains_dot(path: &Path) -> bool {
    path.to_string_lossy()
        .chars()
        .rev()
        .take_while(|&ch| ch != '/' && ch != '\\')
        .any(|ch| ch == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_name_contains_dot() {
        assert!(name_contains_dot(Path::new("lexkit.so")));
        assert!(!name_contains_dot(Path::new("./lexers/lexkit")));
        assert!(name_contains_dot(Path::new("a.b/lexkit.dll")));
        assert!(!name_contains_dot(Path::new("a.b/lexkit")));
    }

    #[test]
    fn test_resolve() {
        let mut registry = LexerRegistry::default();
        let ext = std::env::consts::DLL_EXTENSION;
        assert_eq!(registry.resolve("."), PathBuf::from(format!("lexkit.{ext}")));
        registry.set_default_directory("/opt/lex");
        assert_eq!(
            registry.resolve("."),
            PathBuf::from(format!("/opt/lex/lexkit.{ext}"))
        );
        assert_eq!(registry.resolve("x/y.lib"), PathBuf::from("x/y.lib"));
    }

    #[test]
    fn test_catalogue_loader_resolves_by_stem() {
        let loader = CatalogueLoader::default();
        assert!(loader.load(Path::new("./lexers/lexkit.so")).is_ok());
        assert!(loader.load(Path::new("lexkit")).is_ok());
        assert!(matches!(
            loader.load(Path::new("other.so")),
            Err(AccessError::LibraryNotFound(_))
        ));
        assert!(CatalogueLoader::empty().load(Path::new("lexkit")).is_err());
    }
}
