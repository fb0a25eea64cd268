//! Checking a directory of example files against their golden renderings.
//!
//! A checked directory holds a `lexkit.yaml` with the language table and harness
//! settings, the example files, and beside each example its expected `.styled` and
//! `.folded` renderings:
//!
//! ```yaml
//! languages:
//!   python:
//!     extensions: [py]
//!     keywords: ["def class return"]
//! settings:
//!   testlexers.repeat.lex: 2
//!   testlexers.per.line.disable: true
//! ```

use crate::check::{CheckSettings, check_text_with, first_difference, render_text};
use crate::error::CheckError;
use lexkit_access::{AccessError, LanguageConfig, LexerRegistry, PropertyValue};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const CONFIG_FILE: &str = "lexkit.yaml";

/// Suffix of expected style renderings.
pub const STYLED_SUFFIX: &str = ".styled";

/// Suffix of expected fold renderings.
pub const FOLDED_SUFFIX: &str = ".folded";

/// Suffix added to a rendering that did not match its expectation.
pub const NEW_SUFFIX: &str = ".new";

const BOM: &str = "\u{feff}";

/// The configuration of one checked directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarnessConfig {
    #[serde(flatten)]
    /// Languages of the example files.
    pub language_config: LanguageConfig,

    #[serde(default)]
    /// `testlexers.*` keys.
    pub settings: BTreeMap<String, PropertyValue>,
}

impl HarnessConfig {
    pub fn load_from_str(yaml: &str) -> Result<Self, CheckError> {
        serde_yaml::from_str(yaml).map_err(|err| CheckError::Config(err.into()))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, CheckError> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::load_from_str(&yaml)
    }

    fn setting(&self, key: &str) -> Option<i64> {
        match self.settings.get(key)? {
            PropertyValue::Flag(flag) => Some(i64::from(*flag)),
            PropertyValue::Number(number) => Some(*number),
            PropertyValue::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Settings from the `testlexers.*` keys.
    pub fn check_settings(&self) -> CheckSettings {
        let count = |key| {
            self.setting(key)
                .and_then(|value| usize::try_from(value).ok())
                .unwrap_or(1)
        };
        CheckSettings {
            repeat_lex: count("testlexers.repeat.lex"),
            repeat_fold: count("testlexers.repeat.fold"),
            per_line: self.setting("testlexers.per.line.disable").unwrap_or(0) == 0,
        }
    }
}

/// What went wrong with one example file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// The file could not be checked at all.
    Unchecked(String),
    /// The `.styled` expectation is missing or differs at a 1-based line.
    StyledMismatch(Option<usize>),
    /// The `.folded` expectation is missing or differs at a 1-based line.
    FoldedMismatch(Option<usize>),
    /// A behavioural check failed.
    Check(crate::check::Failure),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchecked(reason) => write!(f, "not checked: {reason}"),
            Self::StyledMismatch(None) => write!(f, "no {STYLED_SUFFIX} expectation"),
            Self::StyledMismatch(Some(line)) => write!(f, "{line}: styles differ"),
            Self::FoldedMismatch(None) => write!(f, "no {FOLDED_SUFFIX} expectation"),
            Self::FoldedMismatch(Some(line)) => write!(f, "{line}: folds differ"),
            Self::Check(failure) => write!(f, "{failure}"),
        }
    }
}

/// The result of checking one example file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub problems: Vec<Problem>,
}

impl FileOutcome {
    pub fn passed(&self) -> bool {
        self.problems.is_empty()
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn read_optional(path: &Path) -> Result<Option<String>, CheckError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Compare `actual` with the expectation at `path + suffix`, writing `.new` on mismatch.
fn compare_rendering(
    path: &Path,
    suffix: &str,
    actual: &str,
) -> Result<Option<Option<usize>>, CheckError> {
    let expected_path = with_suffix(path, suffix);
    let new_path = with_suffix(&expected_path, NEW_SUFFIX);
    let difference = match read_optional(&expected_path)? {
        Some(expected) => first_difference(&expected, actual).map(Some),
        None => Some(None),
    };
    if difference.is_some() {
        std::fs::write(&new_path, actual)?;
        tracing::debug!(path = %new_path.display(), "wrote new rendering");
    } else if new_path.exists() {
        std::fs::remove_file(&new_path)?;
    }
    Ok(difference)
}

/// Restricts which example files are checked.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pattern: Option<Regex>,
}

impl FileFilter {
    /// Accept every example file.
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept files whose path matches `pattern` anywhere.
    pub fn matching(pattern: &str) -> Result<Self, CheckError> {
        Ok(Self {
            pattern: Some(Regex::new(pattern)?),
        })
    }

    /// Whether `path` should be checked.
    pub fn accepts(&self, path: &Path) -> bool {
        self.pattern
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(&path.to_string_lossy()))
    }
}

/// Whether a directory entry is an example rather than an expectation or config.
pub fn is_example_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    name != CONFIG_FILE
        && ![STYLED_SUFFIX, FOLDED_SUFFIX, NEW_SUFFIX]
            .iter()
            .any(|suffix| name.ends_with(suffix))
}

/// Check one example file.
///
/// Golden renderings are compared first. The behavioural checks only run once both
/// match, since their failures would repeat the mismatch.
pub fn check_file(
    path: &Path,
    config: &HarnessConfig,
    registry: &LexerRegistry,
) -> Result<FileOutcome, CheckError> {
    let file_name = path.to_string_lossy();
    let mut lexer = match config
        .language_config
        .make_lexer_for_file(registry, &file_name)
    {
        Ok(lexer) => lexer,
        Err(AccessError::UnknownLanguage(_) | AccessError::MissingLexer(_)) => {
            return Err(CheckError::NoLexer(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };

    let bytes = std::fs::read(path)?;
    let raw = String::from_utf8_lossy(&bytes);
    let text = raw.strip_prefix(BOM).unwrap_or(&*raw);
    let settings = config.check_settings();
    let (styled, folded) = render_text(&*lexer, text, &settings);

    let mut problems = Vec::new();
    if let Some(line) = compare_rendering(path, STYLED_SUFFIX, &styled)? {
        problems.push(Problem::StyledMismatch(line));
    }
    if let Some(line) = compare_rendering(path, FOLDED_SUFFIX, &folded)? {
        problems.push(Problem::FoldedMismatch(line));
    }
    if problems.is_empty() {
        let report = check_text_with(&mut *lexer, text, &settings);
        problems.extend(report.failures.into_iter().map(Problem::Check));
    }
    Ok(FileOutcome {
        path: path.to_path_buf(),
        problems,
    })
}

/// Check every example file directly inside `dir`, in name order.
pub fn run_directory(
    dir: &Path,
    config: &HarnessConfig,
    registry: &LexerRegistry,
) -> Result<Vec<FileOutcome>, CheckError> {
    run_directory_filtered(dir, config, registry, &FileFilter::all())
}

/// [`run_directory`] restricted to the files `filter` accepts.
pub fn run_directory_filtered(
    dir: &Path,
    config: &HarnessConfig,
    registry: &LexerRegistry,
    filter: &FileFilter,
) -> Result<Vec<FileOutcome>, CheckError> {
    let mut paths = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();

    let mut outcomes = Vec::new();
    let examples = paths
        .into_iter()
        .filter(|path| path.is_file() && is_example_file(path) && filter.accepts(path));
    for path in examples {
        tracing::info!(path = %path.display(), "lexing");
        let outcome = match check_file(&path, config, registry) {
            Ok(outcome) => outcome,
            Err(err @ (CheckError::NoLexer(_) | CheckError::Config(_))) => FileOutcome {
                path: path.clone(),
                problems: vec![Problem::Unchecked(err.to_string())],
            },
            Err(err) => return Err(err),
        };
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Check every directory under `root` that holds a [`CONFIG_FILE`].
pub fn run_tree(
    root: &Path,
    registry: &LexerRegistry,
    filter: &FileFilter,
) -> Result<Vec<FileOutcome>, CheckError> {
    let mut outcomes = Vec::new();
    let config_path = root.join(CONFIG_FILE);
    if config_path.is_file() {
        let config = HarnessConfig::load_from_path(&config_path)?;
        outcomes.extend(run_directory_filtered(root, &config, registry, filter)?);
    }

    let mut children = std::fs::read_dir(root)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    children.sort();
    for child in children.into_iter().filter(|path| path.is_dir()) {
        outcomes.extend(run_tree(&child, registry, filter)?);
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_check_settings() {
        let config = HarnessConfig::load_from_str(
            "languages:\n  toml:\n    extensions: [toml]\nsettings:\n  testlexers.repeat.lex: 3\n  \
             testlexers.repeat.fold: \"2\"\n  testlexers.per.line.disable: true\n",
        )
        .unwrap();
        assert!(config.language_config.languages.contains_key("toml"));
        assert_eq!(
            config.check_settings(),
            CheckSettings {
                repeat_lex: 3,
                repeat_fold: 2,
                per_line: false,
            }
        );
        assert_eq!(
            HarnessConfig::default().check_settings(),
            CheckSettings::default()
        );
    }

    #[test]
    fn test_is_example_file() {
        assert!(is_example_file(Path::new("dir/x.py")));
        assert!(!is_example_file(Path::new("dir/x.py.styled")));
        assert!(!is_example_file(Path::new("dir/x.py.folded")));
        assert!(!is_example_file(Path::new("dir/x.py.styled.new")));
        assert!(!is_example_file(Path::new("dir/lexkit.yaml")));
    }

    #[test]
    fn test_file_filter() {
        let filter = FileFilter::matching(r"\.py$").unwrap();
        assert!(filter.accepts(Path::new("corpus/script.py")));
        assert!(!filter.accepts(Path::new("corpus/style.css")));
        assert!(FileFilter::all().accepts(Path::new("anything")));
        assert!(matches!(
            FileFilter::matching("(unclosed"),
            Err(CheckError::Filter(_))
        ));
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(
            with_suffix(Path::new("a/b.css"), STYLED_SUFFIX),
            PathBuf::from("a/b.css.styled")
        );
    }

    #[test]
    fn test_bad_config() {
        assert!(matches!(
            HarnessConfig::load_from_str("settings: [1"),
            Err(CheckError::Config(AccessError::Yaml(_)))
        ));
    }
}
