//! Behavioural checks every lexer must pass on any text.

use crate::render::{folded_document, marked_document};
use lexkit::{Document, Lexer, LineEnding, StyleId, TextDocument};
use thiserror::Error;

/// How a text is lexed before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSettings {
    /// Times the whole document is lexed before folding.
    pub repeat_lex: usize,
    /// Times the whole document is folded.
    pub repeat_fold: usize,
    /// Whether to compare against styling one line at a time.
    pub per_line: bool,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            repeat_lex: 1,
            repeat_fold: 1,
            per_line: true,
        }
    }
}

/// One broken expectation. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("lexing and folding again changed the result")]
    /// A second pass over a styled document gave a different result.
    NotIdempotent,

    #[error("restarting at line {line} differs from styling in one pass")]
    /// Resuming from a line start disagreed with a whole-document pass.
    Restart {
        /// The line styling resumed at.
        line: usize,
    },

    #[error("styling line by line differs at line {line}")]
    /// Styling one line at a time disagreed with a whole-document pass.
    PerLine {
        /// First rendered line that differs.
        line: usize,
    },

    #[error("style {style} used at {pos} has no metadata")]
    /// The lexer wrote a style it does not describe.
    UndescribedStyle {
        /// Byte position of the first use.
        pos: usize,
        /// The style.
        style: StyleId,
    },

    #[error("different styles between \\r and \\n at {pos}: {cr}, {lf}")]
    /// The halves of a CRLF pair were styled differently.
    SplitLineEnd {
        /// Line of the pair.
        line: usize,
        /// Position of the `'\n'`.
        pos: usize,
        /// Style of the `'\r'`.
        cr: StyleId,
        /// Style of the `'\n'`.
        lf: StyleId,
    },

    #[error("CRLF styles differ from LF styles at line {line}")]
    /// Converting line ends changed the styles.
    CrlfStyles {
        /// First rendered line that differs.
        line: usize,
    },

    #[error("CRLF folds differ from LF folds at line {line}")]
    /// Converting line ends changed the fold levels.
    CrlfFolds {
        /// First rendered line that differs.
        line: usize,
    },

    #[error("interface: {0}")]
    /// A property, word list or style query misbehaved.
    Interface(String),
}

/// The outcome of [`check_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Every broken expectation, in the order checks ran.
    pub failures: Vec<Failure>,
}

impl CheckReport {
    /// Whether every check passed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

fn style_range(lexer: &dyn Lexer, doc: &mut dyn Document, start: usize, end: usize) {
    let init_style = if start > 0 { doc.style_at(start - 1) } else { 0 };
    lexer.lex(start, end - start, init_style, doc);
    lexer.fold(start, end - start, init_style, doc);
}

/// Lex and fold each line on its own, starting from the style of the previous byte.
pub fn style_line_by_line(doc: &mut dyn Document, lexer: &dyn Lexer) {
    for line in 0..doc.line_count() {
        let start = doc.line_start(line);
        let end = doc.line_start(line + 1);
        style_range(lexer, doc, start, end);
    }
}

/// Lex then fold the whole document as often as `settings` asks.
pub fn style_document(doc: &mut dyn Document, lexer: &dyn Lexer, settings: &CheckSettings) {
    let len = doc.len();
    for _ in 0..settings.repeat_lex.max(1) {
        lexer.lex(0, len, 0, doc);
    }
    for _ in 0..settings.repeat_fold.max(1) {
        lexer.fold(0, len, 0, doc);
    }
}

/// Styled and folded renderings of `text` after a whole-document pass.
pub fn render_text(lexer: &dyn Lexer, text: &str, settings: &CheckSettings) -> (String, String) {
    let mut doc = TextDocument::from_text(text);
    style_document(&mut doc, lexer, settings);
    (marked_document(&doc), folded_document(&doc))
}

/// First 1-based line at which two renderings differ.
pub fn first_difference(expected: &str, actual: &str) -> Option<usize> {
    if expected == actual {
        return None;
    }
    let mut expected_lines = expected.split('\n');
    let mut actual_lines = actual.split('\n');
    let mut line = 1;
    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (Some(a), Some(b)) if a == b => line += 1,
            _ => return Some(line),
        }
    }
}

/// Run [`check_text_with`] with default settings.
pub fn check_text(lexer: &mut dyn Lexer, text: &str) -> CheckReport {
    check_text_with(lexer, text, &CheckSettings::default())
}

/// Check that `lexer` styles `text` consistently however the work is split.
pub fn check_text_with(lexer: &mut dyn Lexer, text: &str, settings: &CheckSettings) -> CheckReport {
    let mut failures = check_interface(lexer);
    let lexer: &dyn Lexer = &*lexer;

    let mut doc = TextDocument::from_text(text);
    style_document(&mut doc, lexer, settings);
    let expected = (marked_document(&doc), folded_document(&doc));

    let len = doc.len();
    style_range(lexer, &mut doc, 0, len);
    if (marked_document(&doc), folded_document(&doc)) != expected {
        failures.push(Failure::NotIdempotent);
    }

    if let Some(pos) = (0..len).find(|&pos| lexer.style_info(doc.style_at(pos)).is_none()) {
        failures.push(Failure::UndescribedStyle {
            pos,
            style: doc.style_at(pos),
        });
    }

    for line in 1..doc.line_count() {
        let split = doc.line_start(line);
        if split >= len {
            break;
        }
        let mut restarted = TextDocument::from_text(text);
        style_range(lexer, &mut restarted, 0, split);
        style_range(lexer, &mut restarted, split, len);
        if (marked_document(&restarted), folded_document(&restarted)) != expected {
            failures.push(Failure::Restart { line: line + 1 });
            break;
        }
    }

    if settings.per_line {
        let mut by_line = TextDocument::from_text(text);
        style_line_by_line(&mut by_line, lexer);
        let line = first_difference(&expected.0, &marked_document(&by_line))
            .or_else(|| first_difference(&expected.1, &folded_document(&by_line)));
        if let Some(line) = line {
            failures.push(Failure::PerLine { line });
        }
    }

    failures.extend(check_line_ends(lexer, text, settings));
    tracing::debug!(
        lexer = lexer.name(),
        failures = failures.len(),
        "checked text"
    );
    CheckReport { failures }
}

/// Compare a CRLF rendition of `text` against its LF rendition.
fn check_line_ends(lexer: &dyn Lexer, text: &str, settings: &CheckSettings) -> Vec<Failure> {
    let mut failures = Vec::new();
    let (lf_styled, lf_folded) = render_text(lexer, &LineEnding::Lf.apply_to_text(text), settings);

    let mut doc = TextDocument::from_text(&LineEnding::Crlf.apply_to_text(text));
    style_document(&mut doc, lexer, settings);
    let split = (1..doc.len()).find(|&pos| {
        doc.byte_at(pos) == Some(b'\n')
            && doc.byte_at(pos - 1) == Some(b'\r')
            && doc.style_at(pos) != doc.style_at(pos - 1)
    });
    if let Some(pos) = split {
        failures.push(Failure::SplitLineEnd {
            line: doc.line_from_position(pos) + 1,
            pos,
            cr: doc.style_at(pos - 1),
            lf: doc.style_at(pos),
        });
    }

    let crlf = LineEnding::Crlf;
    if let Some(line) = first_difference(&crlf.apply_to_text(&lf_styled), &marked_document(&doc)) {
        failures.push(Failure::CrlfStyles { line });
    }
    if let Some(line) = first_difference(&crlf.apply_to_text(&lf_folded), &folded_document(&doc)) {
        failures.push(Failure::CrlfFolds { line });
    }
    failures
}

/// Exercise the configuration surface of a lexer with unknown keys and indices.
pub fn check_interface(lexer: &mut dyn Lexer) -> Vec<Failure> {
    let mut failures = Vec::new();
    let mut fail = |message: String| failures.push(Failure::Interface(message));

    if lexer.name().is_empty() {
        fail("empty lexer name".to_string());
    }
    if lexer.identifier() < 0 {
        fail(format!("negative identifier {}", lexer.identifier()));
    }
    for name in lexer.property_names().split('\n').filter(|name| !name.is_empty()) {
        if lexer.describe_property(name).is_empty() {
            fail(format!("property '{name}' has no description"));
        }
    }
    if !lexer.describe_property("unknown").is_empty() {
        fail("unknown property has a description".to_string());
    }
    if lexer.property_set("unknown", "unknown") {
        fail("setting an unknown property asked for a restyle".to_string());
    }
    if lexer.property_get("unknown").is_some() {
        fail("unknown property has a value".to_string());
    }
    let word_lists = lexer.word_list_descriptions().len();
    if lexer.word_list_set(word_lists, "unknown").is_ok() {
        fail(format!("word list {word_lists} accepted past the last set"));
    }
    for info in lexer.styles() {
        if info.name.is_empty() {
            fail(format!("style {} has no name", info.style));
        } else if lexer.name_of_style(info.style) != info.name {
            fail(format!("style {} is described twice", info.style));
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference("a\nb\nc", "a\nb\nc"), None);
        assert_eq!(first_difference("a\nb\nc", "a\nx\nc"), Some(2));
        assert_eq!(first_difference("a\nb", "a\nb\nc"), Some(3));
        assert_eq!(first_difference("", "x"), Some(1));
    }

    #[test]
    fn test_default_settings() {
        let settings = CheckSettings::default();
        assert_eq!((settings.repeat_lex, settings.repeat_fold), (1, 1));
        assert!(settings.per_line);
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            Failure::SplitLineEnd {
                line: 2,
                pos: 9,
                cr: 1,
                lf: 0
            }
            .to_string(),
            "different styles between \\r and \\n at 9: 1, 0"
        );
        assert_eq!(
            Failure::Restart { line: 4 }.to_string(),
            "restarting at line 4 differs from styling in one pass"
        );
    }
}
