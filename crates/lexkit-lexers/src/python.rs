//! Python.
//!
//! Strings carry all cross-line context: a triple-quoted string, or a single-quoted one
//! continued with a trailing backslash, simply keeps its style on the line terminator and
//! the next pass resumes from that style. No line state is stored.
//!
//! Folding follows indentation and reads raw text only, so a line can be folded as soon
//! as it and the lines before it are styled.

use lexkit::char_class::{is_alnum, is_alpha, is_digit, is_eol, is_operator, is_space_or_tab};
use lexkit::options::set_bool;
use lexkit::{
    Accessor, Document, FoldLevel, Lexer, LexerError, OptionDef, OptionSet, PropertyType,
    StyleContext, StyleId, StyleInfo, WordLists, fold_lines, start_level,
};

/// Style ids written by [`PythonLexer`].
pub mod style {
    #![allow(missing_docs)]

    use lexkit::StyleId;

    pub const DEFAULT: StyleId = 0;
    pub const COMMENTLINE: StyleId = 1;
    pub const NUMBER: StyleId = 2;
    pub const STRING: StyleId = 3;
    pub const CHARACTER: StyleId = 4;
    pub const WORD: StyleId = 5;
    pub const TRIPLE: StyleId = 6;
    pub const TRIPLEDOUBLE: StyleId = 7;
    pub const CLASSNAME: StyleId = 8;
    pub const DEFNAME: StyleId = 9;
    pub const OPERATOR: StyleId = 10;
    pub const IDENTIFIER: StyleId = 11;
    pub const COMMENTBLOCK: StyleId = 12;
    pub const STRINGEOL: StyleId = 13;
    pub const WORD2: StyleId = 14;
    pub const DECORATOR: StyleId = 15;
    /// A numeric literal with digits or suffixes its base does not allow.
    pub const NUMBERERROR: StyleId = 21;
}

use style::*;

static STYLES: &[StyleInfo] = &[
    StyleInfo {
        style: DEFAULT,
        name: "SCE_P_DEFAULT",
        tags: "default",
        description: "White space",
    },
    StyleInfo {
        style: COMMENTLINE,
        name: "SCE_P_COMMENTLINE",
        tags: "comment line",
        description: "Comment",
    },
    StyleInfo {
        style: NUMBER,
        name: "SCE_P_NUMBER",
        tags: "literal numeric",
        description: "Number",
    },
    StyleInfo {
        style: STRING,
        name: "SCE_P_STRING",
        tags: "literal string",
        description: "String",
    },
    StyleInfo {
        style: CHARACTER,
        name: "SCE_P_CHARACTER",
        tags: "literal string",
        description: "Single quoted string",
    },
    StyleInfo {
        style: WORD,
        name: "SCE_P_WORD",
        tags: "keyword",
        description: "Keyword",
    },
    StyleInfo {
        style: TRIPLE,
        name: "SCE_P_TRIPLE",
        tags: "literal string",
        description: "Triple quotes",
    },
    StyleInfo {
        style: TRIPLEDOUBLE,
        name: "SCE_P_TRIPLEDOUBLE",
        tags: "literal string",
        description: "Triple double quotes",
    },
    StyleInfo {
        style: CLASSNAME,
        name: "SCE_P_CLASSNAME",
        tags: "identifier",
        description: "Class name definition",
    },
    StyleInfo {
        style: DEFNAME,
        name: "SCE_P_DEFNAME",
        tags: "identifier",
        description: "Function or method name definition",
    },
    StyleInfo {
        style: OPERATOR,
        name: "SCE_P_OPERATOR",
        tags: "operator",
        description: "Operators",
    },
    StyleInfo {
        style: IDENTIFIER,
        name: "SCE_P_IDENTIFIER",
        tags: "identifier",
        description: "Identifiers",
    },
    StyleInfo {
        style: COMMENTBLOCK,
        name: "SCE_P_COMMENTBLOCK",
        tags: "comment",
        description: "Comment-blocks",
    },
    StyleInfo {
        style: STRINGEOL,
        name: "SCE_P_STRINGEOL",
        tags: "error literal string",
        description: "End of line where string is not closed",
    },
    StyleInfo {
        style: WORD2,
        name: "SCE_P_WORD2",
        tags: "identifier",
        description: "Highlighted identifiers",
    },
    StyleInfo {
        style: DECORATOR,
        name: "SCE_P_DECORATOR",
        tags: "preprocessor",
        description: "Decorators",
    },
    StyleInfo {
        style: NUMBERERROR,
        name: "SCE_P_NUMBERERROR",
        tags: "error literal numeric",
        description: "Malformed number",
    },
];

static WORD_LIST_DESCRIPTIONS: [&str; 2] = ["Keywords", "Highlighted identifiers"];

/// Columns a tab advances to, as in the interpreter's tokenizer.
const TAB_WIDTH: i32 = 8;

#[derive(Debug, Clone)]
struct PythonOptions {
    fold_compact: bool,
    fold_quotes: bool,
    strings_over_newline: bool,
    binary_literals: bool,
    strings_u: bool,
    strings_b: bool,
    strings_f: bool,
    keywords2_no_sub_identifiers: bool,
    unicode_identifiers: bool,
}

impl Default for PythonOptions {
    fn default() -> Self {
        Self {
            fold_compact: true,
            fold_quotes: false,
            strings_over_newline: false,
            binary_literals: true,
            strings_u: true,
            strings_b: true,
            strings_f: true,
            keywords2_no_sub_identifiers: false,
            unicode_identifiers: true,
        }
    }
}

static OPTIONS: &[OptionDef<PythonOptions>] = &[
    OptionDef {
        name: "fold.compact",
        kind: PropertyType::Boolean,
        description: "Mark blank lines as white so they fold with the preceding block.",
        set: |o, v| set_bool(&mut o.fold_compact, v),
    },
    OptionDef {
        name: "fold.quotes.python",
        kind: PropertyType::Boolean,
        description: "Fold multi-line triple-quoted strings.",
        set: |o, v| set_bool(&mut o.fold_quotes, v),
    },
    OptionDef {
        name: "lexer.python.strings.over.newline",
        kind: PropertyType::Boolean,
        description: "Let single-quoted strings run past the end of a line without a backslash.",
        set: |o, v| set_bool(&mut o.strings_over_newline, v),
    },
    OptionDef {
        name: "lexer.python.literals.binary",
        kind: PropertyType::Boolean,
        description: "Recognise 0b and 0o number prefixes.",
        set: |o, v| set_bool(&mut o.binary_literals, v),
    },
    OptionDef {
        name: "lexer.python.strings.u",
        kind: PropertyType::Boolean,
        description: "Treat 'u' as a string prefix.",
        set: |o, v| set_bool(&mut o.strings_u, v),
    },
    OptionDef {
        name: "lexer.python.strings.b",
        kind: PropertyType::Boolean,
        description: "Treat 'b' as a string prefix.",
        set: |o, v| set_bool(&mut o.strings_b, v),
    },
    OptionDef {
        name: "lexer.python.strings.f",
        kind: PropertyType::Boolean,
        description: "Treat 'f' as a string prefix.",
        set: |o, v| set_bool(&mut o.strings_f, v),
    },
    OptionDef {
        name: "lexer.python.keywords2.no.sub.identifiers",
        kind: PropertyType::Boolean,
        description: "Do not highlight second keyword set words that follow a '.'.",
        set: |o, v| set_bool(&mut o.keywords2_no_sub_identifiers, v),
    },
    OptionDef {
        name: "lexer.python.unicode.identifiers",
        kind: PropertyType::Boolean,
        description: "Allow non-ASCII characters in identifiers.",
        set: |o, v| set_bool(&mut o.unicode_identifiers, v),
    },
];

fn is(ch: u32, c: u8) -> bool {
    ch == u32::from(c)
}

fn is_quote(ch: u32) -> bool {
    is(ch, b'"') || is(ch, b'\'')
}

fn is_raw_prefix(ch: u32) -> bool {
    is(ch, b'r') || is(ch, b'R')
}

fn is_triple(style: StyleId) -> bool {
    style == TRIPLE || style == TRIPLEDOUBLE
}

/// The keyword that decides how the next identifier is styled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Pending {
    #[default]
    Other,
    Class,
    Def,
    Import,
}

/// State that never outlives a line.
#[derive(Debug, Default)]
struct LineScan {
    pending: Pending,
    /// The open number has a `0x`/`0o`/`0b` prefix, so `e+` is not an exponent.
    base_n: bool,
    /// A backslash ends the line inside a single-quoted string.
    continued: bool,
}

/// Whether `text` is a well-formed numeric literal.
fn is_valid_number(text: &str, binary_literals: bool) -> bool {
    fn digits(s: &str, radix: u32) -> bool {
        s.chars().all(|c| c == '_' || c.is_digit(radix))
    }

    let bytes = text.as_bytes();
    let radix = match bytes {
        [b'0', b'x' | b'X', ..] => Some(16),
        [b'0', b'o' | b'O', ..] if binary_literals => Some(8),
        [b'0', b'b' | b'B', ..] if binary_literals => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let body = &text[2..];
        let body = body.strip_suffix(['l', 'L']).unwrap_or(body);
        return !body.is_empty() && digits(body, radix);
    }

    let body = text.strip_suffix(['j', 'J', 'l', 'L']).unwrap_or(text);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    };
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (mantissa, ""),
    };
    let exponent_ok = exponent.is_none_or(|e| {
        let e = e.strip_prefix(['+', '-']).unwrap_or(e);
        !e.is_empty() && digits(e, 10)
    });
    !(whole.is_empty() && fraction.is_empty())
        && digits(whole, 10)
        && digits(fraction, 10)
        && exponent_ok
}

/// Shape of a line as far as indentation folding cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Comment,
    Code,
}

fn line_shape(styler: &Accessor<'_>, line: usize) -> (LineKind, i32) {
    let mut indent = 0;
    for pos in styler.line_start(line)..styler.line_end(line) {
        match styler.char_at(pos) {
            b' ' => indent += 1,
            b'\t' => indent = (indent / TAB_WIDTH + 1) * TAB_WIDTH,
            b'#' => return (LineKind::Comment, indent),
            _ => return (LineKind::Code, indent),
        }
    }
    (LineKind::Blank, indent)
}

/// Python lexer and indentation folder.
pub struct PythonLexer {
    options: PythonOptions,
    option_set: OptionSet<PythonOptions>,
    keywords: WordLists<2>,
}

impl Default for PythonLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonLexer {
    /// Create a lexer with empty word lists.
    pub fn new() -> Self {
        Self {
            options: PythonOptions::default(),
            option_set: OptionSet::new(OPTIONS),
            keywords: WordLists::new("python", &WORD_LIST_DESCRIPTIONS),
        }
    }

    /// Factory for registries.
    pub fn factory() -> Box<dyn Lexer> {
        Box::new(Self::new())
    }

    fn is_word_start(&self, ch: u32) -> bool {
        is_alpha(ch) || is(ch, b'_') || (self.options.unicode_identifiers && ch >= 0x80)
    }

    fn is_word_char(&self, ch: u32) -> bool {
        is_alnum(ch) || is(ch, b'_') || (self.options.unicode_identifiers && ch >= 0x80)
    }

    fn is_type_prefix(&self, ch: u32) -> bool {
        (self.options.strings_b && (is(ch, b'b') || is(ch, b'B')))
            || (self.options.strings_u && (is(ch, b'u') || is(ch, b'U')))
            || (self.options.strings_f && (is(ch, b'f') || is(ch, b'F')))
    }

    /// Whether a string literal, possibly prefixed, starts at the cursor.
    ///
    /// `ur''` is a string but `ru''` is not; `br''`, `rb''`, `fr''` and `rf''` all are.
    fn is_string_start(&self, sc: &StyleContext<'_>) -> bool {
        let next2 = u32::from(sc.get_relative(2));
        if is_quote(sc.ch) {
            return true;
        }
        if self.is_type_prefix(sc.ch)
            && (is_quote(sc.ch_next) || (is_raw_prefix(sc.ch_next) && is_quote(next2)))
        {
            return true;
        }
        is_raw_prefix(sc.ch)
            && (is_quote(sc.ch_next)
                || (self.is_type_prefix(sc.ch_next)
                    && !is(sc.ch_next, b'u')
                    && !is(sc.ch_next, b'U')
                    && is_quote(next2)))
    }

    /// Open a string at the cursor, stepping over any prefix and the opening quotes.
    fn start_string(&self, sc: &mut StyleContext<'_>) {
        let mut prefix = 0;
        while prefix < 2 && !is_quote(u32::from(sc.get_relative(prefix))) {
            prefix += 1;
        }
        let quote = sc.get_relative(prefix);
        let triple = sc.get_relative(prefix + 1) == quote && sc.get_relative(prefix + 2) == quote;
        let state = match (quote, triple) {
            (b'"', true) => TRIPLEDOUBLE,
            (_, true) => TRIPLE,
            (b'"', false) => STRING,
            _ => CHARACTER,
        };
        sc.set_state(state);
        let skip = prefix as usize + if triple { 2 } else { 0 };
        sc.forward_n(skip);
    }

    fn step(&self, sc: &mut StyleContext<'_>, scan: &mut LineScan) {
        match sc.state {
            OPERATOR => {
                scan.pending = Pending::Other;
                sc.set_state(DEFAULT);
            }
            NUMBER => {
                let exponent_sign = !scan.base_n
                    && (is(sc.ch, b'+') || is(sc.ch, b'-'))
                    && (is(sc.ch_prev, b'e') || is(sc.ch_prev, b'E'));
                if !(is_alnum(sc.ch) || is(sc.ch, b'_') || is(sc.ch, b'.') || exponent_sign) {
                    if !is_valid_number(&sc.current_text(), self.options.binary_literals) {
                        sc.change_state(NUMBERERROR);
                    }
                    sc.set_state(DEFAULT);
                }
            }
            IDENTIFIER => {
                if !self.is_word_char(sc.ch) {
                    self.classify_identifier(sc, scan);
                }
            }
            COMMENTLINE | COMMENTBLOCK => {
                if is_eol(sc.ch) {
                    sc.set_state(DEFAULT);
                }
            }
            DECORATOR => {
                if !self.is_word_start(sc.ch) {
                    sc.set_state(DEFAULT);
                }
            }
            STRING | CHARACTER => {
                let quote = if sc.state == STRING { b'"' } else { b'\'' };
                if sc.at_line_end {
                    if scan.continued || self.options.strings_over_newline {
                        scan.continued = false;
                    } else {
                        sc.change_state(STRINGEOL);
                    }
                } else if is(sc.ch, b'\\') {
                    if is_eol(sc.ch_next) {
                        scan.continued = true;
                    } else {
                        sc.forward();
                    }
                } else if is(sc.ch, quote) {
                    sc.forward_set_state(DEFAULT);
                }
            }
            TRIPLE | TRIPLEDOUBLE => {
                let closing = if sc.state == TRIPLE { "'''" } else { "\"\"\"" };
                if is(sc.ch, b'\\') {
                    sc.forward();
                } else if sc.match_str(closing) {
                    sc.forward_n(2);
                    sc.forward_set_state(DEFAULT);
                }
            }
            STRINGEOL => {
                if sc.at_line_start {
                    sc.set_state(DEFAULT);
                }
            }
            _ => {}
        }

        if sc.state != DEFAULT {
            return;
        }
        if is_digit(sc.ch) || (is(sc.ch, b'.') && is_digit(sc.ch_next)) {
            let radix_prefix = is(sc.ch, b'0') && b"xXoObB".iter().any(|&c| is(sc.ch_next, c));
            let hex = is(sc.ch_next, b'x') || is(sc.ch_next, b'X');
            if radix_prefix && !hex && !self.options.binary_literals {
                // Without the option `0` is a number and `b101` a name.
                sc.set_state(NUMBER);
                sc.forward_set_state(IDENTIFIER);
            } else {
                scan.base_n = radix_prefix;
                sc.set_state(NUMBER);
            }
        } else if is_operator(sc.ch) || is(sc.ch, b'`') {
            sc.set_state(OPERATOR);
        } else if is(sc.ch, b'#') {
            sc.set_state(if is(sc.ch_next, b'#') {
                COMMENTBLOCK
            } else {
                COMMENTLINE
            });
        } else if is(sc.ch, b'@') {
            let first = sc.styler().first_non_blank(sc.current_line) == Some(sc.current_pos);
            sc.set_state(if first { DECORATOR } else { OPERATOR });
        } else if self.is_string_start(sc) {
            self.start_string(sc);
        } else if self.is_word_start(sc.ch) {
            sc.set_state(IDENTIFIER);
        }
    }

    /// The identifier run just ended: pick its style and remember defining keywords.
    fn classify_identifier(&self, sc: &mut StyleContext<'_>, scan: &mut LineScan) {
        let word = sc.current_text();
        let style = if scan.pending == Pending::Import && word == "as" {
            WORD
        } else if self.keywords[0].in_list(&word) && !self.is_soft_keyword_name(sc, &word) {
            WORD
        } else if scan.pending == Pending::Class {
            CLASSNAME
        } else if scan.pending == Pending::Def {
            DEFNAME
        } else if self.keywords[1].in_list(&word) {
            let start = sc.styler().start_seg();
            let after_dot = start > 0 && sc.styler().char_at(start - 1) == b'.';
            if self.options.keywords2_no_sub_identifiers && after_dot {
                IDENTIFIER
            } else {
                WORD2
            }
        } else {
            IDENTIFIER
        };
        sc.change_state(style);
        sc.set_state(DEFAULT);
        scan.pending = match (style, word.as_str()) {
            (WORD, "class") => Pending::Class,
            (WORD, "def") => Pending::Def,
            (WORD, "import" | "cimport") => Pending::Import,
            _ => Pending::Other,
        };
    }

    /// `match` and `case` are keywords only when they open a statement.
    fn is_soft_keyword_name(&self, sc: &StyleContext<'_>, word: &str) -> bool {
        if word != "match" && word != "case" {
            return false;
        }
        let styler = sc.styler();
        if styler.first_non_blank(sc.current_line) != Some(styler.start_seg()) {
            return true;
        }
        let end = styler.line_end(sc.current_line);
        let next_visible = |from: usize| {
            (from..end)
                .map(|pos| (pos, styler.char_at(pos)))
                .find(|&(_, ch)| !is_space_or_tab(u32::from(ch)))
        };
        match next_visible(sc.current_pos) {
            Some((_, b'=' | b'#')) => true,
            Some((pos, b'.')) => {
                !next_visible(pos + 1).is_some_and(|(_, ch)| ch.is_ascii_digit())
            }
            _ => false,
        }
    }

    /// Indentation of the next code line at or after `line`, skipping blank and comment
    /// lines, together with whether any skipped comment sits deeper than it.
    fn next_code_indent(styler: &Accessor<'_>, line: usize) -> (i32, bool) {
        let mut deepest_comment = -1;
        for candidate in line..styler.line_count() {
            match line_shape(styler, candidate) {
                (LineKind::Code, indent) => return (indent, deepest_comment > indent),
                (LineKind::Comment, indent) => deepest_comment = deepest_comment.max(indent),
                (LineKind::Blank, _) => {}
            }
        }
        (0, deepest_comment > 0)
    }

    fn previous_code_indent(styler: &Accessor<'_>, line: usize) -> i32 {
        (0..line)
            .rev()
            .find_map(|candidate| match line_shape(styler, candidate) {
                (LineKind::Code, indent) => Some(indent),
                _ => None,
            })
            .unwrap_or(0)
    }
}

impl Lexer for PythonLexer {
    fn name(&self) -> &'static str {
        "python"
    }

    fn identifier(&self) -> i32 {
        2
    }

    fn property_names(&self) -> &str {
        self.option_set.property_names()
    }

    fn property_type(&self, name: &str) -> PropertyType {
        self.option_set.property_type(name)
    }

    fn describe_property(&self, name: &str) -> &str {
        self.option_set.describe_property(name)
    }

    fn property_set(&mut self, key: &str, value: &str) -> bool {
        self.option_set.property_set(&mut self.options, key, value)
    }

    fn property_get(&self, key: &str) -> Option<&str> {
        self.option_set.property_get(key)
    }

    fn word_list_descriptions(&self) -> &[&'static str] {
        self.keywords.descriptions()
    }

    fn word_list_set(&mut self, index: usize, text: &str) -> Result<bool, LexerError> {
        self.keywords.set(index, text)
    }

    fn styles(&self) -> &'static [StyleInfo] {
        STYLES
    }

    fn lex(&self, start: usize, len: usize, init_style: StyleId, doc: &mut dyn Document) {
        let mut sc = StyleContext::new(start, len, init_style, doc);
        let mut scan = LineScan::default();
        while sc.more() {
            if sc.at_line_start {
                scan = LineScan::default();
                // A continued string becomes STRINGEOL on this line only.
                sc.set_state(sc.state);
            }
            self.step(&mut sc, &mut scan);
            sc.forward();
        }
        sc.complete();
    }

    fn fold(&self, start: usize, len: usize, _init_style: StyleId, doc: &mut dyn Document) {
        let lines = fold_lines(doc, start, len);
        let last = *lines.end();
        let mut styler = Accessor::new(doc);

        // Lines above may borrow their level from this range or open a block it ends,
        // so start again from the previous code line.
        let mut first = *lines.start();
        if first > 0 {
            first -= 1;
            while first > 0 && line_shape(&styler, first).0 != LineKind::Code {
                first -= 1;
            }
        }

        for line in first..=last {
            let (kind, indent) = line_shape(&styler, line);
            let line_start = styler.line_start(line);
            let in_quote = self.options.fold_quotes
                && line > 0
                && is_triple(styler.style_at(line_start - 1));
            let ends_in_quote = self.options.fold_quotes
                && line + 1 < styler.line_count()
                && is_triple(styler.style_at(styler.line_start(line + 1) - 1));

            let folded = if in_quote {
                let level = start_level(styler.document(), line);
                let next = if ends_in_quote {
                    level
                } else {
                    Self::next_code_indent(&styler, line + 1).0
                };
                FoldLevel::new(level, next)
            } else if ends_in_quote {
                FoldLevel::new(indent, indent + 1).with_header(true)
            } else if kind == LineKind::Code {
                let (next, _) = Self::next_code_indent(&styler, line + 1);
                FoldLevel::new(indent, next).with_header(next > indent)
            } else {
                let (after, deeper_comment) = Self::next_code_indent(&styler, line);
                let level = if deeper_comment {
                    Self::previous_code_indent(&styler, line).max(after)
                } else {
                    after
                };
                FoldLevel::new(level, level)
                    .with_white(kind == LineKind::Blank && self.options.fold_compact)
            };
            styler.set_level(line, folded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexkit::TextDocument;
    use pretty_assertions::assert_eq;

    const KEYWORDS: &str = "and as class def elif else for from if import in is not or \
                            pass return while with case match";

    fn lexer() -> PythonLexer {
        let mut lexer = PythonLexer::new();
        lexer.word_list_set(0, KEYWORDS).unwrap();
        lexer.word_list_set(1, "open len").unwrap();
        lexer
    }

    fn lex(lexer: &PythonLexer, text: &str) -> TextDocument {
        let mut doc = TextDocument::from_text(text);
        let len = doc.len();
        lexer.lex(0, len, 0, &mut doc);
        lexer.fold(0, len, 0, &mut doc);
        doc
    }

    fn styles_of(doc: &TextDocument, range: std::ops::Range<usize>) -> Vec<StyleId> {
        range.map(|pos| doc.style_at(pos)).collect()
    }

    #[test]
    fn test_number_validation() {
        for good in [
            "0", "12", "1_000", "0x1F", "0o17", "0b101", "1.5", ".5", "5.", "1e10", "1E-3", "2j",
            "10L",
        ] {
            assert!(is_valid_number(good, true), "{good}");
        }
        for bad in ["12abc", "0x", "0xG", "0b102", "1.2.3", "1e", "1e+"] {
            assert!(!is_valid_number(bad, true), "{bad}");
        }
    }

    #[test]
    fn test_definitions() {
        let doc = lex(&lexer(), "class Foo(Base):\n    def bar(self):\n        pass\n");
        assert_eq!(doc.style_at(0), WORD);
        assert_eq!(styles_of(&doc, 6..9), vec![CLASSNAME; 3]);
        assert_eq!(doc.style_at(9), OPERATOR);
        assert_eq!(doc.style_at(10), IDENTIFIER);
        assert_eq!(doc.style_at(21), WORD);
        assert_eq!(styles_of(&doc, 25..28), vec![DEFNAME; 3]);
    }

    #[test]
    fn test_soft_keywords() {
        let doc = lex(&lexer(), "match x:\n    case 1:\nmatch = 2\nfoo(match)\n");
        assert_eq!(doc.style_at(0), WORD);
        assert_eq!(doc.style_at(13), WORD);
        assert_eq!(doc.style_at(21), IDENTIFIER);
        assert_eq!(doc.style_at(35), IDENTIFIER);
    }

    #[test]
    fn test_numbers() {
        let doc = lex(&lexer(), "a = 0x1F + 1e+5 + 12abc\n");
        assert_eq!(styles_of(&doc, 4..8), vec![NUMBER; 4]);
        assert_eq!(styles_of(&doc, 11..15), vec![NUMBER; 4]);
        assert_eq!(styles_of(&doc, 18..23), vec![NUMBERERROR; 5]);
    }

    #[test]
    fn test_binary_literals_option() {
        let mut lexer = lexer();
        lexer.property_set("lexer.python.literals.binary", "0");
        let doc = lex(&lexer, "0b101\n");
        assert_eq!(doc.style_at(0), NUMBER);
        assert_eq!(styles_of(&doc, 1..5), vec![IDENTIFIER; 4]);
    }

    #[test]
    fn test_string_prefixes() {
        let doc = lex(&lexer(), "rb'x' u\"y\" ur'z' ru'w'\n");
        assert_eq!(styles_of(&doc, 0..5), vec![CHARACTER; 5]);
        assert_eq!(styles_of(&doc, 6..10), vec![STRING; 4]);
        assert_eq!(styles_of(&doc, 11..16), vec![CHARACTER; 5]);
        assert_eq!(doc.style_at(17), IDENTIFIER);
    }

    #[test]
    fn test_unterminated_string_without_newline() {
        let doc = lex(&lexer(), "x = \"abc");
        assert_eq!(styles_of(&doc, 4..8), vec![STRINGEOL; 4]);
    }

    #[test]
    fn test_unterminated_string_with_newline() {
        let doc = lex(&lexer(), "x = \"abc\ny\n");
        assert_eq!(styles_of(&doc, 4..9), vec![STRINGEOL; 5]);
        assert_eq!(doc.style_at(9), IDENTIFIER);
    }

    #[test]
    fn test_backslash_continues_string() {
        let doc = lex(&lexer(), "s = 'ab\\\ncd'\nx\n");
        assert_eq!(styles_of(&doc, 4..12), vec![CHARACTER; 8]);
        assert_eq!(doc.style_at(13), IDENTIFIER);
    }

    #[test]
    fn test_strings_over_newline() {
        let mut lexer = lexer();
        lexer.property_set("lexer.python.strings.over.newline", "1");
        let doc = lex(&lexer, "s = 'ab\ncd'\n");
        assert_eq!(styles_of(&doc, 4..11), vec![CHARACTER; 7]);
    }

    #[test]
    fn test_triple_string_spans_lines() {
        let doc = lex(&lexer(), "s = \"\"\"a\n'b'\n\"\"\" + 1\n");
        assert_eq!(styles_of(&doc, 4..16), vec![TRIPLEDOUBLE; 12]);
        assert_eq!(doc.style_at(17), OPERATOR);
    }

    #[test]
    fn test_decorators_and_comments() {
        let doc = lex(&lexer(), "@property\nx @ y # note\n## block\n");
        assert_eq!(styles_of(&doc, 0..9), vec![DECORATOR; 9]);
        assert_eq!(doc.style_at(12), OPERATOR);
        assert_eq!(doc.style_at(16), COMMENTLINE);
        assert_eq!(doc.style_at(22), DEFAULT);
        assert_eq!(doc.style_at(23), COMMENTBLOCK);
    }

    #[test]
    fn test_highlighted_identifiers() {
        let mut lexer = lexer();
        let doc = lex(&lexer, "open(f.open)\n");
        assert_eq!(doc.style_at(0), WORD2);
        assert_eq!(doc.style_at(7), WORD2);
        lexer.property_set("lexer.python.keywords2.no.sub.identifiers", "1");
        let doc = lex(&lexer, "open(f.open)\n");
        assert_eq!(doc.style_at(0), WORD2);
        assert_eq!(doc.style_at(7), IDENTIFIER);
    }

    #[test]
    fn test_indentation_folding() {
        let doc = lex(&lexer(), "def f():\n    x = 1\n\n    # note\n    y\nz\n");
        assert_eq!(doc.level(0), FoldLevel::new(0, 4).with_header(true));
        assert_eq!(doc.level(1), FoldLevel::new(4, 4));
        assert_eq!(doc.level(2), FoldLevel::new(4, 4).with_white(true));
        assert_eq!(doc.level(3), FoldLevel::new(4, 4));
        assert_eq!(doc.level(4), FoldLevel::new(4, 0));
        assert_eq!(doc.level(5), FoldLevel::new(0, 0));
        assert_eq!(doc.level(6), FoldLevel::new(0, 0).with_white(true));
    }

    #[test]
    fn test_trailing_comment_stays_in_block() {
        let doc = lex(&lexer(), "if a:\n    b\n    # end of block\nc\n");
        assert_eq!(doc.level(2), FoldLevel::new(4, 4));
        assert_eq!(doc.level(3), FoldLevel::new(0, 0));
    }

    #[test]
    fn test_tabs_count_to_multiples_of_eight() {
        let doc = lex(&lexer(), "if a:\n  \tb\n");
        assert_eq!(doc.level(0), FoldLevel::new(0, 8).with_header(true));
        assert_eq!(doc.level(1), FoldLevel::new(8, 0));
    }

    #[test]
    fn test_compact_off_drops_white_flag() {
        let mut lexer = lexer();
        lexer.property_set("fold.compact", "0");
        let doc = lex(&lexer, "a\n\nb\n");
        assert_eq!(doc.level(1), FoldLevel::new(0, 0));
    }

    #[test]
    fn test_quote_folding() {
        let mut lexer = lexer();
        lexer.property_set("fold.quotes.python", "1");
        let doc = lex(&lexer, "s = '''\nbody\n'''\nx\n");
        assert_eq!(doc.level(0), FoldLevel::new(0, 1).with_header(true));
        assert_eq!(doc.level(1), FoldLevel::new(1, 1));
        assert_eq!(doc.level(2), FoldLevel::new(1, 0));
        assert_eq!(doc.level(3), FoldLevel::new(0, 0));
    }

    #[test]
    fn test_partial_fold_matches_full() {
        let text = "class A:\n    def f(self):\n\n        return 1\n# tail\n";
        let lexer = lexer();
        let full = lex(&lexer, text);
        let mut partial = TextDocument::from_text(text);
        let len = partial.len();
        lexer.lex(0, len, 0, &mut partial);
        for line in 0..partial.line_count() {
            let start = partial.line_start(line);
            let end = partial.line_start(line + 1);
            lexer.fold(start, end - start, 0, &mut partial);
        }
        for line in 0..full.line_count() {
            assert_eq!(partial.level(line), full.level(line), "line {line}");
        }
    }
}
