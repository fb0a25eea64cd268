//! TOML.
//!
//! Every line is `key = value`, a `[table]` header, a comment or blank, except inside an
//! array or inline table that spans lines. The open bracket count is therefore the only
//! context carried into the next line. The line type and the table depth are stored too,
//! for the folder.

use lexkit::char_class::{is_alnum, is_digit, is_hex_digit, is_lower, is_space};
use lexkit::options::set_bool;
use lexkit::{
    Accessor, Document, FoldLevel, Lexer, LexerError, OptionDef, OptionSet, PropertyType,
    StyleContext, StyleId, StyleInfo, WordLists, fold_lines, start_level,
};

/// Style ids written by [`TomlLexer`].
pub mod style {
    #![allow(missing_docs)]

    use lexkit::StyleId;

    pub const DEFAULT: StyleId = 0;
    pub const COMMENT: StyleId = 1;
    pub const IDENTIFIER: StyleId = 2;
    pub const KEYWORD: StyleId = 3;
    pub const NUMBER: StyleId = 4;
    pub const TABLE: StyleId = 5;
    pub const KEY: StyleId = 6;
    pub const ERROR: StyleId = 7;
    pub const OPERATOR: StyleId = 8;
    pub const STRING_SQ: StyleId = 9;
    pub const STRING_DQ: StyleId = 10;
    pub const TRIPLE_STRING_SQ: StyleId = 11;
    pub const TRIPLE_STRING_DQ: StyleId = 12;
    pub const ESCAPECHAR: StyleId = 13;
    pub const DATETIME: StyleId = 14;
    pub const STRINGEOL: StyleId = 15;
}

use style::*;

static STYLES: &[StyleInfo] = &[
    StyleInfo {
        style: DEFAULT,
        name: "SCE_TOML_DEFAULT",
        tags: "default",
        description: "Default",
    },
    StyleInfo {
        style: COMMENT,
        name: "SCE_TOML_COMMENT",
        tags: "comment",
        description: "Comment",
    },
    StyleInfo {
        style: IDENTIFIER,
        name: "SCE_TOML_IDENTIFIER",
        tags: "identifier",
        description: "Identifier",
    },
    StyleInfo {
        style: KEYWORD,
        name: "SCE_TOML_KEYWORD",
        tags: "keyword",
        description: "Keyword",
    },
    StyleInfo {
        style: NUMBER,
        name: "SCE_TOML_NUMBER",
        tags: "literal numeric",
        description: "Number",
    },
    StyleInfo {
        style: TABLE,
        name: "SCE_TOML_TABLE",
        tags: "keyword",
        description: "Table header",
    },
    StyleInfo {
        style: KEY,
        name: "SCE_TOML_KEY",
        tags: "identifier",
        description: "Key",
    },
    StyleInfo {
        style: ERROR,
        name: "SCE_TOML_ERROR",
        tags: "error",
        description: "Line that is not a key, table or comment",
    },
    StyleInfo {
        style: OPERATOR,
        name: "SCE_TOML_OPERATOR",
        tags: "operator",
        description: "Operator",
    },
    StyleInfo {
        style: STRING_SQ,
        name: "SCE_TOML_STRING_SQ",
        tags: "literal string",
        description: "Literal string",
    },
    StyleInfo {
        style: STRING_DQ,
        name: "SCE_TOML_STRING_DQ",
        tags: "literal string",
        description: "Basic string",
    },
    StyleInfo {
        style: TRIPLE_STRING_SQ,
        name: "SCE_TOML_TRIPLE_STRING_SQ",
        tags: "literal string",
        description: "Multi-line literal string",
    },
    StyleInfo {
        style: TRIPLE_STRING_DQ,
        name: "SCE_TOML_TRIPLE_STRING_DQ",
        tags: "literal string",
        description: "Multi-line basic string",
    },
    StyleInfo {
        style: ESCAPECHAR,
        name: "SCE_TOML_ESCAPECHAR",
        tags: "literal string escapesequence",
        description: "Escape sequence",
    },
    StyleInfo {
        style: DATETIME,
        name: "SCE_TOML_DATETIME",
        tags: "literal",
        description: "Date and time",
    },
    StyleInfo {
        style: STRINGEOL,
        name: "SCE_TOML_STRINGEOL",
        tags: "error literal string",
        description: "End of line where string is not closed",
    },
];

static WORD_LIST_DESCRIPTIONS: [&str; 1] = ["Keywords"];

#[derive(Debug, Clone)]
struct TomlOptions {
    fold_compact: bool,
}

impl Default for TomlOptions {
    fn default() -> Self {
        Self { fold_compact: true }
    }
}

static OPTIONS: &[OptionDef<TomlOptions>] = &[OptionDef {
    name: "fold.compact",
    kind: PropertyType::Boolean,
    description: "Mark blank lines as white so they fold with the preceding table.",
    set: |o, v| set_bool(&mut o.fold_compact, v),
}];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum LineType {
    #[default]
    Plain,
    Table,
    Comment,
}

/// Stored for every line once its terminator has been lexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LineState {
    line_type: LineType,
    /// Dots in a table header: `[a.b]` is depth 1.
    table_level: u8,
    /// Open `[` and `{` of multi-line arrays and inline tables.
    brace_count: u8,
}

impl LineState {
    fn pack(self) -> i32 {
        let line_type = match self.line_type {
            LineType::Plain => 0,
            LineType::Table => 1,
            LineType::Comment => 2,
        };
        line_type | i32::from(self.table_level) << 2 | i32::from(self.brace_count) << 10
    }

    fn unpack(state: i32) -> Self {
        Self {
            line_type: match state & 3 {
                1 => LineType::Table,
                2 => LineType::Comment,
                _ => LineType::Plain,
            },
            table_level: ((state >> 2) & 0xFF) as u8,
            brace_count: ((state >> 10) & 0xFF) as u8,
        }
    }
}

/// Where the cursor is inside a key or table name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum KeyState {
    #[default]
    Unquoted,
    Literal,
    Quoted,
    End,
}

/// An escape sequence inside a basic string.
#[derive(Debug, Clone, Copy, Default)]
struct Escape {
    outer: StyleId,
    digits_left: u8,
}

impl Escape {
    /// Begin an escape at a backslash followed by `next`. A backslash ending the line is
    /// a line continuation, not an escape.
    fn start(&mut self, state: StyleId, next: u32) -> bool {
        if next == u32::from(b'\r') || next == u32::from(b'\n') {
            return false;
        }
        self.outer = state;
        self.digits_left = match char::from_u32(next) {
            Some('x') => 3,
            Some('u') => 5,
            Some('U') => 9,
            _ => 1,
        };
        true
    }

    fn at_end(&mut self, ch: u32) -> bool {
        self.digits_left = self.digits_left.saturating_sub(1);
        self.digits_left == 0 || !is_hex_digit(ch)
    }
}

/// State that never outlives a line.
#[derive(Debug, Default)]
struct LineScan {
    visible: usize,
    prev_non_white: u32,
    key: KeyState,
    escape: Escape,
}

fn is(ch: u32, c: u8) -> bool {
    ch == u32::from(c)
}

fn is_identifier_char(ch: u32) -> bool {
    is_alnum(ch) || is(ch, b'_')
}

fn is_unquoted_key(ch: u32) -> bool {
    is_identifier_char(ch) || is(ch, b'-')
}

fn is_decimal_number(prev: u32, ch: u32, next: u32) -> bool {
    is_identifier_char(ch)
        || ((is(ch, b'+') || is(ch, b'-')) && (is(prev, b'e') || is(prev, b'E')))
        || (is(ch, b'.') && !is(next, b'.'))
}

fn is_date_time(ch: u32, next: u32) -> bool {
    (b"+-:.".iter().any(|&c| is(ch, c)) && is_digit(next))
        || (is(ch, b' ') && (is(next, b'+') || is(next, b'-') || is_digit(next)))
}

fn is_toml_operator(ch: u32) -> bool {
    b"[]{},=.+-".iter().any(|&c| is(ch, c))
}

fn is_triple(state: StyleId) -> bool {
    state == TRIPLE_STRING_SQ || state == TRIPLE_STRING_DQ
}

fn is_double_quoted(state: StyleId) -> bool {
    state == STRING_DQ || state == TRIPLE_STRING_DQ
}

/// First non-blank byte from the cursor to the end of its line, or 0.
fn line_next_char(sc: &StyleContext<'_>) -> u8 {
    let styler = sc.styler();
    let end = styler.line_start(sc.current_line + 1);
    (sc.current_pos..end)
        .map(|pos| styler.char_at(pos))
        .find(|&b| !is_space(u32::from(b)))
        .unwrap_or(0)
}

/// TOML lexer and table folder.
pub struct TomlLexer {
    options: TomlOptions,
    option_set: OptionSet<TomlOptions>,
    keywords: WordLists<1>,
}

impl Default for TomlLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl TomlLexer {
    /// Create a lexer with an empty keyword list.
    pub fn new() -> Self {
        Self {
            options: TomlOptions::default(),
            option_set: OptionSet::new(OPTIONS),
            keywords: WordLists::new("toml", &WORD_LIST_DESCRIPTIONS),
        }
    }

    /// Factory for registries.
    pub fn factory() -> Box<dyn Lexer> {
        Box::new(Self::new())
    }

    /// A bare value just ended. Inside an inline table it may really be a key; otherwise
    /// check keywords and return to default. True when it turned into a key.
    fn finish_value(&self, sc: &mut StyleContext<'_>, brace_count: u8, keywords: bool) -> bool {
        if brace_count > 0 && matches!(line_next_char(sc), b'=' | b'.' | b'-') {
            sc.change_state(KEY);
            return true;
        }
        if keywords && sc.state == IDENTIFIER && self.keywords[0].in_list(&sc.current_lowered()) {
            sc.change_state(KEYWORD);
        }
        sc.set_state(DEFAULT);
        false
    }

    /// Close the token at the cursor if it ends here. True when the character must be
    /// looked at again in the new state.
    fn finish_token(
        &self,
        sc: &mut StyleContext<'_>,
        ctx: &mut LineState,
        scan: &mut LineScan,
    ) -> bool {
        match sc.state {
            OPERATOR => sc.set_state(DEFAULT),
            NUMBER => {
                if !is_decimal_number(sc.ch_prev, sc.ch, sc.ch_next) {
                    if is_date_time(sc.ch, sc.ch_next) {
                        sc.change_state(DATETIME);
                    } else if self.finish_value(sc, ctx.brace_count, false) {
                        scan.key = KeyState::Unquoted;
                        return true;
                    }
                }
            }
            DATETIME => {
                if !(is_identifier_char(sc.ch) || is_date_time(sc.ch, sc.ch_next))
                    && self.finish_value(sc, ctx.brace_count, false)
                {
                    scan.key = KeyState::Unquoted;
                    return true;
                }
            }
            IDENTIFIER => {
                if !is_identifier_char(sc.ch) && self.finish_value(sc, ctx.brace_count, true) {
                    scan.key = KeyState::Unquoted;
                    return true;
                }
            }
            TABLE | KEY => {
                if sc.at_line_start {
                    sc.set_state(DEFAULT);
                } else {
                    return self.continue_key(sc, ctx, scan);
                }
            }
            STRING_SQ | STRING_DQ | TRIPLE_STRING_SQ | TRIPLE_STRING_DQ => {
                let triple = is_triple(sc.state);
                let quote = if is_double_quoted(sc.state) { b'"' } else { b'\'' };
                if sc.at_line_start && !triple {
                    sc.set_state(DEFAULT);
                } else if sc.at_line_end && !triple {
                    sc.change_state(STRINGEOL);
                } else if is(sc.ch, b'\\') && is_double_quoted(sc.state) {
                    if scan.escape.start(sc.state, sc.ch_next) {
                        sc.set_state(ESCAPECHAR);
                        sc.forward();
                    }
                } else if is(sc.ch, quote)
                    && (!triple || sc.match_str(if quote == b'"' { "\"\"\"" } else { "'''" }))
                {
                    // Up to two extra quotes may close a multi-line string.
                    while sc.ch == sc.ch_next && sc.more() {
                        sc.forward();
                    }
                    sc.forward();
                    if !triple && self.finish_value(sc, ctx.brace_count, false) {
                        scan.key = KeyState::Unquoted;
                        return true;
                    }
                    sc.set_state(DEFAULT);
                }
            }
            STRINGEOL | COMMENT => {
                if sc.at_line_start {
                    sc.set_state(DEFAULT);
                }
            }
            ESCAPECHAR => {
                if scan.escape.at_end(sc.ch) {
                    sc.set_state(scan.escape.outer);
                    return true;
                }
            }
            ERROR => {
                if sc.at_line_start {
                    sc.set_state(DEFAULT);
                } else if is(sc.ch, b'#') {
                    sc.set_state(COMMENT);
                }
            }
            _ => {}
        }
        false
    }

    /// Advance through a key or table name, handling quoted parts and dots.
    fn continue_key(
        &self,
        sc: &mut StyleContext<'_>,
        ctx: &mut LineState,
        scan: &mut LineScan,
    ) -> bool {
        match scan.key {
            KeyState::Literal if is(sc.ch, b'\'') => {
                scan.key = KeyState::Unquoted;
                sc.forward();
            }
            KeyState::Quoted if is(sc.ch, b'\\') => sc.forward(),
            KeyState::Quoted if is(sc.ch, b'"') => {
                scan.key = KeyState::Unquoted;
                sc.forward();
            }
            _ => {}
        }
        if scan.key != KeyState::Unquoted {
            return false;
        }

        if is(sc.ch, b'\'') {
            scan.key = KeyState::Literal;
        } else if is(sc.ch, b'"') {
            scan.key = KeyState::Quoted;
        } else if is(sc.ch, b'.') {
            if sc.state == TABLE {
                ctx.table_level = ctx.table_level.saturating_add(1);
            } else {
                scan.prev_non_white = u32::from(b'.');
                sc.set_state(OPERATOR);
                sc.forward_set_state(KEY);
                return true;
            }
        } else if sc.state == TABLE && is(sc.ch, b']') {
            scan.key = KeyState::End;
            sc.forward();
            if is(sc.ch, b']') {
                sc.forward();
            }
            if line_next_char(sc) == b'#' {
                sc.set_state(DEFAULT);
            }
        } else if sc.state == KEY && !is_unquoted_key(sc.ch) {
            let next = line_next_char(sc);
            if next == b'=' || (next != b'.' && !is(scan.prev_non_white, b'.')) {
                scan.key = KeyState::End;
                sc.set_state(DEFAULT);
            }
        }
        false
    }

    fn start_token(&self, sc: &mut StyleContext<'_>, ctx: &mut LineState, scan: &mut LineScan) {
        if is(sc.ch, b'#') {
            sc.set_state(COMMENT);
            if scan.visible == 0 {
                ctx.line_type = LineType::Comment;
            }
        } else if scan.visible == 0 && ctx.brace_count == 0 {
            if is(sc.ch, b'[') {
                ctx.table_level = 0;
                ctx.line_type = LineType::Table;
                scan.key = KeyState::Unquoted;
                sc.set_state(TABLE);
                if is(sc.ch_next, b'[') {
                    sc.forward();
                }
            } else if is(sc.ch, b'\'') || is(sc.ch, b'"') {
                scan.key = if is(sc.ch, b'\'') {
                    KeyState::Literal
                } else {
                    KeyState::Quoted
                };
                sc.set_state(KEY);
            } else if is_unquoted_key(sc.ch) {
                scan.key = KeyState::Unquoted;
                sc.set_state(KEY);
            } else if !is_space(sc.ch) {
                sc.set_state(ERROR);
            }
        } else if is(sc.ch, b'\'') {
            if sc.match_str("'''") {
                sc.set_state(TRIPLE_STRING_SQ);
                sc.forward_n(2);
            } else {
                sc.set_state(STRING_SQ);
            }
        } else if is(sc.ch, b'"') {
            if sc.match_str("\"\"\"") {
                sc.set_state(TRIPLE_STRING_DQ);
                sc.forward_n(2);
            } else {
                sc.set_state(STRING_DQ);
            }
        } else if is_digit(sc.ch) {
            sc.set_state(NUMBER);
        } else if is_lower(sc.ch) {
            sc.set_state(IDENTIFIER);
        } else if is_toml_operator(sc.ch) {
            sc.set_state(OPERATOR);
            if is(sc.ch, b'[') || is(sc.ch, b'{') {
                ctx.brace_count = ctx.brace_count.saturating_add(1);
            } else if is(sc.ch, b']') || is(sc.ch, b'}') {
                ctx.brace_count = ctx.brace_count.saturating_sub(1);
            }
        } else if ctx.brace_count > 0 && is_unquoted_key(sc.ch) {
            // A key of an inline table.
            scan.key = KeyState::Unquoted;
            sc.set_state(KEY);
        }
    }
}

impl Lexer for TomlLexer {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn identifier(&self) -> i32 {
        136
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
        let init_style = if init_style == STRINGEOL {
            DEFAULT
        } else {
            init_style
        };
        let mut sc = StyleContext::new(start, len, init_style, doc);
        let mut ctx = LineState::default();
        if sc.current_line > 0 {
            ctx.brace_count = LineState::unpack(sc.line_state(sc.current_line - 1)).brace_count;
        }
        let mut scan = LineScan::default();
        while sc.more() {
            if self.finish_token(&mut sc, &mut ctx, &mut scan) {
                continue;
            }
            if sc.state == DEFAULT {
                self.start_token(&mut sc, &mut ctx, &mut scan);
            }
            if !is_space(sc.ch) {
                scan.prev_non_white = sc.ch;
                scan.visible += 1;
            }
            if sc.at_line_end {
                sc.set_line_state(sc.current_line, ctx.pack());
                ctx = LineState {
                    brace_count: ctx.brace_count,
                    ..LineState::default()
                };
                scan = LineScan::default();
            }
            sc.forward();
        }
        sc.complete();
    }

    fn fold(&self, start: usize, len: usize, _init_style: StyleId, doc: &mut dyn Document) {
        let lines = fold_lines(doc, start, len);
        let mut styler = Accessor::new(doc);
        let mut level = start_level(styler.document(), *lines.start());
        for line in lines {
            let state = LineState::unpack(styler.line_state(line));
            let folded = if state.line_type == LineType::Table {
                let depth = i32::from(state.table_level);
                FoldLevel::new(depth, depth + 1).with_header(true)
            } else {
                let blank = styler.first_non_blank(line).is_none();
                FoldLevel::new(level, level).with_white(blank && self.options.fold_compact)
            };
            styler.set_level(line, folded);
            level = i32::from(folded.next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexkit::TextDocument;
    use pretty_assertions::assert_eq;

    fn lexer() -> TomlLexer {
        let mut lexer = TomlLexer::new();
        lexer.word_list_set(0, "true false inf nan").unwrap();
        lexer
    }

    fn lex(text: &str) -> TextDocument {
        let lexer = lexer();
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
    fn test_line_state_round_trip() {
        let state = LineState {
            line_type: LineType::Table,
            table_level: 3,
            brace_count: 2,
        };
        assert_eq!(LineState::unpack(state.pack()), state);
    }

    #[test]
    fn test_key_value() {
        let doc = lex("title = \"TOML\"\n");
        assert_eq!(styles_of(&doc, 0..5), vec![KEY; 5]);
        assert_eq!(doc.style_at(5), DEFAULT);
        assert_eq!(doc.style_at(6), OPERATOR);
        assert_eq!(styles_of(&doc, 8..14), vec![STRING_DQ; 6]);
    }

    #[test]
    fn test_values() {
        let doc = lex("a = true\nb = 1979-05-27T07:32:00Z\nc = 3.14e+2\n");
        assert_eq!(styles_of(&doc, 4..8), vec![KEYWORD; 4]);
        assert_eq!(styles_of(&doc, 13..33), vec![DATETIME; 20]);
        assert_eq!(styles_of(&doc, 38..45), vec![NUMBER; 7]);
    }

    #[test]
    fn test_unterminated_string() {
        let doc = lex("x = \"abc");
        assert_eq!(styles_of(&doc, 4..8), vec![STRINGEOL; 4]);

        let doc = lex("x = \"abc\ny = 1\n");
        assert_eq!(styles_of(&doc, 4..9), vec![STRINGEOL; 5]);
        assert_eq!(doc.style_at(9), KEY);
    }

    #[test]
    fn test_escapes() {
        let doc = lex("s = \"a\\tb\\u00e9\"\n");
        assert_eq!(doc.style_at(5), STRING_DQ);
        assert_eq!(styles_of(&doc, 6..8), vec![ESCAPECHAR; 2]);
        assert_eq!(doc.style_at(8), STRING_DQ);
        assert_eq!(styles_of(&doc, 9..15), vec![ESCAPECHAR; 6]);
        assert_eq!(doc.style_at(15), STRING_DQ);
    }

    #[test]
    fn test_multi_line_string() {
        let doc = lex("s = \"\"\"\nabc\n\"\"\"\nt = 1\n");
        assert_eq!(styles_of(&doc, 4..15), vec![TRIPLE_STRING_DQ; 11]);
        assert_eq!(doc.style_at(16), KEY);
    }

    #[test]
    fn test_dotted_and_quoted_keys() {
        let doc = lex("\"a.b\".c = 1\n");
        assert_eq!(styles_of(&doc, 0..5), vec![KEY; 5]);
        assert_eq!(doc.style_at(5), OPERATOR);
        assert_eq!(doc.style_at(6), KEY);
        assert_eq!(doc.style_at(10), NUMBER);
    }

    #[test]
    fn test_malformed_line() {
        let doc = lex("= 1 # c\n");
        assert_eq!(styles_of(&doc, 0..4), vec![ERROR; 4]);
        assert_eq!(doc.style_at(4), COMMENT);
    }

    #[test]
    fn test_multi_line_array_and_inline_table() {
        let doc = lex("a = [\n  1,\n]\nb = { c = 1 }\n");
        assert_eq!(doc.style_at(8), NUMBER);
        assert_eq!(doc.style_at(9), OPERATOR);
        assert_eq!(doc.style_at(11), OPERATOR);
        assert_eq!(LineState::unpack(doc.line_state(1)).brace_count, 1);
        assert_eq!(LineState::unpack(doc.line_state(2)).brace_count, 0);
        assert_eq!(doc.style_at(19), KEY);
    }

    #[test]
    fn test_table_folding() {
        let doc = lex("[a]\nx = 1\n[a.b]\ny = 2\n\n[c]\n");
        assert_eq!(styles_of(&doc, 10..15), vec![TABLE; 5]);
        assert_eq!(doc.level(0), FoldLevel::new(0, 1).with_header(true));
        assert_eq!(doc.level(1), FoldLevel::new(1, 1));
        assert_eq!(doc.level(2), FoldLevel::new(1, 2).with_header(true));
        assert_eq!(doc.level(3), FoldLevel::new(2, 2));
        assert_eq!(doc.level(4), FoldLevel::new(2, 2).with_white(true));
        assert_eq!(doc.level(5), FoldLevel::new(0, 1).with_header(true));
        assert_eq!(LineState::unpack(doc.line_state(2)).table_level, 1);
    }

    #[test]
    fn test_array_of_tables_header() {
        let doc = lex("[[fruit]]\nname = 'apple'\n");
        assert_eq!(styles_of(&doc, 0..9), vec![TABLE; 9]);
        assert_eq!(styles_of(&doc, 17..24), vec![STRING_SQ; 7]);
        assert_eq!(doc.level(0), FoldLevel::new(0, 1).with_header(true));
    }
}
