//! Matlab and Octave.
//!
//! Both languages share one state machine. Octave also accepts `#` comments and backslash
//! escapes in double-quoted strings, and treats `!` as an operator instead of a shell
//! command. Nested `%{ ... %}` block comments count only when the delimiter stands alone
//! on its line.

use lexkit::char_class::{is_alnum, is_alpha, is_digit, is_eol, is_operator, is_space};
use lexkit::options::set_bool;
use lexkit::{
    Accessor, Document, FoldLevel, Lexer, LexerError, OptionDef, OptionSet, PropertyType,
    StyleContext, StyleId, StyleInfo, WordLists, fold_lines, start_level,
};

/// Style ids written by [`MatlabLexer`].
pub mod style {
    #![allow(missing_docs)]

    use lexkit::StyleId;

    pub const DEFAULT: StyleId = 0;
    pub const COMMENT: StyleId = 1;
    pub const COMMAND: StyleId = 2;
    pub const NUMBER: StyleId = 3;
    pub const KEYWORD: StyleId = 4;
    pub const STRING: StyleId = 5;
    pub const OPERATOR: StyleId = 6;
    pub const IDENTIFIER: StyleId = 7;
    pub const DOUBLEQUOTESTRING: StyleId = 8;
}

use style::*;

static STYLES: &[StyleInfo] = &[
    StyleInfo {
        style: DEFAULT,
        name: "SCE_MATLAB_DEFAULT",
        tags: "default",
        description: "White space",
    },
    StyleInfo {
        style: COMMENT,
        name: "SCE_MATLAB_COMMENT",
        tags: "comment",
        description: "Comment",
    },
    StyleInfo {
        style: COMMAND,
        name: "SCE_MATLAB_COMMAND",
        tags: "preprocessor",
        description: "Shell command",
    },
    StyleInfo {
        style: NUMBER,
        name: "SCE_MATLAB_NUMBER",
        tags: "literal numeric",
        description: "Number",
    },
    StyleInfo {
        style: KEYWORD,
        name: "SCE_MATLAB_KEYWORD",
        tags: "keyword",
        description: "Keyword",
    },
    StyleInfo {
        style: STRING,
        name: "SCE_MATLAB_STRING",
        tags: "literal string",
        description: "Single quoted string",
    },
    StyleInfo {
        style: OPERATOR,
        name: "SCE_MATLAB_OPERATOR",
        tags: "operator",
        description: "Operator",
    },
    StyleInfo {
        style: IDENTIFIER,
        name: "SCE_MATLAB_IDENTIFIER",
        tags: "identifier",
        description: "Identifier",
    },
    StyleInfo {
        style: DOUBLEQUOTESTRING,
        name: "SCE_MATLAB_DOUBLEQUOTESTRING",
        tags: "literal string",
        description: "Double quoted string",
    },
];

static WORD_LIST_DESCRIPTIONS: [&str; 1] = ["Keywords"];

const MAX_WORD: usize = 100;

/// Which of the two languages a lexer instance handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `%` comments, `!` shell commands, `arguments` blocks.
    Matlab,
    /// `%` and `#` comments, backslash escapes in `"` strings.
    Octave,
}

impl Dialect {
    fn is_comment_char(self, ch: u32) -> bool {
        ch == u32::from(b'%') || (self == Dialect::Octave && ch == u32::from(b'#'))
    }
}

#[derive(Debug, Clone)]
struct MatlabOptions {
    fold: bool,
    fold_comment: bool,
    fold_compact: bool,
}

impl Default for MatlabOptions {
    fn default() -> Self {
        Self {
            fold: false,
            fold_comment: false,
            fold_compact: true,
        }
    }
}

static OPTIONS: &[OptionDef<MatlabOptions>] = &[
    OptionDef {
        name: "fold",
        kind: PropertyType::Boolean,
        description: "Enable folding.",
        set: |o, v| set_bool(&mut o.fold, v),
    },
    OptionDef {
        name: "fold.comment",
        kind: PropertyType::Boolean,
        description: "Fold %{ %} block comments.",
        set: |o, v| set_bool(&mut o.fold_comment, v),
    },
    OptionDef {
        name: "fold.compact",
        kind: PropertyType::Boolean,
        description: "Mark blank lines as white so they fold with the preceding block.",
        set: |o, v| set_bool(&mut o.fold_compact, v),
    },
];

/// Context carried from one line to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LineState {
    comment_depth: u8,
    /// Keyword nesting as seen by the lexer; decides whether `methods` and friends are keywords.
    fold_level: u8,
    /// Open brackets, inside which `end` is an index rather than a keyword.
    bracket_depth: u8,
    expecting_arguments: bool,
    in_class: bool,
    in_arguments: bool,
}

impl LineState {
    fn pack(self) -> i32 {
        let packed = u32::from(self.comment_depth)
            | u32::from(self.fold_level) << 8
            | u32::from(self.bracket_depth) << 16
            | u32::from(self.expecting_arguments) << 24
            | u32::from(self.in_class) << 25
            | u32::from(self.in_arguments) << 26;
        packed as i32
    }

    fn unpack(state: i32) -> Self {
        let packed = state as u32;
        Self {
            comment_depth: (packed & 0xFF) as u8,
            fold_level: ((packed >> 8) & 0xFF) as u8,
            bracket_depth: ((packed >> 16) & 0xFF) as u8,
            expecting_arguments: packed & (1 << 24) != 0,
            in_class: packed & (1 << 25) != 0,
            in_arguments: packed & (1 << 26) != 0,
        }
    }

    fn add_fold(&mut self, delta: i32) {
        self.fold_level = (i32::from(self.fold_level) + delta).clamp(0, 0xFF) as u8;
    }
}

/// State that never outlives a line.
#[derive(Debug, Default)]
struct LineScan {
    /// A `'` here is the transpose operator rather than a string quote.
    transpose: bool,
    function_line: bool,
    seen_visible: bool,
}

fn keyword_fold_point(word: &str) -> i32 {
    match word {
        "if" | "for" | "switch" | "while" | "try" | "do" | "parfor" | "classdef" | "spmd"
        | "arguments" | "methods" | "properties" | "events" | "function" => 1,
        "until" => -1,
        _ if word.starts_with("end") => -1,
        _ => 0,
    }
}

fn is(ch: u32, c: u8) -> bool {
    ch == u32::from(c)
}

fn continues_number(ch: u32, prev: u32) -> bool {
    is_digit(ch)
        || is(ch, b'.')
        || ((is(ch, b'+') || is(ch, b'-')) && (is(prev, b'e') || is(prev, b'E')))
        || ((is(ch, b'x') || is(ch, b'X')) && is(prev, b'0'))
        || (u32::from(b'a')..=u32::from(b'f')).contains(&ch)
        || (u32::from(b'A')..=u32::from(b'F')).contains(&ch)
        || b"sSuUiIjJ_".iter().any(|&c| is(ch, c))
}

/// Matlab / Octave lexer and keyword folder.
pub struct MatlabLexer {
    dialect: Dialect,
    options: MatlabOptions,
    option_set: OptionSet<MatlabOptions>,
    keywords: WordLists<1>,
}

impl MatlabLexer {
    /// Create a lexer for `dialect`.
    pub fn new(dialect: Dialect) -> Self {
        let name = match dialect {
            Dialect::Matlab => "matlab",
            Dialect::Octave => "octave",
        };
        Self {
            dialect,
            options: MatlabOptions::default(),
            option_set: OptionSet::new(OPTIONS),
            keywords: WordLists::new(name, &WORD_LIST_DESCRIPTIONS),
        }
    }

    /// Factory for the Matlab lexer.
    pub fn matlab() -> Box<dyn Lexer> {
        Box::new(Self::new(Dialect::Matlab))
    }

    /// Factory for the Octave lexer.
    pub fn octave() -> Box<dyn Lexer> {
        Box::new(Self::new(Dialect::Octave))
    }

    fn step(&self, sc: &mut StyleContext<'_>, ctx: &mut LineState, scan: &mut LineScan) {
        if is(sc.ch_prev, b';') {
            scan.function_line = false;
        }

        // Only comments may sit between a function header and its arguments block.
        if ctx.expecting_arguments
            && !(scan.function_line || ctx.in_arguments)
            && !matches!(sc.state, KEYWORD | COMMENT | DEFAULT)
            && !(sc.state == OPERATOR && is(sc.ch_prev, b';'))
        {
            ctx.expecting_arguments = false;
        }

        if ctx.fold_level == 0 && ctx.in_class {
            ctx.in_class = false;
        }

        let first_visible = !scan.seen_visible && !is_space(sc.ch);
        if !is_space(sc.ch) {
            scan.seen_visible = true;
        }

        match sc.state {
            OPERATOR => {
                if is(sc.ch_prev, b'.') {
                    if b"*/\\^".iter().any(|&c| is(sc.ch, c)) {
                        sc.forward_set_state(DEFAULT);
                        scan.transpose = false;
                    } else if is(sc.ch, b'\'') {
                        sc.forward_set_state(DEFAULT);
                        scan.transpose = true;
                    } else if is(sc.ch, b'.') && is(sc.ch_next, b'.') {
                        // `...` continues the statement; the rest of the line is a comment.
                        sc.change_state(COMMENT);
                        scan.transpose = false;
                    } else {
                        sc.set_state(DEFAULT);
                    }
                } else {
                    sc.set_state(DEFAULT);
                }
            }
            KEYWORD => {
                if !is_alnum(sc.ch) && !is(sc.ch, b'_') {
                    self.classify_word(sc, ctx, scan);
                }
            }
            NUMBER => {
                if !continues_number(sc.ch, sc.ch_prev) {
                    sc.set_state(DEFAULT);
                    scan.transpose = true;
                }
            }
            STRING => {
                if is(sc.ch, b'\'') {
                    if is(sc.ch_next, b'\'') {
                        sc.forward();
                    } else {
                        sc.forward_set_state(DEFAULT);
                    }
                } else if sc.match_line_end() {
                    sc.set_state(DEFAULT);
                }
            }
            DOUBLEQUOTESTRING => {
                if is(sc.ch, b'\\') && self.dialect == Dialect::Octave {
                    sc.forward();
                } else if is(sc.ch, b'"') {
                    sc.forward_set_state(DEFAULT);
                } else if sc.match_line_end() {
                    sc.set_state(DEFAULT);
                }
            }
            COMMAND => {
                if sc.match_line_end() {
                    sc.set_state(DEFAULT);
                    scan.transpose = false;
                }
            }
            COMMENT => {
                let delimiter = self.dialect.is_comment_char(sc.ch)
                    && first_visible
                    && sc.styler().is_space_to_eol(sc.current_pos + 2);
                if delimiter && is(sc.ch_next, b'}') {
                    ctx.comment_depth = ctx.comment_depth.saturating_sub(1);
                    sc.forward();
                    if ctx.comment_depth == 0 {
                        sc.forward_set_state(DEFAULT);
                        scan.transpose = false;
                    }
                } else if delimiter && is(sc.ch_next, b'{') {
                    ctx.comment_depth = ctx.comment_depth.saturating_add(1);
                    sc.forward();
                    scan.transpose = false;
                } else if ctx.comment_depth == 0 && (sc.at_line_end || is_eol(sc.ch)) {
                    sc.set_state(DEFAULT);
                    scan.transpose = false;
                }
            }
            _ => {}
        }

        if sc.state != DEFAULT {
            return;
        }
        if self.dialect.is_comment_char(sc.ch) {
            if is(sc.ch_next, b'{')
                && first_visible
                && sc.styler().is_space_to_eol(sc.current_pos + 2)
            {
                ctx.comment_depth = ctx.comment_depth.saturating_add(1);
            }
            sc.set_state(COMMENT);
        } else if is(sc.ch, b'!') && !is(sc.ch_next, b'=') {
            sc.set_state(match self.dialect {
                Dialect::Matlab => COMMAND,
                Dialect::Octave => OPERATOR,
            });
        } else if is(sc.ch, b'\'') {
            sc.set_state(if scan.transpose { OPERATOR } else { STRING });
        } else if is(sc.ch, b'"') {
            sc.set_state(DOUBLEQUOTESTRING);
        } else if is_digit(sc.ch) || (is(sc.ch, b'.') && is_digit(sc.ch_next)) {
            sc.set_state(NUMBER);
        } else if is_alpha(sc.ch) {
            sc.set_state(KEYWORD);
        } else if is_operator(sc.ch) || is(sc.ch, b'@') || is(sc.ch, b'\\') {
            let closing = is(sc.ch, b')') || is(sc.ch, b']') || is(sc.ch, b'}');
            if is(sc.ch, b'(') || is(sc.ch, b'[') || is(sc.ch, b'{') {
                ctx.bracket_depth = ctx.bracket_depth.saturating_add(1);
            } else if closing {
                ctx.bracket_depth = ctx.bracket_depth.saturating_sub(1);
            }
            scan.transpose = closing;
            sc.set_state(OPERATOR);
        } else {
            scan.transpose = false;
        }
    }

    /// The keyword run just ended: decide keyword or identifier and track scopes.
    fn classify_word(&self, sc: &mut StyleContext<'_>, ctx: &mut LineState, scan: &mut LineScan) {
        let word = sc.current_text();
        let in_header = scan.function_line || ctx.in_arguments;
        let mut is_keyword = true;
        scan.transpose = false;

        if self.keywords[0].in_list(&word) {
            if !in_header {
                ctx.expecting_arguments = false;
            }
            match word.as_str() {
                "end" if ctx.bracket_depth > 0 => {
                    sc.change_state(NUMBER);
                    is_keyword = false;
                }
                "end" => ctx.in_arguments = false,
                "function" => {
                    scan.function_line = true;
                    ctx.expecting_arguments = self.dialect == Dialect::Matlab;
                }
                "classdef" => ctx.in_class = true,
                _ => {}
            }
        } else if ctx.expecting_arguments && !in_header && word == "arguments" {
            ctx.in_arguments = true;
        } else {
            if !in_header {
                ctx.expecting_arguments = false;
            }
            // Class blocks are only keywords directly inside a classdef.
            let class_block = ctx.in_class
                && ctx.fold_level <= 2
                && matches!(word.as_str(), "properties" | "methods" | "events");
            if !class_block {
                sc.change_state(IDENTIFIER);
                scan.transpose = true;
                is_keyword = false;
            }
        }

        sc.set_state(DEFAULT);
        if is_keyword {
            ctx.add_fold(keyword_fold_point(&word));
        }
    }
}

impl Lexer for MatlabLexer {
    fn name(&self) -> &'static str {
        match self.dialect {
            Dialect::Matlab => "matlab",
            Dialect::Octave => "octave",
        }
    }

    fn identifier(&self) -> i32 {
        match self.dialect {
            Dialect::Matlab => 32,
            Dialect::Octave => 54,
        }
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
        let mut ctx = if sc.current_line > 0 {
            LineState::unpack(sc.line_state(sc.current_line - 1))
        } else {
            LineState::default()
        };
        let mut scan = LineScan::default();
        while sc.more() {
            if sc.at_line_start {
                if sc.current_line > 0 {
                    sc.set_line_state(sc.current_line - 1, ctx.pack());
                }
                scan = LineScan::default();
            }
            self.step(&mut sc, &mut ctx, &mut scan);
            sc.forward();
        }
        if sc.at_line_start && sc.current_line > 0 {
            sc.set_line_state(sc.current_line - 1, ctx.pack());
        }
        sc.complete();
    }

    fn fold(&self, start: usize, len: usize, _init_style: StyleId, doc: &mut dyn Document) {
        if !self.options.fold {
            return;
        }
        let lines = fold_lines(doc, start, len);
        let mut styler = Accessor::new(doc);
        let mut level = start_level(styler.document(), *lines.start());
        for line in lines {
            let mut next = level;
            let mut visible = 0;
            let mut word_start = None;
            let end = styler.line_start(line + 1);
            let mut pos = styler.line_start(line);
            while pos < end {
                let style = styler.style_at(pos);
                let ch = u32::from(styler.char_at(pos));
                let after = styler.next_char_pos(pos);
                if self.options.fold_comment
                    && style == COMMENT
                    && visible == 0
                    && self.dialect.is_comment_char(ch)
                    && styler.is_space_to_eol(pos + 2)
                {
                    match styler.safe_char_at(pos + 1, 0) {
                        b'{' => next += 1,
                        b'}' => next -= 1,
                        _ => {}
                    }
                }
                if style == KEYWORD {
                    let first = *word_start.get_or_insert(pos);
                    if after >= end || styler.style_at(after) != KEYWORD {
                        let word = styler.range_lowered(first, after - 1, MAX_WORD);
                        next += keyword_fold_point(&word);
                        word_start = None;
                    }
                }
                if !is_space(ch) {
                    visible += 1;
                }
                pos = after;
            }
            let folded = FoldLevel::new(level, next);
            let folded = folded
                .with_header(folded.level < folded.next)
                .with_white(visible == 0 && self.options.fold_compact);
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

    const KEYWORDS: &str = "break case catch classdef continue else elseif end for function \
                            global if otherwise parfor persistent return switch try while";

    fn lexer(dialect: Dialect) -> MatlabLexer {
        let mut lexer = MatlabLexer::new(dialect);
        lexer.word_list_set(0, KEYWORDS).unwrap();
        lexer.property_set("fold", "1");
        lexer
    }

    fn lex(lexer: &MatlabLexer, text: &str) -> TextDocument {
        let mut doc = TextDocument::from_text(text);
        let len = doc.len();
        lexer.lex(0, len, 0, &mut doc);
        lexer.fold(0, len, 0, &mut doc);
        doc
    }

    #[test]
    fn test_line_state_round_trip() {
        let state = LineState {
            comment_depth: 2,
            fold_level: 3,
            bracket_depth: 1,
            expecting_arguments: true,
            in_class: false,
            in_arguments: true,
        };
        assert_eq!(LineState::unpack(state.pack()), state);
    }

    #[test]
    fn test_transpose_and_strings() {
        let doc = lex(&lexer(Dialect::Matlab), "x = a';\ns = 'it''s';\n");
        assert_eq!(doc.style_at(0), IDENTIFIER);
        assert_eq!(doc.style_at(4), IDENTIFIER);
        assert_eq!(doc.style_at(5), OPERATOR);
        assert!((12..=18).all(|pos| doc.style_at(pos) == STRING));
        assert_eq!(doc.style_at(19), OPERATOR);
    }

    #[test]
    fn test_end_inside_brackets_is_an_index() {
        let doc = lex(&lexer(Dialect::Matlab), "a(end)\n");
        assert_eq!(doc.style_at(2), NUMBER);
        assert_eq!(doc.level(0), FoldLevel::new(0, 0));
    }

    #[test]
    fn test_continuation_is_comment() {
        let doc = lex(&lexer(Dialect::Matlab), "a = b ...\n  + c\n");
        assert_eq!(doc.style_at(4), IDENTIFIER);
        assert_eq!(doc.style_at(6), COMMENT);
        assert_eq!(doc.style_at(7), COMMENT);
        assert_eq!(doc.style_at(8), COMMENT);
        assert_eq!(doc.style_at(9), DEFAULT);
        assert_eq!(doc.style_at(12), OPERATOR);
    }

    #[test]
    fn test_keyword_folding() {
        let doc = lex(&lexer(Dialect::Matlab), "if x\n  y\nend\n");
        assert_eq!(doc.style_at(0), KEYWORD);
        assert_eq!(doc.level(0), FoldLevel::new(0, 1).with_header(true));
        assert_eq!(doc.level(1), FoldLevel::new(1, 1));
        assert_eq!(doc.level(2), FoldLevel::new(1, 0));
        assert_eq!(doc.level(3), FoldLevel::new(0, 0).with_white(true));
    }

    #[test]
    fn test_folding_needs_fold_property() {
        let mut lexer = MatlabLexer::new(Dialect::Matlab);
        lexer.word_list_set(0, KEYWORDS).unwrap();
        let doc = lex(&lexer, "if x\nend\n");
        assert_eq!(doc.level(0), FoldLevel::BASE);
    }

    #[test]
    fn test_arguments_block() {
        let doc = lex(
            &lexer(Dialect::Matlab),
            "function f(x)\narguments\nx\nend\nend\n",
        );
        assert_eq!(doc.style_at(14), KEYWORD);
        assert_eq!(doc.level(1), FoldLevel::new(1, 2).with_header(true));
        assert_eq!(doc.level(4), FoldLevel::new(1, 0));

        let octave = lex(
            &lexer(Dialect::Octave),
            "function f(x)\narguments\nx\nend\nend\n",
        );
        assert_eq!(octave.style_at(14), IDENTIFIER);
    }

    #[test]
    fn test_nested_block_comment_depth() {
        let text = "%{\na\n%{\nb\n%}\nc\n%}\nx\n";
        let mut lexer = lexer(Dialect::Matlab);
        lexer.property_set("fold.comment", "1");
        let doc = lex(&lexer, text);
        let depths: Vec<i32> = (0..8)
            .map(|line| doc.line_state(line) & 0xFF)
            .collect();
        assert_eq!(depths, vec![1, 1, 2, 2, 1, 1, 0, 0]);
        assert_eq!(doc.style_at(doc.line_start(5)), COMMENT);
        assert_eq!(doc.style_at(doc.line_start(7)), IDENTIFIER);
        assert_eq!(doc.level(0), FoldLevel::new(0, 1).with_header(true));
        assert_eq!(doc.level(6), FoldLevel::new(1, 0));
    }

    #[test]
    fn test_octave_hash_comments_and_escapes() {
        let doc = lex(&lexer(Dialect::Octave), "# note\ns = \"a\\\"b\";\n");
        assert_eq!(doc.style_at(0), COMMENT);
        assert_eq!(doc.style_at(7), IDENTIFIER);
        assert!((11..=16).all(|pos| doc.style_at(pos) == DOUBLEQUOTESTRING));
        assert_eq!(doc.style_at(17), OPERATOR);

        let matlab = lex(&lexer(Dialect::Matlab), "# note\n");
        assert_ne!(matlab.style_at(0), COMMENT);
    }

    #[test]
    fn test_shell_command() {
        let doc = lex(&lexer(Dialect::Matlab), "!ls -l\r\nx\n");
        assert!((0..=5).all(|pos| doc.style_at(pos) == COMMAND));
        assert_eq!(doc.style_at(6), DEFAULT);
        assert_eq!(doc.style_at(7), DEFAULT);
    }
}
