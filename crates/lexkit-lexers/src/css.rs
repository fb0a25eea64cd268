//! Cascading Style Sheets, with the SCSS, LESS and HSS dialects.
//!
//! The selector/property/value machine needs a little context that styles alone do not
//! carry: the last operator, the state before it, the state a comment or string returns
//! to, and the brace depth. That context is saved in the line state at every line end,
//! so a pass can resume at any line.

use lexkit::char_class::{is_alnum, is_eol, is_space};
use lexkit::options::set_bool;
use lexkit::{
    Accessor, Document, FoldLevel, Lexer, LexerError, OptionDef, OptionSet, PropertyType,
    StyleContext, StyleId, StyleInfo, WordLists, fold_lines, start_level,
};

/// Style ids written by [`CssLexer`].
pub mod style {
    #![allow(missing_docs)]

    use lexkit::StyleId;

    pub const DEFAULT: StyleId = 0;
    pub const TAG: StyleId = 1;
    pub const CLASS: StyleId = 2;
    pub const PSEUDOCLASS: StyleId = 3;
    pub const UNKNOWN_PSEUDOCLASS: StyleId = 4;
    pub const OPERATOR: StyleId = 5;
    pub const IDENTIFIER: StyleId = 6;
    pub const UNKNOWN_IDENTIFIER: StyleId = 7;
    pub const VALUE: StyleId = 8;
    pub const COMMENT: StyleId = 9;
    pub const ID: StyleId = 10;
    pub const IMPORTANT: StyleId = 11;
    pub const DIRECTIVE: StyleId = 12;
    pub const DOUBLESTRING: StyleId = 13;
    pub const SINGLESTRING: StyleId = 14;
    pub const IDENTIFIER2: StyleId = 15;
    pub const ATTRIBUTE: StyleId = 16;
    pub const IDENTIFIER3: StyleId = 17;
    pub const PSEUDOELEMENT: StyleId = 18;
    pub const EXTENDED_IDENTIFIER: StyleId = 19;
    pub const EXTENDED_PSEUDOCLASS: StyleId = 20;
    pub const EXTENDED_PSEUDOELEMENT: StyleId = 21;
    pub const GROUP_RULE: StyleId = 22;
    pub const VARIABLE: StyleId = 23;
    pub const STRINGEOL: StyleId = 24;
    pub const LINECOMMENT: StyleId = 25;
}

use style::*;

static STYLES: &[StyleInfo] = &[
    StyleInfo {
        style: DEFAULT,
        name: "SCE_CSS_DEFAULT",
        tags: "default",
        description: "White space",
    },
    StyleInfo {
        style: TAG,
        name: "SCE_CSS_TAG",
        tags: "identifier",
        description: "Selector (HTML tag)",
    },
    StyleInfo {
        style: CLASS,
        name: "SCE_CSS_CLASS",
        tags: "identifier",
        description: "Class selector",
    },
    StyleInfo {
        style: PSEUDOCLASS,
        name: "SCE_CSS_PSEUDOCLASS",
        tags: "identifier",
        description: "Pseudo-class",
    },
    StyleInfo {
        style: UNKNOWN_PSEUDOCLASS,
        name: "SCE_CSS_UNKNOWN_PSEUDOCLASS",
        tags: "identifier error",
        description: "Unknown pseudo-class",
    },
    StyleInfo {
        style: OPERATOR,
        name: "SCE_CSS_OPERATOR",
        tags: "operator",
        description: "Operator",
    },
    StyleInfo {
        style: IDENTIFIER,
        name: "SCE_CSS_IDENTIFIER",
        tags: "identifier",
        description: "CSS1 property",
    },
    StyleInfo {
        style: UNKNOWN_IDENTIFIER,
        name: "SCE_CSS_UNKNOWN_IDENTIFIER",
        tags: "identifier error",
        description: "Unknown property",
    },
    StyleInfo {
        style: VALUE,
        name: "SCE_CSS_VALUE",
        tags: "literal",
        description: "Value",
    },
    StyleInfo {
        style: COMMENT,
        name: "SCE_CSS_COMMENT",
        tags: "comment",
        description: "Block comment",
    },
    StyleInfo {
        style: ID,
        name: "SCE_CSS_ID",
        tags: "identifier",
        description: "ID selector",
    },
    StyleInfo {
        style: IMPORTANT,
        name: "SCE_CSS_IMPORTANT",
        tags: "keyword",
        description: "Important",
    },
    StyleInfo {
        style: DIRECTIVE,
        name: "SCE_CSS_DIRECTIVE",
        tags: "preprocessor",
        description: "At-rule",
    },
    StyleInfo {
        style: DOUBLESTRING,
        name: "SCE_CSS_DOUBLESTRING",
        tags: "literal string",
        description: "Double quoted string",
    },
    StyleInfo {
        style: SINGLESTRING,
        name: "SCE_CSS_SINGLESTRING",
        tags: "literal string",
        description: "Single quoted string",
    },
    StyleInfo {
        style: IDENTIFIER2,
        name: "SCE_CSS_IDENTIFIER2",
        tags: "identifier",
        description: "CSS2 property",
    },
    StyleInfo {
        style: ATTRIBUTE,
        name: "SCE_CSS_ATTRIBUTE",
        tags: "identifier",
        description: "Attribute selector",
    },
    StyleInfo {
        style: IDENTIFIER3,
        name: "SCE_CSS_IDENTIFIER3",
        tags: "identifier",
        description: "CSS3 property",
    },
    StyleInfo {
        style: PSEUDOELEMENT,
        name: "SCE_CSS_PSEUDOELEMENT",
        tags: "identifier",
        description: "Pseudo-element",
    },
    StyleInfo {
        style: EXTENDED_IDENTIFIER,
        name: "SCE_CSS_EXTENDED_IDENTIFIER",
        tags: "identifier",
        description: "Browser-specific property",
    },
    StyleInfo {
        style: EXTENDED_PSEUDOCLASS,
        name: "SCE_CSS_EXTENDED_PSEUDOCLASS",
        tags: "identifier",
        description: "Browser-specific pseudo-class",
    },
    StyleInfo {
        style: EXTENDED_PSEUDOELEMENT,
        name: "SCE_CSS_EXTENDED_PSEUDOELEMENT",
        tags: "identifier",
        description: "Browser-specific pseudo-element",
    },
    StyleInfo {
        style: GROUP_RULE,
        name: "SCE_CSS_GROUP_RULE",
        tags: "preprocessor",
        description: "Group rule such as @media",
    },
    StyleInfo {
        style: VARIABLE,
        name: "SCE_CSS_VARIABLE",
        tags: "identifier",
        description: "SCSS / LESS / HSS variable",
    },
    StyleInfo {
        style: STRINGEOL,
        name: "SCE_CSS_STRINGEOL",
        tags: "literal string error",
        description: "End of line where string is not closed",
    },
    StyleInfo {
        style: LINECOMMENT,
        name: "SCE_CSS_LINECOMMENT",
        tags: "comment line",
        description: "Line comment (SCSS / LESS / HSS)",
    },
];

static WORD_LIST_DESCRIPTIONS: [&str; 8] = [
    "CSS1 Properties",
    "Pseudo-classes",
    "CSS2 Properties",
    "CSS3 Properties",
    "Pseudo-elements",
    "Browser-Specific CSS Properties",
    "Browser-Specific Pseudo-classes",
    "Browser-Specific Pseudo-elements",
];

const CSS1_PROPS: usize = 0;
const PSEUDO_CLASSES: usize = 1;
const CSS2_PROPS: usize = 2;
const CSS3_PROPS: usize = 3;
const PSEUDO_ELEMENTS: usize = 4;
const EX_PROPS: usize = 5;
const EX_PSEUDO_CLASSES: usize = 6;
const EX_PSEUDO_ELEMENTS: usize = 7;

#[derive(Debug, Clone)]
struct CssOptions {
    fold_comment: bool,
    fold_compact: bool,
    scss: bool,
    less: bool,
    hss: bool,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
            fold_comment: false,
            fold_compact: true,
            scss: false,
            less: false,
            hss: false,
        }
    }
}

static OPTIONS: &[OptionDef<CssOptions>] = &[
    OptionDef {
        name: "fold.comment",
        kind: PropertyType::Boolean,
        description: "This option enables folding multi-line comments when using the CSS lexer.",
        set: |o, v| set_bool(&mut o.fold_comment, v),
    },
    OptionDef {
        name: "fold.compact",
        kind: PropertyType::Boolean,
        description: "Mark blank lines as white so they fold with the preceding block.",
        set: |o, v| set_bool(&mut o.fold_compact, v),
    },
    OptionDef {
        name: "lexer.css.scss.language",
        kind: PropertyType::Boolean,
        description: "Set to 1 for Sassy CSS (.scss).",
        set: |o, v| set_bool(&mut o.scss, v),
    },
    OptionDef {
        name: "lexer.css.less.language",
        kind: PropertyType::Boolean,
        description: "Set to 1 for Less CSS (.less).",
        set: |o, v| set_bool(&mut o.less, v),
    },
    OptionDef {
        name: "lexer.css.hss.language",
        kind: PropertyType::Boolean,
        description: "Set to 1 for HSS (.hss).",
        set: |o, v| set_bool(&mut o.hss, v),
    },
];

/// Which extensions of plain CSS are active.
#[derive(Debug, Clone, Copy)]
struct Dialect {
    less: bool,
    /// SCSS, LESS and HSS all have variables, `//` comments and nested rules.
    extended: bool,
    var_prefix: u32,
}

impl Dialect {
    fn new(options: &CssOptions) -> Self {
        let extended = options.scss || options.less || options.hss;
        Self {
            less: options.less,
            extended,
            var_prefix: if options.less {
                u32::from(b'@')
            } else {
                u32::from(b'$')
            },
        }
    }

    /// State after a rule or directive ends at `nesting` depth.
    fn block_state(self, nesting: u8) -> StyleId {
        if self.extended && nesting > 0 {
            IDENTIFIER
        } else {
            DEFAULT
        }
    }
}

/// Operators the state machine remembers; the index is what gets persisted.
const OPERATOR_CHARS: &[u8] = b" {}:,;.#!@*>+=~|[]()";

/// Context carried from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineState {
    nesting: u8,
    /// State before the most recent operator.
    last_state: StyleId,
    op: u8,
    /// Character before `op`; only meaningful on the operator's own line.
    op_prev: u8,
    /// State a comment returns to.
    comment_return: StyleId,
    /// State a string returns to.
    string_return: StyleId,
    /// The variable being lexed sits inside a value.
    variable_in_value: bool,
    /// The current value was introduced by a variable (`$x: 1;`).
    value_of_variable: bool,
    inside_parentheses: bool,
}

impl Default for LineState {
    fn default() -> Self {
        Self {
            nesting: 0,
            last_state: DEFAULT,
            op: b' ',
            op_prev: b' ',
            comment_return: DEFAULT,
            string_return: DEFAULT,
            variable_in_value: false,
            value_of_variable: false,
            inside_parentheses: false,
        }
    }
}

impl LineState {
    fn pack(self) -> i32 {
        let op = OPERATOR_CHARS
            .iter()
            .position(|&c| c == self.op)
            .unwrap_or(0) as u32;
        let packed = u32::from(self.nesting)
            | u32::from(self.last_state & 0x1F) << 8
            | op << 13
            | u32::from(self.comment_return & 0x1F) << 18
            | u32::from(self.string_return & 0x1F) << 23
            | u32::from(self.variable_in_value) << 28
            | u32::from(self.value_of_variable) << 29
            | u32::from(self.inside_parentheses) << 30;
        packed as i32
    }

    fn unpack(state: i32) -> Self {
        let packed = state as u32;
        let op_index = ((packed >> 13) & 0x1F) as usize;
        Self {
            nesting: (packed & 0xFF) as u8,
            last_state: ((packed >> 8) & 0x1F) as StyleId,
            op: OPERATOR_CHARS.get(op_index).copied().unwrap_or(b' '),
            op_prev: b' ',
            comment_return: ((packed >> 18) & 0x1F) as StyleId,
            string_return: ((packed >> 23) & 0x1F) as StyleId,
            variable_in_value: packed & (1 << 28) != 0,
            value_of_variable: packed & (1 << 29) != 0,
            inside_parentheses: packed & (1 << 30) != 0,
        }
    }
}

fn is_css_word_char(ch: u32) -> bool {
    ch >= 0x80 || is_alnum(ch) || ch == u32::from(b'-') || ch == u32::from(b'_')
}

fn is_css_operator(ch: u32) -> bool {
    ch < 0x80 && OPERATOR_CHARS[1..].contains(&(ch as u8))
}

fn is(ch: u32, c: u8) -> bool {
    ch == u32::from(c)
}

/// Selector-ish states after which `.`, `#`, `[` and friends continue a selector.
fn is_selector_state(state: StyleId) -> bool {
    matches!(
        state,
        TAG | DEFAULT | CLASS | ID | PSEUDOCLASS | EXTENDED_PSEUDOCLASS | UNKNOWN_PSEUDOCLASS
    )
}

fn is_pseudo_state(state: StyleId) -> bool {
    matches!(
        state,
        PSEUDOCLASS
            | PSEUDOELEMENT
            | EXTENDED_PSEUDOCLASS
            | EXTENDED_PSEUDOELEMENT
            | UNKNOWN_PSEUDOCLASS
    )
}

fn is_property_state(state: StyleId) -> bool {
    matches!(
        state,
        IDENTIFIER | IDENTIFIER2 | IDENTIFIER3 | EXTENDED_IDENTIFIER | UNKNOWN_IDENTIFIER
    )
}

/// Whether a `{` comes before the next `;` or `}` in the raw text after `pos`.
///
/// Used to tell a nested rule's selector from a property inside a block. Steps over
/// DBCS trail bytes so they never read as braces.
fn block_follows(styler: &Accessor<'_>, mut pos: usize) -> bool {
    while pos < styler.len() {
        match styler.char_at(pos) {
            b';' | b'}' => return false,
            b'{' => return true,
            _ => {}
        }
        pos = styler.next_char_pos(pos);
    }
    false
}

/// CSS lexer and brace folder.
pub struct CssLexer {
    options: CssOptions,
    option_set: OptionSet<CssOptions>,
    word_lists: WordLists<8>,
}

impl CssLexer {
    /// Create a plain CSS lexer; set `lexer.css.*.language` for a dialect.
    pub fn new() -> Self {
        Self {
            options: CssOptions::default(),
            option_set: OptionSet::new(OPTIONS),
            word_lists: WordLists::new("css", &WORD_LIST_DESCRIPTIONS),
        }
    }

    /// Factory for registries.
    pub fn factory() -> Box<dyn Lexer> {
        Box::new(Self::new())
    }

    /// Apply the transitions for the character under the cursor.
    fn step(&self, sc: &mut StyleContext<'_>, ctx: &mut LineState, dialect: Dialect) {
        if sc.state == COMMENT && sc.match2(b'*', b'/') {
            sc.forward();
            sc.forward_set_state(ctx.comment_return);
        }
        if sc.state == COMMENT || sc.state == LINECOMMENT || sc.state == STRINGEOL {
            return;
        }

        if sc.state == DOUBLESTRING || sc.state == SINGLESTRING {
            let quote = if sc.state == DOUBLESTRING { b'"' } else { b'\'' };
            if sc.at_line_end {
                sc.change_state(STRINGEOL);
                return;
            }
            if is(sc.ch, b'\\') && !is_eol(sc.ch_next) {
                sc.forward();
                return;
            }
            if !is(sc.ch, quote) {
                return;
            }
            sc.forward_set_state(ctx.string_return);
        }

        if sc.state == OPERATOR {
            self.after_operator(sc, ctx, dialect);
        }

        if is(sc.ch, b'*') && sc.state == DEFAULT {
            sc.set_state(TAG);
            return;
        }

        if is(sc.ch, b'(') {
            ctx.inside_parentheses = true;
        } else if is(sc.ch, b')') {
            ctx.inside_parentheses = false;
        }

        if dialect.extended {
            if sc.ch == dialect.var_prefix
                && (sc.state == VALUE || (sc.state == DEFAULT && !dialect.less))
            {
                ctx.variable_in_value = sc.state == VALUE;
                sc.set_state(VARIABLE);
                return;
            }
            if sc.state == VARIABLE {
                if is_css_word_char(sc.ch) {
                    return;
                }
                if ctx.variable_in_value {
                    sc.set_state(VALUE);
                }
            }
            // Parent selector reference in a nested rule.
            if is(sc.ch, b'&') && matches!(sc.state, DEFAULT | IDENTIFIER) {
                sc.set_state(TAG);
                return;
            }
            if sc.state == IDENTIFIER
                && (is_css_word_char(sc.ch)
                    || is(sc.ch, b':')
                    || is(sc.ch, b'.')
                    || is(sc.ch, b'#'))
                && block_follows(sc.styler(), sc.current_pos)
            {
                sc.set_state(DEFAULT);
            }
        }

        if is_css_word_char(sc.ch) {
            if sc.state == DEFAULT {
                sc.set_state(TAG);
            }
            return;
        }

        if is_css_word_char(sc.ch_prev)
            && (is_property_state(sc.state)
                || is_pseudo_state(sc.state)
                || sc.state == IMPORTANT
                || sc.state == DIRECTIVE)
        {
            self.classify_word(sc, ctx);
        }

        if !is(sc.ch, b'.')
            && !is(sc.ch, b':')
            && !is(sc.ch, b'#')
            && (sc.state == CLASS
                || sc.state == ID
                || (!is(sc.ch, b'(') && !is(sc.ch, b')') && is_pseudo_state(sc.state)))
        {
            sc.set_state(TAG);
        }

        if sc.match2(b'/', b'*') {
            ctx.comment_return = sc.state;
            sc.set_state(COMMENT);
            sc.forward();
        } else if dialect.extended && sc.match2(b'/', b'/') && !ctx.inside_parentheses {
            // `url(//host/x)` is not a comment.
            ctx.comment_return = sc.state;
            sc.set_state(LINECOMMENT);
            sc.forward();
        } else if (sc.state == VALUE || sc.state == ATTRIBUTE)
            && (is(sc.ch, b'"') || is(sc.ch, b'\''))
        {
            ctx.string_return = sc.state;
            sc.set_state(if is(sc.ch, b'"') {
                DOUBLESTRING
            } else {
                SINGLESTRING
            });
        } else if is_css_operator(sc.ch)
            && (sc.state != ATTRIBUTE || is(sc.ch, b']'))
            && (sc.state != VALUE || is(sc.ch, b';') || is(sc.ch, b'}') || is(sc.ch, b'!'))
            && ((sc.state != DIRECTIVE && sc.state != GROUP_RULE)
                || is(sc.ch, b';')
                || is(sc.ch, b'{'))
        {
            if sc.state != OPERATOR {
                ctx.last_state = sc.state;
            }
            sc.set_state(OPERATOR);
            ctx.op = sc.ch as u8;
            ctx.op_prev = if sc.ch_prev < 0x80 {
                sc.ch_prev as u8
            } else {
                b' '
            };
        }
    }

    /// Leave the operator state according to the operator just passed.
    fn after_operator(&self, sc: &mut StyleContext<'_>, ctx: &mut LineState, dialect: Dialect) {
        let last = ctx.last_state;
        match ctx.op {
            b'@' => {
                if last == DEFAULT || dialect.extended {
                    sc.set_state(DIRECTIVE);
                }
            }
            b'>' | b'+' => {
                if matches!(
                    last,
                    TAG | CLASS | ID | PSEUDOCLASS | EXTENDED_PSEUDOCLASS | UNKNOWN_PSEUDOCLASS
                ) {
                    sc.set_state(DEFAULT);
                }
            }
            b'[' => {
                if is_selector_state(last) {
                    sc.set_state(ATTRIBUTE);
                }
            }
            b']' => {
                if last == ATTRIBUTE {
                    sc.set_state(TAG);
                }
            }
            b'{' => {
                ctx.nesting = ctx.nesting.saturating_add(1);
                match last {
                    GROUP_RULE => sc.set_state(DEFAULT),
                    TAG | DIRECTIVE => sc.set_state(IDENTIFIER),
                    _ => {}
                }
            }
            b'}' => {
                ctx.nesting = ctx.nesting.saturating_sub(1);
                if matches!(
                    last,
                    DEFAULT | VALUE | IMPORTANT | IDENTIFIER | IDENTIFIER2 | IDENTIFIER3
                ) {
                    sc.set_state(dialect.block_state(ctx.nesting));
                }
            }
            b'(' => {
                if last == PSEUDOCLASS {
                    sc.set_state(TAG);
                } else if last == EXTENDED_PSEUDOCLASS {
                    sc.set_state(EXTENDED_PSEUDOCLASS);
                }
            }
            b')' => {
                if is_selector_state(last) || matches!(last, PSEUDOELEMENT | EXTENDED_PSEUDOELEMENT)
                {
                    sc.set_state(TAG);
                }
            }
            b':' => {
                if is_selector_state(last) || matches!(last, PSEUDOELEMENT | EXTENDED_PSEUDOELEMENT)
                {
                    sc.set_state(PSEUDOCLASS);
                } else if is_property_state(last) || last == VARIABLE {
                    sc.set_state(VALUE);
                    ctx.value_of_variable = last == VARIABLE;
                }
            }
            b'.' => {
                if is_selector_state(last) {
                    sc.set_state(CLASS);
                }
            }
            b'#' => {
                if is_selector_state(last) {
                    sc.set_state(ID);
                }
            }
            b',' | b'|' | b'~' => {
                if last == TAG {
                    sc.set_state(DEFAULT);
                }
            }
            b';' => match last {
                DIRECTIVE => sc.set_state(dialect.block_state(ctx.nesting)),
                VALUE | IMPORTANT => {
                    // Data URLs may contain semicolons inside `url(...)`.
                    if ctx.inside_parentheses {
                        sc.set_state(last);
                    } else if ctx.value_of_variable {
                        sc.set_state(DEFAULT);
                    } else {
                        sc.set_state(IDENTIFIER);
                    }
                }
                VARIABLE => {
                    if !ctx.variable_in_value {
                        sc.set_state(DEFAULT);
                    } else if ctx.inside_parentheses {
                        sc.set_state(VALUE);
                    } else {
                        sc.set_state(IDENTIFIER);
                    }
                }
                _ => {}
            },
            b'!' => {
                if last == VALUE {
                    sc.set_state(IMPORTANT);
                }
            }
            _ => {}
        }
    }

    /// Reclassify the word that just ended against the word lists.
    fn classify_word(&self, sc: &mut StyleContext<'_>, ctx: &LineState) {
        let lowered = sc.current_lowered();
        let word = lowered.trim_start_matches(|c: char| !is_css_word_char(u32::from(c)));
        let lists = &self.word_lists;
        match sc.state {
            IDENTIFIER | IDENTIFIER2 | IDENTIFIER3 | EXTENDED_IDENTIFIER | UNKNOWN_IDENTIFIER => {
                let state = if lists[CSS1_PROPS].in_list(word) {
                    IDENTIFIER
                } else if lists[CSS2_PROPS].in_list(word) {
                    IDENTIFIER2
                } else if lists[CSS3_PROPS].in_list(word) {
                    IDENTIFIER3
                } else if lists[EX_PROPS].in_list(word) {
                    EXTENDED_IDENTIFIER
                } else {
                    UNKNOWN_IDENTIFIER
                };
                sc.change_state(state);
            }
            PSEUDOCLASS | PSEUDOELEMENT | EXTENDED_PSEUDOCLASS | EXTENDED_PSEUDOELEMENT
            | UNKNOWN_PSEUDOCLASS => {
                let single_colon = ctx.op == b':' && ctx.op_prev != b':';
                let double_colon = ctx.op_prev == b':';
                let state = if single_colon && lists[PSEUDO_CLASSES].in_list(word) {
                    PSEUDOCLASS
                } else if double_colon && lists[PSEUDO_ELEMENTS].in_list(word) {
                    PSEUDOELEMENT
                } else if (ctx.op == b':'
                    || (ctx.op == b'(' && ctx.last_state == EXTENDED_PSEUDOCLASS))
                    && ctx.op_prev != b':'
                    && lists[EX_PSEUDO_CLASSES].in_list(word)
                {
                    EXTENDED_PSEUDOCLASS
                } else if double_colon && lists[EX_PSEUDO_ELEMENTS].in_list(word) {
                    EXTENDED_PSEUDOELEMENT
                } else {
                    UNKNOWN_PSEUDOCLASS
                };
                sc.change_state(state);
            }
            IMPORTANT => {
                if word != "important" {
                    sc.change_state(VALUE);
                }
            }
            DIRECTIVE => {
                if ctx.op == b'@'
                    && matches!(word, "media" | "supports" | "document" | "-moz-document")
                {
                    sc.change_state(GROUP_RULE);
                }
            }
            _ => {}
        }
    }
}

impl Default for CssLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer for CssLexer {
    fn name(&self) -> &'static str {
        "css"
    }

    fn identifier(&self) -> i32 {
        38
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
        self.word_lists.descriptions()
    }

    fn word_list_set(&mut self, index: usize, text: &str) -> Result<bool, LexerError> {
        self.word_lists.set(index, text)
    }

    fn styles(&self) -> &'static [StyleInfo] {
        STYLES
    }

    fn lex(&self, start: usize, len: usize, init_style: StyleId, doc: &mut dyn Document) {
        let dialect = Dialect::new(&self.options);
        let mut sc = StyleContext::new(start, len, init_style, doc);
        let mut ctx = if sc.current_line > 0 {
            LineState::unpack(sc.line_state(sc.current_line - 1))
        } else {
            LineState::default()
        };
        while sc.more() {
            if sc.at_line_start {
                if sc.current_line > 0 {
                    sc.set_line_state(sc.current_line - 1, ctx.pack());
                }
                ctx.op_prev = b' ';
                // Runs never span a line start, so a later reclassification stays on this line.
                sc.set_state(sc.state);
                match sc.state {
                    STRINGEOL => sc.set_state(ctx.string_return),
                    LINECOMMENT => sc.set_state(ctx.comment_return),
                    _ => {}
                }
            }
            self.step(&mut sc, &mut ctx, dialect);
            sc.forward();
        }
        if sc.at_line_start && sc.current_line > 0 {
            sc.set_line_state(sc.current_line - 1, ctx.pack());
        }
        sc.complete();
    }

    fn fold(&self, start: usize, len: usize, _init_style: StyleId, doc: &mut dyn Document) {
        let lines = fold_lines(doc, start, len);
        let mut styler = Accessor::new(doc);
        let first = *lines.start();
        let mut level = start_level(styler.document(), first);
        let first_start = styler.line_start(first);
        let mut in_comment = first_start > 0 && styler.style_at(first_start - 1) == COMMENT;
        for line in lines {
            let mut lowest = level;
            let mut next = level;
            let mut visible = 0;
            let end = styler.line_start(line + 1);
            let mut pos = styler.line_start(line);
            while pos < end {
                let style = styler.style_at(pos);
                let ch = styler.char_at(pos);
                if self.options.fold_comment {
                    let comment = style == COMMENT;
                    if comment && !in_comment {
                        next += 1;
                    } else if !comment && in_comment {
                        next -= 1;
                    }
                    in_comment = comment;
                }
                if style == OPERATOR {
                    match ch {
                        b'{' => next += 1,
                        b'}' => next -= 1,
                        _ => {}
                    }
                }
                lowest = lowest.min(next);
                if !is_space(u32::from(ch)) {
                    visible += 1;
                }
                pos = styler.next_char_pos(pos);
            }
            let folded = FoldLevel::new(lowest, next)
                .with_header(next > lowest && visible > 0)
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

    fn lex(lexer: &CssLexer, text: &str) -> TextDocument {
        let mut doc = TextDocument::from_text(text);
        let len = doc.len();
        lexer.lex(0, len, 0, &mut doc);
        lexer.fold(0, len, 0, &mut doc);
        doc
    }

    #[test]
    fn test_line_state_round_trip() {
        let state = LineState {
            nesting: 3,
            last_state: VALUE,
            op: b';',
            op_prev: b' ',
            comment_return: IDENTIFIER,
            string_return: ATTRIBUTE,
            variable_in_value: true,
            value_of_variable: false,
            inside_parentheses: true,
        };
        assert_eq!(LineState::unpack(state.pack()), state);
        assert_eq!(LineState::unpack(LineState::default().pack()), LineState::default());
    }

    #[test]
    fn test_rule_styles() {
        let mut lexer = CssLexer::new();
        lexer.word_list_set(CSS1_PROPS, "color").unwrap();
        let doc = lex(&lexer, "h1 { color: red; }");
        let styles = doc.styles();
        assert_eq!(styles[0], TAG);
        assert_eq!(styles[3], OPERATOR);
        assert_eq!(styles[5], IDENTIFIER);
        assert_eq!(styles[10], OPERATOR);
        assert_eq!(styles[12], VALUE);
        assert_eq!(styles[15], OPERATOR);
        assert_eq!(styles[17], OPERATOR);
    }

    #[test]
    fn test_unknown_property_and_pseudo_class() {
        let mut lexer = CssLexer::new();
        lexer.word_list_set(PSEUDO_CLASSES, "hover").unwrap();
        let doc = lex(&lexer, "a:hover { colr: 1 }");
        assert_eq!(doc.style_at(2), PSEUDOCLASS);
        assert_eq!(doc.style_at(10), UNKNOWN_IDENTIFIER);
    }

    #[test]
    fn test_unterminated_string_is_string_eol() {
        let lexer = CssLexer::new();
        let doc = lex(&lexer, "a { content: \"abc\n}\n");
        assert_eq!(doc.style_at(13), STRINGEOL);
        assert_eq!(doc.style_at(17), STRINGEOL);
        assert_eq!(doc.style_at(18), OPERATOR);
    }

    #[test]
    fn test_comment_returns_to_previous_state() {
        let lexer = CssLexer::new();
        let doc = lex(&lexer, "a /* x */ { b: c }");
        assert_eq!(doc.style_at(2), COMMENT);
        assert_eq!(doc.style_at(8), COMMENT);
        assert_eq!(doc.style_at(10), OPERATOR);
    }

    #[test]
    fn test_brace_folding_shows_lowest_level() {
        let lexer = CssLexer::new();
        let doc = lex(&lexer, "a {\n  b: 1;\n}\n");
        assert_eq!(doc.level(0), FoldLevel::new(0, 1).with_header(true));
        assert_eq!(doc.level(1), FoldLevel::new(1, 1));
        assert_eq!(doc.level(2), FoldLevel::new(0, 0));
        assert_eq!(doc.level(3), FoldLevel::new(0, 0).with_white(true));
    }

    #[test]
    fn test_comment_folding() {
        let mut lexer = CssLexer::new();
        lexer.property_set("fold.comment", "1");
        let doc = lex(&lexer, "/* a\nb\n*/\nx {}\n");
        assert!(doc.level(0).header);
        assert_eq!(doc.level(1).level, 1);
        assert_eq!(doc.level(2).level, 0);
        assert!(!doc.level(3).header);
    }

    #[test]
    fn test_scss_variables_and_line_comments() {
        let mut lexer = CssLexer::new();
        lexer.property_set("lexer.css.scss.language", "1");
        let doc = lex(&lexer, "$w: 1px; // note\na { b: $w; }\n");
        assert_eq!(doc.style_at(0), VARIABLE);
        assert_eq!(doc.style_at(12), LINECOMMENT);
        assert_eq!(doc.style_at(16), LINECOMMENT);
        assert_eq!(doc.style_at(17), TAG);
        assert_eq!(doc.style_at(24), VARIABLE);
    }

    #[test]
    fn test_nested_rule_selector() {
        let mut lexer = CssLexer::new();
        lexer.property_set("lexer.css.scss.language", "1");
        let doc = lex(&lexer, "a {\n  b { c: d; }\n}\n");
        assert_eq!(doc.style_at(6), TAG);
        assert_eq!(doc.level(1), FoldLevel::new(1, 1));
        assert_eq!(doc.level(2), FoldLevel::new(0, 0));
    }
}
