//! Pascal and Delphi.
//!
//! With `lexer.pascal.smart.highlighting` (on by default) the property and export
//! directives (`read`, `write`, `index`, `name`, ...) are keywords only inside a
//! `property` or `exports` declaration.
//!
//! Folding covers `begin`/`asm`/`record`/`try`/`case` ... `end` blocks, class, object and
//! interface declarations, `{$IF}`-style preprocessor blocks, stream comments and groups
//! of `//` comment lines. Keywords that do not actually open a body never fold:
//!
//! - `case` inside a `record` (the record's `end` closes both)
//! - forward declarations: `class;`, `object;`, `interface;`, `dispinterface;`
//! - `class(TAncestor);`
//! - `class procedure`, `class function`, `class of`, `class var`, `class property`,
//!   `class operator`
//! - `interface` not preceded by `=` (the unit section)
//!
//! Code blocks inside folded preprocessor blocks are not folded, because an `{$IFDEF}`
//! may hold only half of a declaration.
//!
//! The line-state integer is shared: the lexer owns bits 12..15, the folder bits 0..12.

use lexkit::char_class::{CharacterSet, is_alpha, is_digit, is_space, is_space_or_tab};
use lexkit::options::set_bool;
use lexkit::{
    Accessor, Document, FoldLevel, Lexer, LexerError, OptionDef, OptionSet, PropertyType,
    StyleContext, StyleId, StyleInfo, WordLists, fold_lines, start_level,
};

/// Style ids written by [`PascalLexer`].
pub mod style {
    #![allow(missing_docs)]

    use lexkit::StyleId;

    pub const DEFAULT: StyleId = 0;
    pub const IDENTIFIER: StyleId = 1;
    pub const COMMENT: StyleId = 2;
    pub const COMMENT2: StyleId = 3;
    pub const COMMENTLINE: StyleId = 4;
    pub const PREPROCESSOR: StyleId = 5;
    pub const PREPROCESSOR2: StyleId = 6;
    pub const NUMBER: StyleId = 7;
    pub const HEXNUMBER: StyleId = 8;
    pub const WORD: StyleId = 9;
    pub const STRING: StyleId = 10;
    pub const STRINGEOL: StyleId = 11;
    pub const CHARACTER: StyleId = 12;
    pub const OPERATOR: StyleId = 13;
    pub const ASM: StyleId = 14;
}

use style::*;

static STYLES: &[StyleInfo] = &[
    StyleInfo {
        style: DEFAULT,
        name: "SCE_PAS_DEFAULT",
        tags: "default",
        description: "White space",
    },
    StyleInfo {
        style: IDENTIFIER,
        name: "SCE_PAS_IDENTIFIER",
        tags: "identifier",
        description: "Identifiers",
    },
    StyleInfo {
        style: COMMENT,
        name: "SCE_PAS_COMMENT",
        tags: "comment",
        description: "Comment: { ... }",
    },
    StyleInfo {
        style: COMMENT2,
        name: "SCE_PAS_COMMENT2",
        tags: "comment",
        description: "Comment: (* ... *)",
    },
    StyleInfo {
        style: COMMENTLINE,
        name: "SCE_PAS_COMMENTLINE",
        tags: "comment line",
        description: "Line Comment: // ...",
    },
    StyleInfo {
        style: PREPROCESSOR,
        name: "SCE_PAS_PREPROCESSOR",
        tags: "preprocessor",
        description: "Preprocessor: {$ ... }",
    },
    StyleInfo {
        style: PREPROCESSOR2,
        name: "SCE_PAS_PREPROCESSOR2",
        tags: "preprocessor",
        description: "Preprocessor: (*$ ... *)",
    },
    StyleInfo {
        style: NUMBER,
        name: "SCE_PAS_NUMBER",
        tags: "literal numeric",
        description: "Number",
    },
    StyleInfo {
        style: HEXNUMBER,
        name: "SCE_PAS_HEXNUMBER",
        tags: "literal numeric",
        description: "Hex Number",
    },
    StyleInfo {
        style: WORD,
        name: "SCE_PAS_WORD",
        tags: "keyword",
        description: "Word",
    },
    StyleInfo {
        style: STRING,
        name: "SCE_PAS_STRING",
        tags: "literal string",
        description: "String",
    },
    StyleInfo {
        style: STRINGEOL,
        name: "SCE_PAS_STRINGEOL",
        tags: "error literal string",
        description: "Unclosed String",
    },
    StyleInfo {
        style: CHARACTER,
        name: "SCE_PAS_CHARACTER",
        tags: "literal string character",
        description: "Character",
    },
    StyleInfo {
        style: OPERATOR,
        name: "SCE_PAS_OPERATOR",
        tags: "operator",
        description: "Operators",
    },
    StyleInfo {
        style: ASM,
        name: "SCE_PAS_ASM",
        tags: "assembler",
        description: "Inline Asm",
    },
];

static WORD_LIST_DESCRIPTIONS: [&str; 1] = ["Keywords"];

const WORD_START: CharacterSet = CharacterSet::ALPHA.add("_").with_high(true);
const WORD_CHARS: CharacterSet = CharacterSet::ALPHA_NUM.add("_").with_high(true);
const NUMBER_CHARS: CharacterSet = CharacterSet::DIGITS.add(".-+eE");
const HEX_CHARS: CharacterSet = CharacterSet::DIGITS.add("abcdefABCDEF");
const OPERATORS: CharacterSet = CharacterSet::NONE.add("#$&'()*+,-./:;<=>@[]^{}");
/// Identifier characters for fold lookahead; ASCII only.
const FOLD_WORD: CharacterSet = CharacterSet::ALPHA_NUM.add("_");

/// Longest preprocessor or class-modifier word inspected by the folder.
const MAX_DIRECTIVE: usize = 10;
const MAX_WORD: usize = 100;

#[derive(Debug, Clone)]
struct PascalOptions {
    smart_highlighting: bool,
    fold_comment: bool,
    fold_preprocessor: bool,
    fold_compact: bool,
}

impl Default for PascalOptions {
    fn default() -> Self {
        Self {
            smart_highlighting: true,
            fold_comment: false,
            fold_preprocessor: false,
            fold_compact: true,
        }
    }
}

static OPTIONS: &[OptionDef<PascalOptions>] = &[
    OptionDef {
        name: "lexer.pascal.smart.highlighting",
        kind: PropertyType::Boolean,
        description: "Highlight property and export directives only inside their declarations.",
        set: |o, v| set_bool(&mut o.smart_highlighting, v),
    },
    OptionDef {
        name: "fold.comment",
        kind: PropertyType::Boolean,
        description: "Fold stream comments and groups of line comments.",
        set: |o, v| set_bool(&mut o.fold_comment, v),
    },
    OptionDef {
        name: "fold.preprocessor",
        kind: PropertyType::Boolean,
        description: "Fold {$IF}/{$IFDEF}/{$REGION} blocks.",
        set: |o, v| set_bool(&mut o.fold_preprocessor, v),
    },
    OptionDef {
        name: "fold.compact",
        kind: PropertyType::Boolean,
        description: "Mark blank lines as white so they fold with the preceding block.",
        set: |o, v| set_bool(&mut o.fold_compact, v),
    },
];

const LEX_IN_ASM: i32 = 0x1000;
const LEX_IN_PROPERTY: i32 = 0x2000;
const LEX_IN_EXPORT: i32 = 0x4000;
const LEX_MASK: i32 = 0x7000;
const FOLD_DEPTH_MASK: i32 = 0x00FF;
const FOLD_IN_PREPROCESSOR: i32 = 0x0100;
const FOLD_IN_RECORD: i32 = 0x0200;
const FOLD_MASK: i32 = 0x0FFF;

/// Lexer context carried between lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LexState {
    in_asm: bool,
    in_property: bool,
    in_export: bool,
}

impl LexState {
    fn pack(self) -> i32 {
        (if self.in_asm { LEX_IN_ASM } else { 0 })
            | (if self.in_property { LEX_IN_PROPERTY } else { 0 })
            | (if self.in_export { LEX_IN_EXPORT } else { 0 })
    }

    fn unpack(state: i32) -> Self {
        Self {
            in_asm: state & LEX_IN_ASM != 0,
            in_property: state & LEX_IN_PROPERTY != 0,
            in_export: state & LEX_IN_EXPORT != 0,
        }
    }
}

/// Folder context carried between lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FoldState {
    preprocessor_depth: u8,
    in_preprocessor: bool,
    in_record: bool,
}

impl FoldState {
    fn pack(self) -> i32 {
        i32::from(self.preprocessor_depth)
            | (if self.in_preprocessor { FOLD_IN_PREPROCESSOR } else { 0 })
            | (if self.in_record { FOLD_IN_RECORD } else { 0 })
    }

    fn unpack(state: i32) -> Self {
        Self {
            preprocessor_depth: (state & FOLD_DEPTH_MASK) as u8,
            in_preprocessor: state & FOLD_IN_PREPROCESSOR != 0,
            in_record: state & FOLD_IN_RECORD != 0,
        }
    }
}

/// Save `state` for the line before the cursor, keeping the folder's bits.
fn store_lex_state(sc: &mut StyleContext<'_>, state: LexState) {
    let line = sc.current_line - 1;
    let folder_bits = sc.line_state(line) & FOLD_MASK;
    sc.set_line_state(line, folder_bits | state.pack());
}

fn is_stream_comment(style: StyleId) -> bool {
    style == COMMENT || style == COMMENT2
}

/// Lower-cased run of `set` characters starting at `pos`, at most `max` bytes.
fn forward_word_lowered(
    styler: &Accessor<'_>,
    pos: usize,
    set: CharacterSet,
    max: usize,
) -> String {
    (pos..)
        .map(|p| styler.safe_char_at(p, 0))
        .take_while(|&b| set.contains(u32::from(b)))
        .take(max)
        .map(|b| char::from(b.to_ascii_lowercase()))
        .collect()
}

/// Step past blanks, line ends and stream comments after `pos`, staying before `limit`.
fn skip_white_space(styler: &Accessor<'_>, pos: usize, limit: usize, include_words: bool) -> usize {
    let mut j = pos + 1;
    while j < limit {
        let ch = styler.safe_char_at(j, 0);
        let skip = is_space_or_tab(u32::from(ch))
            || ch == b'\r'
            || ch == b'\n'
            || is_stream_comment(styler.style_at(j))
            || (include_words && FOLD_WORD.contains(u32::from(ch)));
        if !skip {
            break;
        }
        j += 1;
    }
    j
}

/// The line's first non-blank characters open a `//` comment.
fn is_comment_line(styler: &Accessor<'_>, line: usize) -> bool {
    if line >= styler.line_count() {
        return false;
    }
    styler
        .first_non_blank(line)
        .is_some_and(|pos| styler.char_at(pos) == b'/' && styler.safe_char_at(pos + 1, 0) == b'/')
}

/// Pascal lexer and folder.
pub struct PascalLexer {
    options: PascalOptions,
    option_set: OptionSet<PascalOptions>,
    keywords: WordLists<1>,
}

impl PascalLexer {
    /// Create a lexer with smart highlighting on.
    pub fn new() -> Self {
        Self {
            options: PascalOptions::default(),
            option_set: OptionSet::new(OPTIONS),
            keywords: WordLists::new("pascal", &WORD_LIST_DESCRIPTIONS),
        }
    }

    /// Factory for registries.
    pub fn factory() -> Box<dyn Lexer> {
        Box::new(Self::new())
    }

    fn classify_word(&self, sc: &mut StyleContext<'_>, state: &mut LexState) {
        let word = sc.current_lowered();
        if self.keywords[0].in_list(&word) {
            if state.in_asm {
                if word == "end" && sc.get_relative(-4) != b'@' {
                    state.in_asm = false;
                    sc.change_state(WORD);
                } else {
                    sc.change_state(ASM);
                }
            } else {
                let mut ignore = false;
                if word == "asm" {
                    state.in_asm = true;
                } else if self.options.smart_highlighting {
                    match word.as_str() {
                        "property" => state.in_property = true,
                        "exports" => state.in_export = true,
                        "index" => ignore = !(state.in_property || state.in_export),
                        "name" => ignore = !state.in_export,
                        "read" | "write" | "default" | "nodefault" | "stored" | "implements"
                        | "readonly" | "writeonly" | "add" | "remove" => {
                            ignore = !state.in_property;
                        }
                        _ => {}
                    }
                }
                if !ignore {
                    sc.change_state(WORD);
                }
            }
        } else if state.in_asm {
            sc.change_state(ASM);
        }
        sc.set_state(DEFAULT);
    }

    fn step(&self, sc: &mut StyleContext<'_>, state: &mut LexState) {
        match sc.state {
            NUMBER => {
                if !NUMBER_CHARS.contains(sc.ch) || (sc.match2(b'.', b'.')) {
                    sc.set_state(DEFAULT);
                } else if (sc.match1(b'-') || sc.match1(b'+'))
                    && sc.ch_prev != u32::from(b'e')
                    && sc.ch_prev != u32::from(b'E')
                {
                    sc.set_state(DEFAULT);
                }
            }
            IDENTIFIER => {
                if !WORD_CHARS.contains(sc.ch) {
                    self.classify_word(sc, state);
                }
            }
            HEXNUMBER => {
                if !HEX_CHARS.contains(sc.ch) {
                    sc.set_state(DEFAULT);
                }
            }
            COMMENT | PREPROCESSOR => {
                if sc.match1(b'}') {
                    sc.forward_set_state(DEFAULT);
                }
            }
            COMMENT2 | PREPROCESSOR2 => {
                if sc.match2(b'*', b')') {
                    sc.forward();
                    sc.forward_set_state(DEFAULT);
                }
            }
            COMMENTLINE | STRINGEOL => {
                if sc.at_line_start {
                    sc.set_state(DEFAULT);
                }
            }
            STRING => {
                if sc.at_line_end {
                    sc.change_state(STRINGEOL);
                } else if sc.match2(b'\'', b'\'') {
                    sc.forward();
                } else if sc.match1(b'\'') {
                    sc.forward_set_state(DEFAULT);
                }
            }
            CHARACTER => {
                if !HEX_CHARS.contains(sc.ch) && !sc.match1(b'$') {
                    sc.set_state(DEFAULT);
                }
            }
            OPERATOR => {
                if self.options.smart_highlighting && sc.ch_prev == u32::from(b';') {
                    state.in_property = false;
                    state.in_export = false;
                }
                sc.set_state(DEFAULT);
            }
            ASM => sc.set_state(DEFAULT),
            _ => {}
        }

        if sc.state != DEFAULT {
            return;
        }
        if is_digit(sc.ch) && !state.in_asm {
            sc.set_state(NUMBER);
        } else if WORD_START.contains(sc.ch) {
            sc.set_state(IDENTIFIER);
        } else if sc.match1(b'$') && !state.in_asm {
            sc.set_state(HEXNUMBER);
        } else if sc.match2(b'{', b'$') {
            sc.set_state(PREPROCESSOR);
        } else if sc.match1(b'{') {
            sc.set_state(COMMENT);
        } else if sc.match_str("(*$") {
            sc.set_state(PREPROCESSOR2);
        } else if sc.match2(b'(', b'*') {
            sc.set_state(COMMENT2);
            // The `*` may not also close the comment.
            sc.forward();
        } else if sc.match2(b'/', b'/') {
            sc.set_state(COMMENTLINE);
        } else if sc.match1(b'\'') {
            sc.set_state(STRING);
        } else if sc.match1(b'#') {
            sc.set_state(CHARACTER);
        } else if OPERATORS.contains(sc.ch) && !state.in_asm {
            sc.set_state(OPERATOR);
        } else if state.in_asm {
            sc.set_state(ASM);
        }
    }

    /// Adjust `level` for the preprocessor directive whose name starts at `pos`.
    fn preprocessor_fold_point(
        styler: &Accessor<'_>,
        pos: usize,
        level: &mut i32,
        fold: &mut FoldState,
    ) {
        let alpha = CharacterSet::ALPHA;
        match forward_word_lowered(styler, pos, alpha, MAX_DIRECTIVE).as_str() {
            "if" | "ifdef" | "ifndef" | "ifopt" | "region" => {
                fold.preprocessor_depth = fold.preprocessor_depth.saturating_add(1);
                fold.in_preprocessor = true;
                *level += 1;
            }
            "endif" | "ifend" | "endregion" => {
                fold.preprocessor_depth = fold.preprocessor_depth.saturating_sub(1);
                if fold.preprocessor_depth == 0 {
                    fold.in_preprocessor = false;
                }
                *level = (*level - 1).max(0);
            }
            _ => {}
        }
    }

    /// Adjust `level` for the keyword occupying `[word_start, word_end]` on a line that
    /// ends before `limit`.
    fn word_fold_point(
        styler: &Accessor<'_>,
        word_start: usize,
        word_end: usize,
        line_start: usize,
        limit: usize,
        level: &mut i32,
        fold: &mut FoldState,
    ) {
        let word = styler.range_lowered(word_start, word_end, MAX_WORD);
        match word.as_str() {
            "record" => {
                fold.in_record = true;
                *level += 1;
            }
            "begin" | "asm" | "try" => *level += 1,
            "case" if !fold.in_record => *level += 1,
            "class" | "object" => {
                let j = skip_white_space(styler, word_end, limit, false);
                let mut ignore = false;
                if j < limit {
                    let next = styler.safe_char_at(j, 0);
                    if next == b';' {
                        // Forward declaration or `of object;`.
                        ignore = true;
                    } else if word == "class" && next == b'(' {
                        let j = skip_white_space(styler, j, limit, true);
                        if j < limit && styler.safe_char_at(j, 0) == b')' {
                            let j = skip_white_space(styler, j, limit, false);
                            ignore = j < limit && styler.safe_char_at(j, 0) == b';';
                        }
                    } else if word == "class" && (is_alpha(u32::from(next)) || next == b'_') {
                        let modifier =
                            forward_word_lowered(styler, j, FOLD_WORD, MAX_DIRECTIVE + 1);
                        ignore = matches!(
                            modifier.as_str(),
                            "procedure" | "function" | "of" | "var" | "property" | "operator"
                        );
                    }
                }
                if !ignore {
                    *level += 1;
                }
            }
            "interface" => {
                let mut j = word_start;
                while j > line_start {
                    let ch = styler.char_at(j - 1);
                    if is_space(u32::from(ch)) || is_stream_comment(styler.style_at(j - 1)) {
                        j -= 1;
                    } else {
                        break;
                    }
                }
                let after_equals = j > line_start && styler.char_at(j - 1) == b'=';
                let k = skip_white_space(styler, word_end, limit, false);
                let forward = k < limit && styler.safe_char_at(k, 0) == b';';
                if after_equals && !forward {
                    *level += 1;
                }
            }
            "dispinterface" => {
                let j = skip_white_space(styler, word_end, limit, false);
                if !(j < limit && styler.safe_char_at(j, 0) == b';') {
                    *level += 1;
                }
            }
            "end" => {
                fold.in_record = false;
                *level = (*level - 1).max(0);
            }
            _ => {}
        }
    }
}

impl Default for PascalLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer for PascalLexer {
    fn name(&self) -> &'static str {
        "pascal"
    }

    fn identifier(&self) -> i32 {
        18
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
        self.keywords.set_lowered(index, text)
    }

    fn styles(&self) -> &'static [StyleInfo] {
        STYLES
    }

    fn lex(&self, start: usize, len: usize, init_style: StyleId, doc: &mut dyn Document) {
        let mut sc = StyleContext::new(start, len, init_style, doc);
        let mut state = if sc.current_line > 0 {
            LexState::unpack(sc.line_state(sc.current_line - 1))
        } else {
            LexState::default()
        };
        while sc.more() {
            if sc.at_line_start && sc.current_line > 0 {
                store_lex_state(&mut sc, state);
            }
            self.step(&mut sc, &mut state);
            sc.forward();
        }
        if sc.state == IDENTIFIER && WORD_CHARS.contains(sc.ch_prev) {
            self.classify_word(&mut sc, &mut state);
        }
        if sc.at_line_start && sc.current_line > 0 {
            store_lex_state(&mut sc, state);
        }
        sc.complete();
    }

    fn fold(&self, start: usize, len: usize, _init_style: StyleId, doc: &mut dyn Document) {
        let lines = fold_lines(doc, start, len);
        let mut styler = Accessor::new(doc);
        let first = *lines.start();
        let mut level = start_level(styler.document(), first);
        let mut fold = if first > 0 {
            FoldState::unpack(styler.line_state(first - 1))
        } else {
            FoldState::default()
        };
        for line in lines {
            let line_start = styler.line_start(line);
            let limit = styler.line_start(line + 1);
            let mut current = level;
            let mut visible = 0;
            let mut word_start = line_start;
            let mut pos = line_start;
            while pos < limit {
                let ch = styler.char_at(pos);
                let after = styler.next_char_pos(pos);
                let style = styler.style_at(pos);
                let style_prev = if pos > 0 { styler.style_at(pos - 1) } else { DEFAULT };
                let at_eol =
                    ch == b'\n' || (ch == b'\r' && styler.safe_char_at(pos + 1, 0) != b'\n');

                if self.options.fold_comment && is_stream_comment(style) {
                    if !is_stream_comment(style_prev) {
                        current += 1;
                    } else if !is_stream_comment(styler.style_at(after)) && !at_eol {
                        current -= 1;
                    }
                }
                if self.options.fold_preprocessor {
                    if style == PREPROCESSOR
                        && ch == b'{'
                        && styler.safe_char_at(pos + 1, 0) == b'$'
                    {
                        Self::preprocessor_fold_point(&styler, pos + 2, &mut current, &mut fold);
                    } else if style == PREPROCESSOR2
                        && ch == b'('
                        && styler.safe_char_at(pos + 1, 0) == b'*'
                        && styler.safe_char_at(pos + 2, 0) == b'$'
                    {
                        Self::preprocessor_fold_point(&styler, pos + 3, &mut current, &mut fold);
                    }
                }
                if style == WORD {
                    if style_prev != WORD || pos == line_start {
                        word_start = pos;
                    }
                    let word_ends = !WORD_CHARS.contains(u32::from(styler.safe_char_at(after, 0)))
                        || styler.style_at(after) != WORD;
                    if word_ends && !fold.in_preprocessor {
                        Self::word_fold_point(
                            &styler,
                            word_start,
                            after - 1,
                            line_start,
                            limit,
                            &mut current,
                            &mut fold,
                        );
                    }
                }
                if !is_space(u32::from(ch)) {
                    visible += 1;
                }
                pos = after;
            }

            if self.options.fold_comment && is_comment_line(&styler, line) {
                let prev = line > 0 && is_comment_line(&styler, line - 1);
                let next = is_comment_line(&styler, line + 1);
                if !prev && next {
                    current += 1;
                } else if prev && !next {
                    current -= 1;
                }
            }

            let folded = FoldLevel::new(level, current);
            let folded = folded
                .with_header(folded.next > folded.level && visible > 0)
                .with_white(visible == 0 && self.options.fold_compact);
            styler.set_level(line, folded);
            let lexer_bits = styler.line_state(line) & LEX_MASK;
            styler.set_line_state(line, lexer_bits | fold.pack());
            level = i32::from(folded.next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexkit::TextDocument;
    use pretty_assertions::assert_eq;

    const KEYWORDS: &str = "and asm begin case class const dispinterface do end function \
                            integer interface object of procedure program property read \
                            record try type var write";

    fn lexer() -> PascalLexer {
        let mut lexer = PascalLexer::new();
        lexer.word_list_set(0, KEYWORDS).unwrap();
        lexer
    }

    fn lex(lexer: &PascalLexer, text: &str) -> TextDocument {
        let mut doc = TextDocument::from_text(text);
        let len = doc.len();
        lexer.lex(0, len, 0, &mut doc);
        lexer.fold(0, len, 0, &mut doc);
        doc
    }

    fn levels(doc: &TextDocument) -> Vec<(u16, u16, bool)> {
        (0..doc.line_count())
            .map(|line| {
                let level = doc.level(line);
                (level.level, level.next, level.header)
            })
            .collect()
    }

    #[test]
    fn test_state_packing_keeps_owners_apart() {
        let lex = LexState {
            in_asm: true,
            in_property: false,
            in_export: true,
        };
        let fold = FoldState {
            preprocessor_depth: 3,
            in_preprocessor: true,
            in_record: true,
        };
        let packed = lex.pack() | fold.pack();
        assert_eq!(LexState::unpack(packed), lex);
        assert_eq!(FoldState::unpack(packed), fold);
        assert_eq!(lex.pack() & FOLD_MASK, 0);
        assert_eq!(fold.pack() & LEX_MASK, 0);
    }

    #[test]
    fn test_basic_styles() {
        let doc = lex(&lexer(), "begin\n  x := $1F + 2; { c }\nEND.\n");
        assert_eq!(doc.style_at(0), WORD);
        assert_eq!(doc.style_at(8), IDENTIFIER);
        assert_eq!(doc.style_at(10), OPERATOR);
        assert_eq!(doc.style_at(13), HEXNUMBER);
        assert_eq!(doc.style_at(19), NUMBER);
        assert_eq!(doc.style_at(22), COMMENT);
        assert_eq!(doc.style_at(26), COMMENT);
        assert_eq!(doc.style_at(28), WORD);
    }

    #[test]
    fn test_unterminated_string() {
        let doc = lex(&lexer(), "s := 'abc\r\nx");
        assert!((5..=10).all(|pos| doc.style_at(pos) == STRINGEOL));
        assert_eq!(doc.style_at(11), IDENTIFIER);
    }

    #[test]
    fn test_smart_highlighting() {
        let doc = lex(&lexer(), "property P: Integer read F;\nread := 1;\n");
        assert_eq!(doc.style_at(20), WORD);
        assert_eq!(doc.style_at(28), IDENTIFIER);

        let mut plain = lexer();
        plain.property_set("lexer.pascal.smart.highlighting", "0");
        let doc = lex(&plain, "read := 1;\n");
        assert_eq!(doc.style_at(0), WORD);
    }

    #[test]
    fn test_asm_block() {
        let doc = lex(&lexer(), "asm\n  mov eax, 1\nend;\n");
        assert_eq!(doc.style_at(0), WORD);
        assert_eq!(doc.style_at(6), ASM);
        assert_eq!(doc.style_at(16), ASM);
        assert_eq!(doc.style_at(18), WORD);
        assert_eq!(doc.style_at(20), OPERATOR);
        assert_eq!(levels(&doc)[0], (0, 1, true));
        assert_eq!(levels(&doc)[2], (1, 0, false));
    }

    #[test]
    fn test_class_fold_suppressions() {
        let text = "type\n  TFwd = class;\n  TShort = class(TObject);\n\
                    \x20 TMeta = class of TObject;\n  TFull = class(TObject)\n\
                    \x20   class procedure P;\n  end;\n";
        let doc = lex(&lexer(), text);
        assert_eq!(
            levels(&doc),
            vec![
                (0, 0, false),
                (0, 0, false),
                (0, 0, false),
                (0, 0, false),
                (0, 1, true),
                (1, 1, false),
                (1, 0, false),
                (0, 0, false),
            ]
        );
    }

    #[test]
    fn test_record_case_folds_once() {
        let text = "TRec = record\n  case Integer of\n    0: (a: Integer);\n  end;\n";
        let doc = lex(&lexer(), text);
        assert_eq!(levels(&doc)[0], (0, 1, true));
        assert_eq!(levels(&doc)[1], (1, 1, false));
        assert_eq!(levels(&doc)[3], (1, 0, false));
        assert_ne!(doc.line_state(1) & FOLD_IN_RECORD, 0);
        assert_eq!(doc.line_state(3) & FOLD_IN_RECORD, 0);
    }

    #[test]
    fn test_interface_folds_only_as_a_type() {
        let text = "type\n  IFoo = interface\n  end;\n  IBar = interface;\ninterface\n";
        let doc = lex(&lexer(), text);
        let levels = levels(&doc);
        assert_eq!(levels[1], (0, 1, true));
        assert_eq!(levels[2], (1, 0, false));
        assert_eq!(levels[3], (0, 0, false));
        assert_eq!(levels[4], (0, 0, false));
    }

    #[test]
    fn test_preprocessor_blocks() {
        let mut lexer = lexer();
        lexer.property_set("fold.preprocessor", "1");
        let doc = lex(&lexer, "{$IFDEF X}\nbegin\n{$ENDIF}\n");
        assert_eq!(doc.style_at(0), PREPROCESSOR);
        assert_eq!(levels(&doc)[0], (0, 1, true));
        assert_eq!(levels(&doc)[1], (1, 1, false));
        assert_eq!(levels(&doc)[2], (1, 0, false));
    }

    #[test]
    fn test_comment_folding() {
        let mut lexer = lexer();
        lexer.property_set("fold.comment", "1");
        let doc = lex(&lexer, "// a\n// b\nx;\n{ a\n b }\nx;\n");
        let levels = levels(&doc);
        assert_eq!(levels[0], (0, 1, true));
        assert_eq!(levels[1], (1, 0, false));
        assert_eq!(levels[2], (0, 0, false));
        assert_eq!(levels[3], (0, 1, true));
        assert_eq!(levels[4], (1, 0, false));
        assert_eq!(levels[5], (0, 0, false));
    }
}
