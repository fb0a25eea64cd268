//! End-to-end behaviour of the built-in lexers, created through the library the way a
//! host would create them.

use lexkit::{
    Document, Encoding, FoldLevel, FoldRegion, Lexer, LexerLibrary, TextDocument, fold_regions,
};
use lexkit_lexers::{BuiltinLibrary, css, matlab, python, toml};
use pretty_assertions::assert_eq;

fn create(name: &str) -> Box<dyn Lexer> {
    BuiltinLibrary::new().create_lexer(name).unwrap()
}

fn run(lexer: &dyn Lexer, doc: &mut TextDocument) {
    let len = doc.len();
    lexer.lex(0, len, 0, &mut *doc);
    lexer.fold(0, len, 0, &mut *doc);
}

fn levels(doc: &dyn Document) -> Vec<FoldLevel> {
    (0..doc.line_count()).map(|line| doc.level(line)).collect()
}

#[test]
fn test_css_brace_folding() {
    let lexer = create("css");
    let mut doc = TextDocument::from_text("a {\n  b: 1;\n}\n");
    run(&*lexer, &mut doc);
    assert_eq!(doc.style_at(2), css::style::OPERATOR);
    assert_eq!(
        levels(&doc),
        vec![
            FoldLevel::new(0, 1).with_header(true),
            FoldLevel::new(1, 1),
            FoldLevel::new(0, 0),
            FoldLevel::new(0, 0).with_white(true),
        ]
    );
    assert_eq!(
        fold_regions(&doc),
        vec![FoldRegion {
            start_line: 0,
            end_line: 1
        }]
    );
}

#[test]
fn test_css_dbcs_trail_byte_is_not_a_brace() {
    // 0x83 0x7B is one cp932 character whose trail byte happens to be '{'.
    let bytes = b"a {\n  b: \x83\x7B;\n}\n".to_vec();
    let lexer = create("css");
    let mut doc = TextDocument::from_bytes(bytes).with_encoding(Encoding::Dbcs(932));
    run(&*lexer, &mut doc);
    assert_eq!(doc.style_at(10), doc.style_at(9));
    assert_ne!(doc.style_at(10), css::style::OPERATOR);
    assert_eq!(doc.level(1), FoldLevel::new(1, 1));
    assert_eq!(doc.level(2), FoldLevel::new(0, 0));
}

#[test]
fn test_unterminated_string_without_newline() {
    let python = create("python");
    let mut doc = TextDocument::from_text("x = \"abc");
    run(&*python, &mut doc);
    assert!((4..8).all(|pos| doc.style_at(pos) == python::style::STRINGEOL));

    let toml = create("toml");
    let mut doc = TextDocument::from_text("x = \"abc");
    run(&*toml, &mut doc);
    assert!((4..8).all(|pos| doc.style_at(pos) == toml::style::STRINGEOL));
}

#[test]
fn test_unterminated_string_with_newline() {
    let python = create("python");
    let mut doc = TextDocument::from_text("x = \"abc\n");
    run(&*python, &mut doc);
    assert!((4..9).all(|pos| doc.style_at(pos) == python::style::STRINGEOL));
    assert_ne!(doc.style_at(5), python::style::STRING);

    let toml = create("toml");
    let mut doc = TextDocument::from_text("x = \"abc\n");
    run(&*toml, &mut doc);
    assert!((4..9).all(|pos| doc.style_at(pos) == toml::style::STRINGEOL));
}

#[test]
fn test_nested_block_comment_region_is_rooted_at_outer_opener() {
    let library = BuiltinLibrary::new();
    library.set_library_property("fold", "1");
    library.set_library_property("fold.comment", "1");
    let lexer = library.create_lexer("matlab").unwrap();
    let mut doc = TextDocument::from_text("%{\na\n%{\nb\n%}\nc\n%}\nx\n");
    run(&*lexer, &mut doc);

    let depths: Vec<i32> = (0..8).map(|line| doc.line_state(line) & 0xFF).collect();
    assert_eq!(depths, vec![1, 1, 2, 2, 1, 1, 0, 0]);
    assert!((0..7).all(|line| doc.style_at(doc.line_start(line)) == matlab::style::COMMENT));
    assert_eq!(doc.style_at(doc.line_start(7)), matlab::style::IDENTIFIER);
    assert_eq!(
        fold_regions(&doc),
        vec![
            FoldRegion {
                start_line: 0,
                end_line: 6
            },
            FoldRegion {
                start_line: 2,
                end_line: 4
            },
        ]
    );
}

#[test]
fn test_rope_and_flat_documents_agree() {
    use lexkit::RopeDocument;

    let text = "[server]\nhost = \"a\"\nports = [\n  80,\n]\n";
    let lexer = create("toml");
    let mut flat = TextDocument::from_text(text);
    run(&*lexer, &mut flat);
    let mut rope = RopeDocument::from_text(text);
    let len = rope.len();
    lexer.lex(0, len, 0, &mut rope);
    lexer.fold(0, len, 0, &mut rope);
    assert_eq!(rope.styles(), flat.styles());
    assert_eq!(levels(&rope), levels(&flat));
}
