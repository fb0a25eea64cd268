use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use lexkit::{Document, Highlighter, LexerLibrary, TextDocument};
use lexkit_lexers::BuiltinLibrary;

fn large_css(rule_count: usize) -> String {
    let mut out = String::with_capacity(rule_count * 96);
    for i in 0..rule_count {
        out.push_str(&format!(
            "/* rule {i} */\n.item-{i} > a:hover {{\n  color: #{i:06x};\n  margin: {i}px 0;\n}}\n"
        ));
    }
    out
}

fn large_python(def_count: usize) -> String {
    let mut out = String::with_capacity(def_count * 96);
    for i in 0..def_count {
        out.push_str(&format!(
            "def f{i}(x):\n    \"\"\"Doc {i}.\"\"\"\n    # comment\n    \
             return x * {i} + 0x{i:x}\n\n"
        ));
    }
    out
}

fn large_toml(table_count: usize) -> String {
    let mut out = String::with_capacity(table_count * 64);
    for i in 0..table_count {
        out.push_str(&format!(
            "[table{i}]\nname = \"value {i}\"\nlist = [1, 2, {i}]\nflag = true\n"
        ));
    }
    out
}

fn bench_whole_document(c: &mut Criterion, name: &str, text: &str) {
    let library = BuiltinLibrary::new();
    c.bench_function(&format!("lex_fold/{name}"), |b| {
        b.iter_batched(
            || TextDocument::from_text(text),
            |mut doc| {
                let lexer = library.create_lexer(name).unwrap();
                let len = doc.len();
                lexer.lex(0, len, 0, &mut doc);
                lexer.fold(0, len, 0, &mut doc);
                black_box(doc.level(doc.line_count() - 1));
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_lexers(c: &mut Criterion) {
    bench_whole_document(c, "css", &large_css(10_000));
    bench_whole_document(c, "python", &large_python(10_000));
    bench_whole_document(c, "toml", &large_toml(10_000));
}

fn bench_edit_and_restyle(c: &mut Criterion) {
    let text = large_python(10_000);
    let library = BuiltinLibrary::new();
    c.bench_function("highlighter/edit_middle", |b| {
        b.iter_batched(
            || {
                let mut doc = TextDocument::from_text(&text);
                let mut highlighter = Highlighter::new(library.create_lexer("python").unwrap());
                highlighter.colourise_all(&mut doc);
                (doc, highlighter)
            },
            |(mut doc, mut highlighter)| {
                let pos = doc.len() / 2;
                doc.insert_str(pos, "x").unwrap();
                highlighter.invalidate(&doc, pos);
                // Restyle one screenful below the edit.
                let target = doc.line_start(doc.line_from_position(pos) + 60);
                highlighter.ensure_styled(&mut doc, target);
                black_box(highlighter.end_styled());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_lexers, bench_edit_and_restyle);
criterion_main!(benches);
