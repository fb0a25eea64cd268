//! Plain-text renderings of a lexed document, used as golden files.
//!
//! `.styled` files hold the text with `{style}` markers inserted wherever the style
//! changes. `.folded` files prefix every line with its fold level:
//!
//! ```text
//!  2   0   1 + a {
//!  0   1   1 |   b: c;
//!  0   1   0 | }
//!  1   0   0
//! ```

use lexkit::{Document, FOLD_LEVEL_BASE, FoldLevel};

fn bytes_of(doc: &dyn Document) -> impl Iterator<Item = u8> + '_ {
    (0..doc.len()).map_while(|pos| doc.byte_at(pos))
}

/// The document text with a `{style}` marker before every run of equal styles.
pub fn marked_document(doc: &dyn Document) -> String {
    let mut out = Vec::with_capacity(doc.len() * 2);
    let mut previous = None;
    for (pos, byte) in bytes_of(doc).enumerate() {
        let style = doc.style_at(pos);
        if previous != Some(style) {
            out.extend_from_slice(format!("{{{style}}}").as_bytes());
            previous = Some(style);
        }
        out.push(byte);
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// The prefix written before each line of a folded rendering.
pub fn level_prefix(level: FoldLevel) -> String {
    let symbol = if level.header {
        '+'
    } else if level.level > FOLD_LEVEL_BASE {
        '|'
    } else {
        ' '
    };
    format!(
        " {:x} {:>3x} {:>3x} {symbol} ",
        level.flags(),
        level.level,
        level.next
    )
}

/// The document text with each line prefixed by its fold level.
///
/// A document ending in `'\n'` gets one more prefix for the empty line that follows.
pub fn folded_document(doc: &dyn Document) -> String {
    let mut out = Vec::with_capacity(doc.len() * 2);
    let mut last = None;
    for line in 0..doc.line_count() {
        let start = doc.line_start(line);
        let end = doc.line_start(line + 1);
        if start >= end {
            continue;
        }
        out.extend_from_slice(level_prefix(doc.level(line)).as_bytes());
        out.extend((start..end).map_while(|pos| doc.byte_at(pos)));
        last = Some(line);
    }
    if let Some(line) = last
        && doc.byte_at(doc.len().saturating_sub(1)) == Some(b'\n')
    {
        out.extend_from_slice(level_prefix(doc.level(line + 1)).as_bytes());
    }
    String::from_utf8_lossy(&out).into_owned()
}
