//! The document accessor consumed by lexers and folders.
//!
//! A [`Document`] is byte addressed. It owns every piece of persisted lexing state:
//! one style per byte, one opaque integer per line and one packed fold level per line.
//! Only `'\n'` terminates a line, so a `"\r\n"` pair ends at its `'\n'` and a document
//! that ends with `'\n'` has one extra empty line.

use crate::fold::FoldLevel;

/// A style id attached to one byte of the document.
pub type StyleId = u8;

/// Character encoding of a document, as seen by lexers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Every byte is one character.
    EightBit,
    /// UTF-8 (code page 65001).
    #[default]
    Utf8,
    /// A double-byte character set identified by its Windows code page.
    Dbcs(u32),
}

impl Encoding {
    /// Map a Windows code page to an encoding.
    ///
    /// 65001 is UTF-8, the Asian double-byte code pages are DBCS, everything else is 8-bit.
    pub fn from_code_page(code_page: u32) -> Self {
        match code_page {
            65001 => Self::Utf8,
            932 | 936 | 949 | 950 | 1361 => Self::Dbcs(code_page),
            _ => Self::EightBit,
        }
    }

    /// The Windows code page for this encoding (0 for plain 8-bit).
    pub fn code_page(self) -> u32 {
        match self {
            Self::EightBit => 0,
            Self::Utf8 => 65001,
            Self::Dbcs(cp) => cp,
        }
    }

    /// Whether `byte` starts a two-byte character in this encoding.
    ///
    /// Always `false` for 8-bit and UTF-8 documents.
    pub fn is_lead_byte(self, byte: u8) -> bool {
        let Self::Dbcs(code_page) = self else {
            return false;
        };
        match code_page {
            932 => matches!(byte, 0x81..=0x9F | 0xE0..=0xFC),
            936 | 949 | 950 => matches!(byte, 0x81..=0xFE),
            1361 => matches!(byte, 0x84..=0xD3 | 0xD8..=0xDE | 0xE0..=0xF9),
            _ => false,
        }
    }
}

/// Decode one UTF-8 character from the front of `bytes`.
///
/// Invalid or truncated sequences decode as the single lead byte with width 1, so a
/// scan always makes progress.
pub fn decode_utf8(bytes: &[u8]) -> (u32, usize) {
    let Some(&lead) = bytes.first() else {
        return (0, 1);
    };
    let width = match lead {
        0x00..=0x7F => return (u32::from(lead), 1),
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return (u32::from(lead), 1),
    };
    if bytes.len() < width {
        return (u32::from(lead), 1);
    }
    match std::str::from_utf8(&bytes[..width]) {
        Ok(s) => s
            .chars()
            .next()
            .map_or((u32::from(lead), 1), |c| (u32::from(c), width)),
        Err(_) => (u32::from(lead), 1),
    }
}

/// Narrow read/write facade over a text buffer and its lexing side tables.
///
/// Reads past the end never fault: bytes read as `None`, styles as 0, line states as 0
/// and levels as [`FoldLevel::BASE`]. Writes past the end are ignored.
pub trait Document {
    /// Length in bytes.
    fn len(&self) -> usize;

    /// Whether the document has no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The byte at `pos`, or `None` past the end.
    fn byte_at(&self, pos: usize) -> Option<u8>;

    /// The style of the byte at `pos`.
    fn style_at(&self, pos: usize) -> StyleId;

    /// Style every byte in `[start, end)` with `style`.
    fn set_style_range(&mut self, start: usize, end: usize, style: StyleId);

    /// Store one style per byte starting at `start`.
    fn set_styles(&mut self, start: usize, styles: &[StyleId]) {
        for (i, &style) in styles.iter().enumerate() {
            self.set_style_range(start + i, start + i + 1, style);
        }
    }

    /// Number of lines. Never zero.
    fn line_count(&self) -> usize;

    /// The line containing `pos`. Positions past the end map to the last line.
    fn line_from_position(&self, pos: usize) -> usize;

    /// First byte of `line`. Lines past the end start at [`Document::len`].
    fn line_start(&self, line: usize) -> usize;

    /// Position of the terminator of `line` (the `'\r'` of a CRLF pair), or the
    /// document end for the last line.
    fn line_end(&self, line: usize) -> usize {
        let next = self.line_start(line + 1);
        if line + 1 >= self.line_count() {
            return next;
        }
        let mut end = next - 1;
        if end > self.line_start(line) && self.byte_at(end - 1) == Some(b'\r') {
            end -= 1;
        }
        end
    }

    /// The lexer-owned state integer of `line`.
    fn line_state(&self, line: usize) -> i32;

    /// Store the lexer-owned state of `line`, returning the previous value.
    fn set_line_state(&mut self, line: usize, state: i32) -> i32;

    /// The fold level of `line`.
    fn level(&self, line: usize) -> FoldLevel;

    /// Store the fold level of `line`.
    fn set_level(&mut self, line: usize, level: FoldLevel);

    /// The encoding lexers should assume.
    fn encoding(&self) -> Encoding;

    /// Whether `byte` is a DBCS lead byte in this document's encoding.
    fn is_dbcs_lead_byte(&self, byte: u8) -> bool {
        self.encoding().is_lead_byte(byte)
    }

    /// Decode the character starting at `pos`, returning it with its width in bytes.
    ///
    /// Past the end this returns `(0, 1)`. A DBCS pair decodes as `lead << 8 | trail`.
    fn char_and_width(&self, pos: usize) -> (u32, usize) {
        let Some(lead) = self.byte_at(pos) else {
            return (0, 1);
        };
        match self.encoding() {
            Encoding::EightBit => (u32::from(lead), 1),
            Encoding::Dbcs(_) => {
                if self.is_dbcs_lead_byte(lead)
                    && let Some(trail) = self.byte_at(pos + 1)
                {
                    (u32::from(lead) << 8 | u32::from(trail), 2)
                } else {
                    (u32::from(lead), 1)
                }
            }
            Encoding::Utf8 => {
                if lead < 0x80 {
                    return (u32::from(lead), 1);
                }
                let mut buf = [0u8; 4];
                let mut n = 0;
                while n < 4 {
                    let Some(b) = self.byte_at(pos + n) else {
                        break;
                    };
                    buf[n] = b;
                    n += 1;
                }
                decode_utf8(&buf[..n])
            }
        }
    }
}

/// Byte offsets at which each line starts, always beginning with 0.
pub(crate) fn scan_line_starts(text: &[u8]) -> Vec<usize> {
    let mut starts = Vec::with_capacity(text.len() / 32 + 1);
    starts.push(0);
    starts.extend(
        text.iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .map(|(i, _)| i + 1),
    );
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_page_mapping() {
        assert_eq!(Encoding::from_code_page(65001), Encoding::Utf8);
        assert_eq!(Encoding::from_code_page(932), Encoding::Dbcs(932));
        assert_eq!(Encoding::from_code_page(1252), Encoding::EightBit);
        assert_eq!(Encoding::Dbcs(949).code_page(), 949);
    }

    #[test]
    fn test_shift_jis_lead_bytes() {
        let sjis = Encoding::Dbcs(932);
        assert!(sjis.is_lead_byte(0x81));
        assert!(sjis.is_lead_byte(0xE0));
        assert!(!sjis.is_lead_byte(0xA0));
        assert!(!sjis.is_lead_byte(b'{'));
        assert!(!Encoding::Utf8.is_lead_byte(0x81));
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_utf8(b"a"), (u32::from('a'), 1));
        assert_eq!(decode_utf8("é".as_bytes()), (0xE9, 2));
        assert_eq!(decode_utf8("€x".as_bytes()), (0x20AC, 3));
        // Truncated sequence falls back to the lead byte.
        assert_eq!(decode_utf8(&[0xE2, 0x82]), (0xE2, 1));
        assert_eq!(decode_utf8(&[0xFF]), (0xFF, 1));
    }

    #[test]
    fn test_scan_line_starts() {
        assert_eq!(scan_line_starts(b""), vec![0]);
        assert_eq!(scan_line_starts(b"a\nb\r\nc"), vec![0, 2, 5]);
        assert_eq!(scan_line_starts(b"a\n"), vec![0, 2]);
    }
}
