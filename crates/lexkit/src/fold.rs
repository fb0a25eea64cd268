//! Fold levels.
//!
//! Each line carries a [`FoldLevel`]: its own depth, the depth the next line starts at,
//! and two flags. The persisted form is a single `u32`:
//!
//! ```text
//!  31            16 15 14   13     12    11           0
//! ┌────────────────┬─────┬──────┬───────┬──────────────┐
//! │   next level   │  0  │header│ white │    level     │
//! └────────────────┴─────┴──────┴───────┴──────────────┘
//! ```
//!
//! Folders resume at a line by reading the previous line's `next`, so no second per-line
//! store is needed.

use std::ops::RangeInclusive;

use crate::document::Document;

/// Level of a line that is not inside any fold.
pub const FOLD_LEVEL_BASE: u16 = 0;
/// Mask selecting the level number from a packed level.
pub const FOLD_LEVEL_NUMBER_MASK: u32 = 0x0FFF;
/// Flag for a line that holds only whitespace.
pub const FOLD_LEVEL_WHITE_FLAG: u32 = 0x1000;
/// Flag for a line that opens a fold.
pub const FOLD_LEVEL_HEADER_FLAG: u32 = 0x2000;

const MAX_LEVEL: i32 = FOLD_LEVEL_NUMBER_MASK as i32;

/// The fold level of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FoldLevel {
    /// Depth of this line.
    pub level: u16,
    /// Depth the following line starts at.
    pub next: u16,
    /// The line is blank.
    pub white: bool,
    /// The line opens a fold (its block follows it).
    pub header: bool,
}

impl FoldLevel {
    /// A line at the base level with no flags.
    pub const BASE: FoldLevel = FoldLevel {
        level: FOLD_LEVEL_BASE,
        next: FOLD_LEVEL_BASE,
        white: false,
        header: false,
    };

    /// Build a level from running counters, clamping both into the representable range.
    pub fn new(level: i32, next: i32) -> Self {
        Self {
            level: clamp_level(level),
            next: clamp_level(next),
            white: false,
            header: false,
        }
    }

    /// Set the white-line flag.
    pub fn with_white(mut self, white: bool) -> Self {
        self.white = white;
        self
    }

    /// Set the header flag.
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Pack into the persisted `u32` form.
    pub fn pack(self) -> u32 {
        let mut packed = u32::from(self.level) & FOLD_LEVEL_NUMBER_MASK;
        if self.white {
            packed |= FOLD_LEVEL_WHITE_FLAG;
        }
        if self.header {
            packed |= FOLD_LEVEL_HEADER_FLAG;
        }
        packed | (u32::from(self.next) & FOLD_LEVEL_NUMBER_MASK) << 16
    }

    /// Unpack from the persisted `u32` form.
    pub fn unpack(packed: u32) -> Self {
        Self {
            level: (packed & FOLD_LEVEL_NUMBER_MASK) as u16,
            next: ((packed >> 16) & FOLD_LEVEL_NUMBER_MASK) as u16,
            white: packed & FOLD_LEVEL_WHITE_FLAG != 0,
            header: packed & FOLD_LEVEL_HEADER_FLAG != 0,
        }
    }

    /// The four flag bits as a nibble (white = 1, header = 2).
    pub fn flags(self) -> u32 {
        (self.pack() >> 12) & 0xF
    }
}

/// Clamp a running fold counter into `FOLD_LEVEL_BASE..=0xFFF`.
pub fn clamp_level(level: i32) -> u16 {
    level.clamp(i32::from(FOLD_LEVEL_BASE), MAX_LEVEL) as u16
}

/// The level a fold pass starting at `line` resumes from: the previous line's `next`.
pub fn start_level(doc: &dyn Document, line: usize) -> i32 {
    if line == 0 {
        i32::from(FOLD_LEVEL_BASE)
    } else {
        i32::from(doc.level(line - 1).next)
    }
}

/// Lines a fold pass over `[start, start + len)` must assign.
///
/// A range ending at the document end includes the last line, which is the empty line
/// after a final `'\n'`. Any other range stops at the line holding its last byte.
pub fn fold_lines(doc: &dyn Document, start: usize, len: usize) -> RangeInclusive<usize> {
    let first = doc.line_from_position(start);
    let end = start + len;
    let last = if end >= doc.len() {
        doc.line_count() - 1
    } else {
        doc.line_from_position(end.saturating_sub(1))
    };
    first..=last.max(first)
}

/// A collapsible span derived from the level array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldRegion {
    /// The header line.
    pub start_line: usize,
    /// The last line hidden when the region is collapsed.
    pub end_line: usize,
}

/// Derive every collapsible span: a header line folds each following line that is
/// strictly deeper than the header itself.
pub fn fold_regions(doc: &dyn Document) -> Vec<FoldRegion> {
    let lines = doc.line_count();
    let levels: Vec<FoldLevel> = (0..lines).map(|line| doc.level(line)).collect();
    let mut regions = Vec::new();
    for (line, level) in levels.iter().enumerate() {
        if !level.header {
            continue;
        }
        let mut end = line;
        while end + 1 < lines && levels[end + 1].level > level.level {
            end += 1;
        }
        if end > line {
            regions.push(FoldRegion {
                start_line: line,
                end_line: end,
            });
        }
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextDocument;

    #[test]
    fn test_pack_layout() {
        let level = FoldLevel::new(1, 2).with_header(true);
        assert_eq!(level.pack(), 0x0002_2001);
        assert_eq!(FoldLevel::new(0, 0).with_white(true).pack(), 0x1000);
        assert_eq!(FoldLevel::unpack(0x0002_2001), level);
        assert_eq!(level.flags(), 2);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_level(-3), FOLD_LEVEL_BASE);
        assert_eq!(clamp_level(0x2000), 0xFFF);
        assert_eq!(FoldLevel::new(-1, 5000).pack() & FOLD_LEVEL_NUMBER_MASK, 0);
    }

    #[test]
    fn test_fold_regions() {
        let mut doc = TextDocument::from_text("a\nb\nc\nd\ne");
        doc.set_level(0, FoldLevel::new(0, 1).with_header(true));
        doc.set_level(1, FoldLevel::new(1, 2).with_header(true));
        doc.set_level(2, FoldLevel::new(2, 1));
        doc.set_level(3, FoldLevel::new(1, 0));
        doc.set_level(4, FoldLevel::new(0, 0));
        assert_eq!(
            fold_regions(&doc),
            vec![
                FoldRegion {
                    start_line: 0,
                    end_line: 3
                },
                FoldRegion {
                    start_line: 1,
                    end_line: 2
                },
            ]
        );
        assert_eq!(start_level(&doc, 0), 0);
        assert_eq!(start_level(&doc, 3), 1);
    }

    #[test]
    fn test_fold_lines() {
        let doc = TextDocument::from_text("ab\ncd\n");
        assert_eq!(fold_lines(&doc, 0, 3), 0..=0);
        assert_eq!(fold_lines(&doc, 3, 3), 1..=2);
        assert_eq!(fold_lines(&doc, 0, 6), 0..=2);
        assert_eq!(fold_lines(&doc, 6, 0), 2..=2);
        let empty = TextDocument::new();
        assert_eq!(fold_lines(&empty, 0, 0), 0..=0);
    }
}
