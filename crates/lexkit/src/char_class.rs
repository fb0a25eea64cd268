//! Character classification for lexers.
//!
//! Lexers see decoded characters as `u32`. Everything at or above 0x80 is one class that
//! lexers treat as word characters or ignore, so ASCII predicates never fire on them.

/// A set of ASCII characters plus a single flag standing for every non-ASCII character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacterSet {
    bits: u128,
    high: bool,
}

impl CharacterSet {
    /// The empty set.
    pub const NONE: CharacterSet = CharacterSet {
        bits: 0,
        high: false,
    };
    /// ASCII letters.
    pub const ALPHA: CharacterSet = CharacterSet::NONE
        .add_range(b'a', b'z')
        .add_range(b'A', b'Z');
    /// ASCII digits.
    pub const DIGITS: CharacterSet = CharacterSet::NONE.add_range(b'0', b'9');
    /// ASCII letters and digits.
    pub const ALPHA_NUM: CharacterSet = CharacterSet::ALPHA.add_range(b'0', b'9');

    /// Add every character of `chars` (ASCII only).
    pub const fn add(mut self, chars: &str) -> Self {
        let bytes = chars.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] < 0x80 {
                self.bits |= 1u128 << bytes[i];
            }
            i += 1;
        }
        self
    }

    /// Add the inclusive ASCII range `first..=last`.
    pub const fn add_range(mut self, first: u8, last: u8) -> Self {
        let mut b = first;
        while b <= last && b < 0x80 {
            self.bits |= 1u128 << b;
            b += 1;
        }
        self
    }

    /// Include (or exclude) every non-ASCII character.
    pub const fn with_high(mut self, high: bool) -> Self {
        self.high = high;
        self
    }

    /// Membership test.
    pub const fn contains(&self, ch: u32) -> bool {
        if ch >= 0x80 {
            self.high
        } else {
            (self.bits >> ch) & 1 == 1
        }
    }
}

/// Space, tab, and the other ASCII control whitespace (0x09..=0x0D).
pub fn is_space(ch: u32) -> bool {
    ch == u32::from(b' ') || (0x09..=0x0D).contains(&ch)
}

/// Space or tab.
pub fn is_space_or_tab(ch: u32) -> bool {
    ch == u32::from(b' ') || ch == u32::from(b'\t')
}

/// `'\r'` or `'\n'`.
pub fn is_eol(ch: u32) -> bool {
    ch == u32::from(b'\r') || ch == u32::from(b'\n')
}

/// ASCII digit.
pub fn is_digit(ch: u32) -> bool {
    (u32::from(b'0')..=u32::from(b'9')).contains(&ch)
}

/// ASCII hexadecimal digit.
pub fn is_hex_digit(ch: u32) -> bool {
    is_digit(ch)
        || (u32::from(b'a')..=u32::from(b'f')).contains(&ch)
        || (u32::from(b'A')..=u32::from(b'F')).contains(&ch)
}

/// ASCII letter.
pub fn is_alpha(ch: u32) -> bool {
    is_lower(ch) || is_upper(ch)
}

/// ASCII lower-case letter.
pub fn is_lower(ch: u32) -> bool {
    (u32::from(b'a')..=u32::from(b'z')).contains(&ch)
}

/// ASCII upper-case letter.
pub fn is_upper(ch: u32) -> bool {
    (u32::from(b'A')..=u32::from(b'Z')).contains(&ch)
}

/// ASCII letter or digit.
pub fn is_alnum(ch: u32) -> bool {
    is_alpha(ch) || is_digit(ch)
}

/// Letter, digit, underscore, or any non-ASCII character.
pub fn is_word_char(ch: u32) -> bool {
    ch >= 0x80 || is_alnum(ch) || ch == u32::from(b'_')
}

/// Start of an identifier: letter, underscore, or any non-ASCII character.
pub fn is_word_start(ch: u32) -> bool {
    ch >= 0x80 || is_alpha(ch) || ch == u32::from(b'_')
}

/// Punctuation that C-family lexers treat as an operator.
pub fn is_operator(ch: u32) -> bool {
    const OPERATORS: CharacterSet = CharacterSet::NONE.add("%^&*()-+=|{}[]:;<>,/?!.~");
    OPERATORS.contains(ch)
}

/// ASCII lower-casing of a decoded character.
pub fn to_lower(ch: u32) -> u32 {
    if is_upper(ch) { ch + 32 } else { ch }
}

/// `ch` as an ASCII `char`, or `'\0'` when it is not ASCII.
pub fn ascii(ch: u32) -> char {
    if ch < 0x80 {
        char::from(ch as u8)
    } else {
        '\0'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_set() {
        let word = CharacterSet::ALPHA_NUM.add("_").with_high(true);
        assert!(word.contains(u32::from(b'x')));
        assert!(word.contains(u32::from(b'7')));
        assert!(word.contains(u32::from(b'_')));
        assert!(word.contains(0x4E2D));
        assert!(!word.contains(u32::from(b'-')));
        assert!(!CharacterSet::DIGITS.contains(0xE9));
    }

    #[test]
    fn test_predicates() {
        assert!(is_space(u32::from(b'\r')));
        assert!(!is_space(0xA0));
        assert!(is_operator(u32::from(b'{')));
        assert!(!is_operator(u32::from(b'"')));
        assert!(!is_operator(0x817B));
        assert_eq!(to_lower(u32::from(b'Q')), u32::from(b'q'));
        assert_eq!(ascii(0x263A), '\0');
        assert!(is_hex_digit(u32::from(b'F')));
    }
}
