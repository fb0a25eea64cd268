//! Line ending helpers.
//!
//! Lexers see `"\r\n"` and `'\n'` documents alike; these helpers convert between the two
//! so results can be compared across conventions.

/// A newline convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// [`LineEnding::Crlf`] as soon as one `"\r\n"` pair appears in `bytes`.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.windows(2).any(|w| w == b"\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    /// The terminator bytes.
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Lf => b"\n",
            Self::Crlf => b"\r\n",
        }
    }

    /// Rewrite every LF or CRLF terminator in `bytes` to this convention.
    ///
    /// Lone `'\r'` bytes are left alone.
    pub fn apply(self, bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(bytes.len() + bytes.len() / 16);
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    out.extend_from_slice(self.as_bytes());
                    i += 2;
                }
                b'\n' => {
                    out.extend_from_slice(self.as_bytes());
                    i += 1;
                }
                b => {
                    out.push(b);
                    i += 1;
                }
            }
        }
        out
    }

    /// String form of [`LineEnding::apply`].
    pub fn apply_to_text(self, text: &str) -> String {
        match self {
            Self::Lf => text.replace("\r\n", "\n"),
            Self::Crlf => text.replace("\r\n", "\n").replace('\n', "\r\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(LineEnding::detect(b"a\nb"), LineEnding::Lf);
        assert_eq!(LineEnding::detect(b"a\r\nb\n"), LineEnding::Crlf);
        assert_eq!(LineEnding::detect(b"a\rb"), LineEnding::Lf);
    }

    #[test]
    fn test_apply_round_trip() {
        let mixed = b"a\r\nb\nc\rd";
        assert_eq!(LineEnding::Lf.apply(mixed), b"a\nb\nc\rd".to_vec());
        assert_eq!(LineEnding::Crlf.apply(mixed), b"a\r\nb\r\nc\rd".to_vec());
        assert_eq!(LineEnding::Crlf.apply_to_text("x\ny\r\n"), "x\r\ny\r\n");
    }
}
