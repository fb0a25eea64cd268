//! Keyword lists.

/// A sorted set of words configured from a whitespace-separated string.
///
/// Entries beginning with `^` match any word that starts with the rest of the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
    prefixes: Vec<String>,
    only_line_ends: bool,
}

impl WordList {
    /// Create an empty list split on any whitespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty list whose entries are separated by line ends only, so entries
    /// may contain spaces.
    pub fn only_line_ends() -> Self {
        Self {
            only_line_ends: true,
            ..Self::default()
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.words.len() + self.prefixes.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.words.clear();
        self.prefixes.clear();
    }

    /// Replace the entries from `text`. Returns whether the set of entries changed.
    pub fn set(&mut self, text: &str) -> bool {
        self.set_words(text, false)
    }

    /// Like [`WordList::set`] but lower-cases every entry first.
    pub fn set_lowered(&mut self, text: &str) -> bool {
        self.set_words(text, true)
    }

    fn set_words(&mut self, text: &str, lowered: bool) -> bool {
        let only_line_ends = self.only_line_ends;
        let mut words = Vec::new();
        let mut prefixes = Vec::new();
        let entries = text.split(|c: char| {
            c == '\r' || c == '\n' || (!only_line_ends && (c == ' ' || c == '\t'))
        });
        for entry in entries.filter(|e| !e.is_empty()) {
            let entry = if lowered {
                entry.to_ascii_lowercase()
            } else {
                entry.to_string()
            };
            match entry.strip_prefix('^') {
                Some(prefix) if !prefix.is_empty() => prefixes.push(prefix.to_string()),
                _ => words.push(entry),
            }
        }
        words.sort();
        words.dedup();
        prefixes.sort();
        prefixes.dedup();
        if words == self.words && prefixes == self.prefixes {
            return false;
        }
        self.words = words;
        self.prefixes = prefixes;
        true
    }

    /// Whether `word` is in the list, exactly or through a `^` prefix entry.
    pub fn in_list(&self, word: &str) -> bool {
        self.words.binary_search_by(|w| w.as_str().cmp(word)).is_ok()
            || self.prefixes.iter().any(|p| word.starts_with(p.as_str()))
    }

    /// Match entries that use `marker` to separate a required stem from an optional tail.
    ///
    /// With the entry `func~tion`, the words `func`, `funct` and `function` match. An entry
    /// ending in the marker matches any word starting with the stem.
    pub fn in_list_abbreviated(&self, word: &str, marker: char) -> bool {
        if self.in_list(word) {
            return true;
        }
        self.words.iter().any(|entry| {
            let Some((stem, tail)) = entry.split_once(marker) else {
                return false;
            };
            let Some(rest) = word.strip_prefix(stem) else {
                return false;
            };
            tail.is_empty() || tail.starts_with(rest)
        })
    }

    /// Iterate over the exact-match entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_changes() {
        let mut list = WordList::new();
        assert!(!list.set(""));
        assert!(list.set("end begin\tif\r\nwhile"));
        assert!(!list.set("while if begin end"));
        assert_eq!(list.len(), 4);
        assert!(list.set("begin"));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["begin"]);
    }

    #[test]
    fn test_in_list() {
        let mut list = WordList::new();
        list.set("color margin ^-moz- ^");
        assert!(list.in_list("color"));
        assert!(!list.in_list("colour"));
        assert!(list.in_list("-moz-box-sizing"));
        assert!(list.in_list("^"));
    }

    #[test]
    fn test_lowered_and_line_ends() {
        let mut list = WordList::only_line_ends();
        list.set_lowered("Foo Bar\nBAZ");
        assert!(list.in_list("foo bar"));
        assert!(list.in_list("baz"));
        assert!(!list.in_list("foo"));
    }

    #[test]
    fn test_abbreviated() {
        let mut list = WordList::new();
        list.set("func~tion proc~");
        assert!(list.in_list_abbreviated("func", '~'));
        assert!(list.in_list_abbreviated("funct", '~'));
        assert!(list.in_list_abbreviated("function", '~'));
        assert!(!list.in_list_abbreviated("fun", '~'));
        assert!(!list.in_list_abbreviated("functions", '~'));
        assert!(list.in_list_abbreviated("procedure", '~'));
    }
}
