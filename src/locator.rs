//! Literal needle search over byte slices.
//!
//! The search is a plain window-by-window comparison with no needle
//! preprocessing. Needles are expected to be short, so building a skip table
//! would cost more than it saves.

/// How bytes are compared while searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Case {
    /// Byte-exact comparison.
    #[default]
    Sensitive,
    /// `A`-`Z` compare equal to `a`-`z`. Non-ASCII bytes are compared literally.
    Insensitive,
}

impl Case {
    /// Returns the offset of the first occurrence of `needle` at or after `from`.
    pub fn find(self, text: &[u8], needle: &[u8], from: usize) -> Option<usize> {
        match self {
            Case::Sensitive => find(text, needle, from),
            Case::Insensitive => find_ignore_case(text, needle, from),
        }
    }

    /// Counts non-overlapping occurrences of `needle` in `text`.
    pub fn count(self, text: &[u8], needle: &[u8]) -> usize {
        count_with(text, needle, |from| self.find(text, needle, from))
    }
}

/// Returns the smallest offset `>= from` where `needle` occurs in `text`.
///
/// An empty needle never matches, and neither does a `from` past the end.
pub fn find(text: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    scan(text, needle, from, |window| window == needle)
}

/// Like [`find`], but folds ASCII letters before comparing.
pub fn find_ignore_case(text: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    scan(text, needle, from, |window| window.eq_ignore_ascii_case(needle))
}

/// Counts non-overlapping occurrences of `needle`, scanning left to right.
///
/// `count(b"aaaa", b"aa")` is 2: each match resumes the scan after its last byte.
pub fn count(text: &[u8], needle: &[u8]) -> usize {
    count_with(text, needle, |from| find(text, needle, from))
}

/// ASCII case-insensitive twin of [`count`].
pub fn count_ignore_case(text: &[u8], needle: &[u8]) -> usize {
    count_with(text, needle, |from| find_ignore_case(text, needle, from))
}

fn scan<F>(text: &[u8], needle: &[u8], from: usize, matches: F) -> Option<usize>
where
    F: Fn(&[u8]) -> bool,
{
    if needle.is_empty() || from > text.len() || text.len() - from < needle.len() {
        return None;
    }
    text[from..]
        .windows(needle.len())
        .position(matches)
        .map(|offset| from + offset)
}

fn count_with<F>(text: &[u8], needle: &[u8], mut next: F) -> usize
where
    F: FnMut(usize) -> Option<usize>,
{
    if needle.is_empty() {
        return 0;
    }
    let mut total = 0;
    let mut pos = 0;
    while pos < text.len() {
        match next(pos) {
            Some(at) => {
                total += 1;
                pos = at + needle.len();
            }
            None => break,
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_basic() {
        assert_eq!(find(b"hello world", b"world", 0), Some(6));
        assert_eq!(find(b"hello world", b"o", 5), Some(7));
        assert_eq!(find(b"hello world", b"xyz", 0), None);
        assert_eq!(find(b"abc", b"abc", 0), Some(0));
        assert_eq!(find(b"ab", b"abc", 0), None);
    }

    #[test]
    fn test_find_from_bounds() {
        assert_eq!(find(b"abcabc", b"abc", 1), Some(3));
        assert_eq!(find(b"abcabc", b"abc", 4), None);
        assert_eq!(find(b"abc", b"c", 3), None);
        assert_eq!(find(b"abc", b"c", 10), None);
    }

    #[test]
    fn test_empty_needle_never_matches() {
        assert_eq!(find(b"anything", b"", 0), None);
        assert_eq!(find(b"", b"", 0), None);
        assert_eq!(find_ignore_case(b"anything", b"", 0), None);
        assert_eq!(count(b"anything", b""), 0);
    }

    #[test]
    fn test_find_ignore_case_folds_ascii_only() {
        assert_eq!(find_ignore_case(b"Hello WORLD", b"world", 0), Some(6));
        assert_eq!(find_ignore_case(b"HeLLo", b"hello", 0), Some(0));
        // 0xC3 0x89 is "É", 0xC3 0xA9 is "é": no folding outside ASCII.
        assert_eq!(find_ignore_case("caf\u{c9}".as_bytes(), "caf\u{e9}".as_bytes(), 0), None);
        assert_eq!(find_ignore_case("CAF\u{e9}".as_bytes(), "caf\u{e9}".as_bytes(), 0), Some(0));
    }

    #[test]
    fn test_count_is_non_overlapping() {
        assert_eq!(count(b"aaaa", b"aa"), 2);
        assert_eq!(count(b"aaaaa", b"aa"), 2);
        assert_eq!(count(b"hello hello world", b"hello"), 2);
        assert_eq!(count_ignore_case(b"Hello HELLO world", b"hello"), 2);
    }

    #[test]
    fn test_case_dispatch() {
        assert_eq!(Case::Sensitive.find(b"ABC", b"b", 0), None);
        assert_eq!(Case::Insensitive.find(b"ABC", b"b", 0), Some(1));
        assert_eq!(Case::Insensitive.count(b"xXx", b"x"), 3);
        assert_eq!(Case::default(), Case::Sensitive);
    }

    #[test]
    fn test_multibyte_needle() {
        let text = "a \u{201c}quote\u{201d}".as_bytes();
        assert_eq!(find(text, "\u{201d}".as_bytes(), 0), Some(10));
    }
}
