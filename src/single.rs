//! Single-needle replacement with an exactly sized output buffer.
//!
//! Every function here counts matches first, reserves the final length in one
//! allocation, then copies. The input is never modified.

use crate::errors::Result;
use crate::locator::Case;

/// Replaces every non-overlapping occurrence of `needle` with `replacement`.
///
/// An empty needle never matches, so the result is a copy of `text`.
///
/// ```
/// let out = subst::single::replace_all(b"hello hello world", b"hello", b"hi").unwrap();
/// assert_eq!(out, b"hi hi world");
/// ```
pub fn replace_all(text: &[u8], needle: &[u8], replacement: &[u8]) -> Result<Vec<u8>> {
    replace_n(text, needle, replacement, Case::Sensitive, usize::MAX)
}

/// Replaces only the first occurrence of `needle`.
pub fn replace_first(text: &[u8], needle: &[u8], replacement: &[u8]) -> Result<Vec<u8>> {
    replace_n(text, needle, replacement, Case::Sensitive, 1)
}

/// [`replace_all`] with ASCII case folding while matching.
pub fn replace_all_ignore_case(text: &[u8], needle: &[u8], replacement: &[u8]) -> Result<Vec<u8>> {
    replace_n(text, needle, replacement, Case::Insensitive, usize::MAX)
}

/// [`replace_first`] with ASCII case folding while matching.
pub fn replace_first_ignore_case(
    text: &[u8],
    needle: &[u8],
    replacement: &[u8],
) -> Result<Vec<u8>> {
    replace_n(text, needle, replacement, Case::Insensitive, 1)
}

/// Replaces at most `limit` occurrences, matching according to `case`.
pub fn replace_n(
    text: &[u8],
    needle: &[u8],
    replacement: &[u8],
    case: Case,
    limit: usize,
) -> Result<Vec<u8>> {
    replace_n_counted(text, needle, replacement, case, limit).map(|(out, _)| out)
}

/// [`replace_n`], also returning the number of substitutions made.
pub fn replace_n_counted(
    text: &[u8],
    needle: &[u8],
    replacement: &[u8],
    case: Case,
    limit: usize,
) -> Result<(Vec<u8>, usize)> {
    let occurrences = case.count(text, needle).min(limit);
    if occurrences == 0 {
        return Ok((copy(text)?, 0));
    }

    let len = output_len(text.len(), occurrences, needle.len(), replacement.len());
    let mut out = reserve_exact(len)?;

    let mut pos = 0;
    for _ in 0..occurrences {
        // Counting already proved this occurrence exists.
        let Some(at) = case.find(text, needle, pos) else {
            break;
        };
        out.extend_from_slice(&text[pos..at]);
        out.extend_from_slice(replacement);
        pos = at + needle.len();
    }
    out.extend_from_slice(&text[pos..]);

    debug_assert_eq!(Some(out.len()), len);
    Ok((out, occurrences))
}

/// Length of `text` after swapping `occurrences` needles for replacements,
/// or `None` when it does not fit in a `usize`.
pub(crate) fn output_len(
    text_len: usize,
    occurrences: usize,
    needle_len: usize,
    replacement_len: usize,
) -> Option<usize> {
    let kept = text_len.checked_sub(occurrences.checked_mul(needle_len)?)?;
    kept.checked_add(occurrences.checked_mul(replacement_len)?)
}

/// Reserves exactly `len` bytes. An unrepresentable length is reported as a
/// capacity overflow.
pub(crate) fn reserve_exact(len: Option<usize>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    // No `Vec<u8>` can hold `usize::MAX` bytes, so this fails with a real
    // `TryReserveError`.
    out.try_reserve_exact(len.unwrap_or(usize::MAX))?;
    Ok(out)
}

/// Copies `text` into a freshly reserved buffer.
pub(crate) fn copy(text: &[u8]) -> Result<Vec<u8>> {
    let mut out = reserve_exact(Some(text.len()))?;
    out.extend_from_slice(text);
    Ok(out)
}
