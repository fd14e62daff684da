//! Replacement where each match's bytes come from a caller-supplied generator.

use crate::errors::Result;
use crate::locator::Case;
use crate::single::{copy, output_len, reserve_exact};

/// Replaces every occurrence of `needle`, letting `generate` write the
/// replacement straight into the output buffer.
///
/// The generator receives the output buffer and the matched bytes. Any state
/// it needs, such as a running counter, lives in the closure's captures. If it
/// returns an error the partial output is dropped and the error is returned
/// as is.
///
/// ```
/// use subst::callback::replace_with;
///
/// let out = replace_with(b"hello world hello", b"hello", |out, matched| {
///     out.extend(matched.iter().map(u8::to_ascii_uppercase));
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(out, b"HELLO world HELLO");
/// ```
pub fn replace_with<F>(text: &[u8], needle: &[u8], generate: F) -> Result<Vec<u8>>
where
    F: FnMut(&mut Vec<u8>, &[u8]) -> Result<()>,
{
    replace_with_case(text, needle, Case::Sensitive, usize::MAX, generate)
}

/// [`replace_with`] with explicit match comparison and an upper bound on
/// the number of generator calls.
pub fn replace_with_case<F>(
    text: &[u8],
    needle: &[u8],
    case: Case,
    limit: usize,
    mut generate: F,
) -> Result<Vec<u8>>
where
    F: FnMut(&mut Vec<u8>, &[u8]) -> Result<()>,
{
    let occurrences = case.count(text, needle).min(limit);
    if occurrences == 0 {
        return copy(text);
    }

    // Unmatched bytes are known exactly; generated bytes grow the buffer.
    let mut out = reserve_exact(output_len(text.len(), occurrences, needle.len(), 0))?;

    let mut pos = 0;
    for _ in 0..occurrences {
        let Some(at) = case.find(text, needle, pos) else {
            break;
        };
        out.extend_from_slice(&text[pos..at]);
        let end = at + needle.len();
        generate(&mut out, &text[at..end])?;
        pos = end;
    }
    out.try_reserve(text.len() - pos)?;
    out.extend_from_slice(&text[pos..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::single::replace_all;

    fn upper(out: &mut Vec<u8>, matched: &[u8]) -> Result<()> {
        out.extend(matched.iter().map(u8::to_ascii_uppercase));
        Ok(())
    }

    #[test]
    fn test_uppercase_matches() {
        let out = replace_with(b"hello world hello", b"hello", upper).unwrap();
        assert_eq!(out, b"HELLO world HELLO");
    }

    #[test]
    fn test_counter_context() {
        let mut n = 0;
        let out = replace_with(b"x-x-x", b"x", |out, _| {
            n += 1;
            out.extend_from_slice(n.to_string().as_bytes());
            Ok(())
        })
        .unwrap();
        assert_eq!(out, b"1-2-3");
        assert_eq!(n, 3);
    }

    #[test]
    fn test_generator_with_scratch_buffer() {
        let out = replace_with(b"<a><b>", b"<", |out, _| {
            let scratch = replace_all(b"[{}]", b"{}", b"lt")?;
            out.extend_from_slice(&scratch);
            Ok(())
        })
        .unwrap();
        assert_eq!(out, b"[lt]a>[lt]b>");
    }

    #[test]
    fn test_generator_error_propagates() {
        let mut calls = 0;
        let result = replace_with(b"a a a", b"a", |out, _| {
            calls += 1;
            if calls == 2 {
                return Err(Error::generator("second match rejected"));
            }
            out.push(b'b');
            Ok(())
        });
        match result {
            Err(Error::Generator(e)) => assert_eq!(e.to_string(), "second match rejected"),
            other => panic!("expected generator error, got {other:?}"),
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_generator_error_variant_is_untouched() {
        let result = replace_with(b"abc", b"b", |_, _| Err(Error::Config("bad".into())));
        assert!(matches!(result, Err(Error::Config(ref s)) if s == "bad"));
    }

    #[test]
    fn test_no_match_and_empty_needle_skip_generator() {
        let mut called = false;
        let out = replace_with(b"abc", b"", |_, _| {
            called = true;
            Ok(())
        })
        .unwrap();
        assert_eq!(out, b"abc");

        let out = replace_with(b"abc", b"z", |_, _| {
            called = true;
            Ok(())
        })
        .unwrap();
        assert_eq!(out, b"abc");
        assert!(!called);
    }

    #[test]
    fn test_matched_bytes_are_the_original_text() {
        let mut seen = Vec::new();
        replace_with_case(b"Foo foo FOO", b"foo", Case::Insensitive, usize::MAX, |out, m| {
            seen.push(m.to_vec());
            out.extend_from_slice(m);
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![b"Foo".to_vec(), b"foo".to_vec(), b"FOO".to_vec()]);
    }

    #[test]
    fn test_limit_stops_after_first() {
        let out = replace_with_case(b"aaa", b"a", Case::Sensitive, 1, upper).unwrap();
        assert_eq!(out, b"Aaa");
    }
}
