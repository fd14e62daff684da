//! Replacement with an ordered list of rules.
//!
//! Two strategies are provided and they are not interchangeable:
//!
//! - [`replace_many`] runs one full [`replace_all`] pass per rule. Output of
//!   an earlier rule is input to the next, so substitutions cascade.
//! - [`replace_many_optimized`] scans the original text once and picks the
//!   earliest match among all rules at each step. Replacement bytes are never
//!   scanned again.
//!
//! They agree whenever no rule's replacement contains any rule's needle.

use crate::errors::Result;
use crate::locator::{count, find};
use crate::single::{copy, replace_all};
use serde::Deserialize;

/// A needle and the bytes that replace it.
///
/// Order within a rule list matters: see [`replace_many_optimized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule<'a> {
    pub needle: &'a [u8],
    pub replacement: &'a [u8],
}

impl<'a> Rule<'a> {
    pub fn new<N, R>(needle: &'a N, replacement: &'a R) -> Self
    where
        N: AsRef<[u8]> + ?Sized,
        R: AsRef<[u8]> + ?Sized,
    {
        Self {
            needle: needle.as_ref(),
            replacement: replacement.as_ref(),
        }
    }
}

/// Which multi-rule algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One pass per rule; later rules see earlier replacements.
    Sequential,
    /// One pass over the original text; replacements are never rescanned.
    #[default]
    SinglePass,
}

/// Applies `rules` to `text` with the chosen strategy.
pub fn apply(text: &[u8], rules: &[Rule<'_>], strategy: Strategy) -> Result<Vec<u8>> {
    apply_counted(text, rules, strategy).map(|(out, _)| out)
}

/// [`apply`], also returning how many substitutions were made.
pub fn apply_counted(
    text: &[u8],
    rules: &[Rule<'_>],
    strategy: Strategy,
) -> Result<(Vec<u8>, usize)> {
    match strategy {
        Strategy::Sequential => replace_many_counted(text, rules),
        Strategy::SinglePass => replace_many_optimized_counted(text, rules),
    }
}

/// Applies each rule's [`replace_all`] in list order, threading the output.
///
/// ```
/// use subst::multi::{Rule, replace_many};
///
/// let rules = [Rule::new("a", "b"), Rule::new("b", "c")];
/// assert_eq!(replace_many(b"ab", &rules).unwrap(), b"cc");
/// ```
pub fn replace_many(text: &[u8], rules: &[Rule<'_>]) -> Result<Vec<u8>> {
    replace_many_counted(text, rules).map(|(out, _)| out)
}

/// [`replace_many`], also returning the substitutions summed over all passes.
pub fn replace_many_counted(text: &[u8], rules: &[Rule<'_>]) -> Result<(Vec<u8>, usize)> {
    tracing::trace!(rules = rules.len(), len = text.len(), "sequential replace");
    let mut current = copy(text)?;
    let mut substitutions = 0;
    for rule in rules {
        let n = count(&current, rule.needle);
        if n == 0 {
            continue;
        }
        substitutions += n;
        current = replace_all(&current, rule.needle, rule.replacement)?;
    }
    Ok((current, substitutions))
}

/// Scans `text` once, substituting the earliest match among all rules.
///
/// When two rules match at the same offset, the one listed first wins and
/// the scan resumes after its match. A shorter needle listed before a longer
/// one with the same prefix therefore shadows the longer one:
///
/// ```
/// use subst::multi::{Rule, replace_many_optimized};
///
/// let short_first = [Rule::new("test", "SHORT"), Rule::new("testing", "LONG")];
/// assert_eq!(replace_many_optimized(b"testing", &short_first).unwrap(), b"SHORTing");
///
/// let long_first = [Rule::new("testing", "LONG"), Rule::new("test", "SHORT")];
/// assert_eq!(replace_many_optimized(b"testing", &long_first).unwrap(), b"LONG");
/// ```
///
/// Rules with an empty needle are ignored.
pub fn replace_many_optimized(text: &[u8], rules: &[Rule<'_>]) -> Result<Vec<u8>> {
    replace_many_optimized_counted(text, rules).map(|(out, _)| out)
}

/// [`replace_many_optimized`], also returning the number of substitutions.
pub fn replace_many_optimized_counted(text: &[u8], rules: &[Rule<'_>]) -> Result<(Vec<u8>, usize)> {
    tracing::trace!(rules = rules.len(), len = text.len(), "single-pass replace");
    let mut out = Vec::new();
    let mut substitutions = 0;
    let mut pos = 0;

    // Next known match of each rule at or after some earlier `pos`. A rule
    // whose entry is `None` has no match left and is never searched again.
    let mut next: Vec<Option<usize>> = rules
        .iter()
        .map(|rule| find(text, rule.needle, 0))
        .collect();

    while pos < text.len() {
        let Some((at, index)) = earliest_match(text, rules, &mut next, pos) else {
            break;
        };
        let rule = &rules[index];
        push(&mut out, &text[pos..at])?;
        push(&mut out, rule.replacement)?;
        substitutions += 1;
        pos = at + rule.needle.len();
    }
    push(&mut out, &text[pos..])?;

    Ok((out, substitutions))
}

/// Returns the smallest match offset at or after `from` and the index of the
/// rule matching there, refreshing cached offsets that fell behind the scan.
///
/// Ties keep the earlier rule because only a strictly smaller offset replaces
/// the current best. A cached offset `>= from` is still the earliest one,
/// since no match of that rule lies between the offset it was searched from
/// and itself.
fn earliest_match(
    text: &[u8],
    rules: &[Rule<'_>],
    next: &mut [Option<usize>],
    from: usize,
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for (index, rule) in rules.iter().enumerate() {
        let Some(mut at) = next[index] else {
            continue;
        };
        if at < from {
            next[index] = find(text, rule.needle, from);
            match next[index] {
                Some(found) => at = found,
                None => continue,
            }
        }
        if best.is_none_or(|(best_at, _)| at < best_at) {
            best = Some((at, index));
        }
    }
    best
}

/// Appends to a buffer whose final size is unknown, growing it fallibly.
fn push(out: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
    out.try_reserve(bytes.len())?;
    out.extend_from_slice(bytes);
    Ok(())
}
