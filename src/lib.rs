//! `subst` is a library for literal, byte-exact text substitution.
//!
//! It provides the core logic for the `subst` command-line tool but can also be
//! used as a standalone library. The engine works on `&[u8]`, makes no
//! assumption about encoding, and always returns a freshly owned buffer:
//!
//! - [`locator`]: finding the next occurrence of a needle, optionally ignoring
//!   ASCII case.
//! - [`single`]: replacing all (or the first) occurrences of one needle, with
//!   the output size computed before allocating.
//! - [`multi`]: replacing with an ordered list of rules, either cascading
//!   ([`multi::replace_many`]) or in one earliest-match pass
//!   ([`multi::replace_many_optimized`]).
//! - [`callback`]: replacing with bytes written by a caller-supplied closure.
//!
//! The remaining modules are the command-line front end: rule files, presets,
//! parallel file rewriting with backups, and run reports.

pub mod backups;
pub mod callback;
pub mod cli;
pub mod config;
pub mod errors;
pub mod locator;
pub mod logging;
pub mod multi;
pub mod presets;
pub mod replacer;
pub mod report;
pub mod single;

// Re-export main types for easier access by library users.
pub use callback::replace_with;
pub use errors::{Error, Result};
pub use locator::Case;
pub use multi::{Rule, Strategy, replace_many, replace_many_optimized};
pub use replacer::Replacer;
pub use single::{replace_all, replace_first};
