use crate::multi::Strategy;
use crate::report::ReportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Literal multi-pattern find and replace over directory trees.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Literal multi-pattern find and replace",
    long_about = "subst - byte-exact find and replace across a directory tree.

Rules are plain literals, never regular expressions. Several rules can run
either in a single pass over the original text (earliest match wins, ties go
to the rule listed first) or sequentially, one full pass per rule.

QUICK EXAMPLES:
  subst replace -d . -p 'TODO' -r 'DONE'          # Simple replacement
  subst replace -d . --preset html-escape -x html # Built-in rule set
  subst replace -d . -c rules.yaml --dry-run      # Preview a rule file
  subst replace -d . -p 'ITEM' --number 'item-{n}'
  subst undo -d .                                  # Restore from backups"
)]
pub struct Args {
    /// Log progress to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pre-defined literal rule sets for common cleanups.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Convert hard tabs to four spaces.
    TabsToSpaces,
    /// Convert runs of four spaces to hard tabs.
    SpacesToTabs,
    /// Convert CRLF line endings to LF.
    CrlfToLf,
    /// Replace typographic quotes and ellipses with ASCII.
    AsciiQuotes,
    /// Escape `&`, `<` and `>` as HTML entities.
    HtmlEscape,
}

/// The set of available commands for the `subst` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace literal patterns in files (with automatic backups)
    ///
    /// Rule file format (rules.yaml):
    ///   strategy: single-pass    # or sequential
    ///   rules:
    ///     - find: 'colour'
    ///       replace: 'color'
    ///     - find: 'debug!'
    ///       replace: ''          # delete
    Replace(ReplaceArgs),

    /// Restore files from backups (undo replacements)
    Undo {
        /// The directory where the `replace` operation was run.
        #[arg(short, long, required = true)]
        dir: PathBuf,

        /// Keep the backup files after restoring the original files.
        #[arg(long)]
        keep_backups: bool,
    },

    /// Remove backup files without restoring
    CleanBackups {
        /// The directory to clean of backup files.
        #[arg(short, long, required = true)]
        dir: PathBuf,

        /// Preview which backup files would be removed without deleting them.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Arguments of the `replace` command.
#[derive(clap::Args, Debug, Clone)]
pub struct ReplaceArgs {
    /// The name of a built-in preset to use for replacement.
    #[arg(long, value_enum, conflicts_with_all = ["config", "pattern"])]
    pub preset: Option<Preset>,

    /// Path to a YAML rule file.
    #[arg(short, long, conflicts_with = "pattern")]
    pub config: Option<PathBuf>,

    /// A single literal pattern to search for.
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// The literal text to replace the pattern with.
    #[arg(short, long, conflicts_with_all = ["upper", "lower", "number"])]
    pub replacement: Option<String>,

    /// Uppercase each match (ASCII only).
    #[arg(long, requires = "pattern", conflicts_with_all = ["lower", "number"])]
    pub upper: bool,

    /// Lowercase each match (ASCII only).
    #[arg(long, requires = "pattern", conflicts_with = "number")]
    pub lower: bool,

    /// Replace each match with TEMPLATE, where `{n}` is the match number in the file.
    #[arg(long, value_name = "TEMPLATE", requires = "pattern")]
    pub number: Option<String>,

    /// Match ASCII letters case-insensitively.
    #[arg(short = 'i', long, requires = "pattern")]
    pub ignore_case: bool,

    /// Replace only the first match in each file.
    #[arg(long, requires = "pattern")]
    pub first: bool,

    /// How multiple rules are combined.
    #[arg(long, value_enum, default_value_t = Strategy::SinglePass)]
    pub strategy: Strategy,

    /// The directory to process.
    #[arg(short, long, required = true)]
    pub dir: PathBuf,

    /// A comma-separated list of file extensions to include.
    #[arg(short = 'x', long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// A comma-separated list of directories to exclude.
    #[arg(short = 'e', long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Disable the creation of backup files (`.bak`).
    #[arg(long)]
    pub no_backup: bool,

    /// Preview the changes without actually modifying any files.
    #[arg(long)]
    pub dry_run: bool,

    /// The format of the summary written to standard output.
    #[arg(short = 'f', long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// List every modified file in the text summary.
    #[arg(long)]
    pub list: bool,

    /// The number of parallel worker threads to use.
    #[arg(short, long, env = "SUBST_WORKERS")]
    pub workers: Option<usize>,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}
