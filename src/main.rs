//! The main entry point for the `subst` command-line application.
//!
//! This file is responsible for parsing command-line arguments and dispatching
//! to the appropriate subcommand handler in the `subst` library.

use std::env;
use std::process;
use subst::cli::{self, Commands};
use subst::errors::Result;
use subst::{backups, logging, replacer};

fn main() -> Result<()> {
    if env::args().len() == 1 {
        println!("Literal multi-pattern find and replace\n");
        println!("QUICK START EXAMPLES:");
        println!("  subst replace -d . -p 'TODO' -r 'DONE'           # Simple replacement");
        println!("  subst replace -d . --preset crlf-to-lf           # Built-in rule set");
        println!("  subst replace -d . -c rules.yaml --dry-run       # Preview a rule file");
        println!("  subst undo -d .                                  # Restore from backups\n");
        println!("Run 'subst --help' for full command list");
        println!("Run 'subst <command> --help' for detailed command help");
        process::exit(0);
    }

    let args = cli::parse_args();
    logging::init(args.verbose)?;

    match args.command {
        Commands::Replace(replace) => replacer::run_replace(replace),
        Commands::Undo { dir, keep_backups } => backups::run_undo(dir, keep_backups),
        Commands::CleanBackups { dir, dry_run } => backups::run_clean_backups(dir, dry_run),
    }
}
