use crate::errors::Result;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Statistics from an `undo` operation.
#[derive(Debug, Default)]
pub struct UndoStats {
    /// The number of backup files found.
    pub found: usize,
    /// The number of files successfully restored from backups.
    pub restored: usize,
}

/// Statistics from a `clean-backups` operation.
#[derive(Debug, Default)]
pub struct CleanStats {
    pub found: usize,
    pub removed: usize,
    pub bytes: u64,
}

/// Lists every `.bak` file under `dir`.
///
/// Hidden and gitignored paths are included: a backup must always be found
/// again, whatever the walker would normally skip.
pub fn find_backups(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut backups = Vec::new();
    for entry in WalkBuilder::new(dir).standard_filters(false).build() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "bak") {
            backups.push(path.to_path_buf());
        }
    }
    backups.sort();
    Ok(backups)
}

/// Copies each `<file>.bak` back over `<file>`.
///
/// # Arguments
///
/// * `dir` - The directory to scan for backup files.
/// * `keep_backups` - If `false`, the `.bak` files will be deleted after being restored.
pub fn undo(dir: &Path, keep_backups: bool) -> Result<UndoStats> {
    let mut stats = UndoStats::default();

    for backup in find_backups(dir)? {
        stats.found += 1;
        let original = backup.with_extension("");
        fs::copy(&backup, &original)?;
        if !keep_backups {
            fs::remove_file(&backup)?;
        }
        stats.restored += 1;
        tracing::debug!(path = %original.display(), "restored");
    }

    Ok(stats)
}

/// Deletes every `.bak` file under `dir`, or only measures them when `dry_run`.
pub fn clean(dir: &Path, dry_run: bool) -> Result<CleanStats> {
    let mut stats = CleanStats::default();

    for backup in find_backups(dir)? {
        stats.found += 1;
        if let Ok(metadata) = backup.metadata() {
            stats.bytes += metadata.len();
        }

        if dry_run {
            println!("Would remove: {}", backup.display());
            continue;
        }
        match fs::remove_file(&backup) {
            Ok(()) => {
                stats.removed += 1;
                tracing::debug!(path = %backup.display(), "removed backup");
            }
            Err(e) => tracing::warn!(path = %backup.display(), error = %e, "failed to remove backup"),
        }
    }

    Ok(stats)
}

/// The main entry point for the `undo` command.
pub fn run_undo(dir: PathBuf, keep_backups: bool) -> Result<()> {
    let stats = undo(&dir, keep_backups)?;
    println!(
        "\nBackups found: {}, restored: {}",
        stats.found, stats.restored
    );
    Ok(())
}

/// The main entry point for the `clean-backups` command.
pub fn run_clean_backups(dir: PathBuf, dry_run: bool) -> Result<()> {
    println!("Searching for backup files in {}...\n", dir.display());
    let stats = clean(&dir, dry_run)?;
    let megabytes = stats.bytes as f64 / 1_048_576.0;

    println!("\n{}", "-".repeat(50));
    println!("Backup files found: {}", stats.found);
    if dry_run {
        println!("Total size: {megabytes:.2} MB");
        println!("\nRun without --dry-run to remove these files");
    } else {
        println!("Backup files removed: {}", stats.removed);
        println!("Space freed: {megabytes:.2} MB");
    }

    Ok(())
}
