use crate::callback::replace_with_case;
use crate::cli::{Preset, ReplaceArgs};
use crate::config::{ConfigLoader, ReplaceConfig, RuleSpec};
use crate::errors::Result;
use crate::locator::Case;
use crate::multi::{Rule, Strategy, apply_counted};
use crate::presets;
use crate::report::{FileChange, Reporter, RunSummary};
use crate::single::{replace_all, replace_n_counted};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;

/// Per-match transformation applied by the generator-based replacer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// ASCII-uppercase the matched bytes.
    Upper,
    /// ASCII-lowercase the matched bytes.
    Lower,
    /// Emit the template with every `{n}` replaced by the 1-based match number.
    Number(String),
}

/// File-level engine for applying literal replacements.
///
/// A `Replacer` owns its rules and settings. [`Replacer::rewrite`] applies
/// them to an in-memory buffer; [`Replacer::process_file`] does the same for
/// a file on disk.
pub struct Replacer {
    rules: Vec<RuleSpec>,
    strategy: Strategy,
    case: Case,
    limit: usize,
    transform: Option<Transform>,
}

/// Options for processing a file.
#[derive(Debug, Clone, Copy)]
pub struct ProcessOptions {
    /// If `true`, a `.bak` file will be created before modifying a file.
    pub create_backup: bool,
    /// If `true`, changes will be calculated but not written to disk.
    pub dry_run: bool,
}

/// The result of rewriting a buffer or a file.
#[derive(Debug)]
pub struct ProcessResult {
    /// The number of substitutions made.
    pub changes: usize,
    /// `true` if the output differs from the input.
    pub modified: bool,
}

impl Replacer {
    /// Creates a new `Replacer` from a validated `ReplaceConfig`.
    pub fn new(config: ReplaceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rules: config.rules,
            strategy: config.strategy,
            case: if config.ignore_case {
                Case::Insensitive
            } else {
                Case::Sensitive
            },
            limit: if config.first_only { 1 } else { usize::MAX },
            transform: None,
        })
    }

    /// Creates a `Replacer` whose single rule generates its replacement per match.
    pub fn with_transform(
        needle: String,
        transform: Transform,
        ignore_case: bool,
        first_only: bool,
    ) -> Result<Self> {
        let mut replacer = Self::new(ReplaceConfig {
            ignore_case,
            first_only,
            ..ReplaceConfig::single(RuleSpec::new(needle, ""))
        })?;
        replacer.transform = Some(transform);
        Ok(replacer)
    }

    /// Applies the configured rules to `text`, returning the new bytes and
    /// the number of substitutions.
    pub fn rewrite(&self, text: &[u8]) -> Result<(Vec<u8>, usize)> {
        if let Some(transform) = &self.transform {
            return self.rewrite_with(text, transform);
        }

        match self.rules.as_slice() {
            [rule] => {
                let (needle, replacement) = (rule.find.as_bytes(), rule.replace.as_bytes());
                replace_n_counted(text, needle, replacement, self.case, self.limit)
            }
            rules => {
                let rules: Vec<Rule<'_>> = rules.iter().map(RuleSpec::as_rule).collect();
                apply_counted(text, &rules, self.strategy)
            }
        }
    }

    fn rewrite_with(&self, text: &[u8], transform: &Transform) -> Result<(Vec<u8>, usize)> {
        let needle = self.rules.first().map(|r| r.find.as_bytes()).unwrap_or_default();
        let mut changes = 0;
        let out = replace_with_case(text, needle, self.case, self.limit, |out, matched| {
            changes += 1;
            match transform {
                Transform::Upper => out.extend(matched.iter().map(u8::to_ascii_uppercase)),
                Transform::Lower => out.extend(matched.iter().map(u8::to_ascii_lowercase)),
                Transform::Number(template) => {
                    let n = changes.to_string();
                    let rendered = replace_all(template.as_bytes(), b"{n}", n.as_bytes())?;
                    out.extend_from_slice(&rendered);
                }
            }
            Ok(())
        })?;
        Ok((out, changes))
    }

    /// Processes a single file, applying all configured replacements.
    ///
    /// The file is only written when its bytes actually change, atomically
    /// through a temporary file in the same directory, keeping permissions.
    pub fn process_file(&self, path: &Path, options: ProcessOptions) -> Result<ProcessResult> {
        let content = fs::read(path)?;
        let (new_content, changes) = self.rewrite(&content)?;
        let modified = new_content != content;

        if modified && !options.dry_run {
            if options.create_backup {
                fs::copy(path, backup_path(path))?;
            }

            let parent = path
                .parent()
                .ok_or_else(|| format!("Could not get parent directory for {}", path.display()))?;
            let mut temp_file = NamedTempFile::new_in(parent)?;
            temp_file.write_all(&new_content)?;

            let perms = fs::metadata(path)?.permissions();
            fs::set_permissions(temp_file.path(), perms)?;

            temp_file.persist(path)?;
        }

        Ok(ProcessResult { changes, modified })
    }
}

/// The `.bak` path a file is backed up to.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Builds the `ReplaceConfig` or `Replacer` selected by the command-line arguments.
fn build_replacer(args: &ReplaceArgs) -> Result<(Replacer, ReplaceConfig)> {
    let config = if let Some(preset) = &args.preset {
        println!("Using preset: {preset:?}");
        presets::load(preset)
    } else if let Some(cfg_path) = &args.config {
        let resolved = ConfigLoader::find_config(cfg_path, &args.dir)?;
        println!("Using config file: {}", resolved.display());
        ConfigLoader::load_replace_config(&resolved)?
    } else if let Some(pattern) = &args.pattern {
        let transform = if args.upper {
            Some(Transform::Upper)
        } else if args.lower {
            Some(Transform::Lower)
        } else {
            args.number.clone().map(Transform::Number)
        };

        if let Some(transform) = transform {
            let replacer =
                Replacer::with_transform(pattern.clone(), transform, args.ignore_case, args.first)?;
            return Ok((replacer, ReplaceConfig::default()));
        }

        let replacement = args.replacement.clone().ok_or(
            "--pattern needs one of --replacement, --upper, --lower or --number",
        )?;
        ReplaceConfig {
            strategy: args.strategy,
            ignore_case: args.ignore_case,
            first_only: args.first,
            ..ReplaceConfig::single(RuleSpec::new(pattern.clone(), replacement))
        }
    } else {
        return Err("Specify --preset, --config, or --pattern".into());
    };

    Ok((Replacer::new(config.clone())?, config))
}

/// The main entry point for the `replace` command.
///
/// Loads the rules, walks the target directory, rewrites the matching files
/// on a Rayon thread pool and writes a summary report to standard output.
pub fn run_replace(args: ReplaceArgs) -> Result<()> {
    let (replacer, config) = build_replacer(&args)?;

    let exts: Vec<String> = config
        .extensions
        .as_ref()
        .unwrap_or(&args.extensions)
        .iter()
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .collect();
    let exclude_dirs = config.exclude.clone().unwrap_or_else(|| args.exclude.clone());

    let all_files = collect_files(&args.dir, &exts, &exclude_dirs)?;
    tracing::debug!(files = all_files.len(), dir = %args.dir.display(), "collected files");

    let processed = AtomicUsize::new(0);
    let changed = Mutex::new(Vec::new());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }))
        .build()?;

    let options = ProcessOptions {
        create_backup: !args.no_backup,
        dry_run: args.dry_run,
    };

    pool.install(|| {
        all_files.par_iter().for_each(|path| {
            match replacer.process_file(path, options) {
                Ok(result) => {
                    processed.fetch_add(1, Ordering::Relaxed);
                    if result.modified {
                        tracing::debug!(path = %path.display(), changes = result.changes, "modified");
                        record_change(&changed, path, result.changes);
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to process file");
                }
            }
        });
    });

    let mut files = changed.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let summary = RunSummary::new(processed.into_inner(), files, args.dry_run);
    let reporter = Reporter::new(args.format, args.list || args.dry_run);
    reporter.write(&mut io::stdout().lock(), &summary)
}

/// Appends a modified file to the shared list, even if another worker
/// panicked while holding the lock.
fn record_change(changed: &Mutex<Vec<FileChange>>, path: &Path, changes: usize) {
    changed
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .push(FileChange {
            path: path.to_path_buf(),
            changes,
        });
}

/// Walks `dir`, honouring `.gitignore`, and returns the files to process.
pub fn collect_files(dir: &Path, extensions: &[String], exclude: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut walker = WalkBuilder::new(dir);
    walker.standard_filters(true);

    for entry in walker.build() {
        let entry = entry?;
        let path = entry.path();

        let excluded = exclude
            .iter()
            .any(|ex| path.components().any(|c| c.as_os_str() == ex.as_str()));
        let is_backup = path.extension().is_some_and(|e| e == "bak");

        if !excluded && !is_backup && path.is_file() && should_process_file(path, extensions) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Determines if a file should be processed based on its extension.
fn should_process_file(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }

    path.extension()
        .and_then(|os| os.to_str())
        .map(|s| extensions.contains(&s.to_lowercase()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn replacer(rules: &[(&str, &str)], strategy: Strategy) -> Replacer {
        Replacer::new(ReplaceConfig {
            strategy,
            rules: rules.iter().map(|(f, r)| RuleSpec::new(*f, *r)).collect(),
            ..ReplaceConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_rewrite_counts_changes() {
        let r = replacer(&[("hello", "hi"), ("world", "there")], Strategy::SinglePass);
        let (out, changes) = r.rewrite(b"hello world hello").unwrap();
        assert_eq!(out, b"hi there hi");
        assert_eq!(changes, 3);
    }

    #[test]
    fn test_rewrite_strategy_matters() {
        let rules = [("a", "b"), ("b", "c")];
        let (seq, _) = replacer(&rules, Strategy::Sequential).rewrite(b"ab").unwrap();
        let (one, _) = replacer(&rules, Strategy::SinglePass).rewrite(b"ab").unwrap();
        assert_eq!(seq, b"cc");
        assert_eq!(one, b"bc");
    }

    #[test]
    fn test_rewrite_single_rule_flags() {
        let r = Replacer::new(ReplaceConfig {
            ignore_case: true,
            first_only: true,
            ..ReplaceConfig::single(RuleSpec::new("hello", "hi"))
        })
        .unwrap();
        let (out, changes) = r.rewrite(b"HELLO hello").unwrap();
        assert_eq!(out, b"hi hello");
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_transforms() {
        let upper = Replacer::with_transform("hello".into(), Transform::Upper, false, false).unwrap();
        assert_eq!(upper.rewrite(b"hello world hello").unwrap().0, b"HELLO world HELLO");

        let lower = Replacer::with_transform("abc".into(), Transform::Lower, true, false).unwrap();
        assert_eq!(lower.rewrite(b"ABC aBc").unwrap().0, b"abc abc");

        let number =
            Replacer::with_transform("ITEM".into(), Transform::Number("#{n}".into()), false, false)
                .unwrap();
        let (out, changes) = number.rewrite(b"ITEM, ITEM, ITEM").unwrap();
        assert_eq!(out, b"#1, #2, #3");
        assert_eq!(changes, 3);
    }

    #[test]
    fn test_process_file_with_backup() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        fs::write(&file, "foo bar foo").unwrap();

        let r = replacer(&[("foo", "baz")], Strategy::SinglePass);
        let options = ProcessOptions {
            create_backup: true,
            dry_run: false,
        };
        let result = r.process_file(&file, options).unwrap();

        assert!(result.modified);
        assert_eq!(result.changes, 2);
        assert_eq!(fs::read_to_string(&file).unwrap(), "baz bar baz");
        assert_eq!(fs::read_to_string(backup_path(&file)).unwrap(), "foo bar foo");
    }

    #[test]
    fn test_process_file_dry_run_and_noop() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        fs::write(&file, "foo").unwrap();

        let r = replacer(&[("foo", "bar")], Strategy::SinglePass);
        let dry = ProcessOptions {
            create_backup: true,
            dry_run: true,
        };
        let result = r.process_file(&file, dry).unwrap();
        assert!(result.modified);
        assert_eq!(fs::read_to_string(&file).unwrap(), "foo");
        assert!(!backup_path(&file).exists());

        // A rule that maps a needle to itself counts but does not modify.
        let same = replacer(&[("foo", "foo")], Strategy::SinglePass);
        let result = same
            .process_file(&file, ProcessOptions { create_backup: true, dry_run: false })
            .unwrap();
        assert_eq!(result.changes, 1);
        assert!(!result.modified);
        assert!(!backup_path(&file).exists());
    }

    #[test]
    fn test_record_change_survives_poisoned_lock() {
        let changed = Mutex::new(Vec::new());
        let _ = std::panic::catch_unwind(|| {
            let _guard = changed.lock().unwrap();
            panic!("worker failed");
        });
        assert!(changed.is_poisoned());

        record_change(&changed, Path::new("a.txt"), 4);
        let files = changed.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("a.txt"));
        assert_eq!(files[0].changes, 4);
    }

    #[test]
    fn test_collect_files_filters() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("skip")).unwrap();
        fs::write(root.join("a.txt"), "x").unwrap();
        fs::write(root.join("b.md"), "x").unwrap();
        fs::write(root.join("a.txt.bak"), "x").unwrap();
        fs::write(root.join("skip").join("c.txt"), "x").unwrap();

        let files = collect_files(root, &["txt".to_string()], &["skip".to_string()]).unwrap();
        assert_eq!(files, vec![root.join("a.txt")]);

        let mut all = collect_files(root, &[], &[]).unwrap();
        all.sort();
        assert_eq!(all.len(), 3);
    }
}
