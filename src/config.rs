use crate::errors::Result;
use crate::multi::{Rule, Strategy};
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A literal find/replace pair as written in a rule file.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RuleSpec {
    /// The text to search for. An empty string never matches.
    pub find: String,
    /// The text substituted for each match. Empty means delete.
    #[serde(default)]
    pub replace: String,
}

impl RuleSpec {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// Borrows this spec as an engine [`Rule`].
    pub fn as_rule(&self) -> Rule<'_> {
        Rule::new(self.find.as_str(), self.replace.as_str())
    }
}

/// Configuration for the replace operation.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ReplaceConfig {
    /// How multiple rules are combined.
    #[serde(default)]
    pub strategy: Strategy,
    /// Fold ASCII letters when matching. Only valid with a single rule.
    #[serde(default)]
    pub ignore_case: bool,
    /// Replace only the first match per file. Only valid with a single rule.
    #[serde(default)]
    pub first_only: bool,
    /// Rules in priority order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    /// An optional list of file extensions to include in the operation.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    /// An optional list of directory names to exclude from the operation.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
}

impl ReplaceConfig {
    /// A configuration with a single rule and default settings.
    pub fn single(rule: RuleSpec) -> Self {
        Self {
            rules: vec![rule],
            ..Self::default()
        }
    }

    /// Rejects flag combinations the engine has no meaning for.
    pub fn validate(&self) -> Result<()> {
        if self.rules.len() > 1 {
            if self.ignore_case {
                return Err("ignore_case requires exactly one rule".into());
            }
            if self.first_only {
                return Err("first_only requires exactly one rule".into());
            }
        }
        Ok(())
    }
}

/// A utility for loading replacer configurations.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Finds the configuration file by searching in a prioritized list of locations.
    ///
    /// The search order is:
    /// 1. `config_path` as given (absolute, or relative to the current directory).
    /// 2. A path relative to the `working_dir`.
    /// 3. Inside the `~/.subst` directory.
    pub fn find_config(config_path: &Path, working_dir: &Path) -> Result<PathBuf> {
        let mut candidates = vec![config_path.to_path_buf(), working_dir.join(config_path)];
        if let Some(home) = env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(".subst").join(config_path));
        }

        if let Some(found) = candidates.iter().find(|p| p.exists()) {
            return Ok(found.clone());
        }

        let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        Err(format!(
            "Config file '{}' not found. Searched in:\n  - {}",
            config_path.display(),
            tried.join("\n  - ")
        )
        .into())
    }

    /// Loads and validates a `ReplaceConfig` from a YAML file.
    pub fn load_replace_config(path: &Path) -> Result<ReplaceConfig> {
        let file = File::open(path)?;
        let config: ReplaceConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }
}
