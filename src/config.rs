use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persistent configuration, loaded from %APPDATA%\wincare\config.toml.
///
/// The file supplies defaults; command-line flags extend the exclusion
/// list and override the age threshold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub exclusions: Exclusions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thresholds {
    /// Only delete items whose newest timestamp is older than this many days.
    #[serde(default)]
    pub older_than_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Exclusions {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Config {
    /// Get the config file path: %APPDATA%\wincare\config.toml
    pub fn config_path() -> Result<PathBuf> {
        let appdata = std::env::var("APPDATA").context("APPDATA environment variable not set")?;
        Ok(PathBuf::from(appdata).join("wincare").join("config.toml"))
    }

    /// Load config from file or return defaults.
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) if path.exists() => match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file: {}", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config file: {}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Save config to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, toml).context("Failed to write config file")?;
        Ok(())
    }

    /// Apply CLI option overrides: --older-than replaces the file value,
    /// --exclude patterns are appended after the file's.
    pub fn apply_cli_overrides(&mut self, older_than: Option<i64>, exclude: &[String]) {
        if older_than.is_some() {
            self.thresholds.older_than_days = older_than;
        }
        self.exclusions.patterns.extend(exclude.iter().cloned());
    }
}

/// Options fixed for the duration of one run, set before any deletion.
///
/// Echoed verbatim into the JSON report so a summary can be correlated
/// with the flags that produced it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunOptions {
    pub exclude_patterns: Vec<String>,
    pub older_than_days: Option<i64>,
    pub dry_run: bool,
    pub confirm_each: bool,
    /// --yes / --no; None keeps prompts interactive.
    pub assume_answer: Option<bool>,
    /// Escalate to force-kill when closing browsers.
    pub force: bool,
}

impl Config {
    /// Combine the (already overridden) config with per-run flags.
    pub fn run_options(
        &self,
        dry_run: bool,
        confirm_each: bool,
        assume_answer: Option<bool>,
        force: bool,
    ) -> RunOptions {
        RunOptions {
            exclude_patterns: self.exclusions.patterns.clone(),
            older_than_days: self.thresholds.older_than_days,
            dry_run,
            confirm_each,
            assume_answer,
            force,
        }
    }
}
