//! Run-wide deletion statistics.
//!
//! One record accumulates outcomes across every engine invocation in a
//! run. It is owned by the caller and passed down explicitly; only the
//! deletion engine writes to it. Read once at the end for the summary
//! line and the optional JSON report.

use crate::config::RunOptions;
use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub files_deleted: u64,
    pub dirs_deleted: u64,
    pub bytes_deleted: u64,
    pub locked_or_failed: u64,
    pub scheduled_on_reboot: u64,
    pub skipped_by_exclude: u64,
    pub skipped_by_age: u64,
}

impl RunStats {
    /// One-line human summary, printed at the end of a run.
    pub fn summary(&self) -> String {
        format!(
            "Deleted files: {}, dirs: {}, freed: {}, skipped(exclude): {}, skipped(age): {}, failed: {}, scheduled(on reboot): {}",
            self.files_deleted,
            self.dirs_deleted,
            format_bytes(self.bytes_deleted),
            self.skipped_by_exclude,
            self.skipped_by_age,
            self.locked_or_failed,
            self.scheduled_on_reboot,
        )
    }
}

/// Binary-magnitude size formatting: B, KB, MB, GB, TB with a 1024 step.
/// Whole bytes print without decimals, everything else with two.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

/// Structured end-of-run report written with --json.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub timestamp: String,
    pub stats: &'a RunStats,
    pub options: &'a RunOptions,
}

/// Persist the report to `path`, creating parent directories as needed.
pub fn write_report(path: &Path, stats: &RunStats, options: &RunOptions) -> Result<PathBuf> {
    let report = Report {
        timestamp: Local::now().to_rfc3339(),
        stats,
        options,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(path.to_path_buf())
}
