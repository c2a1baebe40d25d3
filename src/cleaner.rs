//! The deletion engine.
//!
//! Every candidate path, whatever enumerated it, goes through
//! [`Cleaner::attempt_delete`]: policy checks first (exclusion, age,
//! optional confirmation), then an escalating removal chain — direct
//! delete, writable-bit repair and retry, delete-on-reboot scheduling.
//! Each call lands in exactly one outcome bucket and updates the shared
//! [`RunStats`] for that bucket exactly once.

use crate::confirm::ConfirmPolicy;
use crate::filter::PathFilter;
use crate::output::Console;
use crate::reboot;
use crate::stats::RunStats;
use crate::utils;
use std::fs;
use std::path::Path;

/// Terminal state of one deletion attempt.
///
/// Only `Failed` (and the failure half of `RebootScheduled`) is a true
/// failure; the rest are success or intentional deferral, and none of
/// them abort an enclosing bulk operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Path was already gone; nothing to do, nothing counted.
    AlreadyAbsent,
    /// Protected by an exclude pattern.
    Excluded,
    /// Too recent for the configured age threshold.
    AgeSkipped,
    /// Vetoed by the confirmation policy.
    Declined,
    /// Dry-run: intent logged, filesystem untouched.
    DryRun,
    /// Removed from disk.
    Deleted,
    /// Could not be removed now; registered for removal on next reboot.
    RebootScheduled,
    /// Could not be removed and could not be scheduled.
    Failed,
}

impl DeleteOutcome {
    /// The boolean contract: "removed or safely left alone".
    ///
    /// Dry-run is deliberately false — nothing failed, but nothing was
    /// deleted either.
    pub fn succeeded(&self) -> bool {
        !matches!(
            self,
            DeleteOutcome::DryRun | DeleteOutcome::RebootScheduled | DeleteOutcome::Failed
        )
    }
}

/// Deletion engine with its policy dependencies injected.
pub struct Cleaner<'a> {
    pub filter: &'a PathFilter,
    pub console: &'a Console,
    /// Per-action confirmation; `None` disables the gate entirely.
    pub confirm: Option<&'a dyn ConfirmPolicy>,
    pub dry_run: bool,
}

impl<'a> Cleaner<'a> {
    pub fn new(filter: &'a PathFilter, console: &'a Console, dry_run: bool) -> Self {
        Self {
            filter,
            console,
            confirm: None,
            dry_run,
        }
    }

    pub fn with_confirm(mut self, confirm: &'a dyn ConfirmPolicy) -> Self {
        self.confirm = Some(confirm);
        self
    }

    /// Attempt to remove a single path, escalating through the fallback
    /// chain and recording the outcome in `stats`.
    pub fn attempt_delete(&self, path: &Path, stats: &mut RunStats) -> DeleteOutcome {
        self.attempt_delete_with(path, stats, true)
    }

    /// As [`attempt_delete`](Self::attempt_delete), but callers whose
    /// candidates were already vetted can skip the exclude-pattern gate
    /// with `check_exclusions = false`. The age filter always applies.
    pub fn attempt_delete_with(
        &self,
        path: &Path,
        stats: &mut RunStats,
        check_exclusions: bool,
    ) -> DeleteOutcome {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(_) => return DeleteOutcome::AlreadyAbsent,
        };
        // Capture the kind now; it is unknowable once the path is gone.
        let is_dir = meta.is_dir() && !utils::is_reparse_point(path);

        if check_exclusions && self.filter.should_exclude(path) {
            stats.skipped_by_exclude += 1;
            return DeleteOutcome::Excluded;
        }

        if !self.filter.passes_age_filter(path) {
            stats.skipped_by_age += 1;
            return DeleteOutcome::AgeSkipped;
        }

        if let Some(confirm) = self.confirm {
            let kind = if is_dir { "directory" } else { "file" };
            let action = format!("Delete {}: {}?", kind, path.display());
            if !confirm.confirm(&action, false) {
                self.console
                    .verbose(&format!("Skipped by user: {}", path.display()));
                return DeleteOutcome::Declined;
            }
        }

        if self.dry_run {
            self.console
                .verbose(&format!("DRY-RUN would remove: {}", path.display()));
            return DeleteOutcome::DryRun;
        }

        // Size must be recorded before removal for accurate accounting.
        let bytes = utils::path_size_bytes(path);

        // 1) Direct removal.
        let direct = remove_path(path, is_dir);
        if direct.is_ok() || !path_exists(path) {
            record_deleted(stats, is_dir, bytes);
            return DeleteOutcome::Deleted;
        }

        // 2) Permission repair: force the whole subtree owner-writable,
        // retry once, continuing past entries that still resist.
        utils::make_tree_writable(path);
        remove_tree_best_effort(path, is_dir);
        if !path_exists(path) {
            record_deleted(stats, is_dir, bytes);
            return DeleteOutcome::Deleted;
        }

        // 3) Last resort: hand the path to the OS for removal on reboot.
        stats.locked_or_failed += 1;
        match reboot::schedule_delete_on_reboot(path) {
            Ok(()) => {
                stats.scheduled_on_reboot += 1;
                self.console
                    .verbose(&format!("Scheduled for deletion on reboot: {}", path.display()));
                DeleteOutcome::RebootScheduled
            }
            Err(_) => DeleteOutcome::Failed,
        }
    }

    /// Delete the immediate children of `dir`, tolerating partial failure.
    ///
    /// Recursion into subdirectories happens inside `attempt_delete`; an
    /// unreadable or vanished directory degrades to a no-op.
    pub fn remove_contents(&self, dir: &Path, stats: &mut RunStats) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            self.attempt_delete(&entry.path(), stats);
        }
    }
}

fn record_deleted(stats: &mut RunStats, is_dir: bool, bytes: u64) {
    if is_dir {
        stats.dirs_deleted += 1;
    } else {
        stats.files_deleted += 1;
    }
    stats.bytes_deleted += bytes;
}

fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn remove_path(path: &Path, is_dir: bool) -> std::io::Result<()> {
    if is_dir {
        fs::remove_dir_all(path)
    } else {
        // Symlinks and junctions land here: remove the link itself,
        // never its target.
        fs::remove_file(path).or_else(|err| fs::remove_dir(path).map_err(|_| err))
    }
}

/// Depth-first removal that keeps going past entries that still fail
/// after the writable repair.
fn remove_tree_best_effort(path: &Path, is_dir: bool) {
    if !is_dir {
        let _ = fs::remove_file(path).or_else(|_| fs::remove_dir(path));
        return;
    }

    fn visit(dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            let entry_path = entry.path();
            let is_subdir = fs::symlink_metadata(&entry_path)
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if is_subdir && !utils::is_reparse_point(&entry_path) {
                visit(&entry_path);
                let _ = fs::remove_dir(&entry_path);
            } else {
                let _ = fs::remove_file(&entry_path).or_else(|_| fs::remove_dir(&entry_path));
            }
        }
    }

    visit(path);
    let _ = fs::remove_dir(path);
}
