//! Integration tests for wincare
//!
//! These exercise the deletion engine through the library API the way
//! the category cleanups drive it: bulk removal over real directory
//! trees, policy filters applied, statistics checked at the end.

use std::fs;
use tempfile::TempDir;
use wincare::cleaner::{Cleaner, DeleteOutcome};
use wincare::config::Config;
use wincare::filter::PathFilter;
use wincare::output::Console;
use wincare::stats::{self, RunStats};

fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

#[test]
fn test_bulk_removal_respects_exclusions() {
    let temp_dir = create_test_dir();
    fs::write(temp_dir.path().join("keep.tmp"), vec![0u8; 10]).unwrap();
    fs::write(temp_dir.path().join("also-keep.TMP"), vec![0u8; 20]).unwrap();
    fs::write(temp_dir.path().join("goes.log"), vec![0u8; 30]).unwrap();
    fs::write(temp_dir.path().join("gone.dat"), vec![0u8; 40]).unwrap();

    let filter = PathFilter::new(&["*.tmp".to_string()], None);
    let console = Console::quiet();
    let cleaner = Cleaner::new(&filter, &console, false);
    let mut run_stats = RunStats::default();

    cleaner.remove_contents(temp_dir.path(), &mut run_stats);

    assert!(temp_dir.path().join("keep.tmp").exists());
    assert!(temp_dir.path().join("also-keep.TMP").exists());
    assert!(!temp_dir.path().join("goes.log").exists());
    assert!(!temp_dir.path().join("gone.dat").exists());

    assert_eq!(run_stats.skipped_by_exclude, 2);
    assert_eq!(run_stats.files_deleted, 2);
    assert_eq!(run_stats.bytes_deleted, 70);
    assert_eq!(run_stats.locked_or_failed, 0);
}

#[test]
fn test_age_threshold_protects_fresh_files() {
    let temp_dir = create_test_dir();
    fs::write(temp_dir.path().join("fresh-1.log"), "a").unwrap();
    fs::write(temp_dir.path().join("fresh-2.log"), "b").unwrap();

    let filter = PathFilter::new(&[], Some(7));
    let console = Console::quiet();
    let cleaner = Cleaner::new(&filter, &console, false);
    let mut run_stats = RunStats::default();

    cleaner.remove_contents(temp_dir.path(), &mut run_stats);

    assert!(temp_dir.path().join("fresh-1.log").exists());
    assert!(temp_dir.path().join("fresh-2.log").exists());
    assert_eq!(run_stats.skipped_by_age, 2);
    assert_eq!(run_stats.files_deleted, 0);
    assert_eq!(run_stats.bytes_deleted, 0);
}

#[test]
fn test_dry_run_over_a_tree_deletes_nothing() {
    let temp_dir = create_test_dir();
    fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
    let sub = temp_dir.path().join("nested");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("b.txt"), "b").unwrap();

    let filter = PathFilter::allow_all();
    let console = Console::quiet();
    let cleaner = Cleaner::new(&filter, &console, true);
    let mut run_stats = RunStats::default();

    cleaner.remove_contents(temp_dir.path(), &mut run_stats);

    assert!(temp_dir.path().join("a.txt").exists());
    assert!(sub.join("b.txt").exists());
    assert_eq!(run_stats, RunStats::default());
}

#[test]
fn test_mixed_tree_accounting_adds_up() {
    let temp_dir = create_test_dir();
    fs::write(temp_dir.path().join("file.bin"), vec![0u8; 100]).unwrap();
    let cache = temp_dir.path().join("cache");
    fs::create_dir(&cache).unwrap();
    fs::write(cache.join("a.bin"), vec![0u8; 100]).unwrap();
    fs::write(cache.join("b.bin"), vec![0u8; 250]).unwrap();

    let filter = PathFilter::allow_all();
    let console = Console::quiet();
    let cleaner = Cleaner::new(&filter, &console, false);
    let mut run_stats = RunStats::default();

    cleaner.remove_contents(temp_dir.path(), &mut run_stats);

    assert_eq!(run_stats.files_deleted, 1);
    assert_eq!(run_stats.dirs_deleted, 1);
    assert_eq!(run_stats.bytes_deleted, 450);
    assert!(temp_dir.path().exists());
    assert!(!cache.exists());
}

#[test]
fn test_repeat_run_is_idempotent() {
    let temp_dir = create_test_dir();
    let target = temp_dir.path().join("once.txt");
    fs::write(&target, "x").unwrap();

    let filter = PathFilter::allow_all();
    let console = Console::quiet();
    let cleaner = Cleaner::new(&filter, &console, false);
    let mut run_stats = RunStats::default();

    assert_eq!(
        cleaner.attempt_delete(&target, &mut run_stats),
        DeleteOutcome::Deleted
    );
    let snapshot = run_stats.clone();

    assert_eq!(
        cleaner.attempt_delete(&target, &mut run_stats),
        DeleteOutcome::AlreadyAbsent
    );
    assert_eq!(run_stats, snapshot);
}

#[test]
fn test_end_of_run_report_captures_run() {
    let temp_dir = create_test_dir();
    let victim = temp_dir.path().join("victim.bin");
    fs::write(&victim, vec![0u8; 350]).unwrap();
    let report_path = temp_dir.path().join("out").join("report.json");

    let mut config = Config::default();
    config.apply_cli_overrides(Some(0), &["*.keep".to_string()]);
    let options = config.run_options(false, false, Some(true), false);

    let filter = PathFilter::new(&options.exclude_patterns, options.older_than_days);
    let console = Console::quiet();
    let cleaner = Cleaner::new(&filter, &console, options.dry_run);
    let mut run_stats = RunStats::default();

    assert_eq!(
        cleaner.attempt_delete(&victim, &mut run_stats),
        DeleteOutcome::Deleted
    );

    stats::write_report(&report_path, &run_stats, &options).unwrap();

    let raw = fs::read_to_string(&report_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["stats"]["files_deleted"], 1);
    assert_eq!(value["stats"]["bytes_deleted"], 350);
    assert_eq!(value["options"]["exclude_patterns"][0], "*.keep");
    assert_eq!(value["options"]["dry_run"], false);
}

#[test]
fn test_windows_style_path_matches_exclude_pattern() {
    // Classification is textual: a Windows path matches even when the
    // file does not exist on the test host.
    let filter = PathFilter::new(&["*.tmp".to_string()], None);
    assert!(filter.should_exclude(std::path::Path::new(r"C:\Temp\a.tmp")));
    assert!(!filter.should_exclude(std::path::Path::new(r"C:\Temp\a.exe")));
}
