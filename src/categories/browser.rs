//! Browser cache and history cleanup.
//!
//! Chromium-family profiles (Chrome, Edge, Brave, Opera) and Firefox
//! profiles. Browsers are asked to close first so their databases are
//! not locked; whatever still resists goes through the engine's normal
//! fallback chain.

use crate::cleaner::Cleaner;
use crate::config::RunOptions;
use crate::output::Console;
use crate::processes;
use crate::stats::RunStats;
use crate::theme::Theme;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

/// Chromium-based data roots under %LOCALAPPDATA%, each containing
/// per-profile directories.
const CHROMIUM_ROOTS: &[&[&str]] = &[
    &["Google", "Chrome", "User Data"],
    &["Microsoft", "Edge", "User Data"],
    &["BraveSoftware", "Brave-Browser", "User Data"],
    &["Opera Software", "Opera Stable"],
    &["Opera Software", "Opera GX Stable"],
];

/// Cache directories inside a Chromium profile; cleared wholesale.
const CHROMIUM_CACHE_DIRS: &[&str] = &[
    "Cache",
    "Code Cache",
    "GPUCache",
    "Service Worker",
    "DawnCache",
    "ShaderCache",
    "GrShaderCache",
    "Media Cache",
];

/// History databases inside a Chromium profile.
const CHROMIUM_HISTORY_FILES: &[&str] = &[
    "History",
    "History-journal",
    "History Provider Cache",
    "Network Action Predictor",
];

/// Further per-profile browsing traces.
const CHROMIUM_EXTRA_FILES: &[&str] = &[
    "Top Sites",
    "Shortcuts",
    "Visited Links",
    "Favicons",
    "Web Data",
];

/// History/session databases inside a Firefox profile.
const FIREFOX_HISTORY_FILES: &[&str] = &[
    "places.sqlite",
    "places.sqlite-wal",
    "places.sqlite-shm",
    "formhistory.sqlite",
    "formhistory.sqlite-wal",
    "formhistory.sqlite-shm",
    "downloads.sqlite",
    "downloads.json",
    "sessionstore.jsonlz4",
];

/// Cache directories inside a Firefox profile.
const FIREFOX_CACHE_DIRS: &[&str] = &["cache2", "startupCache"];

/// Clear caches and history for every installed browser profile.
pub fn clean(cleaner: &Cleaner, stats: &mut RunStats, options: &RunOptions, console: &Console) {
    processes::close_processes(
        processes::BROWSER_PROCESSES,
        options.force,
        Duration::from_secs(2),
        cleaner.confirm,
        console,
    );
    // Give file handles a moment to be released.
    std::thread::sleep(Duration::from_secs(1));

    let base_dirs = directories::BaseDirs::new();
    let localapp = env::var("LOCALAPPDATA")
        .map(PathBuf::from)
        .ok()
        .or_else(|| base_dirs.as_ref().map(|b| b.data_local_dir().to_path_buf()));
    let appdata = env::var("APPDATA")
        .map(PathBuf::from)
        .ok()
        .or_else(|| base_dirs.as_ref().map(|b| b.data_dir().to_path_buf()));

    if let Some(localapp) = &localapp {
        for root_parts in CHROMIUM_ROOTS {
            let mut root = localapp.clone();
            for part in *root_parts {
                root = root.join(part);
            }
            clean_chromium_root(&root, cleaner, stats, console);
        }
    }

    // Firefox keeps history under Roaming and caches under Local.
    for profiles_root in [
        appdata.as_ref().map(|p| p.join("Mozilla").join("Firefox").join("Profiles")),
        localapp.as_ref().map(|p| p.join("Mozilla").join("Firefox").join("Profiles")),
    ]
    .into_iter()
    .flatten()
    {
        for profile in firefox_profiles(&profiles_root) {
            clean_firefox_profile(&profile, cleaner, stats, console);
        }
    }
}

/// Clean every profile directory under one Chromium data root.
fn clean_chromium_root(root: &Path, cleaner: &Cleaner, stats: &mut RunStats, console: &Console) {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let profile = entry.path();
        if profile.is_dir() {
            clean_chromium_profile(&profile, cleaner, stats, console);
        }
    }
}

/// Clear one Chromium profile: cache contents, then browsing traces.
pub fn clean_chromium_profile(
    profile: &Path,
    cleaner: &Cleaner,
    stats: &mut RunStats,
    console: &Console,
) {
    for cache_dir in CHROMIUM_CACHE_DIRS {
        cleaner.remove_contents(&profile.join(cache_dir), stats);
    }

    for name in CHROMIUM_HISTORY_FILES.iter().chain(CHROMIUM_EXTRA_FILES) {
        delete_reporting(&profile.join(name), cleaner, stats, console);
    }
}

/// Clear one Firefox profile: history databases and caches.
pub fn clean_firefox_profile(
    profile: &Path,
    cleaner: &Cleaner,
    stats: &mut RunStats,
    console: &Console,
) {
    for name in FIREFOX_HISTORY_FILES {
        delete_reporting(&profile.join(name), cleaner, stats, console);
    }
    for cache_dir in FIREFOX_CACHE_DIRS {
        cleaner.remove_contents(&profile.join(cache_dir), stats);
    }
}

/// Firefox profile directories (`*.default*`) under a Profiles root.
fn firefox_profiles(profiles_root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for entry in WalkDir::new(profiles_root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_default_profile = path
            .file_name()
            .map(|n| n.to_string_lossy().contains(".default"))
            .unwrap_or(false);
        if path.is_dir() && is_default_profile {
            found.push(path.to_path_buf());
        }
    }
    found
}

fn delete_reporting(target: &Path, cleaner: &Cleaner, stats: &mut RunStats, console: &Console) {
    let outcome = cleaner.attempt_delete(target, stats);
    if !outcome.succeeded() && !cleaner.dry_run && target.exists() {
        console.warn(&format!(
            "  Could not remove: {} (in use or permission denied)",
            Theme::value(&target.display().to_string())
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PathFilter;
    use std::fs;

    fn seed_chromium_profile(profile: &Path) {
        let cache = profile.join("Cache");
        fs::create_dir_all(&cache).unwrap();
        fs::write(cache.join("data_0"), vec![0u8; 64]).unwrap();
        fs::write(profile.join("History"), "sqlite").unwrap();
        fs::write(profile.join("Top Sites"), "sqlite").unwrap();
        fs::write(profile.join("Bookmarks"), "keep").unwrap();
    }

    #[test]
    fn test_chromium_profile_loses_caches_and_history_keeps_bookmarks() {
        let temp_dir = tempfile::tempdir().unwrap();
        let profile = temp_dir.path().join("Default");
        fs::create_dir_all(&profile).unwrap();
        seed_chromium_profile(&profile);

        let filter = PathFilter::allow_all();
        let console = Console::quiet();
        let cleaner = Cleaner::new(&filter, &console, false);
        let mut stats = RunStats::default();

        clean_chromium_profile(&profile, &cleaner, &mut stats, &console);

        assert!(profile.join("Cache").exists()); // dir kept, contents cleared
        assert!(!profile.join("Cache").join("data_0").exists());
        assert!(!profile.join("History").exists());
        assert!(!profile.join("Top Sites").exists());
        assert!(profile.join("Bookmarks").exists());
        assert_eq!(stats.files_deleted, 3);
        assert_eq!(stats.bytes_deleted, 64 + 6 + 6);
    }

    #[test]
    fn test_firefox_profile_cleanup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let profile = temp_dir.path().join("abcd1234.default-release");
        let cache2 = profile.join("cache2");
        fs::create_dir_all(&cache2).unwrap();
        fs::write(cache2.join("entry"), "cached").unwrap();
        fs::write(profile.join("places.sqlite"), "history").unwrap();
        fs::write(profile.join("prefs.js"), "keep").unwrap();

        let filter = PathFilter::allow_all();
        let console = Console::quiet();
        let cleaner = Cleaner::new(&filter, &console, false);
        let mut stats = RunStats::default();

        clean_firefox_profile(&profile, &cleaner, &mut stats, &console);

        assert!(!profile.join("places.sqlite").exists());
        assert!(!cache2.join("entry").exists());
        assert!(profile.join("prefs.js").exists());
    }

    #[test]
    fn test_firefox_profile_discovery_filters_names() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("abcd.default")).unwrap();
        fs::create_dir(temp_dir.path().join("efgh.default-release")).unwrap();
        fs::create_dir(temp_dir.path().join("Crash Reports")).unwrap();

        let profiles = firefox_profiles(temp_dir.path());
        assert_eq!(profiles.len(), 2);
    }
}
