//! Prefetch cleanup.
//!
//! Prefetch holds mostly disposable `.pf` traces, but `Layout.ini` is
//! maintained by the defragmenter and is left alone. Everything else is
//! handed to the engine best-effort; locked entries end up scheduled
//! for reboot through the engine's normal chain.

use crate::cleaner::Cleaner;
use crate::stats::RunStats;
use std::fs;
use std::path::Path;

pub fn clean(prefetch_dir: &Path, cleaner: &Cleaner, stats: &mut RunStats) {
    let entries = match fs::read_dir(prefetch_dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let is_protected = path
            .file_name()
            .map(|name| name.to_string_lossy().eq_ignore_ascii_case("layout.ini"))
            .unwrap_or(false);
        if is_protected {
            continue;
        }

        if path.is_dir() {
            // Rare in Prefetch; clear the contents, then the directory.
            cleaner.remove_contents(&path, stats);
        }
        cleaner.attempt_delete(&path, stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PathFilter;
    use crate::output::Console;
    use std::fs;

    #[test]
    fn test_layout_ini_survives_pf_files_do_not() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("NOTEPAD.EXE-1234.pf"), "pf").unwrap();
        fs::write(temp_dir.path().join("Layout.ini"), "layout").unwrap();
        fs::write(temp_dir.path().join("stray.tmp"), "stray").unwrap();
        let sub = temp_dir.path().join("ReadyBoot");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("trace.fx"), "t").unwrap();

        let filter = PathFilter::allow_all();
        let console = Console::quiet();
        let cleaner = Cleaner::new(&filter, &console, false);
        let mut stats = RunStats::default();

        clean(temp_dir.path(), &cleaner, &mut stats);

        assert!(temp_dir.path().join("Layout.ini").exists());
        assert!(!temp_dir.path().join("NOTEPAD.EXE-1234.pf").exists());
        assert!(!temp_dir.path().join("stray.tmp").exists());
        assert!(!sub.exists());
        assert_eq!(stats.files_deleted, 3);
        assert_eq!(stats.dirs_deleted, 1);
    }

    #[test]
    fn test_missing_prefetch_dir_is_noop() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("Prefetch");

        let filter = PathFilter::allow_all();
        let console = Console::quiet();
        let cleaner = Cleaner::new(&filter, &console, false);
        let mut stats = RunStats::default();

        clean(&missing, &cleaner, &mut stats);
        assert_eq!(stats, RunStats::default());
    }
}
