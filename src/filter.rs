//! Deletion policy filters: exclusion globs and the age threshold.
//!
//! Built once from the run options and consulted by the deletion engine
//! before it touches the filesystem. Both checks are pure decisions over
//! the current filesystem state.

use chrono::{DateTime, Duration, Utc};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs::Metadata;
use std::path::Path;

/// Decides whether a candidate path is protected from deletion.
#[derive(Debug)]
pub struct PathFilter {
    exclude: GlobSet,
    has_patterns: bool,
    older_than_days: Option<i64>,
}

impl PathFilter {
    /// Compile the exclusion set and normalize the age threshold.
    ///
    /// Patterns match the full textual path, case-insensitively, with
    /// `*` crossing separators (fnmatch-style). A pattern that fails to
    /// compile is dropped; exclusion is best-effort and never errors.
    /// A threshold of zero or less means no age filtering.
    pub fn new(patterns: &[String], older_than_days: Option<i64>) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut compiled = 0usize;
        for pattern in patterns {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(false)
                .backslash_escape(false)
                .build();
            if let Ok(glob) = glob {
                builder.add(glob);
                compiled += 1;
            }
        }
        let exclude = builder.build().unwrap_or_else(|_| GlobSet::empty());

        Self {
            exclude,
            has_patterns: compiled > 0,
            older_than_days: older_than_days.filter(|d| *d > 0),
        }
    }

    /// No patterns, no threshold: everything is eligible.
    pub fn allow_all() -> Self {
        Self::new(&[], None)
    }

    /// True iff the path's textual form matches any exclude pattern.
    pub fn should_exclude(&self, path: &Path) -> bool {
        self.has_patterns && self.exclude.is_match(path)
    }

    /// True when the path is old enough to delete.
    ///
    /// Without a threshold every path passes. With one, the newest of
    /// {modified, created, accessed} must be older than the cutoff.
    /// A path that cannot be inspected does NOT pass: an inspection
    /// failure must not bypass a user-specified retention policy.
    pub fn passes_age_filter(&self, path: &Path) -> bool {
        let days = match self.older_than_days {
            Some(days) => days,
            None => return true,
        };

        let meta = match std::fs::metadata(path) {
            Ok(meta) => meta,
            Err(_) => return false,
        };
        let newest = match newest_timestamp(&meta) {
            Some(ts) => ts,
            None => return false,
        };

        newest < Utc::now() - Duration::days(days)
    }
}

/// Newest of mtime/ctime/atime, falling back to mtime for timestamps the
/// platform does not expose.
fn newest_timestamp(meta: &Metadata) -> Option<DateTime<Utc>> {
    let mtime: DateTime<Utc> = meta.modified().ok()?.into();
    let ctime = meta.created().map(DateTime::<Utc>::from).unwrap_or(mtime);
    let atime = meta.accessed().map(DateTime::<Utc>::from).unwrap_or(mtime);
    Some(mtime.max(ctime).max(atime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    #[test]
    fn test_empty_pattern_set_excludes_nothing() {
        let filter = PathFilter::allow_all();
        assert!(!filter.should_exclude(Path::new(r"C:\Temp\a.tmp")));
    }

    #[test]
    fn test_exclude_glob_matches_full_path() {
        let filter = PathFilter::new(&["*.tmp".to_string()], None);
        assert!(filter.should_exclude(Path::new(r"C:\Temp\a.tmp")));
        assert!(!filter.should_exclude(Path::new(r"C:\Temp\a.log")));
    }

    #[test]
    fn test_exclude_is_case_insensitive() {
        let filter = PathFilter::new(&["*.TMP".to_string()], None);
        assert!(filter.should_exclude(Path::new(r"C:\Temp\a.tmp")));
    }

    #[test]
    fn test_malformed_pattern_never_matches() {
        let filter = PathFilter::new(&["[".to_string()], None);
        assert!(!filter.should_exclude(Path::new(r"C:\Temp\[")));
        assert!(!filter.should_exclude(Path::new(r"C:\Temp\a.tmp")));
    }

    #[test]
    fn test_mixed_good_and_bad_patterns() {
        let patterns = vec!["[".to_string(), "*.tmp".to_string()];
        let filter = PathFilter::new(&patterns, None);
        assert!(filter.should_exclude(Path::new(r"C:\Temp\a.tmp")));
    }

    #[test]
    fn test_no_threshold_passes_everything() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("fresh.txt");
        fs::write(&file, "x").unwrap();

        assert!(PathFilter::allow_all().passes_age_filter(&file));
        assert!(PathFilter::new(&[], Some(0)).passes_age_filter(&file));
        assert!(PathFilter::new(&[], Some(-3)).passes_age_filter(&file));
    }

    #[test]
    fn test_fresh_file_fails_age_filter() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("fresh.txt");
        fs::write(&file, "x").unwrap();

        let filter = PathFilter::new(&[], Some(7));
        assert!(!filter.passes_age_filter(&file));
    }

    #[test]
    fn test_uninspectable_path_fails_closed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("vanished.txt");

        let filter = PathFilter::new(&[], Some(7));
        assert!(!filter.passes_age_filter(&missing));
    }
}
