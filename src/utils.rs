//! Shared filesystem helpers for wincare
//!
//! Size accounting and the writable-bit repair used by the deletion
//! engine's retry pass live here so both the engine and the category
//! cleaners behave consistently.

use std::fs;
use std::path::{Path, PathBuf};

/// Returns true for paths that must not be traversed as directories:
/// Windows reparse points (junctions, mount points, OneDrive
/// placeholders) and plain symlinks elsewhere. Both can create cycles,
/// so size accounting never descends into them and the engine removes
/// the link itself rather than its target.
pub fn is_reparse_point(path: &Path) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0400;
        if let Ok(meta) = fs::symlink_metadata(path) {
            return meta.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0;
        }
        false
    }
    #[cfg(not(windows))]
    {
        fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }
}

/// Total byte size of a path, computed before deletion for accounting.
///
/// - Missing path: 0
/// - File: its length
/// - Directory: sum of regular-file lengths across the whole tree,
///   using an explicit stack instead of recursion. Unreadable entries
/// contribute 0; any error yields the partial sum obtained so far.
pub fn path_size_bytes(path: &Path) -> u64 {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(_) => return 0,
    };
    if meta.is_file() {
        return meta.len();
    }
    if !meta.is_dir() {
        return 0;
    }

    let mut total = 0u64;
    let mut dir_stack: Vec<PathBuf> = vec![path.to_path_buf()];

    while let Some(current_dir) = dir_stack.pop() {
        if is_reparse_point(&current_dir) {
            continue;
        }

        let entries = match fs::read_dir(&current_dir) {
            Ok(entries) => entries,
            Err(_) => continue, // permission denied, vanished mid-walk
        };

        for entry in entries.flatten() {
            let entry_path = entry.path();

            let meta = match fs::symlink_metadata(&entry_path) {
                Ok(m) => m,
                Err(_) => continue,
            };

            if meta.is_file() {
                total = total.saturating_add(meta.len());
            } else if meta.is_dir() && !is_reparse_point(&entry_path) {
                dir_stack.push(entry_path);
            }
        }
    }

    total
}

/// Clear the readonly bit on a single path, ignoring failures.
pub fn set_writable(path: &Path) {
    if let Ok(metadata) = fs::metadata(path) {
        let mut perms = metadata.permissions();
        if perms.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            perms.set_readonly(false);
            let _ = fs::set_permissions(path, perms);
        }
    }
}

/// Force every entry under `path` (and `path` itself) owner-writable.
///
/// Best-effort: entries that cannot be repaired are left behind and the
/// walk continues. Reparse points are repaired in place, never entered.
pub fn make_tree_writable(path: &Path) {
    set_writable(path);

    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(_) => return,
    };
    if !meta.is_dir() || is_reparse_point(path) {
        return;
    }

    let mut dir_stack: Vec<PathBuf> = vec![path.to_path_buf()];
    while let Some(current_dir) = dir_stack.pop() {
        let entries = match fs::read_dir(&current_dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let entry_path = entry.path();
            set_writable(&entry_path);
            if entry_path.is_dir() && !is_reparse_point(&entry_path) {
                dir_stack.push(entry_path);
            }
        }
    }
}
