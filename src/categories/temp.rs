//! Temp-directory enumeration.
//!
//! Produces the grouped candidate sets the interactive flow prompts
//! for: the current user's temps, every user profile's local temp,
//! service-profile temps, Windows Temp, and Prefetch. Enumeration only;
//! deletion is the engine's job.

use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

/// Candidate temp locations, grouped by the privilege they need.
#[derive(Debug, Default)]
pub struct TempGroups {
    /// %TEMP%, %TMP%, %LOCALAPPDATA%\Temp for the current user.
    pub current_user: Vec<PathBuf>,
    /// C:\Users\*\AppData\Local\Temp (requires Administrator).
    pub all_users: Vec<PathBuf>,
    /// LocalService / NetworkService temps (requires Administrator).
    pub service_profiles: Vec<PathBuf>,
    /// %WINDIR%\Temp (requires Administrator).
    pub windows_temp: Vec<PathBuf>,
    /// %WINDIR%\Prefetch (requires Administrator).
    pub prefetch: Vec<PathBuf>,
}

/// Profile directories under C:\Users that are not real user profiles.
const NON_USER_PROFILES: &[&str] = &["All Users", "Default", "Default User", "Public"];

pub fn is_real_user_profile(name: &str) -> bool {
    !NON_USER_PROFILES
        .iter()
        .any(|skip| name.eq_ignore_ascii_case(skip))
}

/// Enumerate all temp groups, deduplicating case-insensitively so the
/// same directory reached through %TEMP% and %TMP% is cleaned once.
pub fn grouped_temp_paths() -> TempGroups {
    let mut groups = TempGroups::default();
    let mut seen: HashSet<String> = HashSet::new();

    let mut add_unique = |bucket: &mut Vec<PathBuf>, path: PathBuf| {
        let key = match path.canonicalize() {
            Ok(resolved) => resolved.to_string_lossy().to_lowercase(),
            Err(_) => path.to_string_lossy().to_lowercase(),
        };
        if seen.insert(key) {
            bucket.push(path);
        }
    };

    // Current user / process temps.
    add_unique(&mut groups.current_user, env::temp_dir());
    for env_name in ["TEMP", "TMP"] {
        if let Ok(val) = env::var(env_name) {
            if !val.is_empty() {
                add_unique(&mut groups.current_user, PathBuf::from(val));
            }
        }
    }
    if let Ok(localapp) = env::var("LOCALAPPDATA") {
        add_unique(&mut groups.current_user, Path::new(&localapp).join("Temp"));
    }

    // Windows Temp and Prefetch.
    let windir = env::var("WINDIR").unwrap_or_else(|_| r"C:\Windows".to_string());
    add_unique(&mut groups.windows_temp, Path::new(&windir).join("Temp"));
    add_unique(&mut groups.prefetch, Path::new(&windir).join("Prefetch"));

    // Every user profile's local temp (covers the elevated context where
    // we can reach other users' data).
    let system_drive = env::var("SystemDrive").unwrap_or_else(|_| "C:".to_string());
    let users_root = Path::new(&system_drive).join("Users");
    if let Ok(entries) = std::fs::read_dir(&users_root) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !is_real_user_profile(&name) {
                continue;
            }
            let candidate = entry.path().join("AppData").join("Local").join("Temp");
            if candidate.exists() {
                add_unique(&mut groups.all_users, candidate);
            }
        }
    }

    // Service profile temps.
    let service_profiles = Path::new(&windir).join("ServiceProfiles");
    for svc in ["LocalService", "NetworkService"] {
        let svc_temp = service_profiles
            .join(svc)
            .join("AppData")
            .join("Local")
            .join("Temp");
        if svc_temp.exists() {
            add_unique(&mut groups.service_profiles, svc_temp);
        }
    }

    groups
}
