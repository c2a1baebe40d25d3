//! Graceful-then-forced process shutdown.
//!
//! Browser data files stay locked while the browser runs, so the
//! browser cleanup closes the common ones first: a polite `taskkill`,
//! a short wait, and `/F` only when the run was started with --force.

use crate::confirm::ConfirmPolicy;
use crate::output::Console;
use std::ffi::OsStr;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use sysinfo::System;

/// Executable names of the browsers whose data we clean.
pub const BROWSER_PROCESSES: &[&str] = &[
    "chrome.exe",
    "msedge.exe",
    "firefox.exe",
    "brave.exe",
    "opera.exe",
];

/// Close every process in `names` that is actually running.
///
/// A confirmation policy, when given, is asked once per process name;
/// a veto skips that name only.
pub fn close_processes(
    names: &[&str],
    force: bool,
    wait: Duration,
    confirm: Option<&dyn ConfirmPolicy>,
    console: &Console,
) {
    let sys = System::new_all();

    for name in names {
        if sys.processes_by_name(OsStr::new(name)).next().is_none() {
            continue;
        }

        if let Some(policy) = confirm {
            if !policy.confirm(&format!("Close processes named {}?", name), false) {
                console.verbose(&format!("Skipped closing processes: {}", name));
                continue;
            }
        }

        // Polite shutdown first; escalate only when forced.
        let _ = Command::new("taskkill")
            .args(["/IM", name])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        thread::sleep(wait);
        if force {
            let _ = Command::new("taskkill")
                .args(["/F", "/IM", name, "/T"])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
        }
    }
}
