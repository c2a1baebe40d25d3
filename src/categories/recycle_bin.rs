//! Recycle Bin operations.
//!
//! The `trash` crate drives the Shell APIs, which use COM on Windows.
//! If COM is already initialized on this thread with a different
//! concurrency model the crate can panic (`CoInitializeEx` with
//! `RPC_E_CHANGED_MODE`); panics from the dependency are converted to
//! errors so the run continues with a useful message. When the Shell
//! route fails entirely, a PowerShell fallback gets one try.

use crate::output::Console;
use anyhow::{anyhow, Result};
use std::any::Any;
use std::process::{Command, Stdio};

fn panic_payload_to_string(panic_payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn catch_trash_panic<R>(f: impl FnOnce() -> Result<R>) -> Result<R> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(r) => r,
        Err(panic_payload) => {
            let msg = panic_payload_to_string(panic_payload);
            Err(anyhow!(
                "Recycle Bin operation panicked (dependency bug): {msg}"
            ))
        }
    }
}

#[cfg(any(windows, target_os = "linux", target_os = "freebsd"))]
fn purge_all_items() -> Result<usize> {
    catch_trash_panic(|| {
        let items = trash::os_limited::list()?;
        let count = items.len();
        if count > 0 {
            trash::os_limited::purge_all(&items)?;
        }
        Ok(count)
    })
}

#[cfg(not(any(windows, target_os = "linux", target_os = "freebsd")))]
fn purge_all_items() -> Result<usize> {
    Err(anyhow!("Recycle Bin purge is not supported on this platform"))
}

/// Empty the Recycle Bin for all drives. Best-effort: a failure is
/// reported, never propagated as fatal.
pub fn empty(dry_run: bool, console: &Console) -> Result<()> {
    if dry_run {
        console.info("(dry-run) Would empty the Recycle Bin");
        return Ok(());
    }

    match purge_all_items() {
        Ok(0) => {
            console.verbose("Recycle Bin is already empty");
            Ok(())
        }
        Ok(count) => {
            console.verbose(&format!("Purged {} Recycle Bin item(s)", count));
            Ok(())
        }
        Err(err) => {
            console.verbose(&format!(
                "Shell purge failed ({err}); trying PowerShell fallback"
            ));
            empty_via_powershell()
        }
    }
}

fn empty_via_powershell() -> Result<()> {
    let status = Command::new("powershell")
        .args([
            "-NoProfile",
            "-Command",
            "Clear-RecycleBin -Force -ErrorAction SilentlyContinue",
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| anyhow!("Failed to launch PowerShell: {e}"))?;

    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("Clear-RecycleBin exited with {status}"))
    }
}
