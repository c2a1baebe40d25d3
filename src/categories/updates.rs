//! OS package upgrades via winget or Chocolatey.
//!
//! winget is preferred; Chocolatey is the fallback. The package manager
//! owns its own output and exit handling — its failure never fails the
//! cleanup run.

use crate::output::Console;
use crate::theme::Theme;
use std::process::{Command, Stdio};

fn command_exists(name: &str) -> bool {
    Command::new(name)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Run `winget upgrade --all` (or `choco upgrade all -y`) interactively.
pub fn run_upgrades(dry_run: bool, console: &Console) {
    if dry_run {
        console.info(&Theme::muted(
            "(dry-run) Would run package upgrades (winget/choco)",
        ));
        return;
    }

    if command_exists("winget") {
        console.info(&Theme::accent("Running: winget upgrade --all ..."));
        let _ = Command::new("winget")
            .args([
                "upgrade",
                "--all",
                "--accept-package-agreements",
                "--accept-source-agreements",
            ])
            .status();
    } else if command_exists("choco") {
        console.info(&Theme::accent("Running: choco upgrade all -y ..."));
        let _ = Command::new("choco").args(["upgrade", "all", "-y"]).status();
    } else {
        console.info(&Theme::warning(
            "No package manager found (winget/choco). Skipping upgrade.",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_command_is_detected() {
        assert!(!command_exists("wincare-no-such-package-manager"));
    }

    #[test]
    fn test_dry_run_spawns_nothing() {
        let console = Console::quiet();
        run_upgrades(true, &console);
    }
}
