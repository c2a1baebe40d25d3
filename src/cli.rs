use anyhow::{bail, Result};
use clap::{ArgAction, Parser};
use std::env;
use std::path::PathBuf;

use crate::categories::{browser, prefetch, recycle_bin, temp, updates};
use crate::cleaner::Cleaner;
use crate::config::Config;
use crate::confirm::{prompt_yes_no, AssumeAnswer, ConfirmPolicy, InteractivePrompt};
use crate::elevation;
use crate::filter::PathFilter;
use crate::output::{self, Console, OutputMode};
use crate::progress;
use crate::stats::{self, RunStats};
use crate::theme::Theme;

#[derive(Parser)]
#[command(name = "wincare")]
#[command(version)]
#[command(about = "Interactive Windows cleanup: temp files, browser data, Recycle Bin, updates")]
#[command(
    long_about = "wincare walks through the common cleanup targets one question at a time: \
    temp directories, Prefetch, browser caches and history, the Recycle Bin, and \
    winget/choco package upgrades.\n\n\
    Examples:\n  \
    wincare                              # Interactive run\n  \
    wincare --yes --dry-run              # Show everything that would be deleted\n  \
    wincare --older-than 7 --exclude *.log\n  \
    wincare --yes --json report.json     # Unattended run with a JSON report"
)]
pub struct Cli {
    /// Name to display in the header (defaults to %USERNAME%)
    #[arg(long, value_name = "NAME")]
    pub owner_name: Option<String>,

    /// Assume yes for all prompts
    #[arg(long)]
    pub yes: bool,

    /// Assume no for all prompts
    #[arg(long, conflicts_with = "yes")]
    pub no: bool,

    /// Skip clearing browser data
    #[arg(long)]
    pub no_browser: bool,

    /// Skip package upgrades
    #[arg(long)]
    pub no_upgrade: bool,

    /// Do not delete anything; just show intended actions
    #[arg(long)]
    pub dry_run: bool,

    /// Force-kill browsers that do not close politely
    #[arg(long)]
    pub force: bool,

    /// Only delete items older than DAYS
    #[arg(long, value_name = "DAYS")]
    pub older_than: Option<i64>,

    /// Glob pattern to exclude (can repeat)
    #[arg(long, value_name = "GLOB", action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Write a JSON summary report to PATH
    #[arg(long = "json", value_name = "PATH")]
    pub json_report: Option<PathBuf>,

    /// Append plaintext logs to PATH
    #[arg(long = "log", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Quiet mode (errors and summary only)
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase output verbosity (-v, -vv for more)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Prompt yes/no before each individual action
    #[arg(long)]
    pub confirm_each: bool,

    /// Internal marker set after an elevated relaunch
    #[arg(long, hide = true)]
    pub elevated: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        if !cfg!(windows) {
            bail!("wincare only supports Windows.");
        }

        let mode = OutputMode::from_flags(self.quiet, self.verbose);
        let console = Console::new(mode, self.log_file.clone());

        let owner = self
            .owner_name
            .clone()
            .or_else(|| env::var("USERNAME").ok())
            .unwrap_or_else(|| "User".to_string());
        if mode != OutputMode::Quiet {
            output::print_header(&owner);
        }

        let assume_answer = if self.yes {
            Some(true)
        } else if self.no {
            Some(false)
        } else {
            None
        };

        let mut config = Config::load();
        config.apply_cli_overrides(self.older_than, &self.exclude);
        let options = config.run_options(self.dry_run, self.confirm_each, assume_answer, self.force);

        if !options.exclude_patterns.is_empty() {
            console.verbose(&format!(
                "Excluding patterns: {:?}",
                options.exclude_patterns
            ));
        }
        if let Some(days) = options.older_than_days {
            console.info(&Theme::muted(&format!(
                "Deleting only items older than {} day(s)",
                days
            )));
        }

        let filter = PathFilter::new(&options.exclude_patterns, options.older_than_days);

        let per_action: Option<Box<dyn ConfirmPolicy>> = if options.confirm_each {
            Some(match options.assume_answer {
                Some(answer) => Box::new(AssumeAnswer(answer)),
                None => Box::new(InteractivePrompt),
            })
        } else {
            None
        };

        let mut cleaner = Cleaner::new(&filter, &console, options.dry_run);
        if let Some(policy) = per_action.as_deref() {
            cleaner = cleaner.with_confirm(policy);
        }

        let mut run_stats = RunStats::default();
        let groups = temp::grouped_temp_paths();

        console.info(&Theme::value("Cleanup options:"));

        // 1) Current user temp — no elevation needed.
        if prompt_yes_no(
            "Clean CURRENT user's TEMP directories (%TEMP%, %TMP%, %LOCALAPPDATA%\\Temp)?",
            false,
            assume_answer,
        ) {
            let pb = progress::create_spinner("Cleaning CURRENT user temp ...");
            for path in &groups.current_user {
                console.verbose(&format!(" -> {}", path.display()));
                cleaner.remove_contents(path, &mut run_stats);
            }
            pb.finish_and_clear();
        } else {
            console.info(&Theme::muted("Skipped CURRENT user's TEMP."));
        }

        // 2) All users' local temps.
        if prompt_yes_no(
            "Clean ALL USERS' Local Temp directories (C:\\Users\\*\\AppData\\Local\\Temp)?",
            true,
            assume_answer,
        ) {
            if self.needs_elevation(options.dry_run) {
                return self.request_elevation(&console, "ALL USERS' Local Temp");
            }
            let pb = progress::create_spinner("Cleaning ALL users' temp ...");
            for path in &groups.all_users {
                console.verbose(&format!(" -> {}", path.display()));
                cleaner.remove_contents(path, &mut run_stats);
            }
            pb.finish_and_clear();
        } else {
            console.info(&Theme::muted("Skipped ALL USERS' Local Temp."));
        }

        // 3) Service profile temps.
        if prompt_yes_no(
            "Clean SERVICE profiles Temp (LocalService/NetworkService)?",
            true,
            assume_answer,
        ) {
            if self.needs_elevation(options.dry_run) {
                return self.request_elevation(&console, "SERVICE profiles Temp");
            }
            let pb = progress::create_spinner("Cleaning service profiles temp ...");
            for path in &groups.service_profiles {
                console.verbose(&format!(" -> {}", path.display()));
                cleaner.remove_contents(path, &mut run_stats);
            }
            pb.finish_and_clear();
        } else {
            console.info(&Theme::muted("Skipped SERVICE profiles Temp."));
        }

        // 4) Windows Temp.
        if prompt_yes_no("Clean WINDOWS Temp (C:\\Windows\\Temp)?", false, assume_answer) {
            if self.needs_elevation(options.dry_run) {
                return self.request_elevation(&console, "WINDOWS Temp");
            }
            let pb = progress::create_spinner("Cleaning Windows temp ...");
            for path in &groups.windows_temp {
                console.verbose(&format!(" -> {}", path.display()));
                cleaner.remove_contents(path, &mut run_stats);
            }
            pb.finish_and_clear();
        } else {
            console.info(&Theme::muted("Skipped WINDOWS Temp."));
        }

        // 5) Prefetch.
        if prompt_yes_no("Clean PREFETCH (.pf files)?", true, assume_answer) {
            if self.needs_elevation(options.dry_run) {
                return self.request_elevation(&console, "PREFETCH");
            }
            let pb = progress::create_spinner("Cleaning Prefetch (.pf) ...");
            for path in &groups.prefetch {
                console.verbose(&format!(" -> {}", path.display()));
                prefetch::clean(path, &cleaner, &mut run_stats);
            }
            pb.finish_and_clear();
        } else {
            console.info(&Theme::muted("Skipped PREFETCH."));
        }

        // 6) Browser caches and history.
        let run_browser = !self.no_browser
            && prompt_yes_no(
                "Clear browser caches and history (Chrome/Edge/Firefox)?",
                true,
                assume_answer,
            );
        if run_browser {
            console.info(&Theme::accent("Clearing browser data..."));
            browser::clean(&cleaner, &mut run_stats, &options, &console);
        } else {
            console.info(&Theme::muted("Skipped clearing browser data."));
        }

        // 7) Recycle Bin.
        if prompt_yes_no("Empty Recycle Bin for all drives?", false, assume_answer) {
            console.info(&Theme::accent("Emptying Recycle Bin..."));
            if let Err(err) = recycle_bin::empty(options.dry_run, &console) {
                console.warn(&format!("Could not empty the Recycle Bin: {err}"));
            }
        } else {
            console.info(&Theme::muted("Skipped emptying Recycle Bin."));
        }

        // 8) Package upgrades.
        let run_upgrades = !self.no_upgrade
            && prompt_yes_no(
                "Run system package upgrades via winget/choco?",
                false,
                assume_answer,
            );
        if run_upgrades {
            updates::run_upgrades(options.dry_run, &console);
        } else {
            console.info(&Theme::muted("Skipped package upgrades."));
        }

        // Final summary — printed even in quiet mode.
        println!("{}", Theme::success("All done."));
        println!("{}", Theme::muted(&run_stats.summary()));

        if let Some(report_path) = &self.json_report {
            match stats::write_report(report_path, &run_stats, &options) {
                Ok(path) => console.info(&Theme::muted(&format!(
                    "JSON report written to {}",
                    path.display()
                ))),
                Err(_) => console.warn("Failed to write JSON report."),
            }
        }

        Ok(())
    }

    fn needs_elevation(&self, dry_run: bool) -> bool {
        !dry_run && !elevation::is_admin() && !self.elevated
    }

    /// Relaunch elevated, forwarding our arguments plus the internal
    /// marker; the current process then winds down.
    fn request_elevation(&self, console: &Console, what: &str) -> Result<()> {
        console.info(&format!(
            "Administrator privileges are required to clean {}. Requesting elevation...",
            what
        ));
        let mut args: Vec<String> = env::args().skip(1).collect();
        if !args.iter().any(|arg| arg == "--elevated") {
            args.push("--elevated".to_string());
        }
        elevation::relaunch_as_admin(&args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exclude_is_repeatable() {
        let cli = Cli::parse_from([
            "wincare",
            "--exclude",
            "*.log",
            "--exclude",
            "*.tmp",
            "--older-than",
            "7",
        ]);
        assert_eq!(cli.exclude, vec!["*.log", "*.tmp"]);
        assert_eq!(cli.older_than, Some(7));
    }

    #[test]
    fn test_yes_and_no_conflict() {
        assert!(Cli::try_parse_from(["wincare", "--yes", "--no"]).is_err());
    }

    #[test]
    fn test_hidden_elevated_marker_parses() {
        let cli = Cli::parse_from(["wincare", "--elevated", "--dry-run"]);
        assert!(cli.elevated);
        assert!(cli.dry_run);
    }
}
