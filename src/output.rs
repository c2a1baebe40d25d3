//! Console output and the optional plaintext run log.

use crate::theme::Theme;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,   // errors and the final summary only
    Normal,  // standard output
    Verbose, // per-path detail
}

impl OutputMode {
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            OutputMode::Quiet
        } else if verbose > 0 {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

/// Console sink shared across the run.
///
/// Messages are printed according to the verbosity mode and, when a log
/// file was requested, appended there with a timestamp regardless of
/// verbosity. Log-file failures are ignored; logging must never break a
/// cleanup run.
#[derive(Debug)]
pub struct Console {
    mode: OutputMode,
    log_file: Option<PathBuf>,
}

impl Console {
    pub fn new(mode: OutputMode, log_file: Option<PathBuf>) -> Self {
        Self { mode, log_file }
    }

    /// Silent console for tests and library callers.
    pub fn quiet() -> Self {
        Self::new(OutputMode::Quiet, None)
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Normal-level message.
    pub fn info(&self, message: &str) {
        if self.mode != OutputMode::Quiet {
            println!("{}", message);
        }
        self.append_log(message);
    }

    /// Verbose-level message (per-path detail).
    pub fn verbose(&self, message: &str) {
        if self.mode == OutputMode::Verbose {
            println!("{}", message);
        }
        self.append_log(message);
    }

    /// Warning, always shown on stderr.
    pub fn warn(&self, message: &str) {
        eprintln!("{}", Theme::warning(message));
        self.append_log(message);
    }

    fn append_log(&self, message: &str) {
        let Some(path) = &self.log_file else {
            return;
        };
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{} \t {}", Local::now().to_rfc3339(), message);
        }
    }
}

/// Banner printed at the top of an interactive run.
pub fn print_header(owner_name: &str) {
    let title = "wincare";
    let subtitle = "Cleanup - Privacy - Updates";
    let width = 46;

    println!("{}", Theme::accent(&format!("╔{}╗", "═".repeat(width))));
    println!(
        "{}{}{}{}",
        Theme::accent("║ "),
        Theme::value(title),
        " ".repeat(width - title.len() - 1),
        Theme::accent("║")
    );
    println!(
        "{}{}{}{}",
        Theme::accent("║ "),
        Theme::muted(subtitle),
        " ".repeat(width - subtitle.len() - 1),
        Theme::accent("║")
    );
    println!("{}", Theme::accent(&format!("╚{}╝", "═".repeat(width))));
    println!("{}", Theme::owner(&format!("Owner: {}", owner_name)));
    println!("{}", Theme::divider(10));
}
