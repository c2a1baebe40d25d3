//! Per-action confirmation as an injectable policy.
//!
//! The deletion engine never talks to stdin directly; it asks whatever
//! `ConfirmPolicy` it was given. The interactive policy blocks on the
//! console, the fixed policy answers immediately (used by --yes/--no and
//! by tests).

use std::io::{self, BufRead, Write};

/// Answers "may I perform this action?" for the engine.
pub trait ConfirmPolicy {
    /// Return true to proceed. `default_no` selects the answer taken
    /// when the user just presses Enter.
    fn confirm(&self, action: &str, default_no: bool) -> bool;
}

/// Fixed answer, for --yes / --no and non-interactive runs.
pub struct AssumeAnswer(pub bool);

impl ConfirmPolicy for AssumeAnswer {
    fn confirm(&self, _action: &str, _default_no: bool) -> bool {
        self.0
    }
}

/// Blocking console prompt. A read failure (EOF, redirected stdin gone,
/// interrupt) answers "no" so a broken prompt can never approve work.
pub struct InteractivePrompt;

impl ConfirmPolicy for InteractivePrompt {
    fn confirm(&self, action: &str, default_no: bool) -> bool {
        let suffix = if default_no { " [y/N]: " } else { " [Y/n]: " };
        print!("{}{}", action, suffix);

        match read_line_from_stdin() {
            Ok(input) => {
                let trimmed = input.trim().to_lowercase();
                if trimmed.is_empty() {
                    !default_no
                } else {
                    trimmed == "y" || trimmed == "yes"
                }
            }
            Err(_) => false,
        }
    }
}

/// Read a line from stdin, taking a fresh handle each time.
///
/// On Windows a terminal that loses and regains focus can leave a stale
/// locked handle behind; re-locking per read avoids that.
fn read_line_from_stdin() -> io::Result<String> {
    io::stdout().flush()?;

    let mut input = String::new();
    let stdin = io::stdin();
    let mut handle = stdin.lock();
    handle.read_line(&mut input)?;

    Ok(input)
}

/// Top-level yes/no question honoring --yes/--no.
pub fn prompt_yes_no(question: &str, default_no: bool, assume_answer: Option<bool>) -> bool {
    match assume_answer {
        Some(answer) => answer,
        None => InteractivePrompt.confirm(question, default_no),
    }
}
