//! Progress display built on indicatif.
//!
//! Display-only: a spinner animates on its own thread while a category
//! is cleaned, but it touches no deletion state.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::spinner;

/// Create a spinner for indeterminate progress.
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars(spinner::spinner_chars())
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
