//! Spinner animation frames shared by the progress helpers.

/// Braille-style spinner frames, matching indicatif's default tick set.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frames as a single string for `ProgressStyle::tick_chars`.
pub fn spinner_chars() -> &'static str {
    "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_chars_matches_frames() {
        let expected: String = SPINNER_FRAMES.iter().copied().collect();
        assert_eq!(spinner_chars(), expected);
    }
}
