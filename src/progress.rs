//! Spinner display for availability checks

use indicatif::{ProgressBar, ProgressStyle};

/// A steady-tick spinner with a message, used while tool availability
/// checks run. Call `finish_and_clear` before printing results.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
