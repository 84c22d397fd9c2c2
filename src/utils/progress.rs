//! Progress indicators for terminal feedback during network operations.
//!
//! Wraps [`indicatif`] spinners with consistent styling and an escape hatch
//! for automation: setting the `UPDRAFT_NO_PROGRESS` environment variable to
//! any value replaces every spinner with a hidden no-op, so scripts and CI
//! logs stay clean while interactive runs get animated feedback.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::time::Duration;

/// Checks if progress indicators should be disabled.
///
/// Spinners are disabled when the `UPDRAFT_NO_PROGRESS` environment variable
/// is set to any value. The `--no-progress` CLI flag sets it.
fn is_progress_disabled() -> bool {
    std::env::var("UPDRAFT_NO_PROGRESS").is_ok()
}

/// A spinner for indeterminate operations such as release listing and
/// archive downloads.
///
/// # Examples
///
/// ```rust,no_run
/// use updraft::utils::progress::ProgressBar;
///
/// let spinner = ProgressBar::new_spinner();
/// spinner.set_message("Checking for updates...");
/// // ... network call ...
/// spinner.finish_and_clear();
/// ```
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a spinner, or a hidden bar when progress is disabled.
    #[must_use]
    pub fn new_spinner() -> Self {
        let inner = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };

        Self {
            inner,
        }
    }

    /// Updates the message shown next to the spinner.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Stops the spinner, leaving the final message visible.
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    /// Stops the spinner and erases it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}
