//! Progress bar utilities.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Create a spinner for long-running operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Create a progress bar mirroring one result's download indicator.
///
/// The bar starts at length 100 (percent); tracked transfers with a known
/// size switch it to bytes. Hidden bars draw nothing.
pub fn create_download_bar(label: &str, hidden: bool) -> ProgressBar {
    let bar = ProgressBar::new(100);
    if hidden {
        bar.set_draw_target(ProgressDrawTarget::hidden());
    }
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix} [{bar:40.cyan/blue}] {percent}% {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    bar.set_prefix(label.to_string());
    bar
}
