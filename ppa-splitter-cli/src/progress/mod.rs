//! Per-file progress bar

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress over the corpus files of one run; hidden when quiet
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a reporter for `total_files`, drawing nothing when `hidden`
    pub fn new(total_files: u64, hidden: bool) -> Self {
        if hidden {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total_files);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] {bar:30} {pos}/{len} corpora {wide_msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
        );
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar: Some(bar) }
    }

    /// Run `f` with the bar hidden, so its output is not drawn over
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    /// Mark `filename` as dispatched
    pub fn file_completed(&self, filename: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(filename.to_string());
            bar.inc(1);
        }
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
