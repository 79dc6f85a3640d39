//! Progress display for record processing

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

use super::format_duration;

const BAR_TEMPLATE: &str = "{spinner:.cyan} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})";

/// Progress over a known number of records. Hidden in quiet mode.
pub struct ProgressReporter {
    bar: ProgressBar,
    started: Instant,
}

impl ProgressReporter {
    pub fn new(total: usize, message: impl Into<String>, visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        // the template is a constant; fall back to the default style if it
        // is ever rejected
        if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(message.into());

        Self {
            bar,
            started: Instant::now(),
        }
    }

    /// Clonable handle for worker threads
    pub fn handle(&self) -> ProgressBar {
        self.bar.clone()
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clears the bar and returns the elapsed time, formatted
    pub fn finish(self) -> String {
        self.bar.finish_and_clear();
        format_duration(self.started.elapsed())
    }
}
