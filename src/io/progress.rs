//! Progress display for a generation run

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static EDITION_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] {{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks editions created and duplicate draws rejected during a run
pub struct ProgressManager {
    bar: ProgressBar,
    duplicates: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a hidden progress manager; call [`Self::initialize`] to show it
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            duplicates: 0,
        }
    }

    /// Show a bar for the whole collection
    pub fn initialize(&mut self, total_supply: usize) {
        let bar = ProgressBar::new(total_supply as u64);
        bar.set_style(EDITION_STYLE.clone());
        self.bar = bar;
        self.duplicates = 0;
    }

    /// Label the bar with the phase being generated
    pub fn start_phase(&self, phase_index: usize, phase_count: usize) {
        self.bar
            .set_prefix(format!("phase {}/{phase_count}", phase_index + 1));
    }

    /// Record a created edition
    pub fn edition_created(&self, edition: usize) {
        self.bar.inc(1);
        self.bar.set_message(format!("#{edition}"));
    }

    /// Record rejected duplicate draws
    pub fn duplicates_rejected(&mut self, count: usize) {
        self.duplicates += count;
    }

    /// Duplicates rejected so far
    pub const fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Editions reported so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Close the bar with a summary
    pub fn finish(&self) {
        self.bar.finish_with_message(format!(
            "done ({} duplicate draws rejected)",
            self.duplicates
        ));
    }

    /// Close the bar after a failed run
    pub fn abandon(&self) {
        self.bar.abandon_with_message("aborted");
    }
}
