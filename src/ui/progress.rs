use indicatif::{ProgressBar, ProgressStyle};

use crate::orchestrator::AiProgress;

/// Renders [`AiProgress`] events as a terminal progress bar
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Creates a hidden-until-first-event bar
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    /// Applies one event; the total may change between events
    pub fn on_event(&self, event: &AiProgress) {
        self.bar.set_length(event.total as u64);
        self.bar.set_position(event.current as u64);
        self.bar.set_message(event.message.clone());
    }

    /// Clears the bar once the run is over
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}
