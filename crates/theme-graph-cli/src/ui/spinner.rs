//! Spinner for tasks without known duration.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

use super::colors_enabled;

/// Spinner shown on stderr while a graph is being built.
///
/// Hidden automatically when stderr is not a terminal.
///
/// ```no_run
/// use theme_graph_cli::ui::Spinner;
///
/// let spinner = Spinner::new("Building theme graph...");
/// spinner.finish("Done");
/// ```
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create and start a new spinner.
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    pub fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    /// Finish with a green checkmark.
    pub fn finish(&self, message: &str) {
        let mark = if colors_enabled() {
            "✓".green().to_string()
        } else {
            "✓".to_string()
        };
        self.pb.finish_with_message(format!("{} {}", mark, message));
    }

    /// Finish with a red cross.
    pub fn fail(&self, message: &str) {
        let mark = if colors_enabled() {
            "✗".red().to_string()
        } else {
            "✗".to_string()
        };
        self.pb.finish_with_message(format!("{} {}", mark, message));
    }
}
