//! Terminal output helpers.
//!
//! Status messages and spinners go to stderr so that stdout stays free for
//! machine-readable output such as the serialized graph.
//!
//! # Examples
//!
//! ```no_run
//! use theme_graph_cli::ui;
//!
//! ui::init_colors();
//!
//! let spinner = ui::Spinner::new("Building theme graph...");
//! spinner.finish("Built 42 modules");
//!
//! ui::warning("2 dead links");
//! ```

mod format;
mod messages;
mod spinner;

pub use format::{format_duration, print_graph_summary};
pub use messages::{error, info, success, warning};
pub use spinner::Spinner;

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Initialize color support based on environment.
///
/// Status messages and spinners check this flag before painting.
pub fn init_colors() {
    console::set_colors_enabled_stderr(should_use_color());
}

pub(crate) fn colors_enabled() -> bool {
    console::colors_enabled_stderr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_should_use_color_no_color() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::remove_var("FORCE_COLOR");
        }
        assert!(!should_use_color());
        unsafe {
            std::env::remove_var("NO_COLOR");
        }
    }

    #[test]
    #[serial]
    fn test_should_use_color_force_color() {
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(should_use_color());
        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
    }
}
