//! Formatting for durations and graph summaries.

use owo_colors::OwoColorize;
use std::time::Duration;
use theme_graph::ThemeGraph;

use super::colors_enabled;

/// Format a duration as `50ms`, `1.50s` or `2m 5s`.
///
/// ```
/// use std::time::Duration;
/// use theme_graph_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// One-line description of a graph's size.
pub(crate) fn graph_summary(graph: &ThemeGraph) -> String {
    format!(
        "{} modules, {} references, {} entry points, {} dead links",
        graph.module_count(),
        graph.edge_count(),
        graph.entry_points().len(),
        graph.dead_links().len()
    )
}

/// Print the graph summary and the time it took to stderr.
pub fn print_graph_summary(graph: &ThemeGraph, elapsed: Duration) {
    let summary = graph_summary(graph);
    let elapsed = format_duration(elapsed);
    if colors_enabled() {
        eprintln!("  {} {} {}", "▸".blue(), summary.bold(), format!("({})", elapsed).dimmed());
    } else {
        eprintln!("  ▸ {} ({})", summary, elapsed);
    }
}
