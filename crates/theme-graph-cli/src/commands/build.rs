//! Build command implementation.

use crate::cli::BuildArgs;
use crate::commands::utils::Theme;
use crate::config::ConfigOverrides;
use crate::error::{Result, ResultExt};
use crate::ui;
use theme_graph::ThemeGraph;

/// Execute the build command.
///
/// 1. Load configuration and locate the theme root
/// 2. Build the graph
/// 3. Print it to stdout, or write it to `--json PATH`
pub async fn execute(args: BuildArgs) -> Result<()> {
    let overrides = ConfigOverrides::from_theme_args(&args.theme).with_pretty(args.pretty);
    let theme = Theme::load(&args.theme, overrides)?;
    let graph = theme.build().await;

    let output = render(&graph, args.dot, theme.config.pretty)?;
    match &args.json {
        Some(path) => {
            std::fs::write(path, output)
                .context(format!("Failed to write graph to {}", path.display()))?;
            ui::success(&format!("Wrote graph to {}", path.display()));
        }
        None => println!("{output}"),
    }

    let dead_links = graph.dead_links().len();
    if dead_links > 0 {
        ui::warning(&format!(
            "{dead_links} dead link(s), run `theme-graph dead-links` for details"
        ));
    }
    Ok(())
}

/// Serialize `graph` as DOT or JSON.
pub fn render(graph: &ThemeGraph, dot: bool, pretty: bool) -> Result<String> {
    if dot {
        Ok(graph.to_dot_format())
    } else {
        Ok(graph.to_json(pretty)?)
    }
}
