//! Dead-links command implementation.
//!
//! Lists every referenced file that does not exist, with the places that
//! reference it, and fails when there is at least one.

use crate::cli::DeadLinksArgs;
use crate::commands::utils::Theme;
use crate::config::ConfigOverrides;
use crate::error::{CliError, Result};
use crate::ui;
use std::fmt::Write as _;
use theme_graph::{DeadLink, Uri};

pub async fn execute(args: DeadLinksArgs) -> Result<()> {
    let theme = Theme::load(&args.theme, ConfigOverrides::from_theme_args(&args.theme))?;
    let graph = theme.build().await;
    let dead_links = graph.dead_links();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dead_links)?);
    } else if dead_links.is_empty() {
        ui::success("No dead links");
    } else {
        print!("{}", format_dead_links(&dead_links, &theme.root_uri));
    }

    if dead_links.is_empty() {
        Ok(())
    } else {
        Err(CliError::DeadLinks(dead_links.len()))
    }
}

/// Human-readable report, paths relative to `root`.
///
/// ```text
/// snippets/missing.liquid
///   referenced by sections/main.liquid [12..40]
/// ```
pub fn format_dead_links(dead_links: &[DeadLink], root: &Uri) -> String {
    let mut out = String::new();
    for dead_link in dead_links {
        let _ = writeln!(out, "{}", display_path(&dead_link.uri, root));
        for location in &dead_link.referenced_by {
            let _ = match location.range {
                Some(range) => writeln!(
                    out,
                    "  referenced by {} [{}..{}]",
                    display_path(&location.uri, root),
                    range.start,
                    range.end
                ),
                None => writeln!(out, "  referenced by {}", display_path(&location.uri, root)),
            };
        }
    }
    out
}

fn display_path<'a>(uri: &'a Uri, root: &Uri) -> &'a str {
    uri.relative_to(root).unwrap_or(uri.as_str())
}
