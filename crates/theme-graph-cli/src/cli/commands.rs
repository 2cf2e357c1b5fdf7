use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the theme graph
    ///
    /// Traverses every template and section of the theme and prints the
    /// resulting graph as JSON (or DOT with --dot).
    Build(BuildArgs),

    /// List references to files that do not exist
    ///
    /// Exits with a non-zero status when at least one dead link is found,
    /// which makes it usable as a CI check.
    DeadLinks(DeadLinksArgs),

    /// Build the graph, then update it as theme files change
    Watch(WatchArgs),
}

/// Arguments shared by every command that loads a theme
#[derive(Args, Debug, Clone, Default)]
pub struct ThemeArgs {
    /// Theme directory
    ///
    /// Defaults to the `root` from the config file, or the current directory.
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Path to a config file (defaults to ./theme-graph.config.json if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Entry point, relative to the theme root (repeatable)
    ///
    /// Overrides automatic discovery of templates and sections.
    ///
    /// Examples:
    ///   theme-graph build --entry templates/index.json
    #[arg(long = "entry", value_name = "PATH")]
    pub entry_points: Vec<String>,
}

/// Arguments for the build command
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub theme: ThemeArgs,

    /// Write the output to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Print Graphviz DOT to stdout instead of JSON
    #[arg(long, conflicts_with_all = ["json", "pretty"])]
    pub dot: bool,
}

/// Arguments for the dead-links command
#[derive(Args, Debug, Clone, Default)]
pub struct DeadLinksArgs {
    #[command(flatten)]
    pub theme: ThemeArgs,

    /// Print the dead links as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the watch command
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    #[command(flatten)]
    pub theme: ThemeArgs,

    /// Milliseconds to wait for more changes before updating the graph
    #[arg(long, value_name = "MS")]
    pub debounce: Option<u64>,
}
