//! Command-line interface definition.
//!
//! # Command Structure
//!
//! - `theme-graph build` - build the graph and print it as JSON or DOT
//! - `theme-graph dead-links` - list references to missing files
//! - `theme-graph watch` - keep the graph up to date while files change

mod commands;

use clap::Parser;

pub use commands::{BuildArgs, Command, DeadLinksArgs, ThemeArgs, WatchArgs};

/// Dependency graph of a Liquid storefront theme
#[derive(Parser, Debug)]
#[command(
    name = "theme-graph",
    version,
    about = "Dependency graph of a Liquid storefront theme",
    long_about = "Builds the graph of references between the templates, sections, blocks,\n\
                  snippets, layouts and assets of a theme, reports references to files\n\
                  that do not exist, and keeps the graph current while the theme changes."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
