//! Command-line front end for `theme-graph`.
//!
//! Builds the dependency graph of a theme directory, reports dead links, and
//! keeps a graph up to date while watching a theme for changes.
//!
//! # Architecture
//!
//! - [`cli`] - argument definitions (clap derive)
//! - [`commands`] - one module per subcommand, each exposing `execute`
//! - [`config`] - `theme-graph.config.json`, environment and CLI merging
//! - [`error`] - error types and their conversion to miette reports
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal output helpers
//! - [`watcher`] - debounced file watching
//!
//! # Example
//!
//! ```rust,no_run
//! use theme_graph_cli::{config::ThemeGraphConfig, error::Result};
//!
//! fn main() -> Result<()> {
//!     let config = ThemeGraphConfig::load(&Default::default(), None)?;
//!     println!("theme root: {}", config.root.display());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;
pub mod watcher;

pub use error::{CliError, ConfigError, Result, ResultExt};
