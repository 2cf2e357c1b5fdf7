//! Command implementations.
//!
//! - [`build`] - build the graph and print it
//! - [`dead_links`] - report references to missing files
//! - [`watch`] - keep the graph current while files change
//!
//! Each command provides an `execute` function that takes its parsed
//! arguments and returns a Result.

pub mod build;
pub mod dead_links;
pub(crate) mod utils;
pub mod watch;

pub use build::execute as build_execute;
pub use dead_links::execute as dead_links_execute;
pub use watch::execute as watch_execute;
