//! # theme-graph
//!
//! Cross-file dependency graph for Liquid storefront themes.
//!
//! A theme is a folder of templates, sections, blocks, snippets, layouts and
//! assets that reference each other by name. This crate discovers those
//! references, including the indirect ones introduced by section and block
//! schemas, and keeps the resulting graph consistent as files change.
//!
//! ## Overview
//!
//! ```text
//!   build ──► resolver ──► traverse ──► ThemeGraph ◄── update
//!                             │                          │
//!                             └──── Dependencies ◄───────┘
//!                                   (files, sources, schemas)
//! ```
//!
//! - [`ThemeGraph`]: arena of [`ThemeModule`]s and [`Reference`] edges.
//! - [`resolver`]: maps URIs to modules and owns the theme naming convention.
//! - [`traversal::traverse`]: visits a module and everything it references.
//! - [`build`]: discovers entry points and traverses them.
//! - [`update`]: applies create/change/delete/rename operations incrementally.
//! - [`Dependencies`]: everything the graph needs from its environment.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use theme_graph::{NativeFileSystem, build_from_path};
//!
//! # async fn run() -> theme_graph::Result<()> {
//! let graph = build_from_path("./my-theme", NativeFileSystem::new()).await?;
//!
//! for dead_link in graph.dead_links() {
//!     println!("{} is missing", dead_link.uri);
//! }
//! println!("{}", graph.to_json(true)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure model
//!
//! Theme content never makes a build or an update fail. A file that cannot be
//! read or parsed simply contributes no edges, and a reference to a missing file
//! is kept as a dead link (`exists == Some(false)`). A theme in the middle of
//! an edit is expected to be transiently broken.
//!
//! ## Concurrency
//!
//! Sibling references are traversed concurrently within one task. Graph locks
//! are only held in synchronous sections. Updates assume a single writer per
//! graph.

pub mod builder;
pub mod dependencies;
pub mod graph;
pub mod module;
pub mod reference;
pub mod resolver;
pub mod runtime;
pub mod schema;
pub mod source;
pub mod traversal;
pub mod updater;
pub mod uri;

#[cfg(test)]
mod tests;

pub use builder::{build, build_from_path, discover_entry_points};
pub use dependencies::{Dependencies, PassCache, ThemeDependencies, WebComponentDefinition};
pub use graph::{DeadLink, SerializableGraph, SerializableNode, ThemeGraph, serialize};
pub use module::{JsonKind, LiquidKind, ModuleKind, ModuleType, ThemeModule};
pub use reference::{BindOptions, Location, Range, Reference, ReferenceId, ReferenceType};
pub use runtime::native::NativeFileSystem;
pub use runtime::{FileKind, FileSystem, RuntimeError, RuntimeResult};
pub use schema::{SchemaError, ThemeSchema};
pub use source::{ParseError, SourceAst, SourceCode};
pub use updater::{UpdateOperation, UpdateOutcome, update};
pub use uri::{Uri, UriError};

#[cfg(any(test, feature = "test-utils"))]
pub use runtime::test_utils::MemoryFileSystem;

/// Errors from the graph's public entry points.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("invalid theme URI: {0}")]
    InvalidUri(#[from] UriError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
