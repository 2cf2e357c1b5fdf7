//! File-system abstraction for theme graphs.
//!
//! The graph never touches `std::fs` directly. It goes through [`FileSystem`],
//! which the native runtime implements over the OS and tests implement in memory.
//! Editors can plug in their own implementation to serve unsaved buffers.

pub mod native;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use async_trait::async_trait;

use crate::uri::Uri;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(Uri),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Other runtime error
    #[error("Runtime error: {0}")]
    Other(String),
}

/// Entry type returned by [`FileSystem::read_directory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    File,
    Directory,
}

/// Platform file access used by the dependency contract.
#[async_trait]
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Whether a file exists at `uri`. Never fails.
    async fn exists(&self, uri: &Uri) -> bool;

    /// Read a file as UTF-8 text.
    async fn read_file(&self, uri: &Uri) -> RuntimeResult<String>;

    /// List the direct children of a directory.
    async fn read_directory(&self, uri: &Uri) -> RuntimeResult<Vec<(Uri, FileKind)>>;
}

#[async_trait]
impl<T: FileSystem + ?Sized> FileSystem for std::sync::Arc<T> {
    async fn exists(&self, uri: &Uri) -> bool {
        (**self).exists(uri).await
    }

    async fn read_file(&self, uri: &Uri) -> RuntimeResult<String> {
        (**self).read_file(uri).await
    }

    async fn read_directory(&self, uri: &Uri) -> RuntimeResult<Vec<(Uri, FileKind)>> {
        (**self).read_directory(uri).await
    }
}
