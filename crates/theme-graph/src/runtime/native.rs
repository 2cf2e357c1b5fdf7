//! Native file-system runtime.
//!
//! Wraps `std::fs` behind [`FileSystem`]. Blocking calls run on tokio's
//! blocking pool so they never stall the traversal's cooperative scheduling.

use async_trait::async_trait;
use tokio::task;

use super::{FileKind, FileSystem, RuntimeError, RuntimeResult};
use crate::uri::Uri;

/// [`FileSystem`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn join_error(e: task::JoinError) -> RuntimeError {
    RuntimeError::Other(format!("Task join error: {}", e))
}

#[async_trait]
impl FileSystem for NativeFileSystem {
    async fn exists(&self, uri: &Uri) -> bool {
        let path = uri.to_path();
        task::spawn_blocking(move || path.is_file())
            .await
            .unwrap_or(false)
    }

    async fn read_file(&self, uri: &Uri) -> RuntimeResult<String> {
        let uri = uri.clone();

        task::spawn_blocking(move || {
            let path = uri.to_path();
            std::fs::read_to_string(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RuntimeError::FileNotFound(uri.clone())
                } else {
                    RuntimeError::Io(format!("Failed to read {}: {}", path.display(), e))
                }
            })
        })
        .await
        .map_err(join_error)?
    }

    async fn read_directory(&self, uri: &Uri) -> RuntimeResult<Vec<(Uri, FileKind)>> {
        let uri = uri.clone();

        task::spawn_blocking(move || {
            let path = uri.to_path();
            let entries = std::fs::read_dir(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RuntimeError::FileNotFound(uri.clone())
                } else {
                    RuntimeError::Io(format!(
                        "Failed to read directory {}: {}",
                        path.display(),
                        e
                    ))
                }
            })?;

            let mut result = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| {
                    RuntimeError::Io(format!("Failed to read directory entry: {}", e))
                })?;
                let Some(name) = entry.file_name().to_str().map(String::from) else {
                    continue;
                };
                let kind = match entry.file_type() {
                    Ok(file_type) if file_type.is_dir() => FileKind::Directory,
                    Ok(_) => FileKind::File,
                    Err(_) => continue,
                };
                result.push((uri.join(&name), kind));
            }

            result.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(result)
        })
        .await
        .map_err(join_error)?
    }
}
