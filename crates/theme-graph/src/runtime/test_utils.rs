//! In-memory file system for tests.
//!
//! Theme fixtures are small, so a map of `uri -> contents` is enough. Directories
//! are implied by the files beneath them, the same way a theme archive works.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{FileKind, FileSystem, RuntimeError, RuntimeResult};
use crate::uri::Uri;

/// [`FileSystem`] over an in-memory map of files.
///
/// ```rust,ignore
/// use theme_graph::MemoryFileSystem;
/// use theme_graph::Uri;
///
/// let root = Uri::new("file:///theme").unwrap();
/// let fs = MemoryFileSystem::with_files(
///     root.clone(),
///     [("snippets/card.liquid", "{{ product.title }}")],
/// );
/// fs.write("snippets/price.liquid", "{{ price }}");
/// assert_eq!(fs.len(), 2);
/// ```
#[derive(Debug)]
pub struct MemoryFileSystem {
    root: Uri,
    files: RwLock<BTreeMap<Uri, String>>,
}

impl MemoryFileSystem {
    pub fn new(root: Uri) -> Self {
        Self {
            root,
            files: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a file system from `(relative path, contents)` pairs.
    pub fn with_files<'a, I>(root: Uri, files: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let fs = Self::new(root);
        for (path, contents) in files {
            fs.write(path, contents);
        }
        fs
    }

    pub fn root(&self) -> &Uri {
        &self.root
    }

    /// URI of a path relative to the root.
    pub fn uri(&self, relative: &str) -> Uri {
        self.root.join(relative)
    }

    /// Create or overwrite a file. Returns its URI.
    pub fn write(&self, relative: &str, contents: &str) -> Uri {
        let uri = self.uri(relative);
        self.files.write().insert(uri.clone(), contents.to_string());
        uri
    }

    /// Delete a file. Returns its URI.
    pub fn remove(&self, relative: &str) -> Uri {
        let uri = self.uri(relative);
        self.files.write().remove(&uri);
        uri
    }

    /// Move a file. Returns the old and new URIs.
    pub fn rename(&self, from: &str, to: &str) -> (Uri, Uri) {
        let old_uri = self.uri(from);
        let new_uri = self.uri(to);
        let mut files = self.files.write();
        if let Some(contents) = files.remove(&old_uri) {
            files.insert(new_uri.clone(), contents);
        }
        (old_uri, new_uri)
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn exists(&self, uri: &Uri) -> bool {
        self.files.read().contains_key(uri)
    }

    async fn read_file(&self, uri: &Uri) -> RuntimeResult<String> {
        self.files
            .read()
            .get(uri)
            .cloned()
            .ok_or_else(|| RuntimeError::FileNotFound(uri.clone()))
    }

    async fn read_directory(&self, uri: &Uri) -> RuntimeResult<Vec<(Uri, FileKind)>> {
        let files = self.files.read();
        let mut entries: Vec<(Uri, FileKind)> = Vec::new();

        for file in files.keys() {
            let Some(relative) = file.relative_to(uri) else {
                continue;
            };
            let entry = match relative.split_once('/') {
                Some((directory, _)) => (uri.join(directory), FileKind::Directory),
                None => (file.clone(), FileKind::File),
            };
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }

        if entries.is_empty() && !files.keys().any(|file| file == uri) {
            return Err(RuntimeError::FileNotFound(uri.clone()));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}
