//! File system watcher for `theme-graph watch`.
//!
//! Watches the theme directory recursively and forwards relevant changes over a
//! channel, skipping hidden files and configured ignore patterns.

use crate::error::{CliError, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
    /// Both ends of a rename, when the platform reports them together
    Renamed(PathBuf, PathBuf),
}

impl FileChange {
    /// The path a change ends up at (the destination for renames).
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Created(p) | FileChange::Modified(p) | FileChange::Removed(p) => p,
            FileChange::Renamed(_, to) => to,
        }
    }
}

/// Recursive watcher over a theme root.
///
/// Repeated events for the same path within `debounce_ms` are dropped.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `root`.
    ///
    /// Returns the watcher (keep it alive for as long as events are wanted)
    /// and the receiving end of the change channel.
    pub fn new(
        root: PathBuf,
        ignore_patterns: Vec<String>,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.exists() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(256);

        let debounce_duration = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let root_clone = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "file watcher error");
                    return;
                }
            };

            for change in Self::changes(&event) {
                if Self::should_ignore(change.path(), &root_clone, &ignore_patterns) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == change.path()
                        && matches!(change, FileChange::Modified(_))
                        && now.duration_since(*last_time) < debounce_duration
                    {
                        continue;
                    }
                }
                last_event = Some((change.path().to_path_buf(), now));

                if tx.blocking_send(change).is_err() {
                    return;
                }
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Translate one notify event into file changes.
    fn changes(event: &Event) -> Vec<FileChange> {
        match event.kind {
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => {
                vec![FileChange::Renamed(event.paths[0].clone(), event.paths[1].clone())]
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                event.paths.iter().cloned().map(FileChange::Removed).collect()
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                event.paths.iter().cloned().map(FileChange::Created).collect()
            }
            EventKind::Create(_) => event.paths.iter().cloned().map(FileChange::Created).collect(),
            EventKind::Modify(_) => event.paths.iter().cloned().map(FileChange::Modified).collect(),
            EventKind::Remove(_) => event.paths.iter().cloned().map(FileChange::Removed).collect(),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
        }
    }

    /// Whether `path` is outside `root`, hidden, or matches an ignore pattern.
    ///
    /// `*.ext` patterns match suffixes, other patterns match a leading path or
    /// any path component.
    fn should_ignore(path: &Path, root: &Path, ignore_patterns: &[String]) -> bool {
        let Ok(rel_path) = path.strip_prefix(root) else {
            return true;
        };

        let path_str = rel_path.to_string_lossy();

        for pattern in ignore_patterns {
            if let Some(suffix) = pattern.strip_prefix('*') {
                if path_str.ends_with(suffix) {
                    return true;
                }
            } else if path_str.starts_with(pattern.as_str())
                || path_str.contains(&format!("/{}", pattern))
            {
                return true;
            }
        }

        rel_path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        })
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
