//! Watch command implementation.
//!
//! Builds the graph once, then turns file system events into update
//! operations. Events arriving within the debounce window are applied as one
//! batch.

use crate::cli::WatchArgs;
use crate::commands::utils::Theme;
use crate::config::ConfigOverrides;
use crate::error::Result;
use crate::ui;
use crate::watcher::{FileChange, FileWatcher};
use std::time::{Duration, Instant};
use theme_graph::{UpdateOperation, Uri, update};
use tokio::sync::mpsc;
use tracing::{debug, info};

pub async fn execute(args: WatchArgs) -> Result<()> {
    let overrides =
        ConfigOverrides::from_theme_args(&args.theme).with_debounce_ms(args.debounce);
    let theme = Theme::load(&args.theme, overrides)?;
    let graph = theme.build().await;

    let (_watcher, mut rx) = FileWatcher::new(
        theme.root.clone(),
        theme.config.ignore.clone(),
        theme.config.debounce_ms,
    )?;
    ui::info(&format!(
        "Watching {} for changes (Ctrl+C to stop)",
        theme.root.display()
    ));

    let debounce = Duration::from_millis(theme.config.debounce_ms);
    loop {
        let first = tokio::select! {
            change = rx.recv() => match change {
                Some(change) => change,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                ui::info("Stopping watcher");
                break;
            }
        };

        let batch = collect_batch(first, &mut rx, debounce).await;
        let operations = to_operations(&batch);
        if operations.is_empty() {
            continue;
        }

        let started = Instant::now();
        let outcome = update(&graph, &theme.deps, &operations).await;
        info!(
            applied = outcome.applied,
            rebuilt = outcome.rebuilt,
            modules = graph.module_count(),
            edges = graph.edge_count(),
            "applied changes"
        );
        ui::print_graph_summary(&graph, started.elapsed());
    }

    Ok(())
}

/// `first` plus everything that arrives before the channel stays quiet for `window`.
async fn collect_batch(
    first: FileChange,
    rx: &mut mpsc::Receiver<FileChange>,
    window: Duration,
) -> Vec<FileChange> {
    let mut batch = vec![first];
    while let Ok(Some(change)) = tokio::time::timeout(window, rx.recv()).await {
        batch.push(change);
    }
    batch
}

/// Update operations for a batch of changes, in order. Back-to-back repeats
/// of the same operation are applied once.
pub fn to_operations(changes: &[FileChange]) -> Vec<UpdateOperation> {
    let mut operations: Vec<UpdateOperation> = Vec::new();
    for change in changes {
        let Some(operation) = to_operation(change) else {
            continue;
        };
        if operations.last() != Some(&operation) {
            operations.push(operation);
        }
    }
    operations
}

fn to_operation(change: &FileChange) -> Option<UpdateOperation> {
    let uri = |path: &std::path::Path| match Uri::from_path(path) {
        Ok(uri) => Some(uri),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping change");
            None
        }
    };

    Some(match change {
        FileChange::Created(path) => UpdateOperation::Create { uri: uri(path)? },
        FileChange::Modified(path) => UpdateOperation::Change { uri: uri(path)? },
        FileChange::Removed(path) => UpdateOperation::Delete { uri: uri(path)? },
        FileChange::Renamed(from, to) => UpdateOperation::Rename {
            old_uri: uri(from)?,
            new_uri: uri(to)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn uri(path: &str) -> Uri {
        Uri::from_path(path).unwrap()
    }

    #[test]
    fn test_changes_map_to_operations() {
        let changes = vec![
            FileChange::Created(PathBuf::from("/theme/snippets/new.liquid")),
            FileChange::Modified(PathBuf::from("/theme/sections/main.liquid")),
            FileChange::Removed(PathBuf::from("/theme/snippets/old.liquid")),
            FileChange::Renamed(
                PathBuf::from("/theme/blocks/_draft.liquid"),
                PathBuf::from("/theme/blocks/quote.liquid"),
            ),
        ];

        assert_eq!(
            to_operations(&changes),
            vec![
                UpdateOperation::Create { uri: uri("/theme/snippets/new.liquid") },
                UpdateOperation::Change { uri: uri("/theme/sections/main.liquid") },
                UpdateOperation::Delete { uri: uri("/theme/snippets/old.liquid") },
                UpdateOperation::Rename {
                    old_uri: uri("/theme/blocks/_draft.liquid"),
                    new_uri: uri("/theme/blocks/quote.liquid"),
                },
            ]
        );
    }

    #[test]
    fn test_repeated_changes_collapse() {
        let path = PathBuf::from("/theme/sections/main.liquid");
        let changes = vec![
            FileChange::Modified(path.clone()),
            FileChange::Modified(path.clone()),
            FileChange::Removed(path.clone()),
            FileChange::Modified(path),
        ];

        let operations = to_operations(&changes);

        assert_eq!(operations.len(), 3);
        assert!(matches!(operations[0], UpdateOperation::Change { .. }));
        assert!(matches!(operations[1], UpdateOperation::Delete { .. }));
        assert!(matches!(operations[2], UpdateOperation::Change { .. }));
    }

    #[tokio::test]
    async fn test_collect_batch_drains_pending_changes() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(FileChange::Modified(PathBuf::from("/theme/a.liquid"))).await.unwrap();
        tx.send(FileChange::Modified(PathBuf::from("/theme/b.liquid"))).await.unwrap();

        let first = FileChange::Created(PathBuf::from("/theme/c.liquid"));
        let batch = collect_batch(first, &mut rx, Duration::from_millis(20)).await;

        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], FileChange::Created(PathBuf::from("/theme/c.liquid")));
    }
}
