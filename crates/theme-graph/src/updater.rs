//! Incremental graph updates.
//!
//! [`update`] applies a batch of file-system operations to an existing graph,
//! re-traversing only the modules an operation can have affected. Operations in
//! a batch are applied in order, one after another.
//!
//! Updates assume a single writer. Callers serialize `update` calls per graph.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::builder::build;
use crate::dependencies::{Dependencies, PassCache};
use crate::graph::ThemeGraph;
use crate::module::ThemeModule;
use crate::resolver::{self, is_public_block};
use crate::traversal::traverse;
use crate::uri::Uri;

/// A file-system change, as reported by an editor or a watcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UpdateOperation {
    Create {
        uri: Uri,
    },
    Change {
        uri: Uri,
    },
    Delete {
        uri: Uri,
    },
    #[serde(rename_all = "camelCase")]
    Rename {
        old_uri: Uri,
        new_uri: Uri,
    },
}

impl UpdateOperation {
    /// Every URI the operation touches.
    pub fn uris(&self) -> Vec<&Uri> {
        match self {
            UpdateOperation::Create { uri }
            | UpdateOperation::Change { uri }
            | UpdateOperation::Delete { uri } => vec![uri],
            UpdateOperation::Rename { old_uri, new_uri } => vec![old_uri, new_uri],
        }
    }

    /// The URI a file appears under, for operations that make one appear.
    fn created_uri(&self) -> Option<&Uri> {
        match self {
            UpdateOperation::Create { uri } => Some(uri),
            UpdateOperation::Rename { new_uri, .. } => Some(new_uri),
            UpdateOperation::Change { .. } | UpdateOperation::Delete { .. } => None,
        }
    }
}

/// What [`update`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// The batch introduced a public block, so the graph was rebuilt from scratch.
    pub rebuilt: bool,
    /// Operations applied.
    pub applied: usize,
}

/// Apply `operations` to `graph`.
///
/// A new public block (created, or renamed into place) can be picked up by any
/// `@theme` wildcard in the theme, so such a batch rebuilds the whole graph. A
/// graph built from explicit entry points is rebuilt from those same entry points.
/// Every other batch is applied incrementally.
#[instrument(skip_all, fields(root = %graph.root_uri(), operations = operations.len()))]
pub async fn update(
    graph: &ThemeGraph,
    deps: &dyn Dependencies,
    operations: &[UpdateOperation],
) -> UpdateOutcome {
    for operation in operations {
        for uri in operation.uris() {
            deps.invalidate(uri);
        }
    }

    let root = graph.root_uri();
    let new_block = operations
        .iter()
        .filter_map(UpdateOperation::created_uri)
        .find(|uri| is_public_block(&root, uri));
    if let Some(block) = new_block {
        info!(block = %block, "new public block, rebuilding theme graph");
        let entry_points = explicit_entry_points(graph, operations);
        let rebuilt = build(root, deps, entry_points).await;
        graph.replace_with(rebuilt);
        return UpdateOutcome {
            rebuilt: true,
            applied: operations.len(),
        };
    }

    let cache = PassCache::new(deps, root);
    for operation in operations {
        apply(graph, &cache, operation).await;
        let pruned = graph.inner.write().prune_dead_links();
        if !pruned.is_empty() {
            debug!(count = pruned.len(), "pruned orphaned dead links");
        }
    }

    info!(
        modules = graph.module_count(),
        edges = graph.edge_count(),
        "updated theme graph"
    );
    UpdateOutcome {
        rebuilt: false,
        applied: operations.len(),
    }
}

/// The entry points a rebuild keeps, when the graph was built from a given list.
///
/// The batch's own additions and removals are applied to the list first.
fn explicit_entry_points(graph: &ThemeGraph, operations: &[UpdateOperation]) -> Option<Vec<Uri>> {
    let inner = graph.inner.read();
    if !inner.explicit_entry_points {
        return None;
    }

    let mut entry_points = inner.entry_points.clone();
    for operation in operations {
        if let UpdateOperation::Delete { uri } | UpdateOperation::Rename { old_uri: uri, .. } =
            operation
        {
            entry_points.shift_remove(uri);
        }
        if let Some(uri) = operation.created_uri() {
            let is_entry = resolver::classify(&inner.root_uri, uri)
                .is_some_and(|kind| kind.is_entry_point());
            if is_entry {
                entry_points.insert(uri.clone());
            }
        }
    }
    Some(entry_points.into_iter().collect())
}

async fn apply(graph: &ThemeGraph, deps: &dyn Dependencies, operation: &UpdateOperation) {
    debug!(?operation, "applying");
    match operation {
        UpdateOperation::Create { uri } => create(graph, deps, uri).await,
        UpdateOperation::Change { uri } => change(graph, deps, uri).await,
        UpdateOperation::Delete { uri } => delete(graph, uri),
        UpdateOperation::Rename { old_uri, new_uri } => {
            delete(graph, old_uri);
            delete(graph, new_uri);
            create(graph, deps, new_uri).await;
        }
    }
}

async fn create(graph: &ThemeGraph, deps: &dyn Dependencies, uri: &Uri) {
    let Some(module) = resolver::resolve(graph, uri) else {
        return;
    };

    {
        let mut inner = graph.inner.write();
        if module.kind.is_entry_point() {
            inner.entry_points.insert(uri.clone());
        }
        // A dead link keeps its incoming edges; only what it knew about itself goes.
        inner.reset_module(uri);
    }

    traverse(module, graph, deps).await;
}

async fn change(graph: &ThemeGraph, deps: &dyn Dependencies, uri: &Uri) {
    let Some(module) = graph.module(uri) else {
        return;
    };

    // Referrers hold ranges into the old content, so they are re-traversed too.
    let referrers: Vec<ThemeModule> = {
        let mut inner = graph.inner.write();
        let referrers = inner.referrers(uri);
        inner.reset_module(uri);
        for referrer in &referrers {
            inner.reset_module(referrer);
        }
        referrers
            .iter()
            .filter_map(|referrer| inner.modules.get(referrer).cloned())
            .collect()
    };

    join_all(
        std::iter::once(module)
            .chain(referrers)
            .map(|module| traverse(module, graph, deps)),
    )
    .await;
}

fn delete(graph: &ThemeGraph, uri: &Uri) {
    let mut inner = graph.inner.write();
    inner.entry_points.shift_remove(uri);

    let referenced = match inner.modules.get(uri) {
        Some(module) => !module.references.is_empty(),
        None => return,
    };
    if referenced {
        inner.mark_missing(uri);
    } else {
        inner.remove_module(uri);
    }
}
