//! In-memory theme graph.
//!
//! The graph is an arena: modules live in a single `uri -> module` map and edges
//! live in a single `id -> reference` map. Modules refer to edges by id and edges
//! refer to modules by URI, so cycles between files never become ownership cycles.
//!
//! `ThemeGraph` wraps the arena in `Arc<RwLock<..>>`. Clones share state. Locks are
//! only taken for synchronous sections and never held across an `.await`, which is
//! what lets concurrent traversals rely on "insert, then recurse" for cycle safety.

mod mutations;
mod queries;
mod serialization;

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::module::ThemeModule;
use crate::reference::{Reference, ReferenceId};
use crate::uri::Uri;

pub use queries::DeadLink;
pub use serialization::{SerializableGraph, SerializableNode, serialize};

#[derive(Debug)]
pub(crate) struct GraphInner {
    pub(crate) root_uri: Uri,
    pub(crate) modules: IndexMap<Uri, ThemeModule>,
    pub(crate) edges: FxHashMap<ReferenceId, Reference>,
    pub(crate) entry_points: IndexSet<Uri>,
    /// Entry points were given by the caller rather than discovered.
    pub(crate) explicit_entry_points: bool,
    next_edge_id: u64,
}

impl GraphInner {
    fn new(root_uri: Uri) -> Self {
        Self {
            root_uri,
            modules: IndexMap::new(),
            edges: FxHashMap::default(),
            entry_points: IndexSet::new(),
            explicit_entry_points: false,
            next_edge_id: 0,
        }
    }
}

/// Dependency graph of one theme root.
#[derive(Debug, Clone)]
pub struct ThemeGraph {
    pub(crate) inner: Arc<RwLock<GraphInner>>,
}

impl ThemeGraph {
    /// Create an empty graph for the theme rooted at `root_uri`.
    pub fn new(root_uri: Uri) -> Self {
        Self {
            inner: Arc::new(RwLock::new(GraphInner::new(root_uri))),
        }
    }

    pub fn root_uri(&self) -> Uri {
        self.inner.read().root_uri.clone()
    }

    /// Replace this graph's contents with `other`'s, keeping shared handles valid.
    pub(crate) fn replace_with(&self, other: ThemeGraph) {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return;
        }
        let mut mine = self.inner.write();
        let mut theirs = other.inner.write();
        std::mem::swap(&mut *mine, &mut *theirs);
    }
}
