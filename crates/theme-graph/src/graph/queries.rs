//! Query methods for ThemeGraph.

use serde::Serialize;

use super::{GraphInner, ThemeGraph};
use crate::module::ThemeModule;
use crate::reference::{Location, Reference, ReferenceId};
use crate::uri::Uri;

/// A referenced file that does not exist, with the places that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLink {
    pub uri: Uri,
    pub referenced_by: Vec<Location>,
}

impl GraphInner {
    fn resolve_edges(&self, ids: &[ReferenceId]) -> Vec<Reference> {
        ids.iter()
            .filter_map(|id| self.edges.get(id).cloned())
            .collect()
    }
}

impl ThemeGraph {
    /// Snapshot of the module stored under `uri`.
    pub fn module(&self, uri: &Uri) -> Option<ThemeModule> {
        self.inner.read().modules.get(uri).cloned()
    }

    pub fn contains(&self, uri: &Uri) -> bool {
        self.inner.read().modules.contains_key(uri)
    }

    /// Snapshot of every module, in discovery order.
    pub fn modules(&self) -> Vec<ThemeModule> {
        self.inner.read().modules.values().cloned().collect()
    }

    pub fn module_uris(&self) -> Vec<Uri> {
        self.inner.read().modules.keys().cloned().collect()
    }

    pub fn entry_points(&self) -> Vec<Uri> {
        self.inner.read().entry_points.iter().cloned().collect()
    }

    pub fn is_entry_point(&self, uri: &Uri) -> bool {
        self.inner.read().entry_points.contains(uri)
    }

    pub fn reference(&self, id: ReferenceId) -> Option<Reference> {
        self.inner.read().edges.get(&id).cloned()
    }

    /// Outgoing edges of `uri`, in binding order.
    pub fn dependencies(&self, uri: &Uri) -> Vec<Reference> {
        let inner = self.inner.read();
        inner
            .modules
            .get(uri)
            .map(|module| inner.resolve_edges(&module.dependencies))
            .unwrap_or_default()
    }

    /// Incoming edges of `uri`, in binding order.
    pub fn references(&self, uri: &Uri) -> Vec<Reference> {
        let inner = self.inner.read();
        inner
            .modules
            .get(uri)
            .map(|module| inner.resolve_edges(&module.references))
            .unwrap_or_default()
    }

    /// Modules that are referenced but missing on disk.
    pub fn dead_links(&self) -> Vec<DeadLink> {
        let inner = self.inner.read();
        inner
            .modules
            .values()
            .filter(|module| module.is_dead_link())
            .map(|module| DeadLink {
                uri: module.uri.clone(),
                referenced_by: inner
                    .resolve_edges(&module.references)
                    .into_iter()
                    .map(|edge| edge.source)
                    .collect(),
            })
            .collect()
    }

    pub fn module_count(&self) -> usize {
        self.inner.read().modules.len()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.read().edges.len()
    }
}
