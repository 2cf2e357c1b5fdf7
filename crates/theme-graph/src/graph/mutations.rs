//! Mutation methods for ThemeGraph.
//!
//! Every edge is created by [`GraphInner::bind`] and removed by one of the flush
//! helpers, which always update both endpoints under the same lock.

use tracing::trace;

use super::{GraphInner, ThemeGraph};
use crate::module::ThemeModule;
use crate::reference::{BindOptions, Location, Reference, ReferenceId};
use crate::uri::Uri;

impl GraphInner {
    /// Insert `module` unless a module with the same URI is already known.
    pub(crate) fn ensure_module(&mut self, module: &ThemeModule) -> &mut ThemeModule {
        self.modules
            .entry(module.uri.clone())
            .or_insert_with(|| ThemeModule::stub(module.uri.clone(), module.kind))
    }

    /// Claim `module` for traversal. Returns `false` when it was already traversed.
    pub(crate) fn begin_traversal(&mut self, module: &ThemeModule) -> bool {
        let entry = self.ensure_module(module);
        if entry.traversed {
            return false;
        }
        entry.traversed = true;
        true
    }

    pub(crate) fn set_exists(&mut self, uri: &Uri, exists: bool) {
        if let Some(module) = self.modules.get_mut(uri) {
            module.exists = Some(exists);
        }
    }

    pub(crate) fn bind(
        &mut self,
        source: &ThemeModule,
        target: &ThemeModule,
        options: BindOptions,
    ) -> ReferenceId {
        let id = ReferenceId(self.next_edge_id);
        self.next_edge_id += 1;

        let reference = Reference {
            source: Location::new(source.uri.clone(), options.source_range),
            target: Location::new(target.uri.clone(), options.target_range),
            kind: options.kind,
        };
        trace!(source = %source.uri, target = %target.uri, kind = ?options.kind, "bind");

        self.ensure_module(source).dependencies.push(id);
        self.ensure_module(target).references.push(id);
        self.edges.insert(id, reference);
        id
    }

    /// Remove every outgoing edge of `uri` from both endpoints.
    pub(crate) fn flush_dependencies(&mut self, uri: &Uri) {
        let Some(module) = self.modules.get_mut(uri) else {
            return;
        };
        let ids = std::mem::take(&mut module.dependencies);

        for id in ids {
            if let Some(edge) = self.edges.remove(&id) {
                if let Some(target) = self.modules.get_mut(&edge.target.uri) {
                    target.references.retain(|other| *other != id);
                }
            }
        }
    }

    /// Remove every incoming edge of `uri` from both endpoints.
    pub(crate) fn flush_references(&mut self, uri: &Uri) {
        let Some(module) = self.modules.get_mut(uri) else {
            return;
        };
        let ids = std::mem::take(&mut module.references);

        for id in ids {
            if let Some(edge) = self.edges.remove(&id) {
                if let Some(source) = self.modules.get_mut(&edge.source.uri) {
                    source.dependencies.retain(|other| *other != id);
                }
            }
        }
    }

    /// Forget what traversal learned about `uri` so it is visited fresh.
    ///
    /// Incoming edges are kept: whoever referenced the file still does.
    pub(crate) fn reset_module(&mut self, uri: &Uri) {
        self.flush_dependencies(uri);
        if let Some(module) = self.modules.get_mut(uri) {
            module.traversed = false;
            module.exists = None;
        }
    }

    /// Keep `uri` as a dead link: no file, no outgoing edges, incoming edges intact.
    pub(crate) fn mark_missing(&mut self, uri: &Uri) {
        self.flush_dependencies(uri);
        if let Some(module) = self.modules.get_mut(uri) {
            module.exists = Some(false);
            module.traversed = true;
        }
    }

    pub(crate) fn remove_module(&mut self, uri: &Uri) -> Option<ThemeModule> {
        self.flush_dependencies(uri);
        self.flush_references(uri);
        self.entry_points.shift_remove(uri);
        self.modules.shift_remove(uri)
    }

    /// Drop missing files that nothing references any more.
    pub(crate) fn prune_dead_links(&mut self) -> Vec<Uri> {
        let orphans: Vec<Uri> = self
            .modules
            .values()
            .filter(|module| {
                module.exists == Some(false)
                    && module.references.is_empty()
                    && !self.entry_points.contains(&module.uri)
            })
            .map(|module| module.uri.clone())
            .collect();

        for uri in &orphans {
            trace!(uri = %uri, "pruning orphaned dead link");
            self.remove_module(uri);
        }
        orphans
    }

    /// Distinct URIs of the modules holding an edge into `uri`, excluding itself.
    pub(crate) fn referrers(&self, uri: &Uri) -> Vec<Uri> {
        let Some(module) = self.modules.get(uri) else {
            return Vec::new();
        };

        let mut referrers: Vec<Uri> = Vec::new();
        for id in &module.references {
            if let Some(edge) = self.edges.get(id) {
                if edge.source.uri != *uri && !referrers.contains(&edge.source.uri) {
                    referrers.push(edge.source.uri.clone());
                }
            }
        }
        referrers
    }
}

impl ThemeGraph {
    /// Create one edge from `source` to `target` and record it on both modules.
    ///
    /// Either module is inserted into the graph if it is not known yet. This is
    /// the only primitive that creates edges.
    pub fn bind(
        &self,
        source: &ThemeModule,
        target: &ThemeModule,
        options: BindOptions,
    ) -> ReferenceId {
        self.inner.write().bind(source, target, options)
    }

    /// Mark a module URI as an entry point.
    pub fn add_entry_point(&self, uri: Uri) {
        self.inner.write().entry_points.insert(uri);
    }
}
