mod smoke_tests;

use std::sync::Arc;

use crate::{
    MemoryFileSystem, ReferenceType, ThemeDependencies, ThemeGraph, UpdateOperation,
    UpdateOutcome, Uri, build, update,
};

/// An in-memory theme and the default dependencies over it.
pub(crate) struct Fixture {
    pub fs: Arc<MemoryFileSystem>,
    pub deps: ThemeDependencies<Arc<MemoryFileSystem>>,
}

impl Fixture {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let root = Uri::new("file:///theme").unwrap();
        let fs = Arc::new(MemoryFileSystem::with_files(root.clone(), files.iter().copied()));
        let deps = ThemeDependencies::new(root, Arc::clone(&fs));
        Self { fs, deps }
    }

    pub fn root(&self) -> Uri {
        self.fs.root().clone()
    }

    pub fn uri(&self, relative: &str) -> Uri {
        self.fs.uri(relative)
    }

    pub async fn build(&self) -> ThemeGraph {
        build(self.root(), &self.deps, None).await
    }

    pub async fn update(&self, graph: &ThemeGraph, operations: &[UpdateOperation]) -> UpdateOutcome {
        update(graph, &self.deps, operations).await
    }

    /// `(relative target, type)` of every outgoing edge of `relative`.
    pub fn targets(&self, graph: &ThemeGraph, relative: &str) -> Vec<(String, ReferenceType)> {
        let root = self.root();
        graph
            .dependencies(&self.uri(relative))
            .into_iter()
            .map(|edge| {
                let target = edge.target.uri.relative_to(&root).unwrap_or_default().to_string();
                (target, edge.kind)
            })
            .collect()
    }

    /// Relative paths of the modules with an edge into `relative`.
    pub fn sources(&self, graph: &ThemeGraph, relative: &str) -> Vec<String> {
        let root = self.root();
        graph
            .references(&self.uri(relative))
            .into_iter()
            .map(|edge| edge.source.uri.relative_to(&root).unwrap_or_default().to_string())
            .collect()
    }
}

/// Every edge id is held exactly once by its source and once by its target, and
/// every edge in the arena is held by both.
pub(crate) fn assert_edge_symmetry(graph: &ThemeGraph) {
    let inner = graph.inner.read();
    let mut held = 0;

    for module in inner.modules.values() {
        for id in &module.dependencies {
            let edge = inner.edges.get(id).expect("dependency id points at an edge");
            assert_eq!(edge.source.uri, module.uri, "edge source matches its owner");

            let target = inner
                .modules
                .get(&edge.target.uri)
                .expect("edge target is in the graph");
            let count = target.references.iter().filter(|other| *other == id).count();
            assert_eq!(count, 1, "{} -> {} held once by target", edge.source.uri, edge.target.uri);
            held += 1;
        }
        for id in &module.references {
            let edge = inner.edges.get(id).expect("reference id points at an edge");
            assert_eq!(edge.target.uri, module.uri, "edge target matches its owner");

            let source = inner
                .modules
                .get(&edge.source.uri)
                .expect("edge source is in the graph");
            let count = source.dependencies.iter().filter(|other| *other == id).count();
            assert_eq!(count, 1, "{} -> {} held once by source", edge.source.uri, edge.target.uri);
        }
    }

    assert_eq!(held, inner.edges.len(), "no edge is orphaned in the arena");
}
