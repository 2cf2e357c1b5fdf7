//! Building a graph from scratch.

use std::path::Path;

use futures::future::join_all;
use tracing::{debug, info, instrument};

use crate::dependencies::{Dependencies, PassCache, ThemeDependencies};
use crate::graph::ThemeGraph;
use crate::module::ThemeModule;
use crate::resolver::{self, SECTIONS_DIR, TEMPLATES_DIR};
use crate::runtime::{FileKind, FileSystem};
use crate::traversal::traverse;
use crate::uri::Uri;
use crate::Result;

/// Build the graph of the theme at `root_uri`.
///
/// Without explicit `entry_points`, every file under `templates/` and every
/// Liquid file under `sections/` is an entry point. URIs that do not resolve to a
/// module are ignored. Entry points are traversed concurrently and the graph is
/// returned once every traversal has settled.
#[instrument(skip_all, fields(root = %root_uri))]
pub async fn build(
    root_uri: Uri,
    deps: &dyn Dependencies,
    entry_points: Option<Vec<Uri>>,
) -> ThemeGraph {
    let graph = ThemeGraph::new(root_uri.clone());
    let cache = PassCache::new(deps, root_uri.clone());
    graph.inner.write().explicit_entry_points = entry_points.is_some();

    let uris = match entry_points {
        Some(uris) => uris,
        None => discover_entry_points(&root_uri, &cache).await,
    };

    let modules: Vec<ThemeModule> = uris
        .iter()
        .filter_map(|uri| resolver::resolve(&graph, uri))
        .collect();
    {
        let mut inner = graph.inner.write();
        for module in &modules {
            inner.entry_points.insert(module.uri.clone());
        }
    }

    join_all(modules.into_iter().map(|module| traverse(module, &graph, &cache))).await;

    info!(
        modules = graph.module_count(),
        edges = graph.edge_count(),
        entry_points = graph.entry_points().len(),
        files_parsed = cache.sources_loaded(),
        "built theme graph"
    );
    graph
}

/// Build the graph of a theme directory on disk.
pub async fn build_from_path<F: FileSystem>(root: impl AsRef<Path>, fs: F) -> Result<ThemeGraph> {
    let root_uri = Uri::from_path(root)?;
    let deps = ThemeDependencies::new(root_uri.clone(), fs);
    Ok(build(root_uri, &deps, None).await)
}

/// Every file under `templates/` (recursively) and every Liquid file in `sections/`.
pub async fn discover_entry_points(root: &Uri, deps: &dyn Dependencies) -> Vec<Uri> {
    let mut templates = Vec::new();
    let mut pending = vec![root.join(TEMPLATES_DIR)];
    while let Some(directory) = pending.pop() {
        match deps.read_directory(&directory).await {
            Ok(entries) => {
                for (uri, kind) in entries {
                    match kind {
                        FileKind::File => templates.push(uri),
                        FileKind::Directory => pending.push(uri),
                    }
                }
            }
            Err(e) => debug!(directory = %directory, error = %e, "skipping directory"),
        }
    }
    templates.sort();

    let mut sections: Vec<Uri> = match deps.read_directory(&root.join(SECTIONS_DIR)).await {
        Ok(entries) => entries
            .into_iter()
            .filter(|(uri, kind)| *kind == FileKind::File && uri.extension() == Some("liquid"))
            .map(|(uri, _)| uri)
            .collect(),
        Err(e) => {
            debug!(error = %e, "no sections directory");
            Vec::new()
        }
    };
    sections.sort();

    templates.extend(sections);
    templates
}
