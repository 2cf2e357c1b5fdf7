//! Graph traversal.
//!
//! [`traverse`] visits one module: it claims the module in the graph, checks that
//! the file exists, derives candidate references with the rules of the module's
//! kind, binds them, and recursively visits every target. Sibling targets are
//! visited concurrently and the parent completes once all of them have.
//!
//! The claim happens under the graph lock before the first `.await`, so a module
//! reached twice (including through a cycle) is only ever visited once.

mod json;
mod liquid;
mod schema;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use tracing::trace;

use crate::dependencies::Dependencies;
use crate::graph::ThemeGraph;
use crate::module::{ModuleKind, ThemeModule};
use crate::reference::BindOptions;

/// A reference found in a module, not yet bound.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub target: ThemeModule,
    pub options: BindOptions,
}

impl Candidate {
    pub fn new(target: ThemeModule, options: BindOptions) -> Self {
        Self { target, options }
    }
}

/// Visit `module` and everything reachable from it.
///
/// Visiting a module that was already traversed is a no-op.
pub fn traverse<'a>(
    module: ThemeModule,
    graph: &'a ThemeGraph,
    deps: &'a dyn Dependencies,
) -> BoxFuture<'a, ()> {
    async move {
        let claimed = graph.inner.write().begin_traversal(&module);
        if !claimed {
            return;
        }

        let exists = deps.exists(&module.uri).await;
        graph.inner.write().set_exists(&module.uri, exists);
        if !exists {
            trace!(uri = %module.uri, "dead link");
            return;
        }

        match module.kind {
            ModuleKind::Liquid(kind) => liquid::traverse_liquid(&module, kind, graph, deps).await,
            ModuleKind::Json(kind) => json::traverse_json(&module, kind, graph, deps).await,
            ModuleKind::JavaScript | ModuleKind::Css => {}
        }
    }
    .boxed()
}

/// Bind every candidate to `source`, then visit all targets concurrently.
///
/// All edges are bound before any target is polled.
pub(crate) async fn bind_and_traverse(
    source: &ThemeModule,
    candidates: Vec<Candidate>,
    graph: &ThemeGraph,
    deps: &dyn Dependencies,
) {
    if candidates.is_empty() {
        return;
    }

    let targets: Vec<ThemeModule> = {
        let mut inner = graph.inner.write();
        candidates
            .into_iter()
            .map(|candidate| {
                inner.bind(source, &candidate.target, candidate.options);
                candidate.target
            })
            .collect()
    };

    join_all(targets.into_iter().map(|target| traverse(target, graph, deps))).await;
}
