//! Schema expansion for sections and theme blocks.

use tracing::debug;

use super::{Candidate, bind_and_traverse};
use crate::dependencies::Dependencies;
use crate::graph::ThemeGraph;
use crate::module::{LiquidKind, ThemeModule};
use crate::reference::{BindOptions, ReferenceType};
use crate::resolver;
use crate::schema::{DeclaredBlock, ThemeSchema};

pub(super) async fn expand_schema(
    module: &ThemeModule,
    kind: LiquidKind,
    graph: &ThemeGraph,
    deps: &dyn Dependencies,
) {
    let schema = match kind {
        LiquidKind::Section => deps.get_section_schema(module.name()).await,
        LiquidKind::Block => deps.get_block_schema(module.name()).await,
        LiquidKind::Layout | LiquidKind::Snippet | LiquidKind::Template => None,
    };
    let Some(schema) = schema else {
        return;
    };
    if schema.uses_local_blocks() {
        debug!(uri = %module.uri, "schema defines local blocks");
        return;
    }

    let candidates = schema_candidates(&schema, graph, deps).await;
    bind_and_traverse(module, candidates, graph, deps).await;
}

async fn schema_candidates(
    schema: &ThemeSchema,
    graph: &ThemeGraph,
    deps: &dyn Dependencies,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let mut accepts_theme_blocks = false;

    for declared in schema.declared_blocks() {
        match declared {
            DeclaredBlock::Theme(name) => {
                candidates.extend(
                    resolver::resolve_block(graph, name)
                        .map(|target| Candidate::new(target, BindOptions::default())),
                );
            }
            DeclaredBlock::AnyThemeBlock => accepts_theme_blocks = true,
            DeclaredBlock::Platform => {}
        }
    }

    if accepts_theme_blocks {
        for name in deps.get_theme_block_names().await {
            candidates.extend(
                resolver::resolve_block(graph, &name)
                    .map(|target| Candidate::new(target, BindOptions::of_kind(ReferenceType::Indirect))),
            );
        }
    }

    for block_type in schema.preset_block_types() {
        candidates.extend(
            resolver::resolve_block(graph, block_type)
                .map(|target| Candidate::new(target, BindOptions::of_kind(ReferenceType::Preset))),
        );
    }

    candidates
}
