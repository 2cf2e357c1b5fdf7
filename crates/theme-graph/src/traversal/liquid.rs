//! Reference extraction for Liquid files.

use futures::future::join_all;
use tracing::debug;

use super::schema::expand_schema;
use super::{Candidate, bind_and_traverse};
use crate::dependencies::Dependencies;
use crate::graph::ThemeGraph;
use crate::module::{LiquidKind, ThemeModule};
use crate::reference::{BindOptions, ReferenceType};
use crate::resolver;
use crate::source::LiquidDocument;
use crate::source::markup::{asset_references, leading_string, starts_with_word, type_argument};

pub(super) async fn traverse_liquid(
    module: &ThemeModule,
    kind: LiquidKind,
    graph: &ThemeGraph,
    deps: &dyn Dependencies,
) {
    let source = match deps.get_source_code(&module.uri).await {
        Ok(source) => source,
        Err(e) => {
            debug!(uri = %module.uri, error = %e, "could not read source");
            return;
        }
    };
    if let Err(e) = &source.ast {
        debug!(uri = %module.uri, error = %e, "parse error, no references derived");
        return;
    }
    let Some(document) = source.liquid() else {
        return;
    };

    let mut candidates = extract_candidates(graph, kind, document);
    candidates.extend(web_component_candidates(graph, document, deps).await);

    match kind {
        LiquidKind::Section | LiquidKind::Block => {
            futures::join!(
                bind_and_traverse(module, candidates, graph, deps),
                expand_schema(module, kind, graph, deps),
            );
        }
        LiquidKind::Layout | LiquidKind::Snippet | LiquidKind::Template => {
            bind_and_traverse(module, candidates, graph, deps).await;
        }
    }
}

/// Candidates from tags, outputs and (for templates) the layout.
fn extract_candidates(graph: &ThemeGraph, kind: LiquidKind, document: &LiquidDocument) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for tag in &document.tags {
        let target = match tag.name.as_str() {
            "render" | "include" => leading_string(&tag.markup, tag.markup_offset)
                .and_then(|name| resolver::resolve_snippet(graph, &name.value)),
            "section" => leading_string(&tag.markup, tag.markup_offset)
                .and_then(|name| resolver::resolve_section(graph, &name.value)),
            "sections" => leading_string(&tag.markup, tag.markup_offset)
                .and_then(|name| resolver::resolve_section_group(graph, &name.value)),
            "content_for" => static_block_type(&tag.markup, tag.markup_offset)
                .and_then(|name| resolver::resolve_block(graph, &name)),
            _ => continue,
        };

        match target {
            Some(target) => candidates.push(Candidate::new(target, BindOptions::direct(Some(tag.range)))),
            None => debug!(tag = %tag.name, markup = %tag.markup, "unresolvable reference skipped"),
        }
    }

    for (markup, offset) in document.markups() {
        for asset in asset_references(markup, offset) {
            if let Some(target) = resolver::resolve_asset(graph, &asset.value) {
                candidates.push(Candidate::new(target, BindOptions::direct(Some(asset.range))));
            }
        }
    }

    match kind {
        LiquidKind::Template => candidates.extend(layout_candidate(graph, document)),
        LiquidKind::Layout | LiquidKind::Section | LiquidKind::Block | LiquidKind::Snippet => {}
    }

    candidates
}

/// Type name of `{% content_for 'block', type: 'x' %}`.
fn static_block_type(markup: &str, offset: usize) -> Option<String> {
    let target = leading_string(markup, offset)?;
    if target.value != "block" {
        return None;
    }
    type_argument(markup, offset).map(|block_type| block_type.value)
}

/// The layout a Liquid template renders in.
fn layout_candidate(graph: &ThemeGraph, document: &LiquidDocument) -> Option<Candidate> {
    let Some(tag) = document.tags_named("layout").next() else {
        return resolver::resolve_layout(graph, resolver::DEFAULT_LAYOUT)
            .map(|target| Candidate::new(target, BindOptions::of_kind(ReferenceType::Indirect)));
    };

    if starts_with_word(&tag.markup, "none") {
        return None;
    }
    let name = leading_string(&tag.markup, tag.markup_offset)?;
    resolver::resolve_layout(graph, &name.value)
        .map(|target| Candidate::new(target, BindOptions::direct(Some(tag.range))))
}

/// Custom elements whose definition the contract can locate.
async fn web_component_candidates(
    graph: &ThemeGraph,
    document: &LiquidDocument,
    deps: &dyn Dependencies,
) -> Vec<Candidate> {
    let elements: Vec<_> = document
        .elements
        .iter()
        .filter(|element| element.is_custom_element())
        .collect();
    if elements.is_empty() {
        return Vec::new();
    }

    let definitions = join_all(
        elements
            .iter()
            .map(|element| deps.get_web_component_definition_reference(&element.name)),
    )
    .await;

    elements
        .into_iter()
        .zip(definitions)
        .filter_map(|(element, definition)| {
            let definition = definition?;
            let target = resolver::resolve(graph, &definition.asset_uri)?;
            Some(Candidate::new(
                target,
                BindOptions::direct(Some(element.name_range)).with_target_range(Some(definition.range)),
            ))
        })
        .collect()
}
