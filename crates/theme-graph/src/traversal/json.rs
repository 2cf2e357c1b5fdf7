//! Reference extraction for JSON templates and section groups.

use futures::future::join_all;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use super::{Candidate, bind_and_traverse};
use crate::dependencies::Dependencies;
use crate::graph::ThemeGraph;
use crate::module::{JsonKind, ThemeModule};
use crate::reference::{BindOptions, ReferenceType};
use crate::resolver;
use crate::schema::BlockList;

/// The parts of a template or section group that reference other files.
#[derive(Debug, Default, Deserialize)]
struct JsonDocument {
    #[serde(default)]
    layout: Option<serde_json::Value>,
    #[serde(default)]
    sections: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    order: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SectionEntry {
    #[serde(rename = "type")]
    section_type: String,
    #[serde(default)]
    blocks: Option<BlockList>,
    #[serde(default)]
    block_order: Option<Vec<String>>,
}

pub(super) async fn traverse_json(
    module: &ThemeModule,
    kind: JsonKind,
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
    let Some(value) = source.json() else {
        return;
    };
    let document = match JsonDocument::deserialize(value) {
        Ok(document) => document,
        Err(e) => {
            debug!(uri = %module.uri, error = %e, "unexpected document shape");
            return;
        }
    };

    let sections = section_entries(&document);
    let mut candidates: Vec<Candidate> = sections
        .iter()
        .filter_map(|entry| resolver::resolve_section(graph, &entry.section_type))
        .map(|target| Candidate::new(target, BindOptions::default()))
        .collect();

    match kind {
        JsonKind::Template => candidates.extend(layout_candidate(graph, document.layout.as_ref())),
        JsonKind::SectionGroup => {}
    }

    futures::join!(
        bind_and_traverse(module, candidates, graph, deps),
        bind_embedded_blocks(module, &sections, graph, deps),
    );
}

/// Section entries in render order. Entries without a type are skipped.
fn section_entries(document: &JsonDocument) -> Vec<SectionEntry> {
    let mut ids: Vec<&String> = document
        .order
        .iter()
        .filter(|id| document.sections.contains_key(*id))
        .collect();
    ids.extend(document.sections.keys().filter(|id| !document.order.contains(id)));

    ids.into_iter()
        .filter_map(|id| document.sections.get(id))
        .filter_map(|value| SectionEntry::deserialize(value).ok())
        .filter(|entry| !entry.section_type.is_empty())
        .collect()
}

/// Layout of a JSON template: a name, `false` for none, or the default.
fn layout_candidate(graph: &ThemeGraph, layout: Option<&serde_json::Value>) -> Option<Candidate> {
    match layout {
        Some(serde_json::Value::String(name)) => resolver::resolve_layout(graph, name)
            .map(|target| Candidate::new(target, BindOptions::default())),
        Some(serde_json::Value::Bool(false)) => None,
        _ => resolver::resolve_layout(graph, resolver::DEFAULT_LAYOUT)
            .map(|target| Candidate::new(target, BindOptions::of_kind(ReferenceType::Indirect))),
    }
}

/// Bind the block trees configured under each section.
///
/// A section whose schema defines local blocks has no block files to point at,
/// so its tree is skipped.
async fn bind_embedded_blocks(
    module: &ThemeModule,
    sections: &[SectionEntry],
    graph: &ThemeGraph,
    deps: &dyn Dependencies,
) {
    let with_blocks: Vec<&SectionEntry> = sections.iter().filter(|s| s.blocks.is_some()).collect();
    if with_blocks.is_empty() {
        return;
    }

    let schemas = join_all(
        with_blocks
            .iter()
            .map(|section| deps.get_section_schema(&section.section_type)),
    )
    .await;

    let mut candidates = Vec::new();
    for (section, schema) in with_blocks.into_iter().zip(schemas) {
        if schema.is_some_and(|schema| schema.uses_local_blocks()) {
            continue;
        }
        let Some(blocks) = &section.blocks else {
            continue;
        };

        let mut types = Vec::new();
        blocks.collect_types(section.block_order.as_deref(), &mut types);
        candidates.extend(
            types
                .into_iter()
                .filter_map(|block_type| resolver::resolve_block(graph, block_type))
                .map(|target| Candidate::new(target, BindOptions::default())),
        );
    }

    bind_and_traverse(module, candidates, graph, deps).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uri::Uri;

    fn document(json: &str) -> JsonDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_sections_follow_order() {
        let doc = document(
            r#"{
                "sections": {
                    "b": {"type": "featured"},
                    "a": {"type": "hero"},
                    "broken": {"settings": {}},
                    "extra": {"type": "footer"}
                },
                "order": ["a", "b", "missing"]
            }"#,
        );
        let types: Vec<_> = section_entries(&doc).into_iter().map(|s| s.section_type).collect();
        assert_eq!(types, ["hero", "featured", "footer"]);
    }

    #[test]
    fn test_template_layout() {
        let graph = ThemeGraph::new(Uri::new("file:///theme").unwrap());

        let default = layout_candidate(&graph, None).unwrap();
        assert_eq!(default.target.name(), "theme");
        assert_eq!(default.options.kind, ReferenceType::Indirect);

        let named = layout_candidate(&graph, Some(&serde_json::json!("password"))).unwrap();
        assert_eq!(named.target.name(), "password");
        assert_eq!(named.options.kind, ReferenceType::Direct);

        assert!(layout_candidate(&graph, Some(&serde_json::json!(false))).is_none());
    }
}
