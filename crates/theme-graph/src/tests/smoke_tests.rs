//! Graph primitives and export formats.

use super::assert_edge_symmetry;
use crate::{
    BindOptions, LiquidKind, ModuleKind, Range, ReferenceType, SerializableGraph, ThemeGraph,
    ThemeModule, Uri,
};

fn module(path: &str, kind: LiquidKind) -> ThemeModule {
    let uri = Uri::new(format!("file:///theme/{path}")).unwrap();
    ThemeModule::stub(uri, ModuleKind::Liquid(kind))
}

fn graph() -> ThemeGraph {
    ThemeGraph::new(Uri::new("file:///theme").unwrap())
}

#[test]
fn test_bind_records_one_edge_on_both_ends() {
    let graph = graph();
    let section = module("sections/main.liquid", LiquidKind::Section);
    let snippet = module("snippets/card.liquid", LiquidKind::Snippet);

    let id = graph.bind(&section, &snippet, BindOptions::direct(Some(Range::new(0, 19))));

    let source = graph.module(&section.uri).unwrap();
    let target = graph.module(&snippet.uri).unwrap();
    assert_eq!(source.dependencies, [id]);
    assert_eq!(target.references, [id]);
    assert_eq!(graph.edge_count(), 1);

    let edge = graph.reference(id).unwrap();
    assert_eq!(edge.kind, ReferenceType::Direct);
    assert_eq!(edge.source.range, Some(Range::new(0, 19)));
    assert_eq!(edge.target.range, None);
    assert_eq!(graph.dependencies(&section.uri), graph.references(&snippet.uri));
}

#[test]
fn test_repeated_references_are_separate_edges() {
    let graph = graph();
    let section = module("sections/main.liquid", LiquidKind::Section);
    let snippet = module("snippets/card.liquid", LiquidKind::Snippet);

    graph.bind(&section, &snippet, BindOptions::direct(Some(Range::new(0, 19))));
    graph.bind(&section, &snippet, BindOptions::direct(Some(Range::new(30, 49))));

    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.references(&snippet.uri).len(), 2);
    assert_edge_symmetry(&graph);
}

#[test]
fn test_flushing_dependencies_clears_both_ends() {
    let graph = graph();
    let section = module("sections/main.liquid", LiquidKind::Section);
    let a = module("snippets/a.liquid", LiquidKind::Snippet);
    let b = module("snippets/b.liquid", LiquidKind::Snippet);
    graph.bind(&section, &a, BindOptions::default());
    graph.bind(&section, &b, BindOptions::default());
    graph.bind(&a, &b, BindOptions::default());

    graph.inner.write().flush_dependencies(&section.uri);

    assert!(graph.dependencies(&section.uri).is_empty());
    assert!(graph.references(&a.uri).is_empty());
    assert_eq!(graph.references(&b.uri).len(), 1);
    assert_eq!(graph.edge_count(), 1);
    assert_edge_symmetry(&graph);
}

#[test]
fn test_removing_a_module_removes_its_edges() {
    let graph = graph();
    let section = module("sections/main.liquid", LiquidKind::Section);
    let snippet = module("snippets/card.liquid", LiquidKind::Snippet);
    let leaf = module("snippets/leaf.liquid", LiquidKind::Snippet);
    graph.bind(&section, &snippet, BindOptions::default());
    graph.bind(&snippet, &leaf, BindOptions::default());

    let removed = graph.inner.write().remove_module(&snippet.uri);

    assert!(removed.is_some());
    assert!(!graph.contains(&snippet.uri));
    assert!(graph.dependencies(&section.uri).is_empty());
    assert!(graph.references(&leaf.uri).is_empty());
    assert_eq!(graph.edge_count(), 0);
    assert_edge_symmetry(&graph);
}

#[test]
fn test_self_reference_is_one_edge() {
    let graph = graph();
    let snippet = module("snippets/loop.liquid", LiquidKind::Snippet);

    graph.bind(&snippet, &snippet, BindOptions::default());
    let stored = graph.module(&snippet.uri).unwrap();
    assert_eq!(stored.dependencies.len(), 1);
    assert_eq!(stored.references, stored.dependencies);

    graph.inner.write().flush_dependencies(&snippet.uri);
    let stored = graph.module(&snippet.uri).unwrap();
    assert!(stored.references.is_empty());
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_dead_links_list_their_referrers() {
    let graph = graph();
    let a = module("sections/a.liquid", LiquidKind::Section);
    let b = module("sections/b.liquid", LiquidKind::Section);
    let missing = module("snippets/missing.liquid", LiquidKind::Snippet);
    graph.bind(&a, &missing, BindOptions::default());
    graph.bind(&b, &missing, BindOptions::default());
    graph.inner.write().set_exists(&missing.uri, false);

    let dead = graph.dead_links();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].uri, missing.uri);
    let referrers: Vec<&Uri> = dead[0].referenced_by.iter().map(|location| &location.uri).collect();
    assert_eq!(referrers, [&a.uri, &b.uri]);
}

#[test]
fn test_prune_keeps_referenced_dead_links() {
    let graph = graph();
    let section = module("sections/a.liquid", LiquidKind::Section);
    let kept = module("snippets/kept.liquid", LiquidKind::Snippet);
    let orphan = module("snippets/orphan.liquid", LiquidKind::Snippet);
    graph.bind(&section, &kept, BindOptions::default());
    {
        let mut inner = graph.inner.write();
        inner.ensure_module(&orphan);
        inner.set_exists(&kept.uri, false);
        inner.set_exists(&orphan.uri, false);
    }

    let pruned = graph.inner.write().prune_dead_links();

    assert_eq!(pruned, [orphan.uri.clone()]);
    assert!(graph.contains(&kept.uri));
}

#[test]
fn test_json_export_shape() {
    let graph = graph();
    let section = module("sections/main.liquid", LiquidKind::Section);
    let block = module("blocks/text.liquid", LiquidKind::Block);
    graph.bind(&section, &block, BindOptions::of_kind(ReferenceType::Indirect));
    graph.inner.write().set_exists(&section.uri, true);

    let json = graph.to_json(false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["rootUri"], "file:///theme");
    assert_eq!(value["nodes"][0]["uri"], "file:///theme/sections/main.liquid");
    assert_eq!(value["nodes"][0]["type"], "liquid");
    assert_eq!(value["nodes"][0]["kind"], "section");
    assert_eq!(value["nodes"][0]["exists"], true);
    assert!(value["nodes"][1].get("exists").is_none());
    assert_eq!(value["edges"][0]["type"], "indirect");
    assert!(value["edges"][0]["source"].get("range").is_none());

    let parsed: SerializableGraph = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, graph.serialize());
}

#[test]
fn test_dot_export() {
    let graph = graph();
    let section = module("sections/main.liquid", LiquidKind::Section);
    let missing = module("snippets/gone.liquid", LiquidKind::Snippet);
    graph.bind(&section, &missing, BindOptions::default());
    graph.inner.write().set_exists(&missing.uri, false);

    let dot = graph.to_dot_format();

    assert!(dot.starts_with("digraph ThemeGraph {"));
    assert!(dot.contains("\"file:///theme/snippets/gone.liquid\" [style=dashed];"));
    assert!(dot.contains(
        "\"file:///theme/sections/main.liquid\" -> \"file:///theme/snippets/gone.liquid\" [label=\"Direct\"];"
    ));
    assert!(dot.trim_end().ends_with('}'));
}
