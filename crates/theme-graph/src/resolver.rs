//! Module resolution.
//!
//! Maps URIs to modules using the theme folder convention, and owns the naming
//! convention in the other direction ("the snippet named `x`" is
//! `snippets/x.liquid`). No other part of the crate builds theme URIs by hand.

use crate::graph::ThemeGraph;
use crate::module::{JsonKind, LiquidKind, ModuleKind, ThemeModule};
use crate::uri::Uri;

pub const ASSETS_DIR: &str = "assets";
pub const BLOCKS_DIR: &str = "blocks";
pub const LAYOUT_DIR: &str = "layout";
pub const SECTIONS_DIR: &str = "sections";
pub const SNIPPETS_DIR: &str = "snippets";
pub const TEMPLATES_DIR: &str = "templates";

/// Layout used by templates that do not choose one.
pub const DEFAULT_LAYOUT: &str = "theme";

/// Kind of the file at `uri`, or `None` when it is not part of the graph.
///
/// Every folder is flat except `templates/`, which may contain `customers/` and
/// similar sub-folders.
pub fn classify(root: &Uri, uri: &Uri) -> Option<ModuleKind> {
    let relative = uri.relative_to(root)?;
    let (folder, rest) = relative.split_once('/')?;
    let extension = uri.extension()?;

    if folder == TEMPLATES_DIR {
        return match extension {
            "liquid" => Some(ModuleKind::Liquid(LiquidKind::Template)),
            "json" => Some(ModuleKind::Json(JsonKind::Template)),
            _ => None,
        };
    }
    if rest.contains('/') {
        return None;
    }

    match (folder, extension) {
        (ASSETS_DIR, "js" | "mjs") => Some(ModuleKind::JavaScript),
        (ASSETS_DIR, "css") => Some(ModuleKind::Css),
        (BLOCKS_DIR, "liquid") => Some(ModuleKind::Liquid(LiquidKind::Block)),
        (LAYOUT_DIR, "liquid") => Some(ModuleKind::Liquid(LiquidKind::Layout)),
        (SECTIONS_DIR, "liquid") => Some(ModuleKind::Liquid(LiquidKind::Section)),
        (SECTIONS_DIR, "json") => Some(ModuleKind::Json(JsonKind::SectionGroup)),
        (SNIPPETS_DIR, "liquid") => Some(ModuleKind::Liquid(LiquidKind::Snippet)),
        _ => None,
    }
}

/// The module stored under `uri`, or a fresh stub when the graph has not seen it.
///
/// Returns `None` for files outside the theme convention; those never enter the graph.
pub fn resolve(graph: &ThemeGraph, uri: &Uri) -> Option<ThemeModule> {
    if let Some(module) = graph.module(uri) {
        return Some(module);
    }
    let kind = classify(&graph.root_uri(), uri)?;
    Some(ThemeModule::stub(uri.clone(), kind))
}

/// Whether `uri` is a block file other theme files can pick up through `@theme`.
pub fn is_public_block(root: &Uri, uri: &Uri) -> bool {
    matches!(classify(root, uri), Some(ModuleKind::Liquid(LiquidKind::Block)))
        && !is_private_name(uri.file_stem())
}

/// Names starting with an underscore are private to the theme.
pub fn is_private_name(name: &str) -> bool {
    name.starts_with('_')
}

fn named(root: &Uri, folder: &str, file: &str) -> Uri {
    root.join(&format!("{folder}/{file}"))
}

pub fn snippet_uri(root: &Uri, name: &str) -> Uri {
    named(root, SNIPPETS_DIR, &format!("{name}.liquid"))
}

pub fn section_uri(root: &Uri, name: &str) -> Uri {
    named(root, SECTIONS_DIR, &format!("{name}.liquid"))
}

pub fn section_group_uri(root: &Uri, name: &str) -> Uri {
    named(root, SECTIONS_DIR, &format!("{name}.json"))
}

pub fn block_uri(root: &Uri, name: &str) -> Uri {
    named(root, BLOCKS_DIR, &format!("{name}.liquid"))
}

pub fn layout_uri(root: &Uri, name: &str) -> Uri {
    named(root, LAYOUT_DIR, &format!("{name}.liquid"))
}

/// Assets are named with their extension (`theme.css`).
pub fn asset_uri(root: &Uri, file_name: &str) -> Uri {
    named(root, ASSETS_DIR, file_name)
}

fn resolve_named(graph: &ThemeGraph, name: &str, to_uri: fn(&Uri, &str) -> Uri) -> Option<ThemeModule> {
    if name.is_empty() {
        return None;
    }
    resolve(graph, &to_uri(&graph.root_uri(), name))
}

pub fn resolve_snippet(graph: &ThemeGraph, name: &str) -> Option<ThemeModule> {
    resolve_named(graph, name, snippet_uri)
}

pub fn resolve_section(graph: &ThemeGraph, name: &str) -> Option<ThemeModule> {
    resolve_named(graph, name, section_uri)
}

pub fn resolve_section_group(graph: &ThemeGraph, name: &str) -> Option<ThemeModule> {
    resolve_named(graph, name, section_group_uri)
}

pub fn resolve_block(graph: &ThemeGraph, name: &str) -> Option<ThemeModule> {
    resolve_named(graph, name, block_uri)
}

pub fn resolve_layout(graph: &ThemeGraph, name: &str) -> Option<ThemeModule> {
    resolve_named(graph, name, layout_uri)
}

pub fn resolve_asset(graph: &ThemeGraph, file_name: &str) -> Option<ThemeModule> {
    resolve_named(graph, file_name, asset_uri)
}
