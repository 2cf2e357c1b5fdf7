//! Section and block schemas.
//!
//! Only the parts of a `{% schema %}` document that introduce references are
//! modelled: the accepted block types, the presets and a section's default.
//! Everything else (settings, names, limits) is ignored.

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::source::SourceCode;

/// Wildcard block type accepting every public theme block.
pub const THEME_BLOCKS: &str = "@theme";

/// Wildcard block type for blocks supplied by installed apps.
pub const APP_BLOCKS: &str = "@app";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parsed `{% schema %}` of a section or theme block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThemeSchema {
    #[serde(default)]
    pub blocks: Vec<SchemaBlock>,
    #[serde(default)]
    pub presets: Vec<Preset>,
    #[serde(default)]
    pub default: Option<SectionDefault>,
}

/// Entry of the schema's `blocks` array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaBlock {
    #[serde(rename = "type", default)]
    pub block_type: String,
    /// Only blocks defined inline in the section carry a name.
    #[serde(default)]
    pub name: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Preset {
    #[serde(default)]
    pub blocks: Option<BlockList>,
    #[serde(default)]
    pub block_order: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SectionDefault {
    #[serde(default)]
    pub blocks: Option<BlockList>,
}

/// A tree of configured blocks, as found in presets and JSON templates.
///
/// Presets use the array form; templates use an `id -> block` map together with
/// a `block_order` list. Both nest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BlockList {
    Array(Vec<BlockEntry>),
    Map(IndexMap<String, BlockEntry>),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BlockEntry {
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub blocks: Option<BlockList>,
    #[serde(default)]
    pub block_order: Option<Vec<String>>,
    #[serde(rename = "static", default)]
    pub is_static: bool,
}

/// What a `blocks` entry of a schema accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredBlock<'a> {
    /// A theme block file by name.
    Theme(&'a str),
    /// `@theme`: every public block file.
    AnyThemeBlock,
    /// `@app` and other platform-provided types.
    Platform,
}

impl ThemeSchema {
    pub fn parse(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Schema declared by a Liquid source, if any.
    pub fn from_source(source: &SourceCode) -> Option<Result<Self, SchemaError>> {
        let schema = source.liquid()?.schema.as_ref()?;
        Some(Self::parse(&schema.body))
    }

    /// Whether the schema defines its blocks inline instead of referencing files.
    pub fn uses_local_blocks(&self) -> bool {
        self.blocks
            .iter()
            .any(|block| block.name.is_some() && !block.block_type.starts_with('@'))
    }

    pub fn declared_blocks(&self) -> impl Iterator<Item = DeclaredBlock<'_>> {
        self.blocks
            .iter()
            .filter(|block| !block.block_type.is_empty())
            .map(|block| match block.block_type.as_str() {
                THEME_BLOCKS => DeclaredBlock::AnyThemeBlock,
                other if other.starts_with('@') => DeclaredBlock::Platform,
                other => DeclaredBlock::Theme(other),
            })
    }

    /// Block types configured by the presets and the section default, depth first.
    pub fn preset_block_types(&self) -> Vec<&str> {
        let mut types = Vec::new();
        for preset in &self.presets {
            if let Some(blocks) = &preset.blocks {
                blocks.collect_types(preset.block_order.as_deref(), &mut types);
            }
        }
        if let Some(blocks) = self.default.as_ref().and_then(|d| d.blocks.as_ref()) {
            blocks.collect_types(None, &mut types);
        }
        types
    }
}

impl BlockList {
    /// Entries in render order: `order` first, then any unlisted map entries.
    pub fn entries<'a>(&'a self, order: Option<&[String]>) -> Vec<&'a BlockEntry> {
        match self {
            BlockList::Array(entries) => entries.iter().collect(),
            BlockList::Map(entries) => {
                let mut ordered: Vec<&BlockEntry> = Vec::with_capacity(entries.len());
                let order = order.unwrap_or_default();
                ordered.extend(order.iter().filter_map(|id| entries.get(id)));
                ordered.extend(
                    entries
                        .iter()
                        .filter(|(id, _)| !order.contains(id))
                        .map(|(_, entry)| entry),
                );
                ordered
            }
        }
    }

    /// Every file-backed block type in the tree, depth first.
    ///
    /// Platform types (`@app`) are skipped along with anything nested under them.
    pub fn collect_types<'a>(&'a self, order: Option<&[String]>, out: &mut Vec<&'a str>) {
        for entry in self.entries(order) {
            if entry.block_type.is_empty() || entry.block_type.starts_with('@') {
                continue;
            }
            out.push(&entry.block_type);
            if let Some(children) = &entry.blocks {
                children.collect_types(entry.block_order.as_deref(), out);
            }
        }
    }
}
