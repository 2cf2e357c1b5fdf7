use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reference::ReferenceId;
use crate::uri::Uri;

/// Structural category of a theme file. Each type has its own traversal rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Liquid,
    Json,
    JavaScript,
    Css,
}

/// Kinds of Liquid files, derived from the folder they live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidKind {
    Layout,
    Section,
    Block,
    Snippet,
    Template,
}

/// Kinds of JSON files that participate in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JsonKind {
    Template,
    SectionGroup,
}

/// Type and kind of a module as a single sum type.
///
/// Matches over this enum are written without wildcard arms so that a new
/// variant has to be handled at every traversal site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Liquid(LiquidKind),
    Json(JsonKind),
    JavaScript,
    Css,
}

impl ModuleKind {
    pub fn module_type(&self) -> ModuleType {
        match self {
            ModuleKind::Liquid(_) => ModuleType::Liquid,
            ModuleKind::Json(_) => ModuleType::Json,
            ModuleKind::JavaScript => ModuleType::JavaScript,
            ModuleKind::Css => ModuleType::Css,
        }
    }

    /// Kind discriminant as it appears in serialized graphs.
    pub fn kind_str(&self) -> &'static str {
        match self {
            ModuleKind::Liquid(LiquidKind::Layout) => "layout",
            ModuleKind::Liquid(LiquidKind::Section) => "section",
            ModuleKind::Liquid(LiquidKind::Block) => "block",
            ModuleKind::Liquid(LiquidKind::Snippet) => "snippet",
            ModuleKind::Liquid(LiquidKind::Template) => "template",
            ModuleKind::Json(JsonKind::Template) => "template",
            ModuleKind::Json(JsonKind::SectionGroup) => "section-group",
            ModuleKind::JavaScript | ModuleKind::Css => "asset",
        }
    }

    /// Templates and sections are reachable without any incoming reference.
    pub fn is_entry_point(&self) -> bool {
        match self {
            ModuleKind::Liquid(LiquidKind::Template)
            | ModuleKind::Liquid(LiquidKind::Section)
            | ModuleKind::Json(JsonKind::Template) => true,
            ModuleKind::Liquid(LiquidKind::Layout)
            | ModuleKind::Liquid(LiquidKind::Block)
            | ModuleKind::Liquid(LiquidKind::Snippet)
            | ModuleKind::Json(JsonKind::SectionGroup)
            | ModuleKind::JavaScript
            | ModuleKind::Css => false,
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.module_type(), self.kind_str())
    }
}

/// A node in the theme graph, one per file URI.
///
/// Edges are stored in the graph's edge arena; `dependencies` and `references`
/// hold the ids of outgoing and incoming edges respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeModule {
    pub uri: Uri,
    pub kind: ModuleKind,
    pub dependencies: Vec<ReferenceId>,
    pub references: Vec<ReferenceId>,
    /// `None` until traversed, then whether the file is present on disk.
    pub exists: Option<bool>,
    pub(crate) traversed: bool,
}

impl ThemeModule {
    /// Fresh module with no edges and unknown existence.
    pub fn stub(uri: Uri, kind: ModuleKind) -> Self {
        Self {
            uri,
            kind,
            dependencies: Vec::new(),
            references: Vec::new(),
            exists: None,
            traversed: false,
        }
    }

    pub fn module_type(&self) -> ModuleType {
        self.kind.module_type()
    }

    /// Theme name of the module (`"card"` for `snippets/card.liquid`).
    pub fn name(&self) -> &str {
        self.uri.file_stem()
    }

    /// Referenced by something but missing on disk.
    pub fn is_dead_link(&self) -> bool {
        self.exists == Some(false) && !self.references.is_empty()
    }

    pub fn is_traversed(&self) -> bool {
        self.traversed
    }
}
