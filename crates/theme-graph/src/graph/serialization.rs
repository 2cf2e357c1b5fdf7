//! Serialization methods for ThemeGraph.

use serde::{Deserialize, Serialize};

use super::ThemeGraph;
use crate::module::ModuleType;
use crate::reference::Reference;
use crate::uri::Uri;
use crate::{GraphError, Result};

/// Transport-neutral node record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableNode {
    pub uri: Uri,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
}

/// Flat node/edge list of a graph, free of internal identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableGraph {
    pub root_uri: Uri,
    pub nodes: Vec<SerializableNode>,
    pub edges: Vec<Reference>,
}

/// Flatten `graph` into nodes and edges.
///
/// Only outgoing edges are emitted; every edge also appears in its target's
/// incoming list, so the other direction would be a duplicate.
pub fn serialize(graph: &ThemeGraph) -> SerializableGraph {
    let inner = graph.inner.read();

    let nodes = inner
        .modules
        .values()
        .map(|module| SerializableNode {
            uri: module.uri.clone(),
            module_type: module.module_type(),
            kind: module.kind.kind_str().to_string(),
            exists: module.exists,
        })
        .collect();

    let edges = inner
        .modules
        .values()
        .flat_map(|module| module.dependencies.iter())
        .filter_map(|id| inner.edges.get(id).cloned())
        .collect();

    SerializableGraph {
        root_uri: inner.root_uri.clone(),
        nodes,
        edges,
    }
}

impl ThemeGraph {
    pub fn serialize(&self) -> SerializableGraph {
        serialize(self)
    }

    /// Serialize the graph as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let graph = self.serialize();
        let json = if pretty {
            serde_json::to_string_pretty(&graph)
        } else {
            serde_json::to_string(&graph)
        };
        json.map_err(|e| GraphError::Serialization(format!("failed to serialize graph: {e}")))
    }

    /// Export the graph as DOT for visualization.
    pub fn to_dot_format(&self) -> String {
        let graph = self.serialize();
        let mut output = String::from("digraph ThemeGraph {\n");

        for node in &graph.nodes {
            let style = if node.exists == Some(false) {
                " [style=dashed]"
            } else {
                ""
            };
            output.push_str(&format!("    \"{}\"{};\n", escape_label(node.uri.as_str()), style));
        }

        for edge in &graph.edges {
            output.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{:?}\"];\n",
                escape_label(edge.source.uri.as_str()),
                escape_label(edge.target.uri.as_str()),
                edge.kind
            ));
        }

        output.push_str("}\n");
        output
    }
}

fn escape_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
