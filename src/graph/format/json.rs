//! JSON output: the node/edge contract consumed by interactive renderers.

use crate::graph::builder::{Graph, Node};
use crate::graph::cardinality::Marker;
use crate::schema::{Dialect, RelationType};
use schemars::JsonSchema;
use serde::Serialize;

/// JSON representation of the diagram
#[derive(Debug, Serialize, JsonSchema)]
pub struct DiagramJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
    pub nodes: Vec<Node>,
    pub edges: Vec<EdgeJson>,
    pub stats: DiagramStats,
}

/// Edge plus the marker metadata needed to draw it
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EdgeJson {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: String,
    pub target_handle: String,
    pub relation_type: RelationType,
    pub from_column: String,
    pub to_column: String,
    pub label: String,
    pub source_marker: Marker,
    pub target_marker: Marker,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagramStats {
    pub table_count: usize,
    pub column_count: usize,
    pub relationship_count: usize,
}

/// Generate JSON output for a diagram
pub fn to_json(graph: &Graph, name: Option<&str>, dialect: Option<Dialect>) -> String {
    let diagram = build_diagram_json(graph, name, dialect);
    serde_json::to_string_pretty(&diagram).unwrap_or_else(|_| "{}".to_string())
}

pub fn build_diagram_json(graph: &Graph, name: Option<&str>, dialect: Option<Dialect>) -> DiagramJson {
    let edges = graph
        .edges
        .iter()
        .map(|e| {
            let markers = e.markers();
            EdgeJson {
                id: e.id.clone(),
                source: e.source.clone(),
                target: e.target.clone(),
                source_handle: e.source_handle.clone(),
                target_handle: e.target_handle.clone(),
                relation_type: e.relation_type,
                from_column: e.from_column.clone(),
                to_column: e.to_column.clone(),
                label: markers.label.to_string(),
                source_marker: markers.source,
                target_marker: markers.target,
            }
        })
        .collect();

    DiagramJson {
        name: name.map(str::to_string),
        dialect,
        nodes: graph.nodes.clone(),
        edges,
        stats: DiagramStats {
            table_count: graph.node_count(),
            column_count: graph.nodes.iter().map(|n| n.data.table.columns.len()).sum(),
            relationship_count: graph.edge_count(),
        },
    }
}
