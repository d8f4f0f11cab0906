//! Graph building: schema -> render-ready nodes and edges.

use crate::graph::cardinality::CardinalityMarkers;
use crate::graph::classify::classify;
use crate::graph::layout::{compute_layout_with, LayoutConfig, Position};
use crate::schema::{DatabaseSchema, RelationType, Table};
use ahash::AHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Render-facing payload of a table node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub table: Table,
    pub is_highlighted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_column: Option<String>,
    /// Columns with an outgoing relation (right-side handles)
    pub source_columns: BTreeSet<String>,
    /// Columns referenced by other tables (left-side handles)
    pub target_columns: BTreeSet<String>,
}

/// One table on the diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Node {
    pub id: String,
    pub position: Position,
    pub data: NodeData,
}

impl Node {
    pub fn table_name(&self) -> &str {
        &self.data.table.name
    }

    pub fn is_highlighted(&self) -> bool {
        self.data.is_highlighted
    }

    pub fn highlighted_column(&self) -> Option<&str> {
        self.data.highlighted_column.as_deref()
    }

    pub(crate) fn set_highlight(&mut self, highlighted: bool, column: Option<&str>) {
        self.data.is_highlighted = highlighted;
        self.data.highlighted_column = column.map(str::to_string);
    }
}

/// One foreign-key relation on the diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    /// Table holding the foreign key
    pub source: String,
    /// Referenced table
    pub target: String,
    pub source_handle: String,
    pub target_handle: String,
    pub relation_type: RelationType,
    pub from_column: String,
    pub to_column: String,
}

impl Edge {
    /// Marker shapes for both ends of this edge
    pub fn markers(&self) -> CardinalityMarkers {
        CardinalityMarkers::for_relation(self.relation_type)
    }
}

/// Derived diagram: nodes in table order, edges in relation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Identifier of the connector for `column` on `table`
pub fn handle_id(table: &str, column: &str) -> String {
    format!("{}-{}", table, column)
}

/// Build the diagram with the default grid layout
pub fn build_graph(schema: &DatabaseSchema) -> Graph {
    build_graph_with(schema, &LayoutConfig::default())
}

/// Build the diagram for an already-deduplicated schema.
///
/// Pure and deterministic: the same schema always yields the same ids and
/// positions. Relations pointing at tables that are not in the schema are
/// kept as orphan edges.
pub fn build_graph_with(schema: &DatabaseSchema, config: &LayoutConfig) -> Graph {
    let layout = compute_layout_with(&schema.tables, config);
    let columns = classify(&schema.relations);

    let mut used_ids: AHashSet<String> = AHashSet::with_capacity(schema.tables.len());
    let nodes: Vec<Node> = schema
        .tables
        .iter()
        .zip(layout)
        .enumerate()
        .map(|(index, (table, position))| {
            let mut id = table.name.clone();
            if used_ids.contains(&id) {
                id = format!("{}_{}", table.name, index);
                warn!(table = %table.name, node_id = %id, "duplicate table name, suffixing node id");
            }
            used_ids.insert(id.clone());

            Node {
                id,
                position,
                data: NodeData {
                    table: table.clone(),
                    is_highlighted: false,
                    highlighted_column: None,
                    source_columns: columns.source_columns(&table.name),
                    target_columns: columns.target_columns(&table.name),
                },
            }
        })
        .collect();

    let edges: Vec<Edge> = schema
        .relations
        .iter()
        .filter(|r| !r.is_self_referencing())
        .enumerate()
        .map(|(index, relation)| Edge {
            id: format!(
                "edge-{}-{}-{}-{}-{}",
                index,
                relation.from_table,
                relation.from_column,
                relation.to_table,
                relation.to_column
            ),
            source: relation.from_table.clone(),
            target: relation.to_table.clone(),
            source_handle: handle_id(&relation.from_table, &relation.from_column),
            target_handle: handle_id(&relation.to_table, &relation.to_column),
            relation_type: relation.relation_type,
            from_column: relation.from_column.clone(),
            to_column: relation.to_column.clone(),
        })
        .collect();

    for relation in schema.dangling_relations() {
        warn!(
            from = %format!("{}.{}", relation.from_table, relation.from_column),
            to = %format!("{}.{}", relation.to_table, relation.to_column),
            "relation references a table or column missing from the schema, keeping orphan edge"
        );
    }

    debug!(nodes = nodes.len(), edges = edges.len(), "built diagram graph");

    Graph { nodes, edges }
}
