//! ERD (Entity-Relationship Diagram) derivation.
//!
//! This module provides:
//! - Deterministic grid layout accounting for table heights
//! - Relation classification into per-table connector columns
//! - Node/edge graph building with stable identities
//! - Cardinality markers, table search, and output formats (JSON, Mermaid, DOT)

pub mod builder;
pub mod cardinality;
pub mod classify;
pub mod format;
pub mod layout;
pub mod search;

pub use builder::{build_graph, build_graph_with, handle_id, Edge, Graph, Node, NodeData};
pub use cardinality::{relation_label, CardinalityMarkers, Marker};
pub use classify::{classify, RelationColumns};
pub use format::{to_dot, to_json, to_mermaid, OutputFormat};
pub use layout::{compute_layout, compute_layout_with, node_height, LayoutConfig, Position};
pub use search::{filter_tables, matching_columns, search, SearchHit, SearchResult};
