//! Interaction state for a diagram session.
//!
//! [`DiagramState`] owns the current schema, the derived nodes and edges, and
//! the selection/search state. All commands are synchronous and total: unknown
//! tables or columns simply highlight nothing. Base positions are only
//! recomputed by [`DiagramState::load_schema`] and [`DiagramState::reset_layout`].

use crate::graph::{build_graph_with, filter_tables, Edge, Graph, LayoutConfig, Node, Position};
use crate::schema::{DatabaseSchema, Table};
use crate::source::AcquisitionError;
use tracing::{debug, info};

/// Current selection; a column selection always names its table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Table(String),
    Column { table: String, column: String },
}

/// Single-session owner of schema, derived graph and selection
#[derive(Debug, Clone)]
pub struct DiagramState {
    schema: Option<DatabaseSchema>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    selected_table: Option<String>,
    selected_column: Option<String>,
    search_query: String,
    show_columns: bool,
    is_loading: bool,
    layout: LayoutConfig,
}

impl Default for DiagramState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramState {
    /// Empty state with the default grid layout
    pub fn new() -> Self {
        Self::with_layout(LayoutConfig::default())
    }

    pub fn with_layout(layout: LayoutConfig) -> Self {
        Self {
            schema: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            selected_table: None,
            selected_column: None,
            search_query: String::new(),
            show_columns: true,
            is_loading: false,
            layout,
        }
    }

    // Accessors

    pub fn schema(&self) -> Option<&DatabaseSchema> {
        self.schema.as_ref()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn selected_table(&self) -> Option<&str> {
        self.selected_table.as_deref()
    }

    pub fn selected_column(&self) -> Option<&str> {
        self.selected_column.as_deref()
    }

    pub fn selection(&self) -> Selection {
        match (&self.selected_table, &self.selected_column) {
            (Some(table), Some(column)) => Selection::Column {
                table: table.clone(),
                column: column.clone(),
            },
            (Some(table), None) => Selection::Table(table.clone()),
            _ => Selection::None,
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn show_columns(&self) -> bool {
        self.show_columns
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Snapshot of the current nodes and edges
    pub fn graph(&self) -> Graph {
        Graph {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    // Commands

    /// Replace the schema wholesale, deduplicating tables by name (first wins)
    pub fn load_schema(&mut self, schema: DatabaseSchema) -> &[Node] {
        let before = schema.tables.len();
        let schema = schema.dedup_tables();
        info!(
            name = schema.name.as_deref().unwrap_or("<unnamed>"),
            tables = schema.tables.len(),
            dropped_duplicates = before - schema.tables.len(),
            relations = schema.relations.len(),
            "loading schema"
        );

        let graph = build_graph_with(&schema, &self.layout);
        self.nodes = graph.nodes;
        self.edges = graph.edges;
        self.schema = Some(schema);
        self.selected_table = None;
        self.selected_column = None;
        &self.nodes
    }

    /// Select a whole table; selecting the current sole selection again clears it
    pub fn select_table(&mut self, name: &str) -> &[Node] {
        if self.selected_table.as_deref() == Some(name) && self.selected_column.is_none() {
            return self.clear_selection();
        }

        debug!(table = name, "select table");
        self.selected_table = Some(name.to_string());
        self.selected_column = None;
        for node in &mut self.nodes {
            let highlighted = node.id == name;
            node.set_highlight(highlighted, None);
        }
        &self.nodes
    }

    /// Select one column; selecting the same pair again clears the selection
    pub fn select_column(&mut self, table: &str, column: &str) -> &[Node] {
        if self.selected_table.as_deref() == Some(table)
            && self.selected_column.as_deref() == Some(column)
        {
            return self.clear_selection();
        }

        debug!(table, column, "select column");
        self.selected_table = Some(table.to_string());
        self.selected_column = Some(column.to_string());
        for node in &mut self.nodes {
            if node.id == table {
                node.set_highlight(true, Some(column));
            } else {
                node.set_highlight(false, None);
            }
        }
        &self.nodes
    }

    pub fn clear_selection(&mut self) -> &[Node] {
        self.selected_table = None;
        self.selected_column = None;
        for node in &mut self.nodes {
            node.set_highlight(false, None);
        }
        &self.nodes
    }

    /// Store the raw query; see [`DiagramState::filtered_tables`]
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Tables matching the current search query, in schema order
    pub fn filtered_tables(&self) -> Vec<&Table> {
        match &self.schema {
            Some(schema) => filter_tables(schema, &self.search_query),
            None => Vec::new(),
        }
    }

    pub fn toggle_show_columns(&mut self) -> bool {
        self.show_columns = !self.show_columns;
        self.show_columns
    }

    /// Move one node, as a drag would. Returns false for an unknown id.
    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Rebuild nodes and edges from the loaded schema, dropping dragged
    /// positions and the selection. No-op without a schema.
    pub fn reset_layout(&mut self) -> &[Node] {
        if let Some(schema) = &self.schema {
            debug!("resetting layout");
            let graph = build_graph_with(schema, &self.layout);
            self.nodes = graph.nodes;
            self.edges = graph.edges;
            self.selected_table = None;
            self.selected_column = None;
        }
        &self.nodes
    }

    /// Back to the initial empty state, keeping the layout configuration
    pub fn reset_store(&mut self) {
        *self = Self::with_layout(self.layout);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    /// Mark an acquisition as in flight
    pub fn begin_load(&mut self) {
        self.is_loading = true;
    }

    /// Apply the outcome of an acquisition.
    ///
    /// The loading flag is cleared either way. On failure the current schema
    /// and diagram are left untouched and the error is handed back.
    pub fn finish_load(
        &mut self,
        result: Result<DatabaseSchema, AcquisitionError>,
    ) -> Result<(), AcquisitionError> {
        self.is_loading = false;
        match result {
            Ok(schema) => {
                self.load_schema(schema);
                Ok(())
            }
            Err(e) => {
                info!(error = %e, "schema acquisition failed, keeping current diagram");
                Err(e)
            }
        }
    }
}
