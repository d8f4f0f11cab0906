//! Initial grid placement of table nodes.
//!
//! Tables are laid out left to right in a fixed number of grid columns.
//! Each row starts below the tallest node of the previous row, so tables
//! with many columns push later rows down instead of overlapping them.
//! This is a one-shot arrangement; users reposition nodes by hand afterwards.

use crate::schema::Table;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimum node width used by renderers; `gap_x` must leave a gutter beyond it
pub const MIN_NODE_WIDTH: f64 = 280.0;

/// A point on the diagram canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Grid and node-size parameters for [`compute_layout_with`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of grid columns per row
    pub columns_per_row: usize,
    /// Horizontal pitch between grid columns
    pub gap_x: f64,
    /// Vertical gap below the tallest node of a row
    pub gap_y: f64,
    /// Height of a table header
    pub header_height: f64,
    /// Height of one column row inside a table
    pub row_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns_per_row: 3,
            gap_x: 400.0,
            gap_y: 150.0,
            header_height: 60.0,
            row_height: 28.0,
        }
    }
}

impl LayoutConfig {
    /// Rendered height of a table node
    pub fn node_height(&self, table: &Table) -> f64 {
        self.header_height + table.columns.len() as f64 * self.row_height
    }
}

/// Height of a table node under the default layout
pub fn node_height(table: &Table) -> f64 {
    LayoutConfig::default().node_height(table)
}

/// Compute positions for `tables` with the default grid.
///
/// The result is indexed like the input: `layout[i]` is the position of `tables[i]`.
pub fn compute_layout(tables: &[Table]) -> Vec<Position> {
    compute_layout_with(tables, &LayoutConfig::default())
}

/// Compute positions for `tables` with an explicit grid configuration
pub fn compute_layout_with(tables: &[Table], config: &LayoutConfig) -> Vec<Position> {
    let per_row = config.columns_per_row.max(1);
    let mut positions = Vec::with_capacity(tables.len());
    let mut row_top = 0.0;

    for row in tables.chunks(per_row) {
        let mut tallest: f64 = 0.0;
        for (col, table) in row.iter().enumerate() {
            positions.push(Position::new(col as f64 * config.gap_x, row_top));
            tallest = tallest.max(config.node_height(table));
        }
        row_top += tallest + config.gap_y;
    }

    positions
}
