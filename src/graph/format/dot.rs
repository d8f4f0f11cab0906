//! Graphviz DOT format output.
//!
//! Nodes carry `pos` attributes from the grid layout, so `neato -n` reproduces
//! the same arrangement as the interactive viewer. Column rows are ports,
//! letting edges attach to the exact handle column.

use crate::graph::builder::{Graph, Node};

/// Generate DOT output with HTML-like table labels
pub fn to_dot(graph: &Graph) -> String {
    let mut output = String::new();

    output.push_str("digraph ERD {\n");
    output.push_str("  graph [pad=\"0.5\", splines=true, overlap=false];\n");
    output.push_str("  node [shape=none, margin=0];\n");
    output.push_str("  edge [dir=both];\n\n");

    for node in &graph.nodes {
        // DOT's y axis points up, the canvas' points down
        output.push_str(&format!(
            "  {} [pos=\"{},{}!\", label=<{}>];\n",
            escape_dot_id(&node.id),
            node.position.x,
            0.0 - node.position.y,
            generate_table_label(node)
        ));
    }

    if !graph.edges.is_empty() {
        output.push('\n');
    }

    for edge in &graph.edges {
        let (tail, head) = edge.markers().as_dot_arrows();
        output.push_str(&format!(
            "  {}:{} -> {}:{} [arrowtail={}, arrowhead={}, label=\"{}\"];\n",
            escape_dot_id(&edge.source),
            escape_dot_id(&edge.from_column),
            escape_dot_id(&edge.target),
            escape_dot_id(&edge.to_column),
            tail,
            head,
            edge.markers().label
        ));
    }

    output.push_str("}\n");
    output
}

fn generate_table_label(node: &Node) -> String {
    let table = &node.data.table;
    let header_color = if node.data.is_highlighted {
        "#2b6cb0"
    } else {
        "#4a5568"
    };

    let mut html = String::new();
    html.push_str("<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">");
    html.push_str(&format!(
        "<TR><TD BGCOLOR=\"{}\" COLSPAN=\"3\"><FONT COLOR=\"white\"><B>{}</B> ({} cols)</FONT></TD></TR>",
        header_color,
        escape_html(&table.name),
        table.columns.len()
    ));

    for col in &table.columns {
        let key_marker = if col.pk {
            "PK"
        } else if col.fk {
            "FK"
        } else if col.unique {
            "UK"
        } else {
            ""
        };

        let highlighted = node.data.highlighted_column.as_deref() == Some(col.name.as_str());
        let bg = if highlighted { " BGCOLOR=\"#bee3f8\"" } else { "" };
        let null_marker = if col.nullable && !col.pk {
            " <FONT COLOR=\"#888888\">NULL</FONT>"
        } else {
            ""
        };

        html.push_str("<TR>");
        html.push_str(&format!(
            "<TD ALIGN=\"LEFT\" PORT=\"{}\"{}>{}{}</TD>",
            escape_html(&col.name),
            bg,
            escape_html(&col.name),
            null_marker
        ));
        html.push_str(&format!(
            "<TD ALIGN=\"LEFT\"{}><FONT COLOR=\"#666666\">{}</FONT></TD>",
            bg,
            escape_html(col.display_type())
        ));
        html.push_str(&format!("<TD ALIGN=\"CENTER\"{}>{}</TD>", bg, key_marker));
        html.push_str("</TR>");
    }

    html.push_str("</TABLE>");
    html
}

/// Escape a string for use in DOT HTML labels
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape a string for use as a DOT node ID
fn escape_dot_id(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_') {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::schema::{Column, DatabaseSchema, Relation, RelationType, Table};

    #[test]
    fn test_dot_positions_and_ports() {
        let graph = build_graph(&DatabaseSchema::new(
            vec![
                Table::new("users", vec![Column::new("id", "int").primary_key()]),
                Table::new("orders", vec![Column::new("user_id", "int").foreign_key()]),
            ],
            vec![Relation::new("orders", "user_id", "users", "id", RelationType::OneToMany)],
        ));

        let output = to_dot(&graph);
        assert!(output.starts_with("digraph ERD {"));
        assert!(output.contains("users [pos=\"0,0!\""));
        assert!(output.contains("orders [pos=\"400,0!\""));
        assert!(output.contains("orders:user_id -> users:id [arrowtail=tee, arrowhead=crow, label=\"1:N\"]"));
    }

    #[test]
    fn test_escape_dot_id() {
        assert_eq!(escape_dot_id("users"), "users");
        assert_eq!(escape_dot_id("order items"), "\"order items\"");
        assert_eq!(escape_dot_id(""), "\"\"");
    }
}
