//! Mermaid erDiagram format output.

use crate::graph::builder::Graph;

/// Generate a Mermaid erDiagram, entities in node order
pub fn to_mermaid(graph: &Graph) -> String {
    let mut output = String::from("erDiagram\n");

    for node in &graph.nodes {
        output.push_str(&format!("    {} {{\n", escape_mermaid_id(&node.id)));

        for col in &node.data.table.columns {
            let col_type = escape_mermaid_id(col.display_type());
            let col_name = escape_mermaid_id(&col.name);
            let keys: Vec<&str> = [(col.pk, "PK"), (col.fk, "FK"), (col.unique && !col.pk, "UK")]
                .into_iter()
                .filter_map(|(on, key)| on.then_some(key))
                .collect();

            if keys.is_empty() {
                output.push_str(&format!("        {} {}\n", col_type, col_name));
            } else {
                output.push_str(&format!(
                    "        {} {} {}\n",
                    col_type,
                    col_name,
                    keys.join(",")
                ));
            }
        }

        output.push_str("    }\n");
    }

    if !graph.edges.is_empty() {
        output.push('\n');
    }

    for edge in &graph.edges {
        output.push_str(&format!(
            "    {} {} {} : \"{}\"\n",
            escape_mermaid_id(&edge.source),
            edge.markers().as_mermaid(),
            escape_mermaid_id(&edge.target),
            escape_mermaid_label(&edge.from_column)
        ));
    }

    output
}

/// Mermaid identifiers must be alphanumeric with underscores
fn escape_mermaid_id(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Quoted relationship labels cannot contain a raw `"` or a line break
fn escape_mermaid_label(s: &str) -> String {
    s.replace('"', "#quot;").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::schema::{Column, DatabaseSchema, Relation, RelationType, Table};

    fn sample_graph() -> Graph {
        build_graph(&DatabaseSchema::new(
            vec![
                Table::new(
                    "users",
                    vec![
                        Column::new("id", "uuid").primary_key(),
                        Column::new("email", "varchar(255)").unique(),
                    ],
                ),
                Table::new(
                    "order-items",
                    vec![Column::new("user_id", "uuid").foreign_key()],
                ),
            ],
            vec![Relation::new(
                "order-items",
                "user_id",
                "users",
                "id",
                RelationType::ManyToOne,
            )],
        ))
    }

    #[test]
    fn test_mermaid_entities() {
        let output = to_mermaid(&sample_graph());
        assert!(output.starts_with("erDiagram\n"));
        assert!(output.contains("uuid id PK"));
        assert!(output.contains("varchar email UK"));
        assert!(output.contains("order_items {"));
    }

    #[test]
    fn test_mermaid_relationship() {
        let output = to_mermaid(&sample_graph());
        assert!(output.contains("order_items }o--|| users : \"user_id\""));
    }

    #[test]
    fn test_mermaid_label_escaping() {
        let graph = build_graph(&DatabaseSchema::new(
            vec![Table::new("a", vec![]), Table::new("b", vec![])],
            vec![Relation::new("b", "say \"hi\"", "a", "id", RelationType::ManyToOne)],
        ));
        let output = to_mermaid(&graph);
        assert!(output.contains("b }o--|| a : \"say #quot;hi#quot;\""));
        let line = output.lines().last().unwrap();
        assert_eq!(line.matches('"').count(), 2);
    }
}
