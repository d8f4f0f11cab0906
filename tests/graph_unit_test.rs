//! Unit tests for relation classification, graph building and output formats.

use schema_canvas::graph::{
    build_graph, classify, filter_tables, matching_columns, search, to_dot, to_json, to_mermaid,
    CardinalityMarkers, Marker,
};
use schema_canvas::schema::{Column, DatabaseSchema, Relation, RelationType, Table};

fn rel(from: &str, from_col: &str, to: &str, to_col: &str) -> Relation {
    Relation::new(from, from_col, to, to_col, RelationType::ManyToOne)
}

fn shop_schema() -> DatabaseSchema {
    DatabaseSchema::new(
        vec![
            Table::new(
                "users",
                vec![
                    Column::new("id", "int").primary_key(),
                    Column::new("email", "varchar(255)").unique(),
                    Column::new("manager_id", "int").foreign_key().nullable(),
                ],
            ),
            Table::new(
                "orders",
                vec![
                    Column::new("id", "int").primary_key(),
                    Column::new("user_id", "int").foreign_key(),
                ],
            ),
            Table::new(
                "order_items",
                vec![
                    Column::new("id", "int").primary_key(),
                    Column::new("order_id", "int").foreign_key(),
                ],
            ),
        ],
        vec![
            rel("users", "manager_id", "users", "id"),
            rel("orders", "user_id", "users", "id"),
            rel("order_items", "order_id", "orders", "id"),
        ],
    )
}

mod classify_tests {
    use super::*;

    #[test]
    fn test_source_and_target_sets() {
        let columns = classify(&shop_schema().relations);

        assert!(columns.source_columns("users").is_empty());
        assert_eq!(
            columns.target_columns("users").into_iter().collect::<Vec<_>>(),
            vec!["id"]
        );
        // orders is both referenced and referencing
        assert!(columns.source_columns("orders").contains("user_id"));
        assert!(columns.target_columns("orders").contains("id"));
        assert!(columns.target_columns("order_items").is_empty());
    }

    #[test]
    fn test_self_reference_ignored() {
        let columns = classify(&[rel("categories", "parent_id", "categories", "id")]);
        assert!(columns.source.is_empty());
        assert!(columns.target.is_empty());
    }

    #[test]
    fn test_duplicate_relations_collapse_in_sets() {
        let columns = classify(&[
            rel("orders", "user_id", "users", "id"),
            rel("orders", "user_id", "users", "id"),
        ]);
        assert_eq!(columns.source_columns("orders").len(), 1);
    }
}

mod builder_tests {
    use super::*;

    #[test]
    fn test_end_to_end_two_tables() {
        let schema = DatabaseSchema::new(
            vec![
                Table::new("A", vec![Column::new("id", "int").primary_key()]),
                Table::new("B", vec![Column::new("a_id", "int").foreign_key()]),
            ],
            vec![rel("B", "a_id", "A", "id")],
        );
        let graph = build_graph(&schema);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        let edge = &graph.edges[0];
        assert_eq!(edge.relation_type, RelationType::ManyToOne);
        assert_eq!(edge.source, "B");
        assert_eq!(edge.target, "A");
        assert_eq!(edge.source_handle, "B-a_id");
        assert_eq!(edge.target_handle, "A-id");

        let a = graph.node("A").unwrap();
        assert_eq!(a.data.target_columns.iter().collect::<Vec<_>>(), vec!["id"]);
        assert!(a.data.source_columns.is_empty());
        let b = graph.node("B").unwrap();
        assert_eq!(b.data.source_columns.iter().collect::<Vec<_>>(), vec!["a_id"]);
    }

    #[test]
    fn test_no_self_loops() {
        let graph = build_graph(&shop_schema());
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.edges.iter().all(|e| e.source != e.target));
        assert!(!graph
            .node("users")
            .unwrap()
            .data
            .source_columns
            .contains("manager_id"));
    }

    #[test]
    fn test_edges_preserve_relation_order() {
        let graph = build_graph(&shop_schema());
        let ids: Vec<&str> = graph.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "edge-0-orders-user_id-users-id",
                "edge-1-order_items-order_id-orders-id"
            ]
        );
    }

    #[test]
    fn test_duplicate_relations_get_distinct_ids() {
        let schema = DatabaseSchema::new(
            vec![Table::new("users", vec![]), Table::new("orders", vec![])],
            vec![
                rel("orders", "user_id", "users", "id"),
                rel("orders", "user_id", "users", "id"),
            ],
        );
        let graph = build_graph(&schema);
        assert_eq!(graph.edge_count(), 2);
        assert_ne!(graph.edges[0].id, graph.edges[1].id);
    }

    #[test]
    fn test_orphan_edges_are_kept() {
        let schema = DatabaseSchema::new(
            vec![Table::new("orders", vec![Column::new("user_id", "int")])],
            vec![rel("orders", "user_id", "users", "id")],
        );
        let graph = build_graph(&schema);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges[0].target, "users");
        assert!(graph.node("users").is_none());
    }

    #[test]
    fn test_nodes_start_unhighlighted() {
        let graph = build_graph(&shop_schema());
        assert!(graph
            .nodes
            .iter()
            .all(|n| !n.is_highlighted() && n.highlighted_column().is_none()));
    }

    #[test]
    fn test_build_is_deterministic() {
        let schema = shop_schema();
        assert_eq!(build_graph(&schema), build_graph(&schema));
    }

    #[test]
    fn test_empty_schema() {
        let graph = build_graph(&DatabaseSchema::default());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}

mod cardinality_tests {
    use super::*;

    #[test]
    fn test_one_to_many_markers() {
        let markers = CardinalityMarkers::for_relation(RelationType::OneToMany);
        assert_eq!(markers.source, Marker::One);
        assert_eq!(markers.target, Marker::Many);
        assert_eq!(markers.label, "1:N");
        assert_eq!(markers.as_dot_arrows(), ("tee", "crow"));
    }

    #[test]
    fn test_many_to_many_markers() {
        let markers = CardinalityMarkers::for_relation(RelationType::ManyToMany);
        assert_eq!(markers.source, Marker::Many);
        assert_eq!(markers.target, Marker::Many);
        assert_eq!(markers.as_mermaid(), "}o--o{");
    }
}

mod search_tests {
    use super::*;

    fn two_tables() -> DatabaseSchema {
        DatabaseSchema::new(
            vec![
                Table::new(
                    "users",
                    vec![Column::new("id", "int"), Column::new("email", "text")],
                ),
                Table::new(
                    "orders",
                    vec![Column::new("id", "int"), Column::new("user_id", "int")],
                ),
            ],
            vec![],
        )
    }

    fn names(tables: Vec<&Table>) -> Vec<&str> {
        tables.into_iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_matches_name_or_column() {
        let schema = two_tables();
        assert_eq!(names(filter_tables(&schema, "user")), vec!["users", "orders"]);
        assert!(filter_tables(&schema, "zzz").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let schema = two_tables();
        assert_eq!(names(filter_tables(&schema, "EMAIL")), vec!["users"]);
    }

    #[test]
    fn test_empty_query_returns_all() {
        let schema = two_tables();
        assert_eq!(names(filter_tables(&schema, "")), vec!["users", "orders"]);
    }

    #[test]
    fn test_matching_columns() {
        let schema = two_tables();
        assert_eq!(matching_columns(&schema.tables[1], "ID"), vec!["id", "user_id"]);
        assert!(matching_columns(&schema.tables[1], "").is_empty());
    }

    #[test]
    fn test_search_result() {
        let result = search(&two_tables(), "order");
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.hits[0].table, "orders");
        assert!(result.hits[0].matched_name);
    }
}

mod format_tests {
    use super::*;

    #[test]
    fn test_json_contract() {
        let graph = build_graph(&shop_schema());
        let value: serde_json::Value =
            serde_json::from_str(&to_json(&graph, Some("shop"), None)).unwrap();

        assert_eq!(value["name"], "shop");
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(value["nodes"][1]["position"]["x"], 400.0);
        assert_eq!(value["nodes"][0]["data"]["targetColumns"][0], "id");
        assert_eq!(value["edges"][0]["targetHandle"], "users-id");
        assert_eq!(value["edges"][0]["sourceMarker"], "many");
        assert_eq!(value["edges"][0]["targetMarker"], "one");
        assert_eq!(value["stats"]["relationshipCount"], 2);
    }

    #[test]
    fn test_mermaid_output() {
        let output = to_mermaid(&build_graph(&shop_schema()));
        assert!(output.contains("users {"));
        assert!(output.contains("varchar email UK"));
        assert!(output.contains("orders }o--|| users : \"user_id\""));
        assert!(!output.contains("users }o--|| users"));
    }

    #[test]
    fn test_dot_output() {
        let output = to_dot(&build_graph(&shop_schema()));
        assert!(output.contains("order_items:order_id -> orders:id"));
        assert!(output.contains("arrowtail=crow, arrowhead=tee"));
        assert!(output.contains("(3 cols)"));
    }
}
