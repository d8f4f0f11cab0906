//! Glob-based table selection for CLI commands.
//!
//! `--tables 'user*,orders'` keeps matching tables, `--exclude 'audit_*'`
//! drops them. Relations survive only when both endpoints survive.

use crate::schema::DatabaseSchema;
use ahash::AHashSet;
use anyhow::Context;
use glob::Pattern;

/// Parse a comma-separated list of glob patterns
pub fn parse_patterns(list: &str) -> anyhow::Result<Vec<Pattern>> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| Pattern::new(p).with_context(|| format!("invalid table pattern '{}'", p)))
        .collect()
}

fn matches_any(patterns: &[Pattern], name: &str) -> bool {
    patterns.iter().any(|p| p.matches(name))
}

/// Apply include/exclude patterns; `None` means no restriction
pub fn filter_schema(
    mut schema: DatabaseSchema,
    include: Option<&[Pattern]>,
    exclude: Option<&[Pattern]>,
) -> DatabaseSchema {
    if include.is_none() && exclude.is_none() {
        return schema;
    }

    schema.tables.retain(|t| {
        include.map_or(true, |p| matches_any(p, &t.name))
            && !exclude.map_or(false, |p| matches_any(p, &t.name))
    });

    let kept: AHashSet<String> = schema.tables.iter().map(|t| t.name.clone()).collect();
    schema
        .relations
        .retain(|r| kept.contains(&r.from_table) && kept.contains(&r.to_table));

    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Relation, RelationType, Table};

    fn schema() -> DatabaseSchema {
        DatabaseSchema::new(
            vec![
                Table::new("users", vec![]),
                Table::new("user_roles", vec![]),
                Table::new("orders", vec![]),
                Table::new("audit_log", vec![]),
            ],
            vec![
                Relation::new("orders", "user_id", "users", "id", RelationType::ManyToOne),
                Relation::new("user_roles", "user_id", "users", "id", RelationType::ManyToOne),
            ],
        )
    }

    #[test]
    fn test_include_patterns() {
        let include = parse_patterns("user*").unwrap();
        let filtered = filter_schema(schema(), Some(&include), None);
        let names: Vec<_> = filtered.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["users", "user_roles"]);
        assert_eq!(filtered.relations.len(), 1);
        assert_eq!(filtered.relations[0].from_table, "user_roles");
    }

    #[test]
    fn test_exclude_patterns() {
        let exclude = parse_patterns("audit_*, users").unwrap();
        let filtered = filter_schema(schema(), None, Some(&exclude));
        let names: Vec<_> = filtered.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["user_roles", "orders"]);
        assert!(filtered.relations.is_empty());
    }

    #[test]
    fn test_relations_need_both_endpoints_on_wide_schema() {
        let tables = (0..500).map(|i| Table::new(format!("t{}", i), vec![])).collect();
        let relations = (1..500)
            .map(|i| {
                Relation::new(
                    format!("t{}", i),
                    "parent_id",
                    format!("t{}", i - 1),
                    "id",
                    RelationType::ManyToOne,
                )
            })
            .collect();
        let exclude = parse_patterns("t1?").unwrap();
        let filtered = filter_schema(DatabaseSchema::new(tables, relations), None, Some(&exclude));

        // t10..t19 are gone, taking 11 relations with them
        assert_eq!(filtered.tables.len(), 490);
        assert_eq!(filtered.relations.len(), 499 - 11);
        assert!(filtered
            .relations
            .iter()
            .all(|r| !exclude[0].matches(&r.from_table) && !exclude[0].matches(&r.to_table)));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(parse_patterns("[").is_err());
    }
}
