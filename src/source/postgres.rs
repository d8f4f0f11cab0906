//! PostgreSQL information_schema adapter.
//!
//! Rows use the snake_case aliases produced by [`COLUMNS_QUERY`] and
//! [`RELATIONS_QUERY`]; key flags arrive as booleans.

use super::{length_qualified_type, non_empty, RowAdapter};
use crate::schema::{Column, DatabaseSchema, Dialect, Relation, RelationType, Table};
use serde::Deserialize;

pub const TABLES_QUERY: &str = "\
SELECT table_name
FROM information_schema.tables
WHERE table_schema = 'public'
  AND table_type = 'BASE TABLE'
ORDER BY table_name";

/// Bound with the table name as `$1`
pub const COLUMNS_QUERY: &str = "\
SELECT
  c.column_name,
  c.data_type,
  c.character_maximum_length,
  c.is_nullable,
  c.column_default,
  CASE WHEN pk.column_name IS NOT NULL THEN true ELSE false END AS is_primary_key,
  CASE WHEN fk.column_name IS NOT NULL THEN true ELSE false END AS is_foreign_key,
  CASE WHEN uq.column_name IS NOT NULL THEN true ELSE false END AS is_unique
FROM information_schema.columns c
LEFT JOIN (
  SELECT kcu.column_name
  FROM information_schema.table_constraints tc
  JOIN information_schema.key_column_usage kcu
    ON tc.constraint_name = kcu.constraint_name
  WHERE tc.table_name = $1 AND tc.constraint_type = 'PRIMARY KEY'
) pk ON c.column_name = pk.column_name
LEFT JOIN (
  SELECT kcu.column_name
  FROM information_schema.table_constraints tc
  JOIN information_schema.key_column_usage kcu
    ON tc.constraint_name = kcu.constraint_name
  WHERE tc.table_name = $1 AND tc.constraint_type = 'FOREIGN KEY'
) fk ON c.column_name = fk.column_name
LEFT JOIN (
  SELECT kcu.column_name
  FROM information_schema.table_constraints tc
  JOIN information_schema.key_column_usage kcu
    ON tc.constraint_name = kcu.constraint_name
  WHERE tc.table_name = $1 AND tc.constraint_type = 'UNIQUE'
) uq ON c.column_name = uq.column_name
WHERE c.table_name = $1 AND c.table_schema = 'public'
ORDER BY c.ordinal_position";

pub const RELATIONS_QUERY: &str = "\
SELECT
  tc.table_name AS from_table,
  kcu.column_name AS from_column,
  ccu.table_name AS to_table,
  ccu.column_name AS to_column
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON tc.constraint_name = kcu.constraint_name
JOIN information_schema.constraint_column_usage ccu
  ON tc.constraint_name = ccu.constraint_name
WHERE tc.constraint_type = 'FOREIGN KEY'
  AND tc.table_schema = 'public'";

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresColumnRow {
    pub column_name: String,
    pub data_type: String,
    #[serde(default)]
    pub character_maximum_length: Option<u64>,
    pub is_nullable: String,
    #[serde(default)]
    pub column_default: Option<String>,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default)]
    pub is_unique: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresTableRows {
    pub table_name: String,
    #[serde(default)]
    pub columns: Vec<PostgresColumnRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresRelationRow {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

/// Result rows of the three PostgreSQL introspection queries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostgresSnapshot {
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub tables: Vec<PostgresTableRows>,
    #[serde(default)]
    pub relations: Vec<PostgresRelationRow>,
}

impl From<PostgresColumnRow> for Column {
    fn from(row: PostgresColumnRow) -> Self {
        Column {
            name: row.column_name,
            col_type: length_qualified_type(row.data_type, row.character_maximum_length),
            pk: row.is_primary_key,
            fk: row.is_foreign_key,
            unique: row.is_unique,
            nullable: row.is_nullable == "YES",
            default: non_empty(row.column_default),
        }
    }
}

impl RowAdapter for PostgresSnapshot {
    fn dialect(&self) -> Dialect {
        Dialect::Postgresql
    }

    fn into_schema(self) -> DatabaseSchema {
        let tables = self
            .tables
            .into_iter()
            .map(|t| Table::new(t.table_name, t.columns.into_iter().map(Column::from).collect()))
            .collect();

        let relations = self
            .relations
            .into_iter()
            .map(|r| {
                Relation::new(
                    r.from_table,
                    r.from_column,
                    r.to_table,
                    r.to_column,
                    RelationType::ManyToOne,
                )
            })
            .collect();

        DatabaseSchema {
            name: self.database,
            dialect: Some(Dialect::Postgresql),
            tables,
            relations,
        }
    }
}
