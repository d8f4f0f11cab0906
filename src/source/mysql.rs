//! MySQL information_schema adapter.
//!
//! Depending on the server version, column aliases come back either as the
//! lowercase names chosen in the queries or as the uppercase information_schema
//! names, so every row field accepts both. Key flags are derived from
//! `COLUMN_KEY`.

use super::{length_qualified_type, non_empty, RowAdapter};
use crate::schema::{Column, DatabaseSchema, Dialect, Relation, RelationType, Table};
use serde::Deserialize;

/// Bound with the database name
pub const TABLES_QUERY: &str = "\
SELECT TABLE_NAME AS table_name
FROM information_schema.tables
WHERE table_schema = ?
  AND table_type = 'BASE TABLE'
ORDER BY table_name";

/// Bound with the table name, then the database name
pub const COLUMNS_QUERY: &str = "\
SELECT
  c.COLUMN_NAME AS column_name,
  c.DATA_TYPE AS data_type,
  c.CHARACTER_MAXIMUM_LENGTH AS char_max_length,
  c.IS_NULLABLE AS is_nullable,
  c.COLUMN_DEFAULT AS column_default,
  c.COLUMN_KEY AS column_key
FROM information_schema.columns c
WHERE c.TABLE_NAME = ? AND c.TABLE_SCHEMA = ?
ORDER BY c.ORDINAL_POSITION";

/// Bound with the database name
pub const RELATIONS_QUERY: &str = "\
SELECT
  TABLE_NAME AS from_table,
  COLUMN_NAME AS from_column,
  REFERENCED_TABLE_NAME AS to_table,
  REFERENCED_COLUMN_NAME AS to_column
FROM information_schema.KEY_COLUMN_USAGE
WHERE TABLE_SCHEMA = ?
  AND REFERENCED_TABLE_NAME IS NOT NULL";

#[derive(Debug, Clone, Deserialize)]
pub struct MysqlColumnRow {
    #[serde(alias = "COLUMN_NAME")]
    pub column_name: String,
    #[serde(alias = "DATA_TYPE")]
    pub data_type: String,
    #[serde(default, alias = "CHARACTER_MAXIMUM_LENGTH")]
    pub char_max_length: Option<u64>,
    #[serde(alias = "IS_NULLABLE")]
    pub is_nullable: String,
    #[serde(default, alias = "COLUMN_DEFAULT")]
    pub column_default: Option<String>,
    #[serde(default, alias = "COLUMN_KEY")]
    pub column_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MysqlTableRows {
    #[serde(alias = "TABLE_NAME")]
    pub table_name: String,
    #[serde(default)]
    pub columns: Vec<MysqlColumnRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MysqlRelationRow {
    #[serde(alias = "TABLE_NAME")]
    pub from_table: String,
    #[serde(alias = "COLUMN_NAME")]
    pub from_column: String,
    #[serde(alias = "REFERENCED_TABLE_NAME")]
    pub to_table: String,
    #[serde(alias = "REFERENCED_COLUMN_NAME")]
    pub to_column: String,
}

/// Result rows of the three MySQL introspection queries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MysqlSnapshot {
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub tables: Vec<MysqlTableRows>,
    #[serde(default)]
    pub relations: Vec<MysqlRelationRow>,
}

impl From<MysqlColumnRow> for Column {
    fn from(row: MysqlColumnRow) -> Self {
        let key = row.column_key.as_deref().unwrap_or_default();
        Column {
            name: row.column_name,
            col_type: length_qualified_type(row.data_type, row.char_max_length),
            pk: key == "PRI",
            fk: key == "MUL",
            unique: key == "UNI",
            nullable: row.is_nullable == "YES",
            default: non_empty(row.column_default),
        }
    }
}

impl RowAdapter for MysqlSnapshot {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn into_schema(self) -> DatabaseSchema {
        let tables = self
            .tables
            .into_iter()
            .filter(|t| !t.table_name.is_empty())
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
            dialect: Some(Dialect::Mysql),
            tables,
            relations,
        }
    }
}
