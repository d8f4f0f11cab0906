//! Schema model for ERD generation.
//!
//! This module provides:
//! - Data definitions for tables, columns and foreign-key relations
//! - Table-name deduplication applied when a schema is ingested
//! - DDL parsing for building a schema from SQL snapshots (see [`ddl`])
//!
//! The JSON shape matches the browser-side schema description (`fromTable`,
//! `pk`, `type`, ...) so snapshots can be exchanged with the viewer as-is.

pub mod ddl;

pub use ddl::SchemaBuilder;

use ahash::AHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Database product a schema was introspected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgresql,
    Mysql,
}

impl Dialect {
    /// Port used when a connection descriptor omits one
    pub fn default_port(self) -> u16 {
        match self {
            Dialect::Postgresql => 5432,
            Dialect::Mysql => 3306,
        }
    }

    /// URL scheme / wire name of the dialect
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Postgresql => "postgresql",
            Dialect::Mysql => "mysql",
        }
    }

    /// Human-readable product name
    pub fn label(self) -> &'static str {
        match self {
            Dialect::Postgresql => "PostgreSQL",
            Dialect::Mysql => "MySQL",
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(Dialect::Postgresql),
            "mysql" => Ok(Dialect::Mysql),
            _ => Err(format!(
                "Unknown dialect: {}. Valid options: postgresql, mysql",
                s
            )),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column definition within a table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    /// Column name, unique within its table
    pub name: String,
    /// Raw database type string, e.g. `varchar(255)`
    #[serde(rename = "type")]
    pub col_type: String,
    /// Part of the primary key
    #[serde(default, skip_serializing_if = "is_false")]
    pub pk: bool,
    /// Participates in a foreign key
    #[serde(default, skip_serializing_if = "is_false")]
    pub fk: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    /// Default expression as reported by the database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, col_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            col_type: col_type.into(),
            ..Self::default()
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.pk = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.fk = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Type without its length suffix, for compact display
    pub fn display_type(&self) -> &str {
        strip_length_suffix(&self.col_type)
    }
}

/// Table definition with its ordered columns
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Get a column by exact name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Relationship cardinality between two tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    OneToOne,
    OneToMany,
    /// Most common: child holds the FK to its parent
    #[default]
    ManyToOne,
    ManyToMany,
}

impl RelationType {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationType::OneToOne => "one-to-one",
            RelationType::OneToMany => "one-to-many",
            RelationType::ManyToOne => "many-to-one",
            RelationType::ManyToMany => "many-to-many",
        }
    }
}

impl FromStr for RelationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one-to-one" | "1:1" => Ok(RelationType::OneToOne),
            "one-to-many" | "1:n" => Ok(RelationType::OneToMany),
            "many-to-one" | "n:1" => Ok(RelationType::ManyToOne),
            "many-to-many" | "m:n" => Ok(RelationType::ManyToMany),
            _ => Err(format!(
                "Unknown relation type: {}. Valid options: one-to-one, one-to-many, many-to-one, many-to-many",
                s
            )),
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed foreign-key edge: `from_table.from_column` references `to_table.to_column`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    #[serde(rename = "type", default)]
    pub relation_type: RelationType,
}

impl Relation {
    pub fn new(
        from_table: impl Into<String>,
        from_column: impl Into<String>,
        to_table: impl Into<String>,
        to_column: impl Into<String>,
        relation_type: RelationType,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_column: from_column.into(),
            to_table: to_table.into(),
            to_column: to_column.into(),
            relation_type,
        }
    }

    /// Self-referencing relations are kept in the schema but never rendered
    pub fn is_self_referencing(&self) -> bool {
        self.from_table == self.to_table
    }
}

/// Complete schema description handed over by a schema source
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct DatabaseSchema {
    /// Database name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl DatabaseSchema {
    pub fn new(tables: Vec<Table>, relations: Vec<Relation>) -> Self {
        Self {
            name: None,
            dialect: None,
            tables,
            relations,
        }
    }

    /// Get a table by exact name (first occurrence)
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Keep only the first table of each name, preserving order.
    ///
    /// Node identities are derived from table names, so this runs before any
    /// layout or graph derivation.
    pub fn dedup_tables(mut self) -> Self {
        let mut seen: AHashSet<String> = AHashSet::with_capacity(self.tables.len());
        self.tables.retain(|t| seen.insert(t.name.clone()));
        self
    }

    /// Relations with an endpoint table or column that is not in the schema
    pub fn dangling_relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(|r| {
            !self.has_column(&r.from_table, &r.from_column)
                || !self.has_column(&r.to_table, &r.to_column)
        })
    }

    fn has_column(&self, table: &str, column: &str) -> bool {
        self.table(table)
            .is_some_and(|t| t.column(column).is_some())
    }
}

/// Strip a trailing `(...)` length/precision suffix from a type string.
///
/// `varchar(255)` becomes `varchar`, `numeric(10,2) unsigned` is left alone
/// because the suffix is not trailing.
pub fn strip_length_suffix(col_type: &str) -> &str {
    let trimmed = col_type.trim_end();
    if !trimmed.ends_with(')') {
        return trimmed;
    }
    match trimmed.rfind('(') {
        Some(open) if open > 0 => trimmed[..open].trim_end(),
        _ => trimmed,
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}
