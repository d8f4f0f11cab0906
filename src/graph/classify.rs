//! Relation classification: which columns get connector handles.
//!
//! A column is a *source* when it holds a foreign key pointing at another
//! table, and a *target* when another table references it. Renderers only
//! attach handles to columns that appear in one of these sets.

use crate::schema::Relation;
use ahash::AHashMap;
use std::collections::BTreeSet;

/// Per-table column sets derived from the relation list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationColumns {
    /// Table name -> columns with an outgoing relation
    pub source: AHashMap<String, BTreeSet<String>>,
    /// Table name -> columns referenced by other tables
    pub target: AHashMap<String, BTreeSet<String>>,
}

impl RelationColumns {
    /// Outgoing-handle columns of `table` (empty if none)
    pub fn source_columns(&self, table: &str) -> BTreeSet<String> {
        self.source.get(table).cloned().unwrap_or_default()
    }

    /// Incoming-handle columns of `table` (empty if none)
    pub fn target_columns(&self, table: &str) -> BTreeSet<String> {
        self.target.get(table).cloned().unwrap_or_default()
    }
}

/// Classify relation endpoints, skipping self-referencing relations.
///
/// A column may land in both maps.
pub fn classify(relations: &[Relation]) -> RelationColumns {
    let mut columns = RelationColumns::default();

    for relation in relations.iter().filter(|r| !r.is_self_referencing()) {
        columns
            .source
            .entry(relation.from_table.clone())
            .or_default()
            .insert(relation.from_column.clone());
        columns
            .target
            .entry(relation.to_table.clone())
            .or_default()
            .insert(relation.to_column.clone());
    }

    columns
}
