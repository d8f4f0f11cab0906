//! Table/column search for the navigator.

use crate::schema::{DatabaseSchema, Table};
use schemars::JsonSchema;
use serde::Serialize;

/// One table matched by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub table: String,
    pub matched_name: bool,
    pub matching_columns: Vec<String>,
}

/// Search result in schema order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub query: String,
    pub total_tables: usize,
    pub hits: Vec<SearchHit>,
}

/// Run [`filter_tables`] and explain each hit
pub fn search(schema: &DatabaseSchema, query: &str) -> SearchResult {
    let lowered = query.to_lowercase();
    let hits = filter_tables(schema, query)
        .into_iter()
        .map(|table| SearchHit {
            table: table.name.clone(),
            matched_name: !lowered.is_empty() && table.name.to_lowercase().contains(&lowered),
            matching_columns: matching_columns(table, query)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    SearchResult {
        query: query.to_string(),
        total_tables: schema.tables.len(),
        hits,
    }
}

/// Tables whose name or any column name contains `query`, case-insensitively.
///
/// Original table order is preserved; an empty query returns every table.
pub fn filter_tables<'a>(schema: &'a DatabaseSchema, query: &str) -> Vec<&'a Table> {
    let query = query.to_lowercase();
    if query.is_empty() {
        return schema.tables.iter().collect();
    }

    schema
        .tables
        .iter()
        .filter(|table| table_matches(table, &query))
        .collect()
}

/// `query` must already be lowercase
fn table_matches(table: &Table, query: &str) -> bool {
    table.name.to_lowercase().contains(query)
        || table
            .columns
            .iter()
            .any(|c| c.name.to_lowercase().contains(query))
}

/// Column names of `table` that match `query`, for expanding search hits
pub fn matching_columns<'a>(table: &'a Table, query: &str) -> Vec<&'a str> {
    let query = query.to_lowercase();
    table
        .columns
        .iter()
        .filter(|c| !query.is_empty() && c.name.to_lowercase().contains(&query))
        .map(|c| c.name.as_str())
        .collect()
}
