//! JSON Schema generation for CLI input and output types.
//!
//! Schemas are generated using the schemars crate and can be exported via the
//! `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns all JSON schemas, keyed by command name.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // schema documents accepted by render/search/explore
    schemas.insert("input", schema_for!(crate::schema::DatabaseSchema));

    schemas.insert(
        "parse-url",
        schema_for!(crate::connection::ConnectionSummary),
    );

    // render --format json
    schemas.insert("render", schema_for!(crate::graph::format::DiagramJson));

    schemas.insert("search", schema_for!(crate::graph::SearchResult));

    schemas.insert(
        "test-connection",
        schema_for!(crate::connection::ConnectionStatus),
    );

    schemas
}

/// Generate a single schema by command name.
pub fn get_schema(command: &str) -> Option<Schema> {
    all_schemas().remove(command)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}
