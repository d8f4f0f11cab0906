//! Search command: which tables match a navigator query.

use super::input::{file_source, parse_dialect};
use crate::graph::search;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn run(
    input: PathBuf,
    query: String,
    source: String,
    dialect: Option<String>,
    json: bool,
) -> Result<()> {
    let dialect = parse_dialect(dialect.as_deref())?;
    let source = file_source(&input, &source, dialect, None)?;
    let schema = source
        .fetch_schema()
        .with_context(|| format!("failed to load schema from {}", source.describe()))?
        .dedup_tables();

    let result = search(&schema, &query);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.hits.is_empty() {
        println!("No tables match '{}'", query);
        return Ok(());
    }

    for hit in &result.hits {
        if hit.matching_columns.is_empty() {
            println!("{}", hit.table);
        } else {
            println!("{} ({})", hit.table, hit.matching_columns.join(", "));
        }
    }
    eprintln!(
        "\n{} of {} tables match '{}'",
        result.hits.len(),
        result.total_tables,
        query
    );

    Ok(())
}
