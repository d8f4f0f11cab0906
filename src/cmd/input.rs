//! Shared input handling: pick a schema source and load it into a state.

use crate::schema::{DatabaseSchema, Dialect};
use crate::source::{open_source, DemoSource, SchemaSource, SourceKind};
use crate::state::DiagramState;
use anyhow::{bail, Context};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Schema file: JSON document, SQL DDL or introspection snapshot.
    /// Supports .gz, .bz2, .xz, .zst compression
    #[arg(value_name = "INPUT", required_unless_present = "demo")]
    pub input: Option<PathBuf>,

    /// Input kind: auto, json, sql, snapshot
    #[arg(long, default_value = "auto")]
    pub source: String,

    /// Use the built-in demo schema instead of a file
    #[arg(long, conflicts_with = "input")]
    pub demo: bool,

    /// Dialect to tag the schema with: postgresql or mysql
    #[arg(short, long)]
    pub dialect: Option<String>,

    /// Schema name (defaults to the file name for SQL input)
    #[arg(long)]
    pub name: Option<String>,
}

impl InputArgs {
    pub fn open(&self) -> anyhow::Result<Box<dyn SchemaSource>> {
        let dialect = parse_dialect(self.dialect.as_deref())?;

        if self.demo {
            return Ok(Box::new(DemoSource::new(self.name.clone(), dialect)));
        }

        match &self.input {
            Some(path) => file_source(path, &self.source, dialect, self.name.clone()),
            None => bail!("an input file or --demo is required"),
        }
    }

    /// Run one acquisition through the state's loading boundary
    pub fn load_into(&self, state: &mut DiagramState) -> anyhow::Result<()> {
        self.load_filtered(state, |schema| schema)
    }

    /// Like [`InputArgs::load_into`], rewriting the schema before it is loaded
    pub fn load_filtered<F>(&self, state: &mut DiagramState, filter: F) -> anyhow::Result<()>
    where
        F: FnOnce(DatabaseSchema) -> DatabaseSchema,
    {
        let source = self.open()?;
        let dialect = parse_dialect(self.dialect.as_deref())?;
        state.begin_load();
        let result = source.fetch_schema().map(|mut schema| {
            if let Some(name) = &self.name {
                schema.name = Some(name.clone());
            }
            if dialect.is_some() {
                schema.dialect = dialect;
            }
            filter(schema)
        });
        state
            .finish_load(result)
            .with_context(|| format!("failed to load schema from {}", source.describe()))
    }
}

pub fn parse_dialect(dialect: Option<&str>) -> anyhow::Result<Option<Dialect>> {
    dialect
        .map(|d| d.parse::<Dialect>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("{}", e))
}

pub fn file_source(
    path: &Path,
    kind: &str,
    dialect: Option<Dialect>,
    name: Option<String>,
) -> anyhow::Result<Box<dyn SchemaSource>> {
    if !path.exists() {
        bail!("input file does not exist: {}", path.display());
    }
    let kind: SourceKind = kind.parse().map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(open_source(path, kind, dialect, name))
}
