//! Render command: schema in, diagram out.

use super::input::InputArgs;
use super::table_filter::{filter_schema, parse_patterns};
use crate::config::ViewerConfig;
use crate::graph::{to_dot, to_json, to_mermaid, OutputFormat};
use crate::state::DiagramState;
use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
#[command(after_help = "Examples:
  schema-canvas render schema.json
  schema-canvas render dump.sql.gz -f mermaid -o erd.mmd
  schema-canvas render --demo -f dot | neato -n -Tsvg > erd.svg
  schema-canvas render snapshot.json --source snapshot --tables 'user*,orders'")]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format: json, mermaid, dot (inferred from --output when omitted)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only include tables matching these glob patterns (comma-separated)
    #[arg(long)]
    pub tables: Option<String>,

    /// Exclude tables matching these glob patterns (comma-separated)
    #[arg(long)]
    pub exclude: Option<String>,

    /// Highlight a table or a column (TABLE or TABLE.COLUMN)
    #[arg(long, value_name = "TARGET")]
    pub select: Option<String>,

    /// YAML viewer configuration
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let format = if let Some(ref f) = args.format {
        f.parse().map_err(|e| anyhow::anyhow!("{}", e))?
    } else if let Some(ref out) = args.output {
        out.extension()
            .and_then(|e| e.to_str())
            .and_then(OutputFormat::from_extension)
            .unwrap_or(config.format)
    } else {
        config.format
    };

    let include = args.tables.as_deref().map(parse_patterns).transpose()?;
    let exclude = args.exclude.as_deref().map(parse_patterns).transpose()?;

    let mut state = DiagramState::with_layout(config.layout);
    args.input.load_filtered(&mut state, |schema| {
        filter_schema(schema, include.as_deref(), exclude.as_deref())
    })?;

    if let Some(ref target) = args.select {
        apply_selection(&mut state, target);
    }

    let graph = state.graph();
    let (name, dialect) = match state.schema() {
        Some(schema) => (schema.name.clone(), schema.dialect),
        None => (None, None),
    };

    let content = match format {
        OutputFormat::Json => to_json(&graph, name.as_deref(), dialect),
        OutputFormat::Mermaid => to_mermaid(&graph),
        OutputFormat::Dot => to_dot(&graph),
    };

    if let Some(ref out_path) = args.output {
        fs::write(out_path, content.as_bytes())
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        eprintln!("ERD written to: {}", out_path.display());
    } else {
        println!("{}", content);
    }

    if format != OutputFormat::Json {
        let columns: usize = graph.nodes.iter().map(|n| n.data.table.columns.len()).sum();
        eprintln!(
            "\nERD: {} tables, {} columns, {} relationships",
            graph.node_count(),
            columns,
            graph.edge_count()
        );
    }

    Ok(())
}

fn apply_selection(state: &mut DiagramState, target: &str) {
    match target.split_once('.') {
        Some((table, column)) => {
            state.select_column(table, column);
        }
        None => {
            state.select_table(target);
        }
    }

    let table = state.selected_table().unwrap_or_default();
    if state.node(table).is_none() {
        eprintln!("Warning: no table named '{}' in the diagram", table);
    }
}
