//! Explore command: an interactive session over one diagram state.

use super::input::InputArgs;
use crate::config::ViewerConfig;
use crate::graph::Position;
use crate::state::DiagramState;
use anyhow::Result;
use clap::Args;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
#[command(after_help = "Examples:
  schema-canvas explore schema.json
  schema-canvas explore --demo")]
pub struct ExploreArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// YAML viewer configuration
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: ExploreArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let mut state = DiagramState::with_layout(config.layout);
    args.input.load_into(&mut state)?;

    run_repl(&mut state)
}

fn run_repl(state: &mut DiagramState) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let history_path = dirs::cache_dir()
        .map(|d| d.join("schema-canvas").join("explore_history"))
        .unwrap_or_else(|| PathBuf::from(".schema_canvas_history"));

    let _ = rl.load_history(&history_path);

    let name = state
        .schema()
        .and_then(|s| s.name.clone())
        .unwrap_or_else(|| "schema".to_string());
    println!(
        "schema-canvas explore: {} ({} tables, {} relationships)",
        name,
        state.nodes().len(),
        state.edges().len()
    );
    println!("Type .help for available commands, .exit to quit");
    println!();

    let stdout = io::stdout();
    loop {
        match rl.readline("erd> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let mut out = stdout.lock();
                match handle_command(state, trimmed, &mut out) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}

/// Execute one REPL line. Returns true if the session should end.
pub fn handle_command<W: Write>(state: &mut DiagramState, line: &str, out: &mut W) -> Result<bool> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let cmd = parts.first().copied().unwrap_or("");

    match cmd {
        ".exit" | ".quit" | ".q" => {
            writeln!(out, "Goodbye!")?;
            return Ok(true);
        }
        ".help" | ".h" | ".?" => print_help(out)?,
        "select" => match parts.get(1) {
            Some(table) => {
                state.select_table(table);
                print_selection(state, out)?;
            }
            None => writeln!(out, "Usage: select <table>")?,
        },
        "column" => match (parts.get(1), parts.get(2)) {
            (Some(table), Some(column)) => {
                state.select_column(table, column);
                print_selection(state, out)?;
            }
            _ => writeln!(out, "Usage: column <table> <column>")?,
        },
        "clear" => {
            state.clear_selection();
            writeln!(out, "Selection cleared")?;
        }
        "search" => {
            let query = line.trim_start()["search".len()..].trim();
            state.set_search_query(query);
            print_tables(state, out)?;
        }
        "move" => {
            let coords = (
                parts.get(2).and_then(|v| v.parse::<f64>().ok()),
                parts.get(3).and_then(|v| v.parse::<f64>().ok()),
            );
            match (parts.get(1), coords) {
                (Some(id), (Some(x), Some(y))) => {
                    if state.move_node(id, Position::new(x, y)) {
                        writeln!(out, "Moved {} to ({}, {})", id, x, y)?;
                    } else {
                        writeln!(out, "No node named '{}'", id)?;
                    }
                }
                _ => writeln!(out, "Usage: move <table> <x> <y>")?,
            }
        }
        "reset" => {
            state.reset_layout();
            writeln!(out, "Layout reset")?;
        }
        "nodes" => print_nodes(state, out)?,
        "edges" => print_edges(state, out)?,
        "tables" => print_tables(state, out)?,
        "columns" => {
            let shown = state.toggle_show_columns();
            writeln!(out, "Columns {}", if shown { "shown" } else { "hidden" })?;
        }
        _ => writeln!(out, "Unknown command: {}. Type .help for usage.", cmd)?,
    }

    Ok(false)
}

fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Available commands:")?;
    writeln!(out, "  select <table>           Select a table (again to deselect)")?;
    writeln!(out, "  column <table> <column>  Select a column (again to deselect)")?;
    writeln!(out, "  clear                    Clear the selection")?;
    writeln!(out, "  search [query]           Filter the table list")?;
    writeln!(out, "  move <table> <x> <y>     Move a node")?;
    writeln!(out, "  reset                    Restore the grid layout")?;
    writeln!(out, "  nodes                    List nodes with positions")?;
    writeln!(out, "  edges                    List edges")?;
    writeln!(out, "  tables                   List tables matching the search")?;
    writeln!(out, "  columns                  Toggle column display")?;
    writeln!(out, "  .exit, .quit, .q         Exit")?;
    writeln!(out)
}

fn print_selection<W: Write>(state: &DiagramState, out: &mut W) -> io::Result<()> {
    match (state.selected_table(), state.selected_column()) {
        (Some(table), Some(column)) => writeln!(out, "Selected {}.{}", table, column),
        (Some(table), None) => writeln!(out, "Selected {}", table),
        _ => writeln!(out, "Selection cleared"),
    }
}

fn print_nodes<W: Write>(state: &DiagramState, out: &mut W) -> io::Result<()> {
    for node in state.nodes() {
        let marker = if node.is_highlighted() { "*" } else { " " };
        write!(
            out,
            "{} {} ({}, {})",
            marker, node.id, node.position.x, node.position.y
        )?;
        if let Some(column) = node.highlighted_column() {
            write!(out, " -> {}", column)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn print_edges<W: Write>(state: &DiagramState, out: &mut W) -> io::Result<()> {
    for edge in state.edges() {
        writeln!(
            out,
            "  {}.{} -> {}.{} [{}]",
            edge.source,
            edge.from_column,
            edge.target,
            edge.to_column,
            edge.markers().label
        )?;
    }
    Ok(())
}

fn print_tables<W: Write>(state: &DiagramState, out: &mut W) -> io::Result<()> {
    let tables = state.filtered_tables();
    if tables.is_empty() {
        return writeln!(out, "No tables match '{}'", state.search_query());
    }

    for table in tables {
        writeln!(out, "{} ({} cols)", table.name, table.column_count())?;
        if state.show_columns() {
            for col in &table.columns {
                let key = if col.pk {
                    " PK"
                } else if col.fk {
                    " FK"
                } else {
                    ""
                };
                writeln!(out, "    {} {}{}", col.name, col.display_type(), key)?;
            }
        }
    }
    Ok(())
}
