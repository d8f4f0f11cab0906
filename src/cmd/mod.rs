mod connect;
mod explore;
mod input;
mod render;
mod schema;
mod search;
mod table_filter;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use explore::ExploreArgs;
pub use render::RenderArgs;

#[derive(Parser)]
#[command(name = "schema-canvas")]
#[command(version)]
#[command(about = "Turn relational database schemas into entity-relationship diagrams", long_about = None)]
pub struct Cli {
    /// Log level filter, e.g. debug or schema_canvas=trace (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the diagram for a schema and write it as JSON, Mermaid or DOT
    Render(RenderArgs),

    /// List tables whose name or columns match a query
    Search {
        /// Schema file (JSON, SQL DDL or snapshot)
        file: PathBuf,

        /// Case-insensitive substring to look for
        query: String,

        /// Input kind: auto, json, sql, snapshot
        #[arg(long, default_value = "auto")]
        source: String,

        /// Dialect to tag the schema with: postgresql or mysql
        #[arg(short, long)]
        dialect: Option<String>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactively select, search and move tables
    Explore(ExploreArgs),

    /// Parse a connection URL and show its parts (password masked)
    ParseUrl {
        /// <dialect>://<user>:<password>@<host>:<port>/<database>[?ssl=true]
        url: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the database in a connection URL is reachable
    TestConnection {
        /// <dialect>://<user>:<password>@<host>:<port>/<database>[?ssl=true]
        url: String,

        /// Probe timeout in milliseconds (default from config, else 5000)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// YAML viewer configuration
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print JSON Schemas for schema input and --json outputs
    Schema {
        /// Only print the schema for this command
        #[arg(long)]
        command: Option<String>,

        /// List available schema names
        #[arg(long)]
        list: bool,

        /// Write every schema to <DIR>/<name>.schema.json
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Install the stderr log subscriber; `--log-level` wins over `RUST_LOG`
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Commands::Render(args) => render::run(args),
        Commands::Search {
            file,
            query,
            source,
            dialect,
            json,
        } => search::run(file, query, source, dialect, json),
        Commands::Explore(args) => explore::run(args),
        Commands::ParseUrl { url, json } => connect::parse_url(url, json),
        Commands::TestConnection {
            url,
            timeout_ms,
            config,
            json,
        } => connect::test_connection(url, timeout_ms, config, json),
        Commands::Schema {
            command,
            list,
            output_dir,
        } => schema::run(command, list, output_dir),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "schema-canvas",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
