//! Output formats handed to rendering collaborators.

mod dot;
pub(crate) mod json;
mod mermaid;

pub use dot::to_dot;
pub use json::to_json;
pub use mermaid::to_mermaid;
pub use json::{DiagramJson, DiagramStats, EdgeJson};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for the render command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Nodes and edges as JSON, for programmatic renderers
    #[default]
    Json,
    /// Mermaid erDiagram format
    Mermaid,
    /// Graphviz DOT with nodes pinned to their layout positions
    Dot,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Mermaid => "mermaid",
            OutputFormat::Dot => "dot",
        }
    }

    /// Format implied by an output file extension (`erd.mmd`, `erd.gv`, ...)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "gv" => Some(OutputFormat::Dot),
            "graphviz" => None,
            other => other.parse().ok(),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "mermaid" | "mmd" => Ok(OutputFormat::Mermaid),
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            _ => Err(format!(
                "Unknown format: {}. Valid options: json, mermaid, dot",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
