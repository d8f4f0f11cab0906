//! YAML configuration for the viewer.
//!
//! ```yaml
//! layout:
//!   columns_per_row: 4
//!   gap_x: 360
//! format: mermaid
//! probe_timeout_ms: 2000
//! ```
//!
//! Every field is optional; an empty file yields the defaults.

use crate::graph::{LayoutConfig, OutputFormat};
use anyhow::Context;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub layout: LayoutConfig,
    /// Default output format for `render`
    #[serde(deserialize_with = "deserialize_format")]
    pub format: OutputFormat,
    pub probe_timeout_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            format: OutputFormat::default(),
            probe_timeout_ms: 5000,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ViewerConfig = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.layout.columns_per_row == 0 {
            anyhow::bail!("layout.columns_per_row must be at least 1");
        }
        let spacing = [
            ("gap_x", self.layout.gap_x),
            ("gap_y", self.layout.gap_y),
            ("header_height", self.layout.header_height),
            ("row_height", self.layout.row_height),
        ];
        for (name, value) in spacing {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("layout.{} must be a non-negative number, got {}", name, value);
            }
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// Accept the same spellings as `--format`
fn deserialize_format<'de, D>(deserializer: D) -> Result<OutputFormat, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = ViewerConfig::from_yaml("layout:\n  columns_per_row: 4\nformat: dot\n").unwrap();
        assert_eq!(config.layout.columns_per_row, 4);
        assert_eq!(config.layout.gap_x, 400.0);
        assert_eq!(config.layout.row_height, 28.0);
        assert_eq!(config.format, OutputFormat::Dot);
        assert_eq!(config.probe_timeout_ms, 5000);
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(ViewerConfig::from_yaml("").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_rejects_zero_columns() {
        let err = ViewerConfig::from_yaml("layout:\n  columns_per_row: 0\n").unwrap_err();
        assert!(err.to_string().contains("columns_per_row"));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(ViewerConfig::from_yaml("format: png\n").is_err());
    }
}
