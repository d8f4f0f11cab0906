//! Connection descriptor commands: parse-url and test-connection.

use crate::config::ViewerConfig;
use crate::connection::{probe_tcp, ConnectionDescriptor, ConnectionSummary};
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

pub fn parse_url(url: String, json: bool) -> Result<()> {
    let descriptor = ConnectionDescriptor::parse(&url)?;
    let summary = ConnectionSummary::from(&descriptor);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Dialect:  {}", descriptor.dialect.label());
    println!("Host:     {}", summary.host);
    println!("Port:     {}", summary.port);
    println!("User:     {}", summary.username);
    println!(
        "Password: {}",
        if summary.has_password { "****" } else { "(none)" }
    );
    println!("Database: {}", summary.database);
    println!("SSL:      {}", if summary.ssl { "yes" } else { "no" });

    if let Err(e) = descriptor.validate() {
        eprintln!("\nWarning: {}", e);
    }

    Ok(())
}

pub fn test_connection(
    url: String,
    timeout_ms: Option<u64>,
    config: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = match &config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    let timeout = timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.probe_timeout());

    let descriptor = ConnectionDescriptor::parse(&url)?;
    if !json {
        eprintln!("Testing connection to {} ...", descriptor);
    }

    let status = probe_tcp(&descriptor, timeout);

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else if status.success {
        println!("{}", status.message);
    }

    if !status.success {
        bail!("{}", status.message);
    }
    Ok(())
}
