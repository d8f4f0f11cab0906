//! Connection descriptors for the database collaborator.
//!
//! A descriptor is parsed from a URL of the form
//! `<dialect>://<user>:<password>@<host>:<port>/<database>?ssl=true`, where
//! `<dialect>` is `postgresql` or `mysql`. Parsing either yields a complete
//! descriptor or an error, never a partial one.

mod probe;

pub use probe::{probe_tcp, ConnectionStatus, DEFAULT_PROBE_TIMEOUT};

use crate::schema::Dialect;
use percent_encoding::percent_decode_str;
use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Reasons a connection descriptor is rejected before any connection attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("Please enter a connection URL")]
    Empty,
    #[error("Invalid connection URL format: {0}")]
    InvalidUrl(String),
    #[error("Unsupported dialect: {0}. Valid options: postgresql, mysql")]
    UnsupportedDialect(String),
    #[error("Please fill in host and database name")]
    MissingHostOrDatabase,
}

/// Everything needed to reach one database
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub dialect: Dialect,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub ssl: bool,
}

impl ConnectionDescriptor {
    /// Parse a connection URL, filling in the dialect's default port
    pub fn parse(input: &str) -> Result<Self, ConnectionError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ConnectionError::Empty);
        }

        let url = Url::parse(input).map_err(|e| ConnectionError::InvalidUrl(e.to_string()))?;

        let dialect = match url.scheme() {
            "postgresql" => Dialect::Postgresql,
            "mysql" => Dialect::Mysql,
            other => return Err(ConnectionError::UnsupportedDialect(other.to_string())),
        };

        let host = url.host_str().unwrap_or_default().to_string();
        let port = url.port().unwrap_or_else(|| dialect.default_port());
        let username = decode(url.username())?;
        let password = decode(url.password().unwrap_or_default())?;
        let path = url.path();
        let database = decode(path.strip_prefix('/').unwrap_or(path))?;

        let ssl = url.query_pairs().any(|(key, value)| {
            (key == "ssl" && value == "true") || (key == "sslmode" && value == "require")
        });

        Ok(Self {
            dialect,
            host,
            port,
            username,
            password,
            database,
            ssl,
        })
    }

    /// Host and database are required before a connection can be attempted
    pub fn validate(&self) -> Result<(), ConnectionError> {
        if self.host.trim().is_empty() || self.database.trim().is_empty() {
            return Err(ConnectionError::MissingHostOrDatabase);
        }
        Ok(())
    }

    /// URL form with the password masked, safe for logs and terminal output
    pub fn redacted_url(&self) -> String {
        let credentials = match (self.username.is_empty(), self.password.is_empty()) {
            (true, _) => String::new(),
            (false, true) => format!("{}@", self.username),
            (false, false) => format!("{}:****@", self.username),
        };
        let query = if self.ssl { "?ssl=true" } else { "" };
        format!(
            "{}://{}{}:{}/{}{}",
            self.dialect, credentials, self.host, self.port, self.database, query
        )
    }

    /// `host:port`, as used for socket resolution
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Printable view of a descriptor; the password is reduced to a flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSummary {
    pub dialect: Dialect,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub has_password: bool,
    pub database: String,
    pub ssl: bool,
    pub url: String,
}

impl From<&ConnectionDescriptor> for ConnectionSummary {
    fn from(desc: &ConnectionDescriptor) -> Self {
        Self {
            dialect: desc.dialect,
            host: desc.host.clone(),
            port: desc.port,
            username: desc.username.clone(),
            has_password: !desc.password.is_empty(),
            database: desc.database.clone(),
            ssl: desc.ssl,
            url: desc.redacted_url(),
        }
    }
}

impl FromStr for ConnectionDescriptor {
    type Err = ConnectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("dialect", &self.dialect)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"****")
            .field("database", &self.database)
            .field("ssl", &self.ssl)
            .finish()
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted_url())
    }
}

fn decode(s: &str) -> Result<String, ConnectionError> {
    percent_decode_str(s)
        .decode_utf8()
        .map(|c| c.into_owned())
        .map_err(|e| ConnectionError::InvalidUrl(e.to_string()))
}
