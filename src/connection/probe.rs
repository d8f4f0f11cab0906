//! TCP reachability probe used by the connection test.
//!
//! The probe only checks that the database port accepts connections; it does
//! not authenticate. Authentication and query errors surface later, when the
//! schema itself is fetched.

use super::ConnectionDescriptor;
use schemars::JsonSchema;
use serde::Serialize;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Pass/fail outcome with a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ConnectionStatus {
    pub success: bool,
    pub message: String,
}

impl ConnectionStatus {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: "Connection successful!".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Try each resolved address of the descriptor until one accepts a TCP connection
pub fn probe_tcp(descriptor: &ConnectionDescriptor, timeout: Duration) -> ConnectionStatus {
    if let Err(e) = descriptor.validate() {
        return ConnectionStatus::failed(e.to_string());
    }

    let address = descriptor.address();
    debug!(descriptor = %descriptor, timeout_ms = timeout.as_millis() as u64, "probing database port");

    let addrs = match address.to_socket_addrs() {
        Ok(addrs) => addrs.collect::<Vec<_>>(),
        Err(e) => return ConnectionStatus::failed(format!("Cannot resolve {}: {}", address, e)),
    };

    let mut last_error = None;
    for addr in &addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(_) => return ConnectionStatus::ok(),
            Err(e) => last_error = Some(e),
        }
    }

    match last_error {
        Some(e) => ConnectionStatus::failed(format!("Cannot connect to {}: {}", address, e)),
        None => ConnectionStatus::failed(format!("No addresses found for {}", address)),
    }
}
