//! Server configuration types and defaults.
//!
//! This module contains the server configuration structure and default values
//! used to initialize the relay server.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Address the relay listens on when nothing else is configured.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:7778";

/// Default capacity of each session's outbound frame queue.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Configuration structure for the relay server.
///
/// Contains the network settings the listener and every session need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The socket address to bind the server to
    pub bind_address: SocketAddr,

    /// Number of frames a session may queue for its writer before
    /// `send` suspends
    pub outbound_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 7778)),
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_published_address() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS.parse::<SocketAddr>().unwrap());
        assert_eq!(config.outbound_buffer, DEFAULT_OUTBOUND_BUFFER);
    }
}
