//! Utility functions and helper methods for the relay server.
//!
//! This module provides convenient factory functions for creating server
//! instances with the built-in handlers.

use crate::{config::ServerConfig, messaging::HandlerRegistry, server::RelayServer};
use std::sync::Arc;

/// Creates a new relay server with default configuration and the built-in
/// handlers.
///
/// # Example
///
/// ```rust
/// use relay_server::create_server;
///
/// let server = create_server();
/// assert_eq!(server.bind_address().port(), 7778);
/// ```
pub fn create_server() -> RelayServer {
    create_server_with_config(ServerConfig::default())
}

/// Creates a new relay server with custom configuration and the built-in
/// handlers.
///
/// # Example
///
/// ```rust
/// use relay_server::{create_server_with_config, ServerConfig};
///
/// let config = ServerConfig {
///     bind_address: "0.0.0.0:9000".parse().unwrap(),
///     ..Default::default()
/// };
///
/// let server = create_server_with_config(config);
/// assert_eq!(server.bind_address().port(), 9000);
/// ```
pub fn create_server_with_config(config: ServerConfig) -> RelayServer {
    RelayServer::new(config, Arc::new(HandlerRegistry::with_default_handlers()))
}
