//! Core relay server implementation.
//!
//! This module contains the main `RelayServer` struct: it binds the
//! listener and runs the accept loop, spawning one session task per
//! accepted connection.

use crate::{
    config::ServerConfig,
    connection::ConnectionRegistry,
    error::ServerError,
    messaging::HandlerRegistry,
    server::handlers::handle_connection,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Duration;
use tracing::{error, info, trace};

/// Pause after a failed accept before trying again.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// The core relay server structure.
///
/// `RelayServer` owns the two pieces of state every session needs: the
/// shared [`ConnectionRegistry`] and the read-only [`HandlerRegistry`].
/// Both are handed to each session task by `Arc`, never through globals.
///
/// # Lifecycle
///
/// There is no shutdown handshake: the accept loop runs until the process
/// exits.
#[derive(Debug)]
pub struct RelayServer {
    /// Server configuration settings
    config: ServerConfig,

    /// Sessions that are currently open
    registry: Arc<ConnectionRegistry>,

    /// Discriminator -> handler routing table
    handlers: Arc<HandlerRegistry>,
}

impl RelayServer {
    /// Creates a new relay server.
    ///
    /// # Arguments
    ///
    /// * `config` - Network settings for the listener and sessions
    /// * `handlers` - The routing table, already fully populated
    pub fn new(config: ServerConfig, handlers: Arc<HandlerRegistry>) -> Self {
        Self {
            config,
            registry: Arc::new(ConnectionRegistry::new()),
            handlers,
        }
    }

    /// Binds the configured address.
    ///
    /// A bind failure is fatal for the process; callers are expected to
    /// report it and exit.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = self.config.bind_address;
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind { address, source })?;
        let local = listener.local_addr().unwrap_or(address);
        info!("✅ Server running on ws://{}", local);
        Ok(listener)
    }

    /// Binds and then runs the accept loop.
    pub async fn start(&self) -> Result<(), ServerError> {
        info!("🚀 Starting relay server on {}", self.config.bind_address);
        info!("📬 Handling message types: {:?}", self.handlers.kinds());
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Runs the accept loop on an already bound listener.
    ///
    /// Each accepted connection gets its own task, so a slow session never
    /// delays the next accept. A failed accept is logged and the loop
    /// carries on.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    trace!("Accepted TCP connection from {}", addr);
                    let registry = self.registry.clone();
                    let handlers = self.handlers.clone();
                    let outbound_buffer = self.config.outbound_buffer;

                    // Spawn individual connection handler
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(stream, addr, registry, handlers, outbound_buffer).await
                        {
                            error!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                }
            }
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn bind_address(&self) -> SocketAddr {
        self.config.bind_address
    }

    /// Gets the registry of open sessions.
    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        self.registry.clone()
    }

    /// Gets the routing table.
    pub fn handlers(&self) -> Arc<HandlerRegistry> {
        self.handlers.clone()
    }
}
