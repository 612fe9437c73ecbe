//! Main application logic and lifecycle management.
//!
//! This module contains the `Application` struct that turns a validated
//! configuration into a running relay server and keeps it running until
//! the process is asked to stop.

use crate::{config::AppConfig, signals::wait_for_stop_signal};
use relay_server::{HandlerRegistry, RelayServer, ServerError};
use std::sync::Arc;
use tracing::{error, info};

/// Main application struct.
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// Relay server instance
    server: RelayServer,
}

impl Application {
    /// Creates a new application from an already merged configuration.
    ///
    /// # Process
    ///
    /// 1. Validate configuration
    /// 2. Build the handler table once
    /// 3. Construct the relay server around it
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }

        let server_config = config.to_server_config()?;
        let handlers = Arc::new(HandlerRegistry::with_default_handlers());
        let server = RelayServer::new(server_config, handlers);

        Ok(Self { config, server })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn server(&self) -> &RelayServer {
        &self.server
    }

    /// Runs the relay until a stop signal arrives or the server fails.
    ///
    /// A bind failure is returned as an error. A stop signal returns
    /// `Ok(())`; open sessions are not drained, they end with the process.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting minimal WebSocket relay");
        self.log_configuration_summary();

        let server = self.server;
        let mut server_handle = tokio::spawn(async move { server.start().await });

        tokio::select! {
            joined = &mut server_handle => {
                return match joined {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => {
                        error!("❌ Server error: {}", e);
                        Err(e.into())
                    }
                    Err(e) => Err(ServerError::Internal(format!("Server task failed: {e}")).into()),
                };
            }
            stop = wait_for_stop_signal() => {
                stop?;
            }
        }

        server_handle.abort();
        info!("🛑 Server stopped by user");
        Ok(())
    }

    /// Logs the configuration summary at startup.
    fn log_configuration_summary(&self) {
        info!("📋 Configuration Summary:");
        info!("  🌐 Bind address: {}:{}", self.config.server.host, self.config.server.port);
        info!("  📤 Outbound buffer: {} frames", self.config.server.outbound_buffer);
        info!(
            "  📝 Log level: {} ({})",
            self.config.logging.level,
            if self.config.logging.json_format { "json" } else { "text" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[test]
    fn test_application_creation() {
        let app = Application::new(AppConfig::default()).unwrap();

        assert_eq!(app.server().bind_address(), "127.0.0.1:7778".parse::<SocketAddr>().unwrap());
        assert_eq!(
            app.server().handlers().kinds(),
            vec!["chat_message", "clear_chat", "client_register"]
        );
        assert!(app.server().registry().is_empty());
    }

    #[test]
    fn test_application_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.logging.level = "chatty".to_string();

        assert!(Application::new(config).is_err());
    }

    #[tokio::test]
    async fn test_run_reports_bind_failure() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = AppConfig::default();
        config.server.port = taken.local_addr().unwrap().port();

        let app = Application::new(config).unwrap();
        assert!(app.run().await.is_err());
    }
}
