//! # Relay - Main Entry Point
//!
//! Minimal WebSocket message relay. This entry point handles CLI parsing,
//! configuration loading, logging setup and the application lifecycle.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration (relay.toml, ws://127.0.0.1:7778)
//! relay
//!
//! # Specify custom configuration
//! relay --config production.toml
//!
//! # Override specific settings
//! relay --host 0.0.0.0 --port 9000 --log-level debug
//!
//! # JSON logging for production
//! relay --json-logs
//! ```
//!
//! ## Configuration
//!
//! The relay loads configuration from a TOML file (default: `relay.toml`).
//! If the file doesn't exist, a default configuration will be created.
//!
//! ## Signal Handling
//!
//! The relay stops on SIGINT (Ctrl+C) and SIGTERM (Unix systems). Open
//! sessions are not drained.

use tracing::error;

mod app;
mod cli;
mod config;
mod logging;
mod signals;

pub use app::Application;
pub use cli::CliArgs;
pub use config::{AppConfig, LoggingSettings, ServerSettings};

/// Main entry point for the relay.
///
/// Handles the complete application lifecycle:
/// 1. Command-line argument parsing
/// 2. Configuration loading and CLI overrides
/// 3. Logging system initialization
/// 4. Application creation and execution
///
/// # Exit Codes
///
/// * **0**: Stopped by signal
/// * **1**: Error during startup, configuration, or runtime
///
/// Called from `main` under `#[tokio::main]`.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let mut config = match AppConfig::load_from_file(&args.config_path).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load {}: {e}", args.config_path.display());
            std::process::exit(1);
        }
    };
    config.apply_cli(&args);

    // Logging comes up before anything else can log
    if let Err(e) = logging::setup_logging(&config.logging) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(config) {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parsing() {
        let args = CliArgs::try_parse_from([
            "relay",
            "--config",
            "test.toml",
            "--port",
            "9000",
            "--log-level",
            "debug",
            "--json-logs",
        ])
        .unwrap();

        assert_eq!(args.config_path, std::path::PathBuf::from("test.toml"));
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.log_level, Some("debug".to_string()));
        assert!(args.json_logs);
    }

    #[tokio::test]
    async fn test_startup_pipeline_builds_application() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("relay.toml");
        tokio::fs::write(&path, "[server]\nport = 9300\n").await.unwrap();

        let args = CliArgs::try_parse_from([
            "relay",
            "--config",
            path.to_str().unwrap(),
            "--host",
            "0.0.0.0",
        ])
        .unwrap();

        let mut config = AppConfig::load_from_file(&args.config_path).await.unwrap();
        config.apply_cli(&args);
        let app = Application::new(config).unwrap();

        assert_eq!(app.config().server.port, 9300);
        assert_eq!(app.server().bind_address().to_string(), "0.0.0.0:9300");
    }
}
