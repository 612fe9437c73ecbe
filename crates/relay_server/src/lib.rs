//! # Relay Server
//!
//! A WebSocket message relay. Clients hold a persistent connection and
//! send JSON envelopes; each envelope carries a `type` discriminator that
//! selects the handler it is dispatched to.
//!
//! ## Architecture Overview
//!
//! ### Core Components
//!
//! * **Envelope Codec** ([`messaging::codec`]) - JSON text <-> [`Envelope`]
//! * **Handler Registry** ([`HandlerRegistry`]) - static discriminator -> handler table
//! * **Connection Session** ([`server::handlers::handle_connection`]) - one task per client
//! * **Connection Registry** ([`ConnectionRegistry`]) - the set of open sessions
//! * **Listener/Acceptor** ([`RelayServer`]) - binds and spawns sessions
//!
//! ### Message Flow
//!
//! 1. Client sends a WebSocket frame with a `{"type": ..., ...}` document
//! 2. The session decodes it; malformed documents are logged and dropped
//! 3. The envelope is dispatched to the handler registered for its type
//! 4. The handler may reply through the session's [`SessionHandle`]
//!
//! ### Handlers
//!
//! New message types are added by implementing [`MessageHandler`] and
//! registering it before the server is built:
//!
//! ```rust
//! use async_trait::async_trait;
//! use relay_server::{
//!     Envelope, HandlerError, HandlerRegistry, MessageHandler, RelayServer, ServerConfig,
//!     SessionHandle,
//! };
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl MessageHandler for Echo {
//!     async fn handle(&self, session: &SessionHandle, envelope: &Envelope) -> Result<(), HandlerError> {
//!         session.send_envelope(envelope).await?;
//!         Ok(())
//!     }
//!
//!     fn handler_name(&self) -> &str {
//!         "echo"
//!     }
//! }
//!
//! let mut handlers = HandlerRegistry::with_default_handlers();
//! handlers.register("echo", Arc::new(Echo));
//! let server = RelayServer::new(ServerConfig::default(), Arc::new(handlers));
//! assert!(server.handlers().contains("echo"));
//! ```
//!
//! ## Error Handling
//!
//! * [`DecodeError`] - logged, message dropped, session continues
//! * Unknown type - logged as a warning, message dropped
//! * [`HandlerError`] - logged at the dispatch boundary, session continues
//! * Transport failure - closes that session only
//! * [`ServerError::Bind`] - fatal to the process

pub use config::ServerConfig;
pub use connection::{ConnectionRegistry, RegistrationGuard, SessionHandle, SessionId, SessionState};
pub use error::{DecodeError, HandlerError, SendError, ServerError};
pub use messaging::{DispatchOutcome, Envelope, HandlerRegistry, MessageHandler};
pub use server::RelayServer;
pub use utils::{create_server, create_server_with_config};

pub mod config;
pub mod connection;
pub mod error;
pub mod messaging;
pub mod server;
pub mod utils;
