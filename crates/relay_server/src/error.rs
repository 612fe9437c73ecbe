//! Error types and handling for the relay server.
//!
//! Failures are contained at the narrowest scope that can absorb them:
//! decode and handler errors stay inside a single message, transport
//! errors end a single session, and only a bind failure reaches the
//! process.

use crate::connection::SessionId;
use std::net::SocketAddr;

/// Enumeration of possible server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not acquire its host/port
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Network-related errors such as handshake failures or socket faults
    #[error("Network error: {0}")]
    Network(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why an inbound document could not be turned into an envelope.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Not valid UTF-8 JSON
    #[error("Invalid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Valid JSON, but not an object
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// No string `type` field to dispatch on
    #[error("Missing or non-string 'type' field")]
    MissingType,
}

/// Returned by a session's outbound side once its writer is gone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Session {session_id} is no longer accepting outbound frames")]
pub struct SendError {
    pub session_id: SessionId,
}

/// Failure raised from inside a message handler.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Send(#[from] SendError),

    #[error("{0}")]
    Other(String),
}
