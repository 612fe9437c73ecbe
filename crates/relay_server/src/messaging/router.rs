//! Message routing logic for dispatching envelopes to handlers.
//!
//! The routing table maps a discriminator to one handler. It is built once
//! at startup, wrapped in an `Arc`, and shared read-only by every session,
//! so lookups need no synchronization.

use crate::{connection::SessionHandle, error::HandlerError, messaging::Envelope};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{error, trace, warn};

/// Trait for message handlers.
///
/// A handler receives the session the envelope arrived on and may reply
/// through it any number of times. Returned errors are logged by
/// [`HandlerRegistry::dispatch`] and never reach the session loop.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle one envelope
    async fn handle(&self, session: &SessionHandle, envelope: &Envelope) -> Result<(), HandlerError>;

    /// Get handler name for debugging
    fn handler_name(&self) -> &str;
}

/// What happened to a dispatched envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler ran to completion
    Handled,
    /// A handler ran and returned an error, which was logged
    HandlerFailed,
    /// No handler is registered for the discriminator
    Unrecognized,
}

/// Static mapping from discriminator to handler.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty routing table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for envelopes of type `kind`.
    ///
    /// Returns `true` if this replaced an existing handler.
    pub fn register(&mut self, kind: impl Into<String>, handler: Arc<dyn MessageHandler>) -> bool {
        self.handlers.insert(kind.into(), handler).is_some()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered discriminators, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Routes an envelope to its handler.
    ///
    /// Unknown discriminators are logged as a warning and dropped; nothing
    /// is sent back to the peer. Handler errors are logged and swallowed.
    pub async fn dispatch(&self, session: &SessionHandle, envelope: &Envelope) -> DispatchOutcome {
        let Some(handler) = self.handlers.get(envelope.kind.as_str()) else {
            warn!("Unknown message type: {}", envelope.kind);
            return DispatchOutcome::Unrecognized;
        };

        trace!(
            "📨 Routing '{}' from session {} to {}",
            envelope.kind,
            session.id(),
            handler.handler_name()
        );

        match handler.handle(session, envelope).await {
            Ok(()) => DispatchOutcome::Handled,
            Err(e) => {
                error!(
                    "Handler '{}' failed for '{}' on session {}: {}",
                    handler.handler_name(),
                    envelope.kind,
                    session.id(),
                    e
                );
                DispatchOutcome::HandlerFailed
            }
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
