//! Connection management for client sessions.
//!
//! This module handles the lifecycle bookkeeping of client sessions: the
//! per-session outbound handle and the process-wide registry of sessions
//! that are currently open.

pub mod client;
pub mod manager;

pub use client::{SessionHandle, SessionState};
pub use manager::{ConnectionRegistry, RegistrationGuard};

/// Type alias for session identifiers.
///
/// Session IDs are issued by the [`ConnectionRegistry`] and are unique for
/// the lifetime of the process.
pub type SessionId = u64;
