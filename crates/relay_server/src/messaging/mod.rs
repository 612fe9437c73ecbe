//! Message handling and routing for client-server communication.
//!
//! This module provides the envelope codec, the routing table that maps a
//! discriminator to its handler, and the built-in handlers.

pub mod codec;
pub mod handlers;
pub mod router;
pub mod types;

pub use codec::{decode, decode_bytes, encode};
pub use router::{DispatchOutcome, HandlerRegistry, MessageHandler};
pub use types::Envelope;
