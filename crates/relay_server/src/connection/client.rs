//! Client session representation.
//!
//! A session is owned by the task that runs its receive loop. Everything
//! else (handlers, the registry) talks to it through a [`SessionHandle`],
//! which only exposes the outbound side.

use super::SessionId;
use crate::{error::SendError, messaging::{codec, Envelope}};
use std::fmt;
use std::net::SocketAddr;
use std::time::SystemTime;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Lifecycle of a session.
///
/// `Connecting -> Open -> Closing -> Closed`. Inbound frames are only
/// processed while `Open`, and only `Open` sessions are present in the
/// registry. Variants are declared in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    /// Handshake in progress
    Connecting,
    /// Registered and running the receive loop
    Open,
    /// A close trigger fired, cleanup in progress
    Closing,
    /// Removed from the registry, socket released
    Closed,
}

impl SessionState {
    /// Moves to `next` if it comes later in the lifecycle. Returns `false`
    /// and leaves the state alone otherwise.
    pub fn advance(&mut self, next: SessionState) -> bool {
        if next > *self {
            *self = next;
            true
        } else {
            false
        }
    }

    pub fn accepts_inbound(self) -> bool {
        self == SessionState::Open
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Connecting => "connecting",
            SessionState::Open => "open",
            SessionState::Closing => "closing",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// The outbound capability of one live session.
///
/// Cloning is cheap. Frames sent through any clone are queued for the
/// session's writer task and written to the socket in queue order.
///
/// # Fields
///
/// * `id` - Registry-issued session identifier
/// * `remote_addr` - The network address of the peer
/// * `connected_at` - When the connection was accepted
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    remote_addr: SocketAddr,
    connected_at: SystemTime,
    outbound: mpsc::Sender<Message>,
}

impl SessionHandle {
    /// Creates a handle whose frames are delivered to `outbound`.
    ///
    /// The receiving end is normally drained by the session's writer task;
    /// tests can hold it directly to observe what a handler sent.
    pub fn new(id: SessionId, remote_addr: SocketAddr, outbound: mpsc::Sender<Message>) -> Self {
        Self {
            id,
            remote_addr,
            connected_at: SystemTime::now(),
            outbound,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn connected_at(&self) -> SystemTime {
        self.connected_at
    }

    /// Whether the writer side of this session is still accepting frames.
    pub fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Queues a text frame, waiting for queue space if the writer is behind.
    pub async fn send_text(&self, text: impl Into<String>) -> Result<(), SendError> {
        self.send_frame(Message::Text(text.into().into())).await
    }

    /// Encodes and queues an envelope.
    pub async fn send_envelope(&self, envelope: &Envelope) -> Result<(), SendError> {
        self.send_text(codec::encode(envelope)).await
    }

    pub(crate) async fn send_frame(&self, frame: Message) -> Result<(), SendError> {
        self.outbound
            .send(frame)
            .await
            .map_err(|_| SendError { session_id: self.id })
    }

    /// Queues a frame without waiting. Used by broadcast, which must not
    /// stall on one slow peer.
    pub(crate) fn try_send_text(&self, text: &str) -> Result<(), SendError> {
        self.outbound
            .try_send(Message::Text(text.to_string().into()))
            .map_err(|_| SendError { session_id: self.id })
    }
}
