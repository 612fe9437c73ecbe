//! Connection handling logic for WebSocket clients.
//!
//! This module contains the per-connection session task: WebSocket
//! handshake, registration, the receive loop, and cleanup.

use crate::{
    connection::{ConnectionRegistry, SessionHandle, SessionId, SessionState},
    error::{DecodeError, ServerError},
    messaging::{codec, Envelope, HandlerRegistry},
};
use futures_util::{SinkExt, StreamExt};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{
        error::{Error as WsError, ProtocolError},
        Message,
    },
};
use tracing::{debug, error, info, trace, warn};

/// Handles a single client connection from handshake to cleanup.
///
/// # Connection Flow
///
/// 1. Perform WebSocket handshake (`Connecting`)
/// 2. Register the session with the registry (`Open`)
/// 3. Spawn the writer task that drains the session's outbound queue
/// 4. Receive frames in arrival order, decode and dispatch each one
/// 5. On peer close, transport error or end of stream, unregister and
///    release the socket (`Closing` -> `Closed`)
///
/// Frames from one connection are dispatched strictly one after another.
/// Decode and handler failures are logged and the loop keeps going.
///
/// # Returns
///
/// `Ok(())` once the session has closed, or a `ServerError` if the
/// handshake failed before the session was opened.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<ConnectionRegistry>,
    handlers: Arc<HandlerRegistry>,
    outbound_buffer: usize,
) -> Result<(), ServerError> {
    let mut state = SessionState::Connecting;
    trace!("🤝 {} from {}", state, addr);
    let ws_stream = accept_async(stream)
        .await
        .map_err(|e| ServerError::Network(format!("WebSocket handshake with {addr} failed: {e}")))?;

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<Message>(outbound_buffer.max(1));
    let session = SessionHandle::new(registry.next_session_id(), addr, outbound_tx);
    let session_id = session.id();

    let registration = registry.register(session.clone());
    transition(session_id, &mut state, SessionState::Open);
    info!("🔌 Client connected: session {} from {}", session_id, addr);

    // Outgoing task - the only writer to the socket
    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if let Err(e) = ws_sender.send(frame).await {
                debug!("Failed to write to session {}: {}", session_id, e);
                return;
            }
        }
        let _ = ws_sender.close().await;
    });

    // Incoming loop - runs while the session is open. Pings are answered
    // by the transport itself when the frame is read.
    while state.accepts_inbound() {
        let Some(frame) = ws_receiver.next().await else {
            debug!("Stream ended for session {}", session_id);
            break;
        };
        match frame {
            Ok(Message::Text(text)) => {
                process_inbound(&session, &handlers, codec::decode(text.as_str())).await;
            }
            Ok(Message::Binary(bytes)) => {
                process_inbound(&session, &handlers, codec::decode_bytes(&bytes)).await;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => {}
            Ok(Message::Close(_)) => {
                info!("Client disconnected: session {}", session_id);
                transition(session_id, &mut state, SessionState::Closing);
            }
            Err(e) if is_peer_disconnect(&e) => {
                info!("Client disconnected: session {} ({})", session_id, e);
                transition(session_id, &mut state, SessionState::Closing);
            }
            Err(e) => {
                warn!("WebSocket error for session {}: {}", session_id, e);
                transition(session_id, &mut state, SessionState::Closing);
            }
        }
    }

    transition(session_id, &mut state, SessionState::Closing);
    let connected_for = session.connected_at().elapsed().unwrap_or_default();
    drop(registration);
    drop(session);

    if let Err(e) = writer.await {
        error!("Writer task for session {} failed: {}", session_id, e);
    }
    transition(session_id, &mut state, SessionState::Closed);
    debug!("Session {} lasted {:?}", session_id, connected_for);
    Ok(())
}

fn transition(session_id: SessionId, state: &mut SessionState, next: SessionState) {
    let previous = *state;
    if state.advance(next) {
        trace!("Session {}: {} -> {}", session_id, previous, next);
    }
}

/// Whether a read error just means the peer went away.
fn is_peer_disconnect(error: &WsError) -> bool {
    match error {
        WsError::ConnectionClosed | WsError::AlreadyClosed => true,
        WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake) => true,
        WsError::Io(e) => matches!(
            e.kind(),
            io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof
        ),
        _ => false,
    }
}

async fn process_inbound(
    session: &SessionHandle,
    handlers: &HandlerRegistry,
    decoded: Result<Envelope, DecodeError>,
) {
    match decoded {
        Ok(envelope) => {
            info!("Received: {}", envelope.kind);
            handlers.dispatch(session, &envelope).await;
        }
        Err(e) => {
            error!("Invalid JSON received on session {}: {}", session.id(), e);
        }
    }
}
