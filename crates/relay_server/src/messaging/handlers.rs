//! Built-in message handlers.

use crate::{
    connection::SessionHandle,
    error::HandlerError,
    messaging::{router::MessageHandler, Envelope, HandlerRegistry},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub const CHAT_MESSAGE: &str = "chat_message";
pub const CLIENT_REGISTER: &str = "client_register";
pub const CLEAR_CHAT: &str = "clear_chat";

/// Text of the fixed `chat_message` reply.
pub const CHAT_REPLY_TEXT: &str = "from chat message";

/// Replies to every chat message with a fixed envelope, whatever it
/// carried.
#[derive(Debug, Default)]
pub struct ChatMessageHandler;

impl ChatMessageHandler {
    pub fn reply() -> Envelope {
        Envelope::new(CHAT_MESSAGE).with_field("message", CHAT_REPLY_TEXT)
    }
}

#[async_trait]
impl MessageHandler for ChatMessageHandler {
    async fn handle(&self, session: &SessionHandle, _envelope: &Envelope) -> Result<(), HandlerError> {
        session.send_envelope(&Self::reply()).await?;
        info!("Sent: {}", CHAT_REPLY_TEXT);
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "chat_message"
    }
}

/// Acknowledges a client registration in the log. Sends nothing.
#[derive(Debug, Default)]
pub struct ClientRegisterHandler;

#[async_trait]
impl MessageHandler for ClientRegisterHandler {
    async fn handle(&self, session: &SessionHandle, _envelope: &Envelope) -> Result<(), HandlerError> {
        info!("👋 Client registered on session {}", session.id());
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "client_register"
    }
}

/// Acknowledges a clear-chat notice in the log. Sends nothing.
#[derive(Debug, Default)]
pub struct ClearChatHandler;

#[async_trait]
impl MessageHandler for ClearChatHandler {
    async fn handle(&self, session: &SessionHandle, _envelope: &Envelope) -> Result<(), HandlerError> {
        info!("🧹 Chat cleared on session {}", session.id());
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "clear_chat"
    }
}

impl HandlerRegistry {
    /// Routing table with the built-in handlers registered.
    pub fn with_default_handlers() -> Self {
        let mut registry = Self::new();
        registry.register(CHAT_MESSAGE, Arc::new(ChatMessageHandler));
        registry.register(CLIENT_REGISTER, Arc::new(ClientRegisterHandler));
        registry.register(CLEAR_CHAT, Arc::new(ClearChatHandler));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{codec, DispatchOutcome};
    use serde_json::json;
    use tokio::sync::mpsc;
    use tokio_tungstenite::tungstenite::Message;

    fn session() -> (SessionHandle, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(8);
        (SessionHandle::new(7, "127.0.0.1:7000".parse().unwrap(), tx), rx)
    }

    fn drain(rx: &mut mpsc::Receiver<Message>) -> Vec<serde_json::Value> {
        let mut out = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            match frame {
                Message::Text(text) => out.push(serde_json::from_str(text.as_str()).unwrap()),
                other => panic!("unexpected frame: {other:?}"),
            }
        }
        out
    }

    #[test]
    fn test_default_table() {
        let registry = HandlerRegistry::with_default_handlers();
        assert_eq!(registry.kinds(), vec![CHAT_MESSAGE, CLEAR_CHAT, CLIENT_REGISTER]);
    }

    #[tokio::test]
    async fn test_chat_message_always_gets_fixed_reply() {
        let registry = HandlerRegistry::with_default_handlers();
        let (session, mut rx) = session();

        let inbound = [
            r#"{"type":"chat_message"}"#,
            r#"{"type":"chat_message","message":"hello"}"#,
            r#"{"type":"chat_message","message":{"nested":[1,2,3]},"extra":true}"#,
        ];

        for raw in inbound {
            let envelope = codec::decode(raw).unwrap();
            assert_eq!(registry.dispatch(&session, &envelope).await, DispatchOutcome::Handled);
            assert_eq!(
                drain(&mut rx),
                vec![json!({"type": "chat_message", "message": "from chat message"})]
            );
        }
    }

    #[tokio::test]
    async fn test_acknowledgements_send_nothing() {
        let registry = HandlerRegistry::with_default_handlers();
        let (session, mut rx) = session();

        for kind in [CLIENT_REGISTER, CLEAR_CHAT] {
            let envelope = Envelope::new(kind).with_field("client_id", "abc");
            assert_eq!(registry.dispatch(&session, &envelope).await, DispatchOutcome::Handled);
        }
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_type_sends_nothing() {
        let registry = HandlerRegistry::with_default_handlers();
        let (session, mut rx) = session();

        let outcome = registry.dispatch(&session, &Envelope::new("chat_messages")).await;

        assert_eq!(outcome, DispatchOutcome::Unrecognized);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_chat_reply_to_vanished_peer_is_contained() {
        let registry = HandlerRegistry::with_default_handlers();
        let (session, rx) = session();
        drop(rx);

        let outcome = registry.dispatch(&session, &Envelope::new(CHAT_MESSAGE)).await;
        assert_eq!(outcome, DispatchOutcome::HandlerFailed);
    }
}
