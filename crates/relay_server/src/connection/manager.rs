//! Registry of currently open sessions.
//!
//! The registry is the only state shared between the acceptor and every
//! session task. It is a set keyed by session ID: adds and removes are
//! atomic, idempotent, and never hold a lock across an await point.

use super::{SessionHandle, SessionId};
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Process-wide set of open sessions.
///
/// # Architecture
///
/// * Uses `DashMap` for lock-sharded concurrent storage
/// * Implements atomic session ID generation
/// * Holds each session's [`SessionHandle`] so a traversal can reach the
///   outbound side of every open session
#[derive(Debug)]
pub struct ConnectionRegistry {
    sessions: DashMap<SessionId, SessionHandle>,

    /// Atomic counter for generating unique session IDs
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Issues a fresh session ID.
    pub fn next_session_id(&self) -> SessionId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Adds a session. Returns `false` if it was already present.
    pub fn add(&self, session: SessionHandle) -> bool {
        let session_id = session.id();
        let remote_addr = session.remote_addr();
        let inserted = match self.sessions.entry(session_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(session);
                true
            }
        };
        if inserted {
            info!("🔗 Session {} from {} registered", session_id, remote_addr);
        }
        inserted
    }

    /// Removes a session. Removing an absent session is a no-op and
    /// returns `false`.
    pub fn remove(&self, session_id: SessionId) -> bool {
        match self.sessions.remove(&session_id) {
            Some((_, session)) => {
                info!(
                    "❌ Session {} from {} unregistered",
                    session_id,
                    session.remote_addr()
                );
                true
            }
            None => false,
        }
    }

    /// Adds a session and returns a guard that removes it again when
    /// dropped, whichever way the owning task exits.
    pub fn register(self: &Arc<Self>, session: SessionHandle) -> RegistrationGuard {
        let session_id = session.id();
        self.add(session);
        RegistrationGuard {
            registry: Arc::clone(self),
            session_id,
        }
    }

    pub fn contains(&self, session_id: SessionId) -> bool {
        self.sessions.contains_key(&session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Snapshot of the IDs of all open sessions, in no particular order.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    /// Visits every open session.
    ///
    /// The callback runs while a shard lock is held, so it must not call
    /// back into the registry.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&SessionHandle),
    {
        for entry in self.sessions.iter() {
            f(entry.value());
        }
    }

    /// Queues a text frame for every open session without waiting on any
    /// of them. Returns how many sessions accepted the frame.
    pub fn broadcast_text(&self, text: &str) -> usize {
        let mut delivered = 0;
        self.for_each(|session| match session.try_send_text(text) {
            Ok(()) => delivered += 1,
            Err(e) => debug!("📡 Broadcast skipped: {}", e),
        });
        debug!("📡 Broadcasted message to {} sessions", delivered);
        delivered
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a session in the registry for as long as it lives.
#[derive(Debug)]
pub struct RegistrationGuard {
    registry: Arc<ConnectionRegistry>,
    session_id: SessionId,
}

impl RegistrationGuard {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.registry.remove(self.session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::sync::mpsc;
    use tokio_tungstenite::tungstenite::Message;

    fn session(registry: &ConnectionRegistry) -> (SessionHandle, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(8);
        let addr: SocketAddr = "127.0.0.1:50000".parse().unwrap();
        (SessionHandle::new(registry.next_session_id(), addr, tx), rx)
    }

    #[test]
    fn test_add_and_remove_are_idempotent() {
        let registry = ConnectionRegistry::new();
        let (handle, _rx) = session(&registry);
        let id = handle.id();

        assert!(registry.add(handle.clone()));
        assert!(!registry.add(handle));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(id));

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
        assert!(!registry.remove(12345));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let registry = ConnectionRegistry::new();
        let a = registry.next_session_id();
        let b = registry.next_session_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_guard_removes_on_drop() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (handle, _rx) = session(&registry);
        let id = handle.id();

        let guard = registry.register(handle);
        assert_eq!(guard.session_id(), id);
        assert!(registry.contains(id));

        drop(guard);
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_guard_removes_on_panic() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (handle, _rx) = session(&registry);
        let id = handle.id();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = registry.register(handle);
            panic!("handler blew up");
        }));

        assert!(result.is_err());
        assert!(!registry.contains(id));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_register_and_close() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut tasks = Vec::new();

        for _ in 0..64 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let (handle, _rx) = session(&registry);
                let id = handle.id();
                let guard = registry.register(handle);
                tokio::task::yield_now().await;
                assert!(registry.contains(id));
                drop(guard);
                id
            }));
        }

        for task in tasks {
            let id = task.await.unwrap();
            assert!(!registry.contains(id));
        }
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_open_session() {
        let registry = ConnectionRegistry::new();
        let (a, mut rx_a) = session(&registry);
        let (b, mut rx_b) = session(&registry);
        let (c, rx_c) = session(&registry);
        registry.add(a);
        registry.add(b);
        registry.add(c);
        drop(rx_c);

        assert_eq!(registry.broadcast_text("hello"), 2);
        assert!(matches!(rx_a.recv().await, Some(Message::Text(t)) if t.as_str() == "hello"));
        assert!(matches!(rx_b.recv().await, Some(Message::Text(t)) if t.as_str() == "hello"));

        let mut seen = registry.session_ids();
        seen.sort_unstable();
        let mut visited = Vec::new();
        registry.for_each(|s| visited.push(s.id()));
        visited.sort_unstable();
        assert_eq!(seen, visited);
    }
}
