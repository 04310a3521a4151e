// ABOUTME: In-memory session registry — maps session ids to their conversation history.
// ABOUTME: Entries are created lazily and live for the process lifetime; each has its own lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::session::turn::Session;

/// Shared handle to one session. Holding its lock serializes work on that session.
pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

/// Keyed registry of sessions.
///
/// The map lock is held only for lookup and insert. Per-session locks are
/// independent, so work on distinct ids never contends.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `session_id`, creating an empty one if unseen.
    ///
    /// Repeated calls with the same id return the same underlying session.
    pub fn get_or_create(&self, session_id: &str) -> SessionHandle {
        debug_assert!(!session_id.is_empty(), "session id must be non-empty");
        let mut sessions = self.map();
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id, "creating session");
                Arc::new(tokio::sync::Mutex::new(Session::new(session_id)))
            })
            .clone()
    }

    /// Empty the history of `session_id`, creating the session if needed.
    pub async fn clear(&self, session_id: &str) {
        let handle = self.get_or_create(session_id);
        handle.lock().await.clear();
        debug!(session_id, "session cleared");
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.map().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, SessionHandle>> {
        // The map is only ever mutated by a single insert, so a poisoned
        // lock still guards a consistent map.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
