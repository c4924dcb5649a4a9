//! Process-local session table: opaque session id -> user id.
//!
//! Owned explicitly by the session strategy and shared across request
//! workers behind an `Arc`. Sessions never expire; they live until
//! [`SessionStore::destroy`] or process exit.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Concurrent mapping of session ids to user ids.
#[derive(Default)]
pub struct SessionStore {
    user_id_by_session_id: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new session for `user_id` and return its id (UUID v4 text).
    ///
    /// Every call yields a fresh session, even for the same user.
    pub fn create(&self, user_id: &str) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.user_id_by_session_id
            .write()
            .insert(session_id.clone(), user_id.to_string());
        tracing::info!(
            user_id = user_id,
            session = %redact(&session_id),
            "Session created"
        );
        session_id
    }

    /// User id bound to `session_id`, if the session is live.
    pub fn user_id_for(&self, session_id: &str) -> Option<String> {
        self.user_id_by_session_id.read().get(session_id).cloned()
    }

    /// Remove `session_id`. Returns `true` iff an entry existed.
    pub fn destroy(&self, session_id: &str) -> bool {
        let removed = self.user_id_by_session_id.write().remove(session_id);
        if let Some(ref user_id) = removed {
            tracing::info!(
                user_id = user_id.as_str(),
                session = %redact(session_id),
                "Session destroyed"
            );
        }
        removed.is_some()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.user_id_by_session_id.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_id_by_session_id.read().is_empty()
    }
}

/// First 8 characters of a session id, for logs.
fn redact(session_id: &str) -> String {
    let prefix: String = session_id.chars().take(8).collect();
    format!("{prefix}…")
}
