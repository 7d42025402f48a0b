//! In-memory session store
//!
//! Owns every session's turn history for the life of the process. No
//! persistence; a restart forgets all sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use super::history::{MessageHistory, Turn};
use crate::llm::Message;

/// Process-wide map from session id to bounded turn history.
///
/// All mutating operations serialize on a single write lock; reads clone a
/// consistent snapshot under the read lock. Methods are synchronous, so no
/// lock can be held across a provider round trip.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, MessageHistory>>,
    max_entries: usize,
}

impl SessionStore {
    /// Create a store whose sessions keep at most `max_entries` entries.
    ///
    /// `max_entries` must be even; truncation preserves user/assistant
    /// pairing.
    pub fn new(max_entries: usize) -> Self {
        debug_assert!(max_entries % 2 == 0, "history window must be even");
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_entries,
        }
    }

    /// Get the per-session entry window
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Resolve a caller-supplied session id, or mint a fresh one.
    ///
    /// A known id is returned unchanged. An absent or unknown id yields a new
    /// empty session; a caller-supplied unknown id becomes the key of that
    /// session rather than being rejected.
    pub fn resolve_or_create(&self, id: Option<&str>) -> String {
        let mut sessions = self.sessions.write().unwrap();

        if let Some(id) = id {
            if sessions.contains_key(id) {
                return id.to_string();
            }
        }

        let new_id = id
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        sessions.insert(new_id.clone(), MessageHistory::new(self.max_entries));
        tracing::info!(session_id = %new_id, "created new session");

        new_id
    }

    /// Snapshot a session's history as ordered role/text entries.
    ///
    /// Unknown ids yield an empty sequence, not an error.
    pub fn history(&self, id: &str) -> Vec<Message> {
        let sessions = self.sessions.read().unwrap();
        sessions
            .get(id)
            .map(|h| h.to_messages())
            .unwrap_or_default()
    }

    /// Append a user/assistant pair to a session, auto-vivifying it if
    /// absent, then apply the sliding window.
    ///
    /// Both entries land together under one write-lock acquisition, and
    /// truncation runs before any other mutation on the session can
    /// interleave.
    pub fn append(&self, id: &str, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        let mut sessions = self.sessions.write().unwrap();
        sessions
            .entry(id.to_string())
            .or_insert_with(|| MessageHistory::new(self.max_entries))
            .push_turn(Turn::new(user_text, assistant_text));
    }

    /// Remove a session entirely. Returns whether it existed.
    pub fn clear(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap();
        let removed = sessions.remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "session cleared");
        }
        removed
    }

    /// Number of currently tracked sessions
    pub fn count(&self) -> usize {
        let sessions = self.sessions.read().unwrap();
        sessions.len()
    }
}
