use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::data_models::ConversationHistory;

/// Sessions kept before the least recently written one is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Debug)]
struct SessionEntry {
    history: ConversationHistory,
    touched: u64,
}

/// In-memory conversation windows keyed by session id, bounded to
/// `max_sessions` entries.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    clock: AtomicU64,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            clock: AtomicU64::new(0),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Generates a fresh session id.
    pub fn new_session_id() -> String {
        nanoid::nanoid!()
    }

    /// Copy of the session's history, empty for unknown sessions.
    pub fn snapshot(&self, session_id: &str) -> ConversationHistory {
        self.sessions
            .get(session_id)
            .map(|e| e.history.clone())
            .unwrap_or_default()
    }

    /// Saves `history` for `session_id`, evicting the stalest sessions
    /// when a new id would push the store past its cap.
    pub fn store(&self, session_id: &str, history: ConversationHistory) {
        let touched = self.clock.fetch_add(1, Ordering::Relaxed);
        if !self.sessions.contains_key(session_id) {
            while self.sessions.len() >= self.max_sessions {
                if !self.evict_oldest() {
                    break;
                }
            }
        }
        self.sessions
            .insert(session_id.to_string(), SessionEntry { history, touched });
    }

    fn evict_oldest(&self) -> bool {
        // shard read locks are released before the remove below
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|e| e.value().touched)
            .map(|e| e.key().clone());
        match oldest {
            Some(key) => {
                log::debug!("evicting idle session {key}");
                self.sessions.remove(&key).is_some()
            }
            None => false,
        }
    }

    /// Drops the session, returning whether it existed.
    pub fn clear(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_models::ConversationExchange;

    fn one_exchange(q: &str) -> ConversationHistory {
        vec![ConversationExchange::new(q, "a")].into_iter().collect()
    }

    #[test]
    fn test_unknown_session_is_empty() {
        let store = SessionStore::new();
        assert!(store.snapshot("nope").is_empty());
        assert!(!store.clear("nope"));
        assert_eq!(store.max_sessions(), DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn test_store_and_clear() {
        let store = SessionStore::new();
        let history = one_exchange("q");
        store.store("s1", history.clone());
        assert_eq!(store.snapshot("s1"), history);
        assert_eq!(store.len(), 1);
        assert!(store.clear("s1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_cap_evicts_least_recently_written() {
        let store = SessionStore::with_max_sessions(3);
        store.store("a", one_exchange("a"));
        store.store("b", one_exchange("b"));
        store.store("c", one_exchange("c"));
        // rewriting "a" makes "b" the stalest
        store.store("a", one_exchange("a2"));
        store.store("d", one_exchange("d"));

        assert_eq!(store.len(), 3);
        assert!(store.snapshot("b").is_empty());
        assert_eq!(store.snapshot("a"), one_exchange("a2"));
        assert_eq!(store.snapshot("c"), one_exchange("c"));
        assert_eq!(store.snapshot("d"), one_exchange("d"));
    }

    #[test]
    fn test_rewriting_existing_session_at_cap_evicts_nothing() {
        let store = SessionStore::with_max_sessions(2);
        store.store("a", one_exchange("a"));
        store.store("b", one_exchange("b"));
        store.store("b", one_exchange("b2"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot("a"), one_exchange("a"));
    }

    #[test]
    fn test_many_sessions_stay_bounded() {
        let store = SessionStore::with_max_sessions(10);
        for i in 0..500 {
            store.store(&format!("s{i}"), one_exchange("q"));
        }
        assert_eq!(store.len(), 10);
        assert!(!store.snapshot("s499").is_empty());
        assert!(store.snapshot("s0").is_empty());
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionStore::new_session_id(), SessionStore::new_session_id());
    }
}
