// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Conversation Store
//!
//! In-memory cache of thread previews keyed by thread id, restored from and
//! persisted to a [`KeyValueStore`]. Persisting is explicit so writes stay
//! observable; callers batch mutations and persist once.
//!
//! A thread's preview never moves backwards in time: an update is applied
//! only if it is strictly newer than what is cached, whichever side (local
//! send or remote fetch) it came from.

use std::collections::HashMap;
use std::sync::Arc;

use crate::storage::{KeyValueStore, StorageError, CONVERSATIONS_KEY};
use crate::types::Thread;

/// Result of an [`ConversationStore::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The thread was not cached and has been added.
    Inserted,
    /// The cached preview was replaced by a newer one.
    Updated,
    /// The update was not newer than the cached preview and was ignored.
    Stale,
}

impl UpsertOutcome {
    /// Returns true if the store changed.
    pub fn is_mutation(self) -> bool {
        !matches!(self, UpsertOutcome::Stale)
    }
}

/// Cache of thread previews.
pub struct ConversationStore {
    store: Arc<dyn KeyValueStore>,
    threads: HashMap<String, Thread>,
}

impl ConversationStore {
    /// Creates an empty store without reading storage.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        ConversationStore {
            store,
            threads: HashMap::new(),
        }
    }

    /// Restores the cached threads from storage.
    ///
    /// Absent storage yields an empty store.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let mut conversations = Self::new(store);
        if let Some(raw) = conversations.store.get(CONVERSATIONS_KEY)? {
            let threads: Vec<Thread> = serde_json::from_str(&raw)?;
            for thread in threads {
                conversations
                    .threads
                    .insert(thread.thread_id.clone(), thread);
            }
        }
        Ok(conversations)
    }

    /// Inserts a thread, or refreshes its preview if the update is newer.
    ///
    /// An existing entry is overwritten only if `timestamp_ms` is strictly
    /// greater than the cached timestamp, or if the entry is a placeholder
    /// added by [`ensure`](Self::ensure) and not yet filled. The first fill
    /// clears the placeholder state, whatever the message text.
    pub fn upsert(
        &mut self,
        thread_id: &str,
        recipient_hash: &str,
        message: &str,
        timestamp_ms: u64,
    ) -> UpsertOutcome {
        match self.threads.get_mut(thread_id) {
            Some(thread) => {
                if timestamp_ms > thread.timestamp || thread.placeholder {
                    thread.last_message = message.to_string();
                    thread.timestamp = timestamp_ms;
                    thread.placeholder = false;
                    UpsertOutcome::Updated
                } else {
                    UpsertOutcome::Stale
                }
            }
            None => {
                self.threads.insert(
                    thread_id.to_string(),
                    Thread {
                        thread_id: thread_id.to_string(),
                        recipient_hash: recipient_hash.to_string(),
                        last_message: message.to_string(),
                        timestamp: timestamp_ms,
                        placeholder: false,
                    },
                );
                UpsertOutcome::Inserted
            }
        }
    }

    /// Adds a placeholder thread (empty preview) if the thread is unknown.
    ///
    /// Returns true if a thread was added.
    pub fn ensure(&mut self, thread_id: &str, recipient_hash: &str, timestamp_ms: u64) -> bool {
        if self.threads.contains_key(thread_id) {
            return false;
        }
        self.threads.insert(
            thread_id.to_string(),
            Thread {
                thread_id: thread_id.to_string(),
                recipient_hash: recipient_hash.to_string(),
                last_message: String::new(),
                timestamp: timestamp_ms,
                placeholder: true,
            },
        );
        true
    }

    pub fn get(&self, thread_id: &str) -> Option<&Thread> {
        self.threads.get(thread_id)
    }

    /// All threads, newest first. Ties are ordered by thread id.
    pub fn all(&self) -> Vec<Thread> {
        let mut threads: Vec<Thread> = self.threads.values().cloned().collect();
        threads.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.thread_id.cmp(&b.thread_id))
        });
        threads
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Writes the full map to storage.
    pub fn persist(&self) -> Result<(), StorageError> {
        let data = serde_json::to_string(&self.all())?;
        self.store.set(CONVERSATIONS_KEY, &data)
    }

    /// Drops every cached thread (in memory only).
    pub fn clear(&mut self) {
        self.threads.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn empty_store() -> ConversationStore {
        ConversationStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_upsert_inserts_then_updates_only_when_newer() {
        let mut store = empty_store();
        assert_eq!(
            store.upsert("a:b", "b", "first", 1000),
            UpsertOutcome::Inserted
        );
        assert_eq!(store.upsert("a:b", "b", "older", 500), UpsertOutcome::Stale);
        assert_eq!(store.upsert("a:b", "b", "same", 1000), UpsertOutcome::Stale);
        assert_eq!(
            store.upsert("a:b", "b", "newer", 2000),
            UpsertOutcome::Updated
        );

        let thread = store.get("a:b").unwrap();
        assert_eq!(thread.last_message, "newer");
        assert_eq!(thread.timestamp, 2000);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_placeholder_is_filled_by_first_message() {
        let mut store = empty_store();
        assert!(store.ensure("a:b", "b", 5000));
        assert!(!store.ensure("a:b", "b", 9000));

        assert_eq!(store.upsert("a:b", "b", "hello", 4000), UpsertOutcome::Updated);
        assert_eq!(store.upsert("a:b", "b", "older", 3000), UpsertOutcome::Stale);
        assert_eq!(store.get("a:b").unwrap().last_message, "hello");
        assert!(!store.get("a:b").unwrap().is_placeholder());
    }

    #[test]
    fn test_empty_message_never_reopens_the_entry() {
        let mut store = empty_store();
        store.upsert("a:b", "b", "", 2000);

        assert_eq!(store.upsert("a:b", "b", "stale", 1000), UpsertOutcome::Stale);
        let thread = store.get("a:b").unwrap();
        assert_eq!(thread.timestamp, 2000);
        assert_eq!(thread.last_message, "");
    }

    #[test]
    fn test_all_orders_newest_first() {
        let mut store = empty_store();
        store.upsert("a:b", "b", "x", 100);
        store.upsert("a:c", "c", "y", 300);
        store.upsert("a:d", "d", "z", 200);

        let ids: Vec<String> = store.all().into_iter().map(|t| t.thread_id).collect();
        assert_eq!(ids, vec!["a:c", "a:d", "a:b"]);
    }

    #[test]
    fn test_persist_and_load_roundtrip() {
        let backing: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = ConversationStore::load(backing.clone()).unwrap();
        assert!(store.is_empty());

        store.upsert("a:b", "b", "hi", 1000);
        store.persist().unwrap();

        let restored = ConversationStore::load(backing).unwrap();
        assert_eq!(restored.get("a:b"), store.get("a:b"));
    }

    #[test]
    fn test_load_rejects_corrupt_map() {
        let backing = Arc::new(MemoryStore::new());
        backing.set(CONVERSATIONS_KEY, "{not json").unwrap();
        assert!(matches!(
            ConversationStore::load(backing),
            Err(StorageError::Serialization(_))
        ));
    }
}
