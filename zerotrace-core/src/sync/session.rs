// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session Context
//!
//! Everything one signed-in client knows: its identity, the open thread, the
//! conversation cache and the last message fingerprint seen per thread.
//! A session is passed into every engine operation, so several sessions can
//! share one engine.
//!
//! Locks are short-lived and never held across an await point, which keeps
//! each store mutation atomic with respect to other tasks.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::fingerprint::MessageFingerprint;
use crate::conversations::ConversationStore;
use crate::error::{ClientError, ClientResult};
use crate::storage::{IdentityVault, KeyValueStore, MemoryStore, StorageError};
use crate::types::{Identity, Profile, Thread};

/// The thread currently open in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveThread {
    pub thread_id: String,
    pub recipient_hash: String,
}

/// Per-client session state.
pub struct SessionContext {
    vault: IdentityVault,
    identity: RwLock<Option<Identity>>,
    active: RwLock<Option<ActiveThread>>,
    conversations: Mutex<ConversationStore>,
    seen: Mutex<HashMap<String, MessageFingerprint>>,
}

impl SessionContext {
    /// Restores a session from durable storage.
    ///
    /// Missing keys yield a session without identity or conversations.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let vault = IdentityVault::new(store.clone());
        let identity = vault.load()?;
        let conversations = ConversationStore::load(store)?;
        Ok(SessionContext {
            vault,
            identity: RwLock::new(identity),
            active: RwLock::new(None),
            conversations: Mutex::new(conversations),
            seen: Mutex::new(HashMap::new()),
        })
    }

    /// Creates a fresh session backed by memory only.
    pub fn ephemeral() -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        SessionContext {
            vault: IdentityVault::new(store.clone()),
            identity: RwLock::new(None),
            active: RwLock::new(None),
            conversations: Mutex::new(ConversationStore::new(store)),
            seen: Mutex::new(HashMap::new()),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity.read().clone()
    }

    pub fn has_identity(&self) -> bool {
        self.identity.read().is_some()
    }

    /// Returns the identity or [`ClientError::IdentityNotInitialized`].
    pub fn require_identity(&self) -> ClientResult<Identity> {
        self.identity().ok_or(ClientError::IdentityNotInitialized)
    }

    pub fn active_thread(&self) -> Option<ActiveThread> {
        self.active.read().clone()
    }

    /// Snapshot of all cached threads, newest first.
    pub fn threads(&self) -> Vec<Thread> {
        self.conversations.lock().all()
    }

    pub fn thread(&self, thread_id: &str) -> Option<Thread> {
        self.conversations.lock().get(thread_id).cloned()
    }

    pub fn vault(&self) -> &IdentityVault {
        &self.vault
    }

    /// Identity, creation time and thread count.
    pub fn profile(&self) -> ClientResult<Profile> {
        let identity = self.require_identity()?;
        Ok(Profile {
            identity,
            created_at: self.vault.created_at()?,
            thread_count: self.conversations.lock().len(),
        })
    }

    pub(crate) fn set_identity(&self, identity: Option<Identity>) {
        *self.identity.write() = identity;
    }

    pub(crate) fn set_active(&self, active: Option<ActiveThread>) {
        *self.active.write() = active;
    }

    /// Runs `f` with exclusive access to the conversation cache.
    pub(crate) fn with_conversations<R>(&self, f: impl FnOnce(&mut ConversationStore) -> R) -> R {
        f(&mut self.conversations.lock())
    }

    /// Records the fingerprint seen for a thread.
    ///
    /// Returns false if it equals the previously recorded one.
    pub(crate) fn remember_fingerprint(
        &self,
        thread_id: &str,
        fingerprint: MessageFingerprint,
    ) -> bool {
        let mut seen = self.seen.lock();
        if seen.get(thread_id) == Some(&fingerprint) {
            return false;
        }
        seen.insert(thread_id.to_string(), fingerprint);
        true
    }

    pub(crate) fn forget_fingerprint(&self, thread_id: &str) {
        self.seen.lock().remove(thread_id);
    }

    /// Drops all in-memory state. Storage is cleared separately.
    pub(crate) fn clear(&self) {
        self.set_identity(None);
        self.set_active(None);
        self.conversations.lock().clear();
        self.seen.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CONVERSATIONS_KEY, IDENTITY_KEY};

    #[test]
    fn test_open_empty_storage() {
        let session = SessionContext::open(Arc::new(MemoryStore::new())).unwrap();
        assert!(!session.has_identity());
        assert!(session.threads().is_empty());
        assert!(matches!(
            session.require_identity(),
            Err(ClientError::IdentityNotInitialized)
        ));
    }

    #[test]
    fn test_open_restores_identity_and_threads() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(IDENTITY_KEY, r#"{"identityHash":"aa11","publicKey":"pk"}"#)
            .unwrap();
        store
            .set(
                CONVERSATIONS_KEY,
                r#"[{"threadId":"aa11:bb22","recipientHash":"bb22","lastMessage":"hi","timestamp":7}]"#,
            )
            .unwrap();

        let session = SessionContext::open(store).unwrap();
        assert_eq!(session.identity().unwrap().identity_hash, "aa11");
        assert_eq!(session.thread("aa11:bb22").unwrap().last_message, "hi");
        assert_eq!(session.profile().unwrap().thread_count, 1);
    }

    #[test]
    fn test_remember_fingerprint_detects_repeats() {
        let session = SessionContext::ephemeral();
        let fingerprint = MessageFingerprint::of(&[]);
        assert!(session.remember_fingerprint("a:b", fingerprint.clone()));
        assert!(!session.remember_fingerprint("a:b", fingerprint.clone()));
        session.forget_fingerprint("a:b");
        assert!(session.remember_fingerprint("a:b", fingerprint));
    }
}
