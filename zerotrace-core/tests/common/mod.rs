// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Shared fixtures for the engine and storage tests.

#![allow(dead_code)]

pub mod strategies;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use zerotrace_core::storage::CONVERSATIONS_KEY;
use zerotrace_core::*;

/// Identity hashes used across tests. Sorted: ALICE < BOB < CAROL < DAVE.
pub const ALICE: &str = "aa11aa11aa11aa11aa11aa11aa11aa11";
pub const BOB: &str = "bb22bb22bb22bb22bb22bb22bb22bb22";
pub const CAROL: &str = "cc33cc33cc33cc33cc33cc33cc33cc33";
pub const DAVE: &str = "dd44dd44dd44dd44dd44dd44dd44dd44";

/// Engine, mock service and a recording presenter.
pub struct Harness {
    pub gateway: Arc<MockGateway>,
    pub engine: Arc<SyncEngine<MockGateway>>,
    events: Arc<Mutex<Vec<SyncEvent>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_gateway(Arc::new(MockGateway::new()))
    }

    pub fn with_gateway(gateway: Arc<MockGateway>) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let recorder = events.clone();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(Arc::new(CallbackHandler::new(move |event| {
            recorder.lock().unwrap().push(event);
        })));
        let engine = Arc::new(SyncEngine::new(gateway.clone(), Arc::new(dispatcher)));
        Harness {
            gateway,
            engine,
            events,
        }
    }

    /// Drains the recorded events.
    pub fn take_events(&self) -> Vec<SyncEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Number of message-list renders recorded for `thread_id`, drained.
    pub fn take_renders(&self, thread_id: &str) -> usize {
        self.take_events()
            .iter()
            .filter(|event| {
                matches!(event, SyncEvent::MessagesChanged { thread_id: id, .. } if id == thread_id)
            })
            .count()
    }

    pub fn error_notices(events: &[SyncEvent]) -> usize {
        events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    SyncEvent::Notice {
                        level: NoticeLevel::Error,
                        ..
                    }
                )
            })
            .count()
    }
}

/// Memory-backed store holding a saved identity.
pub fn store_with_identity(identity_hash: &str) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    IdentityVault::new(store.clone())
        .save(&Identity {
            identity_hash: identity_hash.to_string(),
            public_key: format!("pk-{}", identity_hash),
        })
        .unwrap();
    store
}

/// Store whose next `set` calls fail, as if the disk were full.
pub struct FailingWrites {
    inner: Arc<MemoryStore>,
    remaining: AtomicUsize,
}

impl FailingWrites {
    pub fn new(inner: Arc<MemoryStore>, failures: usize) -> Self {
        FailingWrites {
            inner,
            remaining: AtomicUsize::new(failures),
        }
    }
}

impl KeyValueStore for FailingWrites {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let failing = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.inner.clear(key)
    }
}

/// Session signed in as `identity_hash` with no cached threads.
pub fn session_for(identity_hash: &str) -> SessionContext {
    SessionContext::open(store_with_identity(identity_hash)).unwrap()
}

/// Session signed in as `identity_hash` with `threads` already cached.
pub fn session_with_threads(identity_hash: &str, threads: &[Thread]) -> SessionContext {
    let store = store_with_identity(identity_hash);
    store
        .set(CONVERSATIONS_KEY, &serde_json::to_string(threads).unwrap())
        .unwrap();
    SessionContext::open(store).unwrap()
}

pub fn thread(thread_id: &str, recipient: &str, last_message: &str, timestamp: u64) -> Thread {
    Thread {
        thread_id: thread_id.to_string(),
        recipient_hash: recipient.to_string(),
        last_message: last_message.to_string(),
        timestamp,
        placeholder: false,
    }
}

pub fn message(sender: &str, text: &str, timestamp: u64) -> Message {
    Message {
        sender: sender.to_string(),
        text: text.to_string(),
        timestamp,
        proof_present: true,
        commitment: None,
    }
}
