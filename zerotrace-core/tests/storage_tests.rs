// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for durable storage and session restore

mod common;

use std::sync::Arc;

use common::*;
use tempfile::TempDir;
use zerotrace_core::storage::{CONVERSATIONS_KEY, IDENTITY_CREATED_KEY, IDENTITY_KEY};
use zerotrace_core::*;

fn open_store(dir: &TempDir) -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open(dir.path().join("data").join("zerotrace.db")).unwrap())
}

#[test]
fn test_missing_keys_mean_uninitialized() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let vault = IdentityVault::new(store.clone());
    assert_eq!(vault.load().unwrap(), None);
    assert_eq!(vault.created_at().unwrap(), None);
    assert_eq!(vault.export().unwrap(), None);

    let session = SessionContext::open(store).unwrap();
    assert!(!session.has_identity());
    assert!(session.threads().is_empty());
}

#[test]
fn test_identity_survives_restart() {
    let dir = TempDir::new().unwrap();
    let identity = Identity {
        identity_hash: ALICE.to_string(),
        public_key: "pk".to_string(),
    };

    let created = IdentityVault::new(open_store(&dir)).save(&identity).unwrap();

    let store = open_store(&dir);
    let vault = IdentityVault::new(store.clone());
    assert_eq!(vault.load().unwrap(), Some(identity.clone()));
    assert_eq!(vault.created_at().unwrap(), Some(created));

    let export = vault.export().unwrap().unwrap();
    assert_eq!(export.identity_hash, ALICE);
    assert_eq!(export.created, Some(created));
    assert!(export.export_date >= created);
}

#[test]
fn test_reset_clears_all_keys() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let vault = IdentityVault::new(store.clone());
    vault
        .save(&Identity {
            identity_hash: ALICE.to_string(),
            public_key: "pk".to_string(),
        })
        .unwrap();
    store.set(CONVERSATIONS_KEY, "[]").unwrap();

    vault.reset().unwrap();

    for key in [IDENTITY_KEY, IDENTITY_CREATED_KEY, CONVERSATIONS_KEY] {
        assert_eq!(store.get(key).unwrap(), None, "{} not cleared", key);
    }
}

#[test]
fn test_corrupt_creation_time_is_reported() {
    let store = Arc::new(MemoryStore::new());
    store.set(IDENTITY_CREATED_KEY, "yesterday").unwrap();

    let result = IdentityVault::new(store).created_at();
    assert!(matches!(result, Err(StorageError::Corrupt { .. })));
}

#[tokio::test]
async fn test_session_restores_synced_threads_after_restart() {
    let dir = TempDir::new().unwrap();
    let harness = Harness::new();
    let ab = canonical_thread_id(ALICE, BOB);
    harness.gateway.push_message(&ab, BOB, "persisted", 100);

    {
        let store = open_store(&dir);
        IdentityVault::new(store.clone())
            .save(&Identity {
                identity_hash: ALICE.to_string(),
                public_key: "pk".to_string(),
            })
            .unwrap();
        let session = SessionContext::open(store).unwrap();
        harness.engine.sync_all(&session).await.unwrap();
    }

    let session = SessionContext::open(open_store(&dir)).unwrap();
    assert_eq!(session.identity().unwrap().identity_hash, ALICE);
    assert_eq!(session.thread(&ab).unwrap().last_message, "persisted");
    assert_eq!(session.profile().unwrap().thread_count, 1);
}
