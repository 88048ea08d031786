//! Tests for the conversation cache

mod common;

use std::sync::Arc;

use common::strategies::*;
use proptest::prelude::*;
use tempfile::TempDir;
use zerotrace_core::storage::CONVERSATIONS_KEY;
use zerotrace_core::*;

fn memory_cache() -> ConversationStore {
    ConversationStore::new(Arc::new(MemoryStore::new()))
}

#[test]
fn test_stale_remote_preview_is_ignored() {
    let mut cache = memory_cache();
    cache.upsert("aa11:bb22", "bb22", "local", 1000);

    let outcome = cache.upsert("aa11:bb22", "bb22", "remote", 500);

    assert_eq!(outcome, UpsertOutcome::Stale);
    let thread = cache.get("aa11:bb22").unwrap();
    assert_eq!(thread.timestamp, 1000);
    assert_eq!(thread.last_message, "local");
}

#[test]
fn test_equal_timestamp_does_not_overwrite() {
    let mut cache = memory_cache();
    cache.upsert("aa11:bb22", "bb22", "first", 1000);
    assert_eq!(
        cache.upsert("aa11:bb22", "bb22", "second", 1000),
        UpsertOutcome::Stale
    );
    assert_eq!(cache.get("aa11:bb22").unwrap().last_message, "first");
}

#[test]
fn test_placeholder_is_filled_by_older_message() {
    let mut cache = memory_cache();
    assert!(cache.ensure("aa11:bb22", "bb22", 5000));
    assert!(!cache.ensure("aa11:bb22", "bb22", 9000));

    let outcome = cache.upsert("aa11:bb22", "bb22", "hello", 1000);

    assert_eq!(outcome, UpsertOutcome::Updated);
    let thread = cache.get("aa11:bb22").unwrap();
    assert_eq!(thread.last_message, "hello");
    assert_eq!(thread.timestamp, 1000);
}

#[test]
fn test_empty_preview_does_not_admit_older_message() {
    let mut cache = memory_cache();
    cache.upsert("aa11:bb22", "bb22", "", 2000);

    let outcome = cache.upsert("aa11:bb22", "bb22", "stale", 1000);

    assert_eq!(outcome, UpsertOutcome::Stale);
    let thread = cache.get("aa11:bb22").unwrap();
    assert_eq!(thread.timestamp, 2000);
    assert_eq!(thread.last_message, "");
}

#[test]
fn test_placeholder_survives_reload_until_filled() {
    let backing: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut cache = ConversationStore::new(backing.clone());
    cache.ensure("aa11:bb22", "bb22", 5000);
    cache.persist().unwrap();

    let mut restored = ConversationStore::load(backing).unwrap();
    assert!(restored.get("aa11:bb22").unwrap().is_placeholder());
    restored.upsert("aa11:bb22", "bb22", "hello", 1000);
    assert!(!restored.get("aa11:bb22").unwrap().is_placeholder());
    assert_eq!(
        restored.upsert("aa11:bb22", "bb22", "older", 900),
        UpsertOutcome::Stale
    );
}

#[test]
fn test_all_is_newest_first() {
    let mut cache = memory_cache();
    cache.upsert("aa11:bb22", "bb22", "old", 100);
    cache.upsert("aa11:cc33", "cc33", "new", 300);
    cache.upsert("aa11:dd44", "dd44", "mid", 200);

    let order: Vec<String> = cache.all().into_iter().map(|t| t.last_message).collect();
    assert_eq!(order, vec!["new", "mid", "old"]);
}

#[test]
fn test_absent_storage_loads_empty() {
    let cache = ConversationStore::load(Arc::new(MemoryStore::new())).unwrap();
    assert!(cache.is_empty());
}

#[test]
fn test_corrupt_storage_is_an_error() {
    let store = Arc::new(MemoryStore::new());
    store.set(CONVERSATIONS_KEY, "{not json").unwrap();
    assert!(matches!(
        ConversationStore::load(store),
        Err(StorageError::Serialization(_))
    ));
}

#[test]
fn test_persist_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zerotrace.db");

    {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        let mut cache = ConversationStore::new(store);
        cache.upsert("aa11:bb22", "bb22", "hi", 1000);
        cache.upsert("aa11:cc33", "cc33", "yo", 2000);
        cache.persist().unwrap();
    }

    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let cache = ConversationStore::load(store).unwrap();
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("aa11:cc33").unwrap().last_message, "yo");
}

#[test]
fn test_mutation_without_persist_is_not_stored() {
    let store = Arc::new(MemoryStore::new());
    let mut cache = ConversationStore::new(store.clone());
    cache.upsert("aa11:bb22", "bb22", "hi", 1000);

    assert_eq!(store.get(CONVERSATIONS_KEY).unwrap(), None);
    cache.persist().unwrap();
    assert!(store.get(CONVERSATIONS_KEY).unwrap().is_some());
}

proptest! {
    #[test]
    fn prop_upsert_keeps_newest_in_any_order(
        (t1, t2) in distinct_timestamps_strategy(),
        text1 in preview_strategy(),
        text2 in preview_strategy(),
    ) {
        let (newest_ts, newest_text) = if t1 > t2 { (t1, &text1) } else { (t2, &text2) };

        let mut forward = memory_cache();
        forward.upsert("a:b", "b", &text1, t1);
        forward.upsert("a:b", "b", &text2, t2);

        let mut backward = memory_cache();
        backward.upsert("a:b", "b", &text2, t2);
        backward.upsert("a:b", "b", &text1, t1);

        for cache in [&forward, &backward] {
            let thread = cache.get("a:b").unwrap();
            prop_assert_eq!(thread.timestamp, newest_ts);
            prop_assert_eq!(&thread.last_message, newest_text);
        }
        prop_assert_eq!(forward.len(), 1);
    }
}
