// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Persistent Storage Module
//!
//! Durable key/value storage for the local identity and the conversation map.
//! Backends implement [`KeyValueStore`]; SQLite is used on disk and an
//! in-memory map for tests and ephemeral sessions.
//!
//! A missing key always means "not yet initialized", never an error.

mod error;
mod identity;
mod memory;
mod sqlite;

pub use error::StorageError;
pub use identity::IdentityVault;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage key of the serialized identity record.
pub const IDENTITY_KEY: &str = "zerotrace_identity";

/// Storage key of the identity creation time (milliseconds since the epoch).
pub const IDENTITY_CREATED_KEY: &str = "zerotrace_identity_created";

/// Storage key of the serialized conversation map.
pub const CONVERSATIONS_KEY: &str = "zerotrace_conversations";

/// Every key owned by a session, in reset order.
pub const ALL_KEYS: [&str; 3] = [IDENTITY_KEY, IDENTITY_CREATED_KEY, CONVERSATIONS_KEY];

/// Durable string key/value storage.
///
/// Writes are synchronous from the caller's perspective: once `set` returns,
/// the value is fully stored or the call failed and the previous value remains.
pub trait KeyValueStore: Send + Sync {
    /// Loads a value. Returns `None` if the key doesn't exist.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value. Removing a missing key is not an error.
    fn clear(&self, key: &str) -> Result<(), StorageError>;

    /// Checks if a key exists.
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}
