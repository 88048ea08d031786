// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Identity storage operations.

use std::sync::Arc;

use super::{
    KeyValueStore, StorageError, ALL_KEYS, IDENTITY_CREATED_KEY, IDENTITY_KEY,
};
use crate::types::{now_ms, Identity, IdentityExport};

/// Persists the local identity record and its creation time.
#[derive(Clone)]
pub struct IdentityVault {
    store: Arc<dyn KeyValueStore>,
}

impl IdentityVault {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        IdentityVault { store }
    }

    /// Saves the identity and stamps its creation time.
    pub fn save(&self, identity: &Identity) -> Result<u64, StorageError> {
        let created_at = now_ms();
        self.store
            .set(IDENTITY_KEY, &serde_json::to_string(identity)?)?;
        self.store
            .set(IDENTITY_CREATED_KEY, &created_at.to_string())?;
        Ok(created_at)
    }

    /// Loads the identity. Returns `None` if none was created yet.
    pub fn load(&self) -> Result<Option<Identity>, StorageError> {
        match self.store.get(IDENTITY_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Creation time in milliseconds since the epoch, if recorded.
    pub fn created_at(&self) -> Result<Option<u64>, StorageError> {
        let Some(raw) = self.store.get(IDENTITY_CREATED_KEY)? else {
            return Ok(None);
        };
        raw.trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: IDENTITY_CREATED_KEY.to_string(),
                reason: e.to_string(),
            })
    }

    /// Builds a backup document for the stored identity.
    pub fn export(&self) -> Result<Option<IdentityExport>, StorageError> {
        let Some(identity) = self.load()? else {
            return Ok(None);
        };
        Ok(Some(IdentityExport {
            identity_hash: identity.identity_hash,
            public_key: identity.public_key,
            created: self.created_at()?,
            export_date: now_ms(),
        }))
    }

    /// Removes the identity, its creation time and the conversation map.
    pub fn reset(&self) -> Result<(), StorageError> {
        for key in ALL_KEYS {
            self.store.clear(key)?;
        }
        Ok(())
    }
}
