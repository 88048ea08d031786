// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Data Model
//!
//! Local records (identity, thread previews) and the JSON shapes exchanged
//! with the messaging service.

use serde::{Deserialize, Serialize};

/// Root value reported for an identity that has not committed anything yet.
pub const EMPTY_STATE_ROOT: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Local identity record.
///
/// Created once per device session and immutable afterwards; only an explicit
/// reset removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable public fingerprint of this participant.
    pub identity_hash: String,
    /// Hex-encoded public key.
    pub public_key: String,
}

/// Cached preview of a two-party thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    /// Canonical thread id (see [`crate::canonical_thread_id`]).
    pub thread_id: String,
    /// Identity hash of the other participant.
    pub recipient_hash: String,
    /// Text of the latest known message; empty until one is observed.
    pub last_message: String,
    /// Timestamp of the latest known message, in milliseconds since the epoch.
    pub timestamp: u64,
    /// Set on threads created locally before any message was observed.
    /// Cleared by the first update; never derived from the preview text.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

impl Thread {
    /// Returns true if no message has been observed for this thread yet.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// A decrypted message as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sender identity hash.
    pub sender: String,
    /// Plaintext body.
    pub text: String,
    /// Server-assigned timestamp, in seconds since the epoch.
    pub timestamp: u64,
    /// Whether the service attached a proof artifact.
    #[serde(default)]
    pub proof_present: bool,
    /// Message commitment, when the service reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment: Option<String>,
}

impl Message {
    /// Timestamp converted to milliseconds, the unit of [`Thread::timestamp`].
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp.saturating_mul(1000)
    }
}

/// Identity material returned by the service on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIdentity {
    pub identity_hash: String,
    pub public_key: String,
}

impl From<CreatedIdentity> for Identity {
    fn from(created: CreatedIdentity) -> Self {
        Identity {
            identity_hash: created.identity_hash,
            public_key: created.public_key,
        }
    }
}

/// Thread descriptor from the remote thread list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteThread {
    pub thread_id: String,
    pub other_identity_hash: String,
    /// Seconds since the epoch.
    #[serde(default)]
    pub last_message_time: u64,
    #[serde(default)]
    pub message_count: usize,
}

/// Body of a send call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub thread_id: String,
    pub recipient_id: String,
    pub plaintext: String,
    pub sender_identity_hash: String,
    pub sender_signature: String,
}

/// Service acknowledgment of a send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub message_id: u64,
    #[serde(default)]
    pub cstate_root: Option<String>,
    #[serde(default)]
    pub proof_verified: bool,
}

/// Committed state root of an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRoot {
    pub cstate_root: String,
    #[serde(default)]
    pub thread_count: usize,
    #[serde(default)]
    pub thread_roots: Vec<String>,
}

impl StateRoot {
    /// Classifies the root value.
    pub fn status(&self) -> StateStatus {
        if self.cstate_root.is_empty() || self.cstate_root == EMPTY_STATE_ROOT {
            StateStatus::Initialized
        } else {
            StateStatus::Active
        }
    }
}

/// Coarse state of an identity's committed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateStatus {
    /// Nothing committed yet (all-zero root).
    Initialized,
    /// At least one commitment exists.
    Active,
}

/// Portable identity backup document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityExport {
    pub identity_hash: String,
    pub public_key: String,
    /// Creation time in milliseconds since the epoch, if known.
    pub created: Option<u64>,
    /// Export time in milliseconds since the epoch.
    pub export_date: u64,
}

/// Summary of the local profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub identity: Identity,
    pub created_at: Option<u64>,
    pub thread_count: usize,
}

/// Current time in milliseconds since the epoch.
pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
