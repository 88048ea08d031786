// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Client Error Types
//!
//! Unified error type for the ZeroTrace client.

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::storage::StorageError;

/// Unified error type for client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote service call failed.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Identity not initialized.
    #[error("identity not initialized")]
    IdentityNotInitialized,

    /// An identity already exists.
    #[error("identity already initialized")]
    AlreadyInitialized,

    /// Recipient identity hash was empty.
    #[error("recipient identity hash is empty")]
    EmptyRecipient,

    /// Attempted to open a thread with oneself.
    #[error("cannot connect to yourself")]
    SelfConnection,

    /// Message text was empty.
    #[error("message is empty")]
    EmptyMessage,

    /// No thread is open.
    #[error("no active thread")]
    NoActiveThread,

    /// Thread id is not of the form `hash:hash`.
    #[error("invalid thread id: {0}")]
    InvalidThreadId(String),
}

impl ClientError {
    /// Returns true for input errors rejected before any network call.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ClientError::IdentityNotInitialized
                | ClientError::AlreadyInitialized
                | ClientError::EmptyRecipient
                | ClientError::SelfConnection
                | ClientError::EmptyMessage
                | ClientError::NoActiveThread
                | ClientError::InvalidThreadId(_)
        )
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
