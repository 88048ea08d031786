// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote Gateway
//!
//! Abstraction over the messaging service operations the sync engine needs.
//!
//! # Architecture
//!
//! - **RemoteGateway trait**: the five remote operations, async
//! - **HttpGateway**: JSON over HTTP against the service
//! - **MockGateway**: scriptable in-process service for tests
//! - **MessageSigner**: supplies the sender signature of outgoing messages

mod error;
mod http;
mod mock;
mod signer;

use async_trait::async_trait;

use crate::types::{CreatedIdentity, Message, RemoteThread, SendReceipt, SendRequest, StateRoot};

pub use error::GatewayError;
pub use http::HttpGateway;
pub use mock::MockGateway;
pub use signer::{MessageSigner, StubSigner, STUB_SIGNATURE};

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Remote operations consumed by the sync engine.
///
/// Implementations must be cheap to share behind an `Arc`; every call is an
/// independent request.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Asks the service to mint a new identity.
    async fn create_identity(&self) -> GatewayResult<CreatedIdentity>;

    /// Lists the threads the identity participates in.
    async fn list_threads(&self, identity_hash: &str) -> GatewayResult<Vec<RemoteThread>>;

    /// Reads a thread's messages, oldest first.
    async fn read_messages(&self, thread_id: &str) -> GatewayResult<Vec<Message>>;

    /// Sends a message.
    async fn send_message(&self, request: &SendRequest) -> GatewayResult<SendReceipt>;

    /// Queries the committed state root of an identity.
    async fn get_state_root(&self, identity_hash: &str) -> GatewayResult<StateRoot>;
}
