// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Conversation Synchronization
//!
//! Keeps the local conversation cache consistent with the remote service.
//!
//! - [`SessionContext`]: per-client state passed into every operation
//! - [`SyncEngine`]: full reconciliation, per-thread polling and sends
//! - [`MessageFingerprint`]: content-based change detection
//! - [`InFlightGuard`]: drops results of superseded fetches

mod engine;
mod fingerprint;
mod inflight;
mod session;

pub use engine::{PollOutcome, SyncEngine, SyncReport};
pub use fingerprint::MessageFingerprint;
pub use inflight::{InFlightGuard, Ticket};
pub use session::{ActiveThread, SessionContext};
