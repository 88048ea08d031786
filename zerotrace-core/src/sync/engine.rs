// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync Engine
//!
//! Reconciles a session's conversation cache against the remote service.
//!
//! The engine itself is stateless apart from the per-thread in-flight guard;
//! all client state lives in the [`SessionContext`] handed to each call.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::fingerprint::MessageFingerprint;
use super::inflight::InFlightGuard;
use super::session::{ActiveThread, SessionContext};
use crate::error::{ClientError, ClientResult};
use crate::events::{EventDispatcher, NoticeLevel, SyncEvent};
use crate::gateway::{GatewayError, MessageSigner, RemoteGateway, StubSigner};
use crate::thread::{canonical_thread_id, normalize_thread_id, other_participant, short_hash};
use crate::types::{now_ms, Identity, Message, SendReceipt, SendRequest, StateRoot};

/// Result of a single `sync_messages` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The fetched history matches the last one seen. Nothing was touched.
    Unchanged,
    /// The history changed and was handed to the presenter.
    Changed { count: usize },
    /// A newer fetch for the same thread was issued while this one was in
    /// flight; its result was dropped.
    Superseded,
}

impl PollOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, PollOutcome::Changed { .. })
    }
}

/// Summary of a `sync_all` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Threads reported by the service.
    pub threads_seen: usize,
    /// Threads whose cached preview was inserted or refreshed.
    pub updated: usize,
    /// Threads whose remote preview was not newer than the cached one.
    pub unchanged: usize,
    /// Threads with no usable history.
    pub empty: usize,
    /// Threads whose read was overtaken by a newer fetch of the same thread.
    pub superseded: usize,
    /// Threads whose history could not be fetched: `(thread_id, error)`.
    pub failed: Vec<(String, String)>,
}

impl SyncReport {
    /// Returns true if every thread was fetched.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Conversation sync engine.
pub struct SyncEngine<G: RemoteGateway> {
    gateway: Arc<G>,
    events: Arc<EventDispatcher>,
    signer: Arc<dyn MessageSigner>,
    in_flight: InFlightGuard,
}

impl<G: RemoteGateway> SyncEngine<G> {
    /// Creates an engine that signs with [`StubSigner`].
    pub fn new(gateway: Arc<G>, events: Arc<EventDispatcher>) -> Self {
        SyncEngine {
            gateway,
            events,
            signer: Arc::new(StubSigner),
            in_flight: InFlightGuard::new(),
        }
    }

    /// Replaces the message signer.
    pub fn with_signer(mut self, signer: Arc<dyn MessageSigner>) -> Self {
        self.signer = signer;
        self
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn events(&self) -> &Arc<EventDispatcher> {
        &self.events
    }

    /// Returns true while a message fetch for `thread_id` is outstanding.
    pub fn is_in_flight(&self, thread_id: &str) -> bool {
        self.in_flight.is_in_flight(thread_id)
    }

    // ============================================================
    // Identity
    // ============================================================

    /// Creates an identity on the service, stores it and runs a full sync.
    pub async fn create_identity(&self, session: &SessionContext) -> ClientResult<Identity> {
        if session.has_identity() {
            return Err(ClientError::AlreadyInitialized);
        }

        let created = match self.gateway.create_identity().await {
            Ok(created) => created,
            Err(err) => return Err(self.report_failure("Identity creation failed", err)),
        };
        let identity = Identity::from(created);
        session.vault().save(&identity)?;
        session.set_identity(Some(identity.clone()));

        info!(identity = %short_hash(&identity.identity_hash), "identity created");
        self.events.dispatch(SyncEvent::IdentityChanged {
            identity: Some(identity.clone()),
        });
        self.events
            .notice(NoticeLevel::Success, "Identity created successfully");

        if let Err(err) = self.sync_all(session).await {
            warn!(error = %err, "initial sync failed");
        }
        Ok(identity)
    }

    /// Deletes the identity and every cached thread.
    pub fn reset_identity(&self, session: &SessionContext) -> ClientResult<()> {
        session.vault().reset()?;
        session.clear();
        self.in_flight.clear();

        info!("identity reset");
        self.events
            .dispatch(SyncEvent::IdentityChanged { identity: None });
        self.events.dispatch(SyncEvent::ConversationsChanged {
            threads: Vec::new(),
        });
        Ok(())
    }

    // ============================================================
    // Threads
    // ============================================================

    /// Starts (or resumes) a conversation with `recipient` and opens it.
    ///
    /// Returns the canonical thread id.
    pub async fn connect(&self, session: &SessionContext, recipient: &str) -> ClientResult<String> {
        let identity = session.require_identity()?;
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(ClientError::EmptyRecipient);
        }
        if recipient == identity.identity_hash {
            return Err(ClientError::SelfConnection);
        }

        let thread_id = canonical_thread_id(&identity.identity_hash, recipient);
        let added = session.with_conversations(|conversations| {
            let added = conversations.ensure(&thread_id, recipient, now_ms());
            if added {
                conversations.persist()?;
            }
            Ok::<_, ClientError>(added)
        })?;
        if added {
            debug!(thread_id = %thread_id, "placeholder thread created");
            self.events.dispatch(SyncEvent::ConversationsChanged {
                threads: session.threads(),
            });
        }

        self.open_thread(session, &thread_id)?;
        self.events.notice(
            NoticeLevel::Success,
            format!("Connected to {}", short_hash(recipient)),
        );

        if let Err(err) = self.sync_messages(session, &thread_id).await {
            warn!(thread_id = %thread_id, error = %err, "failed to load messages");
        }
        Ok(thread_id)
    }

    /// Makes `thread_id` the active thread.
    ///
    /// The thread's last fingerprint is forgotten so the next poll renders
    /// its history even if nothing changed remotely.
    pub fn open_thread(&self, session: &SessionContext, thread_id: &str) -> ClientResult<ActiveThread> {
        let identity = session.require_identity()?;
        let thread_id = normalize_thread_id(thread_id)
            .ok_or_else(|| ClientError::InvalidThreadId(thread_id.to_string()))?;
        let recipient_hash = match other_participant(&thread_id, &identity.identity_hash) {
            Some(other) if other != identity.identity_hash => other.to_string(),
            Some(_) => return Err(ClientError::SelfConnection),
            None => return Err(ClientError::InvalidThreadId(thread_id)),
        };

        session.forget_fingerprint(&thread_id);
        let active = ActiveThread {
            thread_id,
            recipient_hash,
        };
        session.set_active(Some(active.clone()));
        debug!(thread_id = %active.thread_id, "thread opened");
        Ok(active)
    }

    /// Clears the active thread.
    pub fn close_thread(&self, session: &SessionContext) {
        session.set_active(None);
    }

    // ============================================================
    // Reconciliation
    // ============================================================

    /// Reconciles every remote thread into the local cache.
    ///
    /// A failure to list threads aborts the pass without touching the
    /// cache. A failure to read one thread is logged and recorded in the
    /// report; the remaining threads are still applied.
    pub async fn sync_all(&self, session: &SessionContext) -> ClientResult<SyncReport> {
        let identity = session.require_identity()?;

        let remote = match self.gateway.list_threads(&identity.identity_hash).await {
            Ok(threads) => threads,
            Err(err) if err.is_no_data() => {
                debug!(error = %err, "thread list unusable, treating as empty");
                Vec::new()
            }
            Err(err) => return Err(self.report_failure("Sync failed", err)),
        };

        let gateway = &self.gateway;
        let in_flight = &self.in_flight;
        let fetches = remote.iter().map(move |descriptor| async move {
            let ticket = in_flight.begin(&descriptor.thread_id);
            let result = gateway.read_messages(&descriptor.thread_id).await;
            let current = in_flight.finish(&descriptor.thread_id, ticket);
            (descriptor, current.then_some(result))
        });
        let results = join_all(fetches).await;

        let mut report = SyncReport {
            threads_seen: remote.len(),
            ..SyncReport::default()
        };
        for (descriptor, result) in results {
            let Some(result) = result else {
                debug!(thread_id = %descriptor.thread_id, "read superseded, dropping result");
                report.superseded += 1;
                continue;
            };
            let messages = match result {
                Ok(messages) => messages,
                Err(err) if err.is_no_data() => {
                    debug!(thread_id = %descriptor.thread_id, error = %err, "unusable history");
                    Vec::new()
                }
                Err(err) => {
                    warn!(thread_id = %descriptor.thread_id, error = %err, "thread sync failed");
                    report
                        .failed
                        .push((descriptor.thread_id.clone(), err.to_string()));
                    continue;
                }
            };

            let Some(last) = messages.last() else {
                report.empty += 1;
                continue;
            };
            let outcome = session.with_conversations(|conversations| {
                conversations.upsert(
                    &descriptor.thread_id,
                    &descriptor.other_identity_hash,
                    &last.text,
                    last.timestamp_ms(),
                )
            });
            if outcome.is_mutation() {
                report.updated += 1;
            } else {
                report.unchanged += 1;
            }
        }

        session.with_conversations(|conversations| conversations.persist())?;
        self.events.dispatch(SyncEvent::ConversationsChanged {
            threads: session.threads(),
        });
        info!(
            threads = report.threads_seen,
            updated = report.updated,
            failed = report.failed.len(),
            "sync complete"
        );

        if let Some(active) = session.active_thread() {
            if let Err(err) = self.sync_messages(session, &active.thread_id).await {
                warn!(thread_id = %active.thread_id, error = %err, "active thread sync failed");
            }
        }

        Ok(report)
    }

    /// Fetches a thread's history and hands it to the presenter if it
    /// differs from the last one seen.
    pub async fn sync_messages(
        &self,
        session: &SessionContext,
        thread_id: &str,
    ) -> ClientResult<PollOutcome> {
        let ticket = self.in_flight.begin(thread_id);
        let fetched = self.gateway.read_messages(thread_id).await;
        if !self.in_flight.finish(thread_id, ticket) {
            debug!(thread_id = %thread_id, "fetch superseded, dropping result");
            return Ok(PollOutcome::Superseded);
        }

        let messages = match fetched {
            Ok(messages) => messages,
            Err(err) if err.is_no_data() => {
                debug!(thread_id = %thread_id, error = %err, "unusable history");
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };

        if !session.remember_fingerprint(thread_id, MessageFingerprint::of(&messages)) {
            debug!(thread_id = %thread_id, "no new messages");
            return Ok(PollOutcome::Unchanged);
        }

        if let Some(last) = messages.last() {
            // The history was not delivered, so the next poll must see it as new.
            if let Err(err) = self.apply_preview(session, thread_id, last) {
                session.forget_fingerprint(thread_id);
                return Err(err);
            }
        }

        let count = messages.len();
        self.events.dispatch(SyncEvent::MessagesChanged {
            thread_id: thread_id.to_string(),
            messages,
        });
        Ok(PollOutcome::Changed { count })
    }

    /// Sends `text` on a thread.
    ///
    /// The cached preview is updated before the network call and is left in
    /// place if the call fails.
    pub async fn sync_on_send(
        &self,
        session: &SessionContext,
        thread_id: &str,
        recipient_hash: &str,
        text: &str,
    ) -> ClientResult<SendReceipt> {
        let identity = session.require_identity()?;
        if text.trim().is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        session.with_conversations(|conversations| {
            conversations.upsert(thread_id, recipient_hash, text, now_ms());
            conversations.persist()
        })?;
        self.events.dispatch(SyncEvent::ConversationsChanged {
            threads: session.threads(),
        });

        let request = SendRequest {
            thread_id: thread_id.to_string(),
            recipient_id: recipient_hash.to_string(),
            plaintext: text.to_string(),
            sender_identity_hash: identity.identity_hash.clone(),
            sender_signature: self
                .signer
                .sign(&identity.identity_hash, thread_id, text),
        };
        let receipt = match self.gateway.send_message(&request).await {
            Ok(receipt) => receipt,
            Err(err) => return Err(self.report_failure("Send failed", err)),
        };

        info!(thread_id = %thread_id, message_id = receipt.message_id, "message sent");
        self.events.dispatch(SyncEvent::MessageSent {
            thread_id: thread_id.to_string(),
            cstate_root: receipt.cstate_root.clone(),
        });

        if let Err(err) = self.sync_messages(session, thread_id).await {
            warn!(thread_id = %thread_id, error = %err, "post-send sync failed");
        }
        Ok(receipt)
    }

    /// Sends `text` on the active thread.
    pub async fn send_message(&self, session: &SessionContext, text: &str) -> ClientResult<SendReceipt> {
        session.require_identity()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::EmptyMessage);
        }
        let active = session.active_thread().ok_or(ClientError::NoActiveThread)?;
        self.sync_on_send(session, &active.thread_id, &active.recipient_hash, text)
            .await
    }

    /// Queries the identity's state root.
    pub async fn state_root(&self, session: &SessionContext) -> ClientResult<StateRoot> {
        let identity = session.require_identity()?;
        let root = match self.gateway.get_state_root(&identity.identity_hash).await {
            Ok(root) => root,
            Err(err) => return Err(self.report_failure("State root query failed", err)),
        };
        self.events.dispatch(SyncEvent::StateRootChanged {
            cstate_root: root.cstate_root.clone(),
            status: root.status(),
        });
        Ok(root)
    }

    // ============================================================
    // Helpers
    // ============================================================

    fn apply_preview(
        &self,
        session: &SessionContext,
        thread_id: &str,
        last: &Message,
    ) -> ClientResult<()> {
        let recipient = session.thread(thread_id).map(|t| t.recipient_hash).or_else(|| {
            session.identity().and_then(|identity| {
                other_participant(thread_id, &identity.identity_hash).map(str::to_string)
            })
        });
        let Some(recipient) = recipient else {
            debug!(thread_id = %thread_id, "thread does not involve this identity");
            return Ok(());
        };

        let mutated = session.with_conversations(|conversations| {
            let outcome =
                conversations.upsert(thread_id, &recipient, &last.text, last.timestamp_ms());
            if outcome.is_mutation() {
                conversations.persist()?;
            }
            Ok::<_, ClientError>(outcome.is_mutation())
        })?;
        if mutated {
            self.events.dispatch(SyncEvent::ConversationsChanged {
                threads: session.threads(),
            });
        }
        Ok(())
    }

    /// Logs a top-level failure, notifies the user and converts the error.
    fn report_failure(&self, context: &str, err: GatewayError) -> ClientError {
        warn!(error = %err, "{}", context);
        self.events
            .notice(NoticeLevel::Error, format!("{}: {}", context, err));
        err.into()
    }
}
