// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock gateway for testing.
//!
//! Keeps messages per thread in memory and answers like the service: thread
//! lists are derived from the stored threads, sends append a message with a
//! monotonically increasing timestamp. Failures and delays can be scripted
//! per thread.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{GatewayError, GatewayResult, RemoteGateway};
use crate::thread::thread_participants;
use crate::types::{
    CreatedIdentity, Message, RemoteThread, SendReceipt, SendRequest, StateRoot,
    EMPTY_STATE_ROOT,
};

#[derive(Default)]
struct MockState {
    messages: HashMap<String, Vec<Message>>,
    state_roots: HashMap<String, String>,
    failing_threads: HashSet<String>,
    malformed_threads: HashSet<String>,
    read_delays: HashMap<String, VecDeque<Duration>>,
    fail_list: bool,
    fail_send: bool,
    next_identity: u64,
    clock: u64,
    list_calls: usize,
    read_calls: HashMap<String, usize>,
    sent: Vec<SendRequest>,
}

/// In-process [`RemoteGateway`] with scriptable behavior.
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    /// Creates an empty service whose clock starts at 1_700_000_000 seconds.
    pub fn new() -> Self {
        MockGateway {
            state: Mutex::new(MockState {
                clock: 1_700_000_000,
                ..MockState::default()
            }),
        }
    }

    /// Appends a message to a thread as if another client had sent it.
    pub fn push_message(&self, thread_id: &str, sender: &str, text: &str, timestamp: u64) {
        let mut state = self.state.lock();
        state.clock = state.clock.max(timestamp);
        state
            .messages
            .entry(thread_id.to_string())
            .or_default()
            .push(Message {
                sender: sender.to_string(),
                text: text.to_string(),
                timestamp,
                proof_present: true,
                commitment: None,
            });
    }

    /// Replaces a thread's history.
    pub fn set_messages(&self, thread_id: &str, messages: Vec<Message>) {
        self.state
            .lock()
            .messages
            .insert(thread_id.to_string(), messages);
    }

    /// Makes reads of `thread_id` fail with a network error.
    pub fn fail_thread(&self, thread_id: &str) {
        self.state
            .lock()
            .failing_threads
            .insert(thread_id.to_string());
    }

    /// Makes reads of `thread_id` return an undecodable body.
    pub fn malform_thread(&self, thread_id: &str) {
        self.state
            .lock()
            .malformed_threads
            .insert(thread_id.to_string());
    }

    /// Restores normal reads for `thread_id`.
    pub fn heal_thread(&self, thread_id: &str) {
        let mut state = self.state.lock();
        state.failing_threads.remove(thread_id);
        state.malformed_threads.remove(thread_id);
    }

    /// Delays the next read of `thread_id` by `delay`. Delays queue up per call.
    pub fn delay_next_read(&self, thread_id: &str, delay: Duration) {
        self.state
            .lock()
            .read_delays
            .entry(thread_id.to_string())
            .or_default()
            .push_back(delay);
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.state.lock().fail_list = fail;
    }

    pub fn set_fail_send(&self, fail: bool) {
        self.state.lock().fail_send = fail;
    }

    pub fn set_state_root(&self, identity_hash: &str, root: &str) {
        self.state
            .lock()
            .state_roots
            .insert(identity_hash.to_string(), root.to_string());
    }

    /// Number of `list_threads` calls served.
    pub fn list_calls(&self) -> usize {
        self.state.lock().list_calls
    }

    /// Number of `read_messages` calls served for a thread.
    pub fn read_calls(&self, thread_id: &str) -> usize {
        self.state
            .lock()
            .read_calls
            .get(thread_id)
            .copied()
            .unwrap_or(0)
    }

    /// Send requests received so far.
    pub fn sent(&self) -> Vec<SendRequest> {
        self.state.lock().sent.clone()
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn create_identity(&self) -> GatewayResult<CreatedIdentity> {
        let mut state = self.state.lock();
        state.next_identity += 1;
        let n = state.next_identity;
        Ok(CreatedIdentity {
            identity_hash: format!("{:064x}", n),
            public_key: format!("{:064x}", n.wrapping_mul(0x9e37_79b9)),
        })
    }

    async fn list_threads(&self, identity_hash: &str) -> GatewayResult<Vec<RemoteThread>> {
        let mut state = self.state.lock();
        state.list_calls += 1;
        if state.fail_list {
            return Err(GatewayError::Network("connection refused".into()));
        }

        let mut threads: Vec<RemoteThread> = state
            .messages
            .iter()
            .filter(|(_, messages)| !messages.is_empty())
            .filter_map(|(thread_id, messages)| {
                let (first, second) = thread_participants(thread_id)?;
                let other = if first == identity_hash {
                    second
                } else if second == identity_hash {
                    first
                } else {
                    return None;
                };
                Some(RemoteThread {
                    thread_id: thread_id.clone(),
                    other_identity_hash: other.to_string(),
                    last_message_time: messages.last().map(|m| m.timestamp).unwrap_or(0),
                    message_count: messages.len(),
                })
            })
            .collect();
        threads.sort_by(|a, b| a.thread_id.cmp(&b.thread_id));
        Ok(threads)
    }

    async fn read_messages(&self, thread_id: &str) -> GatewayResult<Vec<Message>> {
        let delay = {
            let mut state = self.state.lock();
            *state.read_calls.entry(thread_id.to_string()).or_default() += 1;
            state
                .read_delays
                .get_mut(thread_id)
                .and_then(|queue| queue.pop_front())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock();
        if state.failing_threads.contains(thread_id) {
            return Err(GatewayError::Network(format!("timeout reading {}", thread_id)));
        }
        if state.malformed_threads.contains(thread_id) {
            return Err(GatewayError::Malformed("expected value at line 1 column 1".into()));
        }
        Ok(state.messages.get(thread_id).cloned().unwrap_or_default())
    }

    async fn send_message(&self, request: &SendRequest) -> GatewayResult<SendReceipt> {
        let mut state = self.state.lock();
        if state.fail_send {
            return Err(GatewayError::Network("connection reset".into()));
        }
        state.clock += 1;
        let timestamp = state.clock;
        state.sent.push(request.clone());
        state
            .messages
            .entry(request.thread_id.clone())
            .or_default()
            .push(Message {
                sender: request.sender_identity_hash.clone(),
                text: request.plaintext.clone(),
                timestamp,
                proof_present: true,
                commitment: None,
            });
        let root = format!("{:064x}", timestamp);
        state
            .state_roots
            .insert(request.sender_identity_hash.clone(), root.clone());
        Ok(SendReceipt {
            status: "sent".into(),
            thread_id: request.thread_id.clone(),
            message_id: timestamp,
            cstate_root: Some(root),
            proof_verified: true,
        })
    }

    async fn get_state_root(&self, identity_hash: &str) -> GatewayResult<StateRoot> {
        let state = self.state.lock();
        let cstate_root = state
            .state_roots
            .get(identity_hash)
            .cloned()
            .unwrap_or_else(|| EMPTY_STATE_ROOT.to_string());
        let thread_count = state
            .messages
            .keys()
            .filter(|id| {
                thread_participants(id)
                    .map(|(a, b)| a == identity_hash || b == identity_hash)
                    .unwrap_or(false)
            })
            .count();
        Ok(StateRoot {
            cstate_root,
            thread_count,
            thread_roots: Vec::new(),
        })
    }
}
