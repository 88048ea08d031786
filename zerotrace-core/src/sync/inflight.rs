//! Per-thread in-flight request tracking.
//!
//! Each fetch for a thread takes a ticket. Only the most recently issued
//! ticket of a thread may apply its result; anything older was superseded
//! while it was in flight and is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Ticket identifying one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Default)]
pub struct InFlightGuard {
    next: AtomicU64,
    latest: Mutex<HashMap<String, u64>>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new fetch for `thread_id`, superseding any in flight.
    pub fn begin(&self, thread_id: &str) -> Ticket {
        let ticket = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        self.latest.lock().insert(thread_id.to_string(), ticket);
        Ticket(ticket)
    }

    /// Completes a fetch. Returns true if its result may be applied.
    pub fn finish(&self, thread_id: &str, ticket: Ticket) -> bool {
        let mut latest = self.latest.lock();
        match latest.get(thread_id) {
            Some(&current) if current == ticket.0 => {
                latest.remove(thread_id);
                true
            }
            _ => false,
        }
    }

    /// Returns true if a fetch for `thread_id` is in flight.
    pub fn is_in_flight(&self, thread_id: &str) -> bool {
        self.latest.lock().contains_key(thread_id)
    }

    /// Forgets every in-flight fetch; their results will be dropped.
    pub fn clear(&self) {
        self.latest.lock().clear();
    }
}
