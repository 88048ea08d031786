//! Event System
//!
//! Presenter callbacks for sync results.

use std::sync::Arc;

use crate::types::{Identity, Message, StateStatus, Thread};

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Events emitted by the sync engine.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// The local identity was created or reset.
    IdentityChanged {
        /// The new identity, `None` after a reset.
        identity: Option<Identity>,
    },

    /// The conversation list changed and should be re-rendered.
    ConversationsChanged {
        /// All threads, newest first.
        threads: Vec<Thread>,
    },

    /// The message list of a thread changed.
    MessagesChanged {
        /// The thread ID.
        thread_id: String,
        /// Full history, oldest first.
        messages: Vec<Message>,
    },

    /// A message was accepted by the service.
    MessageSent {
        /// The thread ID.
        thread_id: String,
        /// State root reported with the receipt.
        cstate_root: Option<String>,
    },

    /// The identity's state root was queried.
    StateRootChanged {
        cstate_root: String,
        status: StateStatus,
    },

    /// Notification to show to the user.
    Notice {
        level: NoticeLevel,
        message: String,
    },
}

/// Presenter side of the engine.
///
/// Handlers are invoked synchronously from the engine task, so rendering
/// must not block on the engine.
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: SyncEvent);
}

/// Presenter backed by a closure.
pub struct CallbackHandler<F>
where
    F: Fn(SyncEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(SyncEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        CallbackHandler { callback }
    }
}

impl<F> EventHandler for CallbackHandler<F>
where
    F: Fn(SyncEvent) + Send + Sync,
{
    fn on_event(&self, event: SyncEvent) {
        (self.callback)(event);
    }
}

/// Fans sync events out to every registered presenter.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        EventDispatcher {
            handlers: Vec::new(),
        }
    }

    /// Registers a presenter. Registration happens before the engine is
    /// shared, so the list is fixed afterwards.
    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Delivers `event` to each presenter in registration order.
    pub fn dispatch(&self, event: SyncEvent) {
        let Some((last, rest)) = self.handlers.split_last() else {
            return;
        };
        for handler in rest {
            handler.on_event(event.clone());
        }
        last.on_event(event);
    }

    pub(crate) fn notice(&self, level: NoticeLevel, message: impl Into<String>) {
        self.dispatch(SyncEvent::Notice {
            level,
            message: message.into(),
        });
    }
}
