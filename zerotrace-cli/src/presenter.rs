//! Terminal Presenter
//!
//! Prints sync events. Each view remembers the text it last printed and
//! stays silent when a new rendering is identical, so repeated polls of an
//! unchanged thread produce no output.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use zerotrace_core::{EventHandler, NoticeLevel, SyncEvent};

use crate::display;

/// Which views a command wants printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Views {
    pub conversations: bool,
    pub messages: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum View {
    Conversations,
    Messages(String),
}

pub struct TerminalPresenter {
    views: Views,
    own_hash: Mutex<Option<String>>,
    last_rendered: Mutex<HashMap<View, String>>,
    renders: AtomicUsize,
}

impl TerminalPresenter {
    pub fn new(views: Views, own_hash: Option<String>) -> Self {
        TerminalPresenter {
            views,
            own_hash: Mutex::new(own_hash),
            last_rendered: Mutex::new(HashMap::new()),
            renders: AtomicUsize::new(0),
        }
    }

    /// Number of views printed so far.
    #[cfg(test)]
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::Relaxed)
    }

    /// Prints `text` unless it matches what `view` printed last.
    fn present(&self, view: View, text: String) -> bool {
        {
            let mut last = self.last_rendered.lock();
            if last.get(&view) == Some(&text) {
                return false;
            }
            last.insert(view, text.clone());
        }
        self.renders.fetch_add(1, Ordering::Relaxed);
        print!("{}", text);
        true
    }
}

impl EventHandler for TerminalPresenter {
    fn on_event(&self, event: SyncEvent) {
        match event {
            SyncEvent::IdentityChanged { identity } => {
                *self.own_hash.lock() = identity.map(|i| i.identity_hash);
                self.last_rendered.lock().clear();
            }
            SyncEvent::ConversationsChanged { threads } if self.views.conversations => {
                self.present(View::Conversations, display::render_conversations(&threads));
            }
            SyncEvent::MessagesChanged {
                thread_id,
                messages,
            } if self.views.messages => {
                let own = self.own_hash.lock().clone();
                let text = display::render_messages(&messages, own.as_deref());
                self.present(View::Messages(thread_id), text);
            }
            SyncEvent::Notice { level, message } => match level {
                NoticeLevel::Success => display::success(&message),
                NoticeLevel::Error => display::error(&message),
            },
            _ => {}
        }
    }
}
