//! Change notification: a publish/subscribe map keyed by entity scope.
//!
//! Views subscribe to the scope they render (one pane, one tab, the tab
//! strip, or the clipboard) and receive events over unbounded channels; an
//! event is only delivered to subscribers of its own scope, never broadcast
//! globally.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::state::tabs::{PaneId, TabId};

/// What part of the state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    /// Tab list or active tab changed.
    Tabs,
    /// A tab's pane list, active pane, or split changed.
    Tab(TabId),
    /// A pane's own state changed (path, selection, sorting, status,
    /// contents, refresh key).
    Pane(TabId, PaneId),
    /// The shared clipboard changed.
    Clipboard,
}

/// Scope a subscriber listens on. Identical in shape to [`ChangeEvent`];
/// events are routed to the scope with the same key.
pub type Scope = ChangeEvent;

/// Shared subscription registry. Cloning is cheap and clones observe the
/// same subscriber map.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    subscribers: Arc<Mutex<HashMap<Scope, Vec<UnboundedSender<ChangeEvent>>>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for one scope. Dropping the receiver
    /// unsubscribes; dead senders are pruned on the next emit.
    pub fn subscribe(&self, scope: Scope) -> UnboundedReceiver<ChangeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .expect("notifier lock poisoned")
            .entry(scope)
            .or_default()
            .push(tx);
        rx
    }

    /// Deliver an event to the subscribers of its scope.
    pub fn emit(&self, event: ChangeEvent) {
        let mut subscribers = self.subscribers.lock().expect("notifier lock poisoned");
        if let Some(senders) = subscribers.get_mut(&event) {
            senders.retain(|tx| tx.send(event).is_ok());
            if senders.is_empty() {
                subscribers.remove(&event);
            }
        }
    }
}
