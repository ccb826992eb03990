//! Callback storage for a single event id.

use std::collections::BTreeMap;

use serde_json::Value;

/// Callback registered for an event id. Receives the deserialized
/// payload and may hold mutable state of its own.
pub type EventCallback = Box<dyn FnMut(&Value) + Send>;

/// Identity of one registered listener.
///
/// Identities are issued in registration order and are never reused,
/// even after the listener they name has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Zero-based position in the issue sequence of the owning list.
    pub fn index(self) -> u64 {
        self.0
    }
}

/// Owns the callbacks registered for one logical event id.
///
/// Iteration order is id order, which equals registration order because
/// ids are issued monotonically.
#[derive(Default)]
pub struct ListenerList {
    listeners: BTreeMap<ListenerId, EventCallback>,
    next_id: u64,
}

impl ListenerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `callback` under a fresh identity and return that identity.
    pub fn add_listener<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&Value) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, Box::new(callback));
        id
    }

    /// Drop the callback stored under `id`. Unknown identities are
    /// ignored; either way `id` stays retired and is not issued again.
    pub fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    /// Invoke every stored callback with `payload`, in registration
    /// order.
    ///
    /// Callbacks are not isolated from each other: a panic propagates to
    /// the caller and the rest of this pass does not run.
    pub fn call_listeners(&mut self, payload: &Value) {
        for callback in self.listeners.values_mut() {
            callback(payload);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
