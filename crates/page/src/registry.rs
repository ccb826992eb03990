//! Routing of registration and fan-out across event ids.

use std::collections::HashMap;

use gangway_wire::EventId;
use serde_json::Value;

use crate::listener::{ListenerId, ListenerList};

/// Handle returned from registration, and the only valid argument to
/// removal. Opaque to callers beyond the event id it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    event_id: EventId,
    listener: ListenerId,
}

impl Subscription {
    /// The event id this subscription listens on.
    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }
}

/// Maps event ids to their listener lists.
///
/// A list is created the first time a listener is added for an id and
/// persists for the lifetime of the registry, even once emptied, so the
/// id's identity sequence carries across remove/add cycles.
#[derive(Default)]
pub struct EventListenerList {
    event_listeners: HashMap<EventId, ListenerList>,
}

impl EventListenerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event_id` and return its removal handle.
    pub fn add_event_listener<F>(&mut self, event_id: impl Into<EventId>, callback: F) -> Subscription
    where
        F: FnMut(&Value) + Send + 'static,
    {
        let event_id = event_id.into();
        let listener = self
            .event_listeners
            .entry(event_id.clone())
            .or_default()
            .add_listener(callback);
        tracing::trace!(event_id = %event_id, listener = listener.index(), "Listener added");
        Subscription { event_id, listener }
    }

    /// Remove the listener named by `subscription`. Handles for ids this
    /// registry has never seen, or for listeners already removed, are
    /// ignored.
    pub fn remove_event_listener(&mut self, subscription: &Subscription) {
        if let Some(list) = self.event_listeners.get_mut(&subscription.event_id) {
            list.remove_listener(subscription.listener);
        }
    }

    /// Fan `payload` out to every listener registered for `event_id`,
    /// in registration order.
    ///
    /// An id nobody has ever listened on drops the event silently; there
    /// is no buffering and no "nobody listening" error.
    pub fn emit_event(&mut self, event_id: &str, payload: &Value) {
        match self.event_listeners.get_mut(event_id) {
            Some(list) => {
                tracing::trace!(event_id, listeners = list.len(), "Dispatching event");
                list.call_listeners(payload);
            }
            None => tracing::trace!(event_id, "No listeners registered, dropping event"),
        }
    }

    /// Live listener count for `event_id`, or `None` if no listener was
    /// ever added for it. `Some(0)` means the id's list exists but is
    /// currently empty.
    pub fn listener_count(&self, event_id: &str) -> Option<usize> {
        self.event_listeners.get(event_id).map(ListenerList::len)
    }
}
