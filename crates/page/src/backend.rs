//! The page's gateway to the host.

use std::sync::Arc;

use gangway_wire::{Envelope, EventId};
use serde::Serialize;
use serde_json::Value;

use crate::error::{BridgeError, Result};
use crate::registry::{EventListenerList, Subscription};
use crate::transport::HostObject;

/// Two-way gateway between page code and the embedding host.
///
/// Host-originated events arrive through [`Backend::emit_from_host`] and
/// fan out to registered listeners; page-originated events leave through
/// [`Backend::emit_event`] as serialized envelopes handed to the host.
/// The two directions never meet: emitting an event does not invoke
/// local listeners for the same id.
pub struct Backend {
    listeners: EventListenerList,
    host: Arc<dyn HostObject>,
}

impl Backend {
    /// Build a backend speaking to `host`.
    pub fn new(host: Arc<dyn HostObject>) -> Self {
        Self {
            listeners: EventListenerList::new(),
            host,
        }
    }

    /// Subscribe to host-originated events under `event_id`. This is the
    /// only way page code observes the host.
    pub fn add_event_listener<F>(&mut self, event_id: impl Into<EventId>, callback: F) -> Subscription
    where
        F: FnMut(&Value) + Send + 'static,
    {
        self.listeners.add_event_listener(event_id, callback)
    }

    /// Remove a previously registered listener. Stale handles are
    /// ignored.
    pub fn remove_event_listener(&mut self, subscription: &Subscription) {
        self.listeners.remove_event_listener(subscription);
    }

    /// Serialize `{eventId, payload}` and post it to the host.
    ///
    /// Fire-and-forget: a successful return means the envelope was
    /// handed to the host's send primitive, not that anything consumed
    /// it on the other side.
    pub fn emit_event(&self, event_id: impl Into<EventId>, payload: impl Serialize) -> Result<()> {
        let payload = serde_json::to_value(payload).map_err(BridgeError::Serialize)?;
        let envelope = Envelope::new(event_id, payload);
        let raw = envelope.to_text().map_err(BridgeError::Serialize)?;
        tracing::trace!(event_id = %envelope.event_id, "Posting event to host");
        self.host.post_message(&raw);
        Ok(())
    }

    /// Deliver a host-originated event: deserialize `raw_payload` and
    /// fan it out to every listener registered for `event_id`.
    ///
    /// Intended for the host's glue code, not for page code. A payload
    /// that is not valid JSON fails here, before any listener runs.
    pub fn emit_from_host(&mut self, event_id: &str, raw_payload: &str) -> Result<()> {
        let payload: Value =
            serde_json::from_str(raw_payload).map_err(BridgeError::MalformedPayload)?;
        self.listeners.emit_event(event_id, &payload);
        Ok(())
    }

    /// See [`EventListenerList::listener_count`].
    pub fn listener_count(&self, event_id: &str) -> Option<usize> {
        self.listeners.listener_count(event_id)
    }
}
