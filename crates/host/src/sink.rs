//! Where host-side code sends events bound for the page.

use std::sync::Mutex;

use crossbeam_channel::{Receiver, Sender};
use gangway_wire::EventId;
use serde_json::Value;

/// Outbound boundary of the host: one event in, nothing back.
///
/// Like the page's send primitive this is fire-and-forget; a sink may
/// queue, forward or discard, and the caller never learns which.
pub trait PageSink: Send + Sync {
    /// Queue one event for delivery into the page.
    fn emit_to_page(&self, event_id: &EventId, payload: &Value);
}

/// Sink that serializes each event and queues it on an unbounded
/// channel. The embedder drains the receiver and feeds deliveries into
/// the page on its own schedule.
pub struct ChannelSink {
    tx: Sender<(EventId, String)>,
}

impl ChannelSink {
    /// Create the sink and the receiver the embedder drains.
    pub fn unbounded() -> (Self, Receiver<(EventId, String)>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl PageSink for ChannelSink {
    fn emit_to_page(&self, event_id: &EventId, payload: &Value) {
        let raw = match serde_json::to_string(payload) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::error!(%error, event_id = %event_id, "Dropping unserializable payload");
                return;
            }
        };
        if self.tx.send((event_id.clone(), raw)).is_err() {
            tracing::debug!(event_id = %event_id, "Page channel closed, dropping event");
        }
    }
}

/// Sink that discards everything, for hosts running without a page.
pub struct NullSink;

impl PageSink for NullSink {
    fn emit_to_page(&self, event_id: &EventId, _payload: &Value) {
        tracing::trace!(event_id = %event_id, "No page attached, dropping event");
    }
}

/// Sink that captures events for inspection in tests.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(EventId, Value)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured events, oldest first.
    pub fn events(&self) -> Vec<(EventId, Value)> {
        self.events.lock().unwrap().clone()
    }

    /// Captured payloads for one event id, oldest first.
    pub fn payloads_for(&self, event_id: &str) -> Vec<Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id.as_str() == event_id)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl PageSink for RecordingSink {
    fn emit_to_page(&self, event_id: &EventId, payload: &Value) {
        self.events
            .lock()
            .unwrap()
            .push((event_id.clone(), payload.clone()));
    }
}
