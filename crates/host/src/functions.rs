//! Native functions exposed to page code by name.

use std::sync::Arc;

use gangway_wire::{InvokeCompletion, COMPLETE_EVENT_ID};
use serde_json::Value;

use crate::sink::PageSink;

/// Host-side function callable from the page. Receives the call's
/// parameters and a one-shot [`Completion`] to answer with.
pub type NativeFunction = Box<dyn FnMut(Vec<Value>, Completion) + Send>;

/// Reply handle for one invocation.
///
/// Consuming it sends the result back to the page tagged with the
/// call's result id; dropping it without completing leaves the page's
/// call pending forever, which mirrors a host that never answers.
pub struct Completion {
    result_id: u64,
    sink: Arc<dyn PageSink>,
}

impl Completion {
    pub(crate) fn new(result_id: u64, sink: Arc<dyn PageSink>) -> Self {
        Self { result_id, sink }
    }

    /// The id the page assigned to this call.
    pub fn result_id(&self) -> u64 {
        self.result_id
    }

    /// Send `result` back to the page and consume the handle.
    pub fn complete(self, result: Value) {
        let completion = InvokeCompletion {
            result_id: self.result_id,
            result,
        };
        let payload = match serde_json::to_value(&completion) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::error!(%error, result_id = self.result_id, "Dropping unserializable completion");
                return;
            }
        };
        self.sink.emit_to_page(&COMPLETE_EVENT_ID.into(), &payload);
    }
}
