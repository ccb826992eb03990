//! Calling host-registered native functions from page code.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use gangway_wire::{InvokeCompletion, InvokeRequest, COMPLETE_EVENT_ID, INVOKE_EVENT_ID};
use serde_json::Value;

use crate::backend::Backend;
use crate::error::Result;
use crate::registry::Subscription;

/// One-shot callback receiving a native function's result.
pub type ResultCallback = Box<dyn FnOnce(Value) + Send>;

#[derive(Default)]
struct PendingCalls {
    next_id: u64,
    waiting: BTreeMap<u64, ResultCallback>,
}

/// Page-side proxy for the host's named native functions.
///
/// A call travels to the host as an [`INVOKE_EVENT_ID`] event carrying
/// the function name, its parameters and a fresh result id; the host
/// answers with a [`COMPLETE_EVENT_ID`] event that resolves the matching
/// pending entry. Completions that match nothing, or that cannot be
/// decoded, are logged and dropped.
pub struct FunctionProxy {
    pending: Arc<Mutex<PendingCalls>>,
    subscription: Subscription,
}

impl FunctionProxy {
    /// Register the completion listener on `backend` and return the
    /// proxy. One proxy per backend is the intended shape.
    pub fn install(backend: &mut Backend) -> Self {
        let pending = Arc::new(Mutex::new(PendingCalls::default()));
        let table = Arc::clone(&pending);
        let subscription = backend.add_event_listener(COMPLETE_EVENT_ID, move |payload: &Value| {
            resolve(&table, payload);
        });
        Self {
            pending,
            subscription,
        }
    }

    /// Invoke the host function `name` with `params`. `on_result` runs
    /// when, and only if, the host completes the call; an unanswered
    /// call stays pending for the life of the proxy.
    pub fn call<F>(&self, backend: &Backend, name: &str, params: Vec<Value>, on_result: F) -> Result<()>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        let result_id = {
            let mut pending = self.pending.lock().unwrap();
            let id = pending.next_id;
            pending.next_id += 1;
            pending.waiting.insert(id, Box::new(on_result));
            id
        };

        // Parked before emitting so a host that completes synchronously
        // still finds the entry.
        let request = InvokeRequest {
            name: name.to_string(),
            params,
            result_id,
        };
        tracing::trace!(function = name, result_id, "Invoking native function");
        if let Err(error) = backend.emit_event(INVOKE_EVENT_ID, &request) {
            self.pending.lock().unwrap().waiting.remove(&result_id);
            return Err(error);
        }
        Ok(())
    }

    /// Number of calls still waiting on a completion.
    pub fn pending_calls(&self) -> usize {
        self.pending.lock().unwrap().waiting.len()
    }

    /// The completion subscription, should an embedder want to retire
    /// the proxy before its backend goes away.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

fn resolve(pending: &Mutex<PendingCalls>, payload: &Value) {
    let completion: InvokeCompletion = match serde_json::from_value(payload.clone()) {
        Ok(completion) => completion,
        Err(error) => {
            tracing::warn!(%error, "Ignoring undecodable completion");
            return;
        }
    };

    let callback = pending.lock().unwrap().waiting.remove(&completion.result_id);
    match callback {
        Some(callback) => callback(completion.result),
        None => {
            tracing::debug!(result_id = completion.result_id, "Ignoring completion for unknown call");
        }
    }
}
