//! Declarative configuration of a host bridge.

use std::sync::Arc;

use gangway_wire::EventId;
use serde_json::Value;

use crate::bridge::HostBridge;
use crate::functions::{Completion, NativeFunction};
use crate::sink::PageSink;

/// Host-side callback for a page-originated event.
pub type NativeEventCallback = Box<dyn FnMut(&Value) + Send>;

/// Builder describing everything a host exposes to its page: event
/// listeners, named native functions, extra initialisation data and
/// user scripts.
///
/// Options accumulate; the same event id may gain several listeners and
/// the same initialisation name several values. Function names must be
/// unique.
#[derive(Default)]
pub struct HostOptions {
    pub(crate) event_listeners: Vec<(EventId, NativeEventCallback)>,
    pub(crate) functions: Vec<(String, NativeFunction)>,
    pub(crate) init_entries: Vec<(String, Value)>,
    pub(crate) user_scripts: Vec<String>,
    pub(crate) native_integration: bool,
}

impl HostOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow the page to reach native code at all. Off by default;
    /// embedders that leave it off should attach their page to a stub.
    pub fn with_native_integration_enabled(mut self, enabled: bool) -> Self {
        self.native_integration = enabled;
        self
    }

    /// Run `callback` whenever the page emits `event_id`. May be
    /// repeated for the same id; callbacks run in registration order.
    pub fn with_event_listener<F>(mut self, event_id: impl Into<EventId>, callback: F) -> Self
    where
        F: FnMut(&Value) + Send + 'static,
    {
        self.event_listeners.push((event_id.into(), Box::new(callback)));
        self
    }

    /// Expose `function` to the page under `name`. Names must be
    /// unique; a repeated name keeps the first registration.
    pub fn with_native_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: FnMut(Vec<Value>, Completion) + Send + 'static,
    {
        let name = name.into();
        debug_assert!(
            self.functions.iter().all(|(existing, _)| existing != &name),
            "native function `{name}` registered twice"
        );
        self.functions.push((name, Box::new(function)));
        self
    }

    /// Append `value` to the initialisation array named `name`.
    pub fn with_initialisation_data(mut self, name: impl Into<String>, value: Value) -> Self {
        self.init_entries.push((name.into(), value));
        self
    }

    /// Ship `script` to the page, to be evaluated before page scripts.
    pub fn with_user_script(mut self, script: impl Into<String>) -> Self {
        self.user_scripts.push(script.into());
        self
    }

    /// Finish the builder into a bridge that answers through `sink`.
    pub fn build(self, sink: Arc<dyn PageSink>) -> HostBridge {
        HostBridge::from_options(self, sink)
    }
}
