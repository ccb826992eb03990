//! The host's gateway to its page.

use std::collections::BTreeMap;
use std::sync::Arc;

use gangway_wire::{
    Envelope, EventId, InitData, InvokeRequest, INIT_FUNCTIONS, INIT_PLATFORM,
    INIT_REGISTERED_EVENT_IDS, INVOKE_EVENT_ID,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{HostError, Result};
use crate::functions::{Completion, NativeFunction};
use crate::options::{HostOptions, NativeEventCallback};
use crate::sink::PageSink;

/// Native end of the bridge: routes page-originated traffic to native
/// listeners and functions, and emits host-originated events through a
/// [`PageSink`].
///
/// Everything it exposes was declared up front on [`HostOptions`]; the
/// routing tables do not change after construction.
pub struct HostBridge {
    listeners: BTreeMap<EventId, Vec<NativeEventCallback>>,
    functions: BTreeMap<String, NativeFunction>,
    init_entries: Vec<(String, Value)>,
    user_scripts: Vec<String>,
    native_integration: bool,
    sink: Arc<dyn PageSink>,
}

impl HostBridge {
    pub(crate) fn from_options(options: HostOptions, sink: Arc<dyn PageSink>) -> Self {
        let mut listeners: BTreeMap<EventId, Vec<NativeEventCallback>> = BTreeMap::new();
        for (event_id, callback) in options.event_listeners {
            listeners.entry(event_id).or_default().push(callback);
        }

        let mut functions = BTreeMap::new();
        for (name, function) in options.functions {
            // First registration wins on a duplicate name.
            functions.entry(name).or_insert(function);
        }

        Self {
            listeners,
            functions,
            init_entries: options.init_entries,
            user_scripts: options.user_scripts,
            native_integration: options.native_integration,
            sink,
        }
    }

    /// Handle one raw message posted by the page.
    ///
    /// Invocation envelopes are routed to the named native function;
    /// everything else fans out to the event listeners registered for
    /// its id, or is dropped silently when there are none. With native
    /// integration disabled the envelope is still parsed but nothing is
    /// routed.
    pub fn handle_message(&mut self, raw: &str) -> Result<()> {
        let envelope = Envelope::from_text(raw).map_err(HostError::MalformedEnvelope)?;
        if !self.native_integration {
            tracing::debug!(event_id = %envelope.event_id, "Native integration disabled, dropping page message");
            return Ok(());
        }
        if envelope.event_id.as_str() == INVOKE_EVENT_ID {
            return self.handle_invoke(envelope.payload);
        }
        self.dispatch_event(&envelope.event_id, &envelope.payload);
        Ok(())
    }

    fn handle_invoke(&mut self, payload: Value) -> Result<()> {
        let request: InvokeRequest =
            serde_json::from_value(payload).map_err(HostError::MalformedInvoke)?;
        let function = self
            .functions
            .get_mut(&request.name)
            .ok_or_else(|| HostError::UnknownFunction(request.name.clone()))?;

        tracing::debug!(function = %request.name, result_id = request.result_id, "Invoking native function");
        let completion = Completion::new(request.result_id, Arc::clone(&self.sink));
        function(request.params, completion);
        Ok(())
    }

    fn dispatch_event(&mut self, event_id: &EventId, payload: &Value) {
        match self.listeners.get_mut(event_id) {
            Some(callbacks) => {
                tracing::trace!(event_id = %event_id, listeners = callbacks.len(), "Dispatching page event");
                for callback in callbacks {
                    callback(payload);
                }
            }
            None => tracing::trace!(event_id = %event_id, "No native listeners, dropping page event"),
        }
    }

    /// Send a host-originated event to the page.
    ///
    /// Fire-and-forget through the sink; a successful return means the
    /// event was handed over, not that the page consumed it.
    pub fn emit_event(&self, event_id: impl Into<EventId>, payload: impl Serialize) -> Result<()> {
        let event_id = event_id.into();
        let payload = serde_json::to_value(payload).map_err(HostError::Serialize)?;
        tracing::trace!(event_id = %event_id, "Emitting event to page");
        self.sink.emit_to_page(&event_id, &payload);
        Ok(())
    }

    /// Assemble the initialisation data describing this bridge: the
    /// platform name, every registered function name, every listened-on
    /// event id, and the entries accumulated on the options.
    ///
    /// With native integration disabled this is the default structure,
    /// so an attached page learns nothing about the native side.
    pub fn initialisation_data(&self) -> InitData {
        if !self.native_integration {
            return InitData::default();
        }
        let mut init = InitData::new();
        init.push(INIT_PLATFORM, json!(std::env::consts::OS));
        for name in self.functions.keys() {
            init.push(INIT_FUNCTIONS, json!(name));
        }
        for event_id in self.listeners.keys() {
            init.push(INIT_REGISTERED_EVENT_IDS, json!(event_id.as_str()));
        }
        for (name, value) in &self.init_entries {
            init.push(name, value.clone());
        }
        init
    }

    /// Scripts the embedder evaluates in the page before page scripts.
    pub fn user_scripts(&self) -> &[String] {
        &self.user_scripts
    }

    /// Whether the page is allowed to reach native code. Disabled
    /// bridges drop inbound traffic after parsing and describe
    /// themselves with empty initialisation data; outbound emission and
    /// user scripts are unaffected.
    pub fn native_integration_enabled(&self) -> bool {
        self.native_integration
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use gangway_wire::{InvokeCompletion, COMPLETE_EVENT_ID, INIT_SLIDERS};

    use crate::sink::RecordingSink;

    use super::*;

    fn enabled() -> HostOptions {
        HostOptions::new().with_native_integration_enabled(true)
    }

    fn invoke_envelope(name: &str, params: Vec<Value>, result_id: u64) -> String {
        let request = InvokeRequest {
            name: name.to_string(),
            params,
            result_id,
        };
        Envelope::new(INVOKE_EVENT_ID, serde_json::to_value(&request).unwrap())
            .to_text()
            .unwrap()
    }

    fn event_envelope(event_id: &str, payload: Value) -> String {
        Envelope::new(event_id, payload).to_text().unwrap()
    }

    #[test]
    fn test_page_events_fan_out_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bridge = {
            let first = Arc::clone(&log);
            let second = Arc::clone(&log);
            enabled()
                .with_event_listener("ui:ready", move |_| first.lock().unwrap().push("first"))
                .with_event_listener("ui:ready", move |_| second.lock().unwrap().push("second"))
                .build(Arc::new(RecordingSink::new()))
        };

        bridge.handle_message(&event_envelope("ui:ready", json!({}))).unwrap();
        // Unrelated ids leave these listeners untouched.
        bridge.handle_message(&event_envelope("ui:closed", json!({}))).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_unlistened_page_events_are_dropped() {
        let mut bridge = enabled().build(Arc::new(RecordingSink::new()));
        bridge.handle_message(&event_envelope("nobody:cares", json!(1))).unwrap();
    }

    #[test]
    fn test_malformed_envelopes_are_rejected() {
        let mut bridge = HostOptions::new().build(Arc::new(RecordingSink::new()));
        let result = bridge.handle_message("{truncated");
        assert!(matches!(result, Err(HostError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_invoking_runs_the_function_and_completes() {
        let sink = Arc::new(RecordingSink::new());
        let mut bridge = enabled()
            .with_native_function("add", |params: Vec<Value>, completion: Completion| {
                let sum: f64 = params.iter().filter_map(Value::as_f64).sum();
                completion.complete(json!(sum));
            })
            .build(Arc::clone(&sink) as Arc<dyn PageSink>);

        bridge
            .handle_message(&invoke_envelope("add", vec![json!(2), json!(3)], 11))
            .unwrap();

        let payloads = sink.payloads_for(COMPLETE_EVENT_ID);
        assert_eq!(payloads.len(), 1);
        let completion: InvokeCompletion = serde_json::from_value(payloads[0].clone()).unwrap();
        assert_eq!(completion.result_id, 11);
        assert_eq!(completion.result, json!(5.0));
    }

    #[test]
    fn test_unknown_function_is_an_error() {
        let mut bridge = enabled().build(Arc::new(RecordingSink::new()));
        let result = bridge.handle_message(&invoke_envelope("missing", vec![], 0));
        assert!(matches!(result, Err(HostError::UnknownFunction(name)) if name == "missing"));
    }

    #[test]
    fn test_malformed_invoke_payload_is_an_error() {
        let mut bridge = enabled()
            .with_native_function("noop", |_, _| {})
            .build(Arc::new(RecordingSink::new()));

        let raw = event_envelope(INVOKE_EVENT_ID, json!({"name": "noop"}));
        let result = bridge.handle_message(&raw);
        assert!(matches!(result, Err(HostError::MalformedInvoke(_))));
    }

    #[test]
    fn test_emit_event_reaches_the_sink() {
        let sink = Arc::new(RecordingSink::new());
        let bridge = HostOptions::new().build(Arc::clone(&sink) as Arc<dyn PageSink>);

        bridge.emit_event("status:changed", json!({"connected": true})).unwrap();

        assert_eq!(
            sink.payloads_for("status:changed"),
            vec![json!({"connected": true})]
        );
    }

    #[test]
    fn test_initialisation_data_describes_the_bridge() {
        let bridge = enabled()
            .with_native_function("getLayout", |_, _| {})
            .with_native_function("applyLayout", |_, _| {})
            .with_event_listener("ui:ready", |_| {})
            .with_initialisation_data("theme", json!("dark"))
            .with_initialisation_data("theme", json!("light"))
            .with_initialisation_data(INIT_SLIDERS, json!({"name": "gain"}))
            .build(Arc::new(RecordingSink::new()));

        let init = bridge.initialisation_data();
        assert_eq!(
            init.get(INIT_PLATFORM),
            Some(&[json!(std::env::consts::OS)][..])
        );
        // Function names are reported sorted.
        assert_eq!(
            init.get(INIT_FUNCTIONS),
            Some(&[json!("applyLayout"), json!("getLayout")][..])
        );
        assert_eq!(
            init.get(INIT_REGISTERED_EVENT_IDS),
            Some(&[json!("ui:ready")][..])
        );
        assert_eq!(
            init.get("theme"),
            Some(&[json!("dark"), json!("light")][..])
        );
        // Entries named after a well-known array land in that array.
        assert_eq!(
            init.get(INIT_SLIDERS),
            Some(&[json!({"name": "gain"})][..])
        );
    }

    #[test]
    fn test_user_scripts_accumulate_in_registration_order() {
        let bridge = HostOptions::new()
            .with_user_script("window.first = true;")
            .with_user_script("window.second = true;")
            .build(Arc::new(RecordingSink::new()));

        assert_eq!(
            bridge.user_scripts(),
            ["window.first = true;", "window.second = true;"]
        );
    }

    #[test]
    fn test_disabled_bridge_parses_but_routes_nothing() {
        let sink = Arc::new(RecordingSink::new());
        let hits = Arc::new(Mutex::new(0));
        let mut bridge = {
            let hits = Arc::clone(&hits);
            HostOptions::new()
                .with_event_listener("ui:ready", move |_| *hits.lock().unwrap() += 1)
                .with_native_function("ping", |_, completion: Completion| {
                    completion.complete(json!("pong"));
                })
                .build(Arc::clone(&sink) as Arc<dyn PageSink>)
        };

        bridge.handle_message(&event_envelope("ui:ready", json!({}))).unwrap();
        bridge.handle_message(&invoke_envelope("ping", vec![], 0)).unwrap();
        assert!(matches!(
            bridge.handle_message("{truncated"),
            Err(HostError::MalformedEnvelope(_))
        ));

        assert_eq!(*hits.lock().unwrap(), 0);
        assert!(sink.is_empty());
        assert_eq!(bridge.initialisation_data(), InitData::default());
        assert!(!bridge.native_integration_enabled());
    }

    #[test]
    fn test_duplicate_function_name_keeps_the_first() {
        let sink = Arc::new(RecordingSink::new());
        let mut options = enabled();
        options = options.with_native_function("pick", |_, completion: Completion| {
            completion.complete(json!("first"));
        });
        // Pushed through the raw field so the builder's debug assertion
        // does not trip before the resolution under test.
        options
            .functions
            .push(("pick".to_string(), Box::new(|_, completion: Completion| {
                completion.complete(json!("second"));
            })));
        let mut bridge = options.build(Arc::clone(&sink) as Arc<dyn PageSink>);

        bridge.handle_message(&invoke_envelope("pick", vec![], 0)).unwrap();

        let completion: InvokeCompletion =
            serde_json::from_value(sink.payloads_for(COMPLETE_EVENT_ID)[0].clone()).unwrap();
        assert_eq!(completion.result, json!("first"));
    }
}
