//! Bidirectional flows through an in-process page/host pair.

use std::sync::{Arc, Mutex};

use gangway_host::{connect, pump, HostOptions};
use gangway_page::FunctionProxy;
use gangway_wire::{InitData, INIT_FUNCTIONS, INIT_PLATFORM, INIT_REGISTERED_EVENT_IDS};
use serde_json::{json, Value};

#[test]
fn test_page_event_reaches_native_listeners() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let options = {
        let seen = Arc::clone(&seen);
        HostOptions::new()
            .with_native_integration_enabled(true)
            .with_event_listener("ui:ready", move |payload: &Value| {
                seen.lock().unwrap().push(payload.clone());
            })
    };
    let (page, _host, _deliveries) = connect(options);

    page.backend()
        .emit_event("ui:ready", json!({"width": 800}))
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![json!({"width": 800})]);
}

#[test]
fn test_host_event_reaches_page_listeners_when_pumped() {
    let (mut page, host, deliveries) = connect(HostOptions::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        page.backend_mut()
            .add_event_listener("transport:position", move |payload: &Value| {
                seen.lock().unwrap().push(payload.clone());
            });
    }

    host.bridge()
        .lock()
        .unwrap()
        .emit_event("transport:position", json!({"seconds": 1.5}))
        .unwrap();

    // Nothing lands until the embedder pumps the queue.
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(pump(&deliveries, page.backend_mut()), 1);
    assert_eq!(*seen.lock().unwrap(), vec![json!({"seconds": 1.5})]);
}

#[test]
fn test_queued_deliveries_arrive_in_emit_order() {
    let (mut page, host, deliveries) = connect(HostOptions::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        page.backend_mut().add_event_listener("tick", move |payload: &Value| {
            seen.lock().unwrap().push(payload.clone());
        });
    }

    {
        let bridge = host.bridge().lock().unwrap();
        for n in 0..3 {
            bridge.emit_event("tick", json!(n)).unwrap();
        }
    }

    assert_eq!(pump(&deliveries, page.backend_mut()), 3);
    assert_eq!(*seen.lock().unwrap(), vec![json!(0), json!(1), json!(2)]);
}

#[test]
fn test_native_function_round_trip() {
    let options = HostOptions::new()
        .with_native_integration_enabled(true)
        .with_native_function("add", |params: Vec<Value>, completion| {
            let sum: i64 = params.iter().filter_map(Value::as_i64).sum();
            completion.complete(json!(sum));
        });
    let (mut page, _host, deliveries) = connect(options);
    let proxy = FunctionProxy::install(page.backend_mut());

    let result = Arc::new(Mutex::new(None));
    {
        let result = Arc::clone(&result);
        proxy
            .call(page.backend(), "add", vec![json!(20), json!(22)], move |value| {
                *result.lock().unwrap() = Some(value);
            })
            .unwrap();
    }

    // The invoke ran synchronously; its completion is queued.
    assert_eq!(proxy.pending_calls(), 1);
    assert_eq!(pump(&deliveries, page.backend_mut()), 1);
    assert_eq!(*result.lock().unwrap(), Some(json!(42)));
    assert_eq!(proxy.pending_calls(), 0);
}

#[test]
fn test_calling_an_unregistered_function_leaves_the_call_pending() {
    let options = HostOptions::new().with_native_integration_enabled(true);
    let (mut page, _host, deliveries) = connect(options);
    let proxy = FunctionProxy::install(page.backend_mut());

    proxy
        .call(page.backend(), "missing", vec![], |_| {
            panic!("must never resolve");
        })
        .unwrap();

    assert_eq!(pump(&deliveries, page.backend_mut()), 0);
    assert_eq!(proxy.pending_calls(), 1);
}

#[test]
fn test_attached_page_sees_the_bridge_description() {
    let options = HostOptions::new()
        .with_native_integration_enabled(true)
        .with_native_function("getSampleRate", |_, completion| completion.complete(json!(48_000)))
        .with_event_listener("ui:ready", |_| {})
        .with_initialisation_data("accentColour", json!("#ff6600"));
    let (page, _host, _deliveries) = connect(options);

    let init = page.initialisation_data();
    assert_eq!(init.get(INIT_PLATFORM), Some(&[json!(std::env::consts::OS)][..]));
    assert_eq!(init.get(INIT_FUNCTIONS), Some(&[json!("getSampleRate")][..]));
    assert_eq!(init.get(INIT_REGISTERED_EVENT_IDS), Some(&[json!("ui:ready")][..]));
    assert_eq!(init.get("accentColour"), Some(&[json!("#ff6600")][..]));
}

#[test]
fn test_integration_disabled_by_default_keeps_the_page_dark() {
    let seen = Arc::new(Mutex::new(0));
    let options = {
        let seen = Arc::clone(&seen);
        HostOptions::new().with_event_listener("ui:ready", move |_| *seen.lock().unwrap() += 1)
    };
    let (page, _host, _deliveries) = connect(options);

    assert_eq!(page.initialisation_data(), &InitData::default());
    page.backend().emit_event("ui:ready", json!({})).unwrap();
    assert_eq!(*seen.lock().unwrap(), 0);
}

#[test]
fn test_bootstrap_flows_from_loopback_host_to_page() {
    let options = HostOptions::new();
    let (sink, _deliveries) = gangway_host::ChannelSink::unbounded();
    let bridge = options.build(Arc::new(sink));
    let host = Arc::new(
        gangway_host::LoopbackHost::new(bridge).with_platform_bootstrap("window.ready = true;"),
    );
    let mut page = gangway_page::Page::attached(host);

    let mut runs = Vec::new();
    page.run_platform_bootstrap(|source| runs.push(source.to_string()));
    page.run_platform_bootstrap(|source| runs.push(source.to_string()));

    assert_eq!(runs, vec!["window.ready = true;"]);
}
