//! Example: Wire a page to a host bridge in-process and exchange events.
//!
//! Run with: cargo run -p gangway-host --example loopback

use std::sync::{Arc, Mutex};

use gangway_host::{connect, pump, HostOptions};
use gangway_page::FunctionProxy;
use serde_json::{json, Value};

fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter("gangway_host=debug,gangway_page=debug")
        .init();

    println!("=== Loopback Bridge Example ===\n");

    // Declare what the host exposes to the page.
    let options = HostOptions::new()
        .with_native_integration_enabled(true)
        .with_event_listener("ui:ready", |payload: &Value| {
            println!("[host] page is ready: {payload}");
        })
        .with_native_function("multiply", |params: Vec<Value>, completion| {
            let product: f64 = params.iter().filter_map(Value::as_f64).product();
            completion.complete(json!(product));
        })
        .with_initialisation_data("accentColour", json!("#ff6600"));

    let (mut page, host, deliveries) = connect(options);
    println!(
        "[page] initialisation data: {}",
        serde_json::to_string_pretty(page.initialisation_data())?
    );

    // Page side: listen for host-originated events.
    page.backend_mut()
        .add_event_listener("transport:position", |payload: &Value| {
            println!("[page] transport moved: {payload}");
        });

    // Page side: announce readiness and call a native function.
    page.backend()
        .emit_event("ui:ready", json!({"width": 800, "height": 600}))?;

    let proxy = FunctionProxy::install(page.backend_mut());
    let answer = Arc::new(Mutex::new(None));
    {
        let answer = Arc::clone(&answer);
        proxy.call(page.backend(), "multiply", vec![json!(6), json!(7)], move |result| {
            *answer.lock().unwrap() = Some(result);
        })?;
    }

    // Host side: emit a couple of events toward the page.
    {
        let bridge = host.bridge().lock().unwrap();
        for seconds in [0.0, 1.5] {
            bridge.emit_event("transport:position", json!({"seconds": seconds}))?;
        }
    }

    // Deliver everything the host queued, completions included.
    let delivered = pump(&deliveries, page.backend_mut());
    println!("[page] pumped {delivered} deliveries");
    println!(
        "[page] multiply(6, 7) = {}",
        answer
            .lock()
            .unwrap()
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| "(no answer)".to_string())
    );

    println!("\nDone.");
    Ok(())
}
