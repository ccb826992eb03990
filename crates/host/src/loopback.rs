//! In-process wiring of a page to a host bridge.

use std::sync::{Arc, Mutex};

use crossbeam_channel::Receiver;
use gangway_page::{Backend, HostObject, Page};
use gangway_wire::{EventId, InitData};

use crate::bridge::HostBridge;
use crate::options::HostOptions;
use crate::sink::ChannelSink;

/// Host object backed directly by a [`HostBridge`].
///
/// Page-originated messages are handled synchronously under the bridge
/// lock. Host-originated deliveries never re-enter the page from inside
/// that handling; they queue on the bridge's sink and reach the page
/// when the embedder pumps them.
pub struct LoopbackHost {
    bridge: Mutex<HostBridge>,
    bootstrap: Option<String>,
}

impl LoopbackHost {
    pub fn new(bridge: HostBridge) -> Self {
        Self {
            bridge: Mutex::new(bridge),
            bootstrap: None,
        }
    }

    /// Serve `source` as the platform bootstrap.
    pub fn with_platform_bootstrap(mut self, source: impl Into<String>) -> Self {
        self.bootstrap = Some(source.into());
        self
    }

    /// Direct access to the bridge, for emitting host-originated events
    /// or inspecting its configuration.
    pub fn bridge(&self) -> &Mutex<HostBridge> {
        &self.bridge
    }
}

impl HostObject for LoopbackHost {
    fn post_message(&self, raw: &str) {
        if let Err(error) = self.bridge.lock().unwrap().handle_message(raw) {
            tracing::warn!(%error, "Dropping page message");
        }
    }

    fn initialisation_data(&self) -> Option<InitData> {
        Some(self.bridge.lock().unwrap().initialisation_data())
    }

    fn platform_bootstrap(&self) -> Option<String> {
        self.bootstrap.clone()
    }
}

/// Drain every queued host→page delivery into `backend`. Returns how
/// many deliveries were handed over, malformed ones included.
pub fn pump(deliveries: &Receiver<(EventId, String)>, backend: &mut Backend) -> usize {
    let mut delivered = 0;
    while let Ok((event_id, raw_payload)) = deliveries.try_recv() {
        if let Err(error) = backend.emit_from_host(event_id.as_str(), &raw_payload) {
            tracing::warn!(%error, event_id = %event_id, "Dropping host delivery");
        }
        delivered += 1;
    }
    delivered
}

/// Wire a page and a freshly built bridge together in one process.
///
/// Returns the attached page, the shared loopback host, and the
/// receiver carrying queued host→page deliveries for [`pump`].
pub fn connect(options: HostOptions) -> (Page, Arc<LoopbackHost>, Receiver<(EventId, String)>) {
    let (sink, deliveries) = ChannelSink::unbounded();
    let bridge = options.build(Arc::new(sink));
    let host = Arc::new(LoopbackHost::new(bridge));
    let page = Page::attached(Arc::clone(&host) as Arc<dyn HostObject>);
    (page, host, deliveries)
}
