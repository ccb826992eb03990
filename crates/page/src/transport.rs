//! The host boundary and its in-process implementations.

use std::sync::Mutex;

use crossbeam_channel::{Receiver, Sender};
use gangway_wire::{Envelope, InitData};

/// The page's view of its embedding host.
///
/// `post_message` is the entire outbound surface: one serialized
/// envelope in, nothing back. Delivery is fire-and-forget with no
/// acknowledgment, so from the bridge's perspective every send is
/// at-most-once.
pub trait HostObject: Send + Sync {
    /// Hand one serialized envelope to the host.
    fn post_message(&self, raw: &str);

    /// Initialisation data the host injected for this page, if any.
    fn initialisation_data(&self) -> Option<InitData> {
        None
    }

    /// Platform-specific bootstrap source, for hosts that ship one.
    fn platform_bootstrap(&self) -> Option<String> {
        None
    }
}

/// Stand-in host installed when a page runs without a real one.
///
/// Outbound messages are discarded, so page code that emits events keeps
/// working unhosted instead of erroring at the boundary.
pub struct StubHost;

impl HostObject for StubHost {
    fn post_message(&self, _raw: &str) {
        tracing::debug!("No host attached, discarding outbound message");
    }
}

/// Host double that captures outbound traffic for inspection.
#[derive(Default)]
pub struct RecordingHost {
    messages: Mutex<Vec<String>>,
    init: Option<InitData>,
    bootstrap: Option<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `init` as this host's initialisation data.
    pub fn with_initialisation_data(mut self, init: InitData) -> Self {
        self.init = Some(init);
        self
    }

    /// Serve `source` as this host's platform bootstrap.
    pub fn with_platform_bootstrap(mut self, source: impl Into<String>) -> Self {
        self.bootstrap = Some(source.into());
        self
    }

    /// Raw messages captured so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Captured messages decoded back into envelopes.
    ///
    /// Panics on malformed capture content; this type exists for tests.
    pub fn envelopes(&self) -> Vec<Envelope> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|raw| Envelope::from_text(raw).expect("captured message is a valid envelope"))
            .collect()
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().unwrap().is_empty()
    }
}

impl HostObject for RecordingHost {
    fn post_message(&self, raw: &str) {
        self.messages.lock().unwrap().push(raw.to_string());
    }

    fn initialisation_data(&self) -> Option<InitData> {
        self.init.clone()
    }

    fn platform_bootstrap(&self) -> Option<String> {
        self.bootstrap.clone()
    }
}

/// Host backed by an unbounded channel, for embedders that drain
/// outbound traffic on another thread or a later turn.
pub struct ChannelHost {
    tx: Sender<String>,
}

impl ChannelHost {
    /// Create the host half and the receiver the embedder drains.
    pub fn unbounded() -> (Self, Receiver<String>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl HostObject for ChannelHost {
    fn post_message(&self, raw: &str) {
        if self.tx.send(raw.to_string()).is_err() {
            tracing::debug!("Host channel closed, discarding outbound message");
        }
    }
}
