//! Shared wire contracts for the page↔host event bridge.
//!
//! Everything that crosses the serialized boundary is defined here, so
//! both ends of the bridge compile against the same shapes. Field-name
//! drift between the two sides would otherwise only surface as runtime
//! deserialization failures.

mod init;

pub use init::{
    InitData, INIT_COMBO_BOXES, INIT_FUNCTIONS, INIT_PLATFORM, INIT_REGISTERED_EVENT_IDS,
    INIT_SLIDERS, INIT_TOGGLES,
};

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix marking event ids that belong to the bridge protocol itself.
///
/// Application code should not emit or listen on ids under this prefix;
/// they are routed by the bridge internals.
pub const RESERVED_PREFIX: &str = "__gangway";

/// Event id carrying page→host native function invocations.
pub const INVOKE_EVENT_ID: &str = "__gangway__invoke";

/// Event id carrying host→page invocation completions.
pub const COMPLETE_EVENT_ID: &str = "__gangway__complete";

/// Opaque identifier naming one logical event channel.
///
/// Many listener sets are multiplexed over a single transport by these
/// ids. The bridge never interprets the contents beyond equality and the
/// reserved-prefix check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id is reserved for the bridge's own protocol traffic.
    pub fn is_reserved(&self) -> bool {
        self.0.starts_with(RESERVED_PREFIX)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for EventId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One event crossing the page→host boundary, in wire form.
///
/// Exactly two fields. The payload is opaque to the transport; only the
/// receiving end gives it meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub event_id: EventId,
    pub payload: Value,
}

impl Envelope {
    pub fn new(event_id: impl Into<EventId>, payload: Value) -> Self {
        Self {
            event_id: event_id.into(),
            payload,
        }
    }

    /// Serialize to the transport text format.
    pub fn to_text(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse from the transport text format.
    pub fn from_text(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Payload of an [`INVOKE_EVENT_ID`] event: a call to a named native
/// function, with the id the caller expects the result under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    pub name: String,
    pub params: Vec<Value>,
    pub result_id: u64,
}

/// Payload of a [`COMPLETE_EVENT_ID`] event: the result of an earlier
/// invocation, matched back to its caller by `result_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeCompletion {
    pub result_id: u64,
    pub result: Value,
}
