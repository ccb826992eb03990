//! Error types for the page side of the bridge.

/// Errors surfaced by the page side of the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// An outbound payload could not be serialized into transport text.
    #[error("failed to serialize outbound event: {0}")]
    Serialize(#[source] serde_json::Error),

    /// An inbound payload was not valid transport text. Raised before
    /// any listener runs, so a malformed delivery has no partial effect.
    #[error("malformed inbound payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
