//! Error types for the host side of the bridge.

/// Errors surfaced while handling page traffic or emitting to the page.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A message posted by the page was not a valid envelope.
    #[error("malformed message envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    /// An invocation envelope carried a payload that is not a valid
    /// invocation request.
    #[error("malformed invocation payload: {0}")]
    MalformedInvoke(#[source] serde_json::Error),

    /// The page invoked a function nobody registered.
    #[error("no native function named `{0}` is registered")]
    UnknownFunction(String),

    /// An outbound payload could not be serialized.
    #[error("failed to serialize outbound event: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HostError>;
