//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means the bytes and the Rust types disagree;
//! networking failures live in `tg48_transport::TransportError`.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    ///
    /// Happens when a value has no wire representation, e.g. an
    /// [`Event::Empty`](crate::Event::Empty).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, a frame that is not an object,
    /// wrong field types under a known tag, or two known tags in one
    /// frame.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message is invalid at the protocol level.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
