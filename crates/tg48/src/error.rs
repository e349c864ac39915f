//! Unified error type for the relay.

use tg48_protocol::ProtocolError;
use tg48_transport::TransportError;

/// Everything that can stop the relay.
///
/// The variant says *where* it failed; the wrapped error says *why*.
/// Several variants wrap the same sub-crate error, so conversions are
/// explicit `map_err` calls rather than `#[from]`.
///
/// All of these are fatal. `Connection`, `Handshake` and `Encoding` abort
/// startup; `Read` and `Decoding` end the listener, after which the cache
/// can no longer be trusted and the process should exit.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The transport could not be opened.
    #[error("failed to connect to the game server: {0}")]
    Connection(#[source] TransportError),

    /// The `CreateSession` command could not be sent.
    #[error("failed to create a session: {0}")]
    Handshake(#[source] TransportError),

    /// An outbound command could not be encoded.
    #[error("failed to encode command: {0}")]
    Encoding(#[source] ProtocolError),

    /// An inbound frame was malformed.
    #[error("failed to decode event: {0}")]
    Decoding(#[source] ProtocolError),

    /// Reading from an established connection failed or timed out.
    #[error("failed to read from the game server: {0}")]
    Read(#[source] TransportError),

    /// Closing the connection failed.
    #[error("failed to close the connection: {0}")]
    Close(#[source] TransportError),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_display_names_the_failed_step() {
        let err = RelayError::Handshake(TransportError::ConnectionClosed(
            "gone".into(),
        ));
        let msg = err.to_string();
        assert!(msg.starts_with("failed to create a session"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_source_is_the_wrapped_error() {
        let err = RelayError::Decoding(ProtocolError::InvalidMessage(
            "bad".into(),
        ));
        let source = err.source().expect("should have a source");
        assert_eq!(source.to_string(), "invalid message: bad");
    }

    #[test]
    fn test_read_timeout_message() {
        let err = RelayError::Read(TransportError::TimedOut(
            std::time::Duration::from_secs(3),
        ));
        assert!(err.to_string().contains("3s"));
    }
}
