//! Codec trait and implementations for turning wire types into frames.
//!
//! The relay never calls `serde_json` directly; it goes through a
//! [`Codec`], so the serialization can be swapped without touching the
//! listener or the handshake. [`JsonCodec`] is the only implementation the
//! Mk48 server speaks today (selected by the `?format=json` query).

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec lives inside the listener
/// task for the whole life of the process.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value has no representation
    /// in this format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes one frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use tg48_protocol::{Codec, Command, Event, JsonCodec};
///
/// let codec = JsonCodec;
///
/// let bytes = codec
///     .encode(&Command::CreateSession { game_id: "Mk48".into() })
///     .unwrap();
/// assert_eq!(bytes, br#"{"CreateSession":{"game_id":"Mk48"}}"#);
///
/// let event: Event = codec.decode(br#"{"Unknown":{}}"#).unwrap();
/// assert!(event.is_empty());
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Event, LeaderboardEntry, LeaderboardPeriod, LeaderboardUpdate};

    #[test]
    fn test_leaderboard_update_survives_encode_decode() {
        let codec = JsonCodec;
        let event = Event::LeaderboardUpdated(LeaderboardUpdate {
            leaderboard: vec![
                LeaderboardEntry {
                    player: "Zoë".into(),
                    score: 900,
                },
                LeaderboardEntry {
                    player: "Ann".into(),
                    score: 900,
                },
            ],
            period: LeaderboardPeriod::AllTime,
        });

        let bytes = codec.encode(&event).unwrap();
        let decoded: Event = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_encode_empty_event_is_encode_error() {
        let err = JsonCodec.encode(&Event::Empty).unwrap_err();
        assert!(matches!(err, ProtocolError::Encode(_)));
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = JsonCodec.decode::<Event>(b"{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
        assert!(err.to_string().starts_with("decode failed"));
    }
}
