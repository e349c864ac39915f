//! Mk48 wire types.
//!
//! Every message on the wire is a JSON object with exactly one key. The key
//! names the variant ("tag") and the value carries that variant's fields:
//!
//! ```text
//! {"CreateSession": {"game_id": "Mk48"}}
//! {"LeaderboardUpdated": {"leaderboard": [...], "period": "Daily"}}
//! ```
//!
//! This is serde's default "externally tagged" enum representation, so the
//! outbound [`Command`] enum derives it directly. Inbound [`Event`]s need a
//! hand-written `Deserialize` because the server may send tags we don't
//! know about yet, and those must decode to [`Event::Empty`] instead of
//! failing.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

/// The time window a leaderboard covers.
///
/// Serialized as the variant name (`"AllTime"`, `"Weekly"`, `"Daily"`).
/// Any other string fails to decode; the set is closed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum LeaderboardPeriod {
    AllTime,
    Weekly,
    Daily,
}

impl LeaderboardPeriod {
    /// Every period, in the order the game lists them.
    pub const ALL: [LeaderboardPeriod; 3] = [
        LeaderboardPeriod::AllTime,
        LeaderboardPeriod::Weekly,
        LeaderboardPeriod::Daily,
    ];

    /// The wire name of the period.
    pub fn as_str(self) -> &'static str {
        match self {
            LeaderboardPeriod::AllTime => "AllTime",
            LeaderboardPeriod::Weekly => "Weekly",
            LeaderboardPeriod::Daily => "Daily",
        }
    }
}

impl fmt::Display for LeaderboardPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a period name case-insensitively, so both the wire form
/// (`"AllTime"`) and chat arguments (`"alltime"`) are accepted.
impl FromStr for LeaderboardPeriod {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeaderboardPeriod::ALL
            .into_iter()
            .find(|period| period.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ProtocolError::InvalidMessage(format!(
                    "unknown leaderboard period {s:?}"
                ))
            })
    }
}

/// One row of a leaderboard.
///
/// The server calls the display name `alias`; we call it `player`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "alias")]
    pub player: String,
    pub score: i64,
}

/// Payload of a `LeaderboardUpdated` event: the full leaderboard for one
/// period, best score first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardUpdate {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub period: LeaderboardPeriod,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An identifier the server may send either as a JSON number or a string.
///
/// Numbers are kept as their decimal text, so negative, fractional and
/// out-of-range values survive decoding unchanged. `42` becomes
/// `Number("42")` and `"abc"` becomes `Text("abc")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireId {
    Number(String),
    Text(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Number(n) | WireId::Text(n) => f.write_str(n),
        }
    }
}

impl Serialize for WireId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WireId::Text(s) => serializer.serialize_str(s),
            WireId::Number(n) => {
                if let Ok(v) = n.parse::<u64>() {
                    serializer.serialize_u64(v)
                } else if let Ok(v) = n.parse::<i64>() {
                    serializer.serialize_i64(v)
                } else if let Ok(v) = n.parse::<f64>() {
                    serializer.serialize_f64(v)
                } else {
                    serializer.serialize_str(n)
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for WireId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(WireIdVisitor)
    }
}

struct WireIdVisitor;

impl Visitor<'_> for WireIdVisitor {
    type Value = WireId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<WireId, E> {
        Ok(WireId::Number(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<WireId, E> {
        Ok(WireId::Number(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<WireId, E> {
        Ok(WireId::Number(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<WireId, E> {
        Ok(WireId::Text(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<WireId, E> {
        Ok(WireId::Text(v))
    }
}

/// The server's answer to [`Command::CreateSession`].
///
/// Nothing downstream depends on these values, so decoding is lenient:
/// ids may be negative and a `null` or missing `server_id` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub arena_id: i64,
    #[serde(default)]
    pub server_id: Option<i64>,
    pub session_id: WireId,
    pub player_id: WireId,
}

// ---------------------------------------------------------------------------
// Outbound commands
// ---------------------------------------------------------------------------

/// Messages the relay sends to the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Opens a session for the given game. Sent once, right after
    /// connecting.
    CreateSession { game_id: String },
}

impl Command {
    /// The wire tag this command is encoded under.
    pub fn tag(&self) -> &'static str {
        match self {
            Command::CreateSession { .. } => "CreateSession",
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// Messages the game server pushes to the relay.
///
/// Decoding always yields exactly one variant. A frame whose keys are all
/// unknown (including `{}`) decodes to [`Event::Empty`]. A frame carrying
/// two known tags is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Event {
    SessionCreated(Session),
    LeaderboardUpdated(LeaderboardUpdate),
    /// Nothing we recognize. Has no wire form, so encoding it fails.
    #[serde(skip_serializing)]
    Empty,
}

impl Event {
    /// The wire tag of the populated variant, if any.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Event::SessionCreated(_) => Some("SessionCreated"),
            Event::LeaderboardUpdated(_) => Some("LeaderboardUpdated"),
            Event::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Event::Empty)
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(EventVisitor)
    }
}

struct EventVisitor;

impl<'de> Visitor<'de> for EventVisitor {
    type Value = Event;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by event tag")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Event, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut event = Event::Empty;

        while let Some(tag) = map.next_key::<String>()? {
            let decoded = match tag.as_str() {
                "SessionCreated" => Event::SessionCreated(map.next_value()?),
                "LeaderboardUpdated" => {
                    Event::LeaderboardUpdated(map.next_value()?)
                }
                _ => {
                    // Unknown tags are skipped, not parsed.
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };

            if let Some(previous) = event.tag() {
                return Err(de::Error::custom(format!(
                    "frame carries both {previous} and {tag}"
                )));
            }
            event = decoded;
        }

        Ok(event)
    }
}

// =========================================================================
// Tests
// =========================================================================
