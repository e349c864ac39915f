//! Relay configuration.

use std::time::Duration;

/// Game identifier sent in `CreateSession`.
pub const DEFAULT_GAME_ID: &str = "Mk48";

/// Query string the server uses to pick the JSON encoding.
const FORMAT_QUERY: &str = "?format=json";

/// Where to connect and how to behave once connected.
///
/// ```rust
/// use std::time::Duration;
/// use tg48::RelayConfig;
///
/// let config = RelayConfig::new("wss://game.example/ws")
///     .read_timeout(Duration::from_secs(120));
/// assert_eq!(config.url(), "wss://game.example/ws/?format=json");
/// assert_eq!(config.game_id, "Mk48");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Base WebSocket URL of the game server, without query string.
    pub endpoint: String,

    /// Game to open a session for. Default: [`DEFAULT_GAME_ID`].
    pub game_id: String,

    /// Longest the listener waits for a frame before failing with
    /// [`RelayError::Read`](crate::RelayError::Read).
    ///
    /// Default: `None` (wait forever). Leaderboards can go quiet for a
    /// long time, so only set this well above the server's update cadence.
    pub read_timeout: Option<Duration>,
}

impl RelayConfig {
    /// Creates a config for `endpoint` with default settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            game_id: DEFAULT_GAME_ID.to_string(),
            read_timeout: None,
        }
    }

    /// Sets the game identifier.
    pub fn game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = game_id.into();
        self
    }

    /// Fails the listener when no frame arrives within `timeout`.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// The full URL to dial: `<endpoint>/?format=json`.
    pub fn url(&self) -> String {
        format!("{}/{FORMAT_QUERY}", self.endpoint.trim_end_matches('/'))
    }
}
