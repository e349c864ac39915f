//! `Mk48Client`: dial the game server and open a session.
//!
//! The handshake is a single write. The client sends `CreateSession` and
//! returns immediately; the server's `SessionCreated` reply is picked up
//! later by the [`Listener`] like any other event and becomes visible
//! through [`Mk48Client::session`].

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tg48_protocol::{Codec, Command, JsonCodec, Session};
use tg48_transport::{Connection, TransportError, WebSocketConnection};

use crate::{Handlers, Listener, RelayConfig, RelayError, StopReason};

/// A connection to the game server with a session request already sent.
pub struct Mk48Client<C = WebSocketConnection, K = JsonCodec> {
    conn: Arc<C>,
    codec: K,
    session: Arc<OnceLock<Session>>,
    read_timeout: Option<Duration>,
}

impl Mk48Client {
    /// Dials `config.url()` and performs the handshake.
    ///
    /// # Errors
    /// - [`RelayError::Connection`] if the WebSocket cannot be opened.
    /// - [`RelayError::Encoding`] / [`RelayError::Handshake`] if the
    ///   `CreateSession` command cannot be encoded or sent.
    pub async fn connect(config: &RelayConfig) -> Result<Self, RelayError> {
        let url = config.url();
        let conn = WebSocketConnection::connect(&url)
            .await
            .map_err(RelayError::Connection)?;
        tracing::info!(%url, conn_id = %conn.id(), "connected to game server");

        Self::handshake(conn, JsonCodec, config).await
    }
}

impl<C, K> Mk48Client<C, K>
where
    C: Connection<Error = TransportError>,
    K: Codec + Clone,
{
    /// Sends `CreateSession` over an open connection.
    ///
    /// On failure the connection is dropped; nothing else is attempted.
    pub async fn handshake(
        conn: C,
        codec: K,
        config: &RelayConfig,
    ) -> Result<Self, RelayError> {
        let command = Command::CreateSession {
            game_id: config.game_id.clone(),
        };
        let frame = codec.encode(&command).map_err(RelayError::Encoding)?;
        conn.send(&frame).await.map_err(RelayError::Handshake)?;

        tracing::info!(
            conn_id = %conn.id(),
            command = command.tag(),
            game_id = %config.game_id,
            "session requested"
        );

        Ok(Self {
            conn: Arc::new(conn),
            codec,
            session: Arc::new(OnceLock::new()),
            read_timeout: config.read_timeout,
        })
    }

    /// The session the server assigned, once its `SessionCreated` reply
    /// has been processed by a listener.
    pub fn session(&self) -> Option<&Session> {
        self.session.get()
    }

    /// Builds the listener for this connection.
    ///
    /// Only one listener should run per client; frames are consumed by
    /// whichever reads first.
    pub fn listener(&self, handlers: Handlers) -> Listener<C, K> {
        Listener {
            conn: Arc::clone(&self.conn),
            codec: self.codec.clone(),
            handlers,
            session: Arc::clone(&self.session),
            read_timeout: self.read_timeout,
        }
    }

    /// Runs a listener on the current task until the connection closes or
    /// fails.
    pub async fn listen(&self, handlers: Handlers) -> Result<StopReason, RelayError> {
        self.listener(handlers).run().await
    }

    /// Closes the connection with a "going away" status.
    ///
    /// Safe to call while a listener is blocked reading; the listener then
    /// sees the close and stops.
    pub async fn close(&self) -> Result<(), RelayError> {
        self.conn.close().await.map_err(RelayError::Close)
    }
}

#[cfg(test)]
mod tests {
    use tg48_leaderboard::LeaderboardCache;
    use tg48_protocol::{LeaderboardPeriod, WireId};

    use super::*;
    use crate::testing::MockConnection;

    fn config() -> RelayConfig {
        RelayConfig::new("ws://unused")
    }

    #[tokio::test]
    async fn test_handshake_sends_create_session() {
        let client = Mk48Client::handshake(MockConnection::new(), JsonCodec, &config())
            .await
            .unwrap();

        assert_eq!(
            client.conn.sent(),
            vec![br#"{"CreateSession":{"game_id":"Mk48"}}"#.to_vec()]
        );
        assert!(client.session().is_none());
    }

    #[tokio::test]
    async fn test_handshake_uses_configured_game_id() {
        let client = Mk48Client::handshake(
            MockConnection::new(),
            JsonCodec,
            &config().game_id("Kiomet"),
        )
        .await
        .unwrap();

        assert_eq!(
            client.conn.sent(),
            vec![br#"{"CreateSession":{"game_id":"Kiomet"}}"#.to_vec()]
        );
    }

    #[tokio::test]
    async fn test_handshake_send_failure_is_handshake_error() {
        let result =
            Mk48Client::handshake(MockConnection::failing_send(), JsonCodec, &config())
                .await;

        let err = result.err().expect("handshake should fail");
        assert!(matches!(err, RelayError::Handshake(_)));
    }

    #[tokio::test]
    async fn test_listen_records_session_on_client() {
        let conn = MockConnection::new()
            .frame(r#"{"SessionCreated":{"arena_id":1,"server_id":4,"session_id":123,"player_id":"abc"}}"#)
            .closed();
        let client = Mk48Client::handshake(conn, JsonCodec, &config())
            .await
            .unwrap();

        let reason = client.listen(Handlers::new()).await.unwrap();

        assert_eq!(reason, StopReason::ConnectionClosed);
        let session = client.session().expect("session should be captured");
        assert_eq!(session.server_id, Some(4));
        assert_eq!(session.session_id, WireId::Number("123".into()));
    }

    #[tokio::test]
    async fn test_listener_inherits_read_timeout() {
        let client = Mk48Client::handshake(
            MockConnection::new(),
            JsonCodec,
            &config().read_timeout(Duration::from_secs(5)),
        )
        .await
        .unwrap();

        let listener = client.listener(Handlers::new());
        assert_eq!(listener.read_timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_listener_feeds_cache() {
        let cache = LeaderboardCache::new();
        let conn = MockConnection::new()
            .frame(r#"{"LeaderboardUpdated":{"leaderboard":[{"alias":"Ann","score":1}],"period":"AllTime"}}"#)
            .closed();
        let client = Mk48Client::handshake(conn, JsonCodec, &config())
            .await
            .unwrap();

        client.listen(Handlers::update_cache(&cache)).await.unwrap();

        assert_eq!(cache.read(LeaderboardPeriod::AllTime).unwrap()[0].player, "Ann");
    }
}
