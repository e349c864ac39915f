//! The event listener: read a frame, decode it, dispatch it, repeat.
//!
//! The loop is strictly sequential, so events for a period reach the
//! handler in the order the server sent them. It never retries: a read or
//! decode failure ends the loop with an error, because once a frame is
//! lost the cached leaderboards may be stale with no way to tell.
//!
//! ```text
//!             ┌──────────── next frame ◄───────────┐
//!             ▼                                    │
//!  recv ──► decode ──► LeaderboardUpdated ──► handler
//!   │         │        SessionCreated ─────► record session
//!   │         │        Empty ──────────────► ignore
//!   │         └─ error ──► Err(Decoding)
//!   ├─ error / timeout ──► Err(Read)
//!   └─ closed ──► Ok(ConnectionClosed)
//! ```

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tg48_leaderboard::{LeaderboardCache, LeaderboardSnapshot};
use tg48_protocol::{Codec, Event, JsonCodec, LeaderboardPeriod, Session};
use tg48_transport::{Connection, TransportError};

use crate::RelayError;

type LeaderboardHandler =
    Box<dyn Fn(LeaderboardPeriod, LeaderboardSnapshot) + Send + Sync>;
type SessionHandler = Box<dyn Fn(&Session) + Send + Sync>;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Callbacks invoked by the listener, one slot per event kind.
///
/// Handlers run on the listener task and block it while they run, so they
/// should be quick. Any locking they need is their own business; the
/// listener holds no lock while calling them.
#[derive(Default)]
pub struct Handlers {
    leaderboard_update: Option<LeaderboardHandler>,
    session_created: Option<SessionHandler>,
}

impl Handlers {
    /// No handlers: every event is decoded and dropped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handlers that keep `cache` in sync with the server.
    pub fn update_cache(cache: &LeaderboardCache) -> Self {
        let cache = cache.clone();
        Self::new().on_leaderboard_update(move |period, snapshot| {
            cache.update(period, snapshot);
        })
    }

    /// Registers the callback for `LeaderboardUpdated` events, replacing
    /// any previous one.
    pub fn on_leaderboard_update<F>(mut self, handler: F) -> Self
    where
        F: Fn(LeaderboardPeriod, LeaderboardSnapshot) + Send + Sync + 'static,
    {
        self.leaderboard_update = Some(Box::new(handler));
        self
    }

    /// Registers the callback for `SessionCreated` events.
    pub fn on_session_created<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        self.session_created = Some(Box::new(handler));
        self
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("leaderboard_update", &self.leaderboard_update.is_some())
            .field("session_created", &self.session_created.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

/// Why a listener stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown future passed to [`Listener::run_until`] resolved.
    Shutdown,
    /// The server closed the connection.
    ConnectionClosed,
}

/// Owns the read side of a connection and feeds decoded events to
/// [`Handlers`].
///
/// Usually obtained from [`Mk48Client::listener`](crate::Mk48Client::listener).
pub struct Listener<C, K = JsonCodec> {
    pub(crate) conn: Arc<C>,
    pub(crate) codec: K,
    pub(crate) handlers: Handlers,
    pub(crate) session: Arc<OnceLock<Session>>,
    pub(crate) read_timeout: Option<Duration>,
}

impl<C, K> Listener<C, K>
where
    C: Connection<Error = TransportError>,
    K: Codec,
{
    /// Creates a listener over an already handshaken connection.
    pub fn new(conn: Arc<C>, codec: K, handlers: Handlers) -> Self {
        Self {
            conn,
            codec,
            handlers,
            session: Arc::new(OnceLock::new()),
            read_timeout: None,
        }
    }

    /// Fails with [`RelayError::Read`] when no frame arrives within
    /// `timeout`.
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Runs until the connection closes or fails.
    pub async fn run(self) -> Result<StopReason, RelayError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs until the connection closes or fails, or until `shutdown`
    /// resolves.
    ///
    /// `shutdown` is checked before every read and also interrupts a read
    /// that is waiting for the next frame. A frame that was already read
    /// is always dispatched before the loop stops.
    pub async fn run_until<F>(self, shutdown: F) -> Result<StopReason, RelayError>
    where
        F: Future<Output = ()>,
    {
        let conn_id = self.conn.id();
        tracing::info!(%conn_id, "listening for events");

        tokio::pin!(shutdown);

        loop {
            let frame = tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!(%conn_id, "listener shut down");
                    return Ok(StopReason::Shutdown);
                }
                frame = self.next_frame() => frame,
            };

            let frame = match frame {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::warn!(%conn_id, "server closed the connection");
                    return Ok(StopReason::ConnectionClosed);
                }
                Err(e) => {
                    tracing::error!(%conn_id, error = %e, "read failed");
                    return Err(RelayError::Read(e));
                }
            };

            let event: Event = self.codec.decode(&frame).map_err(|e| {
                tracing::error!(
                    %conn_id,
                    error = %e,
                    frame = %String::from_utf8_lossy(&frame),
                    "undecodable frame"
                );
                RelayError::Decoding(e)
            })?;

            self.dispatch(event);
        }
    }

    async fn next_frame(&self) -> Result<Option<Vec<u8>>, TransportError> {
        match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.conn.recv())
                .await
                .unwrap_or(Err(TransportError::TimedOut(limit))),
            None => self.conn.recv().await,
        }
    }

    fn dispatch(&self, event: Event) {
        match event {
            Event::LeaderboardUpdated(update) => {
                let period = update.period;
                tracing::debug!(
                    %period,
                    entries = update.leaderboard.len(),
                    "leaderboard event"
                );
                if let Some(handler) = &self.handlers.leaderboard_update {
                    handler(period, update.leaderboard.into());
                }
            }
            Event::SessionCreated(session) => {
                tracing::info!(
                    arena_id = session.arena_id,
                    server_id = ?session.server_id,
                    session_id = %session.session_id,
                    player_id = %session.player_id,
                    "session created"
                );
                if let Some(handler) = &self.handlers.session_created {
                    handler(&session);
                }
                if let Err(duplicate) = self.session.set(session) {
                    tracing::warn!(
                        session_id = %duplicate.session_id,
                        "ignoring second SessionCreated"
                    );
                }
            }
            Event::Empty => tracing::trace!("ignoring event with no known tag"),
        }
    }
}

impl<C, K> fmt::Debug for Listener<C, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("handlers", &self.handlers)
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}
