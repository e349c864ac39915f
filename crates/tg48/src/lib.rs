//! # tg48
//!
//! Relays Mk48 leaderboards to chat commands.
//!
//! A [`Mk48Client`] dials the game server and requests a session. Its
//! [`Listener`] then runs on a background task for the life of the
//! process, decoding pushed events and handing leaderboard updates to a
//! [`LeaderboardCache`]. Command handlers read that cache concurrently to
//! answer `/leaderboard` requests.
//!
//! ```text
//! game server ──frames──► Listener ──update──► LeaderboardCache ◄──read── commands
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tg48::prelude::*;
//!
//! # async fn run() -> Result<(), RelayError> {
//! let cache = LeaderboardCache::new();
//! let client = Mk48Client::connect(&RelayConfig::new("wss://game.example/ws")).await?;
//! let relay = tokio::spawn(client.listener(Handlers::update_cache(&cache)).run());
//!
//! if let Some(reply) = tg48::commands::handle("/leaderboard weekly", &cache) {
//!     println!("{}", reply.text);
//! }
//! # let _ = relay;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod commands;
mod config;
mod error;
mod listener;
#[cfg(test)]
mod testing;

pub use client::Mk48Client;
pub use config::{DEFAULT_GAME_ID, RelayConfig};
pub use error::RelayError;
pub use listener::{Handlers, Listener, StopReason};

pub use tg48_leaderboard::{LeaderboardCache, LeaderboardSnapshot};
pub use tg48_protocol::{
    LeaderboardEntry, LeaderboardPeriod, Session, WireId,
};

/// The types most programs need.
pub mod prelude {
    pub use crate::commands::{ChatCommand, ParseMode, Reply};
    pub use crate::{
        Handlers, LeaderboardCache, LeaderboardPeriod, Mk48Client,
        RelayConfig, RelayError, StopReason,
    };
}
