//! Wire protocol for talking to the Mk48 game server.
//!
//! - **Types** ([`Command`], [`Event`], [`LeaderboardUpdate`], ...) — the
//!   messages that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to and from frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! ```text
//! Transport (frames) → Protocol (Event) → Listener (handlers)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Command, Event, LeaderboardEntry, LeaderboardPeriod, LeaderboardUpdate,
    Session, WireId,
};
