//! Leaderboard state for tg48.
//!
//! - [`LeaderboardCache`] — latest snapshot per period, written by the
//!   event listener and read by command handlers.
//! - [`render_table`] — turns a snapshot into the fixed-width text table
//!   sent back to chat.

mod cache;
mod table;

pub use cache::{LeaderboardCache, LeaderboardSnapshot};
pub use table::render_table;
