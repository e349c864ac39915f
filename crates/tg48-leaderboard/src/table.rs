//! Fixed-width text rendering of a leaderboard.
//!
//! ```text
//! | Player               | Score      |
//! |----------------------|------------|
//! | Ann                  | 10         |
//! ```

use std::fmt;

use tg48_protocol::LeaderboardEntry;

/// Width of the player column, in characters.
pub(crate) const PLAYER_WIDTH: usize = 20;
/// Width of the score column, in characters.
pub(crate) const SCORE_WIDTH: usize = 10;

/// Renders `entries` as a fixed-width table, one row per entry in the
/// given order.
pub fn render_table(entries: &[LeaderboardEntry]) -> String {
    LeaderboardTable(entries).to_string()
}

/// `Display` adapter behind [`render_table`].
///
/// Padding counts `char`s, not bytes, so names like `Zoë` line up. Names
/// longer than [`PLAYER_WIDTH`] are kept whole and push their row wider.
#[derive(Debug, Clone, Copy)]
struct LeaderboardTable<'a>(&'a [LeaderboardEntry]);

impl fmt::Display for LeaderboardTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "| {:<pw$} | {:<sw$} |",
            "Player",
            "Score",
            pw = PLAYER_WIDTH,
            sw = SCORE_WIDTH
        )?;
        writeln!(
            f,
            "|{}|{}|",
            "-".repeat(PLAYER_WIDTH + 2),
            "-".repeat(SCORE_WIDTH + 2)
        )?;
        for entry in self.0 {
            writeln!(
                f,
                "| {:<pw$} | {:<sw$} |",
                entry.player,
                entry.score,
                pw = PLAYER_WIDTH,
                sw = SCORE_WIDTH
            )?;
        }
        Ok(())
    }
}
