//! Chat commands answered from the leaderboard cache.
//!
//! This layer knows nothing about any particular chat platform: it takes
//! the text of a message and produces a [`Reply`]. Whatever front end
//! delivers messages is responsible for sending the reply back.
//!
//! | Command                         | Reply                               |
//! |---------------------------------|-------------------------------------|
//! | `/start [name]`                 | `Welcome home, <name>`              |
//! | `/leaderboard [alltime\|weekly\|daily]` | leaderboard table (MarkdownV2) |

use tg48_leaderboard::{LeaderboardCache, render_table};
use tg48_protocol::LeaderboardPeriod;

/// Name used by `/start` when none is given.
pub const DEFAULT_NAME: &str = "Theseus";

/// How the chat platform should interpret [`Reply::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    MarkdownV2,
}

impl ParseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseMode::MarkdownV2 => "MarkdownV2",
        }
    }
}

/// Text to send back to the chat that issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// `None` means plain text.
    pub parse_mode: Option<ParseMode>,
}

impl Reply {
    fn plain(text: String) -> Self {
        Self {
            text,
            parse_mode: None,
        }
    }
}

/// A recognized chat command with its arguments resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Start { name: String },
    Leaderboard { period: LeaderboardPeriod },
}

impl ChatCommand {
    /// Parses message text such as `/leaderboard weekly`.
    ///
    /// The leading `/` and a trailing `@botname` on the command word are
    /// optional. Returns `None` for anything that isn't a known command.
    /// An unrecognized leaderboard period falls back to all-time.
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        let head = words.next()?;
        let head = head.strip_prefix('/').unwrap_or(head);
        let name = head.split_once('@').map_or(head, |(name, _bot)| name);
        let arg = words.next();

        match name {
            "start" => Some(ChatCommand::Start {
                name: arg.unwrap_or(DEFAULT_NAME).to_string(),
            }),
            "leaderboard" => Some(ChatCommand::Leaderboard {
                period: arg
                    .and_then(|a| a.parse().ok())
                    .unwrap_or(LeaderboardPeriod::AllTime),
            }),
            _ => None,
        }
    }

    /// Builds the reply. Reads the cache once; never blocks on I/O.
    pub fn execute(&self, cache: &LeaderboardCache) -> Reply {
        match self {
            ChatCommand::Start { name } => Reply::plain(format!("Welcome home, {name}")),
            ChatCommand::Leaderboard { period } => {
                let snapshot = cache.read(*period);
                if snapshot.is_none() {
                    tracing::debug!(%period, "no leaderboard received yet");
                }
                let table = render_table(snapshot.as_deref().unwrap_or_default());
                Reply {
                    text: format!("```\n{}```", escape_pre(&table)),
                    parse_mode: Some(ParseMode::MarkdownV2),
                }
            }
        }
    }
}

/// Parses and executes `text` in one step. `None` if it isn't a command.
pub fn handle(text: &str, cache: &LeaderboardCache) -> Option<Reply> {
    let command = ChatCommand::parse(text)?;
    tracing::debug!(?command, "handling command");
    Some(command.execute(cache))
}

/// Escapes the two characters MarkdownV2 treats specially inside a
/// pre-formatted block.
fn escape_pre(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '`' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
