//! `tg48` relay binary.
//!
//! Connects to the game server, keeps the leaderboard cache up to date on
//! a background task, and answers commands read line by line from stdin
//! on stdout. Logs go to stderr.
//!
//! Exits non-zero when the event stream ends for any reason other than
//! Ctrl-C, so a supervisor can restart it with a fresh cache.

use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use tg48::commands;
use tg48::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "tg48", version, about = "Relays Mk48 leaderboards to chat commands")]
struct Args {
    /// Base WebSocket URL of the game server.
    #[arg(long, env = "MK48_ENDPOINT")]
    endpoint: String,

    /// Game to open a session for.
    #[arg(long, env = "MK48_GAME_ID", default_value = tg48::DEFAULT_GAME_ID)]
    game_id: String,

    /// Fail when no event arrives for this many seconds. Unset = wait
    /// forever.
    #[arg(long, env = "MK48_READ_TIMEOUT_SECS")]
    read_timeout_secs: Option<u64>,

    /// Log filter, e.g. `info` or `tg48=debug,info`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
}

impl Args {
    fn relay_config(&self) -> RelayConfig {
        let config = RelayConfig::new(&self.endpoint).game_id(&self.game_id);
        match self.read_timeout_secs {
            Some(secs) => config.read_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; real deployments set the environment.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level)?)
        .with_writer(std::io::stderr)
        .init();

    let cache = LeaderboardCache::new();
    let client = Mk48Client::connect(&args.relay_config()).await?;
    let mut relay = tokio::spawn(
        client
            .listener(Handlers::update_cache(&cache))
            .run_until(shutdown_signal()),
    );
    tracing::info!("relay started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let outcome = loop {
        tokio::select! {
            joined = &mut relay => break joined,
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    if let Some(reply) = commands::handle(&line, &cache) {
                        tracing::debug!(
                            parse_mode = reply.parse_mode.map(ParseMode::as_str),
                            "reply ready"
                        );
                        println!("{}", reply.text);
                    }
                }
                None => {
                    tracing::debug!("stdin closed; relay keeps running");
                    stdin_open = false;
                }
            },
        }
    };

    if let Err(e) = client.close().await {
        tracing::debug!(error = %e, "close after listener stopped");
    }

    match outcome? {
        Ok(StopReason::Shutdown) => {
            tracing::info!(periods = ?cache.periods(), "relay stopped");
            Ok(())
        }
        Ok(StopReason::ConnectionClosed) => {
            Err("game server closed the connection".into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolves on Ctrl-C. If the signal handler can't be installed, never
/// resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_map_to_relay_config() {
        let args = Args::try_parse_from([
            "tg48",
            "--endpoint",
            "ws://localhost:8192",
            "--game-id",
            "Kiomet",
            "--read-timeout-secs",
            "90",
        ])
        .unwrap();

        let config = args.relay_config();
        assert_eq!(config.url(), "ws://localhost:8192/?format=json");
        assert_eq!(config.game_id, "Kiomet");
        assert_eq!(config.read_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_read_timeout_is_off_by_default() {
        let args =
            Args::try_parse_from(["tg48", "--endpoint", "ws://localhost:8192"])
                .unwrap();
        assert_eq!(args.relay_config().read_timeout, None);
    }
}
