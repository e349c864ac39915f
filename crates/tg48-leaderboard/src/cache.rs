//! The leaderboard cache: the latest snapshot per period.
//!
//! # Concurrency
//!
//! One writer (the listener's callback) and any number of readers (command
//! handlers). The map sits behind a `std::sync::RwLock` and each snapshot is
//! an `Arc<[LeaderboardEntry]>`:
//!
//! - `update` builds the new snapshot *outside* the lock, then takes the
//!   write lock only to swap one `Arc` in the map.
//! - `read` takes the read lock only to clone an `Arc`.
//!
//! A reader therefore holds either the old snapshot or the new one, never
//! a mix, and keeps it alive for as long as it needs even if an update
//! lands in the meantime. Neither operation awaits, so the lock is never
//! held across an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tg48_protocol::{LeaderboardEntry, LeaderboardPeriod};

/// The full ordered leaderboard for one period at one point in time.
pub type LeaderboardSnapshot = Arc<[LeaderboardEntry]>;

/// Latest leaderboard per period, shared between the event listener and
/// command handlers.
///
/// Cloning is cheap and every clone sees the same data.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardCache {
    inner: Arc<RwLock<HashMap<LeaderboardPeriod, LeaderboardSnapshot>>>,
}

impl LeaderboardCache {
    /// Creates an empty cache. Every period reads as absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot for `period` wholesale.
    ///
    /// An empty snapshot is stored as-is: "the leaderboard is empty" is a
    /// different answer from "nothing received yet".
    pub fn update(
        &self,
        period: LeaderboardPeriod,
        snapshot: impl Into<LeaderboardSnapshot>,
    ) {
        let snapshot = snapshot.into();
        let entries = snapshot.len();

        // The only mutation is a single `insert`, so a poisoned map is
        // still consistent.
        let previous = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(period, snapshot);

        tracing::debug!(
            %period,
            entries,
            replaced = previous.is_some(),
            "leaderboard updated"
        );
    }

    /// Returns the current snapshot for `period`, or `None` if no update
    /// has been received for it.
    pub fn read(&self, period: LeaderboardPeriod) -> Option<LeaderboardSnapshot> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&period)
            .cloned()
    }

    /// Periods that have received at least one update, in
    /// [`LeaderboardPeriod::ALL`] order.
    pub fn periods(&self) -> Vec<LeaderboardPeriod> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        LeaderboardPeriod::ALL
            .into_iter()
            .filter(|period| map.contains_key(period))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(player: &str, score: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            player: player.into(),
            score,
        }
    }

    #[test]
    fn test_read_before_update_is_absent() {
        let cache = LeaderboardCache::new();
        for period in LeaderboardPeriod::ALL {
            assert!(cache.read(period).is_none());
        }
        assert!(cache.periods().is_empty());
    }

    #[test]
    fn test_empty_update_is_present_but_empty() {
        let cache = LeaderboardCache::new();
        cache.update(LeaderboardPeriod::Weekly, Vec::<LeaderboardEntry>::new());

        let snapshot = cache.read(LeaderboardPeriod::Weekly).unwrap();
        assert!(snapshot.is_empty());
        assert!(cache.read(LeaderboardPeriod::Daily).is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = LeaderboardCache::new();
        cache.update(LeaderboardPeriod::Daily, vec![entry("a", 3)]);
        cache.update(LeaderboardPeriod::Daily, vec![entry("b", 2), entry("c", 1)]);
        cache.update(LeaderboardPeriod::Daily, vec![entry("d", 9)]);

        let snapshot = cache.read(LeaderboardPeriod::Daily).unwrap();
        assert_eq!(&*snapshot, &[entry("d", 9)]);
    }

    #[test]
    fn test_update_replaces_with_empty() {
        let cache = LeaderboardCache::new();
        cache.update(LeaderboardPeriod::AllTime, vec![entry("a", 1)]);
        cache.update(LeaderboardPeriod::AllTime, Vec::<LeaderboardEntry>::new());

        assert_eq!(cache.read(LeaderboardPeriod::AllTime).unwrap().len(), 0);
    }

    #[test]
    fn test_periods_are_independent() {
        let cache = LeaderboardCache::new();
        cache.update(LeaderboardPeriod::Daily, vec![entry("daily", 1)]);
        cache.update(LeaderboardPeriod::AllTime, vec![entry("ever", 2)]);

        assert_eq!(cache.read(LeaderboardPeriod::Daily).unwrap()[0].player, "daily");
        assert_eq!(cache.read(LeaderboardPeriod::AllTime).unwrap()[0].player, "ever");
        assert_eq!(
            cache.periods(),
            vec![LeaderboardPeriod::AllTime, LeaderboardPeriod::Daily]
        );
    }

    #[test]
    fn test_clones_share_state() {
        let cache = LeaderboardCache::new();
        let writer = cache.clone();
        writer.update(LeaderboardPeriod::Weekly, vec![entry("w", 5)]);
        assert!(cache.read(LeaderboardPeriod::Weekly).is_some());
    }

    #[test]
    fn test_snapshot_outlives_replacement() {
        let cache = LeaderboardCache::new();
        cache.update(LeaderboardPeriod::Daily, vec![entry("old", 1)]);

        let held = cache.read(LeaderboardPeriod::Daily).unwrap();
        cache.update(LeaderboardPeriod::Daily, vec![entry("new", 2)]);

        assert_eq!(held[0].player, "old");
        assert_eq!(cache.read(LeaderboardPeriod::Daily).unwrap()[0].player, "new");
    }
}
