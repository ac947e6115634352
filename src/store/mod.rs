//! History storage for maneuver events and awarded medallions
//!
//! The engine only talks to the [`HistoryStore`] trait. Two implementations
//! ship with the crate:
//!
//! - [`SqliteStore`]: the on-disk store (`~/.conquest/history.db` by default)
//! - [`MemoryStore`]: an in-process store for embedding and tests
//!
//! Stores report failures as [`StoreError`]; the engine passes them through
//! unchanged and never retries.

mod db;
mod memory;
mod models;

pub use db::SqliteStore;
pub use memory::MemoryStore;
pub use models::{AwardRecord, MedallionEvent};

use std::collections::{BTreeMap, BTreeSet};

/// Error type for history stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to prepare store location: {0}")]
    Io(#[from] std::io::Error),

    #[error("History store lock poisoned")]
    Poisoned,

    #[error("Corrupt history row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only event log plus award records, with the aggregations the
/// engine needs
pub trait HistoryStore: Send + Sync {
    fn insert_event(&self, event: &MedallionEvent) -> StoreResult<()>;

    /// Maneuver key -> sum of values for one player
    fn maneuver_totals(&self, player: &str) -> StoreResult<BTreeMap<String, i64>>;

    /// Sum of event points for one player (0 without history)
    fn total_points(&self, player: &str) -> StoreResult<i64>;

    /// Every player with at least one event
    fn distinct_players(&self) -> StoreResult<BTreeSet<String>>;

    fn insert_award(&self, award: &AwardRecord) -> StoreResult<()>;

    fn awards_for_player(&self, player: &str) -> StoreResult<Vec<AwardRecord>>;

    /// Delete awards for one player, or for everyone when `player` is None
    fn delete_awards(&self, player: Option<&str>) -> StoreResult<()>;

    /// Medallion key -> summed amount for one player
    fn overview(&self, player: &str) -> StoreResult<BTreeMap<String, u32>>;

    /// Medallion key -> summed amount of awards not yet shown to the player
    fn unnotified_awards(&self, player: &str) -> StoreResult<BTreeMap<String, u32>>;

    fn mark_awards_notified(&self, player: &str) -> StoreResult<()>;

    /// Fetch unnotified awards and mark them notified in one step
    ///
    /// The default runs the two calls back to back; callers must hold the
    /// player's lock. Stores with transactions override this.
    fn take_unnotified_awards(&self, player: &str) -> StoreResult<BTreeMap<String, u32>> {
        let awards = self.unnotified_awards(player)?;
        if !awards.is_empty() {
            self.mark_awards_notified(player)?;
        }
        Ok(awards)
    }
}

/// Medallion key -> summed amount
pub(crate) fn sum_by_medallion<'a>(
    awards: impl IntoIterator<Item = &'a AwardRecord>,
) -> BTreeMap<String, u32> {
    let mut totals = BTreeMap::new();
    for award in awards {
        *totals.entry(award.medallion.clone()).or_insert(0) += award.amount;
    }
    totals
}
