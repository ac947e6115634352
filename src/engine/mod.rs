//! Award engine
//!
//! A [`Battlefield`] ties a [`Registry`] to a [`HistoryStore`]. It decides
//! which medallions a player has earned, recalculates awards from raw
//! history, and hands out [`Player`] handles for per-player operations.
//!
//! # Locking
//!
//! Operations on one player run under that player's lock, so two
//! concurrent maneuvers can never both read stale totals and award the same
//! single medallion twice. Recalculating every player takes the maintenance
//! lock exclusively and waits for all per-player work to finish.
//!
//! ```ignore
//! let battlefield = Battlefield::new(registry, SqliteStore::open_default()?);
//! let deldy = battlefield.player("deldy");
//! deldy.execute_maneuver("LoadedPage")?;
//! let news = deldy.new_medallions()?;
//! ```

mod checker;
mod player;

pub use checker::{earnable_units, units_to_award};
pub use player::{ManeuverOutcome, Player};

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::Utc;
use tracing::{debug, info};

use crate::definitions::{MedallionDefinition, Registry};
use crate::error::Result;
use crate::store::{sum_by_medallion, AwardRecord, HistoryStore};

/// Engine instance: definitions, history, and the locks guarding them
pub struct Battlefield<S: HistoryStore> {
    registry: Registry,
    store: S,
    notify_on_recalculate: bool,
    player_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    maintenance: RwLock<()>,
}

impl<S: HistoryStore> Battlefield<S> {
    pub fn new(registry: Registry, store: S) -> Self {
        registry.check_references();
        Self {
            registry,
            store,
            notify_on_recalculate: true,
            player_locks: Mutex::new(HashMap::new()),
            maintenance: RwLock::new(()),
        }
    }

    /// Whether awards rebuilt by a recalculation show up as new medallions
    pub fn with_notify_on_recalculate(mut self, notify: bool) -> Self {
        self.notify_on_recalculate = notify;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Reconfigure definitions; exclusive access means no operation is running
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle for one player. Use a stable id: players cannot be renamed.
    pub fn player(&self, name: &str) -> Player<'_, S> {
        Player::new(name, self)
    }

    /// Grant every medallion the player has newly earned
    ///
    /// With `maneuver` set only medallions conditioned on it are checked,
    /// otherwise all medallions are.
    pub fn evaluate_awards(&self, player: &str, maneuver: Option<&str>) -> Result<Vec<AwardRecord>> {
        self.with_player_lock(player, || self.award_ceremony(player, maneuver, true))
    }

    /// Delete awards and rebuild them from maneuver history
    ///
    /// With a player only that player is rebuilt. Without one, every player
    /// with history is rebuilt while all other operations wait.
    pub fn recalculate(&self, player: Option<&str>) -> Result<Vec<AwardRecord>> {
        match player {
            Some(p) => self.with_player_lock(p, || self.recalculate_player(p)),
            None => {
                let _exclusive = self
                    .maintenance
                    .write()
                    .unwrap_or_else(PoisonError::into_inner);

                self.store.delete_awards(None)?;
                let players = self.store.distinct_players()?;
                info!("Recalculating medallions for {} players", players.len());

                let mut granted = Vec::new();
                for p in &players {
                    granted.extend(self.award_ceremony(p, None, self.notify_on_recalculate)?);
                }
                Ok(granted)
            }
        }
    }

    /// Every player with at least one maneuver
    pub fn players(&self) -> Result<BTreeSet<String>> {
        Ok(self.store.distinct_players()?)
    }

    /// Cumulative points of a player
    pub fn points_of(&self, player: &str) -> Result<i64> {
        Ok(self.store.total_points(player)?)
    }

    /// Level of a player; fails when no level thresholds are configured
    pub fn level_of(&self, player: &str) -> Result<u32> {
        let ladder = self.registry.levels();
        // Check the ladder before touching the store
        if ladder.is_empty() {
            return ladder.level_for(0);
        }
        ladder.level_for(self.points_of(player)?)
    }

    fn recalculate_player(&self, player: &str) -> Result<Vec<AwardRecord>> {
        self.store.delete_awards(Some(player))?;
        info!("Recalculating medallions for '{}'", player);
        self.award_ceremony(player, None, self.notify_on_recalculate)
    }

    /// Run `f` while holding the given player's lock
    pub(crate) fn with_player_lock<T>(&self, player: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _shared = self
            .maintenance
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let lock = self.player_lock(player);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    fn player_lock(&self, player: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .player_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Handles are only cloned under this map lock, so a count of one means idle
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(player.to_string()).or_default().clone()
    }

    /// Compute and store new awards; the caller holds the player's lock
    pub(crate) fn award_ceremony(
        &self,
        player: &str,
        maneuver: Option<&str>,
        notify: bool,
    ) -> Result<Vec<AwardRecord>> {
        let candidates: Vec<&MedallionDefinition> = match maneuver {
            Some(key) => self.registry.medallions_for_maneuver(key).collect(),
            None => self.registry.medallions().collect(),
        };
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let checked = candidates.len();

        let totals = self.store.maneuver_totals(player)?;
        let awarded = sum_by_medallion(&self.store.awards_for_player(player)?);
        let now = Utc::now();

        let mut granted = Vec::new();
        for medallion in candidates {
            let already = awarded.get(&medallion.key).copied().unwrap_or(0);
            let amount = units_to_award(medallion, &totals, already);
            if amount == 0 {
                continue;
            }

            let record = AwardRecord {
                medallion: medallion.key.clone(),
                player: player.to_string(),
                amount,
                created_at: now,
                user_notified: !notify,
            };
            self.store.insert_award(&record)?;
            info!("Awarded {} x{} to '{}'", medallion.key, amount, player);
            granted.push(record);
        }

        debug!(
            "Checked {} medallions for '{}', {} granted",
            checked,
            player,
            granted.len()
        );
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConquestError;
    use crate::store::MemoryStore;

    fn battlefield() -> Battlefield<MemoryStore> {
        let mut registry = Registry::new();
        registry.register_maneuver("A", 1).unwrap();
        registry.register_maneuver("B", 1).unwrap();
        registry
            .register_medallion("Both", true, [("A", 5), ("B", 10)])
            .unwrap();
        registry.register_medallion("OnlyB", false, [("B", 1)]).unwrap();
        Battlefield::new(registry, MemoryStore::new())
    }

    #[test]
    fn bottleneck_condition_limits_awards() {
        let bf = battlefield();
        let player = bf.player("p");
        player.execute("A", 12, None).unwrap();
        player.execute("B", 10, None).unwrap();

        let overview = player.medallion_overview().unwrap();
        assert_eq!(overview["Both"], 1);
        assert_eq!(overview["OnlyB"], 1);
    }

    #[test]
    fn incremental_path_only_checks_referencing_medallions() {
        let bf = battlefield();
        bf.player("p").execute("A", 100, None).unwrap();

        // Nothing references only A, and Both still waits on B
        assert!(bf.player("p").medallion_overview().unwrap().is_empty());
        assert!(bf.evaluate_awards("p", Some("A")).unwrap().is_empty());
    }

    #[test]
    fn recalculate_is_idempotent() {
        let bf = battlefield();
        let player = bf.player("p");
        player.execute("A", 20, None).unwrap();
        player.execute("B", 20, None).unwrap();
        let before = player.medallion_overview().unwrap();

        bf.recalculate(Some("p")).unwrap();
        let once = player.medallion_overview().unwrap();
        bf.recalculate(Some("p")).unwrap();
        let twice = player.medallion_overview().unwrap();

        assert_eq!(before, once);
        assert_eq!(once, twice);
        assert_eq!(twice["Both"], 2);
    }

    #[test]
    fn recalculate_all_players() {
        let bf = battlefield();
        bf.player("x").execute("B", 1, None).unwrap();
        bf.player("y").execute("B", 3, None).unwrap();
        bf.store().delete_awards(None).unwrap();

        let granted = bf.recalculate(None).unwrap();
        assert_eq!(granted.len(), 2);
        assert!(granted.iter().all(|a| a.player == "x" || a.player == "y"));
        assert_eq!(bf.player("y").medallion_overview().unwrap()["OnlyB"], 1);
    }

    #[test]
    fn silent_recalculation_marks_awards_notified() {
        let bf = battlefield().with_notify_on_recalculate(false);
        let player = bf.player("p");
        player.execute("B", 1, None).unwrap();
        assert_eq!(player.new_medallions().unwrap()["OnlyB"], 1);

        bf.recalculate(Some("p")).unwrap();
        assert!(player.new_medallions().unwrap().is_empty());
        assert_eq!(player.medallion_overview().unwrap()["OnlyB"], 1);
    }

    #[test]
    fn idle_player_locks_are_dropped() {
        let bf = battlefield();
        for name in ["a", "b", "c", "d"] {
            bf.player(name).execute("B", 1, None).unwrap();
            bf.player(name).new_medallions().unwrap();
        }
        assert!(bf.player_locks.lock().unwrap().len() <= 1);
        assert_eq!(bf.player("d").medallion_overview().unwrap()["OnlyB"], 1);
    }

    #[test]
    fn level_requires_thresholds() {
        let bf = battlefield();
        assert!(matches!(bf.level_of("p"), Err(ConquestError::Configuration(_))));
    }
}
