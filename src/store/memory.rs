//! In-process history store

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use super::{sum_by_medallion, AwardRecord, HistoryStore, MedallionEvent, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    events: Vec<MedallionEvent>,
    awards: Vec<AwardRecord>,
}

/// History store that keeps every row in memory
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Every event recorded for a player, oldest first
    pub fn events_for_player(&self, player: &str) -> StoreResult<Vec<MedallionEvent>> {
        Ok(self
            .tables()?
            .events
            .iter()
            .filter(|e| e.player == player)
            .cloned()
            .collect())
    }
}

impl HistoryStore for MemoryStore {
    fn insert_event(&self, event: &MedallionEvent) -> StoreResult<()> {
        self.tables()?.events.push(event.clone());
        Ok(())
    }

    fn maneuver_totals(&self, player: &str) -> StoreResult<BTreeMap<String, i64>> {
        let tables = self.tables()?;
        let mut totals = BTreeMap::new();
        for event in tables.events.iter().filter(|e| e.player == player) {
            let total = totals.entry(event.maneuver.clone()).or_insert(0i64);
            *total = total.saturating_add(i64::from(event.value));
        }
        Ok(totals)
    }

    /// Saturates at the `i64` bounds instead of overflowing
    fn total_points(&self, player: &str) -> StoreResult<i64> {
        Ok(self
            .tables()?
            .events
            .iter()
            .filter(|e| e.player == player)
            .fold(0i64, |sum, e| sum.saturating_add(e.points)))
    }

    fn distinct_players(&self) -> StoreResult<BTreeSet<String>> {
        Ok(self.tables()?.events.iter().map(|e| e.player.clone()).collect())
    }

    fn insert_award(&self, award: &AwardRecord) -> StoreResult<()> {
        self.tables()?.awards.push(award.clone());
        Ok(())
    }

    fn awards_for_player(&self, player: &str) -> StoreResult<Vec<AwardRecord>> {
        Ok(self
            .tables()?
            .awards
            .iter()
            .filter(|a| a.player == player)
            .cloned()
            .collect())
    }

    fn delete_awards(&self, player: Option<&str>) -> StoreResult<()> {
        let mut tables = self.tables()?;
        match player {
            Some(p) => tables.awards.retain(|a| a.player != p),
            None => tables.awards.clear(),
        }
        Ok(())
    }

    fn overview(&self, player: &str) -> StoreResult<BTreeMap<String, u32>> {
        let tables = self.tables()?;
        Ok(sum_by_medallion(tables.awards.iter().filter(|a| a.player == player)))
    }

    fn unnotified_awards(&self, player: &str) -> StoreResult<BTreeMap<String, u32>> {
        let tables = self.tables()?;
        Ok(sum_by_medallion(
            tables
                .awards
                .iter()
                .filter(|a| a.player == player && !a.user_notified),
        ))
    }

    fn mark_awards_notified(&self, player: &str) -> StoreResult<()> {
        let mut tables = self.tables()?;
        for award in tables.awards.iter_mut().filter(|a| a.player == player) {
            award.user_notified = true;
        }
        Ok(())
    }

    fn take_unnotified_awards(&self, player: &str) -> StoreResult<BTreeMap<String, u32>> {
        let mut tables = self.tables()?;
        let mut taken = Vec::new();
        for award in tables
            .awards
            .iter_mut()
            .filter(|a| a.player == player && !a.user_notified)
        {
            award.user_notified = true;
            taken.push(award.clone());
        }
        Ok(sum_by_medallion(&taken))
    }
}
