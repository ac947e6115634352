//! Per-player facade

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::Battlefield;
use crate::error::{ConquestError, Result};
use crate::levels::{LevelProgress, LevelUp};
use crate::store::{AwardRecord, HistoryStore, MedallionEvent};

/// What happened when a maneuver was executed
#[derive(Debug, Clone, Serialize)]
pub struct ManeuverOutcome {
    pub event: MedallionEvent,
    /// Medallions granted because of this maneuver
    pub awards: Vec<AwardRecord>,
    /// Set when the maneuver's points crossed a level threshold
    pub level_up: Option<LevelUp>,
}

/// Handle for a single player on a [`Battlefield`]
pub struct Player<'a, S: HistoryStore> {
    name: String,
    battlefield: &'a Battlefield<S>,
}

impl<'a, S: HistoryStore> Player<'a, S> {
    pub(crate) fn new(name: &str, battlefield: &'a Battlefield<S>) -> Self {
        Self {
            name: name.to_string(),
            battlefield,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record one unit of a maneuver, now
    pub fn execute_maneuver(&self, key: &str) -> Result<ManeuverOutcome> {
        self.execute(key, 1, None)
    }

    /// Record `value` units of a maneuver at `at` (defaults to now)
    ///
    /// Points are captured from the current definition and never recomputed.
    /// Unknown keys fail before anything is written.
    pub fn execute(&self, key: &str, value: u32, at: Option<DateTime<Utc>>) -> Result<ManeuverOutcome> {
        let bf = self.battlefield;
        let definition = bf
            .registry()
            .maneuver(key)
            .ok_or_else(|| ConquestError::UnknownManeuver(key.to_string()))?;

        let points = i64::from(value)
            .checked_mul(definition.points_per_unit)
            .ok_or_else(|| {
                ConquestError::config(format!(
                    "Maneuver '{}' x{} overflows the points range ({} points per unit)",
                    key, value, definition.points_per_unit
                ))
            })?;

        let event = MedallionEvent {
            player: self.name.clone(),
            maneuver: key.to_string(),
            value,
            points,
            created_at: at.unwrap_or_else(Utc::now),
        };

        bf.with_player_lock(&self.name, || {
            let ladder = bf.registry().levels();
            let points_before = if ladder.is_empty() {
                None
            } else {
                Some(bf.store().total_points(&self.name)?)
            };

            bf.store().insert_event(&event)?;
            debug!("'{}' executed {} x{} (+{} points)", self.name, key, value, event.points);

            let awards = bf.award_ceremony(&self.name, Some(key), true)?;

            let level_up = match points_before {
                Some(before) => {
                    let old_level = ladder.level_for(before)?;
                    let new_level = ladder.level_for(before.saturating_add(event.points))?;
                    (new_level > old_level).then_some(LevelUp {
                        old_level,
                        new_level,
                    })
                }
                None => None,
            };

            Ok(ManeuverOutcome {
                event: event.clone(),
                awards,
                level_up,
            })
        })
    }

    /// Delete and rebuild this player's medallions
    pub fn recalculate(&self) -> Result<Vec<AwardRecord>> {
        self.battlefield.recalculate(Some(&self.name))
    }

    /// Total points
    pub fn points(&self) -> Result<i64> {
        self.battlefield.points_of(&self.name)
    }

    pub fn level(&self) -> Result<u32> {
        self.battlefield.level_of(&self.name)
    }

    /// Level, plus the points needed for the current and the next level
    pub fn level_progress(&self) -> Result<LevelProgress> {
        self.battlefield.registry().levels().progress(self.points()?)
    }

    /// Medallion key -> total amount awarded
    pub fn medallion_overview(&self) -> Result<BTreeMap<String, u32>> {
        Ok(self.battlefield.store().overview(&self.name)?)
    }

    /// Every award record, oldest first
    pub fn awards(&self) -> Result<Vec<AwardRecord>> {
        Ok(self.battlefield.store().awards_for_player(&self.name)?)
    }

    /// Medallions awarded since the last call
    ///
    /// Reading marks them as shown: a second call returns nothing until new
    /// medallions are awarded. Keep the result if you need it.
    pub fn new_medallions(&self) -> Result<BTreeMap<String, u32>> {
        let bf = self.battlefield;
        bf.with_player_lock(&self.name, || Ok(bf.store().take_unnotified_awards(&self.name)?))
    }
}
