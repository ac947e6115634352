//! Points and level ladder
//!
//! A ladder is a list of point thresholds. Every player starts at level 1;
//! reaching the first threshold gives level 2, the second level 3, and so on.

use serde::{Deserialize, Serialize};

use crate::error::{ConquestError, Result};

/// Ascending point thresholds, one per level above level 1
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<i64>", into = "Vec<i64>")]
pub struct LevelLadder {
    thresholds: Vec<i64>,
}

impl From<Vec<i64>> for LevelLadder {
    fn from(thresholds: Vec<i64>) -> Self {
        Self::new(thresholds)
    }
}

impl From<LevelLadder> for Vec<i64> {
    fn from(ladder: LevelLadder) -> Self {
        ladder.thresholds
    }
}

impl LevelLadder {
    /// Build a ladder from thresholds in any order (they are sorted ascending)
    pub fn new(mut thresholds: Vec<i64>) -> Self {
        thresholds.sort_unstable();
        Self { thresholds }
    }

    /// Ladder with `count` levels spaced `increment` points apart
    pub fn linear(count: u32, increment: i64) -> Self {
        Self::new(linear_levels(count, increment))
    }

    pub fn thresholds(&self) -> &[i64] {
        &self.thresholds
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Highest reachable level
    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32 + 1
    }

    /// Level reached with the given points
    pub fn level_for(&self, points: i64) -> Result<u32> {
        if self.is_empty() {
            return Err(ConquestError::config("No levels defined"));
        }

        let mut level = 1;
        for (index, threshold) in self.thresholds.iter().enumerate() {
            if *threshold <= points {
                level = index as u32 + 2;
            } else {
                break;
            }
        }
        Ok(level)
    }

    /// Points needed to reach `level` (level 1 needs none)
    pub fn points_for(&self, level: u32) -> Option<i64> {
        match level {
            0 => None,
            1 => Some(0),
            n => self.thresholds.get(n as usize - 2).copied(),
        }
    }

    /// Where the given points sit between the current and the next level
    pub fn progress(&self, points: i64) -> Result<LevelProgress> {
        let level = self.level_for(points)?;
        Ok(LevelProgress {
            points,
            level,
            current_level_points: self.points_for(level).unwrap_or(0),
            next_level_points: self.points_for(level + 1),
        })
    }
}

/// Produce `increment, 2*increment, ..., (count-1)*increment`
pub fn linear_levels(count: u32, increment: i64) -> Vec<i64> {
    (1..count as i64).map(|x| x * increment).collect()
}

/// Player points placed on the ladder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelProgress {
    pub points: i64,
    pub level: u32,
    /// Points needed for the current level
    pub current_level_points: i64,
    /// Points needed for the next level (None at max level)
    pub next_level_points: Option<i64>,
}

impl LevelProgress {
    /// Progress toward the next level (0.0 - 1.0)
    pub fn progress_to_next(&self) -> f32 {
        match self.next_level_points {
            Some(next) => {
                let span = next - self.current_level_points;
                if span <= 0 {
                    1.0
                } else {
                    let gained = (self.points - self.current_level_points).max(0);
                    (gained as f32 / span as f32).min(1.0)
                }
            }
            None => 1.0,
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.next_level_points.is_none()
    }
}

/// A level change caused by a maneuver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_levels_skip_level_one() {
        assert_eq!(linear_levels(4, 10), vec![10, 20, 30]);
        assert!(linear_levels(1, 10).is_empty());
        assert!(linear_levels(0, 10).is_empty());
    }

    #[test]
    fn level_for_points() {
        let ladder = LevelLadder::new(vec![100, 200, 400]);
        assert_eq!(ladder.level_for(0).unwrap(), 1);
        assert_eq!(ladder.level_for(99).unwrap(), 1);
        assert_eq!(ladder.level_for(100).unwrap(), 2);
        assert_eq!(ladder.level_for(399).unwrap(), 3);
        assert_eq!(ladder.level_for(10_000).unwrap(), 4); // Beyond max
        assert_eq!(ladder.max_level(), 4);
    }

    #[test]
    fn unsorted_thresholds_are_sorted() {
        let ladder = LevelLadder::new(vec![400, 100, 200]);
        assert_eq!(ladder.thresholds(), &[100, 200, 400]);
        assert_eq!(ladder.level_for(250).unwrap(), 3);
    }

    #[test]
    fn deserialized_ladder_is_sorted() {
        let ladder: LevelLadder = serde_json::from_str("[30, 10, 20]").unwrap();
        assert_eq!(ladder.thresholds(), &[10, 20, 30]);
        assert_eq!(ladder.level_for(15).unwrap(), 2);
        assert_eq!(serde_json::to_string(&ladder).unwrap(), "[10,20,30]");
    }

    #[test]
    fn empty_ladder_is_a_configuration_error() {
        let ladder = LevelLadder::default();
        assert!(matches!(
            ladder.level_for(10),
            Err(ConquestError::Configuration(_))
        ));
    }

    #[test]
    fn progress_between_levels() {
        let ladder = LevelLadder::linear(5, 100);
        let progress = ladder.progress(150).unwrap();
        assert_eq!(progress.level, 2);
        assert_eq!(progress.current_level_points, 100);
        assert_eq!(progress.next_level_points, Some(200));
        assert!((progress.progress_to_next() - 0.5).abs() < 0.01);

        let top = ladder.progress(1_000).unwrap();
        assert!(top.is_max_level());
        assert_eq!(top.progress_to_next(), 1.0);
    }
}
