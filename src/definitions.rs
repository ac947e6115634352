//! Maneuver and medallion definitions
//!
//! The [`Registry`] is the catalog an engine instance is configured with:
//! which maneuvers players can execute, what they are worth, which
//! medallions can be earned from them, and the level ladder.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConquestError, Result};
use crate::levels::LevelLadder;

/// A trackable player action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManeuverDefinition {
    pub key: String,
    pub points_per_unit: i64,
}

/// A badge earned by executing maneuvers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedallionDefinition {
    pub key: String,
    /// Can a player be awarded this more than once?
    pub allow_multiple: bool,
    /// Maneuver key -> units required for one medallion
    pub conditions: BTreeMap<String, u32>,
}

impl MedallionDefinition {
    pub fn references(&self, maneuver: &str) -> bool {
        self.conditions.contains_key(maneuver)
    }
}

/// Definitions for one engine instance
#[derive(Debug, Clone, Default)]
pub struct Registry {
    maneuvers: HashMap<String, ManeuverDefinition>,
    medallions: BTreeMap<String, MedallionDefinition>,
    levels: LevelLadder,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a maneuver
    pub fn register_maneuver(&mut self, key: &str, points_per_unit: i64) -> Result<()> {
        if key.is_empty() {
            return Err(ConquestError::config("Maneuver key must not be empty"));
        }

        debug!("Registered maneuver '{}' ({} points)", key, points_per_unit);
        self.maneuvers.insert(
            key.to_string(),
            ManeuverDefinition {
                key: key.to_string(),
                points_per_unit,
            },
        );
        Ok(())
    }

    /// Add or replace a medallion
    ///
    /// Fails if `conditions` is empty, names a maneuver twice, or requires a
    /// zero quantity.
    pub fn register_medallion<K, I>(&mut self, key: &str, allow_multiple: bool, conditions: I) -> Result<()>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, u32)>,
    {
        if key.is_empty() {
            return Err(ConquestError::config("Medallion key must not be empty"));
        }

        let mut collected = BTreeMap::new();
        for (maneuver, qty) in conditions {
            let maneuver: String = maneuver.into();
            if collected.contains_key(&maneuver) {
                return Err(ConquestError::config(format!(
                    "Medallion '{}' lists '{}' more than once",
                    key, maneuver
                )));
            }
            collected.insert(maneuver, qty);
        }
        let conditions = collected;

        if conditions.is_empty() {
            return Err(ConquestError::config(format!(
                "Medallion '{}' must have at least one condition",
                key
            )));
        }
        if let Some((maneuver, _)) = conditions.iter().find(|(_, qty)| **qty == 0) {
            return Err(ConquestError::config(format!(
                "Medallion '{}' requires a positive quantity of '{}'",
                key, maneuver
            )));
        }

        debug!("Registered medallion '{}' ({} conditions)", key, conditions.len());
        self.medallions.insert(
            key.to_string(),
            MedallionDefinition {
                key: key.to_string(),
                allow_multiple,
                conditions,
            },
        );
        Ok(())
    }

    /// Replace the level ladder
    pub fn set_level_thresholds(&mut self, thresholds: Vec<i64>) {
        if thresholds.windows(2).any(|w| w[0] > w[1]) {
            warn!("Level thresholds were not in ascending order, sorting them");
        }
        self.levels = LevelLadder::new(thresholds);
    }

    pub fn set_levels(&mut self, ladder: LevelLadder) {
        self.levels = ladder;
    }

    pub fn maneuver(&self, key: &str) -> Option<&ManeuverDefinition> {
        self.maneuvers.get(key)
    }

    pub fn medallion(&self, key: &str) -> Option<&MedallionDefinition> {
        self.medallions.get(key)
    }

    /// All medallions, ordered by key
    pub fn medallions(&self) -> impl Iterator<Item = &MedallionDefinition> {
        self.medallions.values()
    }

    /// Medallions with a condition on the given maneuver, ordered by key
    pub fn medallions_for_maneuver<'a>(
        &'a self,
        maneuver: &'a str,
    ) -> impl Iterator<Item = &'a MedallionDefinition> + 'a {
        self.medallions.values().filter(move |m| m.references(maneuver))
    }

    pub fn levels(&self) -> &LevelLadder {
        &self.levels
    }

    /// Log conditions that name maneuvers nobody can execute
    pub fn check_references(&self) {
        for medallion in self.medallions.values() {
            for maneuver in medallion.conditions.keys() {
                if !self.maneuvers.contains_key(maneuver) {
                    warn!(
                        "Medallion '{}' depends on unregistered maneuver '{}'",
                        medallion.key, maneuver
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maneuvers_are_upserted() {
        let mut registry = Registry::new();
        registry.register_maneuver("LoadedPage", 1000).unwrap();
        registry.register_maneuver("LoadedPage", 5).unwrap();
        assert_eq!(registry.maneuver("LoadedPage").unwrap().points_per_unit, 5);
        assert!(registry.register_maneuver("", 1).is_err());
    }

    #[test]
    fn medallion_needs_conditions() {
        let mut registry = Registry::new();
        let err = registry
            .register_medallion("Empty", false, Vec::<(String, u32)>::new())
            .unwrap_err();
        assert!(matches!(err, ConquestError::Configuration(_)));

        let err = registry
            .register_medallion("Zero", true, [("LoadedPage", 0)])
            .unwrap_err();
        assert!(matches!(err, ConquestError::Configuration(_)));
        assert!(registry.medallion("Zero").is_none());
    }

    #[test]
    fn duplicate_condition_is_rejected() {
        let mut registry = Registry::new();
        let err = registry
            .register_medallion("Twice", false, [("LoadedPage", 0), ("LoadedPage", 5)])
            .unwrap_err();
        assert!(matches!(err, ConquestError::Configuration(ref m) if m.contains("more than once")));
        assert!(registry.medallion("Twice").is_none());
    }

    #[test]
    fn medallion_reregistration_replaces_conditions() {
        let mut registry = Registry::new();
        registry.register_medallion("Reader", false, [("Read", 5)]).unwrap();
        registry
            .register_medallion("Reader", true, [("Read", 2), ("Comment", 1)])
            .unwrap();

        let reader = registry.medallion("Reader").unwrap();
        assert!(reader.allow_multiple);
        assert_eq!(reader.conditions.len(), 2);
        assert_eq!(reader.conditions["Read"], 2);
    }

    #[test]
    fn medallions_filtered_by_maneuver() {
        let mut registry = Registry::new();
        registry.register_medallion("B", false, [("Read", 1)]).unwrap();
        registry.register_medallion("A", true, [("Read", 2), ("Post", 1)]).unwrap();
        registry.register_medallion("C", true, [("Post", 3)]).unwrap();

        let keys: Vec<_> = registry
            .medallions_for_maneuver("Read")
            .map(|m| m.key.as_str())
            .collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(registry.medallions().count(), 3);
    }

    #[test]
    fn thresholds_are_sorted_on_set() {
        let mut registry = Registry::new();
        registry.set_level_thresholds(vec![30, 10, 20]);
        assert_eq!(registry.levels().thresholds(), &[10, 20, 30]);
    }
}
