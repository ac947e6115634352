//! Configuration loading and management
//!
//! A config file declares the maneuvers, medallions and level ladder of a
//! battlefield, plus a few settings:
//!
//! ```toml
//! [settings]
//! notify_on_recalculate = true
//!
//! [levels]
//! linear = { count = 1000, increment = 10000 }
//!
//! [maneuver.LoadedPage]
//! points = 1000
//!
//! [medallion.PageLoader]
//! allow_multiple = false
//! conditions = { LoadedPage = 20 }
//! ```

mod io;
mod settings;

pub use settings::Settings;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::definitions::Registry;
use crate::error::{ConquestError, Result};
use crate::levels::LevelLadder;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub settings: Settings,

    /// Level ladder
    #[serde(default)]
    pub levels: LevelsConfig,

    /// Maneuver definitions, keyed by maneuver key
    #[serde(default)]
    pub maneuver: BTreeMap<String, ManeuverConfig>,

    /// Medallion definitions, keyed by medallion key
    #[serde(default)]
    pub medallion: BTreeMap<String, MedallionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManeuverConfig {
    /// Points per executed unit
    pub points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedallionConfig {
    #[serde(default)]
    pub allow_multiple: bool,

    /// Maneuver key -> units required per medallion
    #[serde(default)]
    pub conditions: BTreeMap<String, i64>,
}

/// Either explicit thresholds or a linear ladder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelsConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thresholds: Vec<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear: Option<LinearLevels>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinearLevels {
    pub count: u32,
    pub increment: i64,
}

impl LevelsConfig {
    pub fn ladder(&self) -> Result<LevelLadder> {
        match (&self.linear, self.thresholds.is_empty()) {
            (Some(_), false) => Err(ConquestError::config(
                "Use either levels.thresholds or levels.linear, not both",
            )),
            (Some(linear), true) => Ok(LevelLadder::linear(linear.count, linear.increment)),
            (None, _) => Ok(LevelLadder::new(self.thresholds.clone())),
        }
    }
}

impl Config {
    /// Build a validated registry from the declared definitions
    pub fn build_registry(&self) -> Result<Registry> {
        let mut registry = Registry::new();

        for (key, maneuver) in &self.maneuver {
            registry.register_maneuver(key, maneuver.points)?;
        }

        for (key, medallion) in &self.medallion {
            let mut conditions = Vec::with_capacity(medallion.conditions.len());
            for (maneuver, qty) in &medallion.conditions {
                let qty = u32::try_from(*qty).ok().filter(|q| *q > 0).ok_or_else(|| {
                    ConquestError::config(format!(
                        "Medallion '{}' requires a positive quantity of '{}' (got {})",
                        key, maneuver, qty
                    ))
                })?;
                conditions.push((maneuver.as_str(), qty));
            }
            registry.register_medallion(key, medallion.allow_multiple, conditions)?;
        }

        registry.set_levels(self.levels.ladder()?);
        Ok(registry)
    }
}
