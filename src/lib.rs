//! Conquest - track player achievements
//!
//! Players execute *maneuvers* (tracked actions worth points). Points add up
//! to levels, and accumulated maneuvers earn *medallions*: badges defined by
//! one or more maneuver quantities.
//!
//! ## Pieces
//!
//! 1. **Definitions**: a [`Registry`] of maneuvers, medallions and the level
//!    ladder, built in code or from a [`Config`] file.
//!
//! 2. **History**: a [`HistoryStore`] keeping the raw event log and the
//!    awarded medallions ([`SqliteStore`] on disk, [`MemoryStore`] in process).
//!
//! 3. **Engine**: a [`Battlefield`] owning both, deciding awards and handing
//!    out [`Player`] handles.

pub mod config;
pub mod definitions;
pub mod engine;
pub mod error;
pub mod levels;
pub mod store;

pub use config::{Config, Settings};
pub use definitions::{ManeuverDefinition, MedallionDefinition, Registry};
pub use engine::{Battlefield, ManeuverOutcome, Player};
pub use error::{ConquestError, Result};
pub use levels::{linear_levels, LevelLadder, LevelProgress, LevelUp};
pub use store::{AwardRecord, HistoryStore, MedallionEvent, MemoryStore, SqliteStore, StoreError};
