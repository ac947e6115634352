//! Rows kept by a history store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One executed maneuver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedallionEvent {
    pub player: String,
    pub maneuver: String,
    /// Units executed (defaults to 1)
    pub value: u32,
    /// `value * points_per_unit` at the time of execution
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

/// Units of a medallion granted to a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardRecord {
    pub medallion: String,
    pub player: String,
    pub amount: u32,
    pub created_at: DateTime<Utc>,
    pub user_notified: bool,
}
