//! Settings configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Config;

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// History database path (defaults to ~/.conquest/history.db)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Show medallions rebuilt by a recalculation as new again
    #[serde(default = "default_notify_on_recalculate")]
    pub notify_on_recalculate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: None,
            notify_on_recalculate: default_notify_on_recalculate(),
        }
    }
}

impl Settings {
    /// Configured database path, or the global default
    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| Config::global_config_dir().join("history.db"))
    }
}

fn default_notify_on_recalculate() -> bool {
    true
}
