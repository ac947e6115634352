//! CLI command implementations

pub mod execute;
pub mod init;
pub mod recalculate;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};

use conquest::{Battlefield, Config, SqliteStore};

/// Global options shared by every command
pub struct Options {
    pub work_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
}

impl Options {
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::from_file(path),
            None => Config::from_dir(&self.work_dir),
        }
    }

    /// Load the config and open the history database it points to
    pub fn open_battlefield(&self) -> Result<Battlefield<SqliteStore>> {
        let config = self.load_config()?;
        let registry = config
            .build_registry()
            .context("Invalid maneuver/medallion definitions")?;

        let db_path = self
            .db
            .clone()
            .unwrap_or_else(|| config.settings.database_path());
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open history db: {}", db_path.display()))?;

        Ok(Battlefield::new(registry, store)
            .with_notify_on_recalculate(config.settings.notify_on_recalculate))
    }
}
