//! Config file discovery and parsing

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::Config;

impl Config {
    /// Get the global config directory (~/.conquest)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".conquest")
    }

    /// Get the global config file path (~/.conquest/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    ///
    /// `.yaml` and `.yml` files are parsed as YAML, everything else as TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        let config: Config = if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        };

        debug!(
            "Loaded {} maneuvers and {} medallions from {}",
            config.maneuver.len(),
            config.medallion.len(),
            path.display()
        );
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for: .conquest/config.toml (preferred), conquest.toml, then the
    /// global config; falls back to an empty config.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(".conquest/config.toml"),
            dir.join("conquest.toml"),
            Self::global_config_path(),
        ];

        for path in candidates {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        debug!("No config file found in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
