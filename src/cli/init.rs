//! Init command implementation

use anyhow::{bail, Result};
use std::path::Path;
use tracing::info;

/// Default configuration content for conquest init
pub const DEFAULT_CONFIG: &str = r#"# Conquest Configuration
# ======================
#
# Maneuvers are the actions you track. Medallions are earned from them.

# ============================================================================
# SETTINGS
# ============================================================================
#
# Available options:
#   database              - History database path (default: ~/.conquest/history.db)
#   notify_on_recalculate - Show rebuilt medallions as new again (default: true)

[settings]
notify_on_recalculate = true

# ============================================================================
# LEVELS
# ============================================================================
#
# Every player starts at level 1. Either list the points needed for level 2,
# level 3, ... or generate an evenly spaced ladder:
#
#   thresholds = [10000, 20000, 40000]

[levels]
linear = { count = 1000, increment = 10000 }

# ============================================================================
# MANEUVERS - points given per executed unit
# ============================================================================

[maneuver.LoadedPage]
points = 1000

# ============================================================================
# MEDALLIONS
# ============================================================================
#
# Available options:
#   allow_multiple - Can a player earn this more than once? (default: false)
#   conditions     - Maneuver units needed for one medallion. With several
#                    conditions all must be met; the slowest one counts.

[medallion.PageLoader]
allow_multiple = false
conditions = { LoadedPage = 20 }

[medallion.SiteLoader]
allow_multiple = true
conditions = { LoadedPage = 5 }
"#;

/// Write a sample config to .conquest/config.toml
pub async fn init_command(work_dir: &Path, force: bool) -> Result<()> {
    let config_dir = work_dir.join(".conquest");
    let config_path = config_dir.join("config.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    info!("Created configuration file: {}", config_path.display());
    println!("Created {}", config_path.display());

    Ok(())
}
