//! Execute command implementation

use anyhow::Result;

use super::Options;

/// Record a maneuver and report what it earned
pub async fn execute_command(opts: &Options, player: &str, maneuver: &str, value: u32) -> Result<()> {
    let battlefield = opts.open_battlefield()?;
    let outcome = battlefield.player(player).execute(maneuver, value, None)?;

    println!(
        "{} executed {} x{} (+{} points)",
        player, maneuver, value, outcome.event.points
    );

    for award in &outcome.awards {
        println!("  Medallion earned: {} x{}", award.medallion, award.amount);
    }

    if let Some(level_up) = outcome.level_up {
        println!(
            "  Level up: {} -> {}",
            level_up.old_level, level_up.new_level
        );
    }

    Ok(())
}
