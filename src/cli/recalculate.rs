//! Recalculate command implementation

use anyhow::Result;

use super::Options;

/// Rebuild medallions for one player or everyone
pub async fn recalculate_command(opts: &Options, player: Option<&str>) -> Result<()> {
    let battlefield = opts.open_battlefield()?;
    let granted = battlefield.recalculate(player)?;

    let units: u32 = granted.iter().map(|a| a.amount).sum();
    match player {
        Some(p) => println!("Recalculated {}: {} medallions", p, units),
        None => println!("Recalculated all players: {} medallions", units),
    }

    Ok(())
}
