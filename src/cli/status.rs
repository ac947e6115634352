//! Read-only commands: status, news, players, levels

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use conquest::LevelProgress;

use super::Options;

#[derive(Serialize)]
struct PlayerStatus {
    player: String,
    points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<LevelProgress>,
    medallions: BTreeMap<String, u32>,
}

/// Show points, level and medallion overview of a player
pub async fn status_command(opts: &Options, player: &str, json: bool) -> Result<()> {
    let battlefield = opts.open_battlefield()?;
    let handle = battlefield.player(player);

    let level = if battlefield.registry().levels().is_empty() {
        None
    } else {
        Some(handle.level_progress()?)
    };

    let status = PlayerStatus {
        player: player.to_string(),
        points: handle.points()?,
        level,
        medallions: handle.medallion_overview()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}: {} points", status.player, status.points);
    if let Some(level) = &status.level {
        match level.next_level_points {
            Some(next) => println!(
                "  Level {} ({:.0}% to level {} at {} points)",
                level.level,
                level.progress_to_next() * 100.0,
                level.level + 1,
                next
            ),
            None => println!("  Level {} (max)", level.level),
        }
    }

    if status.medallions.is_empty() {
        println!("  No medallions yet.");
    } else {
        println!("  Medallions:");
        for (key, amount) in &status.medallions {
            println!("    {} x{}", key, amount);
        }
    }

    Ok(())
}

/// Show and clear medallions the player has not seen yet
pub async fn news_command(opts: &Options, player: &str) -> Result<()> {
    let battlefield = opts.open_battlefield()?;
    let news = battlefield.player(player).new_medallions()?;

    if news.is_empty() {
        println!("No new medallions for {}.", player);
        return Ok(());
    }

    println!("{} just got:", player);
    for (key, amount) in &news {
        println!("  {} x{}", key, amount);
    }

    Ok(())
}

/// List every player with history
pub async fn players_command(opts: &Options) -> Result<()> {
    let battlefield = opts.open_battlefield()?;
    let players = battlefield.players()?;

    if players.is_empty() {
        println!("No players found.");
        return Ok(());
    }

    println!("Players ({}):\n", players.len());
    for player in players {
        println!("  {}", player);
    }

    Ok(())
}

/// Print the configured level ladder
pub async fn levels_command(opts: &Options) -> Result<()> {
    let config = opts.load_config()?;
    let ladder = config.levels.ladder()?;

    if ladder.is_empty() {
        println!("No levels defined.");
        return Ok(());
    }

    println!("Level 1: 0 points");
    for (index, threshold) in ladder.thresholds().iter().enumerate().take(20) {
        println!("Level {}: {} points", index + 2, threshold);
    }
    if ladder.thresholds().len() > 20 {
        println!("... up to level {}", ladder.max_level());
    }

    Ok(())
}
