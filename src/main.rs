use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "conquest")]
#[command(about = "Conquest - track player maneuvers, points, levels and medallions")]
#[command(version)]
struct Cli {
    /// Project directory to look for config in (defaults to current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Path to the config file (defaults to .conquest/config.toml in the project)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the history database (overrides settings.database)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new .conquest/config.toml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Record a maneuver for a player
    Execute {
        player: String,
        maneuver: String,

        /// Units to record
        #[arg(long, default_value_t = 1)]
        value: u32,
    },

    /// Show points, level and medallions of a player
    Status {
        player: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show medallions awarded since the last check (and mark them seen)
    News { player: String },

    /// Rebuild medallions from history (all players unless one is given)
    Recalculate { player: Option<String> },

    /// List players with recorded maneuvers
    Players,

    /// Show the level ladder
    Levels,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let work_dir = cli.path.unwrap_or_else(|| PathBuf::from("."));
    let opts = cli::Options {
        work_dir,
        config: cli.config,
        db: cli.db,
    };

    match cli.command {
        Commands::Init { force } => {
            cli::init::init_command(&opts.work_dir, force).await?;
        }
        Commands::Execute {
            player,
            maneuver,
            value,
        } => {
            cli::execute::execute_command(&opts, &player, &maneuver, value).await?;
        }
        Commands::Status { player, json } => {
            cli::status::status_command(&opts, &player, json).await?;
        }
        Commands::News { player } => {
            cli::status::news_command(&opts, &player).await?;
        }
        Commands::Recalculate { player } => {
            cli::recalculate::recalculate_command(&opts, player.as_deref()).await?;
        }
        Commands::Players => {
            cli::status::players_command(&opts).await?;
        }
        Commands::Levels => {
            cli::status::levels_command(&opts).await?;
        }
    }

    Ok(())
}
