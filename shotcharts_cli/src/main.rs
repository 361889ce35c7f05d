mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shotcharts_lib::{DataClient, FsCache};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "shotcharts")]
#[command(about = "Fetch and inspect basketball shot location data")]
struct Cli {
    /// Output format: table, json, or csv
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Directory for cached API responses
    #[arg(long, default_value = "data/cache", global = true)]
    cache_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shots from a single game
    GameShots(commands::shots::GameShotsArgs),
    /// A player's shots for a season
    PlayerShots(commands::shots::PlayerShotsArgs),
    /// A team's schedule for a season
    Schedule(commands::schedule::ScheduleArgs),
    /// The most recent completed Kings game
    RecentGame(commands::schedule::RecentGameArgs),
    /// Look up players by name
    Players(commands::players::PlayersArgs),
    /// Load, filter, and summarize a local shots CSV
    Load(commands::load::LoadArgs),
    /// Remove every cached API response
    ClearCache,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shotcharts=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        _ => OutputFormat::Table,
    };

    let client = DataClient::new(Box::new(FsCache::new(&cli.cache_dir)))?;

    match &cli.command {
        Commands::GameShots(args) => commands::shots::run_game(args, &client, &format)?,
        Commands::PlayerShots(args) => commands::shots::run_player(args, &client, &format)?,
        Commands::Schedule(args) => commands::schedule::run(args, &client, &format)?,
        Commands::RecentGame(args) => commands::schedule::run_recent(args, &client, &format)?,
        Commands::Players(args) => commands::players::run(args, &client, &format)?,
        Commands::Load(args) => commands::load::run(args, &format)?,
        Commands::ClearCache => {
            let removed = client.clear_cache();
            println!("Removed {removed} cached entries");
        }
    }

    Ok(())
}
