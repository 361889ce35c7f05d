use anyhow::Result;
use clap::Args;
use shotcharts_lib::season::current_season_label;
use shotcharts_lib::DataClient;

use crate::output::{print_players, OutputFormat};

#[derive(Args)]
pub struct PlayersArgs {
    /// Name fragment to search for; omit to list the whole directory
    pub name: Option<String>,

    /// Season label, e.g. 2024-25. Defaults to the current season
    #[arg(long)]
    pub season: Option<String>,
}

pub fn run(args: &PlayersArgs, client: &DataClient, format: &OutputFormat) -> Result<()> {
    let season = args
        .season
        .clone()
        .unwrap_or_else(current_season_label);

    let mut players = client.player_directory(&season)?;
    if let Some(name) = &args.name {
        let needle = name.to_lowercase();
        players.retain(|p| p.name.to_lowercase().contains(&needle));
    }
    print_players(&players, format)?;
    Ok(())
}
