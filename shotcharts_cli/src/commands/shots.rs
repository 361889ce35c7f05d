use anyhow::Result;
use clap::Args;
use shotcharts_lib::resolve;
use shotcharts_lib::season::current_season_label;
use shotcharts_lib::DataClient;

use crate::output::{print_shots, print_summary, OutputFormat};

#[derive(Args)]
pub struct GameShotsArgs {
    /// Game ID, e.g. 0022400061
    pub game_id: String,

    /// Restrict to one team (abbreviation or name)
    #[arg(long)]
    pub team: Option<String>,

    /// Print shooting percentages instead of the shot table
    #[arg(long)]
    pub summary: bool,
}

pub fn run_game(args: &GameShotsArgs, client: &DataClient, format: &OutputFormat) -> Result<()> {
    let team_id = match &args.team {
        Some(team) => Some(resolve::find_team_id(client.teams(), team)?),
        None => None,
    };

    let shots = client.get_game_shots(&args.game_id, team_id)?;
    if args.summary {
        print_summary(&shotcharts_lib::summarize(&shots), format)?;
    } else {
        print_shots(&shots, format)?;
    }
    Ok(())
}

#[derive(Args)]
pub struct PlayerShotsArgs {
    /// Player name; fuzzy matching is applied
    pub name: String,

    /// Season label, e.g. 2024-25. Defaults to the current season
    #[arg(long)]
    pub season: Option<String>,

    /// Print shooting percentages instead of the shot table
    #[arg(long)]
    pub summary: bool,
}

pub fn run_player(
    args: &PlayerShotsArgs,
    client: &DataClient,
    format: &OutputFormat,
) -> Result<()> {
    let season = args
        .season
        .clone()
        .unwrap_or_else(current_season_label);

    let shots = client.get_player_shots(&args.name, &season)?;
    if args.summary {
        print_summary(&shotcharts_lib::summarize(&shots), format)?;
    } else {
        print_shots(&shots, format)?;
    }
    Ok(())
}
