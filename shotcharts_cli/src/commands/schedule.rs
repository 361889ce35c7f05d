use anyhow::Result;
use clap::Args;
use shotcharts_lib::season::current_season_label;
use shotcharts_lib::{DataClient, KINGS_ABBREVIATION};

use crate::output::{print_game, print_schedule, OutputFormat};

#[derive(Args)]
pub struct ScheduleArgs {
    /// Team abbreviation or name
    #[arg(default_value = KINGS_ABBREVIATION)]
    pub team: String,

    /// Season label, e.g. 2024-25. Defaults to the current season
    #[arg(long)]
    pub season: Option<String>,
}

pub fn run(args: &ScheduleArgs, client: &DataClient, format: &OutputFormat) -> Result<()> {
    let season = args
        .season
        .clone()
        .unwrap_or_else(current_season_label);

    let schedule = client.get_team_schedule(&args.team, &season)?;
    print_schedule(&schedule, format)?;
    Ok(())
}

#[derive(Args)]
pub struct RecentGameArgs {
    /// Season label, e.g. 2024-25. Defaults to the current season
    #[arg(long)]
    pub season: Option<String>,
}

pub fn run_recent(args: &RecentGameArgs, client: &DataClient, format: &OutputFormat) -> Result<()> {
    let game = client.get_recent_kings_game(args.season.as_deref())?;
    print_game(&game, format)?;
    Ok(())
}
