use anyhow::Result;
use serde::Serialize;
use shotcharts_lib::{GameRecord, GameResult, PlayerEntry, ScheduleEntry, ShotRecord, ShotSummary};
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Tabled, Serialize)]
struct ShotRow {
    #[tabled(rename = "Game")]
    #[serde(rename = "Game")]
    game_id: String,
    #[tabled(rename = "Player")]
    #[serde(rename = "Player")]
    player: String,
    #[tabled(rename = "Team")]
    #[serde(rename = "Team")]
    team: String,
    #[tabled(rename = "Period")]
    #[serde(rename = "Period")]
    period: u32,
    #[tabled(rename = "Clock")]
    #[serde(rename = "Clock")]
    clock: String,
    #[tabled(rename = "Made")]
    #[serde(rename = "Made")]
    made: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    shot_type: String,
    #[tabled(rename = "Dist (ft)")]
    #[serde(rename = "Dist (ft)")]
    distance: f64,
    #[tabled(rename = "X")]
    #[serde(rename = "X")]
    loc_x: f64,
    #[tabled(rename = "Y")]
    #[serde(rename = "Y")]
    loc_y: f64,
    #[tabled(rename = "Zone")]
    #[serde(rename = "Zone")]
    zone: String,
}

#[derive(Tabled, Serialize)]
struct ScheduleRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Game")]
    #[serde(rename = "Game")]
    game_id: String,
    #[tabled(rename = "Matchup")]
    #[serde(rename = "Matchup")]
    matchup: String,
    #[tabled(rename = "Result")]
    #[serde(rename = "Result")]
    result: String,
    #[tabled(rename = "Points")]
    #[serde(rename = "Points")]
    points: String,
    #[tabled(rename = "Margin")]
    #[serde(rename = "Margin")]
    margin: String,
}

#[derive(Tabled, Serialize)]
struct PlayerRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
}

// -- Row builders --

fn build_shot_rows(shots: &[ShotRecord]) -> Vec<ShotRow> {
    shots
        .iter()
        .map(|s| ShotRow {
            game_id: s.game_id.clone(),
            player: s.player_name.clone(),
            team: s.team.clone(),
            period: s.period,
            clock: format!("{}:{:02}", s.minutes_remaining, s.seconds_remaining),
            made: if s.shot_made { "Y" } else { "N" }.to_string(),
            shot_type: s.shot_type.to_string(),
            distance: s.shot_distance,
            loc_x: s.loc_x,
            loc_y: s.loc_y,
            zone: s.shot_zone.clone(),
        })
        .collect()
}

fn build_schedule_rows(entries: &[ScheduleEntry]) -> Vec<ScheduleRow> {
    entries
        .iter()
        .map(|e| ScheduleRow {
            date: e.date.to_string(),
            game_id: e.game_id.clone(),
            matchup: format!(
                "{} {} {}",
                e.team,
                if e.home { "vs." } else { "@" },
                e.opponent
            ),
            result: match e.result {
                Some(GameResult::Win) => "W".to_string(),
                Some(GameResult::Loss) => "L".to_string(),
                None => "-".to_string(),
            },
            points: e.points.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
            margin: e.margin.map(|m| m.to_string()).unwrap_or_else(|| "-".into()),
        })
        .collect()
}

fn build_player_rows(players: &[PlayerEntry]) -> Vec<PlayerRow> {
    players
        .iter()
        .map(|p| PlayerRow {
            id: p.id,
            name: p.name.clone(),
        })
        .collect()
}

// -- Shots --

pub fn print_shots(shots: &[ShotRecord], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(build_shot_rows(shots))),
        OutputFormat::Json => print_json(&shots),
        OutputFormat::Csv => print_csv(build_shot_rows(shots))?,
    }
    Ok(())
}

// -- Schedule --

pub fn print_schedule(entries: &[ScheduleEntry], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(build_schedule_rows(entries))),
        OutputFormat::Json => print_json(&entries),
        OutputFormat::Csv => print_csv(build_schedule_rows(entries))?,
    }
    Ok(())
}

// -- Games --

pub fn print_game(game: &GameRecord, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(game),
        _ => {
            let score = match (game.home_score, game.away_score) {
                (Some(home), Some(away)) => format!("{home}-{away}"),
                _ => "not played".to_string(),
            };
            println!(
                "{} {} vs. {} {} ({})",
                game.date, game.home_team, game.away_team, score, game.game_id
            );
        }
    }
    Ok(())
}

// -- Players --

pub fn print_players(players: &[PlayerEntry], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(build_player_rows(players))),
        OutputFormat::Json => print_json(&players),
        OutputFormat::Csv => print_csv(build_player_rows(players))?,
    }
    Ok(())
}

// -- Summary --

pub fn print_summary(summary: &ShotSummary, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(summary),
        _ => {
            println!(
                "Shots: {} ({} made, {} missed)",
                summary.total_shots, summary.made_shots, summary.missed_shots
            );
            println!("FG%:   {:.1}%", summary.fg_pct * 100.0);
            println!(
                "2PT:   {}/{} ({:.1}%)",
                summary.two_pt_made,
                summary.two_pt_total,
                summary.two_pt_pct * 100.0
            );
            println!(
                "3PT:   {}/{} ({:.1}%)",
                summary.three_pt_made,
                summary.three_pt_total,
                summary.three_pt_pct * 100.0
            );
            println!(
                "Players: {}  Games: {}",
                summary.unique_players, summary.unique_games
            );
        }
    }
    Ok(())
}

fn print_csv<T: Serialize>(rows: Vec<T>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}
