//! Shared record types for shot, game, and schedule rows, plus the
//! conversions from raw stats API result sets into those types.
//!
//! Records are plain value types with no back-references; they serialize
//! to the exact JSON shape the cache stores, so a cached file is just a
//! table that can be loaded and inspected directly.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use nbastats_api::types::StatsResponse;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShotChartsError};
use crate::resolve::{PlayerEntry, TeamEntry};

/// Two- or three-point attempt, spelled the way the upstream spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShotType {
    #[default]
    #[serde(rename = "2PT Field Goal")]
    TwoPoint,
    #[serde(rename = "3PT Field Goal")]
    ThreePoint,
}

impl ShotType {
    /// Classifies an upstream or user-supplied label. Anything mentioning
    /// a three counts as a three-pointer; everything else is a two.
    pub fn from_label(label: &str) -> ShotType {
        if label.contains('3') {
            ShotType::ThreePoint
        } else {
            ShotType::TwoPoint
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShotType::TwoPoint => "2PT Field Goal",
            ShotType::ThreePoint => "3PT Field Goal",
        }
    }
}

impl fmt::Display for ShotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attempted field goal with location, outcome, and context.
///
/// Coordinates are court-relative in tenths of feet: x spans the court
/// width around the basket centerline (-250 to 250), y runs from the
/// baseline toward half court. Coordinates and the made flag are always
/// present; the remaining fields default to empty/zero when a source
/// omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub player_id: i64,
    #[serde(default)]
    pub player_name: String,
    /// Three-letter team code, e.g. "SAC".
    #[serde(default)]
    pub team: String,
    /// 1-4 in regulation, 5+ in overtime.
    #[serde(default = "default_period")]
    pub period: u32,
    #[serde(default)]
    pub minutes_remaining: u32,
    #[serde(default)]
    pub seconds_remaining: u32,
    pub shot_made: bool,
    #[serde(default)]
    pub shot_type: ShotType,
    /// Distance from the basket in feet.
    #[serde(default)]
    pub shot_distance: f64,
    pub loc_x: f64,
    pub loc_y: f64,
    #[serde(default)]
    pub shot_zone: String,
    #[serde(default)]
    pub action_type: String,
}

fn default_period() -> u32 {
    1
}

/// Final or scheduled game. Scores are absent until the game has been
/// played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    /// Season label, e.g. "2024-25".
    pub season: String,
}

impl GameRecord {
    /// Builds a completed-game record from a schedule entry, or `None`
    /// if the game has not been played yet.
    pub fn from_schedule(entry: &ScheduleEntry, season: &str) -> Option<GameRecord> {
        entry.result?;
        let points = entry.points?;
        let margin = entry.margin?;
        let opponent_points = (points as i32 - margin).max(0) as u32;
        let (home_team, away_team, home_score, away_score) = if entry.home {
            (
                entry.team.clone(),
                entry.opponent.clone(),
                points,
                opponent_points,
            )
        } else {
            (
                entry.opponent.clone(),
                entry.team.clone(),
                opponent_points,
                points,
            )
        };
        Some(GameRecord {
            game_id: entry.game_id.clone(),
            date: entry.date,
            home_team,
            away_team,
            home_score: Some(home_score),
            away_score: Some(away_score),
            season: season.to_string(),
        })
    }

    pub fn is_completed(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }
}

/// Win or loss from the schedule's perspective team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

impl FromStr for GameResult {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "W" => Ok(GameResult::Win),
            "L" => Ok(GameResult::Loss),
            _ => Err(()),
        }
    }
}

/// One row per team-game pairing. Result, points, and margin are absent
/// for games not yet played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub game_id: String,
    pub date: NaiveDate,
    pub team: String,
    pub opponent: String,
    pub home: bool,
    pub result: Option<GameResult>,
    pub points: Option<u32>,
    /// Point differential; negative for losses.
    pub margin: Option<i32>,
}

/// Extracts shot records from a shot chart response.
///
/// Coordinates and the made flag are mandatory per row; a row without
/// them is a malformed response, not a default. The upstream omits the
/// team abbreviation from shot rows, so it is derived from the team name
/// against the team directory.
pub(crate) fn shots_from_response(
    resp: &StatsResponse,
    teams: &[TeamEntry],
) -> Result<Vec<ShotRecord>> {
    let set = resp
        .result_set("Shot_Chart_Detail")
        .or_else(|| resp.first_result_set())
        .ok_or_else(|| ShotChartsError::MalformedResponse("no result sets".to_string()))?;

    let mut shots = Vec::with_capacity(set.len());
    for (i, row) in set.rows().enumerate() {
        let loc_x = row
            .f64_field("LOC_X")
            .ok_or_else(|| malformed_row(i, "LOC_X"))?;
        let loc_y = row
            .f64_field("LOC_Y")
            .ok_or_else(|| malformed_row(i, "LOC_Y"))?;
        let shot_made = row
            .bool_field("SHOT_MADE_FLAG")
            .ok_or_else(|| malformed_row(i, "SHOT_MADE_FLAG"))?;

        let team = row
            .str_field("TEAM_ABBREVIATION")
            .map(str::to_string)
            .or_else(|| {
                let team_name = row.str_field("TEAM_NAME")?;
                teams
                    .iter()
                    .find(|t| t.name == team_name)
                    .map(|t| t.abbreviation.clone())
            })
            .unwrap_or_default();

        shots.push(ShotRecord {
            game_id: row.str_field("GAME_ID").unwrap_or_default().to_string(),
            player_id: row.i64_field("PLAYER_ID").unwrap_or_default(),
            player_name: row
                .str_field("PLAYER_NAME")
                .unwrap_or_default()
                .to_string(),
            team,
            period: row.u32_field("PERIOD").unwrap_or(1),
            minutes_remaining: row.u32_field("MINUTES_REMAINING").unwrap_or_default(),
            seconds_remaining: row.u32_field("SECONDS_REMAINING").unwrap_or_default(),
            shot_made,
            shot_type: row
                .str_field("SHOT_TYPE")
                .map(ShotType::from_label)
                .unwrap_or_default(),
            shot_distance: row.f64_field("SHOT_DISTANCE").unwrap_or_default(),
            loc_x,
            loc_y,
            shot_zone: row
                .str_field("SHOT_ZONE_BASIC")
                .unwrap_or_default()
                .to_string(),
            action_type: row
                .str_field("ACTION_TYPE")
                .unwrap_or_default()
                .to_string(),
        });
    }
    Ok(shots)
}

/// Extracts schedule entries from a game finder response. Ordering is
/// whatever the upstream sent; callers re-sort.
pub(crate) fn schedule_from_response(resp: &StatsResponse) -> Result<Vec<ScheduleEntry>> {
    let set = resp
        .result_set("LeagueGameFinderResults")
        .or_else(|| resp.first_result_set())
        .ok_or_else(|| ShotChartsError::MalformedResponse("no result sets".to_string()))?;

    let mut entries = Vec::with_capacity(set.len());
    for (i, row) in set.rows().enumerate() {
        let game_id = row
            .str_field("GAME_ID")
            .ok_or_else(|| malformed_row(i, "GAME_ID"))?;
        let date_raw = row
            .str_field("GAME_DATE")
            .ok_or_else(|| malformed_row(i, "GAME_DATE"))?;
        let date = parse_game_date(date_raw).ok_or_else(|| {
            ShotChartsError::MalformedResponse(format!("unparseable GAME_DATE '{date_raw}'"))
        })?;
        let team = row
            .str_field("TEAM_ABBREVIATION")
            .unwrap_or_default()
            .to_string();
        let (home, opponent) = row
            .str_field("MATCHUP")
            .and_then(parse_matchup)
            .unwrap_or((true, String::new()));

        entries.push(ScheduleEntry {
            game_id: game_id.to_string(),
            date,
            team,
            opponent,
            home,
            result: row.str_field("WL").and_then(|s| s.parse().ok()),
            points: row.u32_field("PTS"),
            margin: row.i64_field("PLUS_MINUS").map(|m| m as i32),
        });
    }
    Ok(entries)
}

/// Extracts the player directory from a player index response.
pub(crate) fn players_from_response(resp: &StatsResponse) -> Result<Vec<PlayerEntry>> {
    let set = resp
        .result_set("CommonAllPlayers")
        .or_else(|| resp.first_result_set())
        .ok_or_else(|| ShotChartsError::MalformedResponse("no result sets".to_string()))?;

    let mut players = Vec::with_capacity(set.len());
    for (i, row) in set.rows().enumerate() {
        let id = row
            .i64_field("PERSON_ID")
            .ok_or_else(|| malformed_row(i, "PERSON_ID"))?;
        let name = row
            .str_field("DISPLAY_FIRST_LAST")
            .ok_or_else(|| malformed_row(i, "DISPLAY_FIRST_LAST"))?;
        players.push(PlayerEntry {
            id,
            name: name.to_string(),
        });
    }
    Ok(players)
}

/// Splits a matchup string like "SAC vs. LAL" (home) or "SAC @ LAL"
/// (away) into the home flag and opponent code.
fn parse_matchup(matchup: &str) -> Option<(bool, String)> {
    if let Some((_, opponent)) = matchup.split_once(" vs. ") {
        return Some((true, opponent.trim().to_string()));
    }
    if let Some((_, opponent)) = matchup.split_once(" @ ") {
        return Some((false, opponent.trim().to_string()));
    }
    None
}

/// The upstream writes dates as "2024-10-24" in game logs and "20241024"
/// in shot rows; accept both.
fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
        .ok()
}

fn malformed_row(row: usize, column: &str) -> ShotChartsError {
    ShotChartsError::MalformedResponse(format!("row {row} missing {column}"))
}
