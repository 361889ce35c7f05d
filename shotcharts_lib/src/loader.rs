//! CSV ingestion: loading user-supplied shot tables, filtering, and
//! summary statistics.
//!
//! Validation is strict: required columns are reported all at once, and
//! a cell that fails coercion fails the whole load with its column and
//! row named. Rows are never silently dropped. Out-of-range values are
//! only warnings; plotting a weird shot is better than refusing the file.

use std::path::Path;

use crate::error::{Result, ShotChartsError};
use crate::records::{ShotRecord, ShotType};

/// Required columns, with the header aliases accepted for each.
const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("loc_x", &["loc_x", "x"]),
    ("loc_y", &["loc_y", "y"]),
    ("shot_made", &["shot_made", "made"]),
];

/// Loads a shot table from a CSV file.
///
/// The header row is case-insensitive. `loc_x`, `loc_y`, and `shot_made`
/// are required; every other schema column is optional and falls back to
/// its default. Booleans accept true/false, 1/0, yes/no, y/n, and
/// made/missed in any case.
pub fn load_shots_csv(path: impl AsRef<Path>) -> Result<Vec<ShotRecord>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let col = |aliases: &[&str]| {
        aliases
            .iter()
            .find_map(|a| headers.iter().position(|h| h == a))
    };

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|(_, aliases)| col(aliases).is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    let (loc_x_col, loc_y_col, made_col) = match (
        col(REQUIRED_COLUMNS[0].1),
        col(REQUIRED_COLUMNS[1].1),
        col(REQUIRED_COLUMNS[2].1),
    ) {
        (Some(x), Some(y), Some(m)) => (x, y, m),
        _ => return Err(ShotChartsError::MissingColumns(missing)),
    };

    let game_id_col = col(&["game_id"]);
    let player_id_col = col(&["player_id"]);
    let player_name_col = col(&["player_name"]);
    let team_col = col(&["team"]);
    let period_col = col(&["period"]);
    let minutes_col = col(&["minutes_remaining"]);
    let seconds_col = col(&["seconds_remaining"]);
    let shot_type_col = col(&["shot_type"]);
    let distance_col = col(&["shot_distance"]);
    let zone_col = col(&["shot_zone"]);
    let action_col = col(&["action_type"]);

    let mut shots = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let cell = |idx: Option<usize>| {
            idx.and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan"))
        };

        let loc_x = parse_f64("loc_x", row, cell(Some(loc_x_col)).unwrap_or(""))?;
        let loc_y = parse_f64("loc_y", row, cell(Some(loc_y_col)).unwrap_or(""))?;
        let shot_made = parse_bool("shot_made", row, cell(Some(made_col)).unwrap_or(""))?;

        shots.push(ShotRecord {
            game_id: cell(game_id_col).unwrap_or_default().to_string(),
            player_id: match cell(player_id_col) {
                Some(raw) => parse_i64("player_id", row, raw)?,
                None => 0,
            },
            player_name: cell(player_name_col).unwrap_or_default().to_string(),
            team: cell(team_col).unwrap_or_default().to_string(),
            period: match cell(period_col) {
                Some(raw) => parse_u32("period", row, raw)?,
                None => 1,
            },
            minutes_remaining: match cell(minutes_col) {
                Some(raw) => parse_u32("minutes_remaining", row, raw)?,
                None => 0,
            },
            seconds_remaining: match cell(seconds_col) {
                Some(raw) => parse_u32("seconds_remaining", row, raw)?,
                None => 0,
            },
            shot_made,
            shot_type: cell(shot_type_col)
                .map(ShotType::from_label)
                .unwrap_or_default(),
            shot_distance: match cell(distance_col) {
                Some(raw) => parse_f64("shot_distance", row, raw)?,
                None => 0.0,
            },
            loc_x,
            loc_y,
            shot_zone: cell(zone_col).unwrap_or_default().to_string(),
            action_type: cell(action_col).unwrap_or_default().to_string(),
        });
    }

    if shots.is_empty() {
        return Err(ShotChartsError::InvalidInput(format!(
            "{} has no data rows",
            path.display()
        )));
    }

    for warning in range_warnings(&shots) {
        tracing::warn!("{}: {}", path.display(), warning);
    }

    Ok(shots)
}

fn parse_f64(column: &str, row: usize, value: &str) -> Result<f64> {
    value
        .parse()
        .map_err(|_| invalid(column, row, value, "float"))
}

fn parse_i64(column: &str, row: usize, value: &str) -> Result<i64> {
    value
        .parse()
        .map_err(|_| invalid(column, row, value, "integer"))
}

fn parse_u32(column: &str, row: usize, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| invalid(column, row, value, "non-negative integer"))
}

fn parse_bool(column: &str, row: usize, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "made" => Ok(true),
        "false" | "0" | "no" | "n" | "missed" => Ok(false),
        _ => Err(invalid(column, row, value, "boolean")),
    }
}

fn invalid(column: &str, row: usize, value: &str, expected: &'static str) -> ShotChartsError {
    ShotChartsError::InvalidDataType {
        column: column.to_string(),
        row,
        value: value.to_string(),
        expected,
    }
}

/// Non-fatal sanity checks on loaded values: period, clock, distance,
/// and court bounds.
fn range_warnings(shots: &[ShotRecord]) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut warn_count = |count: usize, what: &str| {
        if count > 0 {
            warnings.push(format!("{count} shots with {what}"));
        }
    };

    warn_count(
        shots
            .iter()
            .filter(|s| s.period == 0 || s.period > 10)
            .count(),
        "unusual period values",
    );
    warn_count(
        shots.iter().filter(|s| s.minutes_remaining > 12).count(),
        "minutes outside the 0-12 range",
    );
    warn_count(
        shots.iter().filter(|s| s.seconds_remaining > 59).count(),
        "seconds outside the 0-59 range",
    );
    warn_count(
        shots
            .iter()
            .filter(|s| s.shot_distance < 0.0 || s.shot_distance > 50.0)
            .count(),
        "distance outside 0-50 feet",
    );
    warn_count(
        shots.iter().filter(|s| s.loc_x.abs() > 300.0).count(),
        "loc_x outside court bounds",
    );
    warn_count(
        shots
            .iter()
            .filter(|s| s.loc_y < -100.0 || s.loc_y > 500.0)
            .count(),
        "loc_y outside court bounds",
    );
    warnings
}

/// Conjunctive filter criteria over a shot table.
///
/// Built either through the typed `with_*` methods or from stringly
/// `key=value` CLI input via [`ShotFilter::with_criterion`], where an
/// unknown key is an error rather than a silently ignored filter.
#[derive(Debug, Clone, Default)]
pub struct ShotFilter {
    /// Case-insensitive substring of the player name.
    pub player_name: Option<String>,
    pub player_id: Option<i64>,
    pub game_id: Option<String>,
    pub team: Option<String>,
    pub period: Option<u32>,
    pub shot_type: Option<ShotType>,
    pub made: Option<bool>,
    pub min_distance: Option<f64>,
    pub max_distance: Option<f64>,
}

impl ShotFilter {
    pub fn with_player_name(mut self, name: &str) -> Self {
        self.player_name = Some(name.to_string());
        self
    }

    pub fn with_team(mut self, team: &str) -> Self {
        self.team = Some(team.to_string());
        self
    }

    pub fn with_period(mut self, period: u32) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_shot_type(mut self, shot_type: ShotType) -> Self {
        self.shot_type = Some(shot_type);
        self
    }

    pub fn with_made(mut self, made: bool) -> Self {
        self.made = Some(made);
        self
    }

    /// Applies one `key=value` criterion from CLI input.
    pub fn with_criterion(mut self, key: &str, value: &str) -> Result<Self> {
        let bad_value = |expected: &str| {
            ShotChartsError::InvalidInput(format!(
                "filter '{key}' expects {expected}, got '{value}'"
            ))
        };
        match key {
            "player" | "player_name" => self.player_name = Some(value.to_string()),
            "player_id" => {
                self.player_id = Some(value.parse().map_err(|_| bad_value("an integer"))?)
            }
            "game" | "game_id" => self.game_id = Some(value.to_string()),
            "team" => self.team = Some(value.to_string()),
            "period" => {
                self.period = Some(value.parse().map_err(|_| bad_value("an integer"))?)
            }
            "type" | "shot_type" => {
                self.shot_type = Some(match value.to_lowercase().as_str() {
                    "2" | "2pt" | "two" => ShotType::TwoPoint,
                    "3" | "3pt" | "three" => ShotType::ThreePoint,
                    _ => return Err(bad_value("2pt or 3pt")),
                })
            }
            "made" => {
                self.made = Some(match value.to_lowercase().as_str() {
                    "true" | "1" | "yes" => true,
                    "false" | "0" | "no" => false,
                    _ => return Err(bad_value("a boolean")),
                })
            }
            "min_distance" => {
                self.min_distance = Some(value.parse().map_err(|_| bad_value("a number"))?)
            }
            "max_distance" => {
                self.max_distance = Some(value.parse().map_err(|_| bad_value("a number"))?)
            }
            _ => {
                return Err(ShotChartsError::InvalidInput(format!(
                    "unknown filter '{key}'; expected one of: player, player_id, game_id, \
                     team, period, shot_type, made, min_distance, max_distance"
                )))
            }
        }
        Ok(self)
    }

    fn matches(&self, shot: &ShotRecord) -> bool {
        if let Some(name) = &self.player_name {
            if !shot
                .player_name
                .to_lowercase()
                .contains(&name.to_lowercase())
            {
                return false;
            }
        }
        if let Some(id) = self.player_id {
            if shot.player_id != id {
                return false;
            }
        }
        if let Some(game_id) = &self.game_id {
            if &shot.game_id != game_id {
                return false;
            }
        }
        if let Some(team) = &self.team {
            if !shot.team.eq_ignore_ascii_case(team) {
                return false;
            }
        }
        if let Some(period) = self.period {
            if shot.period != period {
                return false;
            }
        }
        if let Some(shot_type) = self.shot_type {
            if shot.shot_type != shot_type {
                return false;
            }
        }
        if let Some(made) = self.made {
            if shot.shot_made != made {
                return false;
            }
        }
        if let Some(min) = self.min_distance {
            if shot.shot_distance < min {
                return false;
            }
        }
        if let Some(max) = self.max_distance {
            if shot.shot_distance > max {
                return false;
            }
        }
        true
    }
}

/// Returns the shots matching every criterion in `filter`.
pub fn filter_shots(shots: &[ShotRecord], filter: &ShotFilter) -> Vec<ShotRecord> {
    shots
        .iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect()
}

/// Shooting summary for a table of shots.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ShotSummary {
    pub total_shots: usize,
    pub made_shots: usize,
    pub missed_shots: usize,
    pub fg_pct: f64,
    pub two_pt_made: usize,
    pub two_pt_total: usize,
    pub two_pt_pct: f64,
    pub three_pt_made: usize,
    pub three_pt_total: usize,
    pub three_pt_pct: f64,
    pub unique_players: usize,
    pub unique_games: usize,
}

/// Computes field-goal percentages and per-type breakdowns. An empty
/// table (or empty breakdown) is 0%, never a division fault.
pub fn summarize(shots: &[ShotRecord]) -> ShotSummary {
    let total_shots = shots.len();
    let made_shots = shots.iter().filter(|s| s.shot_made).count();

    let twos: Vec<&ShotRecord> = shots
        .iter()
        .filter(|s| s.shot_type == ShotType::TwoPoint)
        .collect();
    let threes: Vec<&ShotRecord> = shots
        .iter()
        .filter(|s| s.shot_type == ShotType::ThreePoint)
        .collect();
    let two_pt_made = twos.iter().filter(|s| s.shot_made).count();
    let three_pt_made = threes.iter().filter(|s| s.shot_made).count();

    let unique = |key: fn(&ShotRecord) -> &str| {
        let mut values: Vec<&str> = shots.iter().map(key).filter(|v| !v.is_empty()).collect();
        values.sort_unstable();
        values.dedup();
        values.len()
    };

    ShotSummary {
        total_shots,
        made_shots,
        missed_shots: total_shots - made_shots,
        fg_pct: pct(made_shots, total_shots),
        two_pt_made,
        two_pt_total: twos.len(),
        two_pt_pct: pct(two_pt_made, twos.len()),
        three_pt_made,
        three_pt_total: threes.len(),
        three_pt_pct: pct(three_pt_made, threes.len()),
        unique_players: unique(|s| &s.player_name),
        unique_games: unique(|s| &s.game_id),
    }
}

fn pct(made: usize, attempted: usize) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        made as f64 / attempted as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn shot(player: &str, shot_type: ShotType, made: bool) -> ShotRecord {
        ShotRecord {
            game_id: "0022400061".to_string(),
            player_id: 1,
            player_name: player.to_string(),
            team: "SAC".to_string(),
            period: 1,
            minutes_remaining: 5,
            seconds_remaining: 30,
            shot_made: made,
            shot_type,
            shot_distance: 10.0,
            loc_x: 0.0,
            loc_y: 100.0,
            shot_zone: String::new(),
            action_type: String::new(),
        }
    }

    #[test]
    fn loads_minimal_two_row_file() {
        let file = write_csv("loc_x,loc_y,shot_made\n0,50,true\n-200,20,false\n");
        let shots = load_shots_csv(file.path()).unwrap();
        assert_eq!(shots.len(), 2);
        assert_eq!(shots[0].loc_x, 0.0);
        assert_eq!(shots[0].loc_y, 50.0);
        assert!(shots[0].shot_made);
        assert!(!shots[1].shot_made);

        let summary = summarize(&shots);
        assert_eq!(summary.fg_pct, 0.5);
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let file = write_csv("loc_y,team\n50,SAC\n");
        let err = load_shots_csv(file.path()).unwrap_err();
        match err {
            ShotChartsError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["loc_x".to_string(), "shot_made".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other}"),
        }
    }

    #[test]
    fn header_aliases_are_accepted() {
        let file = write_csv("x,y,made\n12,34,1\n");
        let shots = load_shots_csv(file.path()).unwrap();
        assert_eq!(shots[0].loc_x, 12.0);
        assert!(shots[0].shot_made);
    }

    #[test]
    fn bad_cell_fails_the_whole_load() {
        let file = write_csv("loc_x,loc_y,shot_made\n0,50,true\nnot_a_number,20,false\n");
        let err = load_shots_csv(file.path()).unwrap_err();
        match err {
            ShotChartsError::InvalidDataType { column, row, .. } => {
                assert_eq!(column, "loc_x");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidDataType, got {other}"),
        }
    }

    #[test]
    fn boolean_spellings() {
        let file = write_csv(
            "loc_x,loc_y,shot_made\n0,1,TRUE\n0,2,0\n0,3,Yes\n0,4,n\n0,5,made\n0,6,missed\n",
        );
        let shots = load_shots_csv(file.path()).unwrap();
        let made: Vec<bool> = shots.iter().map(|s| s.shot_made).collect();
        assert_eq!(made, vec![true, false, true, false, true, false]);
    }

    #[test]
    fn unparseable_boolean_is_invalid() {
        let file = write_csv("loc_x,loc_y,shot_made\n0,50,perhaps\n");
        let err = load_shots_csv(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ShotChartsError::InvalidDataType { row: 1, .. }
        ));
    }

    #[test]
    fn optional_columns_fill_defaults() {
        let file = write_csv(
            "loc_x,loc_y,shot_made,player_name,shot_type,period\n\
             -10,42,1,De'Aaron Fox,3PT Field Goal,2\n",
        );
        let shots = load_shots_csv(file.path()).unwrap();
        assert_eq!(shots[0].player_name, "De'Aaron Fox");
        assert_eq!(shots[0].shot_type, ShotType::ThreePoint);
        assert_eq!(shots[0].period, 2);
        assert_eq!(shots[0].team, "");
        assert_eq!(shots[0].shot_distance, 0.0);
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = write_csv("loc_x,loc_y,shot_made\n");
        let err = load_shots_csv(file.path()).unwrap_err();
        assert!(matches!(err, ShotChartsError::InvalidInput(_)));
    }

    #[test]
    fn summarize_empty_table_is_zero_percent() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_shots, 0);
        assert_eq!(summary.fg_pct, 0.0);
        assert_eq!(summary.two_pt_pct, 0.0);
        assert_eq!(summary.three_pt_pct, 0.0);
    }

    #[test]
    fn summarize_breaks_down_by_shot_type() {
        let shots = vec![
            shot("Fox", ShotType::TwoPoint, true),
            shot("Fox", ShotType::TwoPoint, false),
            shot("Fox", ShotType::ThreePoint, true),
            shot("Sabonis", ShotType::ThreePoint, true),
        ];
        let summary = summarize(&shots);
        assert_eq!(summary.total_shots, 4);
        assert_eq!(summary.made_shots, 3);
        assert_eq!(summary.two_pt_total, 2);
        assert_eq!(summary.two_pt_pct, 0.5);
        assert_eq!(summary.three_pt_total, 2);
        assert_eq!(summary.three_pt_pct, 1.0);
        assert_eq!(summary.unique_players, 2);
        assert_eq!(summary.unique_games, 1);
    }

    #[test]
    fn filters_apply_conjunctively() {
        let shots = vec![
            shot("De'Aaron Fox", ShotType::TwoPoint, true),
            shot("De'Aaron Fox", ShotType::ThreePoint, false),
            shot("Domantas Sabonis", ShotType::TwoPoint, true),
        ];
        let filter = ShotFilter::default()
            .with_player_name("fox")
            .with_made(true);
        let matched = filter_shots(&shots, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].shot_type, ShotType::TwoPoint);
    }

    #[test]
    fn criterion_parsing_round_trip() {
        let filter = ShotFilter::default()
            .with_criterion("team", "SAC")
            .unwrap()
            .with_criterion("period", "4")
            .unwrap()
            .with_criterion("type", "3pt")
            .unwrap()
            .with_criterion("made", "yes")
            .unwrap();
        assert_eq!(filter.team.as_deref(), Some("SAC"));
        assert_eq!(filter.period, Some(4));
        assert_eq!(filter.shot_type, Some(ShotType::ThreePoint));
        assert_eq!(filter.made, Some(true));
    }

    #[test]
    fn unknown_criterion_is_an_error() {
        let err = ShotFilter::default()
            .with_criterion("quarter", "4")
            .unwrap_err();
        match err {
            ShotChartsError::InvalidInput(msg) => assert!(msg.contains("unknown filter")),
            other => panic!("expected InvalidInput, got {other}"),
        }
    }

    #[test]
    fn bad_criterion_value_is_an_error() {
        assert!(ShotFilter::default()
            .with_criterion("period", "fourth")
            .is_err());
        assert!(ShotFilter::default()
            .with_criterion("type", "dunk")
            .is_err());
    }

    #[test]
    fn distance_range_criteria() {
        let mut near = shot("Fox", ShotType::TwoPoint, true);
        near.shot_distance = 2.0;
        let mut far = shot("Fox", ShotType::ThreePoint, false);
        far.shot_distance = 27.0;

        let filter = ShotFilter::default()
            .with_criterion("min_distance", "20")
            .unwrap();
        let matched = filter_shots(&[near, far], &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].shot_distance, 27.0);
    }
}
