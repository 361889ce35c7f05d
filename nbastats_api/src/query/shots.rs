use url::Url;

use super::{common::QueryCommon, Query};

/// Query builder for the shot chart detail endpoint.
///
/// A `team_id` or `player_id` of zero means "all teams" / "all players",
/// which is how the stats API spells an unfiltered query.
#[derive(Default, Clone)]
pub struct ShotChartQuery {
    pub common: QueryCommon,
    pub team_id: i64,
    pub player_id: i64,
    pub game_id: Option<String>,
    pub context_measure: ContextMeasure,
}

impl Query for ShotChartQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        url.query_pairs_mut()
            .append_pair("TeamID", &self.team_id.to_string());
        url.query_pairs_mut()
            .append_pair("PlayerID", &self.player_id.to_string());
        if let Some(game_id) = &self.game_id {
            url.query_pairs_mut().append_pair("GameID", game_id.as_str());
        };
        url.query_pairs_mut()
            .append_pair("ContextMeasure", self.context_measure.as_str());
        url
    }
}

impl ShotChartQuery {
    pub fn with_team_id(mut self, team_id: i64) -> Self {
        self.team_id = team_id;
        self
    }

    pub fn with_player_id(mut self, player_id: i64) -> Self {
        self.player_id = player_id;
        self
    }

    pub fn with_game_id(mut self, game_id: &str) -> Self {
        self.game_id = Some(game_id.to_string());
        self
    }

    pub fn with_context_measure(mut self, context_measure: ContextMeasure) -> Self {
        self.context_measure = context_measure;
        self
    }
}

/// Which statistic the shot chart rows are contextualized against.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum ContextMeasure {
    /// Field goal attempts (made and missed). This is the default.
    #[default]
    FieldGoalsAttempted,
    /// Made field goals only.
    FieldGoalsMade,
    /// Points scored.
    Points,
}

impl ContextMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextMeasure::FieldGoalsAttempted => "FGA",
            ContextMeasure::FieldGoalsMade => "FGM",
            ContextMeasure::Points => "PTS",
        }
    }
}
