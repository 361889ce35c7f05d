use url::Url;

use super::{common::QueryCommon, Query};

/// Query builder for the league game finder endpoint, which returns one
/// row per team per game.
#[derive(Default, Clone)]
pub struct GameFinderQuery {
    pub common: QueryCommon,
    /// Restrict results to a single team. `None` returns the whole league.
    pub team_id: Option<i64>,
}

impl Query for GameFinderQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(team_id) = self.team_id {
            url.query_pairs_mut()
                .append_pair("TeamID", &team_id.to_string());
        };
        url
    }
}

impl GameFinderQuery {
    pub fn with_team_id(mut self, team_id: i64) -> Self {
        self.team_id = Some(team_id);
        self
    }
}
