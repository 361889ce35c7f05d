use url::Url;

use super::{common::QueryCommon, Query};

/// Query builder for the player index endpoint, which lists every player
/// known to the league along with their stable numeric identifier.
#[derive(Clone)]
pub struct PlayerIndexQuery {
    pub common: QueryCommon,
    /// Only list players on a current roster. Defaults to true; the full
    /// historical index is an order of magnitude larger.
    pub current_season_only: bool,
}

impl Default for PlayerIndexQuery {
    fn default() -> Self {
        Self {
            common: QueryCommon::default(),
            current_season_only: true,
        }
    }
}

impl Query for PlayerIndexQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        url.query_pairs_mut().append_pair(
            "IsOnlyCurrentSeason",
            if self.current_season_only { "1" } else { "0" },
        );
        url
    }
}

impl PlayerIndexQuery {
    pub fn with_current_season_only(mut self, current_season_only: bool) -> Self {
        self.current_season_only = current_season_only;
        self
    }
}
