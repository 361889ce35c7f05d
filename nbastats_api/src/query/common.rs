//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields, and [`SeasonType`].

use std::str::FromStr;

use url::Url;

/// Trait implemented by all query builders. Provides URL serialization and
/// shared builder methods for the league, season, and season type parameters.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the season label (e.g. "2024-25").
    fn with_season(mut self, season: &str) -> Self
    where
        Self: Sized,
    {
        self.get_common().season = Some(season.to_string());
        self
    }

    /// Sets the season type (regular season or playoffs).
    fn with_season_type(mut self, season_type: SeasonType) -> Self
    where
        Self: Sized,
    {
        self.get_common().season_type = season_type;
        self
    }
}

/// Which portion of a season to query.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum SeasonType {
    /// Regular season games. This is the default.
    #[default]
    RegularSeason,
    /// Playoff games.
    Playoffs,
}

impl SeasonType {
    /// The exact parameter value the stats API expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonType::RegularSeason => "Regular Season",
            SeasonType::Playoffs => "Playoffs",
        }
    }
}

impl FromStr for SeasonType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" | "regular-season" => Ok(SeasonType::RegularSeason),
            "playoffs" => Ok(SeasonType::Playoffs),
            _ => Err(()),
        }
    }
}

/// Fields shared by all query types: league, season label, and season type.
#[derive(Clone)]
pub struct QueryCommon {
    /// League identifier. "00" is the NBA.
    pub league_id: String,
    /// Season label (e.g. "2024-25"). `None` lets the API pick its default.
    pub season: Option<String>,
    /// Regular season or playoffs. Defaults to regular season.
    pub season_type: SeasonType,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            league_id: "00".to_string(),
            season: None,
            season_type: SeasonType::default(),
        }
    }
}

impl QueryCommon {
    /// Appends the common league and season parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("LeagueID", &self.league_id);
        if let Some(season) = &self.season {
            url.query_pairs_mut().append_pair("Season", season);
        };
        url.query_pairs_mut()
            .append_pair("SeasonType", self.season_type.as_str());
        url
    }
}
