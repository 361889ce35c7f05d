//! Caching client over the stats API: resolver, fetcher, and cache
//! composed behind the query operations the rendering layer consumes.
//!
//! Every operation is cache-transparent: a hit returns exactly what the
//! live fetch returned when the entry was written (staleness is the
//! caller's tradeoff), and every miss goes out through the paced,
//! retried fetch layer. Cache entries are written only after a complete
//! successful response, so an interrupted call never leaves a partial
//! entry behind.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::{cache_key, CacheStore};
use crate::error::{Result, ShotChartsError};
use crate::fetch::{FetchError, Fetcher, RetryPolicy};
use crate::records::{self, GameRecord, ScheduleEntry, ShotRecord};
use crate::resolve::{self, NameMatcher, PlayerEntry, TeamEntry};
use crate::season::{current_season_label, validate_season_label};
use nbastats_api::{GameFinderQuery, PlayerIndexQuery, Query, ShotChartQuery};

/// The default team for the recent-game shortcut.
pub const KINGS_ABBREVIATION: &str = "SAC";

/// Client for fetching shot, game, and schedule records.
///
/// Owns its cache store and fetcher; the resolver is stateless. Records
/// come back as plain value types, safe to hand to any consumer.
pub struct DataClient {
    fetcher: Fetcher,
    cache: Box<dyn CacheStore>,
    matcher: NameMatcher,
    teams: Vec<TeamEntry>,
}

impl DataClient {
    /// Creates a client against the production stats API.
    pub fn new(cache: Box<dyn CacheStore>) -> Result<Self> {
        Self::build(Fetcher::new(), cache)
    }

    /// Creates a client with a custom base URL. Used for testing.
    pub fn with_base_url(base_url: &str, cache: Box<dyn CacheStore>) -> Result<Self> {
        Self::build(Fetcher::with_base_url(base_url), cache)
    }

    fn build(fetcher: Fetcher, cache: Box<dyn CacheStore>) -> Result<Self> {
        Ok(Self {
            fetcher,
            cache,
            matcher: NameMatcher::default(),
            teams: resolve::load_team_directory()?,
        })
    }

    /// Overrides the minimum delay between outbound requests.
    pub fn with_min_request_delay(mut self, delay: Duration) -> Self {
        self.fetcher.set_min_delay(delay);
        self
    }

    /// Overrides the retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.fetcher.set_retry_policy(policy);
        self
    }

    /// The embedded team directory.
    pub fn teams(&self) -> &[TeamEntry] {
        &self.teams
    }

    /// All shots from one game, optionally restricted to one team.
    ///
    /// An existing game with no recorded shots is an empty table; only an
    /// HTTP-level not-found becomes [`ShotChartsError::GameNotFound`].
    pub fn get_game_shots(
        &self,
        game_id: &str,
        team_id: Option<i64>,
    ) -> Result<Vec<ShotRecord>> {
        let team_param = team_id
            .map(|t| t.to_string())
            .unwrap_or_else(|| "all".to_string());
        let key = cache_key("game_shots", &[("game", game_id), ("team", &team_param)]);
        self.cached(&key, || {
            let query = ShotChartQuery::default()
                .with_game_id(game_id)
                .with_team_id(team_id.unwrap_or(0));
            let resp = self.fetcher.shot_chart(&query).map_err(|e| match e {
                FetchError::NotFound(_) => {
                    ShotChartsError::GameNotFound(game_id.to_string())
                }
                other => other.into(),
            })?;
            records::shots_from_response(&resp, &self.teams)
        })
    }

    /// A player's shots for a season. The name is resolved against the
    /// season's player directory; resolver errors propagate unchanged.
    pub fn get_player_shots(&self, name: &str, season: &str) -> Result<Vec<ShotRecord>> {
        validate_season_label(season)?;
        let players = self.player_directory(season)?;
        let player = self.matcher.find_player(&players, name)?;
        tracing::debug!("resolved '{}' to {} ({})", name, player.name, player.id);

        let player_param = player.id.to_string();
        let key = cache_key(
            "player_shots",
            &[("player", &player_param), ("season", season)],
        );
        self.cached(&key, || {
            let query = ShotChartQuery::default()
                .with_player_id(player.id)
                .with_season(season);
            let resp = self.fetcher.shot_chart(&query)?;
            records::shots_from_response(&resp, &self.teams)
        })
    }

    /// A team's schedule for a season, ordered by date ascending. The
    /// upstream's ordering is not trusted.
    pub fn get_team_schedule(&self, team: &str, season: &str) -> Result<Vec<ScheduleEntry>> {
        validate_season_label(season)?;
        let team_entry = self.matcher.find_team(&self.teams, team)?;

        let key = cache_key(
            "team_schedule",
            &[("team", &team_entry.abbreviation), ("season", season)],
        );
        let mut schedule: Vec<ScheduleEntry> = self.cached(&key, || {
            let query = GameFinderQuery::default()
                .with_team_id(team_entry.id)
                .with_season(season);
            let resp = self.fetcher.game_log(&query)?;
            records::schedule_from_response(&resp)
        })?;
        schedule.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(schedule)
    }

    /// The most recent completed Kings game of a season (defaults to the
    /// current one). Games without final scores are skipped.
    pub fn get_recent_kings_game(&self, season: Option<&str>) -> Result<GameRecord> {
        let season = season
            .map(str::to_string)
            .unwrap_or_else(current_season_label);
        let schedule = self.get_team_schedule(KINGS_ABBREVIATION, &season)?;
        schedule
            .iter()
            .rev()
            .find_map(|entry| GameRecord::from_schedule(entry, &season))
            .ok_or_else(|| {
                ShotChartsError::GameNotFound(format!(
                    "no completed {KINGS_ABBREVIATION} games in {season}"
                ))
            })
    }

    /// The league player directory for a season, cached like any other
    /// response. Backs name resolution and is public for lookups.
    pub fn player_directory(&self, season: &str) -> Result<Vec<PlayerEntry>> {
        let key = cache_key("player_index", &[("season", season)]);
        self.cached(&key, || {
            let query = PlayerIndexQuery::default().with_season(season);
            let resp = self.fetcher.player_index(&query)?;
            records::players_from_response(&resp)
        })
    }

    /// Removes every cached response, returning how many were removed.
    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    /// Cache-through helper: a readable entry short-circuits the fetch, a
    /// corrupt one degrades to a miss, and a successful fetch is written
    /// back before returning.
    fn cached<T, F>(&self, key: &str, fetch: F) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<Vec<T>>,
    {
        if let Some(payload) = self.cache.get(key) {
            match serde_json::from_str(&payload) {
                Ok(recs) => {
                    tracing::debug!("cache hit for {}", key);
                    return Ok(recs);
                }
                Err(e) => tracing::debug!("discarding corrupt cache entry {}: {}", key, e),
            }
        }
        let recs = fetch()?;
        match serde_json::to_string(&recs) {
            Ok(json) => self.cache.put(key, &json),
            Err(e) => tracing::warn!("failed to serialize cache entry {}: {}", key, e),
        }
        Ok(recs)
    }
}
