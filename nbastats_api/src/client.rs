//! HTTP client for the NBA Stats API.

use std::time::Duration;

use url::Url;

use crate::{
    query::{GameFinderQuery, PlayerIndexQuery, Query, ShotChartQuery},
    types::StatsResponse,
    user_agent::get_user_agent,
    Error,
};

/// Blocking HTTP client for the NBA Stats API.
///
/// Sends requests with browser-like headers and a randomized user agent;
/// the stats service rejects requests without them. Each request builds a
/// fresh `reqwest` blocking client with a 30-second timeout.
pub struct Client {
    /// Base URL for the API. Defaults to `https://stats.nba.com`.
    base_api_url: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production stats API.
    pub fn new() -> Self {
        Self {
            base_api_url: "https://stats.nba.com".to_string(),
        }
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.to_string(),
        }
    }

    fn get_url(&self, path: &str, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(query.add_to_url(&url))
    }

    fn get<Q>(&self, path: &str, query: &Q) -> Result<StatsResponse, Error>
    where
        Q: Query,
    {
        let url = self.get_url(path, query)?;
        let client = reqwest::blocking::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let resp = client
            .get(url)
            .header("accept", "application/json, text/plain, */*")
            .header("accept-language", "en-US,en;q=0.9")
            .header("origin", "https://www.nba.com")
            .header("referer", "https://www.nba.com/")
            .header("x-nba-stats-origin", "stats")
            .header("x-nba-stats-token", "true")
            .send()
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<StatsResponse>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        Ok(parsed)
    }

    /// Fetches shot chart rows matching the given query.
    pub fn get_shot_chart(&self, query: &ShotChartQuery) -> Result<StatsResponse, Error> {
        self.get("/stats/shotchartdetail", query)
    }

    /// Fetches game log rows (one per team per game) matching the given query.
    pub fn get_game_log(&self, query: &GameFinderQuery) -> Result<StatsResponse, Error> {
        self.get("/stats/leaguegamefinder", query)
    }

    /// Fetches the league player index.
    pub fn get_player_index(&self, query: &PlayerIndexQuery) -> Result<StatsResponse, Error> {
        self.get("/stats/commonallplayers", query)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}
