//! Library layer for the shot chart tool: cached stats client, name
//! resolution, and CSV ingestion.
//!
//! Wraps the `nbastats_api` crate with a file-backed response cache,
//! request pacing with retry/backoff, fuzzy player/team name resolution,
//! and a CSV loader that validates user-supplied shot tables into the
//! same record types the live client produces.

pub mod cache;
pub mod client;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod records;
pub mod resolve;
pub mod season;

pub use nbastats_api;
pub use nbastats_api::{
    ContextMeasure, GameFinderQuery, PlayerIndexQuery, Query, SeasonType, ShotChartQuery,
};

pub use cache::{cache_key, CacheStore, FsCache, MemoryCache};
pub use client::{DataClient, KINGS_ABBREVIATION};
pub use error::{Result, ShotChartsError};
pub use fetch::{FetchError, Fetcher, Pacer, RetryPolicy};
pub use loader::{filter_shots, load_shots_csv, summarize, ShotFilter, ShotSummary};
pub use records::{GameRecord, GameResult, ScheduleEntry, ShotRecord, ShotType};
pub use resolve::{NameMatcher, PlayerEntry, TeamEntry};
