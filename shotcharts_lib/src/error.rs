//! Error types for the library layer.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShotChartsError>;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding resolution, cache, and input validation failures.
#[derive(Error, Debug)]
pub enum ShotChartsError {
    /// No player matched the given name, even fuzzily. Carries the
    /// closest candidates as a correction hint.
    #[error("no player found matching '{name}' (closest: {})", candidates(.suggestions))]
    PlayerNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// No team matched the given abbreviation or name.
    #[error("no team found matching '{name}' (closest: {})", candidates(.suggestions))]
    TeamNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Two or more candidates matched equally well; the caller must
    /// disambiguate rather than have us pick one arbitrarily.
    #[error("'{name}' is ambiguous between: {}", .candidates.join(", "))]
    AmbiguousName {
        name: String,
        candidates: Vec<String>,
    },

    /// The upstream does not know the requested game. Distinct from an
    /// existing game with no recorded shots, which is an empty table.
    #[error("game not found: {0}")]
    GameNotFound(String),

    /// Upstream throttling persisted through every retry. Callers should
    /// back off substantially before resubmitting.
    #[error("rate limited by the stats API; back off before retrying")]
    RateLimited,

    /// Network or protocol failure after retries were exhausted.
    #[error("stats API unavailable: {0}")]
    Unavailable(#[from] nbastats_api::Error),

    /// A response parsed as JSON but did not carry the expected table.
    #[error("malformed stats response: {0}")]
    MalformedResponse(String),

    /// A user-supplied CSV is missing required columns. Every missing
    /// column is named, not just the first.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A CSV cell failed type coercion. The whole load fails; rows are
    /// never silently dropped.
    #[error("column '{column}' has invalid value '{value}' at row {row} (expected {expected})")]
    InvalidDataType {
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },

    /// User-provided input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The embedded seed data failed to parse.
    #[error("seed data error: {0}")]
    SeedData(String),

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn candidates(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        "none".to_string()
    } else {
        suggestions.join(", ")
    }
}
