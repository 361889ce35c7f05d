//! Error types for the API client.

/// Errors that can occur when making stats API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unexpected response).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}

impl Error {
    /// Whether this error carries a rate-limiting status (HTTP 429).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::HttpStatus { status: 429, .. })
    }

    /// Whether this error carries an HTTP-level not-found status.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::HttpStatus { status: 404, .. })
    }
}
