//! Rate-limited fetch layer: request pacing, a retry policy, and the
//! fetcher that funnels every outbound stats call through both.
//!
//! The model is deliberately synchronous: pacing is a blocking sleep
//! taken before each attempt, so back-to-back calls from a tight loop
//! still respect the upstream rate limit.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use nbastats_api::types::StatsResponse;
use nbastats_api::{Client, GameFinderQuery, PlayerIndexQuery, ShotChartQuery};
use rand::Rng;

/// Minimum delay between outbound requests.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(600);

/// Failures surfaced by the fetch layer after retries are exhausted.
///
/// Rate limiting is kept distinct from generic unavailability so callers
/// can decide whether to wait substantially and resubmit, or just retry.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("rate limited after retries exhausted")]
    RateLimited,
    /// HTTP-level not-found. Never retried; the resource does not exist.
    #[error("resource not found upstream")]
    NotFound(#[source] nbastats_api::Error),
    #[error("upstream unavailable")]
    Unavailable(#[source] nbastats_api::Error),
}

/// Enforces a minimum delay between consecutive outbound requests.
///
/// One pacer guards one upstream budget: every attempt, to any endpoint,
/// successful or not, advances the shared clock. Owned by a fetcher
/// rather than hidden in a module-level global, so independent clients
/// in one process pace independently on purpose.
pub struct Pacer {
    last_request: Mutex<Option<Instant>>,
    min_delay: Duration,
}

impl Pacer {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_delay,
        }
    }

    /// Blocks until `min_delay` has passed since the previous call, then
    /// advances the clock. The first call never waits.
    pub fn pace(&self) {
        let sleep_dur = {
            let last = self.last_request.lock().unwrap_or_else(|e| e.into_inner());
            last.map(|t| self.min_delay.saturating_sub(t.elapsed()))
                .filter(|d| !d.is_zero())
        };
        if let Some(dur) = sleep_dur {
            thread::sleep(dur);
        }
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DELAY)
    }
}

/// Pure backoff policy: how many retries, and how long to wait before
/// each one. Applying it is [`with_retry`]'s job.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: usize,
    /// Base delay before the first retry of a generic failure.
    pub base_delay: Duration,
    /// Base delay before the first retry after a rate-limit response.
    /// Longer than `base_delay`; the upstream is telling us to slow down.
    pub rate_limit_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(2),
            rate_limit_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(30),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

impl RetryPolicy {
    /// Reads overrides from `SHOTCHARTS_RETRY_MAX`, `SHOTCHARTS_RETRY_BASE_MS`,
    /// `SHOTCHARTS_RETRY_RATE_MS`, and `SHOTCHARTS_RETRY_MAX_MS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("SHOTCHARTS_RETRY_MAX", defaults.max_retries),
            base_delay: Duration::from_millis(env_u64(
                "SHOTCHARTS_RETRY_BASE_MS",
                defaults.base_delay.as_millis() as u64,
            )),
            rate_limit_delay: Duration::from_millis(env_u64(
                "SHOTCHARTS_RETRY_RATE_MS",
                defaults.rate_limit_delay.as_millis() as u64,
            )),
            max_delay: Duration::from_millis(env_u64(
                "SHOTCHARTS_RETRY_MAX_MS",
                defaults.max_delay.as_millis() as u64,
            )),
        }
    }

    /// Delay before retry number `attempt` (1-indexed): the relevant base
    /// doubled per attempt with 0.8-1.2x jitter, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: usize, rate_limited: bool) -> Duration {
        let base = if rate_limited {
            self.rate_limit_delay
        } else {
            self.base_delay
        };
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let capped = (base.as_millis() as u64)
            .saturating_mul(exp)
            .min(self.max_delay.as_millis() as u64);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((capped as f64 * jitter) as u64)
    }
}

impl From<FetchError> for crate::error::ShotChartsError {
    /// Default mapping for endpoints where not-found carries no game
    /// semantics; `get_game_shots` maps 404 to `GameNotFound` itself.
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::RateLimited => Self::RateLimited,
            FetchError::NotFound(e) | FetchError::Unavailable(e) => Self::Unavailable(e),
        }
    }
}

enum FailureKind {
    RateLimited,
    NotFound,
    Retryable,
    Fatal,
}

fn classify(err: &nbastats_api::Error) -> FailureKind {
    match err {
        nbastats_api::Error::RequestFailed => FailureKind::Retryable,
        nbastats_api::Error::HttpStatus { status: 429, .. } => FailureKind::RateLimited,
        nbastats_api::Error::HttpStatus { status: 404, .. } => FailureKind::NotFound,
        nbastats_api::Error::HttpStatus { status, .. } if *status >= 500 => FailureKind::Retryable,
        nbastats_api::Error::HttpStatus { .. } => FailureKind::Fatal,
    }
}

/// Runs `op` under the pacing clock, retrying per `policy`.
///
/// Every attempt paces first, so repeated failures cannot outrun the
/// rate limit. Rate-limit responses back off from `rate_limit_delay`,
/// other retryable failures from `base_delay`; HTTP 404 and client-side
/// request errors return immediately.
pub fn with_retry<T, F>(
    policy: &RetryPolicy,
    pacer: &Pacer,
    label: &str,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, nbastats_api::Error>,
{
    let mut attempt = 0usize;
    loop {
        pacer.pace();
        let err = match op() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        match classify(&err) {
            FailureKind::NotFound => return Err(FetchError::NotFound(err)),
            FailureKind::Fatal => return Err(FetchError::Unavailable(err)),
            kind => {
                attempt += 1;
                let rate_limited = matches!(kind, FailureKind::RateLimited);
                if attempt > policy.max_retries {
                    return Err(if rate_limited {
                        FetchError::RateLimited
                    } else {
                        FetchError::Unavailable(err)
                    });
                }
                let delay = policy.delay_for_attempt(attempt, rate_limited);
                tracing::warn!(
                    "{} request failed (attempt {}/{}), retrying in {:.1}s",
                    label,
                    attempt,
                    policy.max_retries,
                    delay.as_secs_f64()
                );
                thread::sleep(delay);
            }
        }
    }
}

/// Outbound gateway: every stats call goes through the pacer and the
/// retry policy; nothing bypasses them.
pub struct Fetcher {
    api: Client,
    pacer: Pacer,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_client(Client::with_base_url(base_url))
    }

    fn with_client(api: Client) -> Self {
        Self {
            api,
            pacer: Pacer::default(),
            policy: RetryPolicy::from_env(),
        }
    }

    pub fn set_min_delay(&mut self, min_delay: Duration) {
        self.pacer = Pacer::new(min_delay);
    }

    pub fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.policy = policy;
    }

    pub fn shot_chart(&self, query: &ShotChartQuery) -> Result<StatsResponse, FetchError> {
        with_retry(&self.policy, &self.pacer, "shotchartdetail", || {
            self.api.get_shot_chart(query)
        })
    }

    pub fn game_log(&self, query: &GameFinderQuery) -> Result<StatsResponse, FetchError> {
        with_retry(&self.policy, &self.pacer, "leaguegamefinder", || {
            self.api.get_game_log(query)
        })
    }

    pub fn player_index(&self, query: &PlayerIndexQuery) -> Result<StatsResponse, FetchError> {
        with_retry(&self.policy, &self.pacer, "commonallplayers", || {
            self.api.get_player_index(query)
        })
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            rate_limit_delay: Duration::from_millis(2),
            max_delay: Duration::from_millis(10),
        }
    }

    fn no_pacing() -> Pacer {
        Pacer::new(Duration::ZERO)
    }

    fn http_error(status: u16) -> nbastats_api::Error {
        nbastats_api::Error::HttpStatus {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn pacer_enforces_minimum_gap() {
        let pacer = Pacer::new(Duration::from_millis(50));
        let start = Instant::now();
        pacer.pace();
        pacer.pace();
        pacer.pace();
        // Three calls need at least two full gaps
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn pacer_first_call_is_immediate() {
        let pacer = Pacer::new(Duration::from_secs(60));
        let start = Instant::now();
        pacer.pace();
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay: Duration::from_millis(100),
            rate_limit_delay: Duration::from_millis(400),
            max_delay: Duration::from_millis(1000),
        };
        // Jitter is 0.8-1.2x, so compare against loose bounds
        let first = policy.delay_for_attempt(1, false);
        assert!(first >= Duration::from_millis(80) && first <= Duration::from_millis(120));
        let third = policy.delay_for_attempt(3, false);
        assert!(third >= Duration::from_millis(320) && third <= Duration::from_millis(480));
        // Deep attempts hit the cap
        let deep = policy.delay_for_attempt(10, false);
        assert!(deep <= Duration::from_millis(1200));
    }

    #[test]
    fn rate_limit_backoff_starts_higher() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            rate_limit_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(2),
        };
        // Jitter bands (80-120ms vs 400-600ms) cannot overlap
        let generic = policy.delay_for_attempt(1, false);
        let limited = policy.delay_for_attempt(1, true);
        assert!(limited > generic);
    }

    #[test]
    fn retry_succeeds_first_attempt() {
        let calls = Cell::new(0u32);
        let result = with_retry(&fast_policy(), &no_pacing(), "test", || {
            calls.set(calls.get() + 1);
            Ok::<_, nbastats_api::Error>(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn retry_recovers_from_transient_failures() {
        let calls = Cell::new(0u32);
        let result = with_retry(&fast_policy(), &no_pacing(), "test", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(http_error(503))
            } else {
                Ok(99)
            }
        });
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn exhausted_rate_limit_is_distinguishable() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = with_retry(&fast_policy(), &no_pacing(), "test", || {
            calls.set(calls.get() + 1);
            Err(http_error(429))
        });
        assert!(matches!(result, Err(FetchError::RateLimited)));
        // 1 initial + 3 retries
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn exhausted_transport_failure_is_unavailable() {
        let result: Result<(), _> = with_retry(&fast_policy(), &no_pacing(), "test", || {
            Err(nbastats_api::Error::RequestFailed)
        });
        assert!(matches!(result, Err(FetchError::Unavailable(_))));
    }

    #[test]
    fn not_found_returns_without_retrying() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = with_retry(&fast_policy(), &no_pacing(), "test", || {
            calls.set(calls.get() + 1);
            Err(http_error(404))
        });
        assert!(matches!(result, Err(FetchError::NotFound(_))));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn client_errors_are_fatal_without_retrying() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = with_retry(&fast_policy(), &no_pacing(), "test", || {
            calls.set(calls.get() + 1);
            Err(http_error(400))
        });
        assert!(matches!(result, Err(FetchError::Unavailable(_))));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failed_attempts_advance_the_pacing_clock() {
        let pacer = Pacer::new(Duration::from_millis(40));
        let policy = RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            rate_limit_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        };
        let start = Instant::now();
        let _: Result<(), _> = with_retry(&policy, &pacer, "test", || Err(http_error(503)));
        // 3 attempts: the 2nd and 3rd each wait out the pacing gap
        assert!(start.elapsed() >= Duration::from_millis(80));
    }
}
