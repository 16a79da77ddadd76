//! Crate-wide constants
//!
//! This module centralizes magic numbers, URL defaults and environment
//! variable names so they can be tuned in one place.

/// Default base URL for understat pages
pub const DEFAULT_BASE_URL: &str = "https://understat.com";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Default log file name inside the log directory
pub const LOG_FILE_NAME: &str = "understat.log";

/// Retry configuration for the opt-in bounded retry policy
pub mod retry {
    /// Retries are disabled unless configured; failures surface immediately
    pub const DEFAULT_MAX_RETRIES: u32 = 0;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 250;

    /// Maximum delay between retries (seconds)
    pub const MAX_DELAY_SECONDS: u64 = 30;

    /// Upper bound for the whole retry loop (seconds)
    pub const DEFAULT_DEADLINE_SECONDS: u64 = 60;

    /// Jitter range applied to each backoff step (fraction of the delay)
    pub const JITTER_FRACTION: f64 = 0.2;

    /// Suggested delay for rate limit errors (seconds)
    pub const RATE_LIMIT_DELAY_SECONDS: u64 = 60;

    /// Suggested delay for server errors (seconds)
    pub const SERVER_ERROR_DELAY_SECONDS: u64 = 5;

    /// Suggested delay for service unavailable errors (seconds)
    pub const SERVICE_UNAVAILABLE_DELAY_SECONDS: u64 = 30;

    /// Suggested delay for network timeout errors (seconds)
    pub const NETWORK_TIMEOUT_DELAY_SECONDS: u64 = 2;

    /// Suggested delay for network connection errors (seconds)
    pub const NETWORK_CONNECTION_DELAY_SECONDS: u64 = 10;
}

/// Environment variable names
pub mod env_vars {
    /// Override for the base URL
    pub const BASE_URL: &str = "UNDERSTAT_BASE_URL";

    /// Override for the log file path
    pub const LOG_FILE: &str = "UNDERSTAT_LOG_FILE";

    /// Override for the HTTP timeout in seconds
    pub const HTTP_TIMEOUT: &str = "UNDERSTAT_HTTP_TIMEOUT";

    /// Override for the number of retries on transient failures
    pub const MAX_RETRIES: &str = "UNDERSTAT_MAX_RETRIES";
}

/// Column names of the league table header row, in output order
pub const LEAGUE_TABLE_HEADERS: [&str; 18] = [
    "Team",
    "Matches",
    "Wins",
    "Draws",
    "Losses",
    "Goals",
    "GoalsAgainst",
    "Points",
    "xG",
    "NPxG",
    "xGA",
    "NPxGA",
    "NPxGD",
    "PPDA",
    "OPPDA",
    "DeepCompletions",
    "DeepCompletionsAllowed",
    "ExpectedPoints",
];
