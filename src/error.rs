use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] reqwest::Error),

    // Specific HTTP status code errors
    #[error("Page not found (404): {url}")]
    PageNotFound { url: String },

    #[error("Server error ({status}): {message} (URL: {url})")]
    ServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Client error ({status}): {message} (URL: {url})")]
    ClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Rate limit exceeded (429): {message} (URL: {url})")]
    RateLimit { message: String, url: String },

    #[error("Service unavailable ({status}): {message} (URL: {url})")]
    ServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    #[error("Gave up retrying {url} after {seconds} seconds")]
    RetryDeadlineExceeded { url: String, seconds: u64 },

    // Extraction errors
    #[error("No script assigns {marker} = JSON.parse('...')")]
    ScriptNotFound { marker: String },

    #[error("Failed to decode {marker} payload: {message}")]
    Decode { marker: String, message: String },

    #[error("Unexpected {marker} payload structure: {message}")]
    UnexpectedStructure { marker: String, message: String },

    // Argument errors
    #[error("Invalid date format (expected YYYY-MM-DD): {value}")]
    InvalidDateFormat { value: String },

    #[error("Unknown league code: {code}")]
    UnknownLeagueCode { code: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create a page not found error
    pub fn page_not_found(url: impl Into<String>) -> Self {
        Self::PageNotFound { url: url.into() }
    }

    /// Create a server error (5xx status codes)
    pub fn server_error(status: u16, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a client error (4xx status codes except 404 and 429)
    pub fn client_error(status: u16, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a service unavailable error
    pub fn service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a retry deadline error
    pub fn retry_deadline_exceeded(url: impl Into<String>, seconds: u64) -> Self {
        Self::RetryDeadlineExceeded {
            url: url.into(),
            seconds,
        }
    }

    /// Create a script not found error
    pub fn script_not_found(marker: impl Into<String>) -> Self {
        Self::ScriptNotFound {
            marker: marker.into(),
        }
    }

    /// Create a payload decode error
    pub fn decode(marker: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            marker: marker.into(),
            message: message.into(),
        }
    }

    /// Create an unexpected payload structure error
    pub fn unexpected_structure(marker: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedStructure {
            marker: marker.into(),
            message: message.into(),
        }
    }

    /// Create an invalid date format error
    pub fn invalid_date_format(value: impl Into<String>) -> Self {
        Self::InvalidDateFormat {
            value: value.into(),
        }
    }

    /// Create an unknown league code error
    pub fn unknown_league_code(code: impl Into<String>) -> Self {
        Self::UnknownLeagueCode { code: code.into() }
    }

    /// Check if error came from fetching the page (status or transport failure)
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            AppError::Fetch(_)
                | AppError::PageNotFound { .. }
                | AppError::ServerError { .. }
                | AppError::ClientError { .. }
                | AppError::RateLimit { .. }
                | AppError::ServiceUnavailable { .. }
                | AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::RetryDeadlineExceeded { .. }
        )
    }

    /// Check if error is transient (network issues, server errors, rate limits)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::ServerError { .. }
                | AppError::ServiceUnavailable { .. }
                | AppError::RateLimit { .. }
        )
    }

    /// Get suggested retry delay in seconds based on error type
    pub fn retry_delay_seconds(&self) -> Option<u64> {
        use crate::constants::retry;
        match self {
            AppError::RateLimit { .. } => Some(retry::RATE_LIMIT_DELAY_SECONDS),
            AppError::ServerError { .. } => Some(retry::SERVER_ERROR_DELAY_SECONDS),
            AppError::ServiceUnavailable { .. } => Some(retry::SERVICE_UNAVAILABLE_DELAY_SECONDS),
            AppError::NetworkTimeout { .. } => Some(retry::NETWORK_TIMEOUT_DELAY_SECONDS),
            AppError::NetworkConnection { .. } => Some(retry::NETWORK_CONNECTION_DELAY_SECONDS),
            _ => None,
        }
    }
}
