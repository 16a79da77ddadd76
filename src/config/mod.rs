use crate::constants::{self, env_vars};
use crate::data_fetcher::api::{LeagueCodePolicy, RetryPolicy};
use crate::data_fetcher::extraction::ExtractionStrategy;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the client and the command line tool.
/// Handles loading, saving, and environment overrides.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Base URL that page paths are appended to. Should include the scheme.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for page requests.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// How many times a transient failure is retried. Zero fails fast.
    #[serde(default)]
    pub max_retries: u32,
    /// Upper bound on the whole retry loop in seconds.
    #[serde(default = "default_retry_deadline")]
    pub retry_deadline_seconds: u64,
    /// Reject league codes missing from the lookup table instead of passing them through.
    #[serde(default)]
    pub strict_league_codes: bool,
    /// How embedded payloads are located in a page.
    #[serde(default)]
    pub extraction: ExtractionStrategy,
}

fn default_base_url() -> String {
    constants::DEFAULT_BASE_URL.to_string()
}

fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_retry_deadline() -> u64 {
    constants::retry::DEFAULT_DEADLINE_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: default_base_url(),
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            max_retries: constants::retry::DEFAULT_MAX_RETRIES,
            retry_deadline_seconds: default_retry_deadline(),
            strict_league_codes: false,
            extraction: ExtractionStrategy::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// Falls back to defaults when no config file exists.
    /// Environment variables override config file values.
    ///
    /// # Environment Variables
    /// - `UNDERSTAT_BASE_URL` - Override base URL
    /// - `UNDERSTAT_LOG_FILE` - Override log file path
    /// - `UNDERSTAT_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    /// - `UNDERSTAT_MAX_RETRIES` - Override retry count for transient failures
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration from a custom file path without env overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Applies `UNDERSTAT_*` environment variables on top of the current values.
    /// Unparsable numeric overrides are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(env_vars::BASE_URL) {
            self.base_url = base_url;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Some(retries) = std::env::var(env_vars::MAX_RETRIES)
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
        {
            self.max_retries = retries;
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(
            &self.base_url,
            self.http_timeout_seconds,
            &self.log_file_path,
        )
    }

    /// Retry policy described by `max_retries` and `retry_deadline_seconds`.
    pub fn retry_policy(&self) -> RetryPolicy {
        if self.max_retries == 0 {
            RetryPolicy::fail_fast()
        } else {
            RetryPolicy::bounded(self.max_retries)
                .with_deadline(Duration::from_secs(self.retry_deadline_seconds))
        }
    }

    pub fn league_code_policy(&self) -> LeagueCodePolicy {
        if self.strict_league_codes {
            LeagueCodePolicy::Strict
        } else {
            LeagueCodePolicy::PassThrough
        }
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Saves configuration to a custom file path, creating parent directories.
    /// A trailing slash on the base URL is dropped.
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }

        let mut normalized = self.clone();
        normalized.base_url = self.base_url.trim_end_matches('/').to_string();

        let content = toml::to_string_pretty(&normalized)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let exists = Path::new(&config_path).exists();
        let config = Config::load().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        if exists {
            println!("{config_path}");
        } else {
            println!("{config_path} (not created, using defaults)");
        }
        println!("────────────────────────────────────");
        println!("Base URL:");
        println!("{}", config.base_url);
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!("{} seconds", config.http_timeout_seconds);
        println!("────────────────────────────────────");
        println!("Retries:");
        if config.max_retries == 0 {
            println!("disabled (fail fast)");
        } else {
            println!(
                "{} (deadline {} seconds)",
                config.max_retries, config.retry_deadline_seconds
            );
        }
        println!("────────────────────────────────────");
        println!("League Codes:");
        println!("{:?}", config.league_code_policy());
        println!("────────────────────────────────────");
        println!("Extraction:");
        println!("{:?}", config.extraction);
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{}", constants::LOG_FILE_NAME);
            println!("(Default location)");
        }

        Ok(())
    }
}
