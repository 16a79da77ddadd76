//! Page fetching with status mapping and an optional bounded retry loop

use rand::Rng;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::constants::retry;
use crate::error::AppError;

/// How often and how long a failed fetch is retried.
///
/// The default is fail-fast: one attempt, errors surface immediately. A
/// bounded policy retries only transient failures (timeouts, connection
/// errors, 429 and 5xx) and gives up once `deadline` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fail_fast()
    }
}

impl RetryPolicy {
    pub fn fail_fast() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(retry::BASE_DELAY_MS),
            max_delay: Duration::from_secs(retry::MAX_DELAY_SECONDS),
            deadline: None,
        }
    }

    /// Up to `max_retries` extra attempts under the default deadline.
    pub fn bounded(max_retries: u32) -> Self {
        Self {
            max_retries,
            deadline: Some(Duration::from_secs(retry::DEFAULT_DEADLINE_SECONDS)),
            ..Self::fail_fast()
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Exponential backoff for the given zero-based attempt, with jitter,
    /// capped at `max_delay`.
    fn backoff(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay);
        let jitter = rand::rng().random_range(-retry::JITTER_FRACTION..=retry::JITTER_FRACTION);
        exponential.mul_f64(1.0 + jitter).min(self.max_delay)
    }
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn status_error(response: &Response, url: &str) -> AppError {
    let status = response.status();
    let status_code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown error");

    error!("HTTP {} - {} (URL: {})", status_code, reason, url);

    match status_code {
        404 => AppError::page_not_found(url),
        429 => AppError::rate_limit(reason, url),
        400..=499 => AppError::client_error(status_code, reason, url),
        502 | 503 => AppError::service_unavailable(status_code, reason, url),
        _ => AppError::server_error(status_code, reason, url),
    }
}

fn transport_error(e: reqwest::Error, url: &str) -> AppError {
    error!("Request failed for URL {}: {}", url, e);
    if e.is_timeout() {
        AppError::network_timeout(url)
    } else if e.is_connect() {
        AppError::network_connection(url, e.to_string())
    } else {
        AppError::Fetch(e)
    }
}

/// One GET. Returns the body of a 2xx response, or the mapped error plus a
/// server-suggested wait when the response carried `Retry-After`.
async fn attempt(client: &Client, url: &str) -> Result<String, (AppError, Option<Duration>)> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| (transport_error(e, url), None))?;

    let status = response.status();
    debug!("Response status: {status}");
    if !status.is_success() {
        return Err((status_error(&response, url), retry_after(&response)));
    }

    let text = response
        .text()
        .await
        .map_err(|e| (transport_error(e, url), None))?;
    debug!("Response length: {} bytes", text.len());
    Ok(text)
}

async fn fetch_with_retries(
    client: &Client,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String, AppError> {
    let mut attempt_number = 0u32;
    loop {
        match attempt(client, url).await {
            Ok(text) => return Ok(text),
            Err((err, suggested)) => {
                if !err.is_retryable() || attempt_number >= policy.max_retries {
                    return Err(err);
                }
                let wait = suggested
                    .map(|wait| wait.min(policy.max_delay))
                    .unwrap_or_else(|| policy.backoff(attempt_number));
                warn!(
                    "Transient error from {}: {}. Retrying in {:?} (attempt {}/{})",
                    url,
                    err,
                    wait,
                    attempt_number + 1,
                    policy.max_retries
                );
                tokio::time::sleep(wait).await;
                attempt_number += 1;
            }
        }
    }
}

/// Fetches a page body as text.
///
/// Non-2xx statuses map to typed errors: 404 to `PageNotFound`, 429 to
/// `RateLimit`, other 4xx to `ClientError`, 502/503 to `ServiceUnavailable`
/// and remaining 5xx to `ServerError`. With a deadline set, the whole loop
/// including waits is abandoned with `RetryDeadlineExceeded` once it expires.
#[instrument(skip(client, policy))]
pub async fn fetch_text(client: &Client, url: &str, policy: &RetryPolicy) -> Result<String, AppError> {
    info!("Fetching page: {url}");

    match policy.deadline {
        Some(deadline) => tokio::time::timeout(deadline, fetch_with_retries(client, url, policy))
            .await
            .map_err(|_| {
                error!("Gave up on {} after {:?}", url, deadline);
                AppError::retry_deadline_exceeded(url, deadline.as_secs())
            })?,
        None => fetch_with_retries(client, url, policy).await,
    }
}
