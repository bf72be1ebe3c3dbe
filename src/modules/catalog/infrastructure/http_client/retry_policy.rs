//! Retry policies for catalog requests
//!
//! Handles provider rate limiting with retry logic based on HTTP headers and
//! the kind of query being retried.

use std::time::Duration;

use reqwest::StatusCode;

use crate::modules::catalog::domain::QueryKind;

/// Configuration for HTTP retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries (will be adjusted based on headers)
    pub base_delay: Duration,
    /// Maximum delay to wait (prevents excessive waits)
    pub max_delay: Duration,
    /// Whether to use exponential backoff
    pub exponential_backoff: bool,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Add up to 10% random jitter to computed delays
    pub jitter: bool,
}

impl RetryPolicy {
    /// Conservative policy for Jikan (60 req/min limit)
    pub fn jikan() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            exponential_backoff: true,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }

    /// Jikan policy with the retry budget of the given query kind
    pub fn for_kind(kind: QueryKind) -> Self {
        Self {
            max_retries: kind.max_retries(),
            ..Self::jikan()
        }
    }

    /// Policy that never retries (for tests and one-shot calls)
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::jikan()
        }
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Calculate delay for next retry attempt
    pub fn calculate_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        // If server provided Retry-After header, respect it
        if let Some(server_delay) = retry_after {
            return server_delay.min(self.max_delay);
        }

        let delay = if self.exponential_backoff {
            let multiplier = self.backoff_multiplier.powi(attempt as i32);
            Duration::from_millis((self.base_delay.as_millis() as f64 * multiplier) as u64)
        } else {
            self.base_delay
        };

        let delay = delay.min(self.max_delay);

        if self.jitter {
            let jitter_ms = (delay.as_millis() as f64 * 0.1 * rand::random::<f64>()) as u64;
            delay + Duration::from_millis(jitter_ms)
        } else {
            delay
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::jikan()
    }
}

/// Information extracted from HTTP 429 responses
#[derive(Debug, Clone, Default)]
pub struct RateLimitInfo {
    /// How long to wait before next request (from Retry-After header)
    pub retry_after: Option<Duration>,
    /// When the rate limit resets (from X-RateLimit-Reset header)
    pub reset_time: Option<Duration>,
    /// Number of requests remaining (from X-RateLimit-Remaining header)
    pub remaining: Option<u32>,
    /// Total rate limit (from X-RateLimit-Limit header)
    pub limit: Option<u32>,
}

impl RateLimitInfo {
    /// Parse rate limit information from HTTP response headers
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        let header_u64 = |name: &str| {
            headers
                .get(name)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
        };

        let retry_after = header_u64("retry-after").map(Duration::from_secs);

        let reset_time = header_u64("x-ratelimit-reset").map(|timestamp| {
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            Duration::from_secs(timestamp.saturating_sub(now))
        });

        let remaining = header_u64("x-ratelimit-remaining").and_then(|v| u32::try_from(v).ok());
        let limit = header_u64("x-ratelimit-limit").and_then(|v| u32::try_from(v).ok());

        Self {
            retry_after,
            reset_time,
            remaining,
            limit,
        }
    }

    /// Get the best delay recommendation from available information
    pub fn recommended_delay(&self) -> Option<Duration> {
        self.retry_after.or(self.reset_time)
    }
}

/// Whether a response status is worth retrying
pub fn is_retryable_status(status: StatusCode) -> bool {
    // 425 Too Early has no named constant in the http crate reqwest 0.11 uses
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT
    ) || status.as_u16() == 425
        || status.is_server_error()
}
