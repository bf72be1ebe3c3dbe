//! HTTP client with automatic rate limiting and retry logic
//!
//! Every catalog call goes through here so throttling and retries behave the
//! same regardless of which endpoint is hit.

use super::retry_policy::{is_retryable_status, RateLimitInfo, RetryPolicy};
use crate::shared::config::AppConfig;
use crate::shared::errors::{AppError, AppResult};
use governor::{
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{direct::NotKeyed, InMemoryState},
    Quota, RateLimiter as GovernorRateLimiter,
};
use reqwest::{Client, Response, StatusCode};
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::sleep;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// HTTP client that handles rate limiting and retries
pub struct RateLimitClient {
    client: Client,
    rate_limiter: DirectRateLimiter,
    provider_name: String,
}

impl RateLimitClient {
    /// Create a client for the Jikan API from runtime configuration
    pub fn for_jikan(config: &AppConfig) -> AppResult<Self> {
        Self::new(
            "Jikan",
            config.requests_per_second,
            config.rate_limit_burst,
            &config.user_agent,
            config.request_timeout,
        )
    }

    /// Create a custom client
    pub fn new(
        provider_name: &str,
        requests_per_second: f64,
        burst_size: u32,
        user_agent: &str,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            rate_limiter: Self::create_rate_limiter(requests_per_second, burst_size)?,
            provider_name: provider_name.to_string(),
        })
    }

    /// Create a rate limiter with specified requests per second and burst capacity
    fn create_rate_limiter(requests_per_second: f64, burst_size: u32) -> AppResult<DirectRateLimiter> {
        if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            return Err(AppError::ConfigError(format!(
                "requests per second must be positive, got {}",
                requests_per_second
            )));
        }

        // Convert rate to duration between requests
        let period = Duration::from_secs_f64(1.0 / requests_per_second);
        let burst = NonZeroU32::new(burst_size.max(1))
            .ok_or_else(|| AppError::ConfigError("burst size must be > 0".to_string()))?;
        let quota = Quota::with_period(period)
            .ok_or_else(|| AppError::ConfigError("rate limit period must be > 0".to_string()))?
            .allow_burst(burst);

        Ok(GovernorRateLimiter::direct(quota))
    }

    /// Make a GET request with rate limiting and retries under `policy`
    pub async fn get<T>(&self, url: &str, policy: &RetryPolicy) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let total_attempts = policy.total_attempts();
        let mut last_error = None;

        for attempt in 0..total_attempts {
            let is_last = attempt + 1 == total_attempts;

            // Wait for rate limiter before attempting request
            self.rate_limiter.until_ready().await;

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return self.parse_response(response).await;
                    }

                    let error = self.status_error(status);

                    if !error.is_retryable() || is_last {
                        return Err(error);
                    }

                    let server_delay = if status == StatusCode::TOO_MANY_REQUESTS {
                        RateLimitInfo::from_headers(response.headers()).recommended_delay()
                    } else {
                        None
                    };
                    let delay = policy.calculate_delay(attempt, server_delay);
                    log::warn!(
                        "{} (attempt {}/{}). Retrying in {:?}",
                        error,
                        attempt + 1,
                        total_attempts,
                        delay
                    );
                    last_error = Some(error);
                    sleep(delay).await;
                }
                Err(e) => {
                    let error = AppError::from(e);

                    if !error.is_retryable() || is_last {
                        return Err(error);
                    }

                    let delay = policy.calculate_delay(attempt, None);
                    log::warn!(
                        "{} API request failed (attempt {}/{}): {}. Retrying in {:?}",
                        self.provider_name,
                        attempt + 1,
                        total_attempts,
                        error,
                        delay
                    );
                    last_error = Some(error);
                    sleep(delay).await;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::ExternalServiceError(format!(
                "{} API request failed after {} attempts",
                self.provider_name, total_attempts
            ))
        }))
    }

    /// Map a non-success status to the error reported to callers
    fn status_error(&self, status: StatusCode) -> AppError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => AppError::RateLimitError(format!(
                "{} rate limit exceeded",
                self.provider_name
            )),
            StatusCode::NOT_FOUND => {
                AppError::NotFound(format!("{} resource not found", self.provider_name))
            }
            s if is_retryable_status(s) => AppError::ExternalServiceError(format!(
                "{} service unavailable: {}",
                self.provider_name, s
            )),
            s => AppError::ApiError(format!("{} API returned error: {}", self.provider_name, s)),
        }
    }

    /// Parse the response body as JSON
    async fn parse_response<T>(&self, response: Response) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response_text = response.text().await.map_err(|e| {
            AppError::SerializationError(format!(
                "Failed to read {} response: {}",
                self.provider_name, e
            ))
        })?;

        serde_json::from_str(&response_text).map_err(|e| {
            AppError::SerializationError(format!(
                "Failed to parse {} response: {}. Response: {}",
                self.provider_name,
                e,
                truncate_for_log(&response_text, 200)
            ))
        })
    }

    /// Check if a request can be made now (for testing/debugging)
    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter.check().is_ok()
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }
}

fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RateLimitClient {
        RateLimitClient::for_jikan(&AppConfig::default()).unwrap()
    }

    #[test]
    fn test_client_creation() {
        assert_eq!(client().provider_name(), "Jikan");
    }

    #[test]
    fn test_can_make_request() {
        assert!(client().can_make_request_now());
    }

    #[test]
    fn test_burst_is_exhausted() {
        let client =
            RateLimitClient::new("Test", 0.01, 2, "anitier-test", Duration::from_secs(1)).unwrap();
        assert!(client.can_make_request_now());
        assert!(client.can_make_request_now());
        assert!(!client.can_make_request_now());
    }

    #[test]
    fn test_invalid_rate_is_rejected() {
        let result = RateLimitClient::new("Test", 0.0, 1, "anitier-test", Duration::from_secs(1));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_status_errors() {
        let client = client();
        assert!(matches!(
            client.status_error(StatusCode::NOT_FOUND),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            client.status_error(StatusCode::TOO_MANY_REQUESTS),
            AppError::RateLimitError(_)
        ));
        assert!(matches!(
            client.status_error(StatusCode::BAD_GATEWAY),
            AppError::ExternalServiceError(_)
        ));
        assert!(matches!(
            client.status_error(StatusCode::BAD_REQUEST),
            AppError::ApiError(_)
        ));
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 200), "short");
        assert_eq!(truncate_for_log("abcdef", 3), "abc...");
        // Never splits a multi-byte character
        assert_eq!(truncate_for_log("進撃の巨人", 2), "進撃...");
    }
}
