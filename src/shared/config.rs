//! Runtime configuration read from the environment (and an optional `.env`).

use std::env;
use std::time::Duration;

use crate::modules::franchise::GroupingMode;
use crate::shared::errors::{AppError, AppResult};

pub const DEFAULT_JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";
pub const DEFAULT_USER_AGENT: &str = "anitier/0.1";

/// Settings shared by the catalog client, the query cache and grouping
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub jikan_base_url: String,
    pub user_agent: String,
    pub grouping_mode: GroupingMode,
    pub request_timeout: Duration,
    /// Sustained request rate allowed against the catalog API
    pub requests_per_second: f64,
    pub rate_limit_burst: u32,
    pub cache_max_entries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jikan_base_url: DEFAULT_JIKAN_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            grouping_mode: GroupingMode::default(),
            request_timeout: Duration::from_secs(30),
            // Jikan v4: ~60 req/min with short bursts
            requests_per_second: 1.0,
            rate_limit_burst: 3,
            cache_max_entries: 500,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read `ANITIER_*` variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys keep defaults
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("ANITIER_JIKAN_BASE_URL") {
            config.jikan_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(agent) = lookup("ANITIER_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(mode) = lookup("ANITIER_GROUPING_MODE") {
            config.grouping_mode = mode.parse()?;
        }
        if let Some(secs) = lookup("ANITIER_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse_var(
                "ANITIER_REQUEST_TIMEOUT_SECS",
                &secs,
            )?);
        }
        if let Some(rps) = lookup("ANITIER_REQUESTS_PER_SECOND") {
            config.requests_per_second = parse_var("ANITIER_REQUESTS_PER_SECOND", &rps)?;
        }
        if let Some(burst) = lookup("ANITIER_RATE_LIMIT_BURST") {
            config.rate_limit_burst = parse_var("ANITIER_RATE_LIMIT_BURST", &burst)?;
        }
        if let Some(max) = lookup("ANITIER_CACHE_MAX_ENTRIES") {
            config.cache_max_entries = parse_var("ANITIER_CACHE_MAX_ENTRIES", &max)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !self.jikan_base_url.starts_with("http://") && !self.jikan_base_url.starts_with("https://")
        {
            return Err(AppError::ConfigError(format!(
                "Jikan base URL must be http(s), got '{}'",
                self.jikan_base_url
            )));
        }

        if !self.requests_per_second.is_finite() || self.requests_per_second <= 0.0 {
            return Err(AppError::ConfigError(format!(
                "requests per second must be positive, got {}",
                self.requests_per_second
            )));
        }

        if self.rate_limit_burst == 0 {
            return Err(AppError::ConfigError(
                "rate limit burst must be > 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(AppError::ConfigError(
                "request timeout must be > 0".to_string(),
            ));
        }

        if self.cache_max_entries == 0 {
            return Err(AppError::ConfigError(
                "cache max entries must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| AppError::ConfigError(format!("{} has invalid value '{}': {}", key, raw, e)))
}
