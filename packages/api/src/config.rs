//! Connection settings for the restaurants service.
//!
//! Read from the environment with defaults suited to a local development
//! backend:
//!
//! - `RESTAURANT_API_URL`: base URL, default `http://localhost:8000/api`
//! - `RESTAURANT_API_TIMEOUT_SECS`: per-request timeout, default 30

use std::time::Duration;

use crate::ApiError;

/// Default base URL of the restaurants service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings used to build an [`crate::HttpRestaurantApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without trailing slash (e.g. `http://localhost:8000/api`).
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Creates a config for `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the URL is not `http(s)://`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Loads the config from `RESTAURANT_API_URL` and
    /// `RESTAURANT_API_TIMEOUT_SECS`, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if either variable is set to an
    /// invalid value.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_vars(
            std::env::var("RESTAURANT_API_URL").ok().as_deref(),
            std::env::var("RESTAURANT_API_TIMEOUT_SECS").ok().as_deref(),
        )
    }

    fn from_vars(url: Option<&str>, timeout_secs: Option<&str>) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(url.unwrap_or(DEFAULT_BASE_URL))?;

        let timeout = match timeout_secs {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ApiError::Config {
                    message: format!("RESTAURANT_API_TIMEOUT_SECS is not a number: {raw:?}"),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self { base_url, timeout })
    }

    /// Full URL of the restaurants collection endpoint.
    #[must_use]
    pub fn restaurants_url(&self) -> String {
        format!("{}/restaurants", self.base_url)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::Config {
            message: format!("base URL must start with http:// or https://: {raw:?}"),
        });
    }
    Ok(trimmed.to_string())
}
