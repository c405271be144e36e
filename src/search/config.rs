//! Client configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::time::Duration;

use super::error::ApiError;
use super::retry::RetryPolicy;

/// Default Tavily API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "TAVILY_API_KEY";
/// Default per-attempt timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`TavilyClient`](super::TavilyClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Base URL of the API (no trailing slash).
    pub base_url: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Retry/backoff policy.
    pub retry: RetryPolicy,
    /// Log every request at `info` instead of `debug`.
    pub verbose: bool,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a new builder for `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns an `AUTH_ERROR` if `TAVILY_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    retry: Option<RetryPolicy>,
    verbose: bool,
}

impl ClientConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var(API_KEY_ENV).ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("TAVILY_BASE_URL").ok();
        }
        if self.timeout.is_none() {
            self.timeout = std::env::var("TAVILY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs);
        }
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Enables verbose request logging.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an `AUTH_ERROR` if no non-empty API key was set.
    pub fn build(self) -> Result<ClientConfig, ApiError> {
        let api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ApiError::auth(format!("{API_KEY_ENV} is not set")))?;

        let base_url = self
            .base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(ClientConfig {
            api_key,
            base_url,
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            retry: self.retry.unwrap_or_default(),
            verbose: self.verbose,
        })
    }
}
