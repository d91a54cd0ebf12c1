//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::ClientResult;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL, always ending in `/` so endpoint paths join beneath it.
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Parses the base URL.
    ///
    /// ```rust
    /// use khata_client::ApiConfig;
    ///
    /// let config = ApiConfig::new("https://api.example.com/v1").unwrap();
    /// assert_eq!(config.base_url.as_str(), "https://api.example.com/v1/");
    /// ```
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let trimmed = base_url.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };

        Ok(ApiConfig {
            base_url: Url::parse(&normalized)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Joins an endpoint path (no leading `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}
