//! # Bridge Configuration
//!
//! Loaded once at startup; read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KHATA_API_URL=https://api.example.com                              │
//! │     KHATA_DB_PATH=/tmp/khata.db                                        │
//! │     KHATA_CURRENCY_SYMBOL=Rs.                                          │
//! │     KHATA_TIMEOUT_SECS=10                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $KHATA_CONFIG, or khata.toml in the platform config dir            │
//! │     ~/.config/khata/khata.toml (Linux)                                 │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! url = "https://api.example.com"
//! timeout_secs = 30
//!
//! [display]
//! currency_symbol = "₹"
//!
//! [database]
//! path = "/var/lib/khata/khata.db"
//!
//! [pricing]
//! line_totals = "allow"
//! discounted_subtotal = "allow"
//! balance = "clamp_to_zero"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use khata_client::ApiConfig;
use khata_core::money::Amount;
use khata_core::{PricingPolicy, DEFAULT_CURRENCY_SYMBOL};

use crate::error::StartupError;

/// Names of the environment variables the bridge reads.
pub mod env {
    pub const CONFIG: &str = "KHATA_CONFIG";
    pub const API_URL: &str = "KHATA_API_URL";
    pub const DB_PATH: &str = "KHATA_DB_PATH";
    pub const CURRENCY_SYMBOL: &str = "KHATA_CURRENCY_SYMBOL";
    pub const TIMEOUT_SECS: &str = "KHATA_TIMEOUT_SECS";
}

const CONFIG_FILE_NAME: &str = "khata.toml";

// =============================================================================
// Sections
// =============================================================================

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// How amounts are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Local cache location. `None` means the platform data dir.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Bridge Configuration
// =============================================================================

/// Complete bridge configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub pricing: PricingPolicy,
}

impl BridgeConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `KHATA_CONFIG`, else the platform path)
    /// 3. Environment variables
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, StartupError> {
        let path = config_path
            .or_else(|| std::env::var_os(env::CONFIG).map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, StartupError> {
        let contents = std::fs::read_to_string(path).map_err(|source| StartupError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| StartupError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value. Unparsable numbers are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env::API_URL) {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.url = url;
        }

        if let Some(path) = lookup(env::DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = lookup(env::CURRENCY_SYMBOL) {
            self.display.currency_symbol = symbol;
        }

        if let Some(secs) = lookup(env::TIMEOUT_SECS) {
            match secs.trim().parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric {}", env::TIMEOUT_SECS),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        super::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Client settings for the remote API.
    pub fn api_config(&self) -> Result<ApiConfig, khata_client::ClientError> {
        Ok(ApiConfig::new(&self.api.url)?.with_timeout(self.timeout()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn currency_symbol(&self) -> &str {
        &self.display.currency_symbol
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust,ignore
    /// config.format_currency(Amount::from_major(1234)) // "₹1234.00"
    /// ```
    pub fn format_currency(&self, amount: Amount) -> String {
        amount.format_currency(self.currency_symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::pricing::NegativePolicy;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.api.url, "http://localhost:3000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.currency_symbol(), "₹");
        assert!(config.database.path.is_none());
        assert_eq!(config.pricing, PricingPolicy::default());
    }

    #[test]
    fn test_toml_partial_file() {
        let config: BridgeConfig = toml::from_str(
            r#"
            [api]
            url = "https://billing.example.com"

            [pricing]
            balance = "clamp_to_zero"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.url, "https://billing.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.pricing.balance, NegativePolicy::ClampToZero);
        assert_eq!(config.pricing.line_totals, NegativePolicy::Allow);
        assert_eq!(config.currency_symbol(), "₹");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (env::API_URL, "http://10.0.0.2:3000"),
            (env::DB_PATH, "/tmp/khata-test.db"),
            (env::CURRENCY_SYMBOL, "Rs."),
            (env::TIMEOUT_SECS, "5"),
        ]
        .into_iter()
        .collect();

        let mut config = BridgeConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.url, "http://10.0.0.2:3000");
        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/khata-test.db")));
        assert_eq!(config.format_currency(Amount::from_major(7)), "Rs.7.00");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_bad_timeout_is_ignored() {
        let mut config = BridgeConfig::default();
        config.apply_overrides(|key| (key == env::TIMEOUT_SECS).then(|| "soon".to_string()));
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("khata-bad-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[api\nurl = 1").unwrap();

        let err = BridgeConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, StartupError::ConfigParse { .. }));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_api_config() {
        let config = BridgeConfig::default();
        let api = config.api_config().unwrap();
        assert_eq!(api.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(api.timeout, Duration::from_secs(30));
    }
}
