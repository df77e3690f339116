//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Configuration is loaded from a TOML file with environment
//! variable overrides for sensitive values like `ODDS_API_KEY`.
//!
//! # Example
//!
//! ```no_run
//! use oddsedge::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::adapter::provider::ProviderConfig;
use crate::domain::{AllocatorConfig, DetectorConfig, TrackerConfig};
use crate::error::{ConfigError, Result};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

/// Scanner loop configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Seconds between scan cycles.
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    /// Minimum margin an opportunity must clear before it is tracked
    /// and alerted. Expressed as a fraction (0.02 is two percent).
    #[serde(default = "default_min_margin")]
    pub min_margin: Decimal,
}

fn default_scan_interval_secs() -> u64 {
    300
}

fn default_min_margin() -> Decimal {
    dec!(0.02)
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval_secs(),
            min_margin: default_min_margin(),
        }
    }
}

/// Telegram notification toggle.
///
/// Credentials are never read from the config file. `TELEGRAM_BOT_TOKEN`
/// and `TELEGRAM_CHAT_ID` come from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Send a message again when a stale opportunity is reconfirmed.
    #[serde(default = "default_notify_refreshes")]
    pub notify_refreshes: bool,
}

fn default_notify_refreshes() -> bool {
    true
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            notify_refreshes: default_notify_refreshes(),
        }
    }
}

/// Main application configuration.
///
/// Aggregates all configuration settings for the application. Load from a
/// TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Odds provider settings (API URL, region, sports, bookmakers).
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Arbitrage detection parameters.
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Stake allocation parameters.
    #[serde(default)]
    pub allocator: AllocatorConfig,

    /// Opportunity deduplication windows.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Scan loop cadence and margin filter.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Telegram notification settings.
    #[serde(default)]
    pub telegram: TelegramAppConfig,

    /// Path to SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Provider API key, loaded from the `ODDS_API_KEY` environment
    /// variable. Never read from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_database_path() -> String {
    "oddsedge.db".to_string()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads the provider API key from the `ODDS_API_KEY` environment
    /// variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation
    /// fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.api_key = std::env::var("ODDS_API_KEY").ok();

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// The provider API key, or an error naming the missing variable.
    #[allow(clippy::result_large_err)]
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField { field: "ODDS_API_KEY" }.into())
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.provider.api_url.is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        if self.provider.sports.is_empty() {
            return Err(ConfigError::MissingField { field: "sports" }.into());
        }
        if self.detector.tolerance < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "tolerance",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if self.allocator.default_bankroll <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "default_bankroll",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.allocator.minimum_stake <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "minimum_stake",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.allocator.rounding_unit <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "rounding_unit",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.scanner.min_margin < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "min_margin",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if self.scanner.scan_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.tracker.freshness_window_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "freshness_window_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.tracker.max_lifetime_secs < self.tracker.freshness_window_secs {
            return Err(ConfigError::InvalidValue {
                field: "max_lifetime_secs",
                reason: "must be >= freshness_window_secs".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
