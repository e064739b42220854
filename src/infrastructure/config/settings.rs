//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Every section is optional; an empty file yields the defaults.
//!
//! # Example
//!
//! ```no_run
//! use xdedupe::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::store::StoreConfig;
use crate::application::cache::seen::{PersistencePolicy, SeenCacheConfig};
use crate::application::engine::EngineConfig;
use crate::application::placeholder::PlaceholderConfig;
use crate::application::scanner::ScannerConfig;
use crate::application::throttle::ThrottleConfig;
use crate::error::{ConfigError, Result};

/// Upper bound on `cache.ttl_days` (ten years).
const MAX_TTL_DAYS: u32 = 3650;

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Seen record lifetime and write policy.
    #[serde(default)]
    pub cache: SeenCacheConfig,

    /// Where seen records are persisted.
    #[serde(default)]
    pub store: StoreConfig,

    /// Visibility thresholds.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Rate and velocity gating.
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Collapse line margins and the reply-chain guard.
    #[serde(default)]
    pub placeholder: PlaceholderConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., inverted scanner thresholds)
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Settings handed to each engine instance.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            cache: self.cache.clone(),
            scanner: self.scanner.clone(),
            throttle: self.throttle.clone(),
            placeholder: self.placeholder.clone(),
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(invalid("logging.format", "must be \"pretty\" or \"json\""));
        }

        if !(1..=MAX_TTL_DAYS).contains(&self.cache.ttl_days) {
            return Err(invalid(
                "cache.ttl_days",
                &format!("must be between 1 and {MAX_TTL_DAYS}"),
            ));
        }
        if let PersistencePolicy::Batched { batch_size: 0 } = self.cache.persistence {
            return Err(invalid("cache.persistence.batch_size", "must be greater than 0"));
        }

        if let Some(path) = &self.store.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::MissingField { field: "store.path" }.into());
            }
        }

        let scanner = &self.scanner;
        if !scanner.candidate_bottom_px.is_finite() {
            return Err(invalid("scanner.candidate_bottom_px", "must be a finite number"));
        }
        if !scanner.exited_bottom_px.is_finite() {
            return Err(invalid("scanner.exited_bottom_px", "must be a finite number"));
        }
        if scanner.exited_bottom_px >= scanner.candidate_bottom_px {
            return Err(invalid(
                "scanner.exited_bottom_px",
                "must be less than scanner.candidate_bottom_px",
            ));
        }

        if !(1..=1000).contains(&self.throttle.interval_ms) {
            return Err(invalid("throttle.interval_ms", "must be between 1 and 1000"));
        }
        if !(self.throttle.velocity_scale.is_finite() && self.throttle.velocity_scale > 0.0) {
            return Err(invalid("throttle.velocity_scale", "must be greater than 0"));
        }

        for (field, value) in [
            ("placeholder.above_margin_px", self.placeholder.above_margin_px),
            ("placeholder.below_margin_px", self.placeholder.below_margin_px),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }

        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}
