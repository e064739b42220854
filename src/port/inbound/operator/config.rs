//! Configuration projections for operator-facing adapters.

use crate::error::Result;

/// Seen cache section of a configuration view.
#[derive(Debug, Clone)]
pub struct ConfigCache {
    pub ttl_days: u32,
    pub persistence: String,
}

/// Store section of a configuration view.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    pub backend: String,
    pub path: Option<String>,
    pub write_behind: bool,
}

/// Scan, throttle and collapse tuning of a configuration view.
#[derive(Debug, Clone)]
pub struct ConfigTuning {
    pub candidate_bottom_px: f64,
    pub exited_bottom_px: f64,
    pub interval_ms: u64,
    pub velocity_gate: bool,
    pub velocity_scale: f64,
    pub collapse_cooldown_ms: u64,
    pub above_margin_px: f64,
    pub below_margin_px: f64,
    pub reply_chain_guard: bool,
}

/// Full configuration projection for operator-facing output.
#[derive(Debug, Clone)]
pub struct ConfigView {
    pub log_level: String,
    pub log_format: String,
    pub cache: ConfigCache,
    pub store: ConfigStore,
    pub tuning: ConfigTuning,
}

/// Validation output for `config validate`.
#[derive(Debug, Clone, Default)]
pub struct ConfigValidationReport {
    pub warnings: Vec<String>,
}

/// Configuration use-cases for operator-facing adapters.
pub trait ConfigurationOperator: Send + Sync {
    /// Build a projection for `config show`.
    fn show_config(&self, config_toml: &str) -> Result<ConfigView>;

    /// Validate config and return non-fatal warnings.
    fn validate_config(&self, config_toml: &str) -> Result<ConfigValidationReport>;
}
