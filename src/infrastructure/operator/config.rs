//! Configuration operator implementation.

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::store::StoreBackend;
use crate::port::inbound::operator::config::{
    ConfigCache, ConfigStore, ConfigTuning, ConfigValidationReport, ConfigView,
    ConfigurationOperator,
};

use super::entry::Operator;
use super::shared;

impl ConfigurationOperator for Operator {
    fn show_config(&self, config_toml: &str) -> Result<ConfigView> {
        let config = Config::parse_toml(config_toml)?;

        Ok(ConfigView {
            log_level: config.logging.level.clone(),
            log_format: config.logging.format.clone(),
            cache: ConfigCache {
                ttl_days: config.cache.ttl_days,
                persistence: shared::persistence_label(config.cache.persistence),
            },
            store: ConfigStore {
                backend: config.store.backend.as_str().to_string(),
                path: shared::display_path(config.store.resolved_path()),
                write_behind: config.store.write_behind,
            },
            tuning: ConfigTuning {
                candidate_bottom_px: config.scanner.candidate_bottom_px,
                exited_bottom_px: config.scanner.exited_bottom_px,
                interval_ms: config.throttle.interval_ms,
                velocity_gate: config.throttle.velocity_gate,
                velocity_scale: config.throttle.velocity_scale,
                collapse_cooldown_ms: config.throttle.collapse_cooldown_ms,
                above_margin_px: config.placeholder.above_margin_px,
                below_margin_px: config.placeholder.below_margin_px,
                reply_chain_guard: config.placeholder.reply_chain_guard,
            },
        })
    }

    fn validate_config(&self, config_toml: &str) -> Result<ConfigValidationReport> {
        let config = Config::parse_toml(config_toml)?;
        let mut warnings = Vec::new();

        if config.store.backend == StoreBackend::Memory {
            warnings.push("Memory store configured; seen items are lost on exit".to_string());
            if config.store.path.is_some() {
                warnings.push("store.path is ignored by the memory backend".to_string());
            }
        }

        if !config.throttle.velocity_gate {
            warnings.push("Velocity gate disabled; fast flings will mark items seen".to_string());
        }

        if config.scanner.candidate_bottom_px - config.scanner.exited_bottom_px < 20.0 {
            warnings.push(
                "Candidate and exit thresholds are less than 20px apart; items may be marked seen while partly visible"
                    .to_string(),
            );
        }

        Ok(ConfigValidationReport { warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_config_projects_defaults() {
        let view = Operator.show_config("").unwrap();

        assert_eq!(view.log_level, "info");
        assert_eq!(view.cache.ttl_days, 7);
        assert_eq!(view.cache.persistence, "batched (10)");
        assert_eq!(view.store.backend, "sqlite");
        assert!(view.store.path.unwrap().ends_with("xdedupe.db"));
        assert_eq!(view.tuning.interval_ms, 80);
        assert!(view.tuning.reply_chain_guard);
    }

    #[test]
    fn memory_store_has_no_path() {
        let view = Operator.show_config("[store]\nbackend = \"memory\"\n").unwrap();
        assert_eq!(view.store.path, None);
    }

    #[test]
    fn validate_warns_about_memory_store_and_disabled_gate() {
        let report = Operator
            .validate_config(
                "[store]\nbackend = \"memory\"\npath = \"x\"\n[throttle]\nvelocity_gate = false\n",
            )
            .unwrap();
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn validate_default_config_is_clean() {
        assert!(Operator.validate_config("").unwrap().warnings.is_empty());
    }

    #[test]
    fn validate_propagates_hard_errors() {
        assert!(Operator.validate_config("[throttle]\ninterval_ms = 0\n").is_err());
    }
}
