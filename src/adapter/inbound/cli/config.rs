//! Handler for the `config` command group.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Execute `config show`.
pub fn execute_show(path: Option<&Path>) -> Result<()> {
    let config_toml = operator::read_config_toml(path)?;
    let config = operator::operator().show_config(&config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "source": operator::config_label(path),
            "logging": { "level": config.log_level, "format": config.log_format },
            "cache": {
                "ttl_days": config.cache.ttl_days,
                "persistence": config.cache.persistence,
            },
            "store": {
                "backend": config.store.backend,
                "path": config.store.path,
                "write_behind": config.store.write_behind,
            },
            "tuning": {
                "candidate_bottom_px": config.tuning.candidate_bottom_px,
                "exited_bottom_px": config.tuning.exited_bottom_px,
                "interval_ms": config.tuning.interval_ms,
                "velocity_gate": config.tuning.velocity_gate,
                "velocity_scale": config.tuning.velocity_scale,
                "collapse_cooldown_ms": config.tuning.collapse_cooldown_ms,
                "above_margin_px": config.tuning.above_margin_px,
                "below_margin_px": config.tuning.below_margin_px,
                "reply_chain_guard": config.tuning.reply_chain_guard,
            },
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Source", operator::config_label(path));
    output::field("Log level", &config.log_level);
    output::field("Log format", &config.log_format);

    output::section("Cache");
    output::field("TTL", format!("{} days", config.cache.ttl_days));
    output::field("Persistence", &config.cache.persistence);

    output::section("Store");
    output::field("Backend", &config.store.backend);
    output::field(
        "Path",
        config.store.path.as_deref().unwrap_or("(in memory)"),
    );
    output::field("Write-behind", on_off(config.store.write_behind));

    output::section("Tuning");
    output::field(
        "Candidate",
        format!("bottom >= {}px", config.tuning.candidate_bottom_px),
    );
    output::field(
        "Exited",
        format!("bottom < {}px", config.tuning.exited_bottom_px),
    );
    output::field("Interval", format!("{}ms", config.tuning.interval_ms));
    output::field(
        "Velocity gate",
        format!(
            "{} (x{})",
            on_off(config.tuning.velocity_gate),
            config.tuning.velocity_scale
        ),
    );
    output::field(
        "Cooldown",
        format!("{}ms", config.tuning.collapse_cooldown_ms),
    );
    output::field(
        "Margins",
        format!(
            "{}px above, {}px below",
            config.tuning.above_margin_px, config.tuning.below_margin_px
        ),
    );
    output::field("Reply guard", on_off(config.tuning.reply_chain_guard));

    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: Option<&Path>) -> Result<()> {
    let config_toml = operator::read_config_toml(path)?;
    let validation = operator::operator().validate_config(&config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "source": operator::config_label(path),
            "valid": true,
            "warnings": validation.warnings,
        }));
        return Ok(());
    }

    output::section("Config Validation");
    output::field("Source", operator::config_label(path));
    output::success("Config file is valid");

    if !validation.warnings.is_empty() {
        output::section("Warnings");
        for warning in &validation.warnings {
            output::warning(warning);
        }
    }

    Ok(())
}
