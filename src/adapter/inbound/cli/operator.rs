//! Inbound operator accessor for CLI handlers.

use std::path::Path;
use std::sync::OnceLock;

use tracing::debug;

use super::paths;
use crate::error::{ConfigError, Result};
use crate::port::inbound::operator::port::OperatorPort;

static OPERATOR: OnceLock<Box<dyn OperatorPort>> = OnceLock::new();

/// Installs the operator implementation used by CLI handlers.
pub fn install(operator: Box<dyn OperatorPort>) -> std::result::Result<(), Box<dyn OperatorPort>> {
    OPERATOR.set(operator)
}

/// Returns the configured operator capability surface for CLI handlers.
#[must_use]
pub fn operator() -> &'static dyn OperatorPort {
    OPERATOR
        .get()
        .expect("CLI operator not installed; call cli::operator::install from main")
        .as_ref()
}

/// Load config TOML for operator-facing use-cases.
///
/// An explicit path must exist. Without one, the default
/// `~/.xdedupe/config.toml` is read if present and an empty configuration
/// (all defaults) is used otherwise.
pub fn read_config_toml(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?),
        None => {
            let path = paths::default_config();
            if path.exists() {
                Ok(std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?)
            } else {
                debug!(path = %path.display(), "No config file; using defaults");
                Ok(String::new())
            }
        }
    }
}

/// Human-readable name of the config source.
#[must_use]
pub fn config_label(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None if paths::default_config().exists() => paths::default_config().display().to_string(),
        None => "(defaults)".to_string(),
    }
}
