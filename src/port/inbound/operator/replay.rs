//! Scripted replay projections for operator-facing adapters.

use async_trait::async_trait;

use crate::error::Result;

/// A replay invocation.
#[derive(Debug, Clone)]
pub struct ReplayRequest {
    /// Raw TOML configuration content.
    pub config_toml: String,

    /// Raw JSON replay script.
    pub script_json: String,

    /// Override the configured store with a volatile in-memory one.
    pub ephemeral: bool,
}

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayEventView {
    /// Zero-based index of the script step that produced the event.
    pub step: usize,
    /// Milliseconds since the script's start time.
    pub at_ms: i64,
    /// `seen`, `collapsed`, `restored`, `dropped` or `stopped`.
    pub kind: String,
    pub id: Option<String>,
}

/// Totals for a finished replay.
#[derive(Debug, Clone, Default)]
pub struct ReplaySummary {
    pub backend: String,
    pub steps: usize,
    pub events: Vec<ReplayEventView>,
    pub seen: usize,
    pub collapsed: usize,
    pub restored: usize,
    pub dropped: usize,
}

/// Scripted replay use-case.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait ReplayOperator: Send + Sync {
    /// Run a script through a fresh engine and collect its events.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or the script is invalid, or
    /// the configured store cannot be opened.
    async fn replay(&self, request: ReplayRequest) -> Result<ReplaySummary>;
}
