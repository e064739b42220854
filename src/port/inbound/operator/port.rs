//! Unified operator capability surface for inbound adapters.

use super::config::ConfigurationOperator;
use super::replay::ReplayOperator;
use super::seen::SeenOperator;

/// Unified operator capability surface consumed by inbound adapters.
pub trait OperatorPort: ConfigurationOperator + ReplayOperator + SeenOperator {}

impl<T> OperatorPort for T where T: ConfigurationOperator + ReplayOperator + SeenOperator {}
