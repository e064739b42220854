//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::application::cache::seen::{PersistencePolicy, SeenCacheConfig};
use crate::application::engine::EngineConfig;
use crate::application::throttle::ThrottleConfig;

/// Engine defaults with the given persistence policy.
#[must_use]
pub fn engine_with_policy(persistence: PersistencePolicy) -> EngineConfig {
    EngineConfig {
        cache: SeenCacheConfig {
            persistence,
            ..SeenCacheConfig::default()
        },
        ..EngineConfig::default()
    }
}

/// Engine defaults with a short rate gate, for velocity scenarios.
#[must_use]
pub fn engine_with_interval(interval_ms: u64) -> EngineConfig {
    EngineConfig {
        throttle: ThrottleConfig {
            interval_ms,
            ..ThrottleConfig::default()
        },
        ..EngineConfig::default()
    }
}

/// Every persistence policy, for tests that must hold under each of them.
#[must_use]
pub fn all_policies() -> [PersistencePolicy; 3] {
    [
        PersistencePolicy::Immediate,
        PersistencePolicy::Batched { batch_size: 10 },
        PersistencePolicy::OnBlur,
    ]
}
