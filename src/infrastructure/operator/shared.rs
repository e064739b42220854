//! Shared helper routines for operator implementations.

use crate::application::cache::seen::PersistencePolicy;

pub(super) fn persistence_label(policy: PersistencePolicy) -> String {
    match policy {
        PersistencePolicy::Immediate => "immediate".to_string(),
        PersistencePolicy::Batched { batch_size } => format!("batched ({batch_size})"),
        PersistencePolicy::OnBlur => "on_blur".to_string(),
    }
}

pub(super) fn display_path(path: Option<std::path::PathBuf>) -> Option<String> {
    path.map(|path| path.display().to_string())
}
