//! Visibility classification of rendered items.
//!
//! Two thresholds, measured from the viewport top, form a hysteresis band:
//! an item stays a candidate while its bottom edge is at or below
//! `candidate_bottom_px`, and counts as read only once its bottom edge has
//! risen above the tighter `exited_bottom_px`. An item straddling one line
//! therefore cannot flicker between seen and unseen.

use serde::Deserialize;

use crate::port::outbound::surface::RenderSurface;

const fn default_candidate_bottom_px() -> f64 {
    220.0
}

const fn default_exited_bottom_px() -> f64 {
    160.0
}

/// Scanner thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Items whose bottom edge is at or below this line are tracked.
    #[serde(default = "default_candidate_bottom_px")]
    pub candidate_bottom_px: f64,

    /// Tracked items whose bottom edge rises above this line have exited.
    #[serde(default = "default_exited_bottom_px")]
    pub exited_bottom_px: f64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            candidate_bottom_px: default_candidate_bottom_px(),
            exited_bottom_px: default_exited_bottom_px(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VisibilityScanner {
    config: ScannerConfig,
}

impl VisibilityScanner {
    #[must_use]
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Items not yet scrolled past, in document order.
    ///
    /// Assumes top-to-bottom input and trims only the fully passed prefix:
    /// once one item qualifies, every item after it is kept.
    pub fn list_candidates<S: RenderSurface>(&self, surface: &S) -> Vec<S::Handle> {
        let threshold = self.config.candidate_bottom_px;
        let mut reached = false;
        surface
            .items()
            .into_iter()
            .filter(|item| {
                reached = reached || surface.rect(item).bottom >= threshold;
                reached
            })
            .collect()
    }

    /// Predicate form of [`Self::list_candidates`].
    ///
    /// Agrees with the prefix-trimming form whenever the surface reports
    /// items in top-to-bottom order.
    pub fn filter_candidates<S: RenderSurface>(&self, surface: &S) -> Vec<S::Handle> {
        let threshold = self.config.candidate_bottom_px;
        surface
            .items()
            .into_iter()
            .filter(|item| surface.rect(item).bottom >= threshold)
            .collect()
    }

    /// Items of `snapshot` that have fully exited through the top edge.
    ///
    /// Handles with zero width or height are detached or not laid out and
    /// are skipped.
    pub fn detect_exited<S: RenderSurface>(
        &self,
        surface: &S,
        snapshot: &[S::Handle],
    ) -> Vec<S::Handle> {
        snapshot
            .iter()
            .filter(|item| {
                let rect = surface.rect(item);
                rect.is_laid_out() && rect.bottom < self.config.exited_bottom_px
            })
            .cloned()
            .collect()
    }
}
