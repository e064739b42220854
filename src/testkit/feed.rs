//! Builders for simulated feeds.

use crate::adapter::outbound::feed::card::FeedCard;
use crate::adapter::outbound::feed::surface::{CardKey, SimulatedFeed};

/// Author used by every builder card.
pub const AUTHOR: &str = "alice";

/// Feed of status cards with the given heights, stacked from the top of the
/// document. Card `i` has status id `i + 1`.
#[must_use]
pub fn stacked_feed(viewport_height: f64, heights: &[f64]) -> (SimulatedFeed, Vec<CardKey>) {
    let mut feed = SimulatedFeed::new(viewport_height);
    let keys = heights
        .iter()
        .enumerate()
        .map(|(i, height)| feed.push(FeedCard::status(AUTHOR, &(i + 1).to_string(), *height)))
        .collect();
    (feed, keys)
}

/// A status card by [`AUTHOR`].
#[must_use]
pub fn card(id: &str, height: f64) -> FeedCard {
    FeedCard::status(AUTHOR, id, height)
}
