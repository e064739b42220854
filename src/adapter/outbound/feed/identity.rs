//! Identity resolution from card markup.
//!
//! A card is identified by its permalink, scoped to the card's author:
//! `/{author}/status/{id}/analytics` on timelines, or
//! `/{author}/status/{id}/history` on status pages. Quoted cards carry
//! permalinks of other authors, which is why the author is resolved first.

use super::card::FeedCard;
use crate::domain::id::ItemId;

const PERMALINK_SUFFIXES: [&str; 2] = ["/analytics", "/history"];

/// Resolve the status id of `card`, or `None` when the markup lacks it.
#[must_use]
pub fn resolve(card: &FeedCard) -> Option<ItemId> {
    let author = author(card)?;
    let prefix = format!("/{author}/status/");

    card.links
        .iter()
        .map(|href| path_of(href))
        .find(|path| {
            path.starts_with(&prefix)
                && PERMALINK_SUFFIXES
                    .iter()
                    .any(|suffix| path.ends_with(suffix))
        })
        .and_then(|path| {
            let mut segments = path.rsplit('/');
            segments.next();
            segments.next()
        })
        .filter(|id| !id.is_empty())
        .map(ItemId::from)
}

fn author(card: &FeedCard) -> Option<&str> {
    let href = card.author_href.as_deref()?;
    path_of(href)
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
}

/// Strip scheme and host from absolute hrefs.
fn path_of(href: &str) -> &str {
    match href.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |index| &rest[index..]),
        None => href,
    }
}
