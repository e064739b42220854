//! Feed card markup model.

use crate::domain::placeholder::PartKind;

/// Scale applied to the avatar of a collapsed card.
pub const PLACEHOLDER_AVATAR_SCALE: f32 = 0.7;

/// One visual sub-part of a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPart {
    pub kind: PartKind,
    pub visible: bool,
    pub scale: f32,
}

impl CardPart {
    #[must_use]
    pub fn new(kind: PartKind) -> Self {
        Self {
            kind,
            visible: true,
            scale: 1.0,
        }
    }
}

/// A rendered feed card.
///
/// Mirrors the structure the identity resolver and the placeholder
/// transform rely on: an avatar link naming the author, the hrefs found
/// inside the card, and an ordered list of visual parts.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedCard {
    /// Href of the author avatar link, e.g. `/alice`.
    pub author_href: Option<String>,
    /// Every href found inside the card.
    pub links: Vec<String>,
    /// Full rendered height in pixels.
    pub height: f64,
    pub parts: Vec<CardPart>,
    /// A thread connector joins this card to the next one.
    pub thread_continues: bool,
    /// Collapse marker; set while the card renders as a placeholder.
    pub placeholder: bool,
}

impl FeedCard {
    /// A regular status card by `author` with permalink `status_id`.
    #[must_use]
    pub fn status(author: &str, status_id: &str, height: f64) -> Self {
        Self {
            author_href: Some(format!("/{author}")),
            links: vec![
                format!("/{author}"),
                format!("/{author}/status/{status_id}"),
                format!("/{author}/status/{status_id}/analytics"),
            ],
            height,
            parts: default_parts(),
            thread_continues: false,
            placeholder: false,
        }
    }

    /// A card without any permalink, as rendered for minified cards.
    #[must_use]
    pub fn anonymous(height: f64) -> Self {
        Self {
            author_href: None,
            links: Vec::new(),
            height,
            parts: default_parts(),
            thread_continues: false,
            placeholder: false,
        }
    }

    /// Mark this card as continuing into a reply below it.
    #[must_use]
    pub fn with_thread(mut self) -> Self {
        self.thread_continues = true;
        self
    }

    /// Mutable access to the part of the given kind.
    pub fn part_mut(&mut self, kind: PartKind) -> Option<&mut CardPart> {
        self.parts.iter_mut().find(|part| part.kind == kind)
    }

    #[must_use]
    pub fn part(&self, kind: PartKind) -> Option<&CardPart> {
        self.parts.iter().find(|part| part.kind == kind)
    }
}

fn default_parts() -> Vec<CardPart> {
    [
        PartKind::Spacer,
        PartKind::Avatar,
        PartKind::HeaderDetail,
        PartKind::Body,
        PartKind::Media,
        PartKind::Actions,
    ]
    .into_iter()
    .map(CardPart::new)
    .collect()
}
