//! Viewport-relative geometry reported by a render surface.

/// Bounding rectangle of a rendered item, in viewport-relative pixels.
///
/// `top` and `bottom` are measured from the top edge of the viewport and may
/// be negative for items scrolled past.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Build a rectangle from its top edge and size.
    #[must_use]
    pub fn new(top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
            width,
            height,
        }
    }

    /// True when the item is laid out with a non-zero area.
    ///
    /// Detached or not-yet-rendered items report an all-zero rectangle.
    #[must_use]
    pub fn is_laid_out(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Current viewport geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Visible height in pixels.
    pub height: f64,
    /// Document scroll offset in pixels.
    pub scroll_y: f64,
}
