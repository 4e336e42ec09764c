//! The scroll reference frame.

use super::Rect;

/// Where the scroll container sits on screen and how far it is scrolled.
///
/// For the window, the origin is the document element's border inset
/// (`clientLeft`/`clientTop`). For an element container it is the element's
/// padding-box corner in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    /// Viewport x of the frame's content origin.
    pub origin_x: f64,
    /// Viewport y of the frame's content origin.
    pub origin_y: f64,
    /// Horizontal scroll offset.
    pub scroll_x: f64,
    /// Vertical scroll offset.
    pub scroll_y: f64,
}

impl Frame {
    /// Window frame with no inset.
    pub const fn scrolled(scroll_x: f64, scroll_y: f64) -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            scroll_x,
            scroll_y,
        }
    }

    /// Convert a viewport rectangle to document space: add back the scroll
    /// offset, subtract the frame's inset.
    pub fn to_document(&self, client: Rect) -> Rect {
        client.translate(self.scroll_x - self.origin_x, self.scroll_y - self.origin_y)
    }

    /// Convert a frame-relative position (what the state machine produces) to
    /// viewport coordinates for fixed positioning.
    pub fn to_viewport(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.origin_x, y + self.origin_y)
    }
}
