//! Geometry primitives shared by the measuring and styling stages.
//!
//! This module handles:
//! - Rectangles in document space (stable under scrolling)
//! - The scroll reference frame and its client/document conversions
//! - The per-cycle geometry snapshot

mod frame;
mod snapshot;

pub use frame::Frame;
pub use snapshot::GeometrySnapshot;

/// Axis-aligned box. Document space unless stated otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// The rectangle of an absent element.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Same size, moved by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Within `epsilon` on every component.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.width - other.width).abs() <= epsilon
            && (self.height - other.height).abs() <= epsilon
    }
}

/// Format a length as a CSS pixel value.
pub(crate) fn px(value: f64) -> String {
    format!("{value}px")
}
