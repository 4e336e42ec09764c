//! The scroll-driven sticky decision.
//!
//! [`decide`] is a pure function of the scroll offset and the last snapshot.
//! All positions it produces are relative to the reference frame's top edge,
//! so `y == fixed_offset` means "directly below the fixed chrome".

use serde::Serialize;

use crate::geometry::GeometrySnapshot;

/// Positions closer than this are the same pixel.
pub const POSITION_EPSILON: f64 = 0.01;

/// Where the header is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StickyMode {
    /// In normal document flow.
    #[default]
    Flowing,
    /// Pinned below the fixed-offset boundary.
    StuckTop,
    /// Riding up with the table's trailing edge.
    StuckBottom,
}

impl StickyMode {
    pub fn is_stuck(self) -> bool {
        !matches!(self, Self::Flowing)
    }
}

/// Mode plus the header's vertical offset within the reference frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StickyState {
    pub mode: StickyMode,
    pub y: f64,
}

impl StickyState {
    /// Same mode, same pixel.
    pub fn same_as(&self, other: &Self) -> bool {
        self.mode == other.mode && (self.y - other.y).abs() <= POSITION_EPSILON
    }
}

/// What changed between two consecutive states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same mode. A stuck header may still need its offset updated.
    Unchanged,
    /// Flowing to either stuck mode.
    Entered,
    /// Between the two stuck modes.
    Switched,
    /// Either stuck mode back to flowing.
    Released,
}

impl Transition {
    pub fn between(from: StickyMode, to: StickyMode) -> Self {
        match (from.is_stuck(), to.is_stuck()) {
            (false, true) => Self::Entered,
            (true, false) => Self::Released,
            (true, true) if from != to => Self::Switched,
            _ => Self::Unchanged,
        }
    }
}

/// Decide the header's state for scroll offset `scroll_y`.
///
/// In priority order:
/// 1. the table's trailing edge, less the header height, has passed above the
///    boundary: `StuckBottom`, riding with that edge;
/// 2. the table's top has passed above the boundary: `StuckTop` at the
///    boundary;
/// 3. otherwise `Flowing` at the table's own position.
///
/// Both comparisons are strict. At exactly the boundary the header flows, and
/// at exactly the release edge it is `StuckTop`, which is the same pixel as
/// the bottom clamp would give.
pub fn decide(scroll_y: f64, snapshot: &GeometrySnapshot) -> StickyState {
    let boundary = snapshot.fixed_offset;
    let bottom_y = snapshot.release_edge() - scroll_y;
    let top_y = snapshot.table.y - scroll_y;

    if bottom_y < boundary {
        StickyState {
            mode: StickyMode::StuckBottom,
            y: bottom_y,
        }
    } else if top_y < boundary {
        StickyState {
            mode: StickyMode::StuckTop,
            y: boundary,
        }
    } else {
        StickyState {
            mode: StickyMode::Flowing,
            y: top_y,
        }
    }
}
