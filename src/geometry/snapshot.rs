//! One decision cycle's worth of measurements.

use super::Rect;

/// Rectangles read in a single measuring pass. Replaced wholesale on every
/// recompute, never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometrySnapshot {
    /// The table (or its scroll container ancestor).
    pub table: Rect,
    /// The header row at its flow position.
    pub header: Rect,
    /// Header cells, in document order.
    pub cells: Vec<Rect>,
    /// Summed height of the fixed-offset elements.
    pub fixed_offset: f64,
    /// Pixels reserved at the table's trailing edge.
    pub bottom_offset: f64,
}

impl GeometrySnapshot {
    /// Document y past which the header can no longer sit at the boundary
    /// without running over the table's trailing edge.
    pub fn release_edge(&self) -> f64 {
        self.table.bottom() - self.bottom_offset - self.header.height
    }
}
