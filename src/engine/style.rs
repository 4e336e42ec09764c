//! Presentation writes.
//!
//! These functions only take a [`StyleSink`], so they cannot read layout.
//! The engine reads everything it needs first, then calls in here.

use crate::geometry::{px, Rect};
use crate::host::{Host, StyleSink};

/// Properties set on the header while it is stuck.
pub const HEADER_PROPERTIES: [&str; 8] = [
    "position",
    "top",
    "left",
    "width",
    "height",
    "z-index",
    "overflow",
    "transform",
];

/// Properties pinned on each header cell while stuck.
pub const CELL_PROPERTIES: [&str; 4] = ["min-width", "max-width", "min-height", "max-height"];

/// Where and how large the stuck header is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Viewport translation of the header's top-left corner.
    pub translate: (f64, f64),
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
}

/// Inline style values as they were before the engine first wrote them.
#[derive(Debug, Clone)]
pub struct StyleBackup<N> {
    entries: Vec<(N, &'static str, Option<String>)>,
}

impl<N> Default for StyleBackup<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<N: Clone + PartialEq> StyleBackup<N> {
    /// Record the current inline values of `properties` on `node`. Properties
    /// already recorded for that node keep their first value.
    pub fn capture<H: Host<Node = N>>(
        &mut self,
        host: &H,
        node: &N,
        properties: &[&'static str],
    ) {
        for property in properties {
            if self.lookup(node, property).is_none() {
                let value = host.inline_style(node, property);
                self.entries.push((node.clone(), property, value));
            }
        }
    }

    fn lookup(&self, node: &N, property: &str) -> Option<&Option<String>> {
        self.entries
            .iter()
            .find(|(n, p, _)| n == node && *p == property)
            .map(|(_, _, v)| v)
    }

    /// Put `source`'s recorded values onto `target`: recorded values are set
    /// back, recorded absences are removed, unrecorded properties are left
    /// alone. `target` may be `source` itself or a copy of it.
    pub fn restore<S: StyleSink<Node = N>>(
        &self,
        sink: &S,
        source: &N,
        target: &N,
        properties: &[&'static str],
    ) {
        for property in properties {
            match self.lookup(source, property) {
                Some(Some(value)) => sink.set_style(target, property, value),
                Some(None) => sink.remove_style(target, property),
                None => {}
            }
        }
    }

    /// Drop records for nodes not in `keep`.
    pub fn retain(&mut self, keep: &[N]) {
        self.entries.retain(|(n, _, _)| keep.contains(n));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Take the header out of flow and draw it at `placement`, pinning every
/// cell to its measured box so column widths do not drift.
pub fn apply<S: StyleSink>(
    sink: &S,
    header: &S::Node,
    cells: &[S::Node],
    cell_rects: &[Rect],
    placement: &Placement,
) {
    for (cell, rect) in cells.iter().zip(cell_rects) {
        sink.set_style(cell, "min-width", &px(rect.width));
        sink.set_style(cell, "max-width", &px(rect.width));
        sink.set_style(cell, "min-height", &px(rect.height));
        sink.set_style(cell, "max-height", &px(rect.height));
    }

    sink.set_style(header, "position", "fixed");
    sink.set_style(header, "top", "0px");
    sink.set_style(header, "left", "0px");
    sink.set_style(header, "width", &px(placement.width));
    sink.set_style(header, "height", &px(placement.height));
    sink.set_style(header, "z-index", &placement.z_index.to_string());
    sink.set_style(header, "overflow", "hidden");
    position(sink, header, placement.translate);
}

/// Move an already stuck header.
pub fn position<S: StyleSink>(sink: &S, header: &S::Node, (x, y): (f64, f64)) {
    sink.set_style(header, "transform", &translate(x, y));
}

/// Undo [`apply`] on the header and its cells, restoring pre-engine values.
pub fn clear<S: StyleSink>(
    sink: &S,
    backup: &StyleBackup<S::Node>,
    header: &S::Node,
    cells: &[S::Node],
) {
    backup.restore(sink, header, header, &HEADER_PROPERTIES);
    for cell in cells {
        backup.restore(sink, cell, cell, &CELL_PROPERTIES);
    }
}

fn translate(x: f64, y: f64) -> String {
    format!("translate({}, {})", px(x), px(y))
}
