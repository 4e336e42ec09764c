//! Layout reads: element boxes in document space and the fixed-offset sum.
//!
//! Nothing here writes. Every call reads the live tree; callers never carry a
//! rectangle across a structural change or resize.

use crate::geometry::{Frame, Rect};
use crate::host::Host;

/// Box of `node` in document space. An absent or detached element measures
/// as [`Rect::ZERO`].
pub fn measure<H: Host>(host: &H, frame: &Frame, node: Option<&H::Node>) -> Rect {
    node.and_then(|n| host.client_rect(n))
        .map_or(Rect::ZERO, |client| frame.to_document(client))
}

/// Summed height of every element matched by `selectors`. An element matched
/// by more than one selector counts once.
pub fn fixed_offset<H: Host>(host: &H, selectors: &[String]) -> f64 {
    let mut seen: Vec<H::Node> = Vec::new();
    for node in selectors.iter().flat_map(|s| host.query_all(None, s)) {
        if !seen.contains(&node) {
            seen.push(node);
        }
    }
    seen.iter()
        .filter_map(|n| host.client_rect(n))
        .map(|r| r.height)
        .sum()
}
