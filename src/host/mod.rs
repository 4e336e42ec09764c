//! The layout-tree seam.
//!
//! The engine never touches the DOM directly. It reads geometry and edits the
//! tree through [`Host`], and writes presentation state through the narrower
//! [`StyleSink`]. The style stage is generic over `StyleSink` alone, so it has
//! no way to read layout between writes.
//!
//! Two hosts ship with the crate: `web::DomHost` (browser, wasm32 only) and
//! [`MemoryTree`], an in-memory retained tree with explicit boxes.

mod memory;

pub use memory::{MemoryTree, NodeId, TreeStats};

use std::fmt::Debug;

use crate::geometry::{Frame, Rect};

/// Write access to presentation state.
pub trait StyleSink {
    /// Handle to one element of the tree.
    type Node: Clone + PartialEq + Debug;

    /// Set an inline style property.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    /// Remove an inline style property. Removing an unset property is a no-op.
    fn remove_style(&self, node: &Self::Node, property: &str);

    /// Scroll an element's content to `(x, y)`.
    fn scroll_to(&self, node: &Self::Node, x: f64, y: f64);
}

/// Full access to a retained layout tree.
pub trait Host: StyleSink {
    /// The element's border box in viewport coordinates, or `None` when the
    /// element is no longer in the tree. Hidden elements report a zero box.
    fn client_rect(&self, node: &Self::Node) -> Option<Rect>;

    /// The scroll reference frame. `None` is the window.
    fn frame(&self, container: Option<&Self::Node>) -> Frame;

    /// Horizontal scroll offset of an element.
    fn scroll_left(&self, node: &Self::Node) -> f64;

    /// Current inline value of a style property, if set.
    fn inline_style(&self, node: &Self::Node, property: &str) -> Option<String>;

    /// First descendant of `scope` (or of the document) matching `selector`.
    fn query_first(&self, scope: Option<&Self::Node>, selector: &str) -> Option<Self::Node>;

    /// All descendants of `scope` (or of the document) matching `selector`,
    /// in document order.
    fn query_all(&self, scope: Option<&Self::Node>, selector: &str) -> Vec<Self::Node>;

    /// Nearest inclusive ancestor matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;

    /// First element child.
    fn first_element_child(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether the element is still attached to the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Detached deep copy of an element and its subtree.
    fn deep_clone(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Insert `node` as the next sibling of `anchor`.
    fn insert_after(&self, anchor: &Self::Node, node: &Self::Node);

    /// Detach an element from the tree.
    fn remove(&self, node: &Self::Node);

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    fn remove_attribute(&self, node: &Self::Node, name: &str);
}
