//! In-memory retained layout tree.
//!
//! Boxes are supplied by whoever builds the tree (a headless renderer, a test,
//! the simulator) in document coordinates. The tree resolves just enough
//! styling to behave like a browser for the sticky engine:
//! - `position: fixed` boxes come from `left`/`top` plus `translate(..)`
//! - `display: none` on a node or an ancestor collapses it to the zero box
//! - ancestors' scroll offsets and the window scroll shift client boxes
//!
//! `MemoryTree` is a cheap handle (`Rc`); clones share the same tree, so a
//! caller can keep one while the engine owns another.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{Host, StyleSink};
use crate::geometry::{Frame, Rect};

/// Index of a node in a [`MemoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Side-effect counters, for observing what the engine did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// `set_style` + `remove_style` calls.
    pub style_writes: usize,
    /// `client_rect` calls.
    pub rect_reads: usize,
    /// `deep_clone` calls.
    pub clones: usize,
    /// `remove` calls.
    pub removals: usize,
    /// `scroll_to` calls.
    pub scrolls: usize,
}

#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    layout: Rect,
    scroll_x: f64,
    scroll_y: f64,
}

#[derive(Debug)]
struct Arena {
    nodes: Vec<NodeData>,
    window_scroll: (f64, f64),
    inset: (f64, f64),
    stats: TreeStats,
}

const ROOT: NodeId = NodeId(0);

impl Arena {
    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0)
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).and_then(|n| n.parent), move |p| {
            self.node(*p).and_then(|n| n.parent)
        })
    }

    fn is_connected(&self, id: NodeId) -> bool {
        id == ROOT || self.ancestors(id).any(|a| a == ROOT)
    }

    fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.style.get(property))
            .map(String::as_str)
    }

    fn is_fixed(&self, id: NodeId) -> bool {
        self.style(id, "position") == Some("fixed")
    }

    fn is_hidden(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .any(|n| self.style(n, "display") == Some("none"))
    }

    /// Client box as if no element were fixed.
    fn flow_client(&self, id: NodeId) -> Rect {
        let Some(node) = self.node(id) else {
            return Rect::ZERO;
        };
        let (ax, ay) = self
            .ancestors(id)
            .filter_map(|a| self.node(a))
            .fold((0.0, 0.0), |(x, y), a| (x + a.scroll_x, y + a.scroll_y));
        node.layout.translate(
            self.inset.0 - self.window_scroll.0 - ax,
            self.inset.1 - self.window_scroll.1 - ay,
        )
    }

    /// Client box of a fixed element from its own styles.
    fn fixed_client(&self, id: NodeId) -> Rect {
        let Some(node) = self.node(id) else {
            return Rect::ZERO;
        };
        let length = |prop: &str| self.style(id, prop).and_then(parse_px);
        let (tx, ty) = self
            .style(id, "transform")
            .and_then(parse_translate)
            .unwrap_or((0.0, 0.0));
        Rect::new(
            length("left").unwrap_or(0.0) + tx,
            length("top").unwrap_or(0.0) + ty,
            length("width").unwrap_or(node.layout.width),
            length("height").unwrap_or(node.layout.height),
        )
    }

    fn client_rect(&self, id: NodeId) -> Option<Rect> {
        if !self.is_connected(id) {
            return None;
        }
        if self.is_hidden(id) {
            return Some(Rect::ZERO);
        }
        if self.is_fixed(id) {
            return Some(self.fixed_client(id));
        }
        // Descendants of a fixed element move with it.
        let flow = self.flow_client(id);
        let shifted = self.ancestors(id).find(|a| self.is_fixed(*a)).map_or(flow, |a| {
            let from = self.flow_client(a);
            let to = self.fixed_client(a);
            flow.translate(to.x - from.x, to.y - from.y)
        });
        Some(shifted)
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    fn copy_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let mut data = self.node(id)?.clone();
        let children = std::mem::take(&mut data.children);
        data.parent = None;
        let copy = NodeId(self.nodes.len());
        self.nodes.push(data);
        for child in children {
            if let Some(child_copy) = self.copy_subtree(child) {
                if let Some(c) = self.node_mut(child_copy) {
                    c.parent = Some(copy);
                }
                if let Some(n) = self.node_mut(copy) {
                    n.children.push(child_copy);
                }
            }
        }
        Some(copy)
    }

    fn descendants(&self, scope: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.node(scope) else {
            return;
        };
        for child in &node.children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }

    fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        selector.alternatives.iter().any(|chain| {
            let mut parts = chain.iter().rev();
            let Some(last) = parts.next() else {
                return false;
            };
            if !self.matches_compound(id, last) {
                return false;
            }
            let mut ancestors = self.ancestors(id);
            parts.all(|part| ancestors.any(|a| self.matches_compound(a, part)))
        })
    }

    fn matches_compound(&self, id: NodeId, compound: &Compound) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if id == ROOT {
            return false;
        }
        if let Some(tag) = &compound.tag {
            if !node.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(want) = &compound.id {
            if node.attributes.get("id") != Some(want) {
                return false;
            }
        }
        let classes = node.attributes.get("class").map_or("", String::as_str);
        if !compound
            .classes
            .iter()
            .all(|c| classes.split_whitespace().any(|have| have == c))
        {
            return false;
        }
        compound
            .attributes
            .iter()
            .all(|(name, value)| match (node.attributes.get(name), value) {
                (Some(_), None) => true,
                (Some(have), Some(want)) => have == want,
                (None, _) => false,
            })
    }
}

/// An in-memory layout tree. See the module docs.
#[derive(Debug, Clone)]
pub struct MemoryTree {
    inner: Rc<RefCell<Arena>>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    /// Empty document.
    pub fn new() -> Self {
        let root = NodeData {
            tag: "html".to_string(),
            ..NodeData::default()
        };
        Self {
            inner: Rc::new(RefCell::new(Arena {
                nodes: vec![root],
                window_scroll: (0.0, 0.0),
                inset: (0.0, 0.0),
                stats: TreeStats::default(),
            })),
        }
    }

    /// The document element.
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut arena = self.inner.borrow_mut();
        let id = NodeId(arena.nodes.len());
        arena.nodes.push(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        });
        id
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut arena = self.inner.borrow_mut();
        arena.detach(child);
        if let Some(p) = arena.node_mut(parent) {
            p.children.push(child);
        } else {
            return;
        }
        if let Some(c) = arena.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Create an element with a document-space box and append it.
    pub fn add(&self, parent: NodeId, tag: &str, layout: Rect) -> NodeId {
        let id = self.create_element(tag);
        self.set_layout(id, layout);
        self.append_child(parent, id);
        id
    }

    /// Set an element's flow box in document coordinates.
    pub fn set_layout(&self, node: NodeId, layout: Rect) {
        if let Some(n) = self.inner.borrow_mut().node_mut(node) {
            n.layout = layout;
        }
    }

    /// Scroll the window.
    pub fn scroll_window_to(&self, x: f64, y: f64) {
        self.inner.borrow_mut().window_scroll = (x, y);
    }

    /// Border inset of the document element.
    pub fn set_inset(&self, left: f64, top: f64) {
        self.inner.borrow_mut().inset = (left, top);
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.inner.borrow().node(node).map(|n| n.tag.clone())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .node(node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().node(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .borrow()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Every inline style on a node, sorted by property name.
    pub fn styles(&self, node: NodeId) -> Vec<(String, String)> {
        self.inner
            .borrow()
            .node(node)
            .map(|n| {
                n.style
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn stats(&self) -> TreeStats {
        self.inner.borrow().stats
    }

    pub fn reset_stats(&self) {
        self.inner.borrow_mut().stats = TreeStats::default();
    }
}

impl StyleSink for MemoryTree {
    type Node = NodeId;

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        let mut arena = self.inner.borrow_mut();
        arena.stats.style_writes += 1;
        if let Some(n) = arena.node_mut(*node) {
            n.style.insert(property.to_string(), value.to_string());
        }
    }

    fn remove_style(&self, node: &NodeId, property: &str) {
        let mut arena = self.inner.borrow_mut();
        arena.stats.style_writes += 1;
        if let Some(n) = arena.node_mut(*node) {
            n.style.remove(property);
        }
    }

    fn scroll_to(&self, node: &NodeId, x: f64, y: f64) {
        let mut arena = self.inner.borrow_mut();
        arena.stats.scrolls += 1;
        if let Some(n) = arena.node_mut(*node) {
            n.scroll_x = x;
            n.scroll_y = y;
        }
    }
}

impl Host for MemoryTree {
    fn client_rect(&self, node: &NodeId) -> Option<Rect> {
        let mut arena = self.inner.borrow_mut();
        arena.stats.rect_reads += 1;
        arena.client_rect(*node)
    }

    fn frame(&self, container: Option<&NodeId>) -> Frame {
        let arena = self.inner.borrow();
        match container.and_then(|c| arena.node(*c).map(|n| (c, n))) {
            Some((id, node)) => {
                let origin = arena.client_rect(*id).unwrap_or(Rect::ZERO);
                Frame {
                    origin_x: origin.x,
                    origin_y: origin.y,
                    scroll_x: node.scroll_x,
                    scroll_y: node.scroll_y,
                }
            }
            None => Frame {
                origin_x: arena.inset.0,
                origin_y: arena.inset.1,
                scroll_x: arena.window_scroll.0,
                scroll_y: arena.window_scroll.1,
            },
        }
    }

    fn scroll_left(&self, node: &NodeId) -> f64 {
        self.inner.borrow().node(*node).map_or(0.0, |n| n.scroll_x)
    }

    fn inline_style(&self, node: &NodeId, property: &str) -> Option<String> {
        self.inner
            .borrow()
            .style(*node, property)
            .map(str::to_string)
    }

    fn query_first(&self, scope: Option<&NodeId>, selector: &str) -> Option<NodeId> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn query_all(&self, scope: Option<&NodeId>, selector: &str) -> Vec<NodeId> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        let arena = self.inner.borrow();
        let mut candidates = Vec::new();
        arena.descendants(scope.copied().unwrap_or(ROOT), &mut candidates);
        candidates.retain(|id| arena.matches(*id, &selector));
        candidates
    }

    fn closest(&self, node: &NodeId, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector)?;
        let arena = self.inner.borrow();
        let found = std::iter::once(*node)
            .chain(arena.ancestors(*node))
            .find(|id| arena.matches(*id, &selector));
        found
    }

    fn first_element_child(&self, node: &NodeId) -> Option<NodeId> {
        self.inner
            .borrow()
            .node(*node)
            .and_then(|n| n.children.first().copied())
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.inner.borrow().is_connected(*node)
    }

    fn deep_clone(&self, node: &NodeId) -> Option<NodeId> {
        let mut arena = self.inner.borrow_mut();
        arena.stats.clones += 1;
        arena.copy_subtree(*node)
    }

    fn insert_after(&self, anchor: &NodeId, node: &NodeId) {
        let mut arena = self.inner.borrow_mut();
        let Some(parent) = arena.node(*anchor).and_then(|n| n.parent) else {
            return;
        };
        arena.detach(*node);
        let Some(p) = arena.node_mut(parent) else {
            return;
        };
        let at = p
            .children
            .iter()
            .position(|c| c == anchor)
            .map_or(p.children.len(), |i| i + 1);
        p.children.insert(at, *node);
        if let Some(n) = arena.node_mut(*node) {
            n.parent = Some(parent);
        }
    }

    fn remove(&self, node: &NodeId) {
        let mut arena = self.inner.borrow_mut();
        arena.stats.removals += 1;
        arena.detach(*node);
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        if let Some(n) = self.inner.borrow_mut().node_mut(*node) {
            n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) {
        if let Some(n) = self.inner.borrow_mut().node_mut(*node) {
            n.attributes.remove(name);
        }
    }
}

/// `tag#id.class[attr][attr=value]`
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

/// Comma-separated list of descendant chains of compounds.
#[derive(Debug)]
struct Selector {
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    fn parse(input: &str) -> Option<Self> {
        let alternatives = input
            .split(',')
            .map(|alt| {
                split_outside_brackets(alt)
                    .iter()
                    .map(|part| Compound::parse(part))
                    .collect::<Option<Vec<_>>>()
            })
            .collect::<Option<Vec<_>>>()?;
        if alternatives.iter().any(Vec::is_empty) {
            return None;
        }
        Some(Self { alternatives })
    }
}

fn split_outside_brackets(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in input.chars() {
        match ch {
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

impl Compound {
    fn parse(input: &str) -> Option<Self> {
        let mut compound = Self::default();
        let mut rest = input;
        let name_end = |s: &str| s.find(['#', '.', '[']).unwrap_or(s.len());

        let end = name_end(rest);
        let (tag, tail) = rest.split_at(end);
        if !tag.is_empty() && tag != "*" {
            compound.tag = Some(tag.to_string());
        }
        rest = tail;

        while let Some(marker) = rest.chars().next() {
            let body = rest.get(1..)?;
            match marker {
                '#' | '.' => {
                    let end = name_end(body);
                    let (name, tail) = body.split_at(end);
                    if name.is_empty() {
                        return None;
                    }
                    if marker == '#' {
                        compound.id = Some(name.to_string());
                    } else {
                        compound.classes.push(name.to_string());
                    }
                    rest = tail;
                }
                '[' => {
                    let close = body.find(']')?;
                    let inner = body.get(..close)?;
                    let attribute = match inner.split_once('=') {
                        Some((name, value)) => (
                            name.trim().to_string(),
                            Some(value.trim().trim_matches(['"', '\'']).to_string()),
                        ),
                        None => (inner.trim().to_string(), None),
                    };
                    if attribute.0.is_empty() {
                        return None;
                    }
                    compound.attributes.push(attribute);
                    rest = body.get(close + 1..)?;
                }
                _ => return None,
            }
        }
        Some(compound)
    }
}

fn parse_px(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

fn parse_translate(value: &str) -> Option<(f64, f64)> {
    let args = value
        .trim()
        .strip_prefix("translate(")?
        .strip_suffix(')')?;
    let (x, y) = args.split_once(',')?;
    Some((parse_px(x)?, parse_px(y)?))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    fn table_tree() -> (MemoryTree, NodeId, NodeId, Vec<NodeId>) {
        let tree = MemoryTree::new();
        let table = tree.add(tree.root(), "table", Rect::new(0.0, 100.0, 600.0, 2000.0));
        tree.set_attribute(&table, "id", "data");
        let thead = tree.add(table, "thead", Rect::new(0.0, 100.0, 600.0, 40.0));
        let row = tree.add(thead, "tr", Rect::new(0.0, 100.0, 600.0, 40.0));
        let cells = (0..3)
            .map(|i| {
                let x = f64::from(i) * 200.0;
                tree.add(row, "th", Rect::new(x, 100.0, 200.0, 40.0))
            })
            .collect();
        (tree, table, thead, cells)
    }

    #[test]
    fn test_query_by_tag_id_and_descendant_chain() {
        let (tree, table, thead, cells) = table_tree();
        assert_eq!(tree.query_first(None, "#data"), Some(table));
        assert_eq!(tree.query_first(Some(&table), "thead"), Some(thead));
        assert_eq!(tree.query_all(Some(&thead), "th"), cells);
        assert_eq!(tree.query_all(None, "table thead th").len(), 3);
        assert_eq!(tree.query_all(None, "tbody th").len(), 0);
    }

    #[test]
    fn test_query_attribute_class_and_lists() {
        let (tree, table, _, cells) = table_tree();
        tree.set_attribute(&cells[1], "class", "num wide");
        tree.set_attribute(&table, "data-scroll-container", "");
        tree.set_attribute(&cells[2], "data-kind", "total");
        assert_eq!(tree.query_all(None, ".wide"), vec![cells[1]]);
        assert_eq!(tree.query_all(None, "th.num.wide"), vec![cells[1]]);
        assert_eq!(tree.query_all(None, "[data-kind='total']"), vec![cells[2]]);
        assert_eq!(tree.query_all(None, ".wide, [data-kind=total]").len(), 2);
        assert_eq!(tree.closest(&cells[0], "[data-scroll-container]"), Some(table));
    }

    #[test]
    fn test_malformed_selector_matches_nothing() {
        let (tree, _, _, _) = table_tree();
        assert!(tree.query_all(None, "th[").is_empty());
        assert!(tree.query_all(None, "#").is_empty());
    }

    #[test]
    fn test_client_rect_follows_window_scroll() {
        let (tree, table, _, _) = table_tree();
        tree.scroll_window_to(0.0, 250.0);
        assert_eq!(
            tree.client_rect(&table),
            Some(Rect::new(0.0, -150.0, 600.0, 2000.0))
        );
    }

    #[test]
    fn test_fixed_element_and_descendants_use_translate() {
        let (tree, _, thead, cells) = table_tree();
        tree.scroll_window_to(0.0, 500.0);
        tree.set_style(&thead, "position", "fixed");
        tree.set_style(&thead, "top", "0px");
        tree.set_style(&thead, "left", "0px");
        tree.set_style(&thead, "transform", "translate(0px, 60px)");
        assert_eq!(
            tree.client_rect(&thead),
            Some(Rect::new(0.0, 60.0, 600.0, 40.0))
        );
        assert_eq!(
            tree.client_rect(&cells[1]),
            Some(Rect::new(200.0, 60.0, 200.0, 40.0))
        );
    }

    #[test]
    fn test_hidden_and_detached() {
        let (tree, _, thead, cells) = table_tree();
        tree.set_style(&thead, "display", "none");
        assert_eq!(tree.client_rect(&cells[0]), Some(Rect::ZERO));
        tree.remove(&thead);
        assert!(!tree.is_connected(&cells[0]));
        assert_eq!(tree.client_rect(&cells[0]), None);
    }

    #[test]
    fn test_deep_clone_and_insert_after() {
        let (tree, table, thead, _) = table_tree();
        let copy = tree.deep_clone(&thead).unwrap();
        assert!(!tree.is_connected(&copy));
        tree.insert_after(&thead, &copy);
        assert_eq!(tree.children(table), vec![thead, copy]);
        assert_eq!(tree.query_all(Some(&copy), "th").len(), 3);
        assert_eq!(tree.stats().clones, 1);
    }

    #[test]
    fn test_element_frame_uses_container_scroll() {
        let tree = MemoryTree::new();
        let pane = tree.add(tree.root(), "div", Rect::new(0.0, 50.0, 800.0, 400.0));
        let table = tree.add(pane, "table", Rect::new(0.0, 80.0, 800.0, 1000.0));
        tree.scroll_to(&pane, 0.0, 200.0);
        let frame = tree.frame(Some(&pane));
        assert_eq!((frame.origin_y, frame.scroll_y), (50.0, 200.0));
        let client = tree.client_rect(&table).unwrap();
        assert_eq!(frame.to_document(client).y, 30.0);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_px("12.5px"), Some(12.5));
        assert_eq!(parse_px("auto"), None);
        assert_eq!(
            parse_translate("translate(8px, -10px)"),
            Some((8.0, -10.0))
        );
    }
}
