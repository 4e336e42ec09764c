//! Common test fixtures.
//!
//! Builds in-memory tables laid out the way a browser would lay out a plain
//! `<table>` with a `<thead>` row, so engine scenarios read like page setups.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use stickyhead::engine::CloneToken;
use stickyhead::geometry::Rect;
use stickyhead::host::{Host, MemoryTree, NodeId, StyleSink};
use stickyhead::{EngineEvent, StickyHeader, StickyOptions};

pub const TABLE_WIDTH: f64 = 800.0;

/// A table with a header row of equal-width cells.
pub struct TableFixture {
    pub tree: MemoryTree,
    pub table: NodeId,
    pub thead: NodeId,
    pub row: NodeId,
    pub cells: Vec<NodeId>,
    pub tbody: NodeId,
}

impl TableFixture {
    /// Table at document `top` with total `height` and a `header`-px header.
    pub fn new(top: f64, height: f64, header: f64, columns: u32) -> Self {
        Self::in_tree(MemoryTree::new(), None, top, height, header, columns)
    }

    /// Same, appended under `parent` (the document root when `None`).
    pub fn in_tree(
        tree: MemoryTree,
        parent: Option<NodeId>,
        top: f64,
        height: f64,
        header: f64,
        columns: u32,
    ) -> Self {
        let parent = parent.unwrap_or_else(|| tree.root());
        let table = tree.add(parent, "table", Rect::new(0.0, top, TABLE_WIDTH, height));
        tree.set_attribute(&table, "id", "orders");
        let thead = tree.add(table, "thead", Rect::new(0.0, top, TABLE_WIDTH, header));
        let row = tree.add(thead, "tr", Rect::new(0.0, top, TABLE_WIDTH, header));
        let width = TABLE_WIDTH / f64::from(columns);
        let cells = (0..columns)
            .map(|c| {
                tree.add(
                    row,
                    "th",
                    Rect::new(f64::from(c) * width, top, width, header),
                )
            })
            .collect();
        let tbody = tree.add(
            table,
            "tbody",
            Rect::new(0.0, top + header, TABLE_WIDTH, height - header),
        );
        Self {
            tree,
            table,
            thead,
            row,
            cells,
            tbody,
        }
    }

    /// Add a fixed banner of `height` px with the given id.
    pub fn add_banner(&self, id: &str, height: f64) -> NodeId {
        let banner = self
            .tree
            .add(self.tree.root(), "div", Rect::new(0.0, 0.0, 1200.0, height));
        self.tree.set_attribute(&banner, "id", id);
        self.tree.set_style(&banner, "position", "fixed");
        self.tree.set_style(&banner, "height", &format!("{height}px"));
        banner
    }

    pub fn attach(&self, options: StickyOptions) -> StickyHeader<MemoryTree> {
        StickyHeader::attach_with_token(
            self.tree.clone(),
            &self.table,
            options,
            CloneToken::from_raw(7),
        )
        .expect("attach")
    }

    /// Scroll the window and deliver the scroll event.
    pub fn scroll(&self, engine: &mut StickyHeader<MemoryTree>, y: f64) {
        self.tree.scroll_window_to(0.0, y);
        engine.handle(EngineEvent::FrameScrolled);
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.tree.inline_style(&node, property)
    }

    /// Every inline style on the header, row and cells.
    pub fn header_styles(&self) -> Vec<(NodeId, Vec<(String, String)>)> {
        std::iter::once(self.thead)
            .chain(std::iter::once(self.row))
            .chain(self.cells.iter().copied())
            .map(|n| (n, self.tree.styles(n)))
            .collect()
    }
}
