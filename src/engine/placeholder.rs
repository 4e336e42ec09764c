//! The flow placeholder: a deep copy of the header that holds the header's
//! place in the table while the original is drawn fixed.
//!
//! The copy is never patched. Every refresh throws the old one away and takes
//! a fresh copy, so added or removed columns are picked up.

use log::debug;

use super::style::{StyleBackup, CELL_PROPERTIES, HEADER_PROPERTIES};
use crate::error::Result;
use crate::host::{Host, StyleSink};

/// Attribute carrying the placeholder's identity.
pub const CLONE_ATTRIBUTE: &str = "data-sticky-clone";

/// Random per-engine token used to tag placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneToken(u64);

impl CloneToken {
    /// Draw a fresh token.
    ///
    /// # Errors
    /// Returns an error if the platform has no entropy source.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; 8];
        getrandom::getrandom(&mut bytes)?;
        Ok(Self(u64::from_le_bytes(bytes)))
    }

    /// Fixed token, for reproducible trees.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    fn tag(self, generation: u64) -> String {
        format!("{:016x}-{generation}", self.0)
    }
}

/// Owner of the single placeholder copy.
#[derive(Debug)]
pub struct Placeholder<N> {
    token: CloneToken,
    generation: u64,
    node: Option<N>,
    cells: Vec<N>,
}

impl<N: Clone + PartialEq> Placeholder<N> {
    pub fn new(token: CloneToken) -> Self {
        Self {
            token,
            generation: 0,
            node: None,
            cells: Vec::new(),
        }
    }

    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    pub fn cells(&self) -> &[N] {
        &self.cells
    }

    /// Identity string of the current copy, if one exists.
    pub fn tag(&self) -> Option<String> {
        self.node.as_ref().map(|_| self.token.tag(self.generation))
    }

    /// Replace the copy with a fresh one of `header`, inserted right after it.
    ///
    /// Styles the engine put on the original are stripped from the copy using
    /// `backup`. With no connected header this only removes the old copy.
    pub fn refresh<H: Host<Node = N>>(
        &mut self,
        host: &H,
        header: Option<&N>,
        cells: &[N],
        cell_selector: &str,
        backup: &StyleBackup<N>,
        visible: bool,
    ) {
        self.remove(host);
        let Some(header) = header.filter(|h| host.is_connected(h)) else {
            return;
        };
        let Some(copy) = host.deep_clone(header) else {
            return;
        };

        backup.restore(host, header, &copy, &HEADER_PROPERTIES);
        let copy_cells = host.query_all(Some(&copy), cell_selector);
        for (original, cell) in cells.iter().zip(&copy_cells) {
            backup.restore(host, original, cell, &CELL_PROPERTIES);
        }

        self.generation += 1;
        let tag = self.token.tag(self.generation);
        host.remove_attribute(&copy, "id");
        host.set_attribute(&copy, CLONE_ATTRIBUTE, &tag);
        host.set_attribute(&copy, "aria-hidden", "true");
        set_visible(host, &copy, visible);
        host.insert_after(header, &copy);
        debug!(target: "stickyhead", "placeholder {tag} inserted ({} cells)", copy_cells.len());

        self.node = Some(copy);
        self.cells = copy_cells;
    }

    /// Show the copy in flow (stuck) or take it out of flow (flowing).
    pub fn show<S: StyleSink<Node = N>>(&self, sink: &S, visible: bool) {
        if let Some(node) = &self.node {
            set_visible(sink, node, visible);
        }
    }

    /// Detach the copy. No-op when there is none.
    pub fn remove<H: Host<Node = N>>(&mut self, host: &H) {
        if let Some(node) = self.node.take() {
            host.remove(&node);
        }
        self.cells.clear();
    }
}

fn set_visible<S: StyleSink>(sink: &S, node: &S::Node, visible: bool) {
    if visible {
        sink.remove_style(node, "display");
        sink.set_style(node, "visibility", "hidden");
    } else {
        sink.set_style(node, "display", "none");
        sink.remove_style(node, "visibility");
    }
}
