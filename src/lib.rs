//! stickyhead - sticky table headers for the web
//!
//! Keeps a table's header row visible while the table body scrolls past it:
//! - The header is pinned below any fixed page chrome, then rides up with the
//!   table's trailing edge so it never covers what follows the table
//! - A hidden copy of the header holds its place in the table, so nothing
//!   below it jumps
//! - Column widths are pinned to the measured cells, and horizontal table
//!   scroll is mirrored onto the header
//! - Scroll, window resize and table size changes keep it all in sync
//!
//! The engine is generic over a [`host::Host`]; the browser build binds it to
//! the DOM, and [`host::MemoryTree`] runs it headless.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { createStickyHeader } from 'stickyhead';
//! await init();
//! const sticky = createStickyHeader(document.querySelector('table'), {});
//! sticky.dispose();
//! ```
//!
//! # Usage (Rust, headless)
//!
//! ```
//! use stickyhead::geometry::Rect;
//! use stickyhead::host::MemoryTree;
//! use stickyhead::{StickyHeader, StickyMode, StickyOptions};
//!
//! let tree = MemoryTree::new();
//! let table = tree.add(tree.root(), "table", Rect::new(0.0, 0.0, 600.0, 2000.0));
//! let thead = tree.add(table, "thead", Rect::new(0.0, 0.0, 600.0, 40.0));
//! tree.add(thead, "th", Rect::new(0.0, 0.0, 600.0, 40.0));
//!
//! let mut sticky = StickyHeader::attach(tree.clone(), &table, StickyOptions::default())?;
//! tree.scroll_window_to(0.0, 500.0);
//! sticky.handle(stickyhead::EngineEvent::FrameScrolled);
//! assert_eq!(sticky.state().mode, StickyMode::StuckTop);
//! sticky.dispose();
//! # Ok::<(), stickyhead::StickyError>(())
//! ```

pub mod engine;
pub mod error;
pub mod geometry;
pub mod host;
pub mod options;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use engine::{EngineEvent, StickyHeader, StickyMode, StickyState};
pub use error::{Result, StickyError};
pub use options::StickyOptions;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
