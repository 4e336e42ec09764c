//! Engine scenarios over an in-memory page.
//!
//! Each test builds a page with `TableFixture`, drives the engine with events
//! the way the browser bindings would, and checks what ends up in the tree.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{TableFixture, TABLE_WIDTH};
use stickyhead::engine::{CloneToken, CLONE_ATTRIBUTE};
use stickyhead::geometry::Rect;
use stickyhead::host::{Host, MemoryTree, StyleSink, TreeStats};
use stickyhead::{EngineEvent, StickyError, StickyHeader, StickyMode, StickyOptions};

fn clones(tree: &MemoryTree) -> Vec<stickyhead::host::NodeId> {
    tree.query_all(None, &format!("[{CLONE_ATTRIBUTE}]"))
}

// ============================================================================
// Attach
// ============================================================================

#[test]
fn test_attach_inserts_hidden_placeholder() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let engine = page.attach(StickyOptions::default());

    assert_eq!(engine.state().mode, StickyMode::Flowing);
    let placeholders = clones(&page.tree);
    assert_eq!(placeholders.len(), 1);
    let placeholder = placeholders[0];
    assert_eq!(engine.placeholder(), Some(&placeholder));

    // Right after the header, out of flow, invisible to assistive tech.
    assert_eq!(
        page.tree.children(page.table),
        vec![page.thead, placeholder, page.tbody]
    );
    assert_eq!(page.style(placeholder, "display").as_deref(), Some("none"));
    assert_eq!(
        page.tree.attribute(placeholder, "aria-hidden").as_deref(),
        Some("true")
    );
    assert_eq!(
        page.tree.attribute(placeholder, CLONE_ATTRIBUTE).as_deref(),
        Some("0000000000000007-1")
    );
}

#[test]
fn test_attach_leaves_header_alone_while_flowing() {
    let page = TableFixture::new(300.0, 2000.0, 40.0, 4);
    let engine = page.attach(StickyOptions::default());

    assert_eq!(engine.state().mode, StickyMode::Flowing);
    assert_eq!(engine.state().y, 300.0);
    for (_, styles) in page.header_styles() {
        assert!(styles.is_empty(), "{styles:?}");
    }
}

#[test]
fn test_attach_selector_missing_table() {
    let tree = MemoryTree::new();
    let result = StickyHeader::attach_selector(tree, "#nope", StickyOptions::default());
    assert!(matches!(result, Err(StickyError::TableNotFound(s)) if s == "#nope"));
}

#[test]
fn test_attach_selector_finds_table() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 3);
    let engine =
        StickyHeader::attach_selector(page.tree.clone(), "#orders", StickyOptions::default())
            .expect("attach");
    assert_eq!(engine.table(), &page.table);
    assert_eq!(engine.header(), Some(&page.thead));
}

#[test]
fn test_attach_detached_table_fails() {
    let tree = MemoryTree::new();
    let table = tree.create_element("table");
    let result = StickyHeader::attach(tree, &table, StickyOptions::default());
    assert!(matches!(result, Err(StickyError::TableNotFound(_))));
}

#[test]
fn test_attach_rejects_invalid_options() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 3);
    let options = StickyOptions {
        header_selector: String::new(),
        ..StickyOptions::default()
    };
    let result = StickyHeader::attach(page.tree.clone(), &page.table, options);
    assert!(matches!(result, Err(StickyError::InvalidOptions(_))));
    assert!(clones(&page.tree).is_empty());
}

#[test]
fn test_table_without_header_is_inert() {
    let tree = MemoryTree::new();
    let table = tree.add(tree.root(), "table", Rect::new(0.0, 0.0, 600.0, 2000.0));
    tree.add(table, "tbody", Rect::new(0.0, 0.0, 600.0, 2000.0));

    let mut engine = StickyHeader::attach_with_token(
        tree.clone(),
        &table,
        StickyOptions::default(),
        CloneToken::from_raw(1),
    )
    .expect("attach");
    assert!(engine.header().is_none());
    assert!(engine.placeholder().is_none());

    tree.scroll_window_to(0.0, 500.0);
    assert!(engine.handle(EngineEvent::FrameScrolled).is_none());
    assert_eq!(engine.state().mode, StickyMode::Flowing);
    assert!(clones(&tree).is_empty());
}

// ============================================================================
// Scrolling
// ============================================================================

#[test]
fn test_scroll_sticks_header_to_top() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());

    page.scroll(&mut engine, 500.0);

    assert_eq!(engine.state().mode, StickyMode::StuckTop);
    assert_eq!(engine.state().y, 0.0);
    assert_eq!(page.style(page.thead, "position").as_deref(), Some("fixed"));
    assert_eq!(page.style(page.thead, "top").as_deref(), Some("0px"));
    assert_eq!(page.style(page.thead, "left").as_deref(), Some("0px"));
    assert_eq!(
        page.style(page.thead, "transform").as_deref(),
        Some("translate(0px, 0px)")
    );
    assert_eq!(page.style(page.thead, "width").as_deref(), Some("800px"));
    assert_eq!(page.style(page.thead, "height").as_deref(), Some("40px"));
    assert_eq!(page.style(page.thead, "z-index").as_deref(), Some("10"));
    assert_eq!(
        page.tree.client_rect(&page.thead),
        Some(Rect::new(0.0, 0.0, TABLE_WIDTH, 40.0))
    );

    for cell in &page.cells {
        assert_eq!(page.style(*cell, "min-width").as_deref(), Some("200px"));
        assert_eq!(page.style(*cell, "max-width").as_deref(), Some("200px"));
        assert_eq!(page.style(*cell, "min-height").as_deref(), Some("40px"));
    }

    let placeholder = *engine.placeholder().expect("placeholder");
    assert_eq!(page.style(placeholder, "display"), None);
    assert_eq!(
        page.style(placeholder, "visibility").as_deref(),
        Some("hidden")
    );
    // The copy carries none of the stuck styles.
    assert_eq!(page.style(placeholder, "position"), None);
    assert_eq!(
        page.tree.client_rect(&placeholder),
        Some(Rect::new(0.0, -500.0, TABLE_WIDTH, 40.0))
    );
}

#[test]
fn test_fixed_banner_offsets_stuck_header() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    page.add_banner("banner", 60.0);
    let mut engine = page.attach(StickyOptions::default().with_fixed_offset("#banner"));

    page.scroll(&mut engine, 500.0);

    assert_eq!(engine.state().mode, StickyMode::StuckTop);
    assert_eq!(engine.state().y, 60.0);
    assert_eq!(engine.snapshot().map(|s| s.fixed_offset), Some(60.0));
    assert_eq!(
        page.style(page.thead, "transform").as_deref(),
        Some("translate(0px, 60px)")
    );
    assert_eq!(page.tree.client_rect(&page.thead).map(|r| r.y), Some(60.0));
}

#[test]
fn test_fixed_offsets_sum_and_dedupe() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    page.add_banner("banner", 60.0);
    page.add_banner("toolbar", 24.0);
    let options = StickyOptions::default()
        .with_fixed_offset("#banner")
        .with_fixed_offset("#toolbar")
        .with_fixed_offset("#banner, div#toolbar")
        .with_fixed_offset("#missing");
    let mut engine = page.attach(options);

    page.scroll(&mut engine, 500.0);
    assert_eq!(engine.state().y, 84.0);
}

#[test]
fn test_header_clamps_to_table_bottom() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());

    // Only the last 30px of the table are on screen.
    page.scroll(&mut engine, 1970.0);

    assert_eq!(engine.state().mode, StickyMode::StuckBottom);
    let header = page.tree.client_rect(&page.thead).expect("header box");
    let table = page.tree.client_rect(&page.table).expect("table box");
    assert_eq!(header.bottom(), table.bottom());
    assert_eq!(header.bottom(), 30.0);
}

#[test]
fn test_bottom_offset_releases_early() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let options = StickyOptions {
        bottom_offset: 75.0,
        ..StickyOptions::default()
    };
    let mut engine = page.attach(options);

    page.scroll(&mut engine, 1880.0);
    assert_eq!(engine.state().mode, StickyMode::StuckTop);
    page.scroll(&mut engine, 1900.0);
    assert_eq!(engine.state().mode, StickyMode::StuckBottom);
    assert_eq!(engine.state().y, -15.0);
}

#[test]
fn test_z_index_option() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 2);
    let options = StickyOptions {
        z_index: 99,
        ..StickyOptions::default()
    };
    let mut engine = page.attach(options);
    page.scroll(&mut engine, 500.0);
    assert_eq!(page.style(page.thead, "z-index").as_deref(), Some("99"));
}

#[test]
fn test_full_pass_top_bottom_and_back() {
    let page = TableFixture::new(200.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());
    let before = page.header_styles();

    page.scroll(&mut engine, 100.0);
    assert_eq!(engine.state().mode, StickyMode::Flowing);
    assert_eq!(engine.state().y, 100.0);

    page.scroll(&mut engine, 700.0);
    assert_eq!(engine.state().mode, StickyMode::StuckTop);

    page.scroll(&mut engine, 2180.0);
    assert_eq!(engine.state().mode, StickyMode::StuckBottom);
    assert_eq!(
        page.style(page.thead, "transform").as_deref(),
        Some("translate(0px, -20px)")
    );

    page.scroll(&mut engine, 700.0);
    assert_eq!(engine.state().mode, StickyMode::StuckTop);
    assert_eq!(
        page.style(page.thead, "transform").as_deref(),
        Some("translate(0px, 0px)")
    );

    page.scroll(&mut engine, 0.0);
    assert_eq!(engine.state().mode, StickyMode::Flowing);
    assert_eq!(page.header_styles(), before);
    let placeholder = *engine.placeholder().expect("placeholder");
    assert_eq!(page.style(placeholder, "display").as_deref(), Some("none"));
}

#[test]
fn test_repeated_scroll_writes_nothing() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());
    page.scroll(&mut engine, 500.0);

    page.tree.reset_stats();
    engine.handle(EngineEvent::FrameScrolled);
    engine.handle(EngineEvent::FrameScrolled);
    assert_eq!(page.tree.stats(), TreeStats::default());
}

#[test]
fn test_scroll_within_stuck_mode_reads_no_layout() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());

    page.tree.reset_stats();
    page.scroll(&mut engine, 500.0);
    // Entering re-reads geometry once.
    assert!(page.tree.stats().rect_reads > 0);

    page.tree.reset_stats();
    page.scroll(&mut engine, 900.0);
    page.scroll(&mut engine, 1300.0);
    let stats = page.tree.stats();
    assert_eq!(stats.rect_reads, 0);
    assert_eq!(stats.style_writes, 0);
    assert_eq!(stats.clones, 0);
}

#[test]
fn test_flowing_scroll_writes_nothing() {
    let page = TableFixture::new(1000.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());

    page.tree.reset_stats();
    page.scroll(&mut engine, 200.0);
    page.scroll(&mut engine, 400.0);
    assert_eq!(page.tree.stats().style_writes, 0);
    assert_eq!(engine.state().y, 600.0);
}

#[test]
fn test_horizontal_table_scroll_is_mirrored() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());
    page.scroll(&mut engine, 500.0);

    page.tree.scroll_to(&page.table, 120.0, 0.0);
    engine.handle(EngineEvent::TableScrolled);
    assert_eq!(page.tree.scroll_left(&page.thead), 120.0);

    page.tree.scroll_to(&page.table, 0.0, 0.0);
    engine.handle(EngineEvent::TableScrolled);
    assert_eq!(page.tree.scroll_left(&page.thead), 0.0);
}

#[test]
fn test_release_during_refresh_syncs_horizontal_scroll() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());
    page.scroll(&mut engine, 500.0);

    // Both changes land without their own events; the refresh sees them.
    page.tree.scroll_to(&page.table, 120.0, 0.0);
    page.tree.scroll_window_to(0.0, 0.0);
    engine.handle(EngineEvent::TableResized);

    assert_eq!(engine.state().mode, StickyMode::Flowing);
    assert_eq!(page.tree.scroll_left(&page.thead), 120.0);
}

// ============================================================================
// Resize and structure changes
// ============================================================================

#[test]
fn test_window_resize_is_debounced() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());
    page.tree.reset_stats();

    let first = engine
        .handle(EngineEvent::WindowResized { now_ms: 0.0 })
        .expect("wakeup");
    let second = engine
        .handle(EngineEvent::WindowResized { now_ms: 100.0 })
        .expect("wakeup");
    assert_eq!(first.delay_ms, 250);
    assert_ne!(first.ticket, second.ticket);

    engine.handle(EngineEvent::DebounceElapsed(first.ticket));
    assert_eq!(page.tree.stats().clones, 0);

    engine.handle(EngineEvent::DebounceElapsed(second.ticket));
    assert_eq!(page.tree.stats().clones, 1);

    // Consumed.
    engine.handle(EngineEvent::DebounceElapsed(second.ticket));
    assert_eq!(page.tree.stats().clones, 1);
}

#[test]
fn test_poll_timers_runs_after_quiet_period() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let options = StickyOptions {
        resize_debounce_ms: 100,
        ..StickyOptions::default()
    };
    let mut engine = page.attach(options);
    page.tree.reset_stats();

    engine.handle(EngineEvent::WindowResized { now_ms: 1000.0 });
    engine.handle(EngineEvent::WindowResized { now_ms: 1050.0 });
    assert!(!engine.poll_timers(1100.0));
    assert!(engine.poll_timers(1150.0));
    assert!(!engine.poll_timers(2000.0));
    assert_eq!(page.tree.stats().clones, 1);
}

#[test]
fn test_resize_picks_up_new_geometry() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());
    page.scroll(&mut engine, 500.0);

    // The table got narrower and taller.
    page.tree
        .set_layout(page.table, Rect::new(0.0, 0.0, 600.0, 3000.0));
    let wakeup = engine
        .handle(EngineEvent::WindowResized { now_ms: 0.0 })
        .expect("wakeup");
    engine.handle(EngineEvent::DebounceElapsed(wakeup.ticket));

    assert_eq!(page.style(page.thead, "width").as_deref(), Some("600px"));
    assert_eq!(engine.snapshot().map(|s| s.table.height), Some(3000.0));
    page.scroll(&mut engine, 2500.0);
    assert_eq!(engine.state().mode, StickyMode::StuckTop);
}

#[test]
fn test_table_resize_refreshes_immediately() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());
    page.tree.reset_stats();

    assert!(engine.handle(EngineEvent::TableResized).is_none());
    let stats = page.tree.stats();
    assert_eq!(stats.clones, 1);
    assert_eq!(stats.removals, 1);
    assert_eq!(clones(&page.tree).len(), 1);
    assert_eq!(
        page.tree
            .attribute(clones(&page.tree)[0], CLONE_ATTRIBUTE)
            .as_deref(),
        Some("0000000000000007-2")
    );
}

#[test]
fn test_added_column_reaches_placeholder_and_pins() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());
    page.scroll(&mut engine, 500.0);

    let extra = page
        .tree
        .add(page.row, "th", Rect::new(800.0, 0.0, 120.0, 40.0));
    engine.handle(EngineEvent::TableResized);

    let placeholder = *engine.placeholder().expect("placeholder");
    assert_eq!(page.tree.query_all(Some(&placeholder), "th").len(), 5);
    assert_eq!(engine.snapshot().map(|s| s.cells.len()), Some(5));
    assert_eq!(page.style(extra, "min-width").as_deref(), Some("120px"));
    assert_eq!(engine.state().mode, StickyMode::StuckTop);
    assert_eq!(clones(&page.tree).len(), 1);
}

#[test]
fn test_update_refreshes_on_demand() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());
    page.tree.reset_stats();
    engine.update();
    assert_eq!(page.tree.stats().clones, 1);
}

#[test]
fn test_rerendered_header_is_picked_up() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 3);
    let mut engine = page.attach(StickyOptions::default());
    page.scroll(&mut engine, 500.0);

    // The application throws the header away.
    page.tree.remove(&page.thead);
    engine.handle(EngineEvent::TableResized);
    assert!(engine.header().is_none());
    assert!(clones(&page.tree).is_empty());
    assert_eq!(engine.state().mode, StickyMode::Flowing);

    // ...and renders a new one.
    let thead = page.tree.create_element("thead");
    page.tree.set_layout(thead, Rect::new(0.0, 0.0, TABLE_WIDTH, 48.0));
    page.tree.insert_after(&page.tbody, &thead);
    let row = page.tree.add(thead, "tr", Rect::new(0.0, 0.0, TABLE_WIDTH, 48.0));
    page.tree
        .add(row, "th", Rect::new(0.0, 0.0, TABLE_WIDTH, 48.0));
    engine.handle(EngineEvent::TableResized);

    assert_eq!(engine.header(), Some(&thead));
    assert_eq!(engine.state().mode, StickyMode::StuckTop);
    assert_eq!(page.style(thead, "height").as_deref(), Some("48px"));
    assert_eq!(clones(&page.tree).len(), 1);
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_container_ancestor_becomes_table() {
    let tree = MemoryTree::new();
    let wrapper = tree.add(tree.root(), "div", Rect::new(0.0, 0.0, 500.0, 2000.0));
    tree.set_attribute(&wrapper, "data-scroll-container", "");
    let page = TableFixture::in_tree(tree, Some(wrapper), 0.0, 2000.0, 40.0, 4);

    let mut engine = page.attach(StickyOptions::default());
    assert_eq!(engine.table(), &wrapper);
    assert_eq!(engine.observed_node(), Some(page.table));

    page.scroll(&mut engine, 500.0);
    // Width follows the container, not the wider table.
    assert_eq!(page.style(page.thead, "width").as_deref(), Some("500px"));

    page.tree.scroll_to(&wrapper, 90.0, 0.0);
    engine.handle(EngineEvent::TableScrolled);
    assert_eq!(page.tree.scroll_left(&page.thead), 90.0);
}

#[test]
fn test_without_container_ancestor_table_is_used() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let engine = page.attach(StickyOptions::default());
    assert_eq!(engine.table(), &page.table);
    assert_eq!(engine.observed_node(), Some(page.thead));
}

#[test]
fn test_scroll_container_element_frame() {
    let tree = MemoryTree::new();
    let pane = tree.add(tree.root(), "div", Rect::new(0.0, 100.0, TABLE_WIDTH, 400.0));
    tree.set_attribute(&pane, "id", "pane");
    let page = TableFixture::in_tree(tree, Some(pane), 100.0, 2000.0, 40.0, 4);

    let mut engine = page.attach(StickyOptions::default().with_scroll_container("#pane"));
    assert_eq!(engine.scroll_container(), Some(&pane));

    page.tree.scroll_to(&pane, 0.0, 500.0);
    engine.handle(EngineEvent::FrameScrolled);

    assert_eq!(engine.state().mode, StickyMode::StuckTop);
    assert_eq!(engine.state().y, 0.0);
    // Pinned to the pane's top edge on screen.
    assert_eq!(page.tree.client_rect(&page.thead).map(|r| r.y), Some(100.0));

    // The page scrolls, carrying the pane up; the header follows its edge.
    page.tree.scroll_window_to(0.0, 50.0);
    engine.handle(EngineEvent::FrameScrolled);
    assert_eq!(engine.state().mode, StickyMode::StuckTop);
    assert_eq!(page.tree.client_rect(&page.thead).map(|r| r.y), Some(50.0));
}

#[test]
fn test_missing_scroll_container_falls_back_to_window() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default().with_scroll_container("#absent"));
    assert!(engine.scroll_container().is_none());
    page.scroll(&mut engine, 500.0);
    assert_eq!(engine.state().mode, StickyMode::StuckTop);
}

// ============================================================================
// Page-owned styles
// ============================================================================

#[test]
fn test_refresh_while_flowing_keeps_page_styles() {
    let page = TableFixture::new(300.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());

    // The page styles its header after attach.
    page.tree.set_style(&page.cells[0], "min-width", "150px");
    page.tree.set_style(&page.thead, "transform", "scale(1)");

    engine.handle(EngineEvent::TableResized);
    engine.update();
    let wakeup = engine
        .handle(EngineEvent::WindowResized { now_ms: 0.0 })
        .expect("wakeup");
    engine.handle(EngineEvent::DebounceElapsed(wakeup.ticket));

    assert_eq!(engine.state().mode, StickyMode::Flowing);
    assert_eq!(
        page.style(page.cells[0], "min-width").as_deref(),
        Some("150px")
    );
    assert_eq!(
        page.style(page.thead, "transform").as_deref(),
        Some("scale(1)")
    );
}

#[test]
fn test_each_stick_restores_latest_page_styles() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());

    page.tree.set_style(&page.cells[0], "min-width", "150px");
    page.scroll(&mut engine, 500.0);
    assert_eq!(
        page.style(page.cells[0], "min-width").as_deref(),
        Some("200px")
    );
    page.scroll(&mut engine, 0.0);
    assert_eq!(
        page.style(page.cells[0], "min-width").as_deref(),
        Some("150px")
    );

    // Changed again between two sticks.
    page.tree.set_style(&page.cells[0], "min-width", "90px");
    engine.handle(EngineEvent::TableResized);
    assert_eq!(
        page.style(page.cells[0], "min-width").as_deref(),
        Some("90px")
    );
    page.scroll(&mut engine, 500.0);
    page.scroll(&mut engine, 0.0);
    assert_eq!(
        page.style(page.cells[0], "min-width").as_deref(),
        Some("90px")
    );
}

// ============================================================================
// Dispose
// ============================================================================

#[test]
fn test_dispose_restores_tree_exactly() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    page.tree.set_style(&page.thead, "width", "50%");
    page.tree.set_style(&page.cells[1], "min-width", "10px");
    page.tree.set_style(&page.thead, "background", "white");
    let before = page.header_styles();
    let children = page.tree.children(page.table);

    let mut engine = page.attach(StickyOptions::default());
    page.scroll(&mut engine, 500.0);
    page.tree.scroll_to(&page.table, 40.0, 0.0);
    engine.handle(EngineEvent::TableScrolled);
    assert_eq!(page.style(page.thead, "width").as_deref(), Some("800px"));

    engine.dispose();

    assert_eq!(page.header_styles(), before);
    assert_eq!(page.tree.children(page.table), children);
    assert!(clones(&page.tree).is_empty());
    assert_eq!(page.tree.scroll_left(&page.thead), 0.0);
    assert!(engine.is_disposed());
    assert!(engine.placeholder().is_none());
}

#[test]
fn test_dispose_while_flowing() {
    let page = TableFixture::new(300.0, 2000.0, 40.0, 4);
    let before = page.header_styles();
    let mut engine = page.attach(StickyOptions::default());
    engine.dispose();
    assert_eq!(page.header_styles(), before);
    assert!(clones(&page.tree).is_empty());
}

#[test]
fn test_dispose_is_final_and_idempotent() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let mut engine = page.attach(StickyOptions::default());
    engine.handle(EngineEvent::WindowResized { now_ms: 0.0 });
    engine.dispose();
    engine.dispose();

    page.tree.reset_stats();
    page.tree.scroll_window_to(0.0, 500.0);
    assert!(engine.handle(EngineEvent::FrameScrolled).is_none());
    assert!(engine
        .handle(EngineEvent::WindowResized { now_ms: 10.0 })
        .is_none());
    assert!(!engine.poll_timers(10_000.0));
    engine.update();
    assert_eq!(page.tree.stats(), TreeStats::default());
    assert_eq!(engine.state().mode, StickyMode::Flowing);
}

#[test]
fn test_drop_disposes() {
    let page = TableFixture::new(0.0, 2000.0, 40.0, 4);
    let before = page.header_styles();
    {
        let mut engine = page.attach(StickyOptions::default());
        page.scroll(&mut engine, 500.0);
    }
    assert_eq!(page.header_styles(), before);
    assert!(clones(&page.tree).is_empty());
}

#[test]
fn test_two_tables_keep_separate_placeholders() {
    let tree = MemoryTree::new();
    let first = TableFixture::in_tree(tree.clone(), None, 0.0, 1000.0, 40.0, 2);
    let second = TableFixture::in_tree(tree.clone(), None, 1200.0, 1000.0, 40.0, 2);

    let mut a = StickyHeader::attach_with_token(
        tree.clone(),
        &first.table,
        StickyOptions::default(),
        CloneToken::from_raw(1),
    )
    .expect("attach");
    let b = StickyHeader::attach_with_token(
        tree.clone(),
        &second.table,
        StickyOptions::default(),
        CloneToken::from_raw(2),
    )
    .expect("attach");
    assert_eq!(clones(&tree).len(), 2);
    assert_ne!(a.placeholder(), b.placeholder());

    a.dispose();
    assert_eq!(clones(&tree), vec![*b.placeholder().expect("placeholder")]);
}
