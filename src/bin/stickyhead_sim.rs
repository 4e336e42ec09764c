//! Headless simulator for stickyhead - sweeps the scroll offset over an
//! in-memory table and prints the header state at each step as JSON lines
//!
//! Usage:
//!   stickyhead_sim --table-top 300 --table-height 2000 --header-height 40
//!   stickyhead_sim --table-height 2000 --header-height 40 --fixed 60 --from 0 --to 2500 --step 50
//!
//! Set `RUST_LOG=stickyhead=debug` to see state transitions.

#![allow(clippy::exit)]

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::io::{self, Write};

    use serde::Serialize;
    use stickyhead::geometry::Rect;
    use stickyhead::host::{Host, MemoryTree, StyleSink};
    use stickyhead::{EngineEvent, StickyHeader, StickyMode, StickyOptions};

    #[derive(Serialize)]
    struct Step {
        scroll: f64,
        mode: StickyMode,
        y: f64,
    }

    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut table_top = 0.0;
    let mut table_height = 2000.0;
    let mut header_height = 40.0;
    let mut columns = 4u32;
    let mut fixed: Vec<f64> = Vec::new();
    let mut from = 0.0;
    let mut to: Option<f64> = None;
    let mut step = 100.0;

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let Some(value) = iter.next() else {
            eprintln!("Missing value for {flag}");
            std::process::exit(1);
        };
        let number: f64 = match value.parse() {
            Ok(n) if f64::is_finite(n) => n,
            _ => {
                eprintln!("Invalid number for {flag}: {value}");
                std::process::exit(1);
            }
        };
        match flag.as_str() {
            "--table-top" => table_top = number,
            "--table-height" => table_height = number,
            "--header-height" => header_height = number,
            "--columns" => {
                columns = match value.parse() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        eprintln!("Invalid column count for {flag}: {value}");
                        std::process::exit(1);
                    }
                };
            }
            "--fixed" => fixed.push(number),
            "--from" => from = number,
            "--to" => to = Some(number),
            "--step" => step = number,
            _ => {
                eprintln!(
                    "Usage: stickyhead_sim [--table-top N] [--table-height N] [--header-height N] \
                     [--columns N] [--fixed N]... [--from N] [--to N] [--step N]"
                );
                std::process::exit(1);
            }
        }
    }
    if step <= 0.0 {
        eprintln!("--step must be positive");
        std::process::exit(1);
    }

    // Fixed chrome stacks from the top of the page; the table starts below it.
    let tree = MemoryTree::new();
    let mut options = StickyOptions::default();
    let mut chrome_y = 0.0;
    for (i, height) in fixed.iter().enumerate() {
        let banner = tree.add(tree.root(), "div", Rect::new(0.0, chrome_y, 1000.0, *height));
        tree.set_attribute(&banner, "id", &format!("fixed-{i}"));
        tree.set_style(&banner, "position", "fixed");
        tree.set_style(&banner, "top", &format!("{chrome_y}px"));
        tree.set_style(&banner, "height", &format!("{height}px"));
        options = options.with_fixed_offset(format!("#fixed-{i}"));
        chrome_y += height;
    }

    let width = 1000.0;
    let table = tree.add(
        tree.root(),
        "table",
        Rect::new(0.0, table_top, width, table_height),
    );
    let thead = tree.add(table, "thead", Rect::new(0.0, table_top, width, header_height));
    let column_width = width / f64::from(columns);
    for c in 0..columns {
        tree.add(
            thead,
            "th",
            Rect::new(f64::from(c) * column_width, table_top, column_width, header_height),
        );
    }

    let mut sticky = match StickyHeader::attach(tree.clone(), &table, options) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error attaching: {e}");
            std::process::exit(1);
        }
    };

    let to = to.unwrap_or(table_top + table_height + header_height);
    let mut stdout = io::stdout().lock();
    let mut scroll = from;
    while scroll <= to {
        tree.scroll_window_to(0.0, scroll);
        sticky.handle(EngineEvent::FrameScrolled);
        let state = sticky.state();
        let line = Step {
            scroll,
            mode: state.mode,
            y: state.y,
        };
        match serde_json::to_string(&line) {
            Ok(json) => {
                if writeln!(stdout, "{json}").is_err() {
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error serializing step: {e}");
                std::process::exit(1);
            }
        }
        scroll += step;
    }
    sticky.dispose();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
