//! Browser surface: the `StickyTableHeader` class exported to JavaScript.
//!
//! Listeners are registered when the header is attached - no manual
//! JavaScript wiring required.
//!
//! ```javascript
//! import init, { createStickyHeader } from 'stickyhead';
//! await init();
//! const sticky = createStickyHeader('#orders', { fixedOffsetSelectors: ['#banner'] });
//! // after changing the table's content:
//! sticky.update();
//! // when done:
//! sticky.dispose();
//! ```

mod events;
mod host;
mod scroll;

pub use host::DomHost;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::engine::{EngineEvent, StickyHeader};
use crate::error::StickyError;
use crate::host::Host;
use crate::options::StickyOptions;
use events::Bindings;
use scroll::TimerSlot;

/// State reachable from event callbacks.
pub(crate) struct Shared {
    pub(crate) engine: RefCell<StickyHeader<DomHost>>,
    pub(crate) timer: RefCell<TimerSlot>,
    /// An event arrived while the engine was busy.
    missed: Cell<bool>,
}

pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

/// Route one event into the engine. A cycle never starts while another is
/// running: an event that finds the engine borrowed is remembered and turned
/// into a full recompute once the running cycle returns.
pub(crate) fn dispatch(shared: &Rc<Shared>, event: EngineEvent) {
    let wakeup = {
        let Ok(mut engine) = shared.engine.try_borrow_mut() else {
            warn!(target: "stickyhead", "{event:?} arrived mid-cycle, deferring");
            shared.missed.set(true);
            return;
        };
        let wakeup = engine.handle(event);
        if shared.missed.replace(false) {
            engine.update();
        }
        wakeup
    };
    if let Some(wakeup) = wakeup {
        scroll::schedule_wakeup(shared, wakeup);
    }
}

fn resolve_table(host: &DomHost, table: &JsValue) -> Result<Element, StickyError> {
    if let Some(selector) = table.as_string() {
        return host
            .query_first(None, &selector)
            .ok_or(StickyError::TableNotFound(selector));
    }
    table
        .dyn_ref::<Element>()
        .cloned()
        .ok_or_else(|| StickyError::TableNotFound("not an element or selector".into()))
}

fn parse_options(options: JsValue) -> Result<StickyOptions, StickyError> {
    if options.is_undefined() || options.is_null() {
        return Ok(StickyOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| StickyError::InvalidOptions(e.to_string()))
}

/// A sticky header attached to one table.
#[wasm_bindgen]
pub struct StickyTableHeader {
    shared: Rc<Shared>,
    bindings: Option<Bindings>,
}

#[wasm_bindgen]
impl StickyTableHeader {
    /// Attach to `table` (an element or a selector string).
    ///
    /// # Errors
    /// Throws if the table cannot be found or the options are invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(table: JsValue, options: JsValue) -> Result<StickyTableHeader, JsValue> {
        console_error_panic_hook::set_once();

        let host = DomHost::new()?;
        let table = resolve_table(&host, &table)?;
        let options = parse_options(options)?;
        let window = host.window().clone();
        let engine = StickyHeader::attach(host, &table, options)?;

        let shared = Rc::new(Shared {
            engine: RefCell::new(engine),
            timer: RefCell::new(TimerSlot::default()),
            missed: Cell::new(false),
        });
        let bindings = Bindings::bind(&shared, &window);
        Ok(Self {
            shared,
            bindings: Some(bindings),
        })
    }

    /// Recompute geometry and restyle now. Call after changing table content.
    #[wasm_bindgen]
    pub fn update(&self) {
        if let Ok(mut engine) = self.shared.engine.try_borrow_mut() {
            engine.update();
        } else {
            self.shared.missed.set(true);
        }
    }

    /// Unbind every listener, restore styles and remove the placeholder.
    /// Safe to call more than once.
    #[wasm_bindgen]
    pub fn dispose(&mut self) {
        let Some(bindings) = self.bindings.take() else {
            return;
        };
        bindings.unbind();
        scroll::cancel_wakeup(&self.shared);
        if let Ok(mut engine) = self.shared.engine.try_borrow_mut() {
            engine.dispose();
        }
        debug!(target: "stickyhead", "bindings released");
    }

    /// Current mode: `"flowing"`, `"stuck_top"` or `"stuck_bottom"`.
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        let mode = self.shared.engine.borrow().state().mode;
        serde_json::to_value(mode)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Current vertical offset within the scroll frame, in pixels.
    #[wasm_bindgen(getter)]
    pub fn offset(&self) -> f64 {
        self.shared.engine.borrow().state().y
    }
}

impl Drop for StickyTableHeader {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Attach a sticky header. Same as `new StickyTableHeader(table, options)`.
///
/// # Errors
/// Throws if the table cannot be found or the options are invalid.
#[wasm_bindgen(js_name = createStickyHeader)]
pub fn create_sticky_header(
    table: JsValue,
    options: JsValue,
) -> Result<StickyTableHeader, JsValue> {
    StickyTableHeader::new(table, options)
}
