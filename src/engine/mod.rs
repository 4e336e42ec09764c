//! The sticky positioning engine.
//!
//! One [`StickyHeader`] per table. A full recompute runs its stages in a fixed
//! order, each committing to the tree before the next reads it:
//!
//! 1. resolve the header row and its cells
//! 2. replace the flow placeholder with a fresh copy
//! 3. measure a [`GeometrySnapshot`]
//! 4. decide the [`StickyState`] against the live scroll offset
//! 5. write styles and sync horizontal scroll
//!
//! Scrolling the frame only repeats steps 4 and 5.

pub mod debounce;
pub mod measure;
pub mod placeholder;
pub mod state;
pub mod style;

use log::{debug, trace, warn};

use crate::error::{Result, StickyError};
use crate::geometry::{Frame, GeometrySnapshot};
use crate::host::Host;
use crate::options::StickyOptions;

pub use debounce::{Debounce, Ticket, Wakeup};
pub use placeholder::{CloneToken, Placeholder, CLONE_ATTRIBUTE};
pub use state::{decide, StickyMode, StickyState, Transition};
pub use style::{Placement, StyleBackup};

use style::{CELL_PROPERTIES, HEADER_PROPERTIES};

/// Something the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// The scroll container (or window) scrolled.
    FrameScrolled,
    /// The table scrolled horizontally.
    TableScrolled,
    /// The window was resized. Debounced.
    WindowResized { now_ms: f64 },
    /// The table's content box changed size.
    TableResized,
    /// A wakeup previously returned by [`StickyHeader::handle`] arrived.
    DebounceElapsed(Ticket),
}

/// Sticky header engine for one table.
#[derive(Debug)]
pub struct StickyHeader<H: Host> {
    host: H,
    table: H::Node,
    scroll_container: Option<H::Node>,
    options: StickyOptions,
    header: Option<H::Node>,
    cells: Vec<H::Node>,
    placeholder: Placeholder<H::Node>,
    backup: StyleBackup<H::Node>,
    snapshot: Option<GeometrySnapshot>,
    state: StickyState,
    translate: Option<(f64, f64)>,
    resize: Debounce,
    disposed: bool,
}

impl<H: Host> StickyHeader<H> {
    /// Attach to the first element matching `selector`.
    ///
    /// # Errors
    /// [`StickyError::TableNotFound`] if nothing matches, or any error from
    /// [`StickyHeader::attach`].
    pub fn attach_selector(host: H, selector: &str, options: StickyOptions) -> Result<Self> {
        let table = host
            .query_first(None, selector)
            .ok_or_else(|| StickyError::TableNotFound(selector.to_string()))?;
        Self::attach(host, &table, options)
    }

    /// Attach to `table` and run the first full recompute.
    ///
    /// # Errors
    /// [`StickyError::TableNotFound`] if the table is not in the tree,
    /// [`StickyError::InvalidOptions`] if the options fail validation, and
    /// [`StickyError::Entropy`] if no clone token can be drawn.
    pub fn attach(host: H, table: &H::Node, options: StickyOptions) -> Result<Self> {
        Self::attach_with_token(host, table, options, CloneToken::generate()?)
    }

    /// [`StickyHeader::attach`] with a caller-chosen clone token.
    ///
    /// # Errors
    /// Same as [`StickyHeader::attach`], minus the entropy failure.
    pub fn attach_with_token(
        host: H,
        table: &H::Node,
        options: StickyOptions,
        token: CloneToken,
    ) -> Result<Self> {
        options.validate()?;
        if !host.is_connected(table) {
            return Err(StickyError::TableNotFound(format!("{table:?}")));
        }
        let table = options
            .container_selector
            .as_deref()
            .and_then(|selector| host.closest(table, selector))
            .unwrap_or_else(|| table.clone());

        let scroll_container = match options.scroll_container_selector.as_deref() {
            Some(selector) => {
                let found = host.query_first(None, selector);
                if found.is_none() {
                    warn!(target: "stickyhead", "scroll container {selector:?} not found, using the window");
                }
                found
            }
            None => None,
        };

        let mut engine = Self {
            host,
            table,
            scroll_container,
            resize: Debounce::new(options.resize_debounce_ms),
            options,
            header: None,
            cells: Vec::new(),
            placeholder: Placeholder::new(token),
            backup: StyleBackup::default(),
            snapshot: None,
            state: StickyState::default(),
            translate: None,
            disposed: false,
        };
        engine.refresh();
        debug!(target: "stickyhead", "attached to {:?}, state {:?}", engine.table, engine.state);
        Ok(engine)
    }

    /// Force a full recompute now.
    pub fn update(&mut self) {
        if !self.disposed {
            self.refresh();
        }
    }

    /// Dispatch one event. A returned [`Wakeup`] must be scheduled by the
    /// caller, replacing any wakeup it scheduled before.
    pub fn handle(&mut self, event: EngineEvent) -> Option<Wakeup> {
        if self.disposed {
            return None;
        }
        match event {
            EngineEvent::FrameScrolled => self.evaluate(),
            EngineEvent::TableScrolled => self.scroll_header(),
            EngineEvent::WindowResized { now_ms } => return Some(self.resize.trigger(now_ms)),
            EngineEvent::TableResized => self.refresh(),
            EngineEvent::DebounceElapsed(ticket) => {
                if self.resize.fire(ticket) {
                    self.refresh();
                }
            }
        }
        None
    }

    /// Run a debounced recompute whose quiet period has elapsed by `now_ms`.
    /// For hosts that drive time themselves instead of scheduling wakeups.
    pub fn poll_timers(&mut self, now_ms: f64) -> bool {
        if self.disposed || !self.resize.poll(now_ms) {
            return false;
        }
        self.refresh();
        true
    }

    /// Restore every style the engine touched and remove the placeholder.
    /// Later calls, and every other method afterwards, do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.resize.cancel();
        self.unstyle();
        if let Some(header) = &self.header {
            self.host.scroll_to(header, 0.0, 0.0);
        }
        self.placeholder.remove(&self.host);
        self.snapshot = None;
        self.state = StickyState::default();
        debug!(target: "stickyhead", "disposed from {:?}", self.table);
    }

    pub fn state(&self) -> StickyState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&GeometrySnapshot> {
        self.snapshot.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// The effective table (after the container lookup).
    pub fn table(&self) -> &H::Node {
        &self.table
    }

    pub fn header(&self) -> Option<&H::Node> {
        self.header.as_ref()
    }

    pub fn placeholder(&self) -> Option<&H::Node> {
        self.placeholder.node()
    }

    /// The scroll container, `None` for the window.
    pub fn scroll_container(&self) -> Option<&H::Node> {
        self.scroll_container.as_ref()
    }

    /// The element whose size changes trigger a full recompute.
    pub fn observed_node(&self) -> Option<H::Node> {
        self.host.first_element_child(&self.table)
    }

    pub fn options(&self) -> &StickyOptions {
        &self.options
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn frame(&self) -> Frame {
        self.host.frame(self.scroll_container.as_ref())
    }

    /// Steps 1-5.
    fn refresh(&mut self) {
        if !self.host.is_connected(&self.table) {
            return;
        }
        self.resolve_header();
        let Some(header) = self.header.clone() else {
            self.placeholder.remove(&self.host);
            self.snapshot = None;
            self.state = StickyState::default();
            self.translate = None;
            return;
        };

        self.placeholder.refresh(
            &self.host,
            Some(&header),
            &self.cells,
            &self.options.header_cell_selector,
            &self.backup,
            self.state.mode.is_stuck(),
        );

        let frame = self.frame();
        let snapshot = self.measure(&frame);
        let next = decide(frame.scroll_y, &snapshot);
        self.snapshot = Some(snapshot);

        match Transition::between(self.state.mode, next.mode) {
            Transition::Entered => self.enter(next, &frame),
            Transition::Released => {
                self.state = next;
                self.release();
                self.scroll_header();
            }
            _ if next.mode.is_stuck() => {
                self.state = next;
                self.restyle(&frame);
                self.scroll_header();
            }
            _ => {
                self.state = next;
                self.release();
            }
        }
    }

    /// Steps 4 and 5 against the cached snapshot.
    fn evaluate(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let frame = self.frame();
        let next = decide(frame.scroll_y, snapshot);
        let transition = Transition::between(self.state.mode, next.mode);
        match transition {
            Transition::Entered => self.enter(next, &frame),
            Transition::Released => {
                self.state = next;
                self.release();
                self.scroll_header();
            }
            Transition::Switched => {
                self.state = next;
                self.place(&frame);
                self.scroll_header();
            }
            Transition::Unchanged => {
                self.state = next;
                if next.mode.is_stuck() {
                    self.place(&frame);
                }
            }
        }
    }

    /// Flowing to stuck. Taking the header out of flow can change what the
    /// placeholder measures, so geometry is re-read once here.
    fn enter(&mut self, next: StickyState, frame: &Frame) {
        debug!(target: "stickyhead", "header stuck: {:?} at y={}", next.mode, next.y);
        self.state = next;
        self.placeholder.show(&self.host, true);
        self.restyle(frame);

        let snapshot = self.measure(frame);
        let settled = decide(frame.scroll_y, &snapshot);
        self.snapshot = Some(snapshot);
        self.state = settled;
        if settled.mode.is_stuck() {
            self.restyle(frame);
            self.scroll_header();
        } else {
            self.release();
        }
    }

    /// Write every stuck-mode style from the current snapshot and state.
    /// Inline values are recorded before the first write to each node.
    fn restyle(&mut self, frame: &Frame) {
        let (Some(header), Some(snapshot)) = (&self.header, &self.snapshot) else {
            return;
        };
        self.backup.capture(&self.host, header, &HEADER_PROPERTIES);
        for cell in &self.cells {
            self.backup.capture(&self.host, cell, &CELL_PROPERTIES);
        }
        let placement = Placement {
            translate: self.translation(frame, snapshot),
            width: snapshot.table.width,
            height: snapshot.header.height,
            z_index: self.options.z_index,
        };
        style::apply(&self.host, header, &self.cells, &snapshot.cells, &placement);
        self.translate = Some(placement.translate);
    }

    /// Move a stuck header if its translation changed.
    fn place(&mut self, frame: &Frame) {
        let (Some(header), Some(snapshot)) = (&self.header, &self.snapshot) else {
            return;
        };
        let next = self.translation(frame, snapshot);
        let moved = match self.translate {
            Some((x, y)) => {
                (x - next.0).abs() > state::POSITION_EPSILON
                    || (y - next.1).abs() > state::POSITION_EPSILON
            }
            None => true,
        };
        if moved {
            style::position(&self.host, header, next);
            self.translate = Some(next);
        }
    }

    fn translation(&self, frame: &Frame, snapshot: &GeometrySnapshot) -> (f64, f64) {
        frame.to_viewport(snapshot.table.x - frame.scroll_x, self.state.y)
    }

    /// Back to normal flow.
    fn release(&mut self) {
        if self.unstyle() {
            debug!(target: "stickyhead", "header released at y={}", self.state.y);
        }
        self.placeholder.show(&self.host, false);
    }

    /// Undo what `restyle` wrote, if anything. A header that was never
    /// styled keeps whatever the page has put on it since. The backup is
    /// emptied so the next stick records fresh values.
    fn unstyle(&mut self) -> bool {
        if self.translate.take().is_none() {
            return false;
        }
        if let Some(header) = &self.header {
            style::clear(&self.host, &self.backup, header, &self.cells);
        }
        self.backup = StyleBackup::default();
        true
    }

    /// Mirror the table's horizontal scroll onto the header.
    fn scroll_header(&mut self) {
        if let Some(header) = &self.header {
            let left = self.host.scroll_left(&self.table);
            self.host.scroll_to(header, left, 0.0);
        }
    }

    fn resolve_header(&mut self) {
        let stale = !self
            .header
            .as_ref()
            .is_some_and(|h| self.host.is_connected(h));
        if stale {
            if let Some(old) = self.header.take() {
                debug!(target: "stickyhead", "header {old:?} left the tree");
                self.translate = None;
                self.state = StickyState::default();
            }
            let placeholder = self.placeholder.node();
            self.header = self
                .host
                .query_all(Some(&self.table), &self.options.header_selector)
                .into_iter()
                .find(|candidate| Some(candidate) != placeholder);
        }
        self.cells = match &self.header {
            Some(header) => self
                .host
                .query_all(Some(header), &self.options.header_cell_selector),
            None => Vec::new(),
        };
        let mut tracked = self.cells.clone();
        tracked.extend(self.header.iter().cloned());
        self.backup.retain(&tracked);
    }

    /// Step 3. The placeholder carries the flow box while the header is stuck.
    fn measure(&self, frame: &Frame) -> GeometrySnapshot {
        let stuck = self.state.mode.is_stuck() && self.placeholder.node().is_some();
        let (header, cells) = if stuck {
            (self.placeholder.node(), self.placeholder.cells())
        } else {
            (self.header.as_ref(), self.cells.as_slice())
        };
        let snapshot = GeometrySnapshot {
            table: measure::measure(&self.host, frame, Some(&self.table)),
            header: measure::measure(&self.host, frame, header),
            cells: cells
                .iter()
                .map(|c| measure::measure(&self.host, frame, Some(c)))
                .collect(),
            fixed_offset: measure::fixed_offset(
                &self.host,
                &self.options.fixed_offset_selectors,
            ),
            bottom_offset: self.options.bottom_offset,
        };
        trace!(target: "stickyhead", "measured {snapshot:?}");
        snapshot
    }
}

impl<H: Host> Drop for StickyHeader<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}
