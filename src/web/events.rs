//! Listener and observer wiring.
//!
//! `bind` and `unbind` touch exactly the same targets: scroll on the frame
//! (window or container), scroll on the window as well when the frame is a
//! container, scroll on the table, resize on the window, and a
//! `ResizeObserver` on the table's first child.

use std::rc::Rc;

use js_sys::Array;
use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Element, Event, EventTarget, ResizeObserver, Window};

use super::{dispatch, Shared};
use crate::engine::EngineEvent;

pub(crate) struct Bindings {
    window: Window,
    frame_target: EventTarget,
    table: Element,
    frame_scroll: Closure<dyn FnMut(Event)>,
    /// Page scroll moves a container frame on screen.
    page_scroll: Option<Closure<dyn FnMut(Event)>>,
    table_scroll: Closure<dyn FnMut(Event)>,
    resize: Closure<dyn FnMut(Event)>,
    observer: Option<ResizeObserver>,
    // Kept alive for the observer.
    #[allow(dead_code)]
    observer_callback: Closure<dyn FnMut(Array)>,
}

fn listener(
    shared: &Rc<Shared>,
    event: impl Fn() -> EngineEvent + 'static,
) -> Closure<dyn FnMut(Event)> {
    let weak = Rc::downgrade(shared);
    Closure::wrap(Box::new(move |_event: Event| {
        if let Some(shared) = weak.upgrade() {
            dispatch(&shared, event());
        }
    }) as Box<dyn FnMut(Event)>)
}

impl Bindings {
    pub(crate) fn bind(shared: &Rc<Shared>, window: &Window) -> Self {
        let (table, frame, observed) = {
            let engine = shared.engine.borrow();
            (
                engine.table().clone(),
                engine.scroll_container().cloned(),
                engine.observed_node(),
            )
        };
        let in_container = frame.is_some();
        let frame_target: EventTarget = match frame {
            Some(el) => el.into(),
            None => window.clone().into(),
        };

        let frame_scroll = listener(shared, || EngineEvent::FrameScrolled);
        let table_scroll = listener(shared, || EngineEvent::TableScrolled);
        let resize = listener(shared, || EngineEvent::WindowResized {
            now_ms: super::now_ms(),
        });

        let passive = AddEventListenerOptions::new();
        passive.set_passive(true);
        let _ = frame_target.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            frame_scroll.as_ref().unchecked_ref(),
            &passive,
        );
        let page_scroll = in_container.then(|| {
            let closure = listener(shared, || EngineEvent::FrameScrolled);
            let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                "scroll",
                closure.as_ref().unchecked_ref(),
                &passive,
            );
            closure
        });
        let _ = table.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            table_scroll.as_ref().unchecked_ref(),
            &passive,
        );
        let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());

        let weak = Rc::downgrade(shared);
        let observer_callback = Closure::wrap(Box::new(move |_entries: Array| {
            if let Some(shared) = weak.upgrade() {
                dispatch(&shared, EngineEvent::TableResized);
            }
        }) as Box<dyn FnMut(Array)>);
        let observer = observed.and_then(|target| {
            let observer = ResizeObserver::new(observer_callback.as_ref().unchecked_ref())
                .map_err(|e| warn!(target: "stickyhead", "ResizeObserver unavailable: {e:?}"))
                .ok()?;
            observer.observe(&target);
            Some(observer)
        });

        Self {
            window: window.clone(),
            frame_target,
            table,
            frame_scroll,
            page_scroll,
            table_scroll,
            resize,
            observer,
            observer_callback,
        }
    }

    pub(crate) fn unbind(&self) {
        let _ = self.frame_target.remove_event_listener_with_callback(
            "scroll",
            self.frame_scroll.as_ref().unchecked_ref(),
        );
        if let Some(page_scroll) = &self.page_scroll {
            let _ = self.window.remove_event_listener_with_callback(
                "scroll",
                page_scroll.as_ref().unchecked_ref(),
            );
        }
        let _ = self.table.remove_event_listener_with_callback(
            "scroll",
            self.table_scroll.as_ref().unchecked_ref(),
        );
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.resize.as_ref().unchecked_ref());
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }
}
