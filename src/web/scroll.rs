//! Debounce wakeups on `setTimeout`.
//!
//! One timer per engine. Arming a new wakeup clears the old timeout first, so
//! at most one is ever outstanding.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::{dispatch, Shared};
use crate::engine::{EngineEvent, Ticket, Wakeup};

#[derive(Default)]
pub(crate) struct TimerSlot {
    handle: Option<i32>,
    ticket: Option<Ticket>,
    callback: Option<Closure<dyn FnMut()>>,
}

pub(crate) fn schedule_wakeup(shared: &Rc<Shared>, wakeup: Wakeup) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut guard = shared.timer.borrow_mut();
    let slot = &mut *guard;
    // Cancel any existing timer
    if let Some(handle) = slot.handle.take() {
        window.clear_timeout_with_handle(handle);
    }
    slot.ticket = Some(wakeup.ticket);
    if slot.callback.is_none() {
        let weak = Rc::downgrade(shared);
        slot.callback = Some(Closure::wrap(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                handle_timeout(&shared);
            }
        }) as Box<dyn FnMut()>));
    }
    let Some(callback) = slot.callback.as_ref() else {
        return;
    };
    let delay = i32::try_from(wakeup.delay_ms).unwrap_or(i32::MAX);
    slot.handle = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay,
        )
        .ok();
}

pub(crate) fn cancel_wakeup(shared: &Shared) {
    let mut slot = shared.timer.borrow_mut();
    if let (Some(handle), Some(window)) = (slot.handle.take(), web_sys::window()) {
        window.clear_timeout_with_handle(handle);
    }
    slot.ticket = None;
}

fn handle_timeout(shared: &Rc<Shared>) {
    let ticket = {
        let mut slot = shared.timer.borrow_mut();
        slot.handle = None;
        slot.ticket.take()
    };
    if let Some(ticket) = ticket {
        dispatch(shared, EngineEvent::DebounceElapsed(ticket));
    }
}
