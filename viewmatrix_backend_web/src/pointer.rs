// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch and mouse input as a [`PointerSource`].
//!
//! Every subscription registers six non-passive listeners on the source's
//! event target (`touchstart`, `touchmove`, `touchend`, `mousedown`,
//! `mousemove`, `mouseup`) and translates each event into a
//! [`PointerInput`] in page coordinates. A handler calling
//! [`PointerInput::prevent_default`] prevents the DOM event's default.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Point;
use viewmatrix_core::host::{
    PointerHandler, PointerInput, PointerPhase, PointerSource, SubscriptionId,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget, MouseEvent, TouchEvent};

const EVENTS: [&str; 6] = [
    "touchstart",
    "touchmove",
    "touchend",
    "mousedown",
    "mousemove",
    "mouseup",
];

type ListenerClosure = Closure<dyn FnMut(Event)>;

/// A [`PointerSource`] listening on a DOM [`EventTarget`].
pub struct DomPointerSource {
    target: EventTarget,
    subscriptions: RefCell<BTreeMap<u32, Vec<(&'static str, ListenerClosure)>>>,
    next_id: Cell<u32>,
}

impl core::fmt::Debug for DomPointerSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPointerSource")
            .field("target", &self.target)
            .field("subscriptions", &self.subscriptions.borrow().len())
            .finish_non_exhaustive()
    }
}

impl DomPointerSource {
    /// Creates a source listening on `target`.
    #[must_use]
    pub fn new(target: EventTarget) -> Self {
        Self {
            target,
            subscriptions: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Creates a source listening on the global document, if any.
    #[must_use]
    pub fn document() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::new(document.into()))
    }

    fn remove(&self, listeners: Vec<(&'static str, ListenerClosure)>) {
        for (name, closure) in listeners {
            let _ = self
                .target
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
}

impl PointerSource for DomPointerSource {
    fn subscribe(&self, handler: PointerHandler) -> SubscriptionId {
        let options = AddEventListenerOptions::new();
        options.set_passive(false);

        let mut listeners = Vec::with_capacity(EVENTS.len());
        for name in EVENTS {
            let Some(phase) = phase_for(name) else {
                continue;
            };
            let handler = PointerHandler::clone(&handler);
            let closure: ListenerClosure = Closure::wrap(Box::new(move |event: Event| {
                let input = PointerInput::new(phase, event_position(&event));
                handler(&input);
                if input.default_prevented() {
                    event.prevent_default();
                }
            }) as Box<dyn FnMut(Event)>);
            let _ = self
                .target
                .add_event_listener_with_callback_and_add_event_listener_options(
                    name,
                    closure.as_ref().unchecked_ref(),
                    &options,
                );
            listeners.push((name, closure));
        }

        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.subscriptions.borrow_mut().insert(id, listeners);
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let listeners = self.subscriptions.borrow_mut().remove(&id.0);
        if let Some(listeners) = listeners {
            self.remove(listeners);
        }
    }
}

impl Drop for DomPointerSource {
    fn drop(&mut self) {
        let all = core::mem::take(self.subscriptions.get_mut());
        for listeners in all.into_values() {
            self.remove(listeners);
        }
    }
}

/// Maps a DOM event type to its pointer phase.
fn phase_for(event_type: &str) -> Option<PointerPhase> {
    match event_type {
        "touchstart" | "mousedown" => Some(PointerPhase::Start),
        "touchmove" | "mousemove" => Some(PointerPhase::Move),
        "touchend" | "mouseup" => Some(PointerPhase::End),
        _ => None,
    }
}

/// Page position of the first touch, or of the mouse.
///
/// `touchend` has no active touches, so it falls back to the first changed
/// touch. The event type picks the cast, which avoids `instanceof
/// TouchEvent` on browsers that do not define it.
fn event_position(event: &Event) -> Point {
    if event.type_().starts_with("touch") {
        let touch_event = event.unchecked_ref::<TouchEvent>();
        touch_event
            .touches()
            .item(0)
            .or_else(|| touch_event.changed_touches().item(0))
            .map(|t| Point::new(f64::from(t.page_x()), f64::from(t.page_y())))
            .unwrap_or(Point::ZERO)
    } else {
        let mouse_event = event.unchecked_ref::<MouseEvent>();
        Point::new(
            f64::from(mouse_event.page_x()),
            f64::from(mouse_event.page_y()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listened_event_has_a_phase() {
        assert!(EVENTS.iter().all(|e| phase_for(e).is_some()), "unmapped event");
        assert_eq!(phase_for("mousedown"), Some(PointerPhase::Start));
        assert_eq!(phase_for("touchmove"), Some(PointerPhase::Move));
        assert_eq!(phase_for("mouseup"), Some(PointerPhase::End));
        assert_eq!(phase_for("click"), None);
    }
}
