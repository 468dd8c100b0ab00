// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `setInterval` interval timer.
//!
//! [`WindowTimer`] keeps each registered JS closure alive in a table keyed by
//! the interval handle, and drops it when the interval is cleared or the
//! timer is dropped.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::cell::RefCell;

use viewmatrix_core::host::{IntervalTimer, TimerId};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Direct global bindings, so the timer works in windows and workers alike.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "setInterval")]
    fn set_interval(handler: &JsValue, timeout: i32) -> i32;

    #[wasm_bindgen(js_name = "clearInterval")]
    fn clear_interval(id: i32);
}

type IntervalClosure = Closure<dyn FnMut()>;

/// An [`IntervalTimer`] backed by the global `setInterval`.
#[derive(Default)]
pub struct WindowTimer {
    closures: RefCell<BTreeMap<i32, IntervalClosure>>,
}

impl core::fmt::Debug for WindowTimer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowTimer")
            .field("active", &self.closures.borrow().len())
            .finish()
    }
}

impl WindowTimer {
    /// Creates a timer with no running intervals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IntervalTimer for WindowTimer {
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerId {
        let closure: IntervalClosure = Closure::wrap(callback);
        let id = set_interval(closure.as_ref().unchecked_ref(), clamp_period(period_ms));
        self.closures.borrow_mut().insert(id, closure);
        TimerId(id.cast_unsigned())
    }

    fn clear_interval(&self, id: TimerId) {
        let handle = id.0.cast_signed();
        clear_interval(handle);
        // Bind first so the table borrow ends before the closure is dropped.
        let closure = self.closures.borrow_mut().remove(&handle);
        drop(closure);
    }
}

impl Drop for WindowTimer {
    fn drop(&mut self) {
        for (id, _closure) in core::mem::take(self.closures.get_mut()) {
            clear_interval(id);
        }
    }
}

/// `setInterval` takes a signed 32-bit delay.
fn clamp_period(period_ms: u32) -> i32 {
    i32::try_from(period_ms).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_saturates_at_i32_max() {
        assert_eq!(clamp_period(3000), 3000);
        assert_eq!(clamp_period(u32::MAX), i32::MAX);
    }
}
