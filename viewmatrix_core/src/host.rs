// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capabilities consumed by plugins.
//!
//! Plugins need two things the matrix itself never touches:
//!
//! - **Interval timer**: [`IntervalTimer`] schedules a repeating callback,
//!   like `window.setInterval`.
//! - **Pointer input**: [`PointerSource`] delivers pointer-down, move and up
//!   events (touch or mouse) from some event target, like a set of document
//!   listeners.
//!
//! Backends implement these for their platform; the
//! [`headless`](crate::headless) host implements them with manual clocks and
//! manual dispatch for tests.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;

use crate::point::Point;

/// Identifies a running interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// A repeating-timer primitive.
pub trait IntervalTimer {
    /// Invokes `callback` every `period_ms` milliseconds until cleared.
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerId;

    /// Stops the interval `id`. Unknown ids are ignored.
    fn clear_interval(&self, id: TimerId);
}

/// Identifies a pointer subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u32);

/// Which part of a press-drag-release sequence an input belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// `touchstart` / `mousedown`.
    Start,
    /// `touchmove` / `mousemove`.
    Move,
    /// `touchend` / `mouseup`.
    End,
}

/// One pointer event in page coordinates.
#[derive(Debug)]
pub struct PointerInput {
    /// Phase of the event.
    pub phase: PointerPhase,
    /// Position of the (first) pointer in page coordinates.
    pub position: Point,
    default_prevented: Cell<bool>,
}

impl PointerInput {
    /// Creates an input with default handling allowed.
    #[must_use]
    pub fn new(phase: PointerPhase, position: Point) -> Self {
        Self {
            phase,
            position,
            default_prevented: Cell::new(false),
        }
    }

    /// Asks the source to suppress the platform's default handling.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Returns `true` if a handler called
    /// [`prevent_default`](Self::prevent_default).
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Callback registered with a [`PointerSource`].
pub type PointerHandler = Rc<dyn Fn(&PointerInput)>;

/// A subscribable stream of pointer input.
pub trait PointerSource {
    /// Starts delivering pointer input to `handler`.
    fn subscribe(&self, handler: PointerHandler) -> SubscriptionId;

    /// Stops delivering to subscription `id`. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}
