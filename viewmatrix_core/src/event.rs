// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event names and payloads carried by a matrix's emitter.
//!
//! Core events are emitted by [`Matrix`](crate::Matrix) itself. Plugin events
//! are emitted by plugins through the matrix, so any listener on the matrix
//! sees them regardless of which plugin produced them.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::point::{Point, Vec2};

/// `init(root, children)`: after a successful initialize.
pub const INIT: &str = "init";
/// `destroy(root, children)`: during destroy, before root and children are
/// released.
pub const DESTROY: &str = "destroy";
/// `slide:before(from, to, count)`: before any child is reclassified.
pub const SLIDE_BEFORE: &str = "slide:before";
/// `slide:after(from, to, count)`: after every child is reclassified and the
/// new index is committed.
pub const SLIDE_AFTER: &str = "slide:after";

/// Autoplay began ticking.
pub const AUTOPLAY_START: &str = "autoplay:start";
/// Autoplay stopped ticking.
pub const AUTOPLAY_PAUSE: &str = "autoplay:pause";

/// A gesture was armed inside the root's bounds.
pub const TOUCH_START: &str = "touch:start";
/// An armed gesture moved; carries a [`GestureCancel`].
pub const TOUCH_MOVE: &str = "touch:move";
/// An armed gesture was released.
pub const TOUCH_END: &str = "touch:end";
/// An armed gesture was cancelled by a listener.
pub const TOUCH_CANCEL: &str = "touch:cancel";
/// A swipe towards the next slide was recognized.
pub const SWIPE_NEXT: &str = "swipe:next";
/// A swipe towards the previous slide was recognized.
pub const SWIPE_PREV: &str = "swipe:prev";

/// Payload delivered to matrix listeners.
#[derive(Clone, Debug)]
pub enum MatrixEvent<E> {
    /// [`INIT`] and [`DESTROY`].
    Lifecycle {
        /// The root element, if one was bound.
        root: Option<E>,
        /// The tracked children at the time of the event.
        children: Vec<E>,
    },
    /// [`SLIDE_BEFORE`] and [`SLIDE_AFTER`].
    Slide {
        /// Index before the transition.
        from: usize,
        /// Normalized target index.
        to: usize,
        /// Number of tracked children.
        count: usize,
    },
    /// [`AUTOPLAY_START`] and [`AUTOPLAY_PAUSE`].
    Autoplay {
        /// Whether autoplay is running after this event.
        playing: bool,
    },
    /// [`TOUCH_START`], [`TOUCH_END`] and [`TOUCH_CANCEL`].
    Touch {
        /// Element the gesture is bound to.
        target: Option<E>,
        /// Pointer position in page coordinates.
        position: Option<Point>,
    },
    /// [`TOUCH_MOVE`].
    TouchMove {
        /// Element the gesture is bound to.
        target: Option<E>,
        /// Drag vector, `start - last`.
        delta: Vec2,
        /// Lets a listener end the gesture.
        cancel: GestureCancel,
    },
    /// [`SWIPE_NEXT`] and [`SWIPE_PREV`].
    Swipe {
        /// Element the gesture is bound to.
        target: Option<E>,
        /// Drag vector that crossed the tolerance.
        delta: Vec2,
    },
}

/// A flag shared between a `touch:move` emission and the gesture that
/// produced it.
///
/// Listeners call [`cancel`](Self::cancel); once the emission returns the
/// gesture is ended and `touch:cancel` is emitted.
#[derive(Clone, Debug, Default)]
pub struct GestureCancel(Rc<Cell<bool>>);

impl GestureCancel {
    /// Creates an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the gesture be cancelled.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}
