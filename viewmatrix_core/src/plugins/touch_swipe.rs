// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe-gesture navigation.
//!
//! [`TouchSwipe`] listens to a [`PointerSource`] and tracks one gesture at a
//! time. A gesture arms on a pointer-down inside the matrix root's bounds,
//! reports every move as `touch:move`, and ends on release, on cancellation,
//! or as soon as the drag along the configured axis exceeds
//! [`TouchSwipeOptions::tolerance`], in which case the matrix moves one slide.
//!
//! The drag vector is `start - last`, so dragging left (or up, in vertical
//! mode) yields a positive delta and goes to the next slide.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::{Cell, RefCell};
use core::fmt;

use serde_json::Value;

use crate::element::Element;
use crate::error::Result;
use crate::event::{self, GestureCancel, MatrixEvent};
use crate::host::{PointerInput, PointerPhase, PointerSource, SubscriptionId};
use crate::html;
use crate::matrix::Matrix;
use crate::options::{json_bool, json_f64, json_string};
use crate::plugin::{Plugin, PluginBinding};
use crate::point::{Point, Vec2, drag_delta};

/// Touch-swipe configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchSwipeOptions {
    /// Root class suffix toggled while a gesture is armed. Empty disables the
    /// class.
    ///
    /// Default: `"touching"`.
    pub class_alias: String,
    /// Suppress the platform's default handling of the arming pointer-down.
    ///
    /// Default: `false`.
    pub prevent_default: bool,
    /// Drag distance, in pixels, a swipe must exceed.
    ///
    /// Default: `30.0`.
    pub tolerance: f64,
    /// Recognize vertical swipes instead of horizontal ones.
    ///
    /// Default: `false`.
    pub vertical: bool,
}

impl Default for TouchSwipeOptions {
    fn default() -> Self {
        Self {
            class_alias: "touching".into(),
            prevent_default: false,
            tolerance: 30.0,
            vertical: false,
        }
    }
}

impl TouchSwipeOptions {
    /// Reads options from a JSON object with camel-case keys
    /// (`classAlias`, `preventDefault`, `tolerance`, `vertical`).
    ///
    /// Missing or mistyped keys keep their defaults.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let mut options = Self::default();
        let Some(obj) = value.as_object() else {
            return options;
        };
        if let Some(v) = json_string(obj, "classAlias") {
            options.class_alias = v;
        }
        if let Some(v) = json_bool(obj, "preventDefault") {
            options.prevent_default = v;
        }
        if let Some(v) = json_f64(obj, "tolerance") {
            options.tolerance = v;
        }
        if let Some(v) = json_bool(obj, "vertical") {
            options.vertical = v;
        }
        options
    }
}

/// Plugin that turns drag gestures over the root into navigation.
pub struct TouchSwipe<E: Element> {
    binding: PluginBinding<E>,
    state: Rc<TouchState<E>>,
}

struct TouchState<E: Element> {
    options: TouchSwipeOptions,
    source: Rc<dyn PointerSource>,
    subscription: Cell<Option<SubscriptionId>>,
    gesture: RefCell<Option<Gesture<E>>>,
}

#[derive(Clone, Debug)]
struct Gesture<E> {
    start: Point,
    last: Point,
    target: E,
}

impl<E: Element> fmt::Debug for TouchSwipe<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TouchSwipe")
            .field("binding", &self.binding)
            .field("options", &self.state.options)
            .field("gesture", &self.state.gesture.borrow())
            .finish_non_exhaustive()
    }
}

impl<E: Element> TouchSwipe<E> {
    /// Creates an unattached plugin reading input from `source`.
    pub fn new(source: Rc<dyn PointerSource>, options: TouchSwipeOptions) -> Self {
        Self {
            binding: PluginBinding::new("TouchSwipe"),
            state: Rc::new(TouchState {
                options,
                source,
                subscription: Cell::new(None),
                gesture: RefCell::new(None),
            }),
        }
    }

    /// Returns the options this plugin runs with.
    #[must_use]
    pub fn options(&self) -> &TouchSwipeOptions {
        &self.state.options
    }

    /// Returns `true` while a gesture is armed.
    #[must_use]
    pub fn is_touching(&self) -> bool {
        self.state.gesture.borrow().is_some()
    }

    /// Ends the armed gesture, if any, and emits `touch:cancel`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PluginNotAttached`](crate::Error::PluginNotAttached)
    /// if the plugin has no live matrix.
    pub fn cancel(&self) -> Result<()> {
        let matrix = self.binding.matrix()?;
        self.state.end_gesture(&matrix, true);
        Ok(())
    }
}

impl<E: Element> Plugin<E> for TouchSwipe<E> {
    fn binding(&self) -> &PluginBinding<E> {
        &self.binding
    }

    fn on_init(&self, matrix: &Matrix<E>) {
        self.state.end_gesture(matrix, false);

        let state: Weak<TouchState<E>> = Rc::downgrade(&self.state);
        let owner = matrix.downgrade();
        let id = self.state.source.subscribe(Rc::new(move |input: &PointerInput| {
            let (Some(state), Some(matrix)) = (state.upgrade(), owner.upgrade()) else {
                return;
            };
            match input.phase {
                PointerPhase::Start => state.on_start(&matrix, input),
                PointerPhase::Move => state.on_move(&matrix, input.position),
                PointerPhase::End => state.on_end(&matrix),
            }
        }));
        self.state.subscription.set(Some(id));
    }

    fn on_destroy(&self, matrix: &Matrix<E>) {
        self.state.end_gesture(matrix, false);
        if let Some(id) = self.state.subscription.take() {
            self.state.source.unsubscribe(id);
        }
    }

    fn on_release(&self, root: Option<&E>, class_prefix: &str) {
        self.state.gesture.borrow_mut().take();
        if let Some(id) = self.state.subscription.take() {
            self.state.source.unsubscribe(id);
        }
        let Some(root) = root else {
            return;
        };
        if !self.state.options.class_alias.is_empty() {
            let mut class = String::from(class_prefix);
            class.push_str(&self.state.options.class_alias);
            html::remove_class(root, &class);
        }
    }
}

impl<E: Element> TouchState<E> {
    fn on_start(&self, matrix: &Matrix<E>, input: &PointerInput) {
        if self.gesture.borrow().is_some() {
            return;
        }
        let Some(root) = matrix.element() else {
            return;
        };
        if !html::in_element_bounds(&root, input.position) {
            return;
        }

        *self.gesture.borrow_mut() = Some(Gesture {
            start: input.position,
            last: input.position,
            target: root.clone(),
        });
        if self.options.prevent_default {
            input.prevent_default();
        }
        if !self.options.class_alias.is_empty() {
            matrix.toggle_class(&self.options.class_alias, true);
        }
        matrix.emit(
            event::TOUCH_START,
            &MatrixEvent::Touch {
                target: Some(root),
                position: Some(input.position),
            },
        );
    }

    fn on_move(&self, matrix: &Matrix<E>, position: Point) {
        let (target, delta) = {
            let mut gesture = self.gesture.borrow_mut();
            let Some(gesture) = gesture.as_mut() else {
                return;
            };
            gesture.last = position;
            (gesture.target.clone(), drag_delta(gesture.start, gesture.last))
        };

        let cancel = GestureCancel::new();
        matrix.emit(
            event::TOUCH_MOVE,
            &MatrixEvent::TouchMove {
                target: Some(target.clone()),
                delta,
                cancel: cancel.clone(),
            },
        );
        if cancel.is_cancelled() {
            self.end_gesture(matrix, true);
            return;
        }
        // A listener may have ended the gesture through `TouchSwipe::cancel`.
        if self.gesture.borrow().is_none() {
            return;
        }

        let step = self.swipe_step(delta);
        if step == 0 {
            return;
        }
        let name = if step > 0 {
            event::SWIPE_NEXT
        } else {
            event::SWIPE_PREV
        };
        tracing::debug!(dx = delta.x, dy = delta.y, step, "swipe recognized");
        matrix.emit(
            name,
            &MatrixEvent::Swipe {
                target: Some(target),
                delta,
            },
        );
        matrix.inc(step);
        self.end_gesture(matrix, false);
    }

    fn on_end(&self, matrix: &Matrix<E>) {
        let Some(gesture) = self.gesture.borrow().clone() else {
            return;
        };
        matrix.emit(
            event::TOUCH_END,
            &MatrixEvent::Touch {
                target: Some(gesture.target),
                position: Some(gesture.last),
            },
        );
        self.end_gesture(matrix, false);
    }

    /// Returns `+1`, `-1` or `0` for a drag of `delta`.
    ///
    /// Only the dominant axis counts, and only if it is the configured one.
    fn swipe_step(&self, delta: Vec2) -> isize {
        let (x, y) = (delta.x.abs(), delta.y.abs());
        let along = if x > y && !self.options.vertical {
            delta.x
        } else if x < y && self.options.vertical {
            delta.y
        } else {
            0.0
        };
        if along > self.options.tolerance {
            1
        } else if along < -self.options.tolerance {
            -1
        } else {
            0
        }
    }

    fn end_gesture(&self, matrix: &Matrix<E>, emit: bool) {
        let gesture = self.gesture.borrow_mut().take();
        if !self.options.class_alias.is_empty() {
            matrix.toggle_class(&self.options.class_alias, false);
        }
        if let (true, Some(gesture)) = (emit, gesture) {
            matrix.emit(
                event::TOUCH_CANCEL,
                &MatrixEvent::Touch {
                    target: Some(gesture.target),
                    position: Some(gesture.last),
                },
            );
        }
    }
}

impl<E: Element> Drop for TouchState<E> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.source.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::headless::{HeadlessDocument, HeadlessElement, ManualPointer};
    use crate::host::PointerPhase::{End, Move, Start};
    use crate::html::has_class;
    use crate::options::Options;
    use crate::point::Rect;
    use alloc::vec;
    use alloc::vec::Vec;
    use serde_json::json;

    struct Fixture {
        matrix: Matrix<HeadlessElement>,
        pointer: Rc<ManualPointer>,
        swipe: Rc<TouchSwipe<HeadlessElement>>,
        root: HeadlessElement,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    fn fixture(options: TouchSwipeOptions) -> Fixture {
        let body = HeadlessElement::new("body");
        let root = HeadlessElement::new("div");
        root.set_attribute("class", "carousel");
        root.set_bounds(Rect::new(0.0, 0.0, 300.0, 200.0));
        body.append_child(&root);
        for _ in 0..5 {
            root.append_child(&HeadlessElement::new("div"));
        }
        let pointer = Rc::new(ManualPointer::new());
        let swipe = Rc::new(TouchSwipe::new(
            Rc::clone(&pointer) as Rc<dyn PointerSource>,
            options,
        ));
        let matrix = Matrix::new(
            HeadlessDocument::new(body),
            ".carousel",
            Options::default(),
            vec![Rc::clone(&swipe) as Rc<dyn Plugin<HeadlessElement>>],
        )
        .expect("root resolves");

        let log = Rc::new(RefCell::new(Vec::new()));
        for name in [
            event::TOUCH_START,
            event::TOUCH_MOVE,
            event::TOUCH_END,
            event::TOUCH_CANCEL,
            event::SWIPE_NEXT,
            event::SWIPE_PREV,
            event::SLIDE_AFTER,
        ] {
            let log = Rc::clone(&log);
            matrix.on(name, move |_| log.borrow_mut().push(name));
        }
        Fixture {
            matrix,
            pointer,
            swipe,
            root,
            log,
        }
    }

    #[test]
    fn horizontal_swipe_past_tolerance_goes_next() {
        let f = fixture(TouchSwipeOptions::default());
        f.pointer.send(Start, 100.0, 100.0);
        assert!(f.swipe.is_touching(), "armed inside bounds");
        assert!(has_class(&f.root, "vm-touching"), "root marked");

        f.pointer.send(Move, 60.0, 100.0);
        assert_eq!(f.matrix.current_index(), 1);
        assert!(!f.swipe.is_touching(), "swipe ends the gesture");
        assert!(!has_class(&f.root, "vm-touching"), "class cleared");
        assert_eq!(
            *f.log.borrow(),
            vec![
                event::TOUCH_START,
                event::TOUCH_MOVE,
                event::SWIPE_NEXT,
                event::SLIDE_AFTER
            ]
        );
    }

    #[test]
    fn small_drag_does_nothing() {
        let f = fixture(TouchSwipeOptions::default());
        f.pointer.send(Start, 100.0, 100.0);
        f.pointer.send(Move, 90.0, 100.0);
        assert_eq!(f.matrix.current_index(), 0);
        assert!(f.swipe.is_touching(), "still armed");
    }

    #[test]
    fn drag_of_exactly_tolerance_does_not_swipe() {
        let f = fixture(TouchSwipeOptions::default());
        f.pointer.send(Start, 100.0, 100.0);
        f.pointer.send(Move, 70.0, 100.0);
        assert_eq!(f.matrix.current_index(), 0);
        assert!(f.swipe.is_touching(), "still armed at the boundary");
        f.pointer.send(Move, 130.0, 100.0);
        assert_eq!(f.matrix.current_index(), 0);
        assert!(!f.log.borrow().contains(&event::SWIPE_NEXT), "no swipe:next");
        assert!(!f.log.borrow().contains(&event::SWIPE_PREV), "no swipe:prev");
    }

    #[test]
    fn reverse_swipe_goes_previous_and_wraps() {
        let f = fixture(TouchSwipeOptions::default());
        f.pointer.send(Start, 100.0, 100.0);
        f.pointer.send(Move, 140.0, 100.0);
        assert_eq!(f.matrix.current_index(), 4);
        assert!(f.log.borrow().contains(&event::SWIPE_PREV), "swipe:prev emitted");
    }

    #[test]
    fn vertical_drag_ignored_in_horizontal_mode() {
        let f = fixture(TouchSwipeOptions::default());
        f.pointer.send(Start, 100.0, 100.0);
        f.pointer.send(Move, 100.0, 20.0);
        assert_eq!(f.matrix.current_index(), 0);
    }

    #[test]
    fn vertical_mode_reads_y_axis() {
        let f = fixture(TouchSwipeOptions {
            vertical: true,
            ..TouchSwipeOptions::default()
        });
        f.pointer.send(Start, 100.0, 100.0);
        f.pointer.send(Move, 20.0, 95.0);
        assert_eq!(f.matrix.current_index(), 0);
        f.pointer.send(Move, 100.0, 60.0);
        assert_eq!(f.matrix.current_index(), 1);
    }

    #[test]
    fn press_outside_root_is_ignored() {
        let f = fixture(TouchSwipeOptions::default());
        f.pointer.send(Start, 400.0, 100.0);
        assert!(!f.swipe.is_touching(), "not armed");
        f.pointer.send(Move, 300.0, 100.0);
        assert_eq!(f.matrix.current_index(), 0);
        assert!(f.log.borrow().is_empty(), "no events");
    }

    #[test]
    fn second_press_does_not_rearm() {
        let f = fixture(TouchSwipeOptions::default());
        f.pointer.send(Start, 100.0, 100.0);
        f.pointer.send(Start, 10.0, 10.0);
        f.pointer.send(Move, 80.0, 100.0);
        assert_eq!(f.matrix.current_index(), 0);
        assert_eq!(f.log.borrow().iter().filter(|e| **e == event::TOUCH_START).count(), 1);
    }

    #[test]
    fn release_emits_end_and_disarms() {
        let f = fixture(TouchSwipeOptions::default());
        f.pointer.send(Start, 100.0, 100.0);
        f.pointer.send(End, 100.0, 100.0);
        assert!(!f.swipe.is_touching(), "disarmed");
        assert!(!has_class(&f.root, "vm-touching"), "class cleared");
        assert_eq!(*f.log.borrow(), vec![event::TOUCH_START, event::TOUCH_END]);
        f.pointer.send(End, 100.0, 100.0);
        assert_eq!(f.log.borrow().len(), 2);
    }

    #[test]
    fn move_listener_can_cancel_gesture() {
        let f = fixture(TouchSwipeOptions::default());
        f.matrix.on(event::TOUCH_MOVE, |e| {
            if let MatrixEvent::TouchMove { cancel, .. } = e {
                cancel.cancel();
            }
        });
        f.pointer.send(Start, 100.0, 100.0);
        f.pointer.send(Move, 0.0, 100.0);
        assert_eq!(f.matrix.current_index(), 0);
        assert!(!f.swipe.is_touching(), "cancelled");
        assert_eq!(
            *f.log.borrow(),
            vec![event::TOUCH_START, event::TOUCH_MOVE, event::TOUCH_CANCEL]
        );
    }

    #[test]
    fn prevent_default_applies_to_arming_press() {
        let f = fixture(TouchSwipeOptions {
            prevent_default: true,
            ..TouchSwipeOptions::default()
        });
        assert!(!f.pointer.send(Start, 500.0, 0.0), "outside press untouched");
        assert!(f.pointer.send(Start, 10.0, 10.0), "arming press prevented");
        assert!(!f.pointer.send(Move, 12.0, 10.0), "moves untouched");
    }

    #[test]
    fn public_cancel_emits_cancel() {
        let f = fixture(TouchSwipeOptions::default());
        f.pointer.send(Start, 100.0, 100.0);
        f.swipe.cancel().expect("attached");
        assert!(!f.swipe.is_touching(), "cancelled");
        assert_eq!(*f.log.borrow(), vec![event::TOUCH_START, event::TOUCH_CANCEL]);
    }

    #[test]
    fn destroy_unsubscribes_and_detaches() {
        let f = fixture(TouchSwipeOptions::default());
        assert_eq!(f.pointer.subscriber_count(), 1);
        f.matrix.destroy();
        assert_eq!(f.pointer.subscriber_count(), 0);
        assert_eq!(
            f.swipe.cancel(),
            Err(Error::PluginNotAttached {
                plugin: "TouchSwipe"
            })
        );
        f.matrix.initialize(".carousel").expect("root resolves");
        assert_eq!(f.pointer.subscriber_count(), 1);
    }

    #[test]
    fn dropping_the_matrix_releases_a_plugin_kept_alive() {
        let Fixture {
            matrix,
            pointer,
            swipe,
            root,
            ..
        } = fixture(TouchSwipeOptions::default());
        pointer.send(Start, 100.0, 100.0);
        assert!(has_class(&root, "vm-touching"), "touching before drop");
        drop(matrix);
        assert_eq!(pointer.subscriber_count(), 0);
        assert!(!swipe.is_touching(), "gesture cleared");
        assert!(!has_class(&root, "vm-touching"), "alias class removed");
        assert_eq!(root.class_attribute(), "carousel");
    }

    #[test]
    fn options_from_json_fall_back_per_field() {
        let o = TouchSwipeOptions::from_json(&json!({
            "classAlias": "",
            "preventDefault": "yes",
            "tolerance": 12.5,
            "vertical": true,
        }));
        assert_eq!(o.class_alias, "");
        assert!(!o.prevent_default, "mistyped keeps default");
        assert_eq!(o.tolerance, 12.5);
        assert!(o.vertical, "read");
    }
}
