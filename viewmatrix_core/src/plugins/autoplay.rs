// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timer-driven navigation.
//!
//! [`Autoplay`] advances its matrix by [`AutoplayOptions::direction`] every
//! [`AutoplayOptions::interval_ms`]. While running, the root carries
//! `class_prefix + class_alias`.
//!
//! Slides the timer itself triggers are flagged as timer-driven. Any other
//! slide that actually changes the index pauses playback when
//! [`AutoplayOptions::cancel_on_slide`] is set, so a user navigating by hand
//! takes over from the timer.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::Cell;
use core::fmt;

use serde_json::Value;

use crate::element::Element;
use crate::emitter::ListenerId;
use crate::error::Result;
use crate::event::{self, MatrixEvent};
use crate::host::{IntervalTimer, TimerId};
use crate::html;
use crate::matrix::Matrix;
use crate::options::{json_bool, json_i64, json_string};
use crate::plugin::{Plugin, PluginBinding};

/// Autoplay configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoplayOptions {
    /// Pause when a slide is changed by anything but the timer.
    ///
    /// Default: `true`.
    pub cancel_on_slide: bool,
    /// Root class suffix toggled while playing. Empty disables the class.
    ///
    /// Default: `"autoplaying"`.
    pub class_alias: String,
    /// Steps applied per tick; negative plays backwards.
    ///
    /// Default: `1`.
    pub direction: isize,
    /// Start playing as soon as the matrix initializes.
    ///
    /// Default: `true`.
    pub instant: bool,
    /// Milliseconds between ticks.
    ///
    /// Default: `3000`.
    pub interval_ms: u32,
}

impl Default for AutoplayOptions {
    fn default() -> Self {
        Self {
            cancel_on_slide: true,
            class_alias: "autoplaying".into(),
            direction: 1,
            instant: true,
            interval_ms: 3000,
        }
    }
}

impl AutoplayOptions {
    /// Reads options from a JSON object with camel-case keys
    /// (`cancelOnSlide`, `classAlias`, `direction`, `instant`, `interval`).
    ///
    /// Missing or mistyped keys keep their defaults.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let mut options = Self::default();
        let Some(obj) = value.as_object() else {
            return options;
        };
        if let Some(v) = json_bool(obj, "cancelOnSlide") {
            options.cancel_on_slide = v;
        }
        if let Some(v) = json_string(obj, "classAlias") {
            options.class_alias = v;
        }
        if let Some(v) = json_i64(obj, "direction").and_then(|n| isize::try_from(n).ok()) {
            options.direction = v;
        }
        if let Some(v) = json_bool(obj, "instant") {
            options.instant = v;
        }
        if let Some(v) = json_i64(obj, "interval").and_then(|n| u32::try_from(n).ok()) {
            options.interval_ms = v;
        }
        options
    }
}

/// Plugin that navigates on a repeating timer.
pub struct Autoplay<E: Element> {
    binding: PluginBinding<E>,
    state: Rc<AutoplayState>,
}

struct AutoplayState {
    options: AutoplayOptions,
    timer: Rc<dyn IntervalTimer>,
    interval: Cell<Option<TimerId>>,
    timer_driven: Cell<bool>,
    slide_listener: Cell<Option<ListenerId>>,
}

impl<E: Element> fmt::Debug for Autoplay<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autoplay")
            .field("binding", &self.binding)
            .field("options", &self.state.options)
            .field("interval", &self.state.interval.get())
            .finish_non_exhaustive()
    }
}

impl<E: Element> Autoplay<E> {
    /// Creates an unattached autoplay plugin ticking on `timer`.
    pub fn new(timer: Rc<dyn IntervalTimer>, options: AutoplayOptions) -> Self {
        Self {
            binding: PluginBinding::new("Autoplay"),
            state: Rc::new(AutoplayState {
                options,
                timer,
                interval: Cell::new(None),
                timer_driven: Cell::new(false),
                slide_listener: Cell::new(None),
            }),
        }
    }

    /// Returns the options this plugin runs with.
    #[must_use]
    pub fn options(&self) -> &AutoplayOptions {
        &self.state.options
    }

    /// Returns `true` while the timer is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.interval.get().is_some()
    }

    /// Starts (or restarts) playback. Emits `autoplay:start` when `emit`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PluginNotAttached`](crate::Error::PluginNotAttached)
    /// if the plugin has no live matrix.
    pub fn play(&self, emit: bool) -> Result<()> {
        let matrix = self.binding.matrix()?;
        start(&self.state, &matrix, emit);
        Ok(())
    }

    /// Stops playback. A no-op when not playing. Emits `autoplay:pause` when
    /// `emit`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PluginNotAttached`](crate::Error::PluginNotAttached)
    /// if the plugin has no live matrix.
    pub fn pause(&self, emit: bool) -> Result<()> {
        let matrix = self.binding.matrix()?;
        self.state.stop(&matrix, emit);
        Ok(())
    }
}

impl<E: Element> Plugin<E> for Autoplay<E> {
    fn binding(&self) -> &PluginBinding<E> {
        &self.binding
    }

    fn on_init(&self, matrix: &Matrix<E>) {
        let state = Rc::downgrade(&self.state);
        let owner = matrix.downgrade();
        let id = matrix.on(event::SLIDE_AFTER, move |e| {
            let (Some(state), Some(matrix)) = (state.upgrade(), owner.upgrade()) else {
                return;
            };
            let timer_driven = state.timer_driven.replace(false);
            let changed = matches!(e, MatrixEvent::Slide { from, to, .. } if from != to);
            if changed && !timer_driven && state.options.cancel_on_slide {
                state.stop(&matrix, true);
            }
        });
        self.state.slide_listener.set(Some(id));

        if self.state.options.instant {
            start(&self.state, matrix, true);
        }
    }

    fn on_destroy(&self, matrix: &Matrix<E>) {
        if let Some(id) = self.state.slide_listener.take() {
            matrix.off(event::SLIDE_AFTER, id);
        }
        self.state.stop(matrix, false);
    }

    fn on_release(&self, root: Option<&E>, class_prefix: &str) {
        let state = &self.state;
        state.slide_listener.take();
        state.timer_driven.set(false);
        if let Some(id) = state.interval.take() {
            state.timer.clear_interval(id);
        }
        let Some(root) = root else {
            return;
        };
        if !state.options.class_alias.is_empty() {
            let mut class = String::from(class_prefix);
            class.push_str(&state.options.class_alias);
            html::remove_class(root, &class);
        }
    }
}

fn start<E: Element>(state: &Rc<AutoplayState>, matrix: &Matrix<E>, emit: bool) {
    state.stop(matrix, false);

    let weak: Weak<AutoplayState> = Rc::downgrade(state);
    let owner = matrix.downgrade();
    let id = state.timer.set_interval(
        state.options.interval_ms,
        Box::new(move || {
            let (Some(state), Some(matrix)) = (weak.upgrade(), owner.upgrade()) else {
                return;
            };
            state.timer_driven.set(true);
            matrix.inc(state.options.direction);
            state.timer_driven.set(false);
        }),
    );
    state.interval.set(Some(id));

    if !state.options.class_alias.is_empty() {
        matrix.toggle_class(&state.options.class_alias, true);
    }
    tracing::debug!(interval_ms = state.options.interval_ms, "autoplay started");
    if emit {
        matrix.emit(event::AUTOPLAY_START, &MatrixEvent::Autoplay { playing: true });
    }
}

impl AutoplayState {
    fn stop<E: Element>(&self, matrix: &Matrix<E>, emit: bool) {
        let Some(id) = self.interval.take() else {
            return;
        };
        self.timer.clear_interval(id);

        if !self.options.class_alias.is_empty() {
            matrix.toggle_class(&self.options.class_alias, false);
        }
        tracing::debug!("autoplay paused");
        if emit {
            matrix.emit(event::AUTOPLAY_PAUSE, &MatrixEvent::Autoplay { playing: false });
        }
    }
}

impl Drop for AutoplayState {
    fn drop(&mut self) {
        if let Some(id) = self.interval.take() {
            self.timer.clear_interval(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::headless::{HeadlessDocument, HeadlessElement, ManualTimer};
    use crate::html::has_class;
    use crate::options::Options;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use serde_json::json;

    struct Fixture {
        matrix: Matrix<HeadlessElement>,
        timer: Rc<ManualTimer>,
        autoplay: Rc<Autoplay<HeadlessElement>>,
        root: HeadlessElement,
    }

    fn fixture(options: AutoplayOptions) -> Fixture {
        let body = HeadlessElement::new("body");
        let root = HeadlessElement::new("div");
        root.set_attribute("id", "slides");
        body.append_child(&root);
        for _ in 0..5 {
            root.append_child(&HeadlessElement::new("div"));
        }
        let timer = Rc::new(ManualTimer::new());
        let autoplay = Rc::new(Autoplay::new(
            Rc::clone(&timer) as Rc<dyn IntervalTimer>,
            options,
        ));
        let matrix = Matrix::new(
            HeadlessDocument::new(body),
            "#slides",
            Options::default(),
            vec![Rc::clone(&autoplay) as Rc<dyn Plugin<HeadlessElement>>],
        )
        .expect("root resolves");
        Fixture {
            matrix,
            timer,
            autoplay,
            root,
        }
    }

    fn fast() -> AutoplayOptions {
        AutoplayOptions {
            interval_ms: 100,
            ..AutoplayOptions::default()
        }
    }

    #[test]
    fn instant_autoplay_ticks_every_interval() {
        let f = fixture(fast());
        assert!(f.autoplay.is_playing(), "initial slide must not pause instant playback");
        assert!(has_class(&f.root, "vm-autoplaying"), "root marked");

        f.timer.advance(100);
        assert_eq!(f.matrix.current_index(), 1);
        f.timer.advance(250);
        assert_eq!(f.matrix.current_index(), 3);
        assert!(f.autoplay.is_playing(), "timer slides never self-cancel");
    }

    #[test]
    fn pause_stops_ticks_and_emits() {
        let f = fixture(fast());
        let events = Rc::new(RefCell::new(Vec::new()));
        let e = Rc::clone(&events);
        f.matrix
            .on(event::AUTOPLAY_PAUSE, move |_| e.borrow_mut().push("pause"));

        f.autoplay.pause(true).expect("attached");
        f.timer.advance(1000);
        assert_eq!(f.matrix.current_index(), 0);
        assert!(!f.autoplay.is_playing(), "stopped");
        assert!(!has_class(&f.root, "vm-autoplaying"), "class removed");
        assert_eq!(f.timer.active(), 0);

        f.autoplay.pause(true).expect("attached");
        assert_eq!(*events.borrow(), vec!["pause"]);
    }

    #[test]
    fn manual_slide_cancels_playback() {
        let f = fixture(fast());
        f.timer.advance(100);
        f.matrix.slide(3);
        assert!(!f.autoplay.is_playing(), "manual slide pauses");
        f.timer.advance(500);
        assert_eq!(f.matrix.current_index(), 3);
    }

    #[test]
    fn manual_slide_keeps_playing_without_cancel_on_slide() {
        let f = fixture(AutoplayOptions {
            cancel_on_slide: false,
            ..fast()
        });
        f.matrix.slide(3);
        assert!(f.autoplay.is_playing(), "still playing");
        f.timer.advance(100);
        assert_eq!(f.matrix.current_index(), 4);
    }

    #[test]
    fn sliding_to_current_index_does_not_cancel() {
        let f = fixture(fast());
        f.matrix.slide(0);
        assert!(f.autoplay.is_playing(), "no index change");
    }

    #[test]
    fn negative_direction_plays_backwards() {
        let f = fixture(AutoplayOptions {
            direction: -1,
            ..fast()
        });
        f.timer.advance(100);
        assert_eq!(f.matrix.current_index(), 4);
    }

    #[test]
    fn play_restarts_without_duplicate_timers() {
        let f = fixture(AutoplayOptions {
            instant: false,
            ..fast()
        });
        assert!(!f.autoplay.is_playing(), "not instant");
        let starts = Rc::new(Cell::new(0));
        let s = Rc::clone(&starts);
        f.matrix.on(event::AUTOPLAY_START, move |_| s.set(s.get() + 1));

        f.autoplay.play(true).expect("attached");
        f.autoplay.play(false).expect("attached");
        assert_eq!(f.timer.active(), 1);
        assert_eq!(starts.get(), 1);
        f.timer.advance(100);
        assert_eq!(f.matrix.current_index(), 1);
    }

    #[test]
    fn destroy_releases_timer_and_listener() {
        let f = fixture(fast());
        let pauses = Rc::new(Cell::new(0));
        let p = Rc::clone(&pauses);
        f.matrix.on(event::AUTOPLAY_PAUSE, move |_| p.set(p.get() + 1));

        f.matrix.destroy();
        assert_eq!(f.timer.active(), 0);
        assert_eq!(pauses.get(), 0);
        assert_eq!(f.matrix.listener_count(event::SLIDE_AFTER), 0);
        assert_eq!(
            f.autoplay.play(true),
            Err(Error::PluginNotAttached { plugin: "Autoplay" })
        );
    }

    #[test]
    fn reinitialize_does_not_stack_listeners() {
        let f = fixture(fast());
        f.matrix.initialize("#slides").expect("root resolves");
        assert_eq!(f.matrix.listener_count(event::SLIDE_AFTER), 1);
        assert_eq!(f.timer.active(), 1);
    }

    #[test]
    fn dropping_everything_clears_the_interval() {
        let Fixture {
            matrix,
            timer,
            autoplay,
            ..
        } = fixture(fast());
        drop(autoplay);
        drop(matrix);
        assert_eq!(timer.active(), 0);
    }

    #[test]
    fn dropping_the_matrix_stops_a_plugin_kept_alive() {
        let Fixture {
            matrix,
            timer,
            autoplay,
            root,
        } = fixture(fast());
        assert!(has_class(&root, "vm-autoplaying"), "playing before drop");
        drop(matrix);
        assert!(!autoplay.is_playing(), "released");
        assert_eq!(timer.active(), 0);
        assert!(!has_class(&root, "vm-autoplaying"), "alias class removed");
        assert_eq!(root.class_attribute(), "");
        assert_eq!(
            autoplay.play(true),
            Err(Error::PluginNotAttached { plugin: "Autoplay" })
        );
    }

    #[test]
    fn options_from_json_fall_back_per_field() {
        let o = AutoplayOptions::from_json(&json!({
            "cancelOnSlide": false,
            "classAlias": 7,
            "direction": -2,
            "interval": 500,
        }));
        assert!(!o.cancel_on_slide, "read");
        assert_eq!(o.class_alias, "autoplaying");
        assert_eq!(o.direction, -2);
        assert!(o.instant, "default kept");
        assert_eq!(o.interval_ms, 500);
        assert_eq!(AutoplayOptions::from_json(&json!(null)), AutoplayOptions::default());
    }
}
