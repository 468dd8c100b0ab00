// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host for tests and non-browser embedders.
//!
//! - [`HeadlessElement`] / [`HeadlessDocument`]: a tiny attribute-only element
//!   tree with settable bounds and simple selector matching (`*`, `tag`,
//!   `.class`, `#id` and compounds such as `div.slide`).
//! - [`ManualTimer`]: an [`IntervalTimer`] driven by [`ManualTimer::advance`].
//! - [`ManualPointer`]: a [`PointerSource`] driven by
//!   [`ManualPointer::dispatch`].
//!
//! None of these hold an internal borrow while running callbacks, so callbacks
//! may clear timers or unsubscribe re-entrantly.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::element::{Document, Element};
use crate::host::{
    IntervalTimer, PointerHandler, PointerInput, PointerPhase, PointerSource, SubscriptionId,
    TimerId,
};
use crate::point::{Point, Rect};

// -- Elements --

/// A handle to an in-memory element.
#[derive(Clone)]
pub struct HeadlessElement(Rc<RefCell<Node>>);

#[derive(Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    children: Vec<HeadlessElement>,
    bounds: Rect,
}

impl PartialEq for HeadlessElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HeadlessElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("HeadlessElement")
            .field("tag", &node.tag)
            .field("attributes", &node.attributes)
            .field("children", &node.children.len())
            .finish()
    }
}

impl HeadlessElement {
    /// Creates a detached element with tag name `tag`.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(Node {
            tag: tag.into(),
            ..Node::default()
        })))
    }

    /// Returns the tag name.
    #[must_use]
    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    /// Returns attribute `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    /// Returns `true` if attribute `name` is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.0.borrow().attributes.contains_key(name)
    }

    /// Sets attribute `name` to `value`.
    pub fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.into(), value.into());
    }

    /// Removes attribute `name`.
    pub fn remove_attribute(&self, name: &str) {
        self.0.borrow_mut().attributes.remove(name);
    }

    /// Appends `child` as the last child.
    pub fn append_child(&self, child: &Self) {
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Sets the page-space bounds reported by [`Element::bounds`].
    pub fn set_bounds(&self, bounds: Rect) {
        self.0.borrow_mut().bounds = bounds;
    }

    /// Returns `true` if this element matches the simple `selector`.
    ///
    /// Supports `*`, a tag name, `.class`, `#id` and compounds of those.
    /// Selector lists and combinators never match.
    #[must_use]
    pub fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if selector.is_empty() || selector.contains([' ', '>', '+', '~', ',']) {
            return false;
        }
        let node = self.0.borrow();
        let class = node.attributes.get("class").map(String::as_str).unwrap_or("");
        let id = node.attributes.get("id").map(String::as_str);

        let (tag, mut rest) = match selector.find(['.', '#']) {
            Some(at) => selector.split_at(at),
            None => (selector, ""),
        };
        if !tag.is_empty() && tag != "*" && !tag.eq_ignore_ascii_case(&node.tag) {
            return false;
        }
        while !rest.is_empty() {
            let marker = rest.as_bytes()[0];
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            let ok = !name.is_empty()
                && match marker {
                    b'.' => class.split_whitespace().any(|c| c == name),
                    _ => id == Some(name),
                };
            if !ok {
                return false;
            }
            rest = &body[end..];
        }
        true
    }

    /// Returns the first element in this subtree (self included, pre-order)
    /// matching `selector`.
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<Self> {
        if self.matches(selector) {
            return Some(self.clone());
        }
        let children = self.0.borrow().children.clone();
        children.iter().find_map(|c| c.query_selector(selector))
    }
}

impl Element for HeadlessElement {
    fn class_attribute(&self) -> String {
        self.attribute("class").unwrap_or_default()
    }

    fn set_class_attribute(&self, value: &str) {
        if value.is_empty() {
            self.remove_attribute("class");
        } else {
            self.set_attribute("class", value);
        }
    }

    fn style_attribute(&self) -> String {
        self.attribute("style").unwrap_or_default()
    }

    fn set_style_attribute(&self, value: &str) {
        if value.is_empty() {
            self.remove_attribute("style");
        } else {
            self.set_attribute("style", value);
        }
    }

    fn children(&self, selector: Option<&str>) -> Vec<Self> {
        let children = self.0.borrow().children.clone();
        match selector {
            Some(selector) => children.into_iter().filter(|c| c.matches(selector)).collect(),
            None => children,
        }
    }

    fn bounds(&self) -> Rect {
        self.0.borrow().bounds
    }
}

/// A document rooted at one [`HeadlessElement`].
#[derive(Clone, Debug)]
pub struct HeadlessDocument {
    root: HeadlessElement,
}

impl HeadlessDocument {
    /// Creates a document whose tree starts at `root`.
    #[must_use]
    pub fn new(root: HeadlessElement) -> Self {
        Self { root }
    }

    /// Returns the document root.
    #[must_use]
    pub fn root(&self) -> &HeadlessElement {
        &self.root
    }
}

impl Document<HeadlessElement> for HeadlessDocument {
    fn query_selector(&self, selector: &str) -> Option<HeadlessElement> {
        self.root.query_selector(selector)
    }
}

// -- Timer --

type SharedCallback = Rc<RefCell<Box<dyn FnMut()>>>;

struct Interval {
    period_ms: u64,
    next_due: u64,
    callback: SharedCallback,
}

#[derive(Default)]
struct TimerTable {
    now_ms: u64,
    next_id: u32,
    intervals: BTreeMap<u32, Interval>,
}

/// An [`IntervalTimer`] whose clock only moves when told to.
#[derive(Default)]
pub struct ManualTimer {
    table: RefCell<TimerTable>,
}

impl fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.borrow();
        f.debug_struct("ManualTimer")
            .field("now_ms", &table.now_ms)
            .field("active", &table.intervals.len())
            .finish()
    }
}

impl ManualTimer {
    /// Creates a timer at time zero with no intervals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current manual time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.table.borrow().now_ms
    }

    /// Returns the number of running intervals.
    #[must_use]
    pub fn active(&self) -> usize {
        self.table.borrow().intervals.len()
    }

    /// Moves the clock forward by `ms`, firing every interval that comes due
    /// in chronological order.
    pub fn advance(&self, ms: u64) {
        let target = self.table.borrow().now_ms.saturating_add(ms);
        loop {
            let due = {
                let mut table = self.table.borrow_mut();
                let next = table
                    .intervals
                    .iter()
                    .filter(|(_, i)| i.next_due <= target)
                    .min_by_key(|(id, i)| (i.next_due, **id))
                    .map(|(id, _)| *id);
                match next {
                    Some(id) => {
                        let Some(interval) = table.intervals.get_mut(&id) else {
                            break;
                        };
                        let at = interval.next_due;
                        interval.next_due += interval.period_ms;
                        let callback = Rc::clone(&interval.callback);
                        table.now_ms = at;
                        callback
                    }
                    None => {
                        table.now_ms = target;
                        break;
                    }
                }
            };
            (due.borrow_mut())();
        }
    }
}

impl IntervalTimer for ManualTimer {
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerId {
        let mut table = self.table.borrow_mut();
        let id = table.next_id;
        table.next_id = table.next_id.wrapping_add(1);
        // A zero period would never let the clock advance.
        let period_ms = u64::from(period_ms.max(1));
        let next_due = table.now_ms + period_ms;
        table.intervals.insert(
            id,
            Interval {
                period_ms,
                next_due,
                callback: Rc::new(RefCell::new(callback)),
            },
        );
        TimerId(id)
    }

    fn clear_interval(&self, id: TimerId) {
        self.table.borrow_mut().intervals.remove(&id.0);
    }
}

// -- Pointer --

/// A [`PointerSource`] fed by explicit [`dispatch`](Self::dispatch) calls.
#[derive(Default)]
pub struct ManualPointer {
    handlers: RefCell<BTreeMap<u32, PointerHandler>>,
    next_id: Cell<u32>,
}

impl fmt::Debug for ManualPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualPointer")
            .field("subscribers", &self.handlers.borrow().len())
            .finish_non_exhaustive()
    }
}

impl ManualPointer {
    /// Creates a source with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Delivers `input` to every subscriber registered when the call starts.
    pub fn dispatch(&self, input: &PointerInput) {
        let snapshot: Vec<PointerHandler> = self.handlers.borrow().values().cloned().collect();
        for handler in snapshot {
            handler(input);
        }
    }

    /// Dispatches one input at `(x, y)` and returns whether a subscriber
    /// prevented the default.
    pub fn send(&self, phase: PointerPhase, x: f64, y: f64) -> bool {
        let input = PointerInput::new(phase, Point::new(x, y));
        self.dispatch(&input);
        input.default_prevented()
    }
}

impl PointerSource for ManualPointer {
    fn subscribe(&self, handler: PointerHandler) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.handlers.borrow_mut().insert(id, handler);
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers.borrow_mut().remove(&id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn selectors_match_tag_class_and_id() {
        let el = HeadlessElement::new("div");
        el.set_attribute("class", "a slide");
        el.set_attribute("id", "main");
        assert!(el.matches("*"), "universal");
        assert!(el.matches("div"), "tag");
        assert!(el.matches(".slide"), "class");
        assert!(el.matches("#main"), "id");
        assert!(el.matches("div.a.slide#main"), "compound");
        assert!(!el.matches("span"), "other tag");
        assert!(!el.matches(".sl"), "partial class");
        assert!(!el.matches("div .slide"), "combinators unsupported");
    }

    #[test]
    fn document_finds_first_in_preorder() {
        let body = HeadlessElement::new("body");
        let a = HeadlessElement::new("div");
        let b = HeadlessElement::new("div");
        let inner = HeadlessElement::new("p");
        a.append_child(&inner);
        body.append_child(&a);
        body.append_child(&b);
        let doc = HeadlessDocument::new(body);
        assert_eq!(doc.query_selector("div"), Some(a));
        assert_eq!(doc.query_selector("p"), Some(inner));
        assert_eq!(doc.query_selector(".none"), None);
    }

    #[test]
    fn manual_timer_fires_in_order_and_survives_self_clear() {
        let timer = Rc::new(ManualTimer::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = Rc::clone(&log);
        timer.set_interval(10, Box::new(move || l.borrow_mut().push("ten")));

        let l = Rc::clone(&log);
        let t = Rc::downgrade(&timer);
        let id = Rc::new(Cell::new(None));
        let own = Rc::clone(&id);
        let fifteen = timer.set_interval(
            15,
            Box::new(move || {
                l.borrow_mut().push("fifteen");
                if let (Some(t), Some(id)) = (t.upgrade(), own.get()) {
                    t.clear_interval(id);
                }
            }),
        );
        id.set(Some(fifteen));

        timer.advance(35);
        assert_eq!(*log.borrow(), vec!["ten", "fifteen", "ten", "ten"]);
        assert_eq!(timer.now_ms(), 35);
        assert_eq!(timer.active(), 1);
    }

    #[test]
    fn manual_pointer_reports_prevented_default() {
        let pointer = ManualPointer::new();
        let id = pointer.subscribe(Rc::new(|input: &PointerInput| {
            if input.phase == PointerPhase::Move {
                input.prevent_default();
            }
        }));
        assert!(!pointer.send(PointerPhase::Start, 0.0, 0.0), "start untouched");
        assert!(pointer.send(PointerPhase::Move, 1.0, 0.0), "move prevented");
        pointer.unsubscribe(id);
        assert_eq!(pointer.subscriber_count(), 0);
    }
}
