// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronous observer table keyed by event name.
//!
//! [`Emitter`] is a composable capability: a component embeds one as a field
//! and forwards `on` / `once` / `off` / `emit` to it. It is single-threaded and
//! never defers a callback; `emit` runs every listener before it returns.
//!
//! # Reentrancy
//!
//! `emit` dispatches over a snapshot of the listener list taken when the
//! emission starts, and holds no borrow while a callback runs. A callback may
//! therefore register or remove listeners, or emit again, without affecting
//! the pass in progress. The one exception is a [`once`](Emitter::once)
//! listener: it is removed right before it runs and is skipped if something
//! else removed it first, so it fires at most once.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

/// Identifies one registered listener, for use with [`Emitter::off`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

struct Listener<A> {
    id: ListenerId,
    once: bool,
    callback: Rc<dyn Fn(&A)>,
}

impl<A> Clone for Listener<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            once: self.once,
            callback: Rc::clone(&self.callback),
        }
    }
}

/// A per-instance event table mapping event names to ordered listener lists.
///
/// Listeners receive a shared reference to the payload type `A`. Insertion
/// order is invocation order.
pub struct Emitter<A> {
    listeners: RefCell<BTreeMap<String, Vec<Listener<A>>>>,
    next_id: Cell<u64>,
}

impl<A> fmt::Debug for Emitter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        f.debug_struct("Emitter")
            .field("events", &listeners.keys().collect::<Vec<_>>())
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

impl<A> Default for Emitter<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Emitter<A> {
    /// Creates an emitter with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Appends `callback` to the listeners of `event`.
    pub fn on(&self, event: &str, callback: impl Fn(&A) + 'static) -> ListenerId {
        self.register(event, false, Rc::new(callback))
    }

    /// Appends `callback` to the listeners of `event`; it deregisters itself
    /// the first time it is invoked.
    pub fn once(&self, event: &str, callback: impl Fn(&A) + 'static) -> ListenerId {
        self.register(event, true, Rc::new(callback))
    }

    /// Removes the listener `id` from `event`.
    ///
    /// Returns `true` if a listener was removed.
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(event) else {
            return false;
        };
        let Some(pos) = list.iter().position(|l| l.id == id) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            listeners.remove(event);
        }
        true
    }

    /// Removes every listener of `event`.
    pub fn off_event(&self, event: &str) {
        self.listeners.borrow_mut().remove(event);
    }

    /// Removes every listener of every event.
    pub fn off_all(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Invokes the listeners of `event` with `args`, in registration order.
    ///
    /// A no-op if nothing listens to `event`.
    pub fn emit(&self, event: &str, args: &A) {
        let snapshot = match self.listeners.borrow().get(event) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => return,
        };
        for listener in snapshot {
            if listener.once && !self.off(event, listener.id) {
                continue;
            }
            (listener.callback)(args);
        }
    }

    /// Returns the number of listeners registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.borrow().get(event).map_or(0, Vec::len)
    }

    /// Returns `true` if at least one listener is registered for `event`.
    #[must_use]
    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    fn register(&self, event: &str, once: bool, callback: Rc<dyn Fn(&A)>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .entry(event.into())
            .or_default()
            .push(Listener { id, once, callback });
        id
    }
}
