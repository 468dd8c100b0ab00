// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The matrix state machine.
//!
//! A [`Matrix`] is a cheap, clonable handle to one carousel instance. It owns
//! the root element, the snapshot of tracked children, the current index, the
//! resolved [`Options`] and the event table, and it drives the attached
//! plugins' lifecycle.
//!
//! # Lifecycle
//!
//! ```text
//!   create ──► (uninitialized) ──initialize──► (initialized)
//!                     ▲                             │
//!                     └────────── destroy ──────────┘
//! ```
//!
//! `initialize` always runs `destroy` first, so calling it again (with the
//! same root or a new one) never leaves stale classes, styles or plugin
//! listeners behind. Dropping the last handle releases every plugin through
//! [`Plugin::release`] and strips every managed class and style, without
//! emitting events.
//!
//! # Slide ordering
//!
//! `slide` emits `slide:before` before touching any child, reclassifies every
//! child, commits the new index, then emits `slide:after`. Listeners of
//! `slide:before` therefore read the old [`current_index`](Matrix::current_index)
//! and listeners of `slide:after` read the new one.
//!
//! # Reentrancy
//!
//! No internal borrow is held while listeners or plugin hooks run, so a
//! listener may navigate, toggle classes or emit events on the same matrix.
//! Listeners that need the matrix should capture a [`WeakMatrix`]; capturing a
//! [`Matrix`] inside its own listener table forms a reference cycle.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::element::{Document, Element, Root};
use crate::emitter::{Emitter, ListenerId};
use crate::error::{Error, Result};
use crate::event::{self, MatrixEvent};
use crate::html;
use crate::math;
use crate::options::{ClassNames, Options};
use crate::plugin::Plugin;

/// Inline style property managed when [`Options::handle_z_index`] is set.
const Z_INDEX: &str = "z-index";

/// A handle to a carousel instance.
pub struct Matrix<E: Element> {
    inner: Rc<MatrixInner<E>>,
}

/// A non-owning handle to a [`Matrix`].
pub struct WeakMatrix<E: Element> {
    inner: Weak<MatrixInner<E>>,
}

struct MatrixInner<E: Element> {
    document: Box<dyn Document<E>>,
    options: Options,
    classes: RefCell<ClassNames>,
    element: RefCell<Option<E>>,
    children: RefCell<Vec<E>>,
    current_index: Cell<isize>,
    plugins: RefCell<Vec<Rc<dyn Plugin<E>>>>,
    emitter: Emitter<MatrixEvent<E>>,
}

impl<E: Element> Clone for Matrix<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: Element> Clone for WeakMatrix<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<E: Element> PartialEq for Matrix<E> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E: Element> fmt::Debug for Matrix<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("element", &self.inner.element.borrow())
            .field("child_count", &self.inner.children.borrow().len())
            .field("current_index", &self.inner.current_index.get())
            .field("options", &self.inner.options)
            .field("plugins", &self.inner.plugins.borrow().len())
            .field("emitter", &self.inner.emitter)
            .finish_non_exhaustive()
    }
}

impl<E: Element> fmt::Debug for WeakMatrix<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakMatrix")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<E: Element> WeakMatrix<E> {
    /// Returns the matrix if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Matrix<E>> {
        self.inner.upgrade().map(|inner| Matrix { inner })
    }
}

impl<E: Element> Matrix<E> {
    /// Creates an uninitialized matrix.
    ///
    /// `document` resolves selector roots passed to
    /// [`initialize`](Self::initialize). `plugins` are attached on every
    /// initialize, in order.
    pub fn create(
        document: impl Document<E> + 'static,
        options: Options,
        plugins: Vec<Rc<dyn Plugin<E>>>,
    ) -> Self {
        let classes = ClassNames::resolve(&options);
        let starting_index = options.starting_index;
        Self {
            inner: Rc::new(MatrixInner {
                document: Box::new(document),
                options,
                classes: RefCell::new(classes),
                element: RefCell::new(None),
                children: RefCell::new(Vec::new()),
                current_index: Cell::new(starting_index),
                plugins: RefCell::new(plugins),
                emitter: Emitter::new(),
            }),
        }
    }

    /// Creates a matrix and initializes it on `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoot`] if `root` resolves to no element.
    pub fn new(
        document: impl Document<E> + 'static,
        root: impl Into<Root<E>>,
        options: Options,
        plugins: Vec<Rc<dyn Plugin<E>>>,
    ) -> Result<Self> {
        let matrix = Self::create(document, options, plugins);
        matrix.initialize(root)?;
        Ok(matrix)
    }

    /// Returns a non-owning handle to this matrix.
    #[must_use]
    pub fn downgrade(&self) -> WeakMatrix<E> {
        WeakMatrix {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Binds the matrix to `root` and classifies its children.
    ///
    /// Runs [`destroy`](Self::destroy) first. On success the root carries the
    /// `element` class (and `infinite` in infinite mode), every child carries
    /// the `child` class, plugins are attached, the current slide is applied
    /// and `init` is emitted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoot`] if `root` resolves to no element. The
    /// matrix is then left destroyed.
    pub fn initialize(&self, root: impl Into<Root<E>>) -> Result<()> {
        let root = root.into();
        self.destroy();

        let Some(element) = root.resolve(&*self.inner.document) else {
            tracing::warn!(selector = ?root.selector(), "matrix root resolved to no element");
            return Err(Error::InvalidRoot {
                selector: root.selector().map(String::from),
            });
        };

        let options = &self.inner.options;
        let classes = ClassNames::resolve(options);
        let children = element.children(options.children_selector.as_deref());

        for child in &children {
            html::add_class(child, &classes.child);
        }
        html::add_class(&element, &classes.element);
        html::toggle_class(&element, &classes.infinite, options.infinite);

        let index = self.normalize(self.inner.current_index.get(), children.len());
        self.inner.current_index.set(index);
        *self.inner.classes.borrow_mut() = classes;
        *self.inner.element.borrow_mut() = Some(element.clone());
        *self.inner.children.borrow_mut() = children.clone();

        for plugin in self.plugins() {
            plugin.attach(self);
        }

        // A plugin may already have moved the matrix from `on_init`.
        self.slide(self.inner.current_index.get());

        tracing::debug!(
            children = children.len(),
            index = self.current_index(),
            "matrix initialized"
        );
        self.emit(
            event::INIT,
            &MatrixEvent::Lifecycle {
                root: Some(element),
                children,
            },
        );
        Ok(())
    }

    /// Undoes everything [`initialize`](Self::initialize) applied.
    ///
    /// Detaches plugins, strips every managed class from the root and the
    /// children, erases the managed `z-index`, emits `destroy` and releases
    /// the root and children. Idempotent: on a matrix that holds no root it
    /// does nothing and emits nothing.
    pub fn destroy(&self) {
        for plugin in self.plugins() {
            plugin.detach();
        }

        let root = self.inner.element.borrow().clone();
        if root.is_none() {
            return;
        }
        let children = self.inner.children.borrow().clone();
        self.inner.strip();

        tracing::debug!(children = children.len(), "matrix destroyed");
        self.emit(event::DESTROY, &MatrixEvent::Lifecycle { root, children });

        self.inner.element.borrow_mut().take();
        self.inner.children.borrow_mut().clear();
    }

    /// Makes the child at `index` current and reclassifies every child.
    ///
    /// `index` is wrapped into range when [`Options::wrap`] is set and clamped
    /// otherwise. Returns the new current child, or `None` if the matrix
    /// tracks no children (in which case nothing is emitted).
    pub fn slide(&self, index: isize) -> Option<E> {
        let children = self.inner.children.borrow().clone();
        if children.is_empty() {
            return None;
        }

        let count = children.len();
        let count_i = to_isize(count);
        let index = self.normalize(index, count);
        let from = self.current_index();
        let to = usize::try_from(index).unwrap_or_default();

        let options = &self.inner.options;
        let adjacent_count = to_isize(options.adjacent_count.max(1));
        let distance_count = (count_i - 1) / 2;
        let index_count = distance_count + isize::from(count % 2 == 0);

        let payload = MatrixEvent::Slide { from, to, count };
        self.emit(event::SLIDE_BEFORE, &payload);

        let classes = self.inner.classes.borrow().clone();
        for (i, child) in children.iter().enumerate() {
            let mut distance = to_isize(i) - index;
            if options.infinite {
                if distance > distance_count {
                    distance -= count_i;
                } else if distance < -distance_count {
                    distance += count_i;
                }
            }

            if i == to {
                html::remove_classes(
                    child,
                    &[
                        classes.ahead.as_str(),
                        classes.behind.as_str(),
                        classes.beyond.as_str(),
                    ],
                );
                html::add_class(child, &classes.current);
            } else {
                html::remove_class(child, &classes.current);
                html::toggle_class(child, &classes.beyond, distance.abs() > adjacent_count);
                html::toggle_class(child, &classes.behind, distance < 0);
                html::toggle_class(child, &classes.ahead, distance > 0);
            }

            if options.handle_z_index {
                let z = index_count - distance.abs();
                html::set_style(child, Z_INDEX, Some(&z.to_string()));
            }
        }

        self.inner.current_index.set(index);
        tracing::trace!(from, to, count, "slide");
        self.emit(event::SLIDE_AFTER, &payload);

        children.get(to).cloned()
    }

    /// Slides by `delta` steps from the current index.
    pub fn inc(&self, delta: isize) -> Option<E> {
        self.slide(self.inner.current_index.get().saturating_add(delta))
    }

    /// Adds (`condition == true`) or removes `class_prefix + name` on the
    /// root element. A no-op while no root is bound.
    pub fn toggle_class(&self, name: &str, condition: bool) {
        let Some(root) = self.element() else {
            return;
        };
        let mut class = self.inner.options.class_prefix.clone();
        class.push_str(name);
        html::toggle_class(&root, &class, condition);
    }

    /// Adds a plugin. It is attached right away if the matrix is initialized,
    /// and on every later initialize.
    pub fn add_plugin(&self, plugin: Rc<dyn Plugin<E>>) {
        self.inner.plugins.borrow_mut().push(Rc::clone(&plugin));
        if self.is_initialized() {
            plugin.attach(self);
        }
    }

    /// Returns the registered plugins.
    #[must_use]
    pub fn plugins(&self) -> Vec<Rc<dyn Plugin<E>>> {
        self.inner.plugins.borrow().clone()
    }

    // -- Events --

    /// Registers `callback` for `event`.
    pub fn on(&self, event: &str, callback: impl Fn(&MatrixEvent<E>) + 'static) -> ListenerId {
        self.inner.emitter.on(event, callback)
    }

    /// Registers `callback` for the next occurrence of `event` only.
    pub fn once(&self, event: &str, callback: impl Fn(&MatrixEvent<E>) + 'static) -> ListenerId {
        self.inner.emitter.once(event, callback)
    }

    /// Removes listener `id` from `event`. Returns `true` if it was found.
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        self.inner.emitter.off(event, id)
    }

    /// Removes every listener of `event`.
    pub fn off_event(&self, event: &str) {
        self.inner.emitter.off_event(event);
    }

    /// Removes every listener.
    pub fn off_all(&self) {
        self.inner.emitter.off_all();
    }

    /// Emits `event` to its listeners.
    pub fn emit(&self, event: &str, args: &MatrixEvent<E>) {
        self.inner.emitter.emit(event, args);
    }

    /// Returns the number of listeners for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.emitter.listener_count(event)
    }

    /// Returns `true` if anything listens to `event`.
    #[must_use]
    pub fn has_listeners(&self, event: &str) -> bool {
        self.inner.emitter.has_listeners(event)
    }

    // -- Accessors --

    /// Returns the bound root element.
    #[must_use]
    pub fn element(&self) -> Option<E> {
        self.inner.element.borrow().clone()
    }

    /// Returns the tracked children, in index order.
    #[must_use]
    pub fn children(&self) -> Vec<E> {
        self.inner.children.borrow().clone()
    }

    /// Returns the number of tracked children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.inner.children.borrow().len()
    }

    /// Returns the current index. Meaningless while no children are tracked.
    #[must_use]
    pub fn current_index(&self) -> usize {
        usize::try_from(self.inner.current_index.get()).unwrap_or_default()
    }

    /// Returns the current child.
    #[must_use]
    pub fn current(&self) -> Option<E> {
        self.inner.children.borrow().get(self.current_index()).cloned()
    }

    /// Returns the resolved options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    /// Returns the class strings in use.
    #[must_use]
    pub fn class_names(&self) -> ClassNames {
        self.inner.classes.borrow().clone()
    }

    /// Returns `true` while a root is bound.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.element.borrow().is_some()
    }

    fn normalize(&self, index: isize, count: usize) -> isize {
        let count = to_isize(count);
        if self.inner.options.wrap {
            math::wrap(index, 0, count)
        } else {
            math::clamp(index, 0, count - 1)
        }
    }
}

impl<E: Element> MatrixInner<E> {
    /// Removes every managed class and style from the root and children.
    fn strip(&self) {
        let classes = self.classes.borrow();
        if let Some(root) = self.element.borrow().as_ref() {
            html::remove_classes(root, &[classes.element.as_str(), classes.infinite.as_str()]);
        }
        for child in self.children.borrow().iter() {
            html::remove_classes(
                child,
                &[
                    classes.child.as_str(),
                    classes.current.as_str(),
                    classes.beyond.as_str(),
                    classes.behind.as_str(),
                    classes.ahead.as_str(),
                ],
            );
            html::set_style(child, Z_INDEX, None);
        }
    }
}

impl<E: Element> Drop for MatrixInner<E> {
    fn drop(&mut self) {
        let root = self.element.get_mut().clone();
        if root.is_some() {
            let plugins = self.plugins.get_mut().clone();
            for plugin in plugins {
                plugin.release(root.as_ref(), &self.options.class_prefix);
            }
        }
        self.strip();
    }
}

fn to_isize(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}
