// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plugin contract.
//!
//! A plugin is built on its own, holding only its resolved options and the
//! host capabilities it needs, and is later handed to a
//! [`Matrix`](crate::Matrix). The matrix calls [`Plugin::attach`] every time
//! it initializes and [`Plugin::detach`] every time it is destroyed. A
//! matrix dropped while still bound calls [`Plugin::release`] instead.
//!
//! # Isolation
//!
//! A plugin talks to its matrix only through the matrix's public API:
//! navigation (`slide`, `inc`), `toggle_class`, the event methods (`on`,
//! `off`, `emit`) and the `element` accessor for geometry. It never reaches
//! into matrix state, and it never references another plugin. Plugins that
//! need to cooperate do so through events, which keeps them independently
//! addable, removable and reorderable.
//!
//! # Back-reference
//!
//! Every plugin embeds a [`PluginBinding`]. It holds a non-owning
//! [`WeakMatrix`] set on attach and cleared on detach, so a plugin never keeps
//! its matrix alive. Public plugin operations that need the matrix go through
//! [`PluginBinding::matrix`], which reports
//! [`Error::PluginNotAttached`] rather than silently doing nothing.

use core::cell::RefCell;
use core::fmt;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::matrix::{Matrix, WeakMatrix};

/// Non-owning link from a plugin to the matrix it is attached to.
pub struct PluginBinding<E: Element> {
    plugin: &'static str,
    owner: RefCell<Option<WeakMatrix<E>>>,
}

impl<E: Element> fmt::Debug for PluginBinding<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginBinding")
            .field("plugin", &self.plugin)
            .field("bound", &self.is_bound())
            .finish_non_exhaustive()
    }
}

impl<E: Element> PluginBinding<E> {
    /// Creates an unbound binding for a plugin named `plugin`.
    #[must_use]
    pub fn new(plugin: &'static str) -> Self {
        Self {
            plugin,
            owner: RefCell::new(None),
        }
    }

    /// Records `owner` as the attached matrix.
    pub fn bind(&self, owner: &Matrix<E>) {
        *self.owner.borrow_mut() = Some(owner.downgrade());
    }

    /// Clears the attached matrix.
    pub fn unbind(&self) {
        self.owner.borrow_mut().take();
    }

    /// Returns `true` if bound to a matrix that is still alive.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.owner().is_some()
    }

    /// Returns the attached matrix, if any.
    #[must_use]
    pub fn owner(&self) -> Option<Matrix<E>> {
        self.owner.borrow().as_ref().and_then(WeakMatrix::upgrade)
    }

    /// Returns the attached matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PluginNotAttached`] if the plugin is not attached or
    /// its matrix has been dropped.
    pub fn matrix(&self) -> Result<Matrix<E>> {
        self.owner().ok_or(Error::PluginNotAttached {
            plugin: self.plugin,
        })
    }
}

/// A behavior unit driven by a matrix's lifecycle.
pub trait Plugin<E: Element>: fmt::Debug {
    /// Returns the plugin's back-reference to its matrix.
    fn binding(&self) -> &PluginBinding<E>;

    /// Installs the plugin's listeners, timers and input subscriptions.
    fn on_init(&self, matrix: &Matrix<E>);

    /// Removes everything [`on_init`](Self::on_init) installed.
    ///
    /// The matrix still holds its root and children when this runs.
    fn on_destroy(&self, matrix: &Matrix<E>);

    /// Tears down what [`on_init`](Self::on_init) installed when the matrix
    /// is dropped while still bound.
    ///
    /// No matrix handle exists at that point and no events are emitted.
    /// `root` is the element the matrix was bound to and `class_prefix` its
    /// class prefix, so root classes can be removed directly.
    fn on_release(&self, _root: Option<&E>, _class_prefix: &str) {}

    /// Binds the plugin to `owner` and runs [`on_init`](Self::on_init).
    fn attach(&self, owner: &Matrix<E>) {
        self.binding().bind(owner);
        self.on_init(owner);
    }

    /// Runs [`on_destroy`](Self::on_destroy) and clears the binding.
    ///
    /// A no-op for a plugin that is not attached.
    fn detach(&self) {
        if let Some(owner) = self.binding().owner() {
            self.on_destroy(&owner);
        }
        self.binding().unbind();
    }

    /// Runs [`on_release`](Self::on_release) and clears the binding.
    fn release(&self, root: Option<&E>, class_prefix: &str) {
        self.on_release(root, class_prefix);
        self.binding().unbind();
    }
}
