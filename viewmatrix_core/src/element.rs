// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element capability contract.
//!
//! The matrix never talks to a concrete DOM. It consumes two capabilities:
//!
//! - **[`Element`]**: a cheap, clonable handle to one node in a DOM-like tree
//!   that exposes its raw `class` and `style` attribute strings, its direct
//!   children and its page-space bounds.
//! - **[`Document`]**: resolves a selector string to the first matching
//!   element.
//!
//! Higher-level class and style manipulation lives in [`html`](crate::html)
//! and is written once on top of these primitives. Backends (the web backend,
//! the [`headless`](crate::headless) host) only implement the raw accessors.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::point::Rect;

/// A handle to one element of a DOM-like tree.
///
/// Handles are compared with `==` to mean "the same node", and cloning a
/// handle must not clone the node.
pub trait Element: Clone + PartialEq + fmt::Debug + 'static {
    /// Returns the raw `class` attribute, or an empty string if absent.
    fn class_attribute(&self) -> String;

    /// Replaces the `class` attribute. An empty value removes the attribute.
    fn set_class_attribute(&self, value: &str);

    /// Returns the raw inline `style` attribute, or an empty string if absent.
    fn style_attribute(&self) -> String;

    /// Replaces the inline `style` attribute. An empty value removes the
    /// attribute.
    fn set_style_attribute(&self, value: &str);

    /// Returns the direct element children in document order.
    ///
    /// When `selector` is given, only children matching it are returned
    /// (`:scope > selector` semantics).
    fn children(&self, selector: Option<&str>) -> Vec<Self>;

    /// Returns the element's bounds in page coordinates.
    fn bounds(&self) -> Rect;
}

/// Resolves selectors to elements.
pub trait Document<E: Element> {
    /// Returns the first element matching `selector`, if any.
    fn query_selector(&self, selector: &str) -> Option<E>;
}

/// What a matrix should bind to: a selector to resolve, or an element.
#[derive(Clone, Debug, PartialEq)]
pub enum Root<E> {
    /// Resolve through [`Document::query_selector`].
    Selector(String),
    /// Use this element directly.
    Element(E),
}

impl<E: Element> Root<E> {
    /// Resolves the root against `document`.
    pub fn resolve(&self, document: &dyn Document<E>) -> Option<E> {
        match self {
            Self::Selector(selector) => document.query_selector(selector),
            Self::Element(element) => Some(element.clone()),
        }
    }

    /// Returns the selector string, if this root is a selector.
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::Selector(selector) => Some(selector.as_str()),
            Self::Element(_) => None,
        }
    }
}

impl<E> From<&str> for Root<E> {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.into())
    }
}

impl<E> From<String> for Root<E> {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}
