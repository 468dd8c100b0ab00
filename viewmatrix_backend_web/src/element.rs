// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM element and document adapters.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use viewmatrix_core::{Document, Element};

/// A [`web_sys::Element`] exposed as a matrix [`Element`].
#[derive(Clone, Debug, PartialEq)]
pub struct DomElement(web_sys::Element);

impl DomElement {
    /// Wraps `element`.
    #[must_use]
    pub fn new(element: web_sys::Element) -> Self {
        Self(element)
    }

    /// Returns the wrapped element.
    #[must_use]
    pub fn as_element(&self) -> &web_sys::Element {
        &self.0
    }

    fn set_or_remove(&self, name: &str, value: &str) {
        if value.is_empty() {
            let _ = self.0.remove_attribute(name);
        } else {
            let _ = self.0.set_attribute(name, value);
        }
    }
}

impl From<web_sys::Element> for DomElement {
    fn from(element: web_sys::Element) -> Self {
        Self(element)
    }
}

impl Element for DomElement {
    fn class_attribute(&self) -> String {
        self.0.get_attribute("class").unwrap_or_default()
    }

    fn set_class_attribute(&self, value: &str) {
        self.set_or_remove("class", value);
    }

    fn style_attribute(&self) -> String {
        self.0.get_attribute("style").unwrap_or_default()
    }

    fn set_style_attribute(&self, value: &str) {
        self.set_or_remove("style", value);
    }

    fn children(&self, selector: Option<&str>) -> Vec<Self> {
        let list = self.0.children();
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter(|el| selector.is_none_or(|s| el.matches(s).unwrap_or(false)))
            .map(Self)
            .collect()
    }

    /// Bounds relative to the document body, so they line up with the
    /// `pageX`/`pageY` coordinates pointer events carry.
    fn bounds(&self) -> Rect {
        let client = client_rect(&self.0.get_bounding_client_rect());
        let body_origin = self
            .0
            .owner_document()
            .and_then(|doc| doc.body())
            .map(|body| client_rect(&body.get_bounding_client_rect()).origin())
            .unwrap_or(Point::ZERO);
        page_rect(client, body_origin)
    }
}

/// The page's [`web_sys::Document`] exposed as a matrix [`Document`].
#[derive(Clone, Debug)]
pub struct WebDocument(web_sys::Document);

impl WebDocument {
    /// Wraps `document`.
    #[must_use]
    pub fn new(document: web_sys::Document) -> Self {
        Self(document)
    }

    /// Returns the global `window.document`, if any.
    #[must_use]
    pub fn global() -> Option<Self> {
        web_sys::window()?.document().map(Self)
    }

    /// Returns the wrapped document.
    #[must_use]
    pub fn as_document(&self) -> &web_sys::Document {
        &self.0
    }
}

impl Document<DomElement> for WebDocument {
    fn query_selector(&self, selector: &str) -> Option<DomElement> {
        self.0.query_selector(selector).ok().flatten().map(DomElement)
    }
}

fn client_rect(rect: &web_sys::DomRect) -> Rect {
    Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
}

/// Translates a viewport rect into page space given the body's viewport
/// origin.
fn page_rect(client: Rect, body_origin: Point) -> Rect {
    client - body_origin.to_vec2()
}
