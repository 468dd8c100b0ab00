// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class and inline-style utilities over the [`Element`] capability.
//!
//! Every mutation is idempotent: adding a class that is already present or
//! removing one that is absent leaves the attribute unchanged. Class strings
//! are treated as whitespace-separated token lists, and a `classes` argument
//! may itself hold several tokens.

use alloc::string::String;
use alloc::vec::Vec;

use crate::element::Element;
use crate::point::{Point, in_bounds};

/// Collapses runs of whitespace into single spaces and trims both ends.
#[must_use]
pub fn sanitize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns `true` if `el` carries the class token `class`.
pub fn has_class<E: Element>(el: &E, class: &str) -> bool {
    el.class_attribute().split_whitespace().any(|c| c == class)
}

/// Adds every token of `classes` that `el` does not already carry.
pub fn add_class<E: Element>(el: &E, classes: &str) {
    let current = el.class_attribute();
    let mut tokens: Vec<&str> = current.split_whitespace().collect();
    let before = tokens.len();
    for class in classes.split_whitespace() {
        if !tokens.contains(&class) {
            tokens.push(class);
        }
    }
    if tokens.len() != before {
        el.set_class_attribute(&tokens.join(" "));
    }
}

/// Removes every token of `classes` from `el`.
///
/// The `class` attribute is dropped entirely once no token is left.
pub fn remove_class<E: Element>(el: &E, classes: &str) {
    let list: Vec<&str> = classes.split_whitespace().collect();
    remove_classes(el, &list);
}

/// Removes each class in `classes` from `el`.
pub fn remove_classes<E: Element>(el: &E, classes: &[&str]) {
    let current = el.class_attribute();
    let tokens: Vec<&str> = current.split_whitespace().collect();
    let kept: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| !classes.iter().any(|c| c.split_whitespace().any(|c| c == *t)))
        .collect();
    if kept.len() != tokens.len() || current != kept.join(" ") {
        el.set_class_attribute(&kept.join(" "));
    }
}

/// Adds `classes` when `condition` holds, removes them otherwise.
///
/// Returns `condition`.
pub fn toggle_class<E: Element>(el: &E, classes: &str, condition: bool) -> bool {
    if condition {
        add_class(el, classes);
    } else {
        remove_class(el, classes);
    }
    condition
}

/// Sets (`Some`) or erases (`None`) the inline style property `name`.
///
/// Other declarations are preserved in order; the patched one moves to the
/// end. The `style` attribute is dropped once no declaration is left.
pub fn set_style<E: Element>(el: &E, name: &str, value: Option<&str>) {
    let current = el.style_attribute();
    let mut out = String::new();
    for decl in declarations(&current) {
        if decl.0 != name {
            push_declaration(&mut out, decl.0, decl.1);
        }
    }
    if let Some(value) = value {
        push_declaration(&mut out, name, value.trim());
    }
    if out != current {
        el.set_style_attribute(&out);
    }
}

/// Returns the inline value of style property `name`, if set.
pub fn style_value<E: Element>(el: &E, name: &str) -> Option<String> {
    let current = el.style_attribute();
    declarations(&current)
        .find(|(prop, _)| *prop == name)
        .map(|(_, value)| value.into())
}

/// Returns `true` if `point` lies inside the page-space bounds of `el`.
pub fn in_element_bounds<E: Element>(el: &E, point: Point) -> bool {
    in_bounds(el.bounds(), point)
}

/// Iterates `property: value` pairs of an inline style string.
fn declarations(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style.split(';').filter_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        let prop = prop.trim();
        (!prop.is_empty()).then(|| (prop, value.trim()))
    })
}

fn push_declaration(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push(':');
    out.push_str(value);
    out.push(';');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessElement;
    use crate::point::Rect;

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize("  a   b\t c  "), "a b c");
        assert_eq!(sanitize("   "), "");
    }

    #[test]
    fn add_class_is_idempotent() {
        let el = HeadlessElement::new("div");
        add_class(&el, "vm-child");
        add_class(&el, "vm-child");
        assert_eq!(el.class_attribute(), "vm-child");
        add_class(&el, "vm-current  vm-child");
        assert_eq!(el.class_attribute(), "vm-child vm-current");
    }

    #[test]
    fn remove_class_matches_whole_tokens() {
        let el = HeadlessElement::new("div");
        el.set_class_attribute("vm-current vm-current-extra");
        remove_class(&el, "vm-current");
        assert_eq!(el.class_attribute(), "vm-current-extra");
        assert!(!has_class(&el, "vm-current"), "token should be gone");
    }

    #[test]
    fn remove_last_class_drops_attribute() {
        let el = HeadlessElement::new("div");
        el.set_class_attribute("vm-child");
        remove_classes(&el, &["vm-child", "vm-ahead"]);
        assert!(!el.has_attribute("class"), "empty class attribute should be removed");
    }

    #[test]
    fn toggle_class_follows_condition() {
        let el = HeadlessElement::new("div");
        assert!(toggle_class(&el, "on", true), "returns the condition");
        assert!(has_class(&el, "on"), "added");
        assert!(!toggle_class(&el, "on", false), "returns the condition");
        assert!(!has_class(&el, "on"), "removed");
    }

    #[test]
    fn set_style_patches_and_erases() {
        let el = HeadlessElement::new("div");
        el.set_style_attribute("color: red; z-index: 3;");
        set_style(&el, "z-index", Some("5"));
        assert_eq!(el.style_attribute(), "color:red;z-index:5;");
        assert_eq!(style_value(&el, "z-index").as_deref(), Some("5"));

        set_style(&el, "z-index", None);
        assert_eq!(el.style_attribute(), "color:red;");
        set_style(&el, "color", None);
        assert!(!el.has_attribute("style"), "empty style attribute should be removed");
    }

    #[test]
    fn in_element_bounds_uses_page_rect() {
        let el = HeadlessElement::new("div");
        el.set_bounds(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert!(in_element_bounds(&el, Point::new(200.0, 100.0)), "edge counts");
        assert!(!in_element_bounds(&el, Point::new(201.0, 50.0)), "outside");
    }
}
