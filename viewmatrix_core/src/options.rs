// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Matrix configuration.
//!
//! [`Options`] is the resolved configuration a matrix runs with; every field
//! is concrete and [`Default`] gives the documented defaults.
//! [`OptionsOverrides`] holds caller-supplied values, each optional, and
//! [`Options::merged`] applies them on top of a base. Loosely-typed
//! configuration (for example an object handed over from a page script) goes
//! through [`OptionsOverrides::from_json`], which drops every field whose JSON
//! type does not match so that it falls back to the default.

use alloc::string::String;

use serde_json::{Map, Value};

/// Per-role class name suffixes. The emitted class is `prefix + alias`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassAliases {
    /// Applied to the root element.
    pub element: String,
    /// Applied to the root element in infinite mode.
    pub infinite: String,
    /// Applied to every tracked child.
    pub child: String,
    /// Applied to the current child.
    pub current: String,
    /// Applied to children before the current one.
    pub behind: String,
    /// Applied to children after the current one.
    pub ahead: String,
    /// Applied to children further than `adjacent_count` from the current one.
    pub beyond: String,
}

impl Default for ClassAliases {
    fn default() -> Self {
        Self {
            element: "element".into(),
            infinite: "infinite".into(),
            child: "child".into(),
            current: "current".into(),
            behind: "behind".into(),
            ahead: "ahead".into(),
            beyond: "beyond".into(),
        }
    }
}

/// Optional replacements for individual [`ClassAliases`] entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassAliasOverrides {
    /// Replaces [`ClassAliases::element`].
    pub element: Option<String>,
    /// Replaces [`ClassAliases::infinite`].
    pub infinite: Option<String>,
    /// Replaces [`ClassAliases::child`].
    pub child: Option<String>,
    /// Replaces [`ClassAliases::current`].
    pub current: Option<String>,
    /// Replaces [`ClassAliases::behind`].
    pub behind: Option<String>,
    /// Replaces [`ClassAliases::ahead`].
    pub ahead: Option<String>,
    /// Replaces [`ClassAliases::beyond`].
    pub beyond: Option<String>,
}

impl ClassAliases {
    /// Returns a copy with every `Some` entry of `overrides` applied.
    #[must_use]
    pub fn merged(&self, overrides: &ClassAliasOverrides) -> Self {
        let pick = |base: &String, o: &Option<String>| o.clone().unwrap_or_else(|| base.clone());
        Self {
            element: pick(&self.element, &overrides.element),
            infinite: pick(&self.infinite, &overrides.infinite),
            child: pick(&self.child, &overrides.child),
            current: pick(&self.current, &overrides.current),
            behind: pick(&self.behind, &overrides.behind),
            ahead: pick(&self.ahead, &overrides.ahead),
            beyond: pick(&self.beyond, &overrides.beyond),
        }
    }
}

impl ClassAliasOverrides {
    /// Reads string-valued entries from a JSON object.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            element: json_string(obj, "element"),
            infinite: json_string(obj, "infinite"),
            child: json_string(obj, "child"),
            current: json_string(obj, "current"),
            behind: json_string(obj, "behind"),
            ahead: json_string(obj, "ahead"),
            beyond: json_string(obj, "beyond"),
        }
    }
}

/// Resolved matrix configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Number of index steps on either side of the current child that still
    /// count as adjacent. Values below 1 are treated as 1.
    pub adjacent_count: usize,
    /// Restricts tracked children to direct children matching this selector.
    pub children_selector: Option<String>,
    /// Class name suffixes per role.
    pub class_aliases: ClassAliases,
    /// Prefix applied to every generated class name.
    pub class_prefix: String,
    /// Whether the matrix writes an inline `z-index` on each child.
    pub handle_z_index: bool,
    /// Treats the children as a ring when measuring distances.
    pub infinite: bool,
    /// Index requested before the first initialize; normalized on use.
    pub starting_index: isize,
    /// Out-of-range indices wrap around when `true` and clamp when `false`.
    pub wrap: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            adjacent_count: 1,
            children_selector: None,
            class_aliases: ClassAliases::default(),
            class_prefix: "vm-".into(),
            handle_z_index: true,
            infinite: false,
            starting_index: 0,
            wrap: true,
        }
    }
}

impl Options {
    /// Returns a copy with every `Some` field of `overrides` applied.
    #[must_use]
    pub fn merged(&self, overrides: &OptionsOverrides) -> Self {
        Self {
            adjacent_count: overrides.adjacent_count.unwrap_or(self.adjacent_count),
            children_selector: overrides
                .children_selector
                .clone()
                .or_else(|| self.children_selector.clone()),
            class_aliases: self.class_aliases.merged(&overrides.class_aliases),
            class_prefix: overrides
                .class_prefix
                .clone()
                .unwrap_or_else(|| self.class_prefix.clone()),
            handle_z_index: overrides.handle_z_index.unwrap_or(self.handle_z_index),
            infinite: overrides.infinite.unwrap_or(self.infinite),
            starting_index: overrides.starting_index.unwrap_or(self.starting_index),
            wrap: overrides.wrap.unwrap_or(self.wrap),
        }
    }
}

impl From<&OptionsOverrides> for Options {
    fn from(overrides: &OptionsOverrides) -> Self {
        Self::default().merged(overrides)
    }
}

/// Caller-supplied configuration; `None` keeps the base value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionsOverrides {
    /// Overrides [`Options::adjacent_count`].
    pub adjacent_count: Option<usize>,
    /// Overrides [`Options::children_selector`].
    pub children_selector: Option<String>,
    /// Overrides entries of [`Options::class_aliases`].
    pub class_aliases: ClassAliasOverrides,
    /// Overrides [`Options::class_prefix`].
    pub class_prefix: Option<String>,
    /// Overrides [`Options::handle_z_index`].
    pub handle_z_index: Option<bool>,
    /// Overrides [`Options::infinite`].
    pub infinite: Option<bool>,
    /// Overrides [`Options::starting_index`].
    pub starting_index: Option<isize>,
    /// Overrides [`Options::wrap`].
    pub wrap: Option<bool>,
}

impl OptionsOverrides {
    /// Reads overrides from a JSON object with camel-case keys
    /// (`adjacentCount`, `childrenSelector`, `classAliases`, `classPrefix`,
    /// `handleZIndex`, `infinite`, `startingIndex`, `wrap`).
    ///
    /// Unknown keys are ignored. A key whose value has the wrong type is
    /// treated as absent; so is a non-object `value`.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            adjacent_count: json_usize(obj, "adjacentCount"),
            children_selector: json_string(obj, "childrenSelector"),
            class_aliases: obj
                .get("classAliases")
                .map(ClassAliasOverrides::from_json)
                .unwrap_or_default(),
            class_prefix: json_string(obj, "classPrefix"),
            handle_z_index: json_bool(obj, "handleZIndex"),
            infinite: json_bool(obj, "infinite"),
            starting_index: obj
                .get("startingIndex")
                .and_then(Value::as_i64)
                .and_then(|n| isize::try_from(n).ok()),
            wrap: json_bool(obj, "wrap"),
        }
    }
}

/// The literal class strings a matrix applies, derived from the prefix and
/// aliases of its [`Options`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassNames {
    /// Root element class.
    pub element: String,
    /// Root element class in infinite mode.
    pub infinite: String,
    /// Tracked child class.
    pub child: String,
    /// Current child class.
    pub current: String,
    /// Class of children before the current one.
    pub behind: String,
    /// Class of children after the current one.
    pub ahead: String,
    /// Class of children outside the adjacent window.
    pub beyond: String,
}

impl ClassNames {
    /// Prefixes every alias of `options` with its class prefix.
    #[must_use]
    pub fn resolve(options: &Options) -> Self {
        let prefix = options.class_prefix.as_str();
        let aliases = &options.class_aliases;
        let join = |alias: &str| {
            let mut s = String::with_capacity(prefix.len() + alias.len());
            s.push_str(prefix);
            s.push_str(alias);
            s
        };
        Self {
            element: join(&aliases.element),
            infinite: join(&aliases.infinite),
            child: join(&aliases.child),
            current: join(&aliases.current),
            behind: join(&aliases.behind),
            ahead: join(&aliases.ahead),
            beyond: join(&aliases.beyond),
        }
    }
}

pub(crate) fn json_bool(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

pub(crate) fn json_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(String::from)
}

pub(crate) fn json_usize(obj: &Map<String, Value>, key: &str) -> Option<usize> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

pub(crate) fn json_i64(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    obj.get(key).and_then(Value::as_i64)
}

pub(crate) fn json_f64(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_documentation() {
        let o = Options::default();
        assert_eq!(o.adjacent_count, 1);
        assert_eq!(o.class_prefix, "vm-");
        assert!(o.handle_z_index, "z-index handled by default");
        assert!(!o.infinite, "finite by default");
        assert!(o.wrap, "wraps by default");
        assert_eq!(o.starting_index, 0);
        assert_eq!(o.children_selector, None);
    }

    #[test]
    fn merged_applies_only_present_fields() {
        let overrides = OptionsOverrides {
            infinite: Some(true),
            class_aliases: ClassAliasOverrides {
                current: Some("active".into()),
                ..ClassAliasOverrides::default()
            },
            ..OptionsOverrides::default()
        };
        let o = Options::from(&overrides);
        assert!(o.infinite, "override applied");
        assert!(o.wrap, "default kept");
        assert_eq!(o.class_aliases.current, "active");
        assert_eq!(o.class_aliases.ahead, "ahead");
    }

    #[test]
    fn from_json_drops_mistyped_fields() {
        let v = json!({
            "adjacentCount": "two",
            "classPrefix": "cs-",
            "handleZIndex": 0,
            "infinite": true,
            "startingIndex": -2,
            "wrap": "yes",
            "classAliases": { "current": "on", "ahead": 5 },
            "unknown": 1
        });
        let o = Options::from(&OptionsOverrides::from_json(&v));
        assert_eq!(o.adjacent_count, 1);
        assert_eq!(o.class_prefix, "cs-");
        assert!(o.handle_z_index, "mistyped bool falls back");
        assert!(o.infinite, "well-typed bool applied");
        assert_eq!(o.starting_index, -2);
        assert!(o.wrap, "mistyped bool falls back");
        assert_eq!(o.class_aliases.current, "on");
        assert_eq!(o.class_aliases.ahead, "ahead");
    }

    #[test]
    fn from_json_rejects_negative_adjacent_count() {
        let v = json!({ "adjacentCount": -3 });
        assert_eq!(OptionsOverrides::from_json(&v).adjacent_count, None);
    }

    #[test]
    fn from_json_non_object_is_empty() {
        assert_eq!(
            OptionsOverrides::from_json(&json!([1, 2])),
            OptionsOverrides::default()
        );
    }

    #[test]
    fn class_names_prefix_aliases() {
        let names = ClassNames::resolve(&Options::default());
        assert_eq!(names.element, "vm-element");
        assert_eq!(names.current, "vm-current");
        assert_eq!(names.beyond, "vm-beyond");
    }
}
