// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;

use thiserror::Error;

/// Result type for matrix and plugin operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced by the matrix and its plugins.
///
/// Configuration mistakes are never errors; mistyped or absent options fall
/// back to their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// `initialize` was given a root that resolves to no element.
    ///
    /// The matrix is left destroyed: no children are tracked and no classes
    /// are applied.
    #[error("no element matches root {}", .selector.as_deref().unwrap_or("<element>"))]
    InvalidRoot {
        /// The selector that failed to resolve, if the root was a selector.
        selector: Option<String>,
    },

    /// A plugin operation needs an attached matrix and the plugin has none.
    #[error("plugin `{plugin}` is not attached to a matrix")]
    PluginNotAttached {
        /// Name of the plugin type.
        plugin: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_culprit() {
        let e = Error::InvalidRoot {
            selector: Some(".carousel".into()),
        };
        assert_eq!(e.to_string(), "no element matches root .carousel");

        let e = Error::PluginNotAttached { plugin: "Autoplay" };
        assert_eq!(e.to_string(), "plugin `Autoplay` is not attached to a matrix");
    }
}
