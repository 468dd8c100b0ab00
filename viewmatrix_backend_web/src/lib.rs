// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for viewmatrix.
//!
//! This crate implements the `viewmatrix_core` capabilities on top of the
//! browser's DOM:
//!
//! - [`DomElement`] / [`WebDocument`]: element and selector access
//! - [`WindowTimer`]: `setInterval`-based interval timer for autoplay
//! - [`DomPointerSource`]: touch and mouse listeners for touch-swipe

#![no_std]

extern crate alloc;

mod element;
mod pointer;
mod timer;

pub use element::{DomElement, WebDocument};
pub use pointer::DomPointerSource;
pub use timer::WindowTimer;

use alloc::rc::Rc;
use alloc::vec::Vec;

use viewmatrix_core::{Error, Matrix, Options, Plugin, Result};

/// Creates a matrix on the first element of the global document matching
/// `selector`.
///
/// # Errors
///
/// Returns [`Error::InvalidRoot`] if there is no global document or nothing
/// matches `selector`.
pub fn mount(
    selector: &str,
    options: Options,
    plugins: Vec<Rc<dyn Plugin<DomElement>>>,
) -> Result<Matrix<DomElement>> {
    let Some(document) = WebDocument::global() else {
        tracing::warn!("no global document; is this running in a browser?");
        return Err(Error::InvalidRoot {
            selector: Some(selector.into()),
        });
    };
    Matrix::new(document, selector, options, plugins)
}
