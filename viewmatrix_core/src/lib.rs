// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Carousel state machine, event bus and plugin contract for slide matrices.
//!
//! `viewmatrix_core` manages a set of sibling elements as a logical carousel.
//! It tracks a current index, tags every element with a positional class
//! (current, ahead, behind, beyond), optionally manages stacking order, and
//! emits lifecycle and navigation events that plugins attach to. It is
//! `no_std` compatible (with `alloc`); everything platform specific is reached
//! through small capability traits.
//!
//! # Architecture
//!
//! ```text
//!   Document ──► Root ──► Matrix::initialize()
//!                              │ snapshot children, apply classes
//!                              ▼
//!   Plugin::attach() ◄── on_init hooks
//!        │
//!        │ inc / slide / toggle_class / emit
//!        ▼
//!   Matrix::slide() ──► slide:before ──► classify children ──► slide:after
//!                                              │
//!                                              ▼
//!                                  Element (class + style strings)
//! ```
//!
//! **[`matrix`]**: The [`Matrix`] handle: element list, current index and the
//! initialize / slide / destroy transitions.
//!
//! **[`emitter`]**: Synchronous, snapshot-on-emit observer table keyed by
//! event name.
//!
//! **[`event`]**: Event names and the [`MatrixEvent`] payload.
//!
//! **[`plugin`]**: The [`Plugin`] contract and the [`PluginBinding`]
//! back-reference every plugin embeds.
//!
//! **[`plugins`]**: Autoplay and touch-swipe plugins.
//!
//! **[`element`]** and **[`html`]**: The element capability and the
//! class/style string utilities built on top of it.
//!
//! **[`host`]**: Interval timer and pointer input capabilities consumed by
//! plugins.
//!
//! **[`headless`]**: An in-memory host implementing every capability, used
//! by tests and by non-browser embedders.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod element;
pub mod emitter;
pub mod error;
pub mod event;
pub mod headless;
pub mod host;
pub mod html;
pub mod math;
pub mod matrix;
pub mod options;
pub mod plugin;
pub mod plugins;
pub mod point;

pub use element::{Document, Element, Root};
pub use error::{Error, Result};
pub use event::MatrixEvent;
pub use matrix::{Matrix, WeakMatrix};
pub use options::{ClassAliases, ClassNames, Options, OptionsOverrides};
pub use plugin::{Plugin, PluginBinding};
