// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in plugins.
//!
//! Both plugins are independent consumers of the [`Matrix`](crate::Matrix)
//! public API; the core never refers to them.

pub mod autoplay;
pub mod touch_swipe;

pub use autoplay::{Autoplay, AutoplayOptions};
pub use touch_swipe::{TouchSwipe, TouchSwipeOptions};
