// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer geometry.
//!
//! Coordinates are [`kurbo`] values in page space: [`Point`] for positions,
//! [`Vec2`] for differences between them, [`Rect`] for element bounds.

pub use kurbo::{Point, Rect, Vec2};

/// Returns the drag vector of a gesture, `start - last`.
///
/// A pointer moving left or up produces positive components, matching the
/// "next slide" direction of a swipe.
#[must_use]
pub fn drag_delta(start: Point, last: Point) -> Vec2 {
    start - last
}

/// Returns `true` if `point` lies inside `bounds`, edges included.
#[must_use]
pub fn in_bounds(bounds: Rect, point: Point) -> bool {
    point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
}
