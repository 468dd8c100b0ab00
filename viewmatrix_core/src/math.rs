// Copyright 2026 the ViewMatrix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index normalization helpers.

/// Wraps `value` into the half-open range `[min, max)`.
///
/// The result is congruent to `value` modulo `max - min`. An empty range
/// (`max <= min`) yields `min`.
#[must_use]
pub fn wrap(value: isize, min: isize, max: isize) -> isize {
    if max <= min {
        return min;
    }
    min + (value - min).rem_euclid(max - min)
}

/// Clamps `value` into the closed range `[min, max]`.
///
/// An inverted range (`max < min`) yields `min`.
#[must_use]
pub fn clamp(value: isize, min: isize, max: isize) -> isize {
    if max < min {
        return min;
    }
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_stays_in_range_and_is_congruent() {
        for n in 1..=7_isize {
            for i in -20..=20_isize {
                let w = wrap(i, 0, n);
                assert!((0..n).contains(&w), "wrap({i}, 0, {n}) = {w}");
                assert_eq!((i - w).rem_euclid(n), 0, "wrap({i}, 0, {n}) not congruent");
            }
        }
    }

    #[test]
    fn wrap_negative_one_is_last() {
        assert_eq!(wrap(-1, 0, 5), 4);
        assert_eq!(wrap(5, 0, 5), 0);
        assert_eq!(wrap(12, 0, 5), 2);
    }

    #[test]
    fn wrap_empty_range_is_min() {
        assert_eq!(wrap(3, 0, 0), 0);
        assert_eq!(wrap(-3, 2, 1), 2);
    }

    #[test]
    fn clamp_saturates_and_preserves_in_range() {
        for n in 1..=7_isize {
            for i in -20..=20_isize {
                let c = clamp(i, 0, n - 1);
                assert!((0..n).contains(&c), "clamp({i}, 0, {}) = {c}", n - 1);
                if (0..n).contains(&i) {
                    assert_eq!(c, i, "in-range value changed");
                }
            }
        }
        assert_eq!(clamp(-1, 0, 4), 0);
        assert_eq!(clamp(9, 0, 4), 4);
    }

    #[test]
    fn clamp_inverted_range_is_min() {
        assert_eq!(clamp(5, 0, -1), 0);
    }
}
