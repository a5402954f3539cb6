// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic-bezier timing curves for overlay animations.

use kurbo::{CubicBez, ParamCurve, Point};

/// A CSS-style timing function: a cubic bezier from `(0, 0)` to `(1, 1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Easing(CubicBez);

impl Easing {
    /// `cubic-bezier(0.42, 0, 0.58, 1)`.
    pub const EASE_IN_OUT: Self = Self::new(0.42, 0.0, 0.58, 1.0);
    /// `cubic-bezier(0, 0, 0.58, 1)`.
    pub const EASE_OUT: Self = Self::new(0.0, 0.0, 0.58, 1.0);
    /// The identity curve.
    pub const LINEAR: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Build a timing function from its two control points.
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self(CubicBez {
            p0: Point::new(0.0, 0.0),
            p1: Point::new(x1, y1),
            p2: Point::new(x2, y2),
            p3: Point::new(1.0, 1.0),
        })
    }

    /// Progress at time fraction `t`, with `t` clamped to `[0, 1]`.
    ///
    /// Solves the curve for `x == t` by bisection; control points with
    /// `x` in `[0, 1]` keep `x(t)` monotonic.
    #[must_use]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.max(0.0).min(1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let (mut lo, mut hi) = (0.0, 1.0);
        for _ in 0..40 {
            let mid = 0.5 * (lo + hi);
            if self.0.eval(mid).x < t {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        self.0.eval(0.5 * (lo + hi)).y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn endpoints_are_fixed() {
        for easing in [Easing::EASE_IN_OUT, Easing::EASE_OUT, Easing::LINEAR] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-2.0), 0.0);
            assert_eq!(easing.apply(3.0), 1.0);
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        assert!(close(Easing::EASE_IN_OUT.apply(0.5), 0.5));
        let a = Easing::EASE_IN_OUT.apply(0.2);
        let b = Easing::EASE_IN_OUT.apply(0.8);
        assert!(close(a + b, 1.0), "{a} + {b}");
        assert!(a < 0.2, "slow start expected, got {a}");
    }

    #[test]
    fn linear_is_identity() {
        for t in [0.1, 0.25, 0.5, 0.9] {
            assert!(close(Easing::LINEAR.apply(t), t));
        }
    }

    #[test]
    fn ease_out_is_ahead_of_linear() {
        assert!(Easing::EASE_OUT.apply(0.3) > 0.3);
    }
}
