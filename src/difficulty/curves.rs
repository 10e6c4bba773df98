//! Multiplier curves.
//!
//! Every curve maps a speed (or a note count) onto `[lower_bound, upper_bound]`
//! through an easing function of a normalized input `t` in `[0, 1]`.

use crate::config::{BoundedCurve, ClampedCurve};
use std::f64::consts::PI;

/// Input ceiling of the circle curves, in notes per second.
pub const CIRCLE_NPS_CEILING: f64 = 30.0;

/// Cubic smoothstep, `3t² - 2t³`.
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Quartic ease-in, `t⁴`.
pub fn ease_in_quart(t: f64) -> f64 {
    t.powi(4)
}

/// Cosine ease-in-out.
pub fn ease_in_out_cosine(t: f64) -> f64 {
    (1.0 - (PI * t).cos()) / 2.0
}

fn lerp(lower: f64, upper: f64, t: f64) -> f64 {
    lower + (upper - lower) * t
}

impl ClampedCurve {
    /// Position of `x` between the clamps, clamped to `[0, 1]`.
    pub fn normalize(&self, x: f64) -> f64 {
        let span = self.upper_clamp - self.lower_clamp;
        if span <= 0.0 {
            return if x >= self.upper_clamp { 1.0 } else { 0.0 };
        }
        ((x - self.lower_clamp) / span).clamp(0.0, 1.0)
    }

    /// Smoothstep between the bounds.
    pub fn smoothstep(&self, x: f64) -> f64 {
        lerp(self.lower_bound, self.upper_bound, smoothstep(self.normalize(x)))
    }

    /// Quartic ease-in between the bounds.
    pub fn ease_in(&self, x: f64) -> f64 {
        lerp(self.lower_bound, self.upper_bound, ease_in_quart(self.normalize(x)))
    }
}

impl BoundedCurve {
    /// Cosine ease-in-out over `nps / 30`.
    pub fn ease_in_out(&self, nps: f64) -> f64 {
        let t = (nps / CIRCLE_NPS_CEILING).clamp(0.0, 1.0);
        lerp(self.lower_bound, self.upper_bound, ease_in_out_cosine(t))
    }
}
