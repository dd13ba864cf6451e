// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cubic bezier easing with adjustable control points.

use super::Easing;
use crate::error::TrackError;

/// Bisection steps used to invert `x(s)`
const SOLVE_ITERATIONS: usize = 40;

/// Registry key of [`CubicBezierEasing`]
pub const CUBIC_BEZIER_KEY: &str = "CubicBezier";

/// Easing along a cubic bezier from `(0, 0)` to `(1, 1)`.
///
/// The two inner control points are `(x1, y1)` and `(x2, y2)`. The `x`
/// coordinates must stay in `0..=1` so the curve is a function of time;
/// the `y` coordinates may overshoot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezierEasing {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezierEasing {
    /// Create a bezier easing, rejecting control points outside `0..=1` on x
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, TrackError> {
        for x in [x1, x2] {
            if !(0.0..=1.0).contains(&x) {
                return Err(TrackError::InvalidMetadata(format!(
                    "bezier x control {x} is outside 0..=1"
                )));
            }
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Control points as `[x1, y1, x2, y2]`
    pub fn control_points(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Curve parameter `s` where `x(s) == progress`
    fn solve(&self, progress: f32) -> f32 {
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        let mut s = 0.5;
        for _ in 0..SOLVE_ITERATIONS {
            s = 0.5 * (lo + hi);
            if bezier(s, self.x1, self.x2) < progress {
                lo = s;
            } else {
                hi = s;
            }
        }
        s
    }
}

impl Default for CubicBezierEasing {
    fn default() -> Self {
        Self {
            x1: 0.25,
            y1: 0.1,
            x2: 0.25,
            y2: 1.0,
        }
    }
}

/// One coordinate of the bezier with fixed end points 0 and 1
fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - s;
    3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
}

impl Easing for CubicBezierEasing {
    fn key(&self) -> &str {
        CUBIC_BEZIER_KEY
    }

    fn interpolate(&self, elapsed: f32, duration: f32, start: f32, end: f32) -> f32 {
        let progress = (elapsed / duration).clamp(0.0, 1.0);
        if progress == 0.0 {
            return start;
        }
        if progress == 1.0 {
            return end;
        }
        let s = self.solve(progress);
        start + (end - start) * bezier(s, self.y1, self.y2)
    }

    fn parameters(&self) -> Vec<f32> {
        self.control_points().to_vec()
    }

    fn restore(&mut self, parameters: &[f32]) -> Result<(), TrackError> {
        let &[x1, y1, x2, y2] = parameters else {
            return Err(TrackError::InvalidMetadata(format!(
                "bezier easing expects 4 parameters, got {}",
                parameters.len()
            )));
        };
        *self = Self::new(x1, y1, x2, y2)?;
        Ok(())
    }
}
