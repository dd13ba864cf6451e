// SPDX-License-Identifier: MIT OR Apache-2.0
//! The classic easing curves.

use super::Easing;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// One of the built-in easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    /// Hold the start value
    None,
    /// Straight line
    Linear,
    /// Sine, slow start
    SineIn,
    /// Sine, slow end
    SineOut,
    /// Sine, slow at both ends
    SineInOut,
    /// Quadratic, accelerating
    QuadIn,
    /// Quadratic, decelerating
    QuadOut,
    /// Quadratic, accelerating then decelerating
    QuadInOut,
    /// Cubic, accelerating
    CubicIn,
    /// Cubic, decelerating
    CubicOut,
    /// Cubic, accelerating then decelerating
    CubicInOut,
    /// Quartic, accelerating
    QuartIn,
    /// Quartic, decelerating
    QuartOut,
    /// Quartic, accelerating then decelerating
    QuartInOut,
    /// Quintic, accelerating
    QuintIn,
    /// Quintic, decelerating
    QuintOut,
    /// Quintic, accelerating then decelerating
    QuintInOut,
    /// Exponential, accelerating
    ExpIn,
    /// Exponential, decelerating
    ExpOut,
    /// Exponential, accelerating then decelerating
    ExpInOut,
    /// Circular, accelerating
    CircIn,
    /// Circular, decelerating
    CircOut,
    /// Circular, accelerating then decelerating
    CircInOut,
    /// Pulls back before leaving the start
    BackIn,
    /// Overshoots the end, then settles
    BackOut,
    /// Pulls back at the start and overshoots the end
    BackInOut,
    /// Spring oscillation growing into the start
    ElasticIn,
    /// Spring oscillation settling on the end
    ElasticOut,
    /// Spring oscillation at both ends
    ElasticInOut,
    /// Bounces away from the start
    BounceIn,
    /// Bounces onto the end
    BounceOut,
    /// Bounces at both ends
    BounceInOut,
}

impl Curve {
    /// Every curve, in registration order
    pub const ALL: [Curve; 32] = [
        Curve::Linear,
        Curve::None,
        Curve::SineIn,
        Curve::SineOut,
        Curve::SineInOut,
        Curve::QuadIn,
        Curve::QuadOut,
        Curve::QuadInOut,
        Curve::CubicIn,
        Curve::CubicOut,
        Curve::CubicInOut,
        Curve::QuartIn,
        Curve::QuartOut,
        Curve::QuartInOut,
        Curve::QuintIn,
        Curve::QuintOut,
        Curve::QuintInOut,
        Curve::ExpIn,
        Curve::ExpOut,
        Curve::ExpInOut,
        Curve::CircIn,
        Curve::CircOut,
        Curve::CircInOut,
        Curve::BackIn,
        Curve::BackOut,
        Curve::BackInOut,
        Curve::ElasticIn,
        Curve::ElasticOut,
        Curve::ElasticInOut,
        Curve::BounceIn,
        Curve::BounceOut,
        Curve::BounceInOut,
    ];

    /// Registry key of this curve
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Linear => "Linear",
            Self::SineIn => "SineIn",
            Self::SineOut => "SineOut",
            Self::SineInOut => "SineInOut",
            Self::QuadIn => "QuadIn",
            Self::QuadOut => "QuadOut",
            Self::QuadInOut => "QuadInOut",
            Self::CubicIn => "CubicIn",
            Self::CubicOut => "CubicOut",
            Self::CubicInOut => "CubicInOut",
            Self::QuartIn => "QuartIn",
            Self::QuartOut => "QuartOut",
            Self::QuartInOut => "QuartInOut",
            Self::QuintIn => "QuintIn",
            Self::QuintOut => "QuintOut",
            Self::QuintInOut => "QuintInOut",
            Self::ExpIn => "ExpIn",
            Self::ExpOut => "ExpOut",
            Self::ExpInOut => "ExpInOut",
            Self::CircIn => "CircIn",
            Self::CircOut => "CircOut",
            Self::CircInOut => "CircInOut",
            Self::BackIn => "BackIn",
            Self::BackOut => "BackOut",
            Self::BackInOut => "BackInOut",
            Self::ElasticIn => "ElasticIn",
            Self::ElasticOut => "ElasticOut",
            Self::ElasticInOut => "ElasticInOut",
            Self::BounceIn => "BounceIn",
            Self::BounceOut => "BounceOut",
            Self::BounceInOut => "BounceInOut",
        }
    }

    /// Look a curve up by its key
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Evaluate the curve at `t` of `d` frames between `start` and `end`
    pub fn apply(&self, t: f32, d: f32, start: f32, end: f32) -> f32 {
        let c = end - start;

        match self {
            Self::None => start,
            Self::Linear => c * t / d + start,

            Self::SineIn => -c * (t * (PI / 2.0) / d).cos() + c + start,
            Self::SineOut => c * (t * (PI / 2.0) / d).sin() + start,
            Self::SineInOut => -c / 2.0 * ((t * PI / d).cos() - 1.0) + start,

            Self::QuadIn => {
                let t = t / d;
                c * t * t + start
            }
            Self::QuadOut => {
                let t = t / d;
                -c * t * (t - 2.0) + start
            }
            Self::QuadInOut => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t * t + start;
                }
                let t = t - 1.0;
                -c / 2.0 * (t * (t - 2.0) - 1.0) + start
            }

            Self::CubicIn => c * (t / d).powi(3) + start,
            Self::CubicOut => c * ((t / d - 1.0).powi(3) + 1.0) + start,
            Self::CubicInOut => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t.powi(3) + start;
                }
                c / 2.0 * ((t - 2.0).powi(3) + 2.0) + start
            }

            Self::QuartIn => c * (t / d).powi(4) + start,
            Self::QuartOut => -c * ((t / d - 1.0).powi(4) - 1.0) + start,
            Self::QuartInOut => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t.powi(4) + start;
                }
                -c / 2.0 * ((t - 2.0).powi(4) - 2.0) + start
            }

            Self::QuintIn => c * (t / d).powi(5) + start,
            Self::QuintOut => c * ((t / d - 1.0).powi(5) + 1.0) + start,
            Self::QuintInOut => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t.powi(5) + start;
                }
                c / 2.0 * ((t - 2.0).powi(5) + 2.0) + start
            }

            Self::ExpIn => {
                if t == 0.0 {
                    start
                } else {
                    c * 2f32.powf(10.0 * (t / d - 1.0)) + start
                }
            }
            Self::ExpOut => {
                if t == d {
                    end
                } else {
                    c * (-(2f32.powf(-10.0 * t / d)) + 1.0) + start
                }
            }
            Self::ExpInOut => {
                if t == 0.0 {
                    return start;
                }
                if t == d {
                    return end;
                }
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * 2f32.powf(10.0 * (t - 1.0)) + start;
                }
                c / 2.0 * (-(2f32.powf(-10.0 * (t - 1.0))) + 2.0) + start
            }

            Self::CircIn => {
                let t = t / d;
                -c * ((1.0 - t * t).sqrt() - 1.0) + start
            }
            Self::CircOut => {
                let t = t / d - 1.0;
                c * (1.0 - t * t).sqrt() + start
            }
            Self::CircInOut => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + start;
                }
                let t = t - 2.0;
                c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + start
            }

            // Overshoot scales with the span being animated.
            Self::BackIn => {
                let s = c * 0.01;
                let t = t / d;
                c * t * t * ((s + 1.0) * t - s) + start
            }
            Self::BackOut => {
                let s = c * 0.001;
                let t = t / d - 1.0;
                c * (t * t * ((s + 1.0) * t + s) + 1.0) + start
            }
            Self::BackInOut => {
                let s = c * 0.01 * 1.525;
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * (t * t * ((s + 1.0) * t - s)) + start;
                }
                let t = t - 2.0;
                c / 2.0 * (t * t * ((s + 1.0) * t + s) + 2.0) + start
            }

            Self::ElasticIn => {
                let t = t / d;
                if t == 0.0 || c == 0.0 {
                    return start;
                }
                if t == 1.0 {
                    return end;
                }
                let p = d * 0.3;
                let s = p / 4.0;
                let t = t - 1.0;
                -(c * 2f32.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin()) + start
            }
            Self::ElasticOut => {
                let t = t / d;
                if t == 0.0 || c == 0.0 {
                    return start;
                }
                if t == 1.0 {
                    return end;
                }
                let p = d * 0.3;
                let s = p / 4.0;
                c * 2f32.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + start
            }
            Self::ElasticInOut => {
                let t = t / (d / 2.0);
                if t == 0.0 || c == 0.0 {
                    return start;
                }
                if t == 2.0 {
                    return end;
                }
                let p = d * (0.3 * 1.5);
                let s = p / 4.0;
                let t = t - 1.0;
                let wave = ((t * d - s) * (2.0 * PI) / p).sin();
                if t < 0.0 {
                    -0.5 * (c * 2f32.powf(10.0 * t) * wave) + start
                } else {
                    c * 2f32.powf(-10.0 * t) * wave * 0.5 + c + start
                }
            }

            Self::BounceIn => c - bounce_out(d - t, d, c) + start,
            Self::BounceOut => bounce_out(t, d, c) + start,
            Self::BounceInOut => {
                if t < d / 2.0 {
                    (c - bounce_out(d - t * 2.0, d, c)) * 0.5 + start
                } else {
                    bounce_out(t * 2.0 - d, d, c) * 0.5 + start + c * 0.5
                }
            }
        }
    }
}

/// Bounce-out displacement from 0 towards `c`
fn bounce_out(t: f32, d: f32, c: f32) -> f32 {
    let t = t / d;

    if t < 1.0 / 2.75 {
        c * (7.5625 * t * t)
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        c * (7.5625 * t * t + 0.75)
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        c * (7.5625 * t * t + 0.9375)
    } else {
        let t = t - 2.625 / 2.75;
        c * (7.5625 * t * t + 0.984375)
    }
}

/// A stateless easing backed by one of the built-in [`Curve`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardEasing {
    curve: Curve,
}

impl StandardEasing {
    /// Create an easing for a curve
    pub fn new(curve: Curve) -> Self {
        Self { curve }
    }

    /// The curve this easing follows
    pub fn curve(&self) -> Curve {
        self.curve
    }
}

impl Easing for StandardEasing {
    fn key(&self) -> &str {
        self.curve.name()
    }

    fn interpolate(&self, elapsed: f32, duration: f32, start: f32, end: f32) -> f32 {
        self.curve.apply(elapsed, duration, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    #[test]
    fn test_curves_hit_endpoints() {
        for curve in Curve::ALL {
            if curve == Curve::None {
                continue;
            }
            let at_start = curve.apply(0.0, 30.0, 10.0, 50.0);
            let at_end = curve.apply(30.0, 30.0, 10.0, 50.0);
            assert!(
                (at_start - 10.0).abs() < EPSILON,
                "{} starts at {at_start}",
                curve.name()
            );
            assert!(
                (at_end - 50.0).abs() < 0.05,
                "{} ends at {at_end}",
                curve.name()
            );
        }
    }

    #[test]
    fn test_none_holds_start() {
        assert_eq!(Curve::None.apply(15.0, 30.0, 3.0, 9.0), 3.0);
        assert_eq!(Curve::None.apply(30.0, 30.0, 3.0, 9.0), 3.0);
    }

    #[test]
    fn test_linear_midpoint() {
        assert!((Curve::Linear.apply(5.0, 10.0, 0.0, 10.0) - 5.0).abs() < EPSILON);
        assert!((Curve::Linear.apply(5.0, 10.0, 10.0, 0.0) - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_in_out_symmetry() {
        let quad_in = Curve::QuadIn.apply(2.5, 10.0, 0.0, 1.0);
        let quad_out = Curve::QuadOut.apply(7.5, 10.0, 0.0, 1.0);
        assert!((quad_in - (1.0 - quad_out)).abs() < EPSILON);

        let half = Curve::SineInOut.apply(5.0, 10.0, 0.0, 1.0);
        assert!((half - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_elastic_flat_segment() {
        let value = Curve::ElasticInOut.apply(4.0, 10.0, 2.0, 2.0);
        assert_eq!(value, 2.0);
    }

    #[test]
    fn test_curve_names_unique() {
        for curve in Curve::ALL {
            assert_eq!(Curve::from_name(curve.name()), Some(curve));
        }
        assert_eq!(Curve::from_name("Wobble"), None);
    }
}
