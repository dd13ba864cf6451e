// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe records and the value types a track can animate.

use crate::easing::Easing;
use crate::error::TrackError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timeline position in frames
pub type Frame = i64;

/// A keyframe: the value a track takes at a local frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<V> {
    /// Local frame (relative to the owner's start)
    pub frame: Frame,
    /// Value at this frame
    pub value: V,
}

impl<V> Keyframe<V> {
    /// Create a new keyframe
    pub fn new(frame: Frame, value: V) -> Self {
        Self { frame, value }
    }
}

/// A value type that a [`KeyframeTrack`](crate::track::KeyframeTrack) can interpolate.
///
/// Every channel of the value is eased independently with the same
/// strategy, elapsed time and duration.
pub trait Animatable:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Post-interpolation constraints for this value type
    type Limits: Clone + Default + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Ease every channel from `start` to `end`
    fn ease(easing: &dyn Easing, elapsed: f32, duration: f32, start: &Self, end: &Self) -> Self;

    /// Bring an interpolated value back into its allowed domain
    fn constrain(self, limits: &Self::Limits) -> Self;

    /// Reject limits that can never be satisfied
    fn check_limits(_limits: &Self::Limits) -> Result<(), TrackError> {
        Ok(())
    }
}

/// Clamp range for scalar tracks. A NaN bound leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarLimits {
    /// Lower bound (NaN = unbounded)
    pub min: f32,
    /// Upper bound (NaN = unbounded)
    pub max: f32,
}

impl ScalarLimits {
    /// Limits with both bounds
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// No clamping on either side
    pub fn unbounded() -> Self {
        Self {
            min: f32::NAN,
            max: f32::NAN,
        }
    }

    /// Only a lower bound
    pub fn at_least(min: f32) -> Self {
        Self { min, max: f32::NAN }
    }

    /// Only an upper bound
    pub fn at_most(max: f32) -> Self {
        Self { min: f32::NAN, max }
    }

    /// Clamp `value` into `[min, max]`, ignoring NaN bounds
    pub fn clamp(&self, value: f32) -> f32 {
        if !self.min.is_nan() && value <= self.min {
            self.min
        } else if !self.max.is_nan() && self.max <= value {
            self.max
        } else {
            value
        }
    }
}

impl Default for ScalarLimits {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Animatable for f32 {
    type Limits = ScalarLimits;

    fn ease(easing: &dyn Easing, elapsed: f32, duration: f32, start: &Self, end: &Self) -> Self {
        easing.interpolate(elapsed, duration, *start, *end)
    }

    fn constrain(self, limits: &ScalarLimits) -> Self {
        limits.clamp(self)
    }

    fn check_limits(limits: &ScalarLimits) -> Result<(), TrackError> {
        if !limits.min.is_nan() && !limits.max.is_nan() && limits.min > limits.max {
            return Err(TrackError::InvalidMetadata(format!(
                "min {} is greater than max {}",
                limits.min, limits.max
            )));
        }
        Ok(())
    }
}

/// RGBA color with channels in normalized `0..=1` space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color from normalized channels
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit channels
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Convert to 8-bit channels, rounding to nearest
    pub fn to_rgba8(&self) -> [u8; 4] {
        self.channels()
            .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Channels as `[r, g, b, a]`
    pub fn channels(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from `[r, g, b, a]`
    pub fn from_channels(channels: [f32; 4]) -> Self {
        let [r, g, b, a] = channels;
        Self::new(r, g, b, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Animatable for Color {
    type Limits = ();

    fn ease(easing: &dyn Easing, elapsed: f32, duration: f32, start: &Self, end: &Self) -> Self {
        let (from, to) = (start.channels(), end.channels());
        Self::from_channels(std::array::from_fn(|i| {
            easing.interpolate(elapsed, duration, from[i], to[i])
        }))
    }

    fn constrain(self, _limits: &()) -> Self {
        Self::from_channels(self.channels().map(|c| c.clamp(0.0, 1.0)))
    }
}
