// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing strategies.
//!
//! An easing maps the time elapsed inside a segment to a value between the
//! segment's start and end values. Strategies are looked up by a stable key
//! through an [`EasingRegistry`], which is built explicitly and handed to
//! whoever needs to resolve keys.
//!
//! ## Built-in strategies
//!
//! - [`StandardEasing`]: the 32 classic curves (`Linear`, `QuadIn`, `BounceInOut`, ...)
//! - [`CubicBezierEasing`]: a CSS-style cubic bezier with four control values

mod bezier;
mod curves;
mod registry;

pub use bezier::CubicBezierEasing;
pub use curves::{Curve, StandardEasing};
pub use registry::{EasingFactory, EasingRegistry};

use crate::error::TrackError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An interpolation strategy between two scalar values.
///
/// Implementations must be pure with respect to track state: the result may
/// only depend on the arguments and the instance's own parameters.
pub trait Easing: fmt::Debug + Send + Sync {
    /// Stable registry key
    fn key(&self) -> &str;

    /// Value after `elapsed` of `duration` frames, going from `start` to `end`.
    ///
    /// Callers guarantee `duration > 0`.
    fn interpolate(&self, elapsed: f32, duration: f32, start: f32, end: f32) -> f32;

    /// Per-instance parameters, in the order [`Easing::restore`] expects them
    fn parameters(&self) -> Vec<f32> {
        Vec::new()
    }

    /// Reload parameters captured by [`Easing::parameters`]
    fn restore(&mut self, _parameters: &[f32]) -> Result<(), TrackError> {
        Ok(())
    }
}

/// Serializable identity of an easing instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EasingDescriptor {
    /// Registry key
    pub key: String,
    /// Instance parameters
    #[serde(default)]
    pub parameters: Vec<f32>,
}

impl EasingDescriptor {
    /// Describe an easing instance
    pub fn of(easing: &dyn Easing) -> Self {
        Self {
            key: easing.key().to_string(),
            parameters: easing.parameters(),
        }
    }
}
