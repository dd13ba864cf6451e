// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe animation for `Reelcut` Editor.
//!
//! This crate provides the data model behind every animatable clip property:
//! - Easing strategies and the registry that resolves them by key
//! - Keyframe tracks over scalar and color values
//! - Evaluation at arbitrary timeline frames
//! - Invariant-preserving keyframe mutation
//! - Change notification and the persisted track form
//!
//! ## Architecture
//!
//! A track keeps one value more than it has keyframes: the first value is
//! the boundary value active before the first keyframe. State lives behind
//! a copy-on-write snapshot, so the render thread evaluates while the UI
//! thread edits without ever observing a half-applied change.

pub mod easing;
pub mod error;
pub mod keyframe;
pub mod mutator;
pub mod notify;
pub mod owner;
pub mod persist;
pub mod track;

pub use easing::{CubicBezierEasing, Curve, Easing, EasingDescriptor, EasingRegistry, StandardEasing};
pub use error::{Result, TrackError};
pub use keyframe::{Animatable, Color, Frame, Keyframe, ScalarLimits};
pub use mutator::{KeyframeMove, RemovedKeyframe};
pub use notify::{ChangeNotifier, ChannelNotifier, TrackEvent};
pub use owner::{Clip, ClipId, TimelineElement};
pub use persist::{PersistError, PersistedTrack};
pub use track::{ColorTrack, KeyframeTrack, ScalarTrack, TrackId, TrackMetadata, TrackState};
