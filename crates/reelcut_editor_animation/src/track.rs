// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe tracks and their evaluation.
//!
//! A track holds one ordered sequence of [`Keyframe`] records. The first
//! record is the implicit boundary value pinned at local frame 0; every
//! other record is an explicit keyframe. Externally this reads as `N`
//! frames and `N + 1` values.
//!
//! State is published as an immutable [`TrackState`] snapshot. Evaluation
//! clones the current snapshot and works on it without holding any lock,
//! so a render thread never observes a half-applied mutation.

use crate::easing::{Easing, EasingRegistry};
use crate::error::{Result, TrackError};
use crate::keyframe::{Animatable, Color, Frame, Keyframe};
use crate::notify::{ChangeNotifier, TrackEvent};
use crate::owner::TimelineElement;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// Construction-time settings of a track
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "V: Animatable")]
pub struct TrackMetadata<V: Animatable> {
    /// Display name of the animated property
    pub name: String,
    /// Value the track starts with
    pub default_value: V,
    /// Registry key of the initial easing
    pub default_easing: String,
    /// Post-interpolation limits
    pub limits: V::Limits,
    /// Whether callers may add a per-evaluation offset
    pub use_optional: bool,
}

impl<V: Animatable> TrackMetadata<V> {
    /// Metadata with linear easing and no limits
    pub fn new(name: impl Into<String>, default_value: V) -> Self {
        Self {
            name: name.into(),
            default_value,
            default_easing: "Linear".to_string(),
            limits: V::Limits::default(),
            use_optional: false,
        }
    }

    /// Set the initial easing key
    pub fn with_easing(mut self, key: impl Into<String>) -> Self {
        self.default_easing = key.into();
        self
    }

    /// Set the post-interpolation limits
    pub fn with_limits(mut self, limits: V::Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Allow per-evaluation offsets
    pub fn with_optional(mut self, use_optional: bool) -> Self {
        self.use_optional = use_optional;
        self
    }

    /// Reject metadata a track cannot be built from
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TrackError::InvalidMetadata("track name is empty".to_string()));
        }
        V::check_limits(&self.limits)
    }
}

/// Immutable snapshot of a track's keyframes and easing
#[derive(Debug, Clone)]
pub struct TrackState<V> {
    /// `records[0]` is the boundary record at frame 0
    pub(crate) records: Vec<Keyframe<V>>,
    pub(crate) easing: Arc<dyn Easing>,
}

impl<V: Animatable> TrackState<V> {
    /// State with no keyframes
    pub(crate) fn new(boundary: V, easing: Arc<dyn Easing>) -> Self {
        Self {
            records: vec![Keyframe::new(0, boundary)],
            easing,
        }
    }

    /// Number of explicit keyframes
    pub fn keyframe_count(&self) -> usize {
        self.records.len() - 1
    }

    /// Explicit keyframes, ordered by frame
    pub fn keyframes(&self) -> &[Keyframe<V>] {
        &self.records[1..]
    }

    /// Keyframe frames, strictly ascending
    pub fn frames(&self) -> Vec<Frame> {
        self.keyframes().iter().map(|k| k.frame).collect()
    }

    /// Values, one more than there are frames
    pub fn values(&self) -> Vec<V> {
        self.records.iter().map(|k| k.value.clone()).collect()
    }

    /// Value at a value index
    pub fn value(&self, index: usize) -> Option<&V> {
        self.records.get(index).map(|k| &k.value)
    }

    /// Number of values
    pub fn value_count(&self) -> usize {
        self.records.len()
    }

    /// Active easing strategy
    pub fn easing(&self) -> &Arc<dyn Easing> {
        &self.easing
    }

    /// Value index of the keyframe at `frame`
    pub fn value_index_of(&self, frame: Frame) -> Option<usize> {
        self.keyframes()
            .iter()
            .position(|k| k.frame == frame)
            .map(|i| i + 1)
    }

    /// Eased value at a local frame, before limits are applied.
    ///
    /// `length` must be positive.
    pub fn sample(&self, local: Frame, length: Frame) -> V {
        let local = local.clamp(0, length);
        let boundary = &self.records[0].value;

        let (segment_start, segment_end, from, to) = match self.keyframes() {
            [] => (0, length, boundary, boundary),
            [first, ..] if local <= first.frame => (0, first.frame, boundary, &first.value),
            // Past the last keyframe the track holds its final value.
            [.., last] if local >= last.frame => return last.value.clone(),
            keys => {
                let mut k = 0;
                for (i, pair) in keys.windows(2).enumerate() {
                    if pair[0].frame <= local && local <= pair[1].frame {
                        k = i;
                    }
                }
                (keys[k].frame, keys[k + 1].frame, &keys[k].value, &keys[k + 1].value)
            }
        };

        let duration = segment_end - segment_start;
        if duration <= 0 {
            return to.clone();
        }

        V::ease(
            self.easing.as_ref(),
            (local - segment_start) as f32,
            duration as f32,
            from,
            to,
        )
    }
}

/// A time-indexed value track belonging to a timeline element
pub struct KeyframeTrack<V: Animatable> {
    id: TrackId,
    metadata: TrackMetadata<V>,
    owner: Arc<dyn TimelineElement>,
    state: RwLock<Arc<TrackState<V>>>,
    notifiers: RwLock<Vec<Arc<dyn ChangeNotifier>>>,
}

/// Track animating a single float
pub type ScalarTrack = KeyframeTrack<f32>;

/// Track animating an RGBA color
pub type ColorTrack = KeyframeTrack<Color>;

impl<V: Animatable> KeyframeTrack<V> {
    /// Create a track with no keyframes, seeded with the default value
    pub fn new(
        metadata: TrackMetadata<V>,
        owner: Arc<dyn TimelineElement>,
        registry: &EasingRegistry,
    ) -> Result<Self> {
        metadata.validate()?;
        let easing = registry.resolve(&metadata.default_easing)?;
        let state = TrackState::new(metadata.default_value.clone(), easing);

        Ok(Self {
            id: TrackId::new(),
            metadata,
            owner,
            state: RwLock::new(Arc::new(state)),
            notifiers: RwLock::new(Vec::new()),
        })
    }

    /// Track ID
    pub fn id(&self) -> TrackId {
        self.id
    }

    /// Construction metadata
    pub fn metadata(&self) -> &TrackMetadata<V> {
        &self.metadata
    }

    /// Element this track belongs to
    pub fn owner(&self) -> &Arc<dyn TimelineElement> {
        &self.owner
    }

    /// Current length of the owning element
    pub fn length(&self) -> Frame {
        self.owner.length()
    }

    /// Current consistent snapshot of the track
    pub fn snapshot(&self) -> Arc<TrackState<V>> {
        Arc::clone(&self.state.read())
    }

    /// Keyframe frames
    pub fn frames(&self) -> Vec<Frame> {
        self.snapshot().frames()
    }

    /// Values (one more than frames)
    pub fn values(&self) -> Vec<V> {
        self.snapshot().values()
    }

    /// Number of explicit keyframes
    pub fn keyframe_count(&self) -> usize {
        self.snapshot().keyframe_count()
    }

    /// Active easing strategy
    pub fn easing(&self) -> Arc<dyn Easing> {
        Arc::clone(self.snapshot().easing())
    }

    /// Value index of the keyframe at local `frame`
    pub fn value_index_of(&self, frame: Frame) -> Option<usize> {
        self.snapshot().value_index_of(frame)
    }

    /// Check that a local frame lies strictly inside the owner
    pub fn validate_frame(&self, frame: Frame) -> Result<()> {
        let length = self.owner.length();
        if frame <= 0 || frame >= length {
            return Err(TrackError::BoundaryViolation { frame, length });
        }
        Ok(())
    }

    /// Check that a local frame can hold a keyframe at all (after the boundary frame)
    pub fn validate_keyframe_frame(&self, frame: Frame) -> Result<()> {
        if frame <= 0 {
            return Err(TrackError::BoundaryViolation {
                frame,
                length: self.owner.length(),
            });
        }
        Ok(())
    }

    /// Register a listener for change events
    pub fn subscribe(&self, notifier: Arc<dyn ChangeNotifier>) {
        self.notifiers.write().push(notifier);
    }

    /// Value at an absolute timeline frame
    pub fn try_evaluate(&self, frame: Frame) -> Result<V> {
        self.eased(frame)
            .map(|value| value.constrain(&self.metadata.limits))
    }

    /// Value at a frame relative to the owner's start
    pub fn try_evaluate_local(&self, local: Frame) -> Result<V> {
        self.try_evaluate(local + self.owner.start())
    }

    /// Value at an absolute timeline frame.
    ///
    /// # Panics
    ///
    /// Panics if the owning element has a non-positive length; that is a
    /// misconfigured element, not a recoverable condition.
    pub fn evaluate(&self, frame: Frame) -> V {
        match self.try_evaluate(frame) {
            Ok(value) => value,
            Err(err) => panic!("cannot evaluate track {:?}: {err}", self.id),
        }
    }

    /// Interpolated value before limits are applied
    fn eased(&self, frame: Frame) -> Result<V> {
        let length = self.owner.length();
        if length <= 0 {
            return Err(TrackError::EmptyOwnerBounds(length));
        }
        let local = frame - self.owner.start();
        Ok(self.snapshot().sample(local, length))
    }

    /// Build the next state from a copy of the current one and publish it.
    ///
    /// Nothing is published when `apply` fails.
    pub(crate) fn update<R>(&self, apply: impl FnOnce(&mut TrackState<V>) -> Result<R>) -> Result<R> {
        let current = self.state.upgradable_read();
        let mut next = (**current).clone();
        let result = apply(&mut next)?;

        let mut current = RwLockUpgradableReadGuard::upgrade(current);
        *current = Arc::new(next);
        Ok(result)
    }

    /// Like [`Self::update`] for changes that cannot fail
    pub(crate) fn modify<R>(&self, apply: impl FnOnce(&mut TrackState<V>) -> R) -> R {
        let current = self.state.upgradable_read();
        let mut next = (**current).clone();
        let result = apply(&mut next);

        let mut current = RwLockUpgradableReadGuard::upgrade(current);
        *current = Arc::new(next);
        result
    }

    /// Publish a fully built state, returning the one it replaced
    pub(crate) fn replace_state(&self, state: TrackState<V>) -> Arc<TrackState<V>> {
        std::mem::replace(&mut *self.state.write(), Arc::new(state))
    }

    /// Deliver an event to every subscriber
    pub(crate) fn emit(&self, event: TrackEvent) {
        let notifiers = self.notifiers.read().clone();
        for notifier in notifiers {
            notifier.notify(&event);
        }
    }
}

impl KeyframeTrack<f32> {
    /// Value at an absolute frame with an extra offset added before clamping.
    ///
    /// The offset is ignored unless the metadata enables it.
    pub fn try_evaluate_with_offset(&self, frame: Frame, offset: f32) -> Result<f32> {
        let value = self.eased(frame)?;
        let value = if self.metadata.use_optional {
            value + offset
        } else {
            value
        };
        Ok(value.constrain(&self.metadata.limits))
    }

    /// Panicking form of [`Self::try_evaluate_with_offset`]
    pub fn evaluate_with_offset(&self, frame: Frame, offset: f32) -> f32 {
        match self.try_evaluate_with_offset(frame, offset) {
            Ok(value) => value,
            Err(err) => panic!("cannot evaluate track {:?}: {err}", self.id),
        }
    }
}

impl<V: Animatable> fmt::Debug for KeyframeTrack<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.snapshot();
        f.debug_struct("KeyframeTrack")
            .field("id", &self.id)
            .field("name", &self.metadata.name)
            .field("frames", &state.frames())
            .field("easing", &state.easing().key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::ScalarLimits;
    use crate::owner::Clip;

    fn scalar_track(length: Frame, keys: &[(Frame, f32)], boundary: f32) -> ScalarTrack {
        let registry = EasingRegistry::with_builtins();
        let clip = Arc::new(Clip::new(0, length));
        let track = ScalarTrack::new(TrackMetadata::new("Opacity", boundary), clip, &registry).unwrap();
        for &(frame, value) in keys {
            track.insert_keyframe(frame, value).unwrap();
        }
        track
    }

    #[test]
    fn test_new_track_is_flat() {
        let track = scalar_track(100, &[], 3.0);
        assert!(track.frames().is_empty());
        assert_eq!(track.values(), vec![3.0]);
        assert_eq!(track.evaluate(0), 3.0);
        assert_eq!(track.evaluate(50), 3.0);
        assert_eq!(track.evaluate(100), 3.0);
    }

    #[test]
    fn test_single_keyframe_scenario() {
        let track = scalar_track(60, &[(30, 10.0)], 0.0);
        assert_eq!(track.frames(), vec![30]);
        assert_eq!(track.values(), vec![0.0, 10.0]);

        assert_eq!(track.evaluate(0), 0.0);
        assert!((track.evaluate(15) - 5.0).abs() < 1e-5);
        assert_eq!(track.evaluate(30), 10.0);
        assert_eq!(track.evaluate(60), 10.0);
    }

    #[test]
    fn test_boundary_continuity() {
        let (a, b, c) = (0.0, 100.0, 40.0);
        let track = scalar_track(30, &[(10, b), (20, c)], a);

        assert_eq!(track.evaluate(0), a);
        assert_eq!(track.evaluate(10), b);
        assert!((track.evaluate(15) - 70.0).abs() < 1e-4);
        assert_eq!(track.evaluate(20), c);
        assert_eq!(track.evaluate(30), c);
    }

    #[test]
    fn test_absolute_frames_are_translated() {
        let registry = EasingRegistry::with_builtins();
        let clip = Arc::new(Clip::new(1000, 60));
        let track = ScalarTrack::new(TrackMetadata::new("X", 0.0), clip.clone(), &registry).unwrap();
        track.insert_keyframe(30, 10.0).unwrap();

        assert_eq!(track.evaluate(1000), 0.0);
        assert_eq!(track.evaluate(1030), 10.0);
        assert_eq!(track.try_evaluate_local(30).unwrap(), 10.0);

        // Frames outside the clip clamp to its ends.
        assert_eq!(track.evaluate(0), 0.0);
        assert_eq!(track.evaluate(5000), 10.0);

        clip.set_start(0);
        assert_eq!(track.evaluate(30), 10.0);
    }

    #[test]
    fn test_limits_and_offset() {
        let registry = EasingRegistry::with_builtins();
        let clip = Arc::new(Clip::new(0, 100));
        let metadata = TrackMetadata::new("Scale", 50.0)
            .with_limits(ScalarLimits::new(0.0, 100.0))
            .with_optional(true);
        let track = ScalarTrack::new(metadata, clip.clone(), &registry).unwrap();

        assert_eq!(track.evaluate_with_offset(10, 20.0), 70.0);
        assert_eq!(track.evaluate_with_offset(10, 80.0), 100.0);
        assert_eq!(track.evaluate_with_offset(10, -80.0), 0.0);

        let plain = ScalarTrack::new(TrackMetadata::new("Scale", 50.0), clip, &registry).unwrap();
        assert_eq!(plain.evaluate_with_offset(10, 20.0), 50.0);
    }

    #[test]
    fn test_empty_owner_bounds() {
        let track = scalar_track(10, &[], 1.0);
        let clip = Arc::new(Clip::new(0, 0));
        let registry = EasingRegistry::with_builtins();
        let empty = ScalarTrack::new(TrackMetadata::new("Y", 1.0), clip, &registry).unwrap();

        assert_eq!(track.try_evaluate(5), Ok(1.0));
        assert_eq!(empty.try_evaluate(0), Err(TrackError::EmptyOwnerBounds(0)));
    }

    #[test]
    #[should_panic(expected = "cannot evaluate track")]
    fn test_evaluate_panics_on_empty_owner() {
        let registry = EasingRegistry::with_builtins();
        let clip = Arc::new(Clip::new(0, -1));
        let track = ScalarTrack::new(TrackMetadata::new("Y", 1.0), clip, &registry).unwrap();
        track.evaluate(0);
    }

    #[test]
    fn test_shrunk_owner_holds_last_value() {
        let registry = EasingRegistry::with_builtins();
        let clip = Arc::new(Clip::new(0, 100));
        let track = ScalarTrack::new(TrackMetadata::new("Y", 0.0), clip.clone(), &registry).unwrap();
        track.insert_keyframe(80, 8.0).unwrap();

        clip.set_length(50);
        assert_eq!(track.evaluate(50), 5.0);
    }

    #[test]
    fn test_color_track_evaluates_channels() {
        let registry = EasingRegistry::with_builtins();
        let clip = Arc::new(Clip::new(0, 20));
        let track = ColorTrack::new(TrackMetadata::new("Tint", Color::BLACK), clip, &registry).unwrap();
        track.insert_keyframe(10, Color::WHITE).unwrap();

        let mid = track.evaluate(5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.g - 0.5).abs() < 1e-6);
        assert!((mid.b - 0.5).abs() < 1e-6);
        assert_eq!(mid.a, 1.0);
        assert_eq!(track.evaluate(20), Color::WHITE);
    }

    #[test]
    fn test_color_overshoot_clamped() {
        let registry = EasingRegistry::with_builtins();
        let clip = Arc::new(Clip::new(0, 100));
        let metadata = TrackMetadata::new("Tint", Color::BLACK).with_easing("ElasticOut");
        let track = ColorTrack::new(metadata, clip, &registry).unwrap();
        track.insert_keyframe(50, Color::WHITE).unwrap();

        for frame in 0..=100 {
            let color = track.evaluate(frame);
            for channel in color.channels() {
                assert!((0.0..=1.0).contains(&channel), "frame {frame}: {channel}");
            }
        }
    }

    #[test]
    fn test_invalid_metadata_rejected() {
        let registry = EasingRegistry::with_builtins();
        let clip: Arc<dyn TimelineElement> = Arc::new(Clip::new(0, 10));

        let unnamed = ScalarTrack::new(TrackMetadata::new(" ", 0.0), clip.clone(), &registry);
        assert!(matches!(unnamed, Err(TrackError::InvalidMetadata(_))));

        let inverted = TrackMetadata::new("X", 0.0).with_limits(ScalarLimits::new(5.0, 1.0));
        assert!(matches!(
            ScalarTrack::new(inverted, clip.clone(), &registry),
            Err(TrackError::InvalidMetadata(_))
        ));

        let unknown = TrackMetadata::new("X", 0.0).with_easing("Wobble");
        assert_eq!(
            ScalarTrack::new(unknown, clip, &registry).unwrap_err(),
            TrackError::EasingNotFound("Wobble".to_string())
        );
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let track = scalar_track(90, &[(20, 5.0), (45, -3.0), (70, 12.0)], 1.0);
        let first: Vec<f32> = (0..=90).map(|f| track.evaluate(f)).collect();
        let second: Vec<f32> = (0..=90).map(|f| track.evaluate(f)).collect();
        assert_eq!(first, second);
    }
}
