// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe mutations.
//!
//! Every operation validates its arguments before touching state and
//! returns the value-array indices it affected, so history commands and UI
//! lists can stay in sync without re-reading the track. Each operation is
//! undone by its opposite: insert by remove, a move by moving back, a value
//! or easing change by restoring the previous one.

use crate::easing::Easing;
use crate::error::{Result, TrackError};
use crate::keyframe::{Animatable, Frame, Keyframe};
use crate::notify::TrackEvent;
use crate::track::{KeyframeTrack, TrackState};
use std::sync::Arc;

/// A keyframe taken out of a track
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedKeyframe<V> {
    /// Value index the keyframe had
    pub index: usize,
    /// Its value
    pub value: V,
}

/// Value indices of a moved keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyframeMove {
    /// Value index before the move
    pub from: usize,
    /// Value index after the move
    pub to: usize,
}

impl<V: Animatable> TrackState<V> {
    /// Insert a keyframe at an unoccupied positive frame
    pub(crate) fn insert(&mut self, frame: Frame, value: V) -> Result<usize> {
        debug_assert!(frame > 0, "frame 0 belongs to the boundary record");

        let index = self.records.partition_point(|k| k.frame < frame);
        if self.records.get(index).is_some_and(|k| k.frame == frame) {
            return Err(TrackError::FrameOccupied(frame));
        }
        self.records.insert(index, Keyframe::new(frame, value));
        Ok(index)
    }

    /// Remove the keyframe at `frame`, if there is one
    pub(crate) fn remove(&mut self, frame: Frame) -> Option<RemovedKeyframe<V>> {
        let index = self.value_index_of(frame)?;
        let record = self.records.remove(index);
        Some(RemovedKeyframe {
            index,
            value: record.value,
        })
    }

    /// Give keyframe `from` (a frame index) a new frame, keeping its value
    pub(crate) fn relocate(&mut self, from: usize, to_frame: Frame) -> Result<KeyframeMove> {
        let len = self.keyframe_count();
        if from >= len {
            return Err(TrackError::IndexOutOfRange { index: from, len });
        }

        let old_index = from + 1;
        if self.records[old_index].frame == to_frame {
            return Ok(KeyframeMove {
                from: old_index,
                to: old_index,
            });
        }
        if self.value_index_of(to_frame).is_some() {
            return Err(TrackError::FrameOccupied(to_frame));
        }

        let mut record = self.records.remove(old_index);
        record.frame = to_frame;
        let new_index = self.records.partition_point(|k| k.frame < to_frame);
        self.records.insert(new_index, record);

        Ok(KeyframeMove {
            from: old_index,
            to: new_index,
        })
    }

    /// Replace the value at a value index, returning the old one
    pub(crate) fn replace_value(&mut self, index: usize, value: V) -> Result<V> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(TrackError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(&mut record.value, value))
    }

    /// Shift every keyframe by `delta` frames.
    ///
    /// Keyframes that land on or before the boundary frame are taken out and
    /// returned with their shifted frames.
    pub(crate) fn shift(&mut self, delta: Frame) -> Vec<Keyframe<V>> {
        let mut keys = self.records.split_off(1);
        for key in &mut keys {
            key.frame += delta;
        }
        let kept = keys.split_off(keys.partition_point(|k| k.frame <= 0));
        self.records.extend(kept);
        keys
    }

    /// Swap the easing, returning the old one
    pub(crate) fn replace_easing(&mut self, easing: Arc<dyn Easing>) -> Arc<dyn Easing> {
        std::mem::replace(&mut self.easing, easing)
    }
}

impl<V: Animatable> KeyframeTrack<V> {
    /// Insert a keyframe at a local frame and return its value index.
    ///
    /// The frame must lie strictly inside the owner and not already hold a
    /// keyframe.
    pub fn insert_keyframe(&self, frame: Frame, value: V) -> Result<usize> {
        self.validate_frame(frame)?;
        self.insert_unchecked(frame, value)
    }

    /// Put back a keyframe that was taken out of this track.
    ///
    /// Only the boundary frame is rejected, so a keyframe stranded past the
    /// end of a shortened owner can be restored where it was.
    pub fn restore_keyframe(&self, frame: Frame, value: V) -> Result<usize> {
        self.validate_keyframe_frame(frame)?;
        self.insert_unchecked(frame, value)
    }

    fn insert_unchecked(&self, frame: Frame, value: V) -> Result<usize> {
        let index = self.update(|state| state.insert(frame, value))?;

        tracing::debug!("Keyframe added to track {:?} at frame {frame} (index {index})", self.id());
        self.emit(TrackEvent::KeyframeAdded {
            track: self.id(),
            frame,
            index,
        });
        Ok(index)
    }

    /// Remove the keyframe at a local frame.
    ///
    /// Returns `Ok(None)` when no keyframe sits on that frame. Frames at or
    /// past the owner's end are accepted so keyframes stranded by a shorter
    /// owner can still be removed.
    pub fn remove_keyframe(&self, frame: Frame) -> Result<Option<RemovedKeyframe<V>>> {
        self.validate_keyframe_frame(frame)?;
        if self.value_index_of(frame).is_none() {
            return Ok(None);
        }

        let removed = self.modify(|state| state.remove(frame));
        if let Some(removed) = &removed {
            tracing::debug!(
                "Keyframe removed from track {:?} at frame {frame} (index {})",
                self.id(),
                removed.index
            );
            self.emit(TrackEvent::KeyframeRemoved {
                track: self.id(),
                index: removed.index,
            });
        }
        Ok(removed)
    }

    /// Move keyframe `from_index` (an index into [`Self::frames`]) to a new local frame
    pub fn move_keyframe(&self, from_index: usize, to_frame: Frame) -> Result<KeyframeMove> {
        self.validate_frame(to_frame)?;
        let moved = self.update(|state| state.relocate(from_index, to_frame))?;

        tracing::debug!(
            "Keyframe moved on track {:?} to frame {to_frame} ({} -> {})",
            self.id(),
            moved.from,
            moved.to
        );
        self.emit(TrackEvent::KeyframeMoved {
            track: self.id(),
            from: moved.from,
            to: moved.to,
        });
        Ok(moved)
    }

    /// Replace the value at a value index and return the previous value.
    ///
    /// The new value is brought within the track limits first.
    pub fn set_value(&self, index: usize, value: V) -> Result<V> {
        let value = value.constrain(&self.metadata().limits);
        let previous = self.update(|state| state.replace_value(index, value))?;

        self.emit(TrackEvent::ValueChanged {
            track: self.id(),
            index,
        });
        Ok(previous)
    }

    /// Shift all keyframes by `delta` local frames.
    ///
    /// Used when the owner's start moves while its end stays put (trimming
    /// the head of a clip): passing `old_start - new_start` keeps every
    /// keyframe on the same absolute timeline frame. Keyframes that would
    /// land on or before the owner's start are dropped and returned.
    pub fn rebase(&self, delta: Frame) -> Vec<Keyframe<V>> {
        if delta == 0 {
            return Vec::new();
        }
        let dropped = self.modify(|state| state.shift(delta));

        for key in &dropped {
            tracing::warn!(
                "Keyframe on track {:?} moved out of range to frame {} and was dropped",
                self.id(),
                key.frame
            );
        }
        tracing::debug!("Track {:?} rebased by {delta} frames", self.id());
        self.emit(TrackEvent::Reloaded { track: self.id() });
        dropped
    }

    /// Swap the active easing and return the previous instance
    pub fn set_easing(&self, easing: Arc<dyn Easing>) -> Arc<dyn Easing> {
        let key = easing.key().to_string();
        let previous = self.modify(|state| state.replace_easing(easing));

        tracing::debug!("Track {:?} easing {} -> {key}", self.id(), previous.key());
        self.emit(TrackEvent::EasingChanged {
            track: self.id(),
            key,
        });
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingRegistry;
    use crate::keyframe::ScalarLimits;
    use crate::notify::ChannelNotifier;
    use crate::owner::Clip;
    use crate::track::{ScalarTrack, TrackMetadata};
    use std::thread;

    fn track(length: Frame) -> ScalarTrack {
        let registry = EasingRegistry::with_builtins();
        let clip = Arc::new(Clip::new(0, length));
        ScalarTrack::new(TrackMetadata::new("Position X", 0.0), clip, &registry).unwrap()
    }

    fn assert_invariants(track: &ScalarTrack) {
        let state = track.snapshot();
        let frames = state.frames();
        assert_eq!(state.values().len(), frames.len() + 1);
        assert!(frames.windows(2).all(|w| w[0] < w[1]), "unsorted: {frames:?}");
        assert!(frames.iter().all(|&f| f > 0 && f < track.length()));
    }

    /// Small deterministic generator so the sequence test needs no extra crates
    struct Lcg(u64);

    impl Lcg {
        fn below(&mut self, bound: u64) -> u64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (self.0 >> 33) % bound
        }
    }

    #[test]
    fn test_insert_returns_value_index() {
        let track = track(100);
        assert_eq!(track.insert_keyframe(50, 5.0), Ok(1));
        assert_eq!(track.insert_keyframe(20, 2.0), Ok(1));
        assert_eq!(track.insert_keyframe(80, 8.0), Ok(3));
        assert_eq!(track.insert_keyframe(60, 6.0), Ok(3));

        assert_eq!(track.frames(), vec![20, 50, 60, 80]);
        assert_eq!(track.values(), vec![0.0, 2.0, 5.0, 6.0, 8.0]);
    }

    #[test]
    fn test_insert_rejects_boundaries() {
        let track = track(100);
        for frame in [-5, 0, 100, 150] {
            assert_eq!(
                track.insert_keyframe(frame, 1.0),
                Err(TrackError::BoundaryViolation { frame, length: 100 })
            );
        }
        assert_eq!(track.keyframe_count(), 0);
    }

    #[test]
    fn test_insert_rejects_occupied_frame() {
        let track = track(100);
        track.insert_keyframe(40, 1.0).unwrap();
        assert_eq!(track.insert_keyframe(40, 2.0), Err(TrackError::FrameOccupied(40)));
        assert_eq!(track.values(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_remove_keyframe() {
        let track = track(100);
        track.insert_keyframe(30, 3.0).unwrap();
        track.insert_keyframe(60, 6.0).unwrap();

        let removed = track.remove_keyframe(30).unwrap();
        assert_eq!(removed, Some(RemovedKeyframe { index: 1, value: 3.0 }));
        assert_eq!(track.frames(), vec![60]);
        assert_eq!(track.values(), vec![0.0, 6.0]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let track = track(100);
        track.insert_keyframe(30, 3.0).unwrap();
        let before = track.snapshot();

        assert_eq!(track.remove_keyframe(31), Ok(None));
        assert_eq!(track.remove_keyframe(100), Ok(None));
        assert!(Arc::ptr_eq(&before, &track.snapshot()));
        assert_eq!(
            track.remove_keyframe(0),
            Err(TrackError::BoundaryViolation { frame: 0, length: 100 })
        );
    }

    #[test]
    fn test_remove_keyframe_past_shrunk_owner() {
        let registry = EasingRegistry::with_builtins();
        let clip = Arc::new(Clip::new(0, 100));
        let track = ScalarTrack::new(TrackMetadata::new("Y", 0.0), clip.clone(), &registry).unwrap();
        track.insert_keyframe(80, 8.0).unwrap();

        clip.set_length(50);
        let removed = track.remove_keyframe(80).unwrap();
        assert_eq!(removed, Some(RemovedKeyframe { index: 1, value: 8.0 }));
        assert!(track.frames().is_empty());

        assert_eq!(
            track.insert_keyframe(80, 8.0),
            Err(TrackError::BoundaryViolation { frame: 80, length: 50 })
        );
        assert_eq!(track.restore_keyframe(80, 8.0), Ok(1));
        assert_eq!(track.frames(), vec![80]);
    }

    #[test]
    fn test_rebase_keeps_absolute_positions() {
        let registry = EasingRegistry::with_builtins();
        let clip = Arc::new(Clip::new(100, 60));
        let track = ScalarTrack::new(TrackMetadata::new("Y", 0.0), clip.clone(), &registry).unwrap();
        track.insert_keyframe(20, 2.0).unwrap();
        track.insert_keyframe(40, 4.0).unwrap();
        let (notifier, events) = ChannelNotifier::new();
        track.subscribe(Arc::new(notifier));

        // Extend the head of the clip by 10 frames, keeping its end.
        let delta = clip.trim_start(90);
        assert_eq!(delta, 10);
        assert!(track.rebase(delta).is_empty());
        assert_eq!(track.frames(), vec![30, 50]);
        assert_eq!(track.values(), vec![0.0, 2.0, 4.0]);
        assert_eq!(track.evaluate(140), 4.0);
        assert_eq!(events.try_recv().unwrap(), TrackEvent::Reloaded { track: track.id() });

        // Cut 35 frames off the head: the first keyframe falls off.
        let delta = clip.trim_start(125);
        let dropped = track.rebase(delta);
        assert_eq!(dropped, vec![Keyframe::new(-5, 2.0)]);
        assert_eq!(track.frames(), vec![15]);
        assert_eq!(track.values(), vec![0.0, 4.0]);
        assert_eq!(track.evaluate(140), 4.0);
    }

    #[test]
    fn test_rebase_by_zero_is_noop() {
        let track = track(100);
        track.insert_keyframe(10, 1.0).unwrap();
        let before = track.snapshot();
        assert!(track.rebase(0).is_empty());
        assert!(Arc::ptr_eq(&before, &track.snapshot()));
    }

    #[test]
    fn test_insert_remove_round_trip() {
        let track = track(100);
        track.insert_keyframe(25, 2.5).unwrap();
        track.insert_keyframe(75, 7.5).unwrap();
        let (frames, values) = (track.frames(), track.values());

        track.insert_keyframe(50, 123.0).unwrap();
        track.remove_keyframe(50).unwrap();

        assert_eq!(track.frames(), frames);
        assert_eq!(track.values(), values);
    }

    #[test]
    fn test_move_keyframe_reorders_values() {
        let track = track(100);
        track.insert_keyframe(10, 1.0).unwrap();
        track.insert_keyframe(20, 2.0).unwrap();
        track.insert_keyframe(30, 3.0).unwrap();

        let moved = track.move_keyframe(0, 25).unwrap();
        assert_eq!(moved, KeyframeMove { from: 1, to: 2 });
        assert_eq!(track.frames(), vec![20, 25, 30]);
        assert_eq!(track.values(), vec![0.0, 2.0, 1.0, 3.0]);

        let moved = track.move_keyframe(2, 5).unwrap();
        assert_eq!(moved, KeyframeMove { from: 3, to: 1 });
        assert_eq!(track.frames(), vec![5, 20, 25]);
        assert_eq!(track.values(), vec![0.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_move_round_trip() {
        let track = track(100);
        track.insert_keyframe(10, 1.0).unwrap();
        track.insert_keyframe(40, 4.0).unwrap();
        track.insert_keyframe(70, 7.0).unwrap();
        let (frames, values) = (track.frames(), track.values());

        let moved = track.move_keyframe(0, 90).unwrap();
        track.move_keyframe(moved.to - 1, 10).unwrap();

        assert_eq!(track.frames(), frames);
        assert_eq!(track.values(), values);
    }

    #[test]
    fn test_move_validation() {
        let track = track(100);
        track.insert_keyframe(10, 1.0).unwrap();
        track.insert_keyframe(20, 2.0).unwrap();

        assert_eq!(
            track.move_keyframe(2, 50),
            Err(TrackError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(track.move_keyframe(0, 20), Err(TrackError::FrameOccupied(20)));
        assert_eq!(
            track.move_keyframe(0, 0),
            Err(TrackError::BoundaryViolation { frame: 0, length: 100 })
        );
        assert_eq!(track.move_keyframe(1, 20), Ok(KeyframeMove { from: 2, to: 2 }));
        assert_eq!(track.frames(), vec![10, 20]);
    }

    #[test]
    fn test_set_value_clamps_and_returns_previous() {
        let registry = EasingRegistry::with_builtins();
        let clip = Arc::new(Clip::new(0, 100));
        let metadata = TrackMetadata::new("Opacity", 100.0).with_limits(ScalarLimits::new(0.0, 100.0));
        let track = ScalarTrack::new(metadata, clip, &registry).unwrap();
        track.insert_keyframe(50, 20.0).unwrap();

        assert_eq!(track.set_value(1, 250.0), Ok(20.0));
        assert_eq!(track.values(), vec![100.0, 100.0]);
        assert_eq!(track.set_value(0, -3.0), Ok(100.0));
        assert_eq!(track.values(), vec![0.0, 100.0]);
        assert_eq!(
            track.set_value(2, 1.0),
            Err(TrackError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_set_easing_swaps_instance() {
        let registry = EasingRegistry::with_builtins();
        let track = track(100);
        let quad = registry.resolve("QuadIn").unwrap();

        let previous = track.set_easing(Arc::clone(&quad));
        assert_eq!(previous.key(), "Linear");
        assert!(Arc::ptr_eq(&track.easing(), &quad));
    }

    #[test]
    fn test_mutations_notify() {
        let track = track(100);
        let (notifier, events) = ChannelNotifier::new();
        track.subscribe(Arc::new(notifier));
        let id = track.id();

        track.insert_keyframe(40, 4.0).unwrap();
        track.insert_keyframe(20, 2.0).unwrap();
        track.move_keyframe(0, 60).unwrap();
        track.remove_keyframe(40).unwrap();
        track.set_value(1, 9.0).unwrap();
        let _ = track.insert_keyframe(0, 1.0);

        let received: Vec<TrackEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                TrackEvent::KeyframeAdded { track: id, frame: 40, index: 1 },
                TrackEvent::KeyframeAdded { track: id, frame: 20, index: 1 },
                TrackEvent::KeyframeMoved { track: id, from: 1, to: 2 },
                TrackEvent::KeyframeRemoved { track: id, index: 1 },
                TrackEvent::ValueChanged { track: id, index: 1 },
            ]
        );
    }

    #[test]
    fn test_random_sequences_keep_invariants() {
        let track = track(200);
        let mut rng = Lcg(7);

        for step in 0..2_000 {
            let frame = rng.below(220) as Frame - 10;
            match rng.below(3) {
                0 => {
                    let _ = track.insert_keyframe(frame, step as f32);
                }
                1 => {
                    let _ = track.remove_keyframe(frame);
                }
                _ => {
                    let count = track.keyframe_count() as u64;
                    if count > 0 {
                        let _ = track.move_keyframe(rng.below(count) as usize, frame);
                    }
                }
            }
            assert_invariants(&track);
        }
    }

    #[test]
    fn test_concurrent_evaluation_sees_consistent_snapshots() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        // Every keyframe value equals the boundary value, so any consistent
        // snapshot evaluates to exactly that value everywhere.
        let track = Arc::new(track(500));
        track.set_value(0, 1.0).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let track = Arc::clone(&track);
                thread::spawn(move || {
                    for round in 0..2_000 {
                        let state = track.snapshot();
                        assert_eq!(state.values().len(), state.frames().len() + 1);
                        assert_eq!(track.evaluate(round % 500), 1.0);
                    }
                })
            })
            .collect();

        let mut rng = Lcg(42);
        for _ in 0..2_000 {
            let frame = rng.below(498) as Frame + 1;
            if track.value_index_of(frame).is_some() {
                track.remove_keyframe(frame).unwrap();
            } else {
                track.insert_keyframe(frame, 1.0).unwrap();
            }
        }

        for reader in readers {
            reader.join().unwrap();
        }
        assert_invariants(&track);
    }
}
