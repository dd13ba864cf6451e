// SPDX-License-Identifier: MIT OR Apache-2.0
//! Commands that add, remove and move keyframes.

use crate::command::{CommandError, TrackCommand, TrackHandle};
use reelcut_editor_animation::{Animatable, Frame, KeyframeTrack, TrackError};
use std::sync::Arc;

fn ensure_free<V: Animatable>(track: &KeyframeTrack<V>, frame: Frame) -> Result<(), CommandError> {
    if track.value_index_of(frame).is_some() {
        return Err(TrackError::FrameOccupied(frame).into());
    }
    Ok(())
}

/// Command to add a keyframe
pub struct AddKeyframeCommand<V: Animatable> {
    track: TrackHandle<V>,
    frame: Frame,
    value: V,
    /// Value index while applied
    index: Option<usize>,
    description: String,
}

impl<V: Animatable> AddKeyframeCommand<V> {
    /// Add a keyframe holding the curve's current value at `frame`
    pub fn new(track: &Arc<KeyframeTrack<V>>, frame: Frame) -> Result<Self, CommandError> {
        track.validate_frame(frame)?;
        let value = track.try_evaluate_local(frame)?;
        Self::with_value(track, frame, value)
    }

    /// Add a keyframe with an explicit value
    pub fn with_value(track: &Arc<KeyframeTrack<V>>, frame: Frame, value: V) -> Result<Self, CommandError> {
        track.validate_frame(frame)?;
        ensure_free(track, frame)?;

        Ok(Self {
            track: TrackHandle::new(track),
            frame,
            value,
            index: None,
            description: format!("Add Keyframe ({})", track.metadata().name),
        })
    }

    /// Local frame of the keyframe
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Value index of the keyframe while the command is applied
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

impl<V: Animatable> TrackCommand for AddKeyframeCommand<V> {
    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&mut self) -> Result<(), CommandError> {
        if self.index.is_some() {
            return Ok(());
        }
        let track = self.track.get()?;
        self.index = Some(track.insert_keyframe(self.frame, self.value.clone())?);
        Ok(())
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        if self.index.is_none() {
            return Ok(());
        }
        let track = self.track.get()?;
        track.remove_keyframe(self.frame)?;
        self.index = None;
        Ok(())
    }
}

/// Command to remove a keyframe
pub struct RemoveKeyframeCommand<V: Animatable> {
    track: TrackHandle<V>,
    frame: Frame,
    value: V,
    description: String,
}

impl<V: Animatable> RemoveKeyframeCommand<V> {
    /// Remove the keyframe at `frame`
    pub fn new(track: &Arc<KeyframeTrack<V>>, frame: Frame) -> Result<Self, CommandError> {
        track.validate_keyframe_frame(frame)?;
        let state = track.snapshot();
        let value = state
            .value_index_of(frame)
            .and_then(|index| state.value(index))
            .cloned()
            .ok_or_else(|| CommandError::InvalidOperation(format!("No keyframe at frame {frame}")))?;

        Ok(Self {
            track: TrackHandle::new(track),
            frame,
            value,
            description: format!("Remove Keyframe ({})", track.metadata().name),
        })
    }

    /// Value the keyframe held
    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<V: Animatable> TrackCommand for RemoveKeyframeCommand<V> {
    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&mut self) -> Result<(), CommandError> {
        let track = self.track.get()?;
        track.remove_keyframe(self.frame)?;
        Ok(())
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        let track = self.track.get()?;
        if track.value_index_of(self.frame).is_none() {
            track.restore_keyframe(self.frame, self.value.clone())?;
        }
        Ok(())
    }
}

/// Command to move a keyframe to another frame
pub struct MoveKeyframeCommand<V: Animatable> {
    track: TrackHandle<V>,
    from: Frame,
    to: Frame,
    description: String,
}

impl<V: Animatable> MoveKeyframeCommand<V> {
    /// Move the keyframe at `from` to `to`
    pub fn new(track: &Arc<KeyframeTrack<V>>, from: Frame, to: Frame) -> Result<Self, CommandError> {
        track.validate_frame(to)?;
        if track.value_index_of(from).is_none() {
            return Err(CommandError::InvalidOperation(format!("No keyframe at frame {from}")));
        }
        if from != to {
            ensure_free(track, to)?;
        }

        Ok(Self {
            track: TrackHandle::new(track),
            from,
            to,
            description: format!("Move Keyframe ({})", track.metadata().name),
        })
    }

    fn shift(&self, from: Frame, to: Frame) -> Result<(), CommandError> {
        let track = self.track.get()?;
        match track.value_index_of(from) {
            Some(index) => {
                track.move_keyframe(index - 1, to)?;
                Ok(())
            }
            // Already at the destination.
            None if track.value_index_of(to).is_some() => Ok(()),
            None => Err(CommandError::InvalidOperation(format!("No keyframe at frame {from}"))),
        }
    }
}

impl<V: Animatable> TrackCommand for MoveKeyframeCommand<V> {
    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&mut self) -> Result<(), CommandError> {
        self.shift(self.from, self.to)
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        self.shift(self.to, self.from)
    }
}
