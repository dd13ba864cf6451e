// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command that replaces a keyframe value.

use crate::command::{CommandError, TrackCommand, TrackHandle};
use reelcut_editor_animation::{Animatable, KeyframeTrack, TrackError};
use std::sync::Arc;

/// Command to change the value at a value index
pub struct ChangeValueCommand<V: Animatable> {
    track: TrackHandle<V>,
    index: usize,
    before: V,
    after: V,
    description: String,
}

impl<V: Animatable> ChangeValueCommand<V> {
    /// Change the value at `index` (0 is the boundary value)
    pub fn new(track: &Arc<KeyframeTrack<V>>, index: usize, value: V) -> Result<Self, CommandError> {
        let state = track.snapshot();
        let before = state.value(index).cloned().ok_or(TrackError::IndexOutOfRange {
            index,
            len: state.value_count(),
        })?;

        Ok(Self {
            track: TrackHandle::new(track),
            index,
            before,
            after: value.constrain(&track.metadata().limits),
            description: format!("Change Value ({})", track.metadata().name),
        })
    }

    /// Value the command applies, already within the track limits
    pub fn value(&self) -> &V {
        &self.after
    }
}

impl<V: Animatable> TrackCommand for ChangeValueCommand<V> {
    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&mut self) -> Result<(), CommandError> {
        self.track.get()?.set_value(self.index, self.after.clone())?;
        Ok(())
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        self.track.get()?.set_value(self.index, self.before.clone())?;
        Ok(())
    }
}
