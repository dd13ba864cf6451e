// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command that swaps a track's easing strategy.

use crate::command::{CommandError, TrackCommand, TrackHandle};
use reelcut_editor_animation::{Animatable, Easing, EasingRegistry, KeyframeTrack};
use std::sync::Arc;

/// Command to change the easing of a track
pub struct ChangeEasingCommand<V: Animatable> {
    track: TrackHandle<V>,
    before: Arc<dyn Easing>,
    after: Arc<dyn Easing>,
    description: String,
}

impl<V: Animatable> ChangeEasingCommand<V> {
    /// Switch to the strategy registered under `key`.
    ///
    /// Fails with `EasingNotFound` when the key is unknown.
    pub fn new(track: &Arc<KeyframeTrack<V>>, registry: &EasingRegistry, key: &str) -> Result<Self, CommandError> {
        let easing = registry.resolve(key)?;
        Ok(Self::with_instance(track, easing))
    }

    /// Switch to an already configured instance
    pub fn with_instance(track: &Arc<KeyframeTrack<V>>, easing: Arc<dyn Easing>) -> Self {
        Self {
            track: TrackHandle::new(track),
            before: track.easing(),
            description: format!("Change Easing to {} ({})", easing.key(), track.metadata().name),
            after: easing,
        }
    }
}

impl<V: Animatable> TrackCommand for ChangeEasingCommand<V> {
    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&mut self) -> Result<(), CommandError> {
        self.track.get()?.set_easing(Arc::clone(&self.after));
        Ok(())
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        self.track.get()?.set_easing(Arc::clone(&self.before));
        Ok(())
    }
}
