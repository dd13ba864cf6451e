// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undoable track commands.
//!
//! Commands capture everything they need when constructed and hold their
//! track weakly, so a command left in the history never keeps a deleted
//! clip's tracks alive.

use reelcut_editor_animation::{Animatable, KeyframeTrack, TrackError};
use std::sync::{Arc, Weak};
use thiserror::Error;

/// Trait for track edits that can be undone/redone
pub trait TrackCommand: Send + Sync {
    /// Get a description of this command
    fn description(&self) -> &str;

    /// Apply the edit. Applying an already applied command changes nothing.
    fn execute(&mut self) -> Result<(), CommandError>;

    /// Revert the edit using the state captured at construction
    fn undo(&mut self) -> Result<(), CommandError>;

    /// Re-apply after an undo
    fn redo(&mut self) -> Result<(), CommandError> {
        self.execute()
    }
}

/// Error type for command construction and execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// The track rejected the edit
    #[error("Track error: {0}")]
    Track(#[from] TrackError),

    /// The target track no longer exists
    #[error("Target track was dropped")]
    TrackDropped,

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Weak handle to the track a command edits
pub(crate) struct TrackHandle<V: Animatable> {
    track: Weak<KeyframeTrack<V>>,
}

impl<V: Animatable> TrackHandle<V> {
    pub(crate) fn new(track: &Arc<KeyframeTrack<V>>) -> Self {
        Self {
            track: Arc::downgrade(track),
        }
    }

    pub(crate) fn get(&self) -> Result<Arc<KeyframeTrack<V>>, CommandError> {
        self.track.upgrade().ok_or(CommandError::TrackDropped)
    }
}
