// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persisted form of a keyframe track.
//!
//! A track is stored as its frames, its values and a descriptor of the
//! active easing. RON is used for human-readable project files and bincode
//! for compact clipboard/undo payloads.

use crate::easing::{EasingDescriptor, EasingRegistry};
use crate::error::TrackError;
use crate::keyframe::{Animatable, Frame, Keyframe};
use crate::notify::TrackEvent;
use crate::track::{KeyframeTrack, TrackState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current persisted track format version
pub const PERSISTED_TRACK_VERSION: u32 = 1;

/// Errors raised while saving or loading a track
#[derive(Debug, Error)]
pub enum PersistError {
    /// RON serialization failed
    #[error("RON serialization error: {0}")]
    RonWrite(#[from] ron::Error),

    /// RON text could not be parsed
    #[error("RON parse error: {0}")]
    RonRead(#[from] ron::error::SpannedError),

    /// Binary encoding failed
    #[error("Binary serialization error: {0}")]
    Binary(#[from] bincode::Error),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document was written by a newer format version
    #[error("Track format version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the document
        found: u32,
        /// Newest version this build understands
        supported: u32,
    },

    /// The document's contents cannot form a track
    #[error(transparent)]
    Track(#[from] TrackError),
}

/// Serializable contents of a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "V: Animatable")]
pub struct PersistedTrack<V: Animatable> {
    /// Format version
    pub version: u32,
    /// Keyframe frames, strictly ascending
    pub frames: Vec<Frame>,
    /// Values, one more than frames
    pub values: Vec<V>,
    /// Active easing
    pub easing: EasingDescriptor,
}

impl<V: Animatable> PersistedTrack<V> {
    /// Capture a snapshot
    pub fn from_state(state: &TrackState<V>) -> Self {
        Self {
            version: PERSISTED_TRACK_VERSION,
            frames: state.frames(),
            values: state.values(),
            easing: EasingDescriptor::of(state.easing().as_ref()),
        }
    }

    /// Check the structural invariants of the stored arrays
    pub fn validate(&self) -> Result<(), PersistError> {
        if self.version > PERSISTED_TRACK_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: self.version,
                supported: PERSISTED_TRACK_VERSION,
            });
        }
        if self.values.len() != self.frames.len() + 1 {
            return Err(TrackError::InvalidMetadata(format!(
                "{} values stored for {} frames",
                self.values.len(),
                self.frames.len()
            ))
            .into());
        }
        if let Some(&frame) = self.frames.iter().find(|&&f| f <= 0) {
            return Err(TrackError::InvalidMetadata(format!("frame {frame} is not positive")).into());
        }
        if self.frames.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TrackError::InvalidMetadata("frames are not strictly ascending".to_string()).into());
        }
        Ok(())
    }

    /// Pretty RON text
    pub fn to_ron(&self) -> Result<String, PersistError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Parse RON text
    pub fn from_ron(text: &str) -> Result<Self, PersistError> {
        Ok(ron::from_str(text)?)
    }

    /// Compact binary encoding
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode the binary encoding
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Write RON text to a file
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Read RON text from a file
    pub fn load(path: &Path) -> Result<Self, PersistError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }
}

impl<V: Animatable> KeyframeTrack<V> {
    /// Capture the current keyframes and easing
    pub fn to_persisted(&self) -> PersistedTrack<V> {
        PersistedTrack::from_state(&self.snapshot())
    }

    /// Replace the track contents with a persisted document.
    ///
    /// An easing key the registry does not know falls back to the registry's
    /// first entry. Frames at or beyond the owner's current length are kept;
    /// evaluation clamps to the owner bounds.
    pub fn load_persisted(
        &self,
        document: &PersistedTrack<V>,
        registry: &EasingRegistry,
    ) -> Result<(), PersistError> {
        document.validate()?;

        let easing = match registry.restore(&document.easing) {
            Ok(easing) => easing,
            Err(TrackError::EasingNotFound(key)) => {
                let fallback = registry
                    .fallback()
                    .ok_or_else(|| TrackError::EasingNotFound(key.clone()))?;
                tracing::warn!(
                    "Easing {key} is not registered; track {:?} falls back to {}",
                    self.id(),
                    fallback.key()
                );
                fallback
            }
            Err(err) => return Err(err.into()),
        };

        let limits = &self.metadata().limits;
        let mut values = document.values.iter().cloned();
        let boundary = values.next().map(|v| v.constrain(limits));
        let Some(boundary) = boundary else {
            return Err(TrackError::InvalidMetadata("no values stored".to_string()).into());
        };

        let mut state = TrackState::new(boundary, easing);
        state.records.extend(
            document
                .frames
                .iter()
                .zip(values)
                .map(|(&frame, value)| Keyframe::new(frame, value.constrain(limits))),
        );
        self.replace_state(state);

        tracing::debug!(
            "Track {:?} reloaded with {} keyframes",
            self.id(),
            document.frames.len()
        );
        self.emit(TrackEvent::Reloaded { track: self.id() });
        Ok(())
    }
}
