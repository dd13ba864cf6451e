// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for keyframe tracks.

use crate::keyframe::Frame;
use thiserror::Error;

/// Errors raised by track construction, mutation and evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// Frame outside the owner's open interval `(0, length)`
    #[error("Frame {frame} is outside the open interval (0, {length})")]
    BoundaryViolation {
        /// Rejected local frame
        frame: Frame,
        /// Owner length at the time of the check
        length: Frame,
    },

    /// Keyframe or value index out of range
    #[error("Index {index} is out of range (len {len})")]
    IndexOutOfRange {
        /// Rejected index
        index: usize,
        /// Length of the indexed sequence
        len: usize,
    },

    /// No easing registered under this key
    #[error("No easing function named {0} was found")]
    EasingNotFound(String),

    /// Construction metadata or persisted data is unusable
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// A keyframe already sits on this frame
    #[error("A keyframe already exists at frame {0}")]
    FrameOccupied(Frame),

    /// The owning element has no frames to evaluate over
    #[error("Owner has empty bounds (length {0})")]
    EmptyOwnerBounds(Frame),
}

/// Result type for track operations
pub type Result<T> = std::result::Result<T, TrackError>;
