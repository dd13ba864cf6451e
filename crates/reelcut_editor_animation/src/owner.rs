// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline elements that own keyframe tracks.

use crate::keyframe::Frame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

/// Bounds of the element a track belongs to.
///
/// A track reads these on every evaluation and mutation, so the element
/// may be moved or resized without touching its tracks.
pub trait TimelineElement: fmt::Debug + Send + Sync {
    /// Absolute frame the element starts at
    fn start(&self) -> Frame;

    /// Number of frames the element spans
    fn length(&self) -> Frame;
}

/// Unique identifier for a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub Uuid);

impl ClipId {
    /// Create a new random clip ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

/// A clip on the timeline whose bounds can be changed while shared
#[derive(Debug)]
pub struct Clip {
    id: ClipId,
    start: AtomicI64,
    length: AtomicI64,
}

impl Clip {
    /// Create a clip spanning `length` frames from `start`
    pub fn new(start: Frame, length: Frame) -> Self {
        Self {
            id: ClipId::new(),
            start: AtomicI64::new(start),
            length: AtomicI64::new(length),
        }
    }

    /// Clip ID
    pub fn id(&self) -> ClipId {
        self.id
    }

    /// First frame after the clip
    pub fn end(&self) -> Frame {
        self.start() + self.length()
    }

    /// Move the clip to a new start frame
    pub fn set_start(&self, start: Frame) {
        self.start.store(start, Ordering::Release);
    }

    /// Resize the clip
    pub fn set_length(&self, length: Frame) {
        self.length.store(length, Ordering::Release);
    }

    /// Move the start of the clip while keeping its end.
    ///
    /// Returns `old_start - new_start`, the shift to pass to
    /// [`KeyframeTrack::rebase`](crate::track::KeyframeTrack::rebase) for
    /// each of the clip's tracks.
    pub fn trim_start(&self, start: Frame) -> Frame {
        let end = self.end();
        let old_start = self.start.swap(start, Ordering::AcqRel);
        self.length.store(end - start, Ordering::Release);
        old_start - start
    }
}

impl TimelineElement for Clip {
    fn start(&self) -> Frame {
        self.start.load(Ordering::Acquire)
    }

    fn length(&self) -> Frame {
        self.length.load(Ordering::Acquire)
    }
}
