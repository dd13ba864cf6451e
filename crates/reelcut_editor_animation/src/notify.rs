// SPDX-License-Identifier: MIT OR Apache-2.0
//! Change notifications raised by track mutations.
//!
//! Events only carry index bookkeeping for parallel UI-side lists; listeners
//! that need values read them back from the track.

use crate::keyframe::Frame;
use crate::track::TrackId;
use std::sync::mpsc;

/// A change applied to a track. Indices are value-array indices.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEvent {
    /// A keyframe was inserted
    KeyframeAdded {
        /// Track that changed
        track: TrackId,
        /// Local frame of the new keyframe
        frame: Frame,
        /// Value index of the new keyframe
        index: usize,
    },
    /// A keyframe was removed
    KeyframeRemoved {
        /// Track that changed
        track: TrackId,
        /// Value index the keyframe had
        index: usize,
    },
    /// A keyframe changed position
    KeyframeMoved {
        /// Track that changed
        track: TrackId,
        /// Previous value index
        from: usize,
        /// New value index
        to: usize,
    },
    /// A value was replaced in place
    ValueChanged {
        /// Track that changed
        track: TrackId,
        /// Value index
        index: usize,
    },
    /// The easing strategy was swapped
    EasingChanged {
        /// Track that changed
        track: TrackId,
        /// Key of the new strategy
        key: String,
    },
    /// The whole track state was replaced (e.g. loaded from a document)
    Reloaded {
        /// Track that changed
        track: TrackId,
    },
}

impl TrackEvent {
    /// Track the event belongs to
    pub fn track(&self) -> TrackId {
        match self {
            Self::KeyframeAdded { track, .. }
            | Self::KeyframeRemoved { track, .. }
            | Self::KeyframeMoved { track, .. }
            | Self::ValueChanged { track, .. }
            | Self::EasingChanged { track, .. }
            | Self::Reloaded { track } => *track,
        }
    }
}

/// Receiver of track change events.
///
/// Called on the mutating thread after the new state is published.
pub trait ChangeNotifier: Send + Sync {
    /// Handle one event
    fn notify(&self, event: &TrackEvent);
}

impl<F> ChangeNotifier for F
where
    F: Fn(&TrackEvent) + Send + Sync,
{
    fn notify(&self, event: &TrackEvent) {
        self(event);
    }
}

/// Forwards events over an `mpsc` channel so another thread can drain them
pub struct ChannelNotifier {
    sender: mpsc::Sender<TrackEvent>,
}

impl ChannelNotifier {
    /// Create a new notifier and return `(notifier, receiver)`
    pub fn new() -> (Self, mpsc::Receiver<TrackEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl ChangeNotifier for ChannelNotifier {
    fn notify(&self, event: &TrackEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.sender.send(event.clone());
    }
}
