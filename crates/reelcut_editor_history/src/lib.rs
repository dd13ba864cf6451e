// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo for keyframe editing in `Reelcut` Editor.
//!
//! Every edit the timeline UI makes to a keyframe track goes through a
//! [`TrackCommand`]. Commands validate their arguments when built, capture
//! the state they need to revert, and are recorded by a [`CommandHistory`].

pub mod command;
pub mod commands;
pub mod history;

pub use command::{CommandError, TrackCommand};
pub use commands::{
    AddKeyframeCommand, ChangeEasingCommand, ChangeValueCommand, CommandGroup, MoveKeyframeCommand,
    RemoveKeyframeCommand,
};
pub use history::{CommandHistory, HistoryError, HistoryStats, MAX_HISTORY};
