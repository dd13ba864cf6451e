// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in track commands.

mod easing;
mod group;
mod keyframe;
mod value;

pub use easing::ChangeEasingCommand;
pub use group::CommandGroup;
pub use keyframe::{AddKeyframeCommand, MoveKeyframeCommand, RemoveKeyframeCommand};
pub use value::ChangeValueCommand;
