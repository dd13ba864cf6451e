// SPDX-License-Identifier: MIT OR Apache-2.0
//! Commands applied and reverted as one history entry.

use crate::command::{CommandError, TrackCommand};

/// Group of commands that are undone/redone together
pub struct CommandGroup {
    description: String,
    commands: Vec<Box<dyn TrackCommand>>,
}

impl CommandGroup {
    /// Create an empty group
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            commands: Vec::new(),
        }
    }

    /// Append a command
    pub fn push(&mut self, command: Box<dyn TrackCommand>) {
        self.commands.push(command);
    }

    /// Builder form of [`Self::push`]
    pub fn with(mut self, command: impl TrackCommand + 'static) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    /// Number of commands in the group
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the group holds no commands
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Revert the first `count` commands, last first
    fn rollback(&mut self, count: usize) {
        for command in self.commands[..count].iter_mut().rev() {
            if let Err(err) = command.undo() {
                tracing::warn!("Rollback of '{}' failed: {err}", command.description());
            }
        }
    }
}

impl TrackCommand for CommandGroup {
    fn description(&self) -> &str {
        &self.description
    }

    /// Applies every command in order. If one fails, those already applied
    /// are reverted and the error is returned.
    fn execute(&mut self) -> Result<(), CommandError> {
        for i in 0..self.commands.len() {
            if let Err(err) = self.commands[i].execute() {
                self.rollback(i);
                return Err(err);
            }
        }
        Ok(())
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        for command in self.commands.iter_mut().rev() {
            command.undo()?;
        }
        Ok(())
    }
}
