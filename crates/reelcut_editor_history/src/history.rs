// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history of track commands.

use crate::command::{CommandError, TrackCommand};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// Maximum undo history depth
pub const MAX_HISTORY: usize = 100;

/// History errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// A command failed
    #[error("Command error: {0}")]
    Command(#[from] CommandError),
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// History statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Total commands in undo stack
    pub undo_count: usize,
    /// Total commands in redo stack
    pub redo_count: usize,
    /// Commands executed since creation
    pub executed: u64,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Undo/redo history manager
pub struct CommandHistory {
    /// Undo stack
    undo_stack: VecDeque<Box<dyn TrackCommand>>,
    /// Redo stack
    redo_stack: VecDeque<Box<dyn TrackCommand>>,
    /// Commands executed since creation
    executed: u64,
    /// Maximum history depth
    max_depth: usize,
}

impl CommandHistory {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            executed: 0,
            max_depth,
        }
    }

    /// Execute a command and record it.
    ///
    /// A command that fails is not recorded and leaves the redo stack intact.
    pub fn execute(&mut self, mut command: Box<dyn TrackCommand>) -> Result<()> {
        command.execute()?;
        tracing::debug!("Executed '{}'", command.description());

        self.executed += 1;
        self.redo_stack.clear();
        self.undo_stack.push_back(command);

        // Enforce history limit
        while self.undo_stack.len() > self.max_depth {
            if let Some(old) = self.undo_stack.pop_front() {
                tracing::trace!("History full, dropping '{}'", old.description());
            }
        }

        Ok(())
    }

    /// Undo the last command
    pub fn undo(&mut self) -> Result<()> {
        let mut command = self
            .undo_stack
            .pop_back()
            .ok_or(HistoryError::NothingToUndo)?;

        if let Err(err) = command.undo() {
            tracing::warn!("Undo of '{}' failed: {err}", command.description());
            self.undo_stack.push_back(command);
            return Err(err.into());
        }

        tracing::debug!("Undid '{}'", command.description());
        self.redo_stack.push_back(command);
        Ok(())
    }

    /// Redo the last undone command
    pub fn redo(&mut self) -> Result<()> {
        let mut command = self
            .redo_stack
            .pop_back()
            .ok_or(HistoryError::NothingToRedo)?;

        if let Err(err) = command.redo() {
            tracing::warn!("Redo of '{}' failed: {err}", command.description());
            self.redo_stack.push_back(command);
            return Err(err.into());
        }

        tracing::debug!("Redid '{}'", command.description());
        self.undo_stack.push_back(command);
        Ok(())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get undo stack depth
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get redo stack depth
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.undo_stack.len(),
            redo_count: self.redo_stack.len(),
            executed: self.executed,
            max_depth: self.max_depth,
        }
    }

    /// Get description of next undo command
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.description())
    }

    /// Get description of next redo command
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|c| c.description())
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHistory")
            .field("undo", &self.undo_stack.iter().map(|c| c.description()).collect::<Vec<_>>())
            .field("redo", &self.redo_stack.iter().map(|c| c.description()).collect::<Vec<_>>())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
