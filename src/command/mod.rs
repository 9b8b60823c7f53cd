mod commands;
mod context;
pub mod history;

use thiserror::Error;

use crate::error::{SceneError, ValidationError};

pub use commands::Command;
pub use context::CommandContext;
pub use history::{HistoryEntry, HistoryStack};

/// What a successful command did to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

impl Outcome {
    pub fn changed(&self) -> bool {
        matches!(self, Outcome::Changed)
    }
}

/// Result type for command operations
pub type CommandResult = Result<Outcome, CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
