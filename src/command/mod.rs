mod commands;
mod history;

use thiserror::Error;

use crate::layer::LayerId;

pub use commands::Command;
pub use history::CommandHistory;

/// Result type for command operations
pub type CommandResult<T = ()> = Result<T, CommandError>;

/// Reasons a command leaves the document untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{0} not found")]
    LayerNotFound(LayerId),

    #[error("cannot delete the last remaining layer")]
    LastLayer,

    #[error("path has {0} point(s), at least 2 are needed")]
    DegeneratePath(usize),
}
