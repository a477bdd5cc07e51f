//! Errors of the command engine.

use thiserror::Error;

use crate::base::NodeId;
use crate::events::DoubleFault;
use crate::hir::FieldError;

#[derive(Debug, Error)]
pub enum CommandError {
    /// Undo or redo with an empty stack.
    #[error("Nothing to {0}")]
    NoOp(&'static str),

    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    /// The command does not apply to the tree as it is now. Nothing was
    /// changed.
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    #[error(transparent)]
    Field(#[from] FieldError),

    /// The change was applied but a log handler failed while notifications
    /// were delivered.
    #[error(transparent)]
    DoubleFault(#[from] DoubleFault),
}

impl CommandError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidEdit(message.into())
    }
}
