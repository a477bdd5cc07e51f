//! Error types for loading and saving documents.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::base::NodeId;
use crate::events::DoubleFault;
use crate::hir::ForestError;

/// A document is missing, unreadable or not valid test data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid data file '{}': {message}", .path.display())]
pub struct DataError {
    pub path: PathBuf,
    pub message: String,
}

impl DataError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an error from a failed filesystem operation.
    pub fn io(path: &Path, error: &std::io::Error) -> Self {
        Self::new(path, error.to_string())
    }

    /// Create an error for a path that is neither a data file nor a
    /// directory containing test data.
    pub fn no_test_data(path: &Path) -> Self {
        Self::new(path, "no test data found")
    }
}

/// Errors that stop a load as a whole.
///
/// Invalid files below the loaded path do not stop it; they are collected
/// in [`LoadReport::errors`](super::LoadReport).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The loaded path itself is invalid.
    #[error(transparent)]
    Data(#[from] DataError),

    /// The observer asked to stop. Nothing was installed.
    #[error("Loading was cancelled")]
    Cancelled,

    #[error("Loader worker panicked")]
    WorkerPanicked,

    #[error("Cannot assemble document tree: {0}")]
    Forest(#[from] ForestError),
}

/// One document could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot save '{name}': {message}")]
pub struct SerializationError {
    pub document: NodeId,
    pub name: String,
    pub path: Option<PathBuf>,
    pub message: String,
}

impl SerializationError {
    pub fn new(document: NodeId, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            document,
            name: name.into(),
            path: None,
            message: message.into(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Errors returned by a save.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Every document that failed; the others were saved.
    #[error("{} document(s) could not be saved", .0.len())]
    Serialization(Vec<SerializationError>),

    #[error(transparent)]
    DoubleFault(#[from] DoubleFault),
}

impl SaveError {
    /// Per-document failures, empty for a double fault.
    pub fn failures(&self) -> &[SerializationError] {
        match self {
            Self::Serialization(failures) => failures,
            Self::DoubleFault(_) => &[],
        }
    }
}
