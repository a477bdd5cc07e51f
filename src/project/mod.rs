//! Project loading, saving and configuration.
//!
//! Parsing and writing files are collaborators: a [`DocumentParser`] turns
//! one file into a [`ParsedDocument`](crate::syntax::ParsedDocument), a
//! [`Serializer`] writes one document back. This module discovers files,
//! runs the parser on a worker thread, assembles the forest and tracks
//! which documents need saving.
//!
//! ## Key Types
//!
//! - [`ProjectOptions`] - Undo limit, poll interval, data extensions, keyword-argument rules
//! - [`Loader`] - Background load with progress and cancellation
//! - [`save_documents`] - Save one or all dirty documents
//! - [`DataError`] / [`LoadError`] / [`SerializationError`] / [`SaveError`]

mod error;
mod loader;
mod options;
mod save;

pub use error::{DataError, LoadError, SaveError, SerializationError};
pub use loader::{
    DocumentParser, LoadObserver, LoadProgress, LoadReport, Loader, NullLoadObserver,
};
pub use options::ProjectOptions;
pub use save::{Serializer, save_documents};
