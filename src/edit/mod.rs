//! Command and transaction engine.
//!
//! Mutations are two-phase. A [`Command`] first plans a [`Transaction`]
//! against the current tree without changing it; the transaction is then
//! applied as a whole, recorded in the [`History`], and only afterwards
//! are its notifications published. Handlers therefore never observe a
//! half-applied change.
//!
//! ## Key Types
//!
//! - [`Command`] - Plans a transaction from the current tree
//! - [`Transaction`] / [`Edit`] - Reversible, all-or-nothing changes
//! - [`History`] - Undo and redo stacks with an optional limit
//! - [`RenameKeywordOccurrences`] - Rename a keyword across the forest
//! - [`ChangeCellValue`], [`ClearArea`], [`PasteArea`], [`InsertRows`], [`DeleteRows`] - Grid commands
//! - [`ChangeField`] - Set a name, setting, step or variable field

mod command;
mod error;
mod grid;
mod history;
mod rename;
mod transaction;

pub use command::{ChangeField, Command};
pub use error::CommandError;
pub use grid::{ChangeCellValue, ClearArea, DeleteRows, InsertRows, PasteArea, copy_area};
pub use history::History;
pub use rename::{NullObserver, RenameKeywordOccurrences, RenameObserver};
pub use transaction::{Edit, Transaction};
