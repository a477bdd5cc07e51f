//! Command engine tests
//!
//! Tests for:
//! - Keyword rename across files, with undo and redo
//! - Grid commands and their undo entries
//! - History limits and empty-stack behavior

pub mod tests_grid;
pub mod tests_history;
pub mod tests_rename;
