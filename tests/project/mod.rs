//! Project tests
//!
//! Tests for:
//! - Loading a directory tree through the host
//! - Cancelling a load
//! - Saving dirty documents

pub mod fixtures;
pub mod tests_load;
pub mod tests_save;
