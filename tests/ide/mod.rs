//! IDE feature tests
//!
//! Tests for:
//! - Keyword resolution and shadowing
//! - Find usages of keywords and variables
//! - Keyword info for content assist

pub mod tests_occurrences;
pub mod tests_resolution;
