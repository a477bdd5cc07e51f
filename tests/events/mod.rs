//! Notification bus tests
//!
//! Tests for:
//! - Topic hierarchy and delivery order
//! - Handlers reading the tree while notifications are published
//! - Handler failures and double faults

pub mod tests_bus;
