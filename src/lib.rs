//! # ride-base
//!
//! Cross-reference and refactoring core for keyword-driven test suites:
//! a document tree, name resolution, occurrence search, transactional
//! rename with undo/redo, and a notification bus.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → ProjectHost, Analysis snapshots, occurrence search
//!   ↓
//! edit      → Commands, transactions, undo/redo history
//!   ↓
//! project   → Loading directories, saving dirty documents
//!   ↓
//! events    → Hierarchical topics, notification bus
//!   ↓
//! hir       → Document forest, keyword and variable resolution
//!   ↓
//! syntax    → Parsed documents: settings, steps, imports
//!   ↓
//! base      → Primitives (NodeId, NormalizedName, CellPos)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → hir → events → project → edit → ide)
// ============================================================================

/// Foundation types: NodeId, name normalization, variable syntax
pub mod base;

/// Syntax: parsed documents as handed over by a reader
pub mod syntax;

/// High-level IR: the document forest and the namespace resolver
pub mod hir;

/// Notification bus and topic hierarchy
pub mod events;

/// Project management: loading and saving
pub mod project;

/// Commands, transactions and history
pub mod edit;

/// IDE features: host, snapshots, find usages
pub mod ide;

// Re-export foundation types
pub use base::{Area, CellPos, NodeId, NormalizedName};
pub use ide::{Analysis, ProjectHost};
