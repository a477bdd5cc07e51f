//! Foundation types for the RIDE core.
//!
//! This module provides fundamental types used throughout the engine:
//! - [`NodeId`] - Arena identifiers for document-tree nodes
//! - [`CellPos`], [`Area`] - Grid coordinates for step editing
//! - [`NormalizedName`] - Case- and whitespace-insensitive names
//! - Variable syntax scanning (`${x}`, `@{x}`, `&{x}`, `%{x}`)
//! - Domain constants (BDD prefixes, built-in keywords and variables)
//!
//! This module has NO dependencies on other ride modules.

pub mod constants;
mod name;
mod node_id;
mod position;
pub mod variables;

pub use name::{
    KeywordMatch, NormalizedName, eq_names, match_keyword_cell, normalize, split_bdd_prefix,
    split_qualified,
};
pub use node_id::NodeId;
pub use position::{Area, CellPos};
pub use variables::{VariableKey, VariableRef, find_variables};
