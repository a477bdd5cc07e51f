//! High-level IR (HIR): the document forest and name resolution.
//!
//! The forest is an arena of [`Node`]s addressed by [`NodeId`](crate::base::NodeId).
//! Resolution runs directly over the forest at call time.
//!
//! ## Key Types
//!
//! - [`DocumentForest`] - Top-level suites, standalone resources, library catalog
//! - [`Node`] - Tagged variant over directory, suite, resource, test case, keyword
//! - [`Field`] - Address of one editable piece of text inside a node
//! - [`Resolver`] - Keyword and variable resolution with scope precedence
//! - [`KeywordArgumentRules`] - Which keyword arguments name other keywords
//!
//! ## Layers
//!
//! ```text
//! ParsedDocument            ← INPUT: parser output
//!     │
//!     ▼
//! DocumentForest::install   ← Arena nodes with parent links
//!     │
//!     ▼
//! Resolver::import_closure  ← Resources in scope, depth first
//!     │
//!     ▼
//! Resolver::resolve_*       ← Keyword / variable resolution
//! ```

mod field;
mod forest;
mod keyword_args;
mod library;
mod node;
mod resolve;

pub use field::{Field, FieldError};
pub use forest::{DocumentForest, ForestError};
pub(crate) use forest::normalize_path;
pub use keyword_args::{KeywordArgument, KeywordArgumentRules};
pub use library::{Library, LibraryCatalog};
pub use node::{Document, Macro, Node, NodeKind, NodeVisitor};
pub use resolve::{KeywordInfo, Resolution, Resolver, VariableResolution};
pub(crate) use resolve::variable_key;
