//! Read-only snapshot for queries.
//!
//! An [`Analysis`] holds a read lock on the forest for its lifetime, so
//! every query made through one snapshot sees the same tree, and no
//! mutation can start until the snapshot is dropped.
//!
//! ## Usage
//!
//! ```ignore
//! let analysis = host.analysis();
//! let resolution = analysis.resolve_keyword(test, "Log In");
//! for occurrence in analysis.find_occurrences(Some(test), "Log In") {
//!     println!("{} {}", occurrence.location, occurrence.usage);
//! }
//! ```

use parking_lot::RwLockReadGuard;

use crate::base::NodeId;
use crate::hir::{DocumentForest, KeywordInfo, Resolution, Resolver, VariableResolution};
use crate::project::ProjectOptions;

use super::occurrences::{Occurrences, find_occurrences, find_variable_occurrences};

/// Consistent view of the forest for resolution and search.
pub struct Analysis<'a> {
    forest: RwLockReadGuard<'a, DocumentForest>,
    options: &'a ProjectOptions,
}

impl<'a> Analysis<'a> {
    pub(crate) fn new(forest: RwLockReadGuard<'a, DocumentForest>, options: &'a ProjectOptions) -> Self {
        Self { forest, options }
    }

    pub fn forest(&self) -> &DocumentForest {
        &self.forest
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.forest)
    }

    pub fn resolve_keyword(&self, context: NodeId, name: &str) -> Resolution {
        self.resolver().resolve_keyword(context, name)
    }

    pub fn resolve_variable(&self, context: NodeId, variable: &str, row: Option<usize>) -> VariableResolution {
        self.resolver().resolve_variable(context, variable, row)
    }

    pub fn is_user_keyword(&self, context: NodeId, name: &str) -> bool {
        self.resolver().is_user_keyword(context, name)
    }

    pub fn keyword_info(&self, context: NodeId, name: &str) -> Option<KeywordInfo> {
        self.resolver().keyword_info(context, name)
    }

    /// Keywords for content assist, in precedence order.
    pub fn visible_keywords(&self, context: NodeId) -> Vec<KeywordInfo> {
        self.resolver().visible_keywords(context)
    }

    pub fn import_closure(&self, document: NodeId) -> Vec<NodeId> {
        self.resolver().import_closure(document)
    }

    /// Usages of keyword `name` as seen from `context`, using the
    /// configured keyword-argument rules.
    pub fn find_occurrences(&self, context: Option<NodeId>, name: &str) -> Occurrences<'_> {
        find_occurrences(&self.forest, &self.options.keyword_arguments, context, name)
    }

    pub fn find_variable_occurrences(&self, context: Option<NodeId>, variable: &str) -> Occurrences<'_> {
        find_variable_occurrences(&self.forest, context, variable)
    }
}
