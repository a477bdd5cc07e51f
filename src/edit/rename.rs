//! Renaming a keyword everywhere it is used.

use rustc_hash::FxHashSet;

use crate::base::NodeId;
use crate::hir::{DocumentForest, Field};
use crate::ide::{Occurrence, find_occurrences};
use crate::project::ProjectOptions;

use super::command::Command;
use super::error::CommandError;
use super::transaction::{Edit, Transaction};

/// Follows a rename while it is planned.
pub trait RenameObserver {
    /// Called for each occurrence that will be rewritten.
    fn notify(&mut self, _occurrence: &Occurrence) {}

    /// Called once planning is done, with the number of fields rewritten.
    fn finish(&mut self, _renamed: usize) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl RenameObserver for NullObserver {}

impl<T: RenameObserver + ?Sized> RenameObserver for &mut T {
    fn notify(&mut self, occurrence: &Occurrence) {
        (**self).notify(occurrence);
    }

    fn finish(&mut self, renamed: usize) {
        (**self).finish(renamed);
    }
}

/// Rename keyword `old` to `new` in every occurrence, including the
/// keyword's own definition.
///
/// Occurrences are searched once, against the tree before the rename.
/// Each rewritten field keeps its BDD prefix and library or resource
/// qualifier; only the name part changes.
pub struct RenameKeywordOccurrences<O = NullObserver> {
    context: Option<NodeId>,
    old: String,
    new: String,
    observer: O,
}

impl RenameKeywordOccurrences<NullObserver> {
    /// Rename as seen from `context`; `None` renames every textual match.
    pub fn new(context: Option<NodeId>, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            context,
            old: old.into(),
            new: new.into(),
            observer: NullObserver,
        }
    }
}

impl<O: RenameObserver> RenameKeywordOccurrences<O> {
    pub fn with_observer<P: RenameObserver>(self, observer: P) -> RenameKeywordOccurrences<P> {
        RenameKeywordOccurrences {
            context: self.context,
            old: self.old,
            new: self.new,
            observer,
        }
    }
}

impl<O: RenameObserver> Command for RenameKeywordOccurrences<O> {
    fn name(&self) -> &str {
        "Rename keyword"
    }

    fn plan(
        &mut self,
        forest: &DocumentForest,
        options: &ProjectOptions,
    ) -> Result<Transaction, CommandError> {
        let new = self.new.trim();
        if new.is_empty() {
            return Err(CommandError::invalid("new keyword name is empty"));
        }
        let occurrences: Vec<Occurrence> =
            find_occurrences(forest, &options.keyword_arguments, self.context, &self.old).collect();
        tracing::debug!(
            "[RENAME] '{}' -> '{}': {} occurrence(s)",
            self.old,
            new,
            occurrences.len()
        );

        let mut transaction = Transaction::new(format!("Rename '{}' to '{}'", self.old, new));
        let mut seen: FxHashSet<(NodeId, Field)> = FxHashSet::default();
        for occurrence in &occurrences {
            if !seen.insert((occurrence.item, occurrence.field.clone())) {
                continue;
            }
            let replaced = occurrence.replaced(new);
            if replaced == occurrence.value {
                continue;
            }
            self.observer.notify(occurrence);
            transaction.push(Edit::Field {
                node: occurrence.item,
                field: occurrence.field.clone(),
                old: occurrence.value.clone(),
                new: replaced,
            });
        }
        self.observer.finish(transaction.edits().len());
        Ok(transaction)
    }
}
