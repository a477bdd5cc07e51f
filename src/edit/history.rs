//! Undo and redo stacks.

use std::collections::VecDeque;

use super::transaction::Transaction;

/// Executed transactions available for undo, and undone ones available
/// for redo.
///
/// ```text
///   record(t) ──► undo stack ── undo ──► redo stack
///                     ▲                      │
///                     └──────── redo ────────┘
/// ```
///
/// Recording a new transaction discards the redo stack. When the undo
/// stack is over its limit the oldest entry is dropped.
#[derive(Clone, Debug, Default)]
pub struct History {
    undo: VecDeque<Transaction>,
    redo: Vec<Transaction>,
    limit: Option<usize>,
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Record an executed transaction.
    pub fn record(&mut self, transaction: Transaction) {
        self.redo.clear();
        self.push_undo(transaction);
    }

    pub(crate) fn push_undo(&mut self, transaction: Transaction) {
        self.undo.push_back(transaction);
        if let Some(limit) = self.limit {
            while self.undo.len() > limit {
                if let Some(dropped) = self.undo.pop_front() {
                    tracing::trace!("[HISTORY] dropped '{}'", dropped.label());
                }
            }
        }
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Transaction> {
        self.undo.pop_back()
    }

    pub(crate) fn push_redo(&mut self, transaction: Transaction) {
        self.redo.push(transaction);
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Transaction> {
        self.redo.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Label of the transaction the next undo reverts.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo.back().map(Transaction::label)
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(Transaction::label)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
