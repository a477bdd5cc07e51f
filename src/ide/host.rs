//! ProjectHost, owner of the forest, the history and the bus.
//!
//! All mutations go through the host, one at a time: `execute`, `undo` and
//! `redo` take `&mut self`. A command runs in four steps:
//!
//! ```text
//! plan      ← upgradable read lock, nothing changes
//!   │
//! apply     ← write lock, all edits or none
//!   │
//! record    ← undo / redo stacks
//!   │
//! publish   ← no lock held, handlers see the finished tree
//! ```

use std::path::Path;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};

use crate::base::NodeId;
use crate::edit::{Command, CommandError, History};
use crate::events::{Message, NotificationBus, Payload, topics};
use crate::hir::{DocumentForest, ForestError, NodeKind};
use crate::project::{
    DocumentParser, LoadError, LoadObserver, LoadReport, Loader, ProjectOptions, SaveError,
    Serializer, save_documents,
};
use crate::syntax::{DocumentKind, ParsedDocument};

use super::analysis::Analysis;

/// Owns the document forest and serializes every mutation of it.
#[derive(Debug)]
pub struct ProjectHost {
    forest: Arc<RwLock<DocumentForest>>,
    history: History,
    bus: Arc<NotificationBus>,
    options: ProjectOptions,
}

impl Default for ProjectHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectHost {
    pub fn new() -> Self {
        Self::with_options(ProjectOptions::default())
    }

    pub fn with_options(options: ProjectOptions) -> Self {
        Self::from_forest(DocumentForest::new(), options)
    }

    pub fn from_forest(forest: DocumentForest, options: ProjectOptions) -> Self {
        Self {
            forest: Arc::new(RwLock::new(forest)),
            history: History::new(options.undo_limit),
            bus: Arc::new(NotificationBus::new()),
            options,
        }
    }

    /// Publish on a bus shared with other components.
    pub fn with_bus(mut self, bus: Arc<NotificationBus>) -> Self {
        self.bus = bus;
        self
    }

    pub fn bus(&self) -> &Arc<NotificationBus> {
        &self.bus
    }

    pub fn options(&self) -> &ProjectOptions {
        &self.options
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Shared handle for readers outside the host, such as notification
    /// handlers. Handlers run with no lock held and may read freely.
    pub fn forest_handle(&self) -> Arc<RwLock<DocumentForest>> {
        Arc::clone(&self.forest)
    }

    /// Get a consistent snapshot for queries.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis::new(self.forest.read(), &self.options)
    }

    /// Add a parsed document outside of any command. Not undoable.
    pub fn install(&mut self, parent: Option<NodeId>, document: ParsedDocument) -> Result<NodeId, ForestError> {
        self.forest.write().install(parent, document)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Plan and apply `command` as one undo entry, then publish its
    /// notifications.
    ///
    /// A command that plans no edits changes nothing and is not recorded.
    pub fn execute<C: Command + ?Sized>(&mut self, command: &mut C) -> Result<(), CommandError> {
        let guard = self.forest.upgradable_read();
        let transaction = command.plan(&guard, &self.options)?;
        if transaction.is_empty() {
            tracing::debug!("[HOST] '{}' changed nothing", command.name());
            return Ok(());
        }
        let mut forest = RwLockUpgradableReadGuard::upgrade(guard);
        transaction.apply(&mut forest)?;
        drop(forest);

        let notifications = transaction.notifications();
        self.history.record(transaction);
        self.publish(&notifications)
    }

    /// Revert the most recent transaction.
    pub fn undo(&mut self) -> Result<(), CommandError> {
        let transaction = self.history.pop_undo().ok_or(CommandError::NoOp("undo"))?;
        let inverse = transaction.inverse();
        if let Err(error) = inverse.apply(&mut self.forest.write()) {
            self.history.push_undo(transaction);
            return Err(error);
        }
        tracing::debug!("[HOST] undid '{}'", transaction.label());
        self.history.push_redo(transaction);
        self.publish(&inverse.notifications())
    }

    /// Re-apply the most recently undone transaction.
    pub fn redo(&mut self) -> Result<(), CommandError> {
        let transaction = self.history.pop_redo().ok_or(CommandError::NoOp("redo"))?;
        if let Err(error) = transaction.apply(&mut self.forest.write()) {
            self.history.push_redo(transaction);
            return Err(error);
        }
        tracing::debug!("[HOST] redid '{}'", transaction.label());
        let notifications = transaction.notifications();
        self.history.push_undo(transaction);
        self.publish(&notifications)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Deliver every notification even after a double fault; the first
    /// fault is returned once all have been published.
    fn publish(&self, messages: &[Message]) -> Result<(), CommandError> {
        let mut first_fault = None;
        for message in messages {
            if let Err(fault) = self.bus.publish(message) {
                first_fault.get_or_insert(fault);
            }
        }
        match first_fault {
            Some(fault) => Err(fault.into()),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Load and save
    // ========================================================================

    /// Replace the forest with the documents at `path`.
    ///
    /// The library catalog is kept and the history cleared. The current
    /// forest is untouched if the load fails or is cancelled.
    pub fn load(
        &mut self,
        path: &Path,
        parser: &dyn DocumentParser,
        observer: &mut dyn LoadObserver,
    ) -> Result<LoadReport, LoadError> {
        let libraries = self.forest.read().libraries().clone();
        let (forest, report) = Loader::new(parser, &self.options)
            .with_libraries(libraries)
            .load(path, observer)?;
        let source = forest.document(report.root).and_then(|d| d.source.clone());
        let is_resource = forest.kind(report.root) == Some(NodeKind::Resource);
        *self.forest.write() = forest;
        self.history.clear();

        let message = if is_resource {
            Message::new(
                topics::OPEN_RESOURCE,
                Payload::OpenResource {
                    document: report.root,
                    path: source,
                },
            )
        } else {
            Message::new(
                topics::OPEN_SUITE,
                Payload::OpenSuite {
                    document: report.root,
                    path: source,
                },
            )
        };
        if let Err(fault) = self.bus.publish(&message) {
            tracing::error!("[HOST] {}", fault);
        }
        Ok(report)
    }

    /// Add a resource document to the current forest and announce it.
    pub fn open_resource(&mut self, document: ParsedDocument) -> Result<NodeId, CommandError> {
        let source = document.source.clone();
        let id = self
            .forest
            .write()
            .install(
                None,
                ParsedDocument {
                    kind: DocumentKind::Resource,
                    ..document
                },
            )
            .map_err(|e| CommandError::invalid(e.to_string()))?;
        self.bus.publish(&Message::new(
            topics::OPEN_RESOURCE,
            Payload::OpenResource {
                document: id,
                path: source,
            },
        ))?;
        Ok(id)
    }

    /// Save `target`'s document, or every dirty document.
    pub fn save(&self, serializer: &dyn Serializer, target: Option<NodeId>) -> Result<Vec<NodeId>, SaveError> {
        save_documents(&self.forest, &self.bus, serializer, target)
    }

    pub fn is_dirty(&self, node: NodeId) -> bool {
        self.forest.read().is_dirty(node)
    }
}
