//! Saving documents through a serializer collaborator.
//!
//! The core only tracks dirty flags and publishes save notifications; the
//! [`Serializer`] writes the files. Each document is serialized under a
//! read lock, and no lock is held while notifications are delivered.

use parking_lot::RwLock;

use crate::base::NodeId;
use crate::events::{LogLevel, Message, NotificationBus, Payload, topics};
use crate::hir::DocumentForest;

use super::error::{SaveError, SerializationError};

/// Persists one document.
pub trait Serializer {
    fn serialize(&self, forest: &DocumentForest, document: NodeId) -> Result<(), SerializationError>;
}

impl<F> Serializer for F
where
    F: Fn(&DocumentForest, NodeId) -> Result<(), SerializationError>,
{
    fn serialize(&self, forest: &DocumentForest, document: NodeId) -> Result<(), SerializationError> {
        self(forest, document)
    }
}

/// Save `target`'s document, or every dirty document when `target` is `None`.
///
/// A document that fails does not stop the others. Failures are logged,
/// published on the log topic and returned together; documents that saved
/// are marked clean. Returns the saved documents.
pub fn save_documents(
    forest: &RwLock<DocumentForest>,
    bus: &NotificationBus,
    serializer: &dyn Serializer,
    target: Option<NodeId>,
) -> Result<Vec<NodeId>, SaveError> {
    let documents = {
        let forest = forest.read();
        match target {
            Some(node) => forest.document_of(node).into_iter().collect(),
            None => forest.dirty_documents(),
        }
    };
    tracing::debug!("[SAVE] saving {} document(s)", documents.len());

    let mut saved = Vec::new();
    let mut failures = Vec::new();
    for document in documents {
        let path = forest
            .read()
            .document(document)
            .and_then(|d| d.source.clone());
        bus.publish(&Message::new(
            topics::SAVING,
            Payload::Saving {
                document,
                path: path.clone(),
            },
        ))?;

        let result = serializer.serialize(&forest.read(), document);
        match result {
            Ok(()) => {
                forest.write().mark_clean(document);
                bus.publish(&Message::new(topics::SAVED, Payload::Saved { document, path }))?;
                saved.push(document);
            }
            Err(error) => {
                tracing::error!("[SAVE] {}", error);
                bus.publish(&Message::log(LogLevel::Error, error.to_string()))?;
                failures.push(error);
            }
        }
    }

    if target.is_none() {
        bus.publish(&Message::new(topics::SAVE_ALL, Payload::SaveAll))?;
    }
    if failures.is_empty() {
        Ok(saved)
    } else {
        Err(SaveError::Serialization(failures))
    }
}
