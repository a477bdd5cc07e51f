//! Edits and transactions.
//!
//! A [`Transaction`] is the undo unit: an ordered list of [`Edit`]s, each
//! holding the literal text it expects to replace, plus any extra messages
//! to publish once it commits. Applying is all or nothing.

use indexmap::IndexMap;

use crate::base::NodeId;
use crate::events::{Message, Payload, Topic};
use crate::hir::{DocumentForest, Field, Node};
use crate::syntax::{SettingKind, Step};

use super::error::CommandError;

/// One reversible change to one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Replace the text of a single field.
    Field {
        node: NodeId,
        field: Field,
        old: String,
        new: String,
    },
    /// Replace a whole setting; `None` is an absent setting.
    Setting {
        node: NodeId,
        kind: SettingKind,
        old: Option<Vec<String>>,
        new: Option<Vec<String>>,
    },
    /// Replace every step of a test case or keyword.
    Steps {
        node: NodeId,
        old: Vec<Step>,
        new: Vec<Step>,
    },
}

impl Edit {
    pub fn node(&self) -> NodeId {
        match self {
            Self::Field { node, .. } | Self::Setting { node, .. } | Self::Steps { node, .. } => *node,
        }
    }

    /// The edit that undoes this one.
    pub fn inverse(&self) -> Self {
        match self.clone() {
            Self::Field {
                node,
                field,
                old,
                new,
            } => Self::Field {
                node,
                field,
                old: new,
                new: old,
            },
            Self::Setting {
                node,
                kind,
                old,
                new,
            } => Self::Setting {
                node,
                kind,
                old: new,
                new: old,
            },
            Self::Steps { node, old, new } => Self::Steps {
                node,
                old: new,
                new: old,
            },
        }
    }

    /// The change notification for the edited item.
    pub fn notification(&self) -> Message {
        let node = self.node();
        match self {
            Self::Field { field, .. } => match field {
                Field::Name => Message::name_changed(node),
                Field::Setting { .. } => Message::settings_changed(node),
                Field::Step { .. } => Message::steps_changed(node),
                Field::Variable { .. } => Message::variables_changed(node),
            },
            Self::Setting { .. } => Message::settings_changed(node),
            Self::Steps { .. } => Message::steps_changed(node),
        }
    }

    /// Apply the edit if the tree still holds the expected old value.
    pub fn apply(&self, forest: &mut DocumentForest) -> Result<(), CommandError> {
        let id = self.node();
        let node = forest.get_mut(id).ok_or(CommandError::UnknownNode(id))?;
        match self {
            Self::Field { field, old, new, .. } => {
                let current = node.field(field).unwrap_or_default();
                if current != old.as_str() {
                    return Err(stale(id, &field.to_string(), old, current));
                }
                node.set_field(field, new)?;
            }
            Self::Setting { kind, old, new, .. } => {
                let settings = node.settings_mut();
                if settings.get(*kind) != old.as_deref() {
                    return Err(CommandError::invalid(format!(
                        "{kind} of {id} changed since the edit was planned"
                    )));
                }
                match new {
                    Some(cells) => settings.set(*kind, cells.iter().cloned()),
                    None => {
                        settings.remove(*kind);
                    }
                }
            }
            Self::Steps { old, new, .. } => {
                let steps = steps_mut(node, id)?;
                if *steps != *old {
                    return Err(CommandError::invalid(format!(
                        "steps of {id} changed since the edit was planned"
                    )));
                }
                steps.clone_from(new);
            }
        }
        Ok(())
    }
}

fn stale(id: NodeId, field: &str, expected: &str, found: &str) -> CommandError {
    CommandError::invalid(format!("{field} of {id} is '{found}', expected '{expected}'"))
}

fn steps_mut(node: &mut Node, id: NodeId) -> Result<&mut Vec<Step>, CommandError> {
    node.as_macro_mut()
        .map(|m| &mut m.steps)
        .ok_or_else(|| CommandError::invalid(format!("{id} has no steps")))
}

/// An atomic group of edits: one undo entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transaction {
    label: String,
    edits: Vec<Edit>,
    messages: Vec<Message>,
}

impl Transaction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn with_edit(mut self, edit: Edit) -> Self {
        self.push(edit);
        self
    }

    /// Publish `message` after the edits' own notifications.
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply every edit, or none.
    ///
    /// On failure the edits already applied are reverted in reverse order
    /// and the error is returned. On success every touched document is
    /// marked dirty.
    pub fn apply(&self, forest: &mut DocumentForest) -> Result<(), CommandError> {
        for (index, edit) in self.edits.iter().enumerate() {
            if let Err(error) = edit.apply(forest) {
                tracing::warn!("[EDIT] '{}' failed at edit {}: {}", self.label, index, error);
                for done in self.edits[..index].iter().rev() {
                    if let Err(rollback) = done.inverse().apply(forest) {
                        tracing::error!("[EDIT] rollback of '{}' failed: {}", self.label, rollback);
                    }
                }
                return Err(error);
            }
        }
        for edit in &self.edits {
            forest.mark_dirty(edit.node());
        }
        tracing::debug!("[EDIT] applied '{}' ({} edit(s))", self.label, self.edits.len());
        Ok(())
    }

    /// The transaction that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            label: self.label.clone(),
            edits: self.edits.iter().rev().map(Edit::inverse).collect(),
            messages: self.messages.iter().map(invert_message).collect(),
        }
    }

    /// Messages to publish after applying: one change notification per
    /// item and topic in first-edit order, then the extra messages.
    pub fn notifications(&self) -> Vec<Message> {
        let mut unique: IndexMap<(Topic, NodeId), Message> = IndexMap::new();
        for edit in &self.edits {
            let message = edit.notification();
            unique
                .entry((message.topic().clone(), edit.node()))
                .or_insert(message);
        }
        unique
            .into_values()
            .chain(self.messages.iter().cloned())
            .collect()
    }
}

fn invert_message(message: &Message) -> Message {
    match message.payload() {
        Payload::GridCellChanged {
            item,
            cell,
            value,
            previous,
        } => Message::grid_cell_changed(*item, *cell, previous.clone(), value.clone()),
        _ => message.clone(),
    }
}
