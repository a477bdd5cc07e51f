//! The command trait and single-field edits.

use crate::base::NodeId;
use crate::hir::{DocumentForest, Field, FieldError, Node};
use crate::project::ProjectOptions;

use super::error::CommandError;
use super::transaction::{Edit, Transaction};

/// A user-level mutation.
///
/// Planning reads the tree and produces the [`Transaction`] to apply; it
/// never mutates. An empty transaction means there is nothing to do and
/// creates no undo entry.
pub trait Command {
    fn name(&self) -> &str;

    fn plan(
        &mut self,
        forest: &DocumentForest,
        options: &ProjectOptions,
    ) -> Result<Transaction, CommandError>;
}

pub(crate) fn node(forest: &DocumentForest, id: NodeId) -> Result<&Node, CommandError> {
    forest.get(id).ok_or(CommandError::UnknownNode(id))
}

/// Set one field of a node: its name, a setting cell, a step cell or a
/// variable-table cell.
///
/// Setting and step changes record the whole setting or step list, so an
/// undo removes cells and rows the change had to create.
#[derive(Clone, Debug)]
pub struct ChangeField {
    pub node: NodeId,
    pub field: Field,
    pub value: String,
}

impl ChangeField {
    pub fn new(node: NodeId, field: Field, value: impl Into<String>) -> Self {
        Self {
            node,
            field,
            value: value.into(),
        }
    }
}

impl Command for ChangeField {
    fn name(&self) -> &str {
        "Change field"
    }

    fn plan(
        &mut self,
        forest: &DocumentForest,
        _options: &ProjectOptions,
    ) -> Result<Transaction, CommandError> {
        let target = node(forest, self.node)?;
        let current = target.field(&self.field).unwrap_or_default();
        let transaction = Transaction::new(self.name());
        if current == self.value {
            return Ok(transaction);
        }
        let addressable = match &self.field {
            Field::Setting { index, .. } => index.checked_add(1).is_some(),
            Field::Step { row, col } => row.checked_add(1).and(col.checked_add(1)).is_some(),
            Field::Name | Field::Variable { .. } => true,
        };
        if !addressable {
            return Err(CommandError::invalid(format!("field {} is out of range", self.field)));
        }
        let edit = match &self.field {
            Field::Setting { kind, index } => {
                let old = target.settings().get(*kind).map(<[String]>::to_vec);
                let mut new = old.clone().unwrap_or_default();
                if new.len() <= *index {
                    new.resize(index + 1, String::new());
                }
                new[*index].clone_from(&self.value);
                Edit::Setting {
                    node: self.node,
                    kind: *kind,
                    old,
                    new: Some(new),
                }
            }
            Field::Step { .. } => {
                let mut updated = target.clone();
                updated.set_field(&self.field, &self.value)?;
                Edit::Steps {
                    node: self.node,
                    old: target.steps().to_vec(),
                    new: updated.steps().to_vec(),
                }
            }
            Field::Variable { index, .. }
                if !target.as_document().is_some_and(|d| d.variables.len() > *index) =>
            {
                return Err(FieldError::missing(&self.field).into());
            }
            Field::Name | Field::Variable { .. } => Edit::Field {
                node: self.node,
                field: self.field.clone(),
                old: current.to_string(),
                new: self.value.clone(),
            },
        };
        Ok(transaction.with_edit(edit))
    }
}
