//! Grid commands over the steps of a test case or user keyword.
//!
//! Every command snapshots the step list before and after, so one user
//! operation is one undo entry however many cells it touches, and undo
//! restores the exact previous rows.

use crate::base::{Area, CellPos, NodeId};
use crate::events::Message;
use crate::hir::DocumentForest;
use crate::project::ProjectOptions;
use crate::syntax::Step;

use super::command::{Command, node};
use super::error::CommandError;
use super::transaction::{Edit, Transaction};

fn current_steps(forest: &DocumentForest, id: NodeId) -> Result<Vec<Step>, CommandError> {
    node(forest, id)?
        .as_macro()
        .map(|m| m.steps.clone())
        .ok_or_else(|| CommandError::invalid(format!("{id} has no steps")))
}

/// A transaction replacing the steps of `node`, empty if nothing changed.
fn steps_transaction(name: &str, node: NodeId, old: Vec<Step>, new: Vec<Step>) -> Transaction {
    let transaction = Transaction::new(name);
    if old == new {
        return transaction;
    }
    transaction.with_edit(Edit::Steps { node, old, new })
}

fn trim_trailing_empty_rows(steps: &mut Vec<Step>) {
    while steps.last().is_some_and(Step::is_empty) {
        steps.pop();
    }
}

/// The row holding `cell`, creating rows as needed. A position with no
/// room after it in either direction is rejected.
fn row_for(steps: &mut Vec<Step>, cell: CellPos) -> Result<&mut Step, CommandError> {
    let (Some(rows), Some(_)) = (cell.row.checked_add(1), cell.col.checked_add(1)) else {
        return Err(out_of_range(cell));
    };
    if steps.len() < rows {
        steps.resize_with(rows, Step::default);
    }
    Ok(&mut steps[cell.row])
}

fn out_of_range(cell: CellPos) -> CommandError {
    CommandError::invalid(format!("cell ({}, {}) is out of range", cell.row, cell.col))
}

/// Read the values of `area`, with empty strings for missing cells.
pub fn copy_area(
    forest: &DocumentForest,
    node: NodeId,
    area: Area,
) -> Result<Vec<Vec<String>>, CommandError> {
    let steps = current_steps(forest, node)?;
    Ok(area
        .rows()
        .map(|row| {
            area.cols()
                .map(|col| {
                    steps
                        .get(row)
                        .and_then(|s| s.cell(col))
                        .unwrap_or_default()
                        .to_string()
                })
                .collect()
        })
        .collect())
}

// ============================================================================
// CELL
// ============================================================================

/// Set one cell, creating rows and cells as needed.
#[derive(Clone, Debug)]
pub struct ChangeCellValue {
    pub node: NodeId,
    pub cell: CellPos,
    pub value: String,
}

impl ChangeCellValue {
    pub fn new(node: NodeId, row: usize, col: usize, value: impl Into<String>) -> Self {
        Self {
            node,
            cell: CellPos::new(row, col),
            value: value.into(),
        }
    }
}

impl Command for ChangeCellValue {
    fn name(&self) -> &str {
        "Change cell value"
    }

    fn plan(&mut self, forest: &DocumentForest, _: &ProjectOptions) -> Result<Transaction, CommandError> {
        let old = current_steps(forest, self.node)?;
        let CellPos { row, col } = self.cell;
        let previous = old
            .get(row)
            .and_then(|s| s.cell(col))
            .unwrap_or_default()
            .to_string();
        if previous == self.value {
            return Ok(Transaction::new(self.name()));
        }
        let mut new = old.clone();
        row_for(&mut new, self.cell)?.set_cell(col, self.value.clone());
        let message = Message::grid_cell_changed(self.node, self.cell, self.value.clone(), previous);
        Ok(steps_transaction(self.name(), self.node, old, new).with_message(message))
    }
}

// ============================================================================
// AREAS
// ============================================================================

/// Clear a block of cells (cut or delete).
///
/// Trailing empty cells of the affected rows and trailing empty rows are
/// removed afterwards.
#[derive(Clone, Debug)]
pub struct ClearArea {
    pub node: NodeId,
    pub area: Area,
}

impl ClearArea {
    pub fn new(node: NodeId, area: Area) -> Self {
        Self { node, area }
    }
}

impl Command for ClearArea {
    fn name(&self) -> &str {
        "Clear area"
    }

    fn plan(&mut self, forest: &DocumentForest, _: &ProjectOptions) -> Result<Transaction, CommandError> {
        let old = current_steps(forest, self.node)?;
        let mut new = old.clone();
        for row in self.area.rows() {
            let Some(step) = new.get_mut(row) else { break };
            for col in self.area.cols() {
                if col >= step.len() {
                    break;
                }
                step.set_cell(col, "");
            }
            step.trim_trailing_empty();
        }
        trim_trailing_empty_rows(&mut new);
        Ok(steps_transaction(self.name(), self.node, old, new))
    }
}

/// Write a block of values with its top-left corner at `at`.
#[derive(Clone, Debug)]
pub struct PasteArea {
    pub node: NodeId,
    pub at: CellPos,
    pub data: Vec<Vec<String>>,
}

impl PasteArea {
    pub fn new(node: NodeId, at: CellPos, data: Vec<Vec<String>>) -> Self {
        Self { node, at, data }
    }
}

impl Command for PasteArea {
    fn name(&self) -> &str {
        "Paste"
    }

    fn plan(&mut self, forest: &DocumentForest, _: &ProjectOptions) -> Result<Transaction, CommandError> {
        let old = current_steps(forest, self.node)?;
        let mut new = old.clone();
        let height = self.data.len().max(1);
        let width = self.data.iter().map(Vec::len).max().unwrap_or(0).max(1);
        if self.at.row.checked_add(height).is_none() || self.at.col.checked_add(width).is_none() {
            return Err(out_of_range(self.at));
        }
        for (offset, values) in self.data.iter().enumerate() {
            let step = row_for(&mut new, CellPos::new(self.at.row + offset, self.at.col))?;
            for (col, value) in values.iter().enumerate() {
                step.set_cell(self.at.col + col, value.clone());
            }
        }
        Ok(steps_transaction(self.name(), self.node, old, new))
    }
}

// ============================================================================
// ROWS
// ============================================================================

/// Insert empty rows before `row`; past the end they are appended.
#[derive(Clone, Debug)]
pub struct InsertRows {
    pub node: NodeId,
    pub row: usize,
    pub count: usize,
}

impl InsertRows {
    pub fn new(node: NodeId, row: usize, count: usize) -> Self {
        Self { node, row, count }
    }
}

impl Command for InsertRows {
    fn name(&self) -> &str {
        "Insert rows"
    }

    fn plan(&mut self, forest: &DocumentForest, _: &ProjectOptions) -> Result<Transaction, CommandError> {
        let old = current_steps(forest, self.node)?;
        let mut new = old.clone();
        let at = self.row.min(new.len());
        new.splice(at..at, std::iter::repeat_with(Step::default).take(self.count));
        Ok(steps_transaction(self.name(), self.node, old, new))
    }
}

/// Delete `count` rows starting at `row`.
#[derive(Clone, Debug)]
pub struct DeleteRows {
    pub node: NodeId,
    pub row: usize,
    pub count: usize,
}

impl DeleteRows {
    pub fn new(node: NodeId, row: usize, count: usize) -> Self {
        Self { node, row, count }
    }
}

impl Command for DeleteRows {
    fn name(&self) -> &str {
        "Delete rows"
    }

    fn plan(&mut self, forest: &DocumentForest, _: &ProjectOptions) -> Result<Transaction, CommandError> {
        let old = current_steps(forest, self.node)?;
        let mut new = old.clone();
        let start = self.row.min(new.len());
        let end = self.row.saturating_add(self.count).min(new.len());
        new.drain(start..end);
        Ok(steps_transaction(self.name(), self.node, old, new))
    }
}
