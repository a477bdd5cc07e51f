//! Step rows.

use crate::base::constants::{CONTINUATION_MARKERS, FOR_LOOP_END, FOR_LOOP_MARKERS};
use crate::base::variables::{VariableRef, assignment_target, find_variables};
use crate::base::{eq_names, normalize};

/// A single row of cells in a test case or user keyword body.
///
/// The first cell that is neither an indentation marker nor a variable
/// assignment is the keyword; the cells after it are its arguments.
/// For-loop headers and `END` rows have no keyword.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Step {
    cells: Vec<String>,
}

impl Step {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, col: usize) -> Option<&str> {
        self.cells.get(col).map(String::as_str)
    }

    /// Set a cell, padding the row with empty cells if `col` is past its end.
    ///
    /// Returns the previous value (empty for a new cell).
    pub fn set_cell(&mut self, col: usize, value: impl Into<String>) -> String {
        if col >= self.cells.len() {
            self.cells.resize(col + 1, String::new());
        }
        std::mem::replace(&mut self.cells[col], value.into())
    }

    /// A row with no cells or only empty cells.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }

    pub fn trim_trailing_empty(&mut self) {
        while self.cells.last().is_some_and(|c| c.is_empty()) {
            self.cells.pop();
        }
    }

    fn first_content_index(&self) -> Option<usize> {
        self.cells.iter().position(|cell| {
            let cell = cell.trim();
            !cell.is_empty() && !CONTINUATION_MARKERS.contains(&cell)
        })
    }

    /// A `FOR`/`:FOR` loop header row.
    pub fn is_loop_header(&self) -> bool {
        self.first_content_index()
            .is_some_and(|i| FOR_LOOP_MARKERS.iter().any(|m| eq_names(m, &self.cells[i])))
    }

    /// The `END` row closing a loop.
    pub fn is_loop_end(&self) -> bool {
        self.first_content_index()
            .is_some_and(|i| self.cells[i].trim() == FOR_LOOP_END)
    }

    /// An indented row of an old-style loop body.
    pub fn is_loop_body(&self) -> bool {
        self.cells
            .first()
            .is_some_and(|c| c.is_empty() || CONTINUATION_MARKERS.contains(&c.trim()))
            && !self.is_empty()
    }

    /// Column of the keyword cell, if this row calls one.
    pub fn keyword_index(&self) -> Option<usize> {
        if self.is_loop_header() || self.is_loop_end() {
            return None;
        }
        let start = self.first_content_index()?;
        (start..self.cells.len()).find(|&i| assignment_target(&self.cells[i]).is_none())
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword_index().map(|i| self.cells[i].as_str())
    }

    /// Cells after the keyword.
    pub fn args(&self) -> &[String] {
        match self.keyword_index() {
            Some(i) => &self.cells[i + 1..],
            None => &[],
        }
    }

    /// Variables assigned by this row (`${x}=  Keyword`).
    pub fn assignments(&self) -> Vec<VariableRef<'_>> {
        let Some(start) = self.first_content_index() else {
            return Vec::new();
        };
        let end = self.keyword_index().unwrap_or(start);
        self.cells[start..end]
            .iter()
            .filter_map(|cell| assignment_target(cell))
            .collect()
    }

    /// Whether the cell at `col` declares variables: an assignment target
    /// before the keyword, or a loop variable of a loop header.
    pub fn declares(&self, col: usize) -> bool {
        let Some(start) = self.first_content_index() else {
            return false;
        };
        if col < start || col >= self.cells.len() {
            return false;
        }
        if self.is_loop_header() {
            return col > start
                && self.cells[start + 1..=col]
                    .iter()
                    .all(|cell| !normalize(cell).starts_with("in"));
        }
        col < self.keyword_index().unwrap_or(start) && assignment_target(&self.cells[col]).is_some()
    }

    /// Loop variables declared by a loop header (`FOR  ${i}  IN RANGE  10`).
    pub fn loop_variables(&self) -> Vec<VariableRef<'_>> {
        if !self.is_loop_header() {
            return Vec::new();
        }
        let Some(start) = self.first_content_index() else {
            return Vec::new();
        };
        self.cells[start + 1..]
            .iter()
            .take_while(|cell| !normalize(cell).starts_with("in"))
            .flat_map(|cell| find_variables(cell))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Step {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
