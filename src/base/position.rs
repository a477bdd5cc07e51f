/// Grid coordinates for step editing.
///
/// Rows index the steps of a test case or user keyword, columns index the
/// cells of a step. Both are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

/// A rectangular block of cells, inclusive on both corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Area {
    pub top_left: CellPos,
    pub bottom_right: CellPos,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Area {
    /// Create an area from corner coordinates. The corners are sorted, so
    /// selecting bottom-up gives the same area as selecting top-down.
    pub fn new(top_row: usize, left_col: usize, bottom_row: usize, right_col: usize) -> Self {
        Self {
            top_left: CellPos::new(top_row.min(bottom_row), left_col.min(right_col)),
            bottom_right: CellPos::new(top_row.max(bottom_row), left_col.max(right_col)),
        }
    }

    /// A single-cell area.
    pub fn cell(row: usize, col: usize) -> Self {
        Self::new(row, col, row, col)
    }

    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.top_left.row..=self.bottom_right.row
    }

    pub fn cols(&self) -> std::ops::RangeInclusive<usize> {
        self.top_left.col..=self.bottom_right.col
    }

    pub fn height(&self) -> usize {
        self.bottom_right.row - self.top_left.row + 1
    }

    pub fn width(&self) -> usize {
        self.bottom_right.col - self.top_left.col + 1
    }

    /// Check if a cell falls within this area
    pub fn contains(&self, pos: CellPos) -> bool {
        self.rows().contains(&pos.row) && self.cols().contains(&pos.col)
    }
}
