//! Read-only grid snapshots for render, resync, and persistence
//!
//! A snapshot is a plain value copy of the cell array. The surrounding
//! application serializes it however it likes (the adapter offers JSON);
//! `restore` validates and rebuilds an identical grid, so a serialize /
//! deserialize round trip reproduces the same match set.

use thiserror::Error;

use crate::core::grid::Grid;
use crate::types::{Cell, Gem, GemId};

/// Rejected snapshot during `restore` - the data does not describe a
/// consistent grid
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RestoreError {
    #[error("snapshot has {got} cells, expected {expected} for {cols}x{rows}")]
    CellCountMismatch {
        cols: u8,
        rows: u8,
        expected: usize,
        got: usize,
    },
    #[error("gem {id:?} stored at ({col}, {row}) claims position ({claimed_col}, {claimed_row})")]
    MisplacedGem {
        id: GemId,
        col: u8,
        row: u8,
        claimed_col: u8,
        claimed_row: u8,
    },
    #[error("gem id {id:?} appears more than once")]
    DuplicateId { id: GemId },
}

/// Immutable copy of a grid's cells, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    pub cols: u8,
    pub rows: u8,
    pub cells: Vec<Cell>,
}

impl GridSnapshot {
    /// Cell at (col, row); `None` out of bounds, `Some(None)` for empty
    pub fn cell(&self, col: u8, row: u8) -> Option<Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row as usize * self.cols as usize + col as usize])
    }

    /// Iterate over occupied cells in row-major order
    pub fn gems(&self) -> impl Iterator<Item = &Gem> {
        self.cells.iter().filter_map(|cell| cell.as_ref())
    }

    /// Rebuild a grid from this snapshot, validating cell count, stored
    /// positions, and id uniqueness
    pub fn restore(&self) -> Result<Grid, RestoreError> {
        let expected = self.cols as usize * self.rows as usize;
        if self.cells.len() != expected {
            return Err(RestoreError::CellCountMismatch {
                cols: self.cols,
                rows: self.rows,
                expected,
                got: self.cells.len(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        let mut grid = Grid::new(self.cols, self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = row as usize * self.cols as usize + col as usize;
                if let Some(gem) = self.cells[idx] {
                    if gem.col != col || gem.row != row {
                        return Err(RestoreError::MisplacedGem {
                            id: gem.id,
                            col,
                            row,
                            claimed_col: gem.col,
                            claimed_row: gem.row,
                        });
                    }
                    if !seen.insert(gem.id) {
                        return Err(RestoreError::DuplicateId { id: gem.id });
                    }
                    grid.set(col, row, Some(gem));
                }
            }
        }
        Ok(grid)
    }
}

impl From<&Grid> for GridSnapshot {
    fn from(grid: &Grid) -> Self {
        let mut cells = Vec::with_capacity(grid.cols() as usize * grid.rows() as usize);
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                cells.push(grid.gem_at(col as i16, row as i16));
            }
        }
        Self {
            cols: grid.cols(),
            rows: grid.rows(),
            cells,
        }
    }
}
