//! Grid module - owns the 2D cell array
//!
//! The grid is a cols x rows store where each cell is empty or holds a gem.
//! Uses a flat vector in row-major order for cache locality; dimensions are
//! fixed for the lifetime of the store.
//! Coordinates: (col, row) with (0, 0) top-left and rows growing downward.
//! A gem's stored position is rewritten on every placement so it always
//! equals its indices here.

use crate::types::{Cell, Gem, Position};

/// The cell store - flat row-major vector with runtime dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cols: u8,
    rows: u8,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid. Dimension validation happens in `EngineConfig`
    /// before this is ever reached.
    pub(crate) fn new(cols: u8, rows: u8) -> Self {
        Self {
            cols,
            rows,
            cells: vec![None; cols as usize * rows as usize],
        }
    }

    /// Calculate flat index from (col, row) coordinates
    #[inline(always)]
    fn index(&self, col: i16, row: i16) -> Option<usize> {
        if col < 0 || col >= self.cols as i16 || row < 0 || row >= self.rows as i16 {
            return None;
        }
        Some((row as usize) * (self.cols as usize) + (col as usize))
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Get cell at (col, row).
    /// Returns `None` out of bounds, `Some(None)` for an in-bounds empty cell.
    pub fn get(&self, col: i16, row: i16) -> Option<Cell> {
        self.index(col, row).map(|idx| self.cells[idx])
    }

    /// Get the gem at (col, row), flattening out-of-bounds and empty to `None`
    pub fn gem_at(&self, col: i16, row: i16) -> Option<Gem> {
        self.get(col, row).flatten()
    }

    /// Set cell at (col, row), overwriting whatever is there.
    /// A placed gem has its stored position rewritten to the target indices.
    /// Returns false if out of bounds.
    pub fn set(&mut self, col: u8, row: u8, cell: Cell) -> bool {
        match self.index(col as i16, row as i16) {
            Some(idx) => {
                self.cells[idx] = cell.map(|mut gem| {
                    gem.col = col;
                    gem.row = row;
                    gem
                });
                true
            }
            None => false,
        }
    }

    /// Remove and return the cell at (col, row); out of bounds yields `None`
    pub fn take(&mut self, col: u8, row: u8) -> Cell {
        match self.index(col as i16, row as i16) {
            Some(idx) => self.cells[idx].take(),
            None => None,
        }
    }

    /// Exchange the contents of two cells, rewriting gem positions.
    /// Returns false (no mutation) if either position is out of bounds.
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        if self.index(a.col as i16, a.row as i16).is_none()
            || self.index(b.col as i16, b.row as i16).is_none()
        {
            return false;
        }
        let cell_a = self.take(a.col, a.row);
        let cell_b = self.take(b.col, b.row);
        self.set(a.col, a.row, cell_b);
        self.set(b.col, b.row, cell_a);
        true
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        (pos.col as u16) < self.cols as u16 && (pos.row as u16) < self.rows as u16
    }

    /// True when no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Iterate over all occupied cells in row-major order
    pub fn gems(&self) -> impl Iterator<Item = &Gem> {
        self.cells.iter().filter_map(|cell| cell.as_ref())
    }

    /// Count of occupied cells
    pub fn gem_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Build a grid from rows of gem kinds for testing (row 0 on top).
    /// Ids are assigned sequentially in row-major order.
    #[cfg(test)]
    pub(crate) fn from_kind_rows(rows: &[&[Option<crate::types::GemKind>]]) -> Self {
        let height = rows.len() as u8;
        let width = rows[0].len() as u8;
        assert!(rows.iter().all(|row| row.len() == width as usize));

        let mut grid = Self::new(width, height);
        let mut next_id = 0u64;
        for (row, row_kinds) in rows.iter().enumerate() {
            for (col, kind) in row_kinds.iter().enumerate() {
                if let Some(kind) = kind {
                    grid.set(
                        col as u8,
                        row as u8,
                        Some(Gem {
                            id: crate::types::GemId(next_id),
                            kind: *kind,
                            special: None,
                            col: col as u8,
                            row: row as u8,
                        }),
                    );
                    next_id += 1;
                }
            }
        }
        grid
    }
}
