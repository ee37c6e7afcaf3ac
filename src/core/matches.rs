//! Match detection - maximal same-key runs on a grid snapshot
//!
//! Pure scans, no mutation: callers re-run detection after every board
//! change rather than caching results across mutations. A cell joins at
//! most one run per axis, but horizontal and vertical claims are
//! independent, so a gem at the elbow of a cross sits in both runs.
//! Removal dedup is the resolver's job.

use crate::core::grid::Grid;
use crate::core::scoring::MatchScoring;
use crate::types::{Axis, Gem, MatchKey, MIN_RUN_LEN};

/// A matched run: ordered cells along one axis, with its policy score
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub cells: Vec<Gem>,
    pub axis: Axis,
    pub score: u32,
}

impl Match {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn key(&self) -> MatchKey {
        self.cells[0].match_key()
    }
}

/// Find all maximal runs of >= MIN_RUN_LEN same-key gems, horizontal then
/// vertical, in scan order. Deterministic for identical grid contents.
pub fn find_all_matches(grid: &Grid, scoring: &MatchScoring) -> Vec<Match> {
    let mut matches = Vec::new();
    let cols = grid.cols() as i16;
    let rows = grid.rows() as i16;

    // Horizontal runs, row by row. Advancing by the run length gives each
    // cell at most one horizontal run per pass.
    for row in 0..rows {
        let mut col = 0;
        while col < cols {
            match run_from(grid, col, row, 1, 0) {
                Some(run) => {
                    let len = run.len();
                    if len >= MIN_RUN_LEN {
                        matches.push(Match {
                            score: scoring.score(len),
                            cells: run,
                            axis: Axis::Horizontal,
                        });
                    }
                    col += len as i16;
                }
                None => col += 1,
            }
        }
    }

    // Vertical runs, column by column, independent of horizontal claims.
    for col in 0..cols {
        let mut row = 0;
        while row < rows {
            match run_from(grid, col, row, 0, 1) {
                Some(run) => {
                    let len = run.len();
                    if len >= MIN_RUN_LEN {
                        matches.push(Match {
                            score: scoring.score(len),
                            cells: run,
                            axis: Axis::Vertical,
                        });
                    }
                    row += len as i16;
                }
                None => row += 1,
            }
        }
    }

    matches
}

/// Collect the maximal run starting at (col, row) stepping by (dc, dr).
/// Returns None when the start cell is empty or out of bounds.
fn run_from(grid: &Grid, col: i16, row: i16, dc: i16, dr: i16) -> Option<Vec<Gem>> {
    let first = grid.gem_at(col, row)?;
    let key = first.match_key();
    let mut run = vec![first];

    let mut c = col + dc;
    let mut r = row + dr;
    while let Some(gem) = grid.gem_at(c, r) {
        if gem.match_key() != key {
            break;
        }
        run.push(gem);
        c += dc;
        r += dr;
    }

    Some(run)
}

/// Horizontal and vertical run lengths through (col, row) if that cell
/// hypothetically held `key`. The cell's actual contents are ignored;
/// neighbors count while contiguous and same-key. Used by the swap
/// validator (post-swap probe) and the refill source (avoidance probe).
pub fn run_lengths_at(grid: &Grid, col: i16, row: i16, key: MatchKey) -> (usize, usize) {
    let count = |dc: i16, dr: i16| -> usize {
        let mut n = 0;
        let mut c = col + dc;
        let mut r = row + dr;
        while let Some(gem) = grid.gem_at(c, r) {
            if gem.match_key() != key {
                break;
            }
            n += 1;
            c += dc;
            r += dr;
        }
        n
    };

    let horizontal = 1 + count(-1, 0) + count(1, 0);
    let vertical = 1 + count(0, -1) + count(0, 1);
    (horizontal, vertical)
}

/// Would placing `key` at (col, row) complete a run on either axis?
pub fn would_match_at(grid: &Grid, col: i16, row: i16, key: MatchKey) -> bool {
    let (horizontal, vertical) = run_lengths_at(grid, col, row, key);
    horizontal >= MIN_RUN_LEN || vertical >= MIN_RUN_LEN
}
