//! Swap validation - advisory legality and match probes
//!
//! Everything here is simulation: the committed grid is never mutated. The
//! resolver uses `propose_swap` before committing; the puzzle-generation
//! side uses `has_any_legal_move` to decide whether a board must be
//! regenerated.

use arrayvec::ArrayVec;

use crate::core::grid::Grid;
use crate::core::matches::run_lengths_at;
use crate::types::{Position, MIN_RUN_LEN};

/// Result of probing a proposed swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapProbe {
    /// In bounds, orthogonally adjacent, both cells occupied
    pub legal: bool,
    /// Post-swap, at least one swapped cell completes a run
    pub would_match: bool,
}

impl SwapProbe {
    const ILLEGAL: SwapProbe = SwapProbe {
        legal: false,
        would_match: false,
    };
}

/// Probe a swap of two cells without touching the committed grid.
/// Illegal swaps short-circuit with `would_match = false`.
pub fn propose_swap(grid: &Grid, a: Position, b: Position) -> SwapProbe {
    if !grid.in_bounds(a) || !grid.in_bounds(b) || !a.is_adjacent(&b) {
        return SwapProbe::ILLEGAL;
    }
    if grid.gem_at(a.col as i16, a.row as i16).is_none()
        || grid.gem_at(b.col as i16, b.row as i16).is_none()
    {
        return SwapProbe::ILLEGAL;
    }

    let mut sim = grid.clone();
    sim.swap(a, b);

    SwapProbe {
        legal: true,
        would_match: position_matches(&sim, a) || position_matches(&sim, b),
    }
}

/// Does the gem now sitting at `pos` complete a run on either axis?
pub(crate) fn position_matches(grid: &Grid, pos: Position) -> bool {
    match grid.gem_at(pos.col as i16, pos.row as i16) {
        Some(gem) => {
            let (horizontal, vertical) =
                run_lengths_at(grid, pos.col as i16, pos.row as i16, gem.match_key());
            horizontal >= MIN_RUN_LEN || vertical >= MIN_RUN_LEN
        }
        None => false,
    }
}

/// First legal, match-producing swap in scan order, if any. Enumerates each
/// cell's right and down neighbor; left/up pairs are the same swaps seen
/// from the other side.
pub fn find_first_legal_move(grid: &Grid) -> Option<(Position, Position)> {
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let from = Position::new(col, row);
            let mut neighbors: ArrayVec<Position, 2> = ArrayVec::new();
            if col + 1 < grid.cols() {
                neighbors.push(Position::new(col + 1, row));
            }
            if row + 1 < grid.rows() {
                neighbors.push(Position::new(col, row + 1));
            }

            for to in neighbors {
                if propose_swap(grid, from, to).would_match {
                    return Some((from, to));
                }
            }
        }
    }
    None
}

/// Is there at least one legal, match-producing swap anywhere on the board?
/// Used by puzzle-generation collaborators to decide whether a board must
/// be regenerated.
pub fn has_any_legal_move(grid: &Grid) -> bool {
    find_first_legal_move(grid).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GemKind::{Blue, Green, Purple, Red, Yellow};
    use crate::types::GemKind;

    const R: Option<GemKind> = Some(Red);
    const B: Option<GemKind> = Some(Blue);
    const G: Option<GemKind> = Some(Green);
    const Y: Option<GemKind> = Some(Yellow);
    const P: Option<GemKind> = Some(Purple);
    const E: Option<GemKind> = None;

    /// 5x5 with no matches and exactly one matching swap: (2,0) <-> (2,1)
    /// lines up red across row 0.
    fn one_move_grid() -> Grid {
        Grid::from_kind_rows(&[
            &[R, R, B, G, Y],
            &[G, Y, R, P, B],
            &[B, G, Y, B, G],
            &[Y, B, G, Y, P],
            &[G, Y, B, P, Y],
        ])
    }

    #[test]
    fn test_non_adjacent_swap_is_illegal() {
        let grid = one_move_grid();
        let probe = propose_swap(&grid, Position::new(0, 0), Position::new(2, 0));
        assert!(!probe.legal);
        assert!(!probe.would_match);
    }

    #[test]
    fn test_diagonal_swap_is_illegal() {
        let grid = one_move_grid();
        let probe = propose_swap(&grid, Position::new(0, 0), Position::new(1, 1));
        assert!(!probe.legal);
    }

    #[test]
    fn test_out_of_bounds_swap_is_illegal() {
        let grid = one_move_grid();
        let probe = propose_swap(&grid, Position::new(4, 0), Position::new(5, 0));
        assert!(!probe.legal);
    }

    #[test]
    fn test_swap_with_vacant_cell_is_illegal() {
        let grid = Grid::from_kind_rows(&[
            &[R, E, B],
            &[G, Y, R],
            &[B, G, Y],
        ]);
        let probe = propose_swap(&grid, Position::new(0, 0), Position::new(1, 0));
        assert!(!probe.legal);
    }

    #[test]
    fn test_probe_detects_match_producing_swap() {
        let grid = one_move_grid();
        let probe = propose_swap(&grid, Position::new(2, 0), Position::new(2, 1));
        assert!(probe.legal);
        assert!(probe.would_match);
    }

    #[test]
    fn test_probe_detects_barren_swap() {
        let grid = one_move_grid();
        let probe = propose_swap(&grid, Position::new(0, 2), Position::new(0, 3));
        assert!(probe.legal);
        assert!(!probe.would_match);
    }

    #[test]
    fn test_probe_never_mutates_the_grid() {
        let grid = one_move_grid();
        let before = grid.clone();

        propose_swap(&grid, Position::new(2, 0), Position::new(2, 1));
        propose_swap(&grid, Position::new(0, 0), Position::new(9, 9));

        assert_eq!(grid, before);
    }

    #[test]
    fn test_has_any_legal_move_finds_the_move() {
        assert!(has_any_legal_move(&one_move_grid()));
    }

    #[test]
    fn test_find_first_legal_move_returns_the_pair() {
        let found = find_first_legal_move(&one_move_grid());
        assert_eq!(found, Some((Position::new(2, 0), Position::new(2, 1))));
    }

    #[test]
    fn test_has_any_legal_move_on_dead_board() {
        // A two-kind checkerboard has no swap that lines up three.
        let grid = Grid::from_kind_rows(&[
            &[R, B, R, B],
            &[B, R, B, R],
            &[R, B, R, B],
            &[B, R, B, R],
        ]);
        assert!(!has_any_legal_move(&grid));
    }
}
