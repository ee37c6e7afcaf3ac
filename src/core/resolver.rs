//! Cascade resolver - the engine state machine
//!
//! Owns the grid and is the only code allowed to mutate it. A swap command
//! runs the whole cycle synchronously: commit, detect, remove, gravity,
//! refill, repeat until stable, then hand back an immutable `MoveResult`
//! carrying the full per-iteration event log. Presentation layers animate
//! that log at their own pace; nothing here waits on anything.
//!
//! Protocol errors (out of bounds, not adjacent, vacant cell, re-entrant
//! call) reject before any mutation. A legal swap that produces no match is
//! committed, found barren, and reverted - the bounce-back case - which is
//! a valid=false result, not an error.

use std::collections::HashSet;

use thiserror::Error;

use crate::core::grid::Grid;
use crate::core::matches::{find_all_matches, Match};
use crate::core::rng::{GemSource, RandomGemSource};
use crate::core::scoring::MatchScoring;
use crate::core::snapshot::GridSnapshot;
use crate::core::swap::{has_any_legal_move, position_matches};
use crate::types::{
    Gem, GemId, GemKind, Position, SpecialKind, ALL_GEM_KINDS, DEFAULT_GRID_COLS,
    DEFAULT_GRID_ROWS, GENERATION_MAX_ATTEMPTS, MIN_PALETTE_KINDS, MIN_RUN_LEN,
};

/// Construction-time validation failures. The engine refuses to initialize
/// rather than run on a board that can never match.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid {cols}x{rows} is too small to ever hold a match")]
    GridTooSmall { cols: u8, rows: u8 },
    #[error("palette needs at least {min} gem kinds, got {got}", min = MIN_PALETTE_KINDS)]
    PaletteTooSmall { got: usize },
    #[error("no playable board found in {attempts} generation attempts")]
    Unplayable { attempts: u32 },
}

/// Rejected swap commands. None of these mutate the grid or emit events;
/// the caller may retry with valid input.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SwapError {
    #[error("swap position out of bounds")]
    OutOfBounds,
    #[error("swap cells are not orthogonally adjacent")]
    NotAdjacent,
    #[error("cannot swap an empty cell")]
    VacantCell,
    #[error("a resolution cycle is already in progress")]
    Busy,
}

impl SwapError {
    /// Stable code string for the wire protocol
    pub fn code(&self) -> &'static str {
        match self {
            SwapError::OutOfBounds => "out_of_bounds",
            SwapError::NotAdjacent => "not_adjacent",
            SwapError::VacantCell => "vacant_cell",
            SwapError::Busy => "busy",
        }
    }
}

/// Engine configuration, validated at construction
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub cols: u8,
    pub rows: u8,
    pub palette: Vec<GemKind>,
    pub scoring: MatchScoring,
    pub seed: u32,
}

impl EngineConfig {
    /// Default board with the full palette and the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            cols: DEFAULT_GRID_COLS,
            rows: DEFAULT_GRID_ROWS,
            palette: ALL_GEM_KINDS.to_vec(),
            scoring: MatchScoring::default(),
            seed,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let too_narrow = (self.cols as usize) < MIN_RUN_LEN && (self.rows as usize) < MIN_RUN_LEN;
        if self.cols == 0 || self.rows == 0 || too_narrow {
            return Err(ConfigError::GridTooSmall {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.palette.len() < MIN_PALETTE_KINDS {
            return Err(ConfigError::PaletteTooSmall {
                got: self.palette.len(),
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

/// One gem's fall during gravity compaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemFall {
    pub id: GemId,
    pub kind: GemKind,
    pub special: Option<SpecialKind>,
    pub col: u8,
    pub from_row: u8,
    pub to_row: u8,
}

/// Fallen and freshly spawned gems for one settle step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettleRecord {
    pub fallen: Vec<GemFall>,
    pub spawned: Vec<Gem>,
}

/// One round of the resolution loop: the matches that were removed and the
/// settle step that followed
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub matches: Vec<Match>,
    pub settle: SettleRecord,
}

/// Outcome of one completed swap command. Immutable once returned.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    /// False means the swap was legal but barren and has been reverted
    pub valid: bool,
    /// Total points across all iterations
    pub score: u32,
    /// Chained rounds beyond the first (0 = no cascade)
    pub cascades: u32,
    /// Ordered per-iteration event log for animation/analytics
    pub iterations: Vec<IterationRecord>,
}

impl MoveResult {
    fn rejected() -> Self {
        Self {
            valid: false,
            score: 0,
            cascades: 0,
            iterations: Vec::new(),
        }
    }
}

/// Typed observer for resolution progress. Callbacks fire synchronously,
/// in event order, during `try_swap_observed`; a rejected or reverted swap
/// fires nothing.
pub trait ResolutionObserver {
    fn on_matched(&mut self, _iteration: u32, _matched: &Match) {}
    fn on_settled(&mut self, _iteration: u32, _settle: &SettleRecord) {}
}

/// Observer that ignores everything
pub struct NoopObserver;

impl ResolutionObserver for NoopObserver {}

/// The match/cascade engine: grid, gem source, scoring policy, and session
/// counters behind a swap-command API
#[derive(Debug, Clone)]
pub struct Engine<S: GemSource = RandomGemSource> {
    grid: Grid,
    source: S,
    scoring: MatchScoring,
    palette: Vec<GemKind>,
    /// Monotonic id for spawned gems (wraps, never reused within a session)
    next_gem_id: u64,
    /// Guard against a second swap command while a cycle is running
    resolving: bool,
    seed: u32,
    score: u64,
    moves: u32,
}

impl Engine<RandomGemSource> {
    /// Build an engine with the production RNG seeded from the config
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let seed = config.seed;
        Self::with_source(config, RandomGemSource::new(seed))
    }
}

impl<S: GemSource> Engine<S> {
    /// Build an engine with a caller-supplied gem source.
    /// Validates the config, then populates and regenerates (bounded) until
    /// the board is matchless and has at least one legal move.
    pub fn with_source(config: EngineConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut engine = Self {
            grid: Grid::new(config.cols, config.rows),
            source,
            scoring: config.scoring,
            palette: config.palette,
            next_gem_id: 0,
            resolving: false,
            seed: config.seed,
            score: 0,
            moves: 0,
        };
        engine.generate_board()?;
        Ok(engine)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Read-only snapshot for initial render and resync
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::from(&self.grid)
    }

    pub fn scoring(&self) -> MatchScoring {
        self.scoring
    }

    pub fn palette(&self) -> &[GemKind] {
        &self.palette
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Session score across all valid moves
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Count of committed (valid) moves
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_resolving(&self) -> bool {
        self.resolving
    }

    /// Does any legal, match-producing swap exist right now?
    pub fn has_legal_move(&self) -> bool {
        has_any_legal_move(&self.grid)
    }

    /// Process one swap command to completion.
    /// Protocol errors come back as `Err` with nothing mutated; a barren
    /// swap comes back `Ok` with `valid = false` and the grid reverted.
    pub fn try_swap(&mut self, a: Position, b: Position) -> Result<MoveResult, SwapError> {
        self.try_swap_observed(a, b, &mut NoopObserver)
    }

    /// `try_swap` with resolution events delivered to `observer`, ordered:
    /// per iteration, one `on_matched` per removed match, then one
    /// `on_settled` for the fall/spawn step.
    pub fn try_swap_observed(
        &mut self,
        a: Position,
        b: Position,
        observer: &mut dyn ResolutionObserver,
    ) -> Result<MoveResult, SwapError> {
        if self.resolving {
            return Err(SwapError::Busy);
        }
        if !self.grid.in_bounds(a) || !self.grid.in_bounds(b) {
            return Err(SwapError::OutOfBounds);
        }
        if !a.is_adjacent(&b) {
            return Err(SwapError::NotAdjacent);
        }
        if self.grid.gem_at(a.col as i16, a.row as i16).is_none()
            || self.grid.gem_at(b.col as i16, b.row as i16).is_none()
        {
            return Err(SwapError::VacantCell);
        }

        self.resolving = true;
        let result = self.resolve_swap(a, b, observer);
        self.resolving = false;
        Ok(result)
    }

    fn resolve_swap(
        &mut self,
        a: Position,
        b: Position,
        observer: &mut dyn ResolutionObserver,
    ) -> MoveResult {
        // Commit, then ask whether the swap itself lined something up. A
        // barren swap bounces back; pre-existing runs elsewhere do not
        // validate an unrelated move.
        self.grid.swap(a, b);
        if !position_matches(&self.grid, a) && !position_matches(&self.grid, b) {
            self.grid.swap(a, b);
            return MoveResult::rejected();
        }

        let mut total_score: u32 = 0;
        let mut cascades: u32 = 0;
        let mut iteration: u32 = 0;
        let mut iterations = Vec::new();
        let mut matches = find_all_matches(&self.grid, &self.scoring);

        loop {
            // Each match scores independently; a gem shared by two runs
            // counts toward both scores but is removed once.
            let mut removal: HashSet<GemId> = HashSet::new();
            for matched in &matches {
                total_score = total_score.saturating_add(matched.score);
                removal.extend(matched.cells.iter().map(|gem| gem.id));
                observer.on_matched(iteration, matched);
            }

            self.remove_gems(&removal);
            let fallen = self.apply_gravity();
            let spawned = self.refill();
            let settle = SettleRecord { fallen, spawned };
            observer.on_settled(iteration, &settle);
            iterations.push(IterationRecord {
                matches,
                settle,
            });

            matches = find_all_matches(&self.grid, &self.scoring);
            if matches.is_empty() {
                break;
            }
            cascades += 1;
            iteration += 1;
        }

        debug_assert!(self.grid.is_full());

        self.score = self.score.saturating_add(total_score as u64);
        self.moves = self.moves.wrapping_add(1);

        MoveResult {
            valid: true,
            score: total_score,
            cascades,
            iterations,
        }
    }

    /// Empty every cell whose gem is in the removal set
    fn remove_gems(&mut self, removal: &HashSet<GemId>) {
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                if let Some(gem) = self.grid.gem_at(col as i16, row as i16) {
                    if removal.contains(&gem.id) {
                        self.grid.take(col, row);
                    }
                }
            }
        }
    }

    /// Compact each column downward, preserving relative vertical order.
    /// Gaps end up at the top of the column.
    fn apply_gravity(&mut self) -> Vec<GemFall> {
        let mut fallen = Vec::new();

        for col in 0..self.grid.cols() {
            let mut write_row = self.grid.rows() as i16 - 1;
            for read_row in (0..self.grid.rows() as i16).rev() {
                if let Some(gem) = self.grid.gem_at(col as i16, read_row) {
                    if write_row != read_row {
                        self.grid.take(col, read_row as u8);
                        self.grid.set(col, write_row as u8, Some(gem));
                        fallen.push(GemFall {
                            id: gem.id,
                            kind: gem.kind,
                            special: gem.special,
                            col,
                            from_row: read_row as u8,
                            to_row: write_row as u8,
                        });
                    }
                    write_row -= 1;
                }
            }
        }

        fallen
    }

    /// Fill every remaining gap top-down per column, drawing kinds that
    /// avoid (bounded) an immediate match
    fn refill(&mut self) -> Vec<Gem> {
        let mut spawned = Vec::new();

        for col in 0..self.grid.cols() {
            for row in 0..self.grid.rows() {
                if self.grid.get(col as i16, row as i16) == Some(None) {
                    let kind =
                        self.source
                            .next_avoiding_match(&self.grid, col, row, &self.palette);
                    let gem = self.spawn_gem(col, row, kind);
                    self.grid.set(col, row, Some(gem));
                    spawned.push(gem);
                }
            }
        }

        spawned
    }

    fn spawn_gem(&mut self, col: u8, row: u8, kind: GemKind) -> Gem {
        let id = GemId(self.next_gem_id);
        self.next_gem_id = self.next_gem_id.wrapping_add(1);
        Gem {
            id,
            kind,
            special: None,
            col,
            row,
        }
    }

    /// Populate from scratch until the board is matchless and playable
    fn generate_board(&mut self) -> Result<(), ConfigError> {
        for _ in 0..GENERATION_MAX_ATTEMPTS {
            self.grid.clear();
            self.populate();
            if find_all_matches(&self.grid, &self.scoring).is_empty()
                && has_any_legal_move(&self.grid)
            {
                return Ok(());
            }
        }
        Err(ConfigError::Unplayable {
            attempts: GENERATION_MAX_ATTEMPTS,
        })
    }

    fn populate(&mut self) {
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let kind = self
                    .source
                    .next_avoiding_match(&self.grid, col, row, &self.palette);
                let gem = self.spawn_gem(col, row, kind);
                self.grid.set(col, row, Some(gem));
            }
        }
    }

    /// Build an engine around a preset grid for scenario tests
    #[cfg(test)]
    pub(crate) fn from_parts(grid: Grid, source: S, scoring: MatchScoring) -> Self {
        let next_gem_id = grid.gems().map(|gem| gem.id.0).max().map_or(0, |id| id + 1);
        Self {
            grid,
            source,
            scoring,
            palette: ALL_GEM_KINDS.to_vec(),
            next_gem_id,
            resolving: false,
            seed: 0,
            score: 0,
            moves: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_resolving(&mut self, resolving: bool) {
        self.resolving = resolving;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::types::Axis;
    use crate::types::GemKind::{Blue, Green, Orange, Purple, Red, Yellow};

    const R: Option<GemKind> = Some(Red);
    const B: Option<GemKind> = Some(Blue);
    const G: Option<GemKind> = Some(Green);
    const Y: Option<GemKind> = Some(Yellow);
    const P: Option<GemKind> = Some(Purple);
    const O: Option<GemKind> = Some(Orange);

    /// Gem source that replays a fixed script, with no avoidance retry, so
    /// scenario tests control every refill exactly
    #[derive(Debug, Clone)]
    struct ScriptedSource {
        queue: VecDeque<GemKind>,
    }

    impl ScriptedSource {
        fn new(kinds: &[GemKind]) -> Self {
            Self {
                queue: kinds.iter().copied().collect(),
            }
        }
    }

    impl GemSource for ScriptedSource {
        fn next_kind(&mut self, palette: &[GemKind]) -> GemKind {
            self.queue.pop_front().unwrap_or(palette[0])
        }

        fn next_avoiding_match(
            &mut self,
            _grid: &Grid,
            _col: u8,
            _row: u8,
            palette: &[GemKind],
        ) -> GemKind {
            self.next_kind(palette)
        }
    }

    /// Observer that records callback order for event-ordering assertions
    #[derive(Default)]
    struct RecordingObserver {
        events: Vec<(String, u32)>,
    }

    impl ResolutionObserver for RecordingObserver {
        fn on_matched(&mut self, iteration: u32, _matched: &Match) {
            self.events.push(("matched".to_string(), iteration));
        }

        fn on_settled(&mut self, iteration: u32, _settle: &SettleRecord) {
            self.events.push(("settled".to_string(), iteration));
        }
    }

    fn positions_synced(grid: &Grid) -> bool {
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                if let Some(gem) = grid.gem_at(col as i16, row as i16) {
                    if gem.col != col || gem.row != row {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn scripted_engine(grid: Grid, script: &[GemKind], scoring: MatchScoring) -> Engine<ScriptedSource> {
        Engine::from_parts(grid, ScriptedSource::new(script), scoring)
    }

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
    fn test_barren_swap_is_reverted() {
        // A red run already sits at row 0; the probed swap touches neither
        // it nor any other run, so the move bounces back untouched.
        let grid = Grid::from_kind_rows(&[
            &[R, R, R, B, G],
            &[Y, G, B, G, Y],
            &[B, Y, G, Y, B],
            &[G, B, Y, B, G],
            &[Y, G, B, G, Y],
        ]);
        let before = grid.clone();
        let mut engine = scripted_engine(grid, &[], MatchScoring::default());
        let mut observer = RecordingObserver::default();

        let result = engine
            .try_swap_observed(Position::new(3, 0), Position::new(3, 1), &mut observer)
            .unwrap();

        assert!(!result.valid);
        assert_eq!(result.score, 0);
        assert_eq!(result.cascades, 0);
        assert!(result.iterations.is_empty());
        assert_eq!(engine.grid(), &before);
        assert!(observer.events.is_empty());
        assert_eq!(engine.moves(), 0);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_single_match_swap_with_flat_policy() {
        // Swapping (2,0)/(2,1) forms a red 3-run at row 0. With a flat
        // 50-per-cell policy that is exactly 150 points and no cascade.
        let mut engine = scripted_engine(
            one_move_grid(),
            &[Purple, Green, Yellow],
            MatchScoring::new(50, 0),
        );

        let result = engine
            .try_swap(Position::new(2, 0), Position::new(2, 1))
            .unwrap();

        assert!(result.valid);
        assert_eq!(result.score, 150);
        assert_eq!(result.cascades, 0);
        assert_eq!(result.iterations.len(), 1);

        let iteration = &result.iterations[0];
        assert_eq!(iteration.matches.len(), 1);
        assert_eq!(iteration.matches[0].axis, Axis::Horizontal);
        assert_eq!(iteration.matches[0].len(), 3);
        assert!(iteration.settle.fallen.is_empty());
        assert_eq!(iteration.settle.spawned.len(), 3);

        assert!(engine.grid().is_full());
        assert!(find_all_matches(engine.grid(), &engine.scoring()).is_empty());
        assert!(positions_synced(engine.grid()));
        assert_eq!(engine.score(), 150);
        assert_eq!(engine.moves(), 1);
    }

    #[test]
    fn test_gravity_cascade_chains_and_sums_score() {
        // Swapping (2,2)/(2,3) forms a red 3-run across row 2. Removing it
        // drops the blue at (0,1) onto the blue pair below, chaining a
        // vertical blue 3-run in column 0.
        let grid = Grid::from_kind_rows(&[
            &[G, Y, B, P, O],
            &[B, P, G, O, P],
            &[R, R, G, B, G],
            &[B, G, R, Y, O],
            &[B, O, Y, G, Y],
        ]);
        let mut engine = scripted_engine(
            grid,
            &[Yellow, Orange, Purple, Blue, Purple, Orange],
            MatchScoring::default(),
        );
        let mut observer = RecordingObserver::default();

        let result = engine
            .try_swap_observed(Position::new(2, 2), Position::new(2, 3), &mut observer)
            .unwrap();

        assert!(result.valid);
        assert_eq!(result.cascades, 1);
        // Two 3-run matches at default policy: 200 + 200.
        assert_eq!(result.score, 400);
        assert_eq!(result.iterations.len(), 2);

        assert_eq!(result.iterations[0].matches.len(), 1);
        assert_eq!(result.iterations[0].matches[0].axis, Axis::Horizontal);
        assert_eq!(result.iterations[0].settle.fallen.len(), 6);
        assert_eq!(result.iterations[0].settle.spawned.len(), 3);

        assert_eq!(result.iterations[1].matches.len(), 1);
        assert_eq!(result.iterations[1].matches[0].axis, Axis::Vertical);
        assert_eq!(result.iterations[1].settle.fallen.len(), 2);
        assert_eq!(result.iterations[1].settle.spawned.len(), 3);

        // Events arrive per iteration: matched then settled.
        let expected = vec![
            ("matched".to_string(), 0),
            ("settled".to_string(), 0),
            ("matched".to_string(), 1),
            ("settled".to_string(), 1),
        ];
        assert_eq!(observer.events, expected);

        assert!(engine.grid().is_full());
        assert!(find_all_matches(engine.grid(), &engine.scoring()).is_empty());
        assert!(positions_synced(engine.grid()));
        assert_eq!(engine.score(), 400);
    }

    #[test]
    fn test_cross_swap_scores_each_match_but_removes_cells_once() {
        // Swapping the red at (2,0) down to (2,1) completes a horizontal
        // run across row 1 and a vertical run down column 2 sharing that
        // cell: two scored matches, five unique removals.
        let grid = Grid::from_kind_rows(&[
            &[G, Y, R, B, O],
            &[R, R, G, O, P],
            &[B, G, R, Y, G],
            &[Y, P, R, G, Y],
            &[P, B, Y, O, B],
        ]);
        let mut engine = scripted_engine(
            grid,
            &[Orange, Blue, Purple, Orange, Blue],
            MatchScoring::default(),
        );

        let result = engine
            .try_swap(Position::new(2, 0), Position::new(2, 1))
            .unwrap();

        assert!(result.valid);
        assert_eq!(result.cascades, 0);
        // The shared elbow cell contributes to both runs' scores.
        assert_eq!(result.score, 400);
        assert_eq!(result.iterations.len(), 1);
        assert_eq!(result.iterations[0].matches.len(), 2);
        assert_eq!(result.iterations[0].settle.spawned.len(), 5);

        assert!(engine.grid().is_full());
        assert_eq!(engine.grid().gem_count(), 25);
        assert!(find_all_matches(engine.grid(), &engine.scoring()).is_empty());
    }

    #[test]
    fn test_out_of_bounds_swap_is_a_protocol_error() {
        let mut engine = scripted_engine(one_move_grid(), &[], MatchScoring::default());
        let before = engine.grid().clone();

        let result = engine.try_swap(Position::new(4, 0), Position::new(5, 0));
        assert_eq!(result, Err(SwapError::OutOfBounds));
        assert_eq!(engine.grid(), &before);
        assert_eq!(engine.moves(), 0);
    }

    #[test]
    fn test_non_adjacent_swap_is_a_protocol_error() {
        let mut engine = scripted_engine(one_move_grid(), &[], MatchScoring::default());
        let before = engine.grid().clone();

        let diagonal = engine.try_swap(Position::new(0, 0), Position::new(1, 1));
        assert_eq!(diagonal, Err(SwapError::NotAdjacent));

        let distant = engine.try_swap(Position::new(0, 0), Position::new(2, 0));
        assert_eq!(distant, Err(SwapError::NotAdjacent));

        assert_eq!(engine.grid(), &before);
    }

    #[test]
    fn test_vacant_cell_swap_is_a_protocol_error() {
        const E: Option<GemKind> = None;
        let grid = Grid::from_kind_rows(&[
            &[R, E, B],
            &[G, Y, R],
            &[B, G, Y],
        ]);
        let mut engine = scripted_engine(grid, &[], MatchScoring::default());

        let result = engine.try_swap(Position::new(0, 0), Position::new(1, 0));
        assert_eq!(result, Err(SwapError::VacantCell));
    }

    #[test]
    fn test_reentrant_swap_is_rejected() {
        let mut engine = scripted_engine(
            one_move_grid(),
            &[Purple, Green, Yellow],
            MatchScoring::default(),
        );
        engine.set_resolving(true);

        let result = engine.try_swap(Position::new(2, 0), Position::new(2, 1));
        assert_eq!(result, Err(SwapError::Busy));

        engine.set_resolving(false);
        assert!(engine
            .try_swap(Position::new(2, 0), Position::new(2, 1))
            .unwrap()
            .valid);
    }

    #[test]
    fn test_swap_error_codes_are_stable() {
        assert_eq!(SwapError::OutOfBounds.code(), "out_of_bounds");
        assert_eq!(SwapError::NotAdjacent.code(), "not_adjacent");
        assert_eq!(SwapError::VacantCell.code(), "vacant_cell");
        assert_eq!(SwapError::Busy.code(), "busy");
    }

    #[test]
    fn test_new_engine_board_is_stable_and_playable() {
        let engine = Engine::new(EngineConfig::new(7)).unwrap();

        assert!(engine.grid().is_full());
        assert!(find_all_matches(engine.grid(), &engine.scoring()).is_empty());
        assert!(engine.has_legal_move());
        assert!(positions_synced(engine.grid()));
        assert_eq!(engine.grid().cols(), DEFAULT_GRID_COLS);
        assert_eq!(engine.grid().rows(), DEFAULT_GRID_ROWS);
    }

    #[test]
    fn test_engine_rejects_grid_too_small_for_any_match() {
        let mut config = EngineConfig::new(1);
        config.cols = 2;
        config.rows = 2;
        assert_eq!(
            Engine::new(config).err(),
            Some(ConfigError::GridTooSmall { cols: 2, rows: 2 })
        );

        let mut zero = EngineConfig::new(1);
        zero.cols = 0;
        assert!(matches!(
            Engine::new(zero).err(),
            Some(ConfigError::GridTooSmall { .. })
        ));
    }

    #[test]
    fn test_engine_rejects_small_palette() {
        let mut config = EngineConfig::new(1);
        config.palette = vec![Red, Blue, Green];
        assert_eq!(
            Engine::new(config).err(),
            Some(ConfigError::PaletteTooSmall { got: 3 })
        );
    }

    #[test]
    fn test_resolution_is_deterministic_for_a_seed() {
        let mut left = Engine::new(EngineConfig::new(42)).unwrap();
        let mut right = Engine::new(EngineConfig::new(42)).unwrap();
        assert_eq!(left.snapshot(), right.snapshot());

        for _ in 0..5 {
            let Some((a, b)) = crate::core::swap::find_first_legal_move(left.grid()) else {
                break;
            };
            let result_left = left.try_swap(a, b).unwrap();
            let result_right = right.try_swap(a, b).unwrap();
            assert_eq!(result_left, result_right);
            assert_eq!(left.snapshot(), right.snapshot());
        }
        assert!(left.moves() > 0);
    }

    #[test]
    fn test_invariants_hold_across_real_moves() {
        let mut engine = Engine::new(EngineConfig::new(1234)).unwrap();

        for _ in 0..8 {
            let Some((a, b)) = crate::core::swap::find_first_legal_move(engine.grid()) else {
                break;
            };
            let result = engine.try_swap(a, b).unwrap();
            assert!(result.valid);
            assert!(engine.grid().is_full());
            assert!(find_all_matches(engine.grid(), &engine.scoring()).is_empty());
            assert!(positions_synced(engine.grid()));
        }
    }

    #[test]
    fn test_spawned_gem_ids_are_fresh() {
        let mut engine = scripted_engine(
            one_move_grid(),
            &[Purple, Green, Yellow],
            MatchScoring::default(),
        );
        let max_before = engine.grid().gems().map(|gem| gem.id).max().unwrap();

        let result = engine
            .try_swap(Position::new(2, 0), Position::new(2, 1))
            .unwrap();

        for gem in &result.iterations[0].settle.spawned {
            assert!(gem.id > max_before);
        }
    }
}
