//! Core types shared across the application
//! This module contains pure data types with no external dependencies

/// Default grid dimensions (columns x rows)
pub const DEFAULT_GRID_COLS: u8 = 9;
pub const DEFAULT_GRID_ROWS: u8 = 9;

/// Minimum run length that counts as a match
pub const MIN_RUN_LEN: usize = 3;

/// Scoring constants: `base * len + bonus * (len - 2)`
pub const MATCH_BASE_SCORE: u32 = 50;
pub const MATCH_RUN_BONUS: u32 = 50;

/// Bounded retries when drawing a refill gem that should avoid an immediate match
pub const REFILL_MAX_ATTEMPTS: u32 = 10;

/// Smallest palette the engine will accept
pub const MIN_PALETTE_KINDS: usize = 4;

/// Bounded retries when generating a board that must have at least one legal move
pub const GENERATION_MAX_ATTEMPTS: u32 = 32;

/// Gem color kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GemKind {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

/// The full palette, in canonical order
pub const ALL_GEM_KINDS: [GemKind; 6] = [
    GemKind::Red,
    GemKind::Blue,
    GemKind::Green,
    GemKind::Yellow,
    GemKind::Purple,
    GemKind::Orange,
];

impl GemKind {
    /// Parse gem kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(GemKind::Red),
            "blue" => Some(GemKind::Blue),
            "green" => Some(GemKind::Green),
            "yellow" => Some(GemKind::Yellow),
            "purple" => Some(GemKind::Purple),
            "orange" => Some(GemKind::Orange),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GemKind::Red => "red",
            GemKind::Blue => "blue",
            GemKind::Green => "green",
            GemKind::Yellow => "yellow",
            GemKind::Purple => "purple",
            GemKind::Orange => "orange",
        }
    }
}

/// Special gem markers.
///
/// Specials participate in match detection only as a distinct match key
/// (same kind + same marker); activation effects live outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKind {
    Bomb,
    LightningH,
    LightningV,
    Rainbow,
}

impl SpecialKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bomb" => Some(SpecialKind::Bomb),
            "lightning_h" => Some(SpecialKind::LightningH),
            "lightning_v" => Some(SpecialKind::LightningV),
            "rainbow" => Some(SpecialKind::Rainbow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialKind::Bomb => "bomb",
            SpecialKind::LightningH => "lightning_h",
            SpecialKind::LightningV => "lightning_v",
            SpecialKind::Rainbow => "rainbow",
        }
    }
}

/// Unique gem identity, monotonic within an engine session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GemId(pub u64);

/// Grid coordinates: (0, 0) is top-left, rows grow downward (gravity direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub col: u8,
    pub row: u8,
}

impl Position {
    pub fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Orthogonal adjacency: Manhattan distance exactly 1
    pub fn is_adjacent(&self, other: &Position) -> bool {
        let dc = (self.col as i16 - other.col as i16).unsigned_abs();
        let dr = (self.row as i16 - other.row as i16).unsigned_abs();
        (dc == 1 && dr == 0) || (dc == 0 && dr == 1)
    }
}

/// A gem occupying one grid cell.
///
/// Invariant: `col`/`row` always equal the gem's indices in the grid store;
/// every placement rewrites them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gem {
    pub id: GemId,
    pub kind: GemKind,
    pub special: Option<SpecialKind>,
    pub col: u8,
    pub row: u8,
}

impl Gem {
    pub fn position(&self) -> Position {
        Position::new(self.col, self.row)
    }

    /// Key used for run comparison: kind plus special marker
    pub fn match_key(&self) -> MatchKey {
        MatchKey {
            kind: self.kind,
            special: self.special,
        }
    }
}

/// Comparison key for match detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub kind: GemKind,
    pub special: Option<SpecialKind>,
}

impl MatchKey {
    /// Key for a plain (non-special) gem of the given kind
    pub fn plain(kind: GemKind) -> Self {
        Self {
            kind,
            special: None,
        }
    }
}

/// Cell on the grid (None = empty, Some = occupied by a gem)
pub type Cell = Option<Gem>;

/// Axis of a matched run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}
