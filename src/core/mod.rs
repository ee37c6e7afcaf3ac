//! Core module - the match/cascade engine with no I/O dependencies
//!
//! Everything needed to validate a swap, resolve its cascades, and report
//! the result lives here. Rendering, pacing, and transport are consumers.

pub mod grid;
pub mod matches;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod swap;

// Re-export commonly used types
pub use grid::Grid;
pub use matches::{find_all_matches, Match};
pub use resolver::{
    ConfigError, Engine, EngineConfig, GemFall, IterationRecord, MoveResult, NoopObserver,
    ResolutionObserver, SettleRecord, SwapError,
};
pub use rng::{GemSource, RandomGemSource, SimpleRng};
pub use scoring::MatchScoring;
pub use snapshot::{GridSnapshot, RestoreError};
pub use swap::{find_first_legal_move, has_any_legal_move, propose_swap, SwapProbe};
