//! gem-cascade - deterministic match-3 swap/cascade resolution engine.
//!
//! The core validates a proposed swap of two adjacent gems, commits it,
//! and resolves the board to a stable state: detect runs, remove them,
//! compact columns, refill from a seedable gem source, repeat while new
//! runs appear. Each completed swap yields an immutable `MoveResult` with
//! the full per-iteration event log; the `adapter` module encodes that log
//! as line-delimited JSON for presentation and analytics consumers.

pub mod adapter;
pub mod core;
pub mod types;
