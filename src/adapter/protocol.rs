//! Protocol module - JSON message types for presentation and analytics
//!
//! Line-delimited JSON. Commands come in as `swap` messages; each resolved
//! cycle goes out as an ordered stream: per iteration one `matched` message
//! per removed match and one `settled` message for the fall/spawn step,
//! then a final `result`. Rejected commands answer with an `error` message
//! carrying a stable code. The engine computes the whole log synchronously;
//! pacing and animation belong to the consumer.

use serde::{Deserialize, Serialize};

use crate::core::resolver::{GemFall, MoveResult};
use crate::core::rng::GemSource;
use crate::core::snapshot::GridSnapshot;
use crate::core::{Engine, SwapError};
use crate::types::{Axis, Gem, GemId, GemKind, Position, SpecialKind};

// ============== Singleton message tags ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapType {
    #[serde(rename = "swap")]
    Swap,
}

impl Default for SwapType {
    fn default() -> Self {
        Self::Swap
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

impl Default for ObservationType {
    fn default() -> Self {
        Self::Observation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchedType {
    #[serde(rename = "matched")]
    Matched,
}

impl Default for MatchedType {
    fn default() -> Self {
        Self::Matched
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettledType {
    #[serde(rename = "settled")]
    Settled,
}

impl Default for SettledType {
    fn default() -> Self {
        Self::Settled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    #[serde(rename = "result")]
    Result,
}

impl Default for ResultType {
    fn default() -> Self {
        Self::Result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

impl Default for ErrorType {
    fn default() -> Self {
        Self::Error
    }
}

// ============== Wire value types ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GemKindWire {
    #[serde(rename = "red")]
    Red,
    #[serde(rename = "blue")]
    Blue,
    #[serde(rename = "green")]
    Green,
    #[serde(rename = "yellow")]
    Yellow,
    #[serde(rename = "purple")]
    Purple,
    #[serde(rename = "orange")]
    Orange,
}

impl From<GemKind> for GemKindWire {
    fn from(value: GemKind) -> Self {
        match value {
            GemKind::Red => GemKindWire::Red,
            GemKind::Blue => GemKindWire::Blue,
            GemKind::Green => GemKindWire::Green,
            GemKind::Yellow => GemKindWire::Yellow,
            GemKind::Purple => GemKindWire::Purple,
            GemKind::Orange => GemKindWire::Orange,
        }
    }
}

impl From<GemKindWire> for GemKind {
    fn from(value: GemKindWire) -> Self {
        match value {
            GemKindWire::Red => GemKind::Red,
            GemKindWire::Blue => GemKind::Blue,
            GemKindWire::Green => GemKind::Green,
            GemKindWire::Yellow => GemKind::Yellow,
            GemKindWire::Purple => GemKind::Purple,
            GemKindWire::Orange => GemKind::Orange,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialWire {
    #[serde(rename = "bomb")]
    Bomb,
    #[serde(rename = "lightning_h")]
    LightningH,
    #[serde(rename = "lightning_v")]
    LightningV,
    #[serde(rename = "rainbow")]
    Rainbow,
}

impl From<SpecialKind> for SpecialWire {
    fn from(value: SpecialKind) -> Self {
        match value {
            SpecialKind::Bomb => SpecialWire::Bomb,
            SpecialKind::LightningH => SpecialWire::LightningH,
            SpecialKind::LightningV => SpecialWire::LightningV,
            SpecialKind::Rainbow => SpecialWire::Rainbow,
        }
    }
}

impl From<SpecialWire> for SpecialKind {
    fn from(value: SpecialWire) -> Self {
        match value {
            SpecialWire::Bomb => SpecialKind::Bomb,
            SpecialWire::LightningH => SpecialKind::LightningH,
            SpecialWire::LightningV => SpecialKind::LightningV,
            SpecialWire::Rainbow => SpecialKind::Rainbow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisWire {
    #[serde(rename = "horizontal")]
    Horizontal,
    #[serde(rename = "vertical")]
    Vertical,
}

impl From<Axis> for AxisWire {
    fn from(value: Axis) -> Self {
        match value {
            Axis::Horizontal => AxisWire::Horizontal,
            Axis::Vertical => AxisWire::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionWire {
    pub col: u8,
    pub row: u8,
}

impl From<PositionWire> for Position {
    fn from(value: PositionWire) -> Self {
        Position::new(value.col, value.row)
    }
}

impl From<Position> for PositionWire {
    fn from(value: Position) -> Self {
        Self {
            col: value.col,
            row: value.row,
        }
    }
}

/// One gem record on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellWire {
    pub id: u64,
    pub kind: GemKindWire,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<SpecialWire>,
    pub col: u8,
    pub row: u8,
}

impl From<Gem> for CellWire {
    fn from(value: Gem) -> Self {
        Self {
            id: value.id.0,
            kind: value.kind.into(),
            special: value.special.map(SpecialWire::from),
            col: value.col,
            row: value.row,
        }
    }
}

impl CellWire {
    pub fn to_gem(self) -> Gem {
        Gem {
            id: GemId(self.id),
            kind: self.kind.into(),
            special: self.special.map(SpecialKind::from),
            col: self.col,
            row: self.row,
        }
    }
}

/// One gravity fall on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallWire {
    pub id: u64,
    pub kind: GemKindWire,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<SpecialWire>,
    pub col: u8,
    pub from_row: u8,
    pub to_row: u8,
}

impl From<GemFall> for FallWire {
    fn from(value: GemFall) -> Self {
        Self {
            id: value.id.0,
            kind: value.kind.into(),
            special: value.special.map(SpecialWire::from),
            col: value.col,
            from_row: value.from_row,
            to_row: value.to_row,
        }
    }
}

// ============== Client -> Engine Messages ==============

/// Swap command from a presentation or AI collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCommand {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: SwapType,
    pub seq: u64,
    pub a: PositionWire,
    pub b: PositionWire,
}

// ============== Engine -> Client Messages ==============

/// One removed match within a resolution iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: MatchedType,
    pub seq: u64,
    pub iteration: u32,
    pub axis: AxisWire,
    pub score: u32,
    pub cells: Vec<CellWire>,
}

/// Fall/spawn step that follows an iteration's removals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettledMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: SettledType,
    pub seq: u64,
    pub iteration: u32,
    pub fallen: Vec<FallWire>,
    pub spawned: Vec<CellWire>,
}

/// Final outcome of one swap command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ResultType,
    pub seq: u64,
    pub valid: bool,
    pub score: u32,
    pub cascades: u32,
}

/// Protocol rejection with a stable code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub code: String,
    pub message: String,
}

impl ErrorMessage {
    pub fn from_swap_error(seq: u64, error: SwapError) -> Self {
        Self {
            msg_type: ErrorType::Error,
            seq,
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Full grid view for initial render and resync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub cols: u8,
    pub rows: u8,
    /// Row-major cell array, `null` for empty cells
    pub cells: Vec<Option<CellWire>>,
    pub score: u64,
    pub moves: u32,
    pub seed: u32,
}

impl ObservationMessage {
    pub fn from_engine<S: GemSource>(engine: &Engine<S>, seq: u64) -> Self {
        let snapshot = engine.snapshot();
        Self {
            msg_type: ObservationType::Observation,
            seq,
            cols: snapshot.cols,
            rows: snapshot.rows,
            cells: snapshot
                .cells
                .iter()
                .map(|cell| cell.map(CellWire::from))
                .collect(),
            score: engine.score(),
            moves: engine.moves(),
            seed: engine.seed(),
        }
    }

    /// Rebuild the core snapshot this message carries
    pub fn grid_snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            cols: self.cols,
            rows: self.rows,
            cells: self
                .cells
                .iter()
                .map(|cell| cell.map(CellWire::to_gem))
                .collect(),
        }
    }
}

/// Encode one completed swap's ordered event log as JSON lines:
/// per iteration `matched` messages then a `settled` message, and a final
/// `result`. Sequence numbers start at `start_seq` and increment per line.
pub fn encode_move_events(start_seq: u64, result: &MoveResult) -> serde_json::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut seq = start_seq;

    for (iteration, record) in result.iterations.iter().enumerate() {
        let iteration = iteration as u32;
        for matched in &record.matches {
            let message = MatchedMessage {
                msg_type: MatchedType::Matched,
                seq,
                iteration,
                axis: matched.axis.into(),
                score: matched.score,
                cells: matched.cells.iter().copied().map(CellWire::from).collect(),
            };
            lines.push(serde_json::to_string(&message)?);
            seq += 1;
        }

        let message = SettledMessage {
            msg_type: SettledType::Settled,
            seq,
            iteration,
            fallen: record.settle.fallen.iter().copied().map(FallWire::from).collect(),
            spawned: record.settle.spawned.iter().copied().map(CellWire::from).collect(),
        };
        lines.push(serde_json::to_string(&message)?);
        seq += 1;
    }

    let message = ResultMessage {
        msg_type: ResultType::Result,
        seq,
        valid: result.valid,
        score: result.score,
        cascades: result.cascades,
    };
    lines.push(serde_json::to_string(&message)?);

    Ok(lines)
}
