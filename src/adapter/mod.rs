//! Adapter module - wire types for external collaborators
//!
//! The core stays transport-free; this module only defines the message
//! shapes and the event-log encoding. Whatever carries the lines (socket,
//! channel, log file) is the surrounding application's concern.

pub mod protocol;

pub use protocol::{
    encode_move_events, ErrorMessage, MatchedMessage, ObservationMessage, ResultMessage,
    SettledMessage, SwapCommand,
};
