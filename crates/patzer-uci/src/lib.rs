//! UCI protocol types for the patzer opponent layer
//!
//! This crate covers the wire format only: parsing engine output lines into
//! [`EngineEvent`]s and rendering the handful of commands the client sends.
//! Session sequencing, candidate aggregation and move selection live in
//! `patzer-core`.

pub mod command;
pub mod event;

pub use command::{GoParams, GuiCommand};
pub use event::{parse_engine_line, EngineEvent, Score};

/// Maximum search depth the client will ever request, in plies.
pub const MAX_SEARCH_DEPTH: u32 = 24;

/// Exact acknowledgement line answering the readiness probe.
pub const READY_ACK: &str = "readyok";
