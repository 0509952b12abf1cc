//! Candidate aggregation for one multi-line search
//!
//! The engine streams ranked lines repeatedly as the search deepens. The
//! board keeps one slot per rank, letting later (deeper) reports overwrite
//! earlier ones, and hands the selector a snapshot sorted by strength.

use std::collections::HashMap;

use patzer_uci::{EngineEvent, Score};
use serde::Serialize;

/// One candidate move with its normalized score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// First move of the line's principal variation, in coordinate notation.
    pub mv: String,
    /// Centipawns for the side to move, mates folded onto the same scale.
    pub cp: i32,
    /// Rank the engine reported the line under (1 is its best).
    pub rank: u32,
}

#[derive(Debug, Default)]
pub struct CandidateBoard {
    slots: HashMap<u32, Candidate>,
}

impl CandidateBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ranked line. Only events carrying a positive rank and a
    /// non-empty principal variation contribute; a scoreless line counts as
    /// even. Re-reports of a rank overwrite the previous slot.
    pub fn record(&mut self, event: &EngineEvent) {
        if event.multipv_rank == 0 {
            return;
        }
        let Some(first) = event.pv.as_ref().and_then(|pv| pv.first()) else {
            return;
        };
        let cp = event.score.map_or(0, Score::to_cp);
        self.slots.insert(
            event.multipv_rank,
            Candidate { mv: first.clone(), cp, rank: event.multipv_rank },
        );
    }

    /// Snapshot sorted by score descending; equal scores keep engine order.
    pub fn ranked(&self) -> Vec<Candidate> {
        let mut out: Vec<Candidate> = self.slots.values().cloned().collect();
        out.sort_by_key(|c| (std::cmp::Reverse(c.cp), c.rank));
        out
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Forget everything. Called at every search start so lines from the
    /// previous position cannot leak into the new pool.
    pub fn reset(&mut self) {
        self.slots.clear();
    }
}
