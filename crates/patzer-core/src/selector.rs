//! Move selection under a skill profile
//!
//! One uniform draw picks an error tier, the tier's loss window filters the
//! candidate pool, and a second draw picks uniformly inside the pool. All
//! randomness comes in through the caller's generator.

use rand::Rng;

use crate::candidates::{Candidate, CandidateBoard};
use crate::skill::{ErrorTier, SkillProfile};

/// Outcome of one selection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MoveChoice {
    pub mv: String,
    /// Tier drawn before pool filtering. The incurred loss can be smaller
    /// when the window held no candidate and the top line was played instead.
    pub tier: ErrorTier,
    /// Centipawn loss actually incurred relative to the top candidate.
    pub loss: i32,
}

/// Pick the move to play. With fewer than two recorded candidates the error
/// model has nothing to choose between and the engine's terminal move is
/// returned as-is.
pub fn select_move<R: Rng>(
    terminal_best: &str,
    board: &CandidateBoard,
    dial: u8,
    rng: &mut R,
) -> MoveChoice {
    let candidates = board.ranked();
    if candidates.len() < 2 {
        return MoveChoice { mv: terminal_best.to_string(), tier: ErrorTier::Best, loss: 0 };
    }

    let tier = SkillProfile::for_dial(dial).rates().tier_for(rng.random::<f64>());
    let top = candidates[0].cp;
    let pool = eligible(&candidates, top, tier.loss_window());

    let chosen = if pool.is_empty() {
        &candidates[0]
    } else {
        pool[rng.random_range(0..pool.len())]
    };
    MoveChoice { mv: chosen.mv.clone(), tier, loss: top - chosen.cp }
}

fn eligible(candidates: &[Candidate], top: i32, window: (i32, i32)) -> Vec<&Candidate> {
    let (min, max) = window;
    candidates
        .iter()
        .filter(|c| {
            let loss = top - c.cp;
            loss >= min && loss < max
        })
        .collect()
}
