//! Skill profiles: error rates and centipawn-loss windows
//!
//! A 0-100 dial maps onto four fixed profiles. Each profile carries per-move
//! probabilities of deliberately playing an inferior move, and each error
//! tier owns a half-open window of acceptable centipawn loss relative to the
//! engine's top line.

use std::fmt;

use serde::Serialize;

/// Playing-strength tier selected by the dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillProfile {
    Strong,
    Club,
    Casual,
    Beginner,
}

impl SkillProfile {
    /// Map the dial onto a profile. Values above 100 saturate at `Beginner`.
    pub fn for_dial(dial: u8) -> Self {
        match dial {
            0..=24 => SkillProfile::Strong,
            25..=49 => SkillProfile::Club,
            50..=74 => SkillProfile::Casual,
            _ => SkillProfile::Beginner,
        }
    }

    pub fn rates(self) -> ErrorRates {
        match self {
            SkillProfile::Strong => ErrorRates { inaccuracy: 0.0, mistake: 0.0, blunder: 0.0 },
            SkillProfile::Club => ErrorRates { inaccuracy: 0.18, mistake: 0.06, blunder: 0.015 },
            SkillProfile::Casual => ErrorRates { inaccuracy: 0.28, mistake: 0.12, blunder: 0.04 },
            SkillProfile::Beginner => ErrorRates { inaccuracy: 0.35, mistake: 0.18, blunder: 0.08 },
        }
    }

    /// Short human description of how this profile plays.
    pub fn description(self) -> &'static str {
        match self {
            SkillProfile::Strong => "plays near-perfectly",
            SkillProfile::Club => "plays like a club player",
            SkillProfile::Casual => "makes occasional mistakes",
            SkillProfile::Beginner => "blunders frequently",
        }
    }
}

impl fmt::Display for SkillProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkillProfile::Strong => "strong",
            SkillProfile::Club => "club",
            SkillProfile::Casual => "casual",
            SkillProfile::Beginner => "beginner",
        };
        write!(f, "{name}")
    }
}

/// Per-move error probabilities. One uniform draw decides the tier; the
/// rates stack in blunder, mistake, inaccuracy order, so their sum must
/// stay below 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorRates {
    pub inaccuracy: f64,
    pub mistake: f64,
    pub blunder: f64,
}

impl ErrorRates {
    /// Tier for one uniform draw in `[0, 1)`, checked worst-first.
    pub fn tier_for(self, r: f64) -> ErrorTier {
        if r < self.blunder {
            ErrorTier::Blunder
        } else if r < self.blunder + self.mistake {
            ErrorTier::Mistake
        } else if r < self.blunder + self.mistake + self.inaccuracy {
            ErrorTier::Inaccuracy
        } else {
            ErrorTier::Best
        }
    }
}

/// How far below the top line a chosen move is allowed to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorTier {
    Best,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl ErrorTier {
    /// Centipawn-loss window relative to the top candidate, lower bound
    /// inclusive, upper bound exclusive.
    pub fn loss_window(self) -> (i32, i32) {
        match self {
            ErrorTier::Best => (0, 30),
            ErrorTier::Inaccuracy => (30, 80),
            ErrorTier::Mistake => (80, 200),
            ErrorTier::Blunder => (200, 10_000),
        }
    }
}

impl fmt::Display for ErrorTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorTier::Best => "best",
            ErrorTier::Inaccuracy => "inaccuracy",
            ErrorTier::Mistake => "mistake",
            ErrorTier::Blunder => "blunder",
        };
        write!(f, "{name}")
    }
}
