//! Boundary to the external rules engine
//!
//! Move legality, position bookkeeping and game-over detection live on the
//! other side of this trait. The core only ever sees FEN strings and yes/no
//! answers, so it can be driven by any rules implementation.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Side to move from the second FEN field. Malformed input reads as
    /// White.
    pub fn from_fen(fen: &str) -> Self {
        match fen.split_whitespace().nth(1) {
            Some("b") => Color::Black,
            _ => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Why a finished game ended. `Unknown` covers rule endings the oracle
/// detects but cannot name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    Checkmate,
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    FiftyMoveRule,
    Unknown,
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminalReason::Checkmate => "checkmate",
            TerminalReason::Stalemate => "stalemate",
            TerminalReason::ThreefoldRepetition => "threefold repetition",
            TerminalReason::InsufficientMaterial => "insufficient material",
            TerminalReason::FiftyMoveRule => "fifty-move rule",
            TerminalReason::Unknown => "unknown cause",
        };
        write!(f, "{name}")
    }
}

/// Result of a finished game. `winner` is `None` for every draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOutcome {
    pub winner: Option<Color>,
    pub reason: TerminalReason,
}

impl GameOutcome {
    pub fn win(winner: Color, reason: TerminalReason) -> Self {
        Self { winner: Some(winner), reason }
    }

    pub fn draw(reason: TerminalReason) -> Self {
        Self { winner: None, reason }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Some(color) => write!(f, "{} wins by {}", color, self.reason),
            None => write!(f, "Draw by {}", self.reason),
        }
    }
}

/// Narrow interface to the rules engine. Implementations are expected to
/// classify endings checkmate first, then stalemate, then the draw rules.
pub trait Rules {
    /// Validate and apply a move, reporting whether it was legal. `None`
    /// promotion leaves the promotion policy to the implementation; queening
    /// is the conventional default.
    fn try_move(&mut self, from: &str, to: &str, promotion: Option<char>) -> bool;

    /// Current position as FEN.
    fn fen(&self) -> String;

    fn side_to_move(&self) -> Color;

    /// `None` while the game is live.
    fn outcome(&self) -> Option<GameOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_to_move_from_fen() {
        assert_eq!(
            Color::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Color::White
        );
        assert_eq!(
            Color::from_fen("rnbqkbnr/pppppppp/8/4P3/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"),
            Color::Black
        );
        assert_eq!(Color::from_fen("garbage"), Color::White);
        assert_eq!(Color::from_fen(""), Color::White);
    }

    #[test]
    fn test_outcome_display() {
        let mate = GameOutcome::win(Color::White, TerminalReason::Checkmate);
        assert_eq!(mate.to_string(), "White wins by checkmate");
        let draw = GameOutcome::draw(TerminalReason::Stalemate);
        assert_eq!(draw.to_string(), "Draw by stalemate");
        let fifty = GameOutcome::draw(TerminalReason::FiftyMoveRule);
        assert_eq!(fifty.to_string(), "Draw by fifty-move rule");
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }
}
