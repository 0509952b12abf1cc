//! Parsing of engine output lines into structured events

use serde::Serialize;

/// Search score reported by the engine, from the side to move's perspective.
///
/// Positive mate = the side to move delivers mate in n moves, negative = it
/// gets mated in n.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Score {
    Cp(i32),
    Mate(i32),
}

impl Score {
    /// Fold onto a single centipawn scale where mates dominate every
    /// conventional score: mate in n maps to `10000 - n` (or `-10000 - n`
    /// when the side to move is being mated), so faster mates order above
    /// slower ones and above any centipawn evaluation.
    pub fn to_cp(self) -> i32 {
        match self {
            Score::Cp(v) => v,
            Score::Mate(n) => {
                if n > 0 {
                    10_000 - n
                } else {
                    -10_000 - n
                }
            }
        }
    }

    /// The same score seen from the opposite side.
    pub fn negated(self) -> Score {
        match self {
            Score::Cp(v) => Score::Cp(-v),
            Score::Mate(n) => Score::Mate(-n),
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Cp(v) => write!(f, "cp {v}"),
            Score::Mate(n) => write!(f, "mate {n}"),
        }
    }
}

/// One parsed line of engine output.
///
/// Every received line maps to exactly one event; fields the line does not
/// carry stay at their defaults. The raw line is always preserved so callers
/// can exact-match protocol acknowledgements (`readyok`) that carry no
/// structured fields at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineEvent {
    pub raw: String,
    /// Move the engine settled on, present only on terminal `bestmove` lines.
    pub best_move: Option<String>,
    pub ponder_move: Option<String>,
    pub score: Option<Score>,
    /// Principal variation; the first move is the one this line recommends.
    pub pv: Option<Vec<String>>,
    /// Search depth, 0 when the line reports none.
    pub depth: u32,
    /// 1-based multipv rank, 0 when the line is not a ranked line.
    pub multipv_rank: u32,
}

impl EngineEvent {
    /// True for terminal lines that close a search.
    pub fn is_terminal(&self) -> bool {
        self.best_move.is_some()
    }
}

/// Parse one line of engine output. Never fails: unrecognized lines come
/// back with only `raw` populated.
///
/// Each marker is extracted independently by walking whitespace tokens, so
/// `seldepth`/`multipv` never collide with the `depth`/`pv` markers the way
/// a substring scan would.
pub fn parse_engine_line(line: &str) -> EngineEvent {
    let mut event = EngineEvent {
        raw: line.to_string(),
        ..EngineEvent::default()
    };

    let mut it = line.split_whitespace().peekable();
    while let Some(tok) = it.next() {
        match tok {
            "bestmove" => {
                if let Some(mv) = it.peek() {
                    event.best_move = Some((*mv).to_string());
                    it.next();
                }
            }
            "ponder" => {
                if let Some(mv) = it.peek() {
                    event.ponder_move = Some((*mv).to_string());
                    it.next();
                }
            }
            "cp" => {
                if let Some(v) = it.peek().and_then(|s| s.parse::<i32>().ok()) {
                    // A mate score on the same line subsumes the cp value.
                    if !matches!(event.score, Some(Score::Mate(_))) {
                        event.score = Some(Score::Cp(v));
                    }
                    it.next();
                }
            }
            "mate" => {
                if let Some(v) = it.peek().and_then(|s| s.parse::<i32>().ok()) {
                    event.score = Some(Score::Mate(v));
                    it.next();
                }
            }
            "depth" => {
                if let Some(v) = it.peek().and_then(|s| s.parse::<u32>().ok()) {
                    event.depth = v;
                    it.next();
                }
            }
            "multipv" => {
                if let Some(v) = it.peek().and_then(|s| s.parse::<u32>().ok()) {
                    event.multipv_rank = v;
                    it.next();
                }
            }
            "pv" => {
                let moves: Vec<String> = it.by_ref().map(|s| s.to_string()).collect();
                if !moves.is_empty() {
                    event.pv = Some(moves);
                }
            }
            _ => {}
        }
    }

    event
}
