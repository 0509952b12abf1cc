//! # patzer-core
//!
//! Opponent simulation on top of a UCI engine: session management,
//! candidate aggregation, skill-profiled move selection and premove
//! scheduling.
//!
//! ## Module map
//!
//! - `transport`: line-oriented channel to the engine process
//! - `session`: handshake, search tickets and event delivery
//! - `candidates`: per-rank aggregation of one search's lines
//! - `skill`: dial-to-profile mapping and error tiers
//! - `selector`: the stochastic move choice itself
//! - `premove`: FIFO queue of speculative player moves
//! - `rules`: boundary trait to the external rules engine
//! - `opponent`: driver wiring the above to a host game loop

pub mod candidates;
pub mod opponent;
pub mod premove;
pub mod rules;
pub mod selector;
pub mod session;
pub mod skill;
pub mod transport;

#[cfg(test)]
mod test_helpers;

pub use candidates::{Candidate, CandidateBoard};
pub use opponent::{Evaluation, Notice, Opponent, OpponentConfig};
pub use premove::{PremoveEntry, PremoveQueue};
pub use rules::{Color, GameOutcome, Rules, TerminalReason};
pub use selector::{select_move, MoveChoice};
pub use session::{EngineSession, SearchTicket, SessionConfig, SessionError, SessionState};
pub use skill::{ErrorRates, ErrorTier, SkillProfile};
pub use transport::{ChildTransport, EngineTransport, TransportError};
