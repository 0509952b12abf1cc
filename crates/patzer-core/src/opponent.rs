//! Opponent driver
//!
//! Sits between the host's game loop and the engine session. `sync` watches
//! the rules oracle and schedules searches for the engine's turns or drains
//! one premove on the player's, `poll` pumps the session and turns its
//! events into typed notices. The skill dial is handed in per call and never
//! stored, so the host's UI state stays out of the selection logic.

use std::collections::HashMap;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use rand::Rng;

use patzer_uci::{EngineEvent, GoParams, Score};

use crate::candidates::CandidateBoard;
use crate::premove::{PremoveEntry, PremoveQueue};
use crate::rules::{Color, Rules};
use crate::selector::{select_move, MoveChoice};
use crate::session::{EngineSession, SearchTicket, SessionError, SessionEvent};
use crate::transport::EngineTransport;

#[derive(Debug, Clone)]
pub struct OpponentConfig {
    /// Search depth for the engine's own moves.
    pub search_depth: u32,
    /// Search depth for hint requests, deeper than the play searches.
    pub hint_depth: u32,
    /// Optional wall-clock cap forwarded with every search.
    pub movetime_ms: Option<u64>,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self { search_depth: 10, hint_depth: 12, movetime_ms: None }
    }
}

/// What a search was started for. Decides which notice its conclusion
/// becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchKind {
    Play,
    Hint,
}

/// Running evaluation of the primary line, accumulated across the info
/// stream of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Side the searched position had to move; scores are from its
    /// perspective.
    pub side_to_move: Color,
    pub depth: u32,
    pub score: Option<Score>,
    pub pv: Vec<String>,
}

impl Evaluation {
    fn empty(side_to_move: Color) -> Self {
        Self { side_to_move, depth: 0, score: None, pv: Vec::new() }
    }

    /// Score seen from White, for display surfaces that keep a fixed
    /// orientation.
    pub fn white_score(&self) -> Option<Score> {
        self.score.map(|s| match self.side_to_move {
            Color::White => s,
            Color::Black => s.negated(),
        })
    }

    pub fn white_cp(&self) -> Option<i32> {
        self.white_score().map(Score::to_cp)
    }
}

/// Outward-facing notifications, delivered through the receiver returned by
/// [`Opponent::new`].
#[derive(Debug, Clone)]
pub enum Notice {
    /// Primary-line progress of the running search.
    EvaluationUpdate(Evaluation),
    /// A play search concluded. The ticket names the position it was for;
    /// hosts that moved on compare it against their current one and discard
    /// stale results.
    MoveDecided { ticket: SearchTicket, choice: MoveChoice },
    /// A hint search concluded.
    HintReady { ticket: SearchTicket, choice: MoveChoice },
    /// The premove queue changed; snapshot attached, oldest first.
    PremoveQueueChanged(Vec<PremoveEntry>),
}

pub struct Opponent<T: EngineTransport, R: Rng> {
    session: EngineSession<T>,
    config: OpponentConfig,
    rng: R,
    candidates: CandidateBoard,
    premoves: PremoveQueue,
    evaluation: Evaluation,
    kinds: HashMap<u64, SearchKind>,
    engine_side: Color,
    last_synced_fen: Option<String>,
    notices_tx: Sender<Notice>,
}

impl<T: EngineTransport, R: Rng> Opponent<T, R> {
    /// Wrap a session. `engine_side` is the color this driver plays;
    /// notices arrive on the returned receiver.
    pub fn new(
        session: EngineSession<T>,
        engine_side: Color,
        config: OpponentConfig,
        rng: R,
    ) -> (Self, Receiver<Notice>) {
        let (notices_tx, notices_rx) = unbounded();
        let opponent = Self {
            session,
            config,
            rng,
            candidates: CandidateBoard::new(),
            premoves: PremoveQueue::new(),
            evaluation: Evaluation::empty(Color::White),
            kinds: HashMap::new(),
            engine_side,
            last_synced_fen: None,
            notices_tx,
        };
        (opponent, notices_rx)
    }

    pub fn engine_side(&self) -> Color {
        self.engine_side
    }

    /// Change sides, e.g. when the player flips the board. The next `sync`
    /// re-examines the position from scratch.
    pub fn set_engine_side(&mut self, side: Color) {
        self.engine_side = side;
        self.last_synced_fen = None;
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    /// Reconcile with the game state. On the engine's turn a play search is
    /// scheduled; on the player's turn at most one premove is applied, with
    /// the whole queue dropped if it turns out illegal. A successful premove
    /// hands the turn over, so the loop continues until the position stops
    /// changing.
    pub fn sync(&mut self, rules: &mut dyn Rules) -> Result<(), SessionError> {
        loop {
            let fen = rules.fen();
            if self.last_synced_fen.as_deref() == Some(fen.as_str()) {
                return Ok(());
            }
            self.last_synced_fen = Some(fen.clone());

            if rules.outcome().is_some() {
                return Ok(());
            }
            if rules.side_to_move() == self.engine_side {
                self.start_search(fen, SearchKind::Play)?;
                return Ok(());
            }
            if self.premoves.is_empty() {
                return Ok(());
            }
            self.apply_one_premove(rules);
        }
    }

    /// Start a play search without consulting the rules oracle. `sync` is
    /// the usual entry point; this one serves hosts that drive positions
    /// directly.
    pub fn request_move(&mut self, fen: &str) -> Result<SearchTicket, SessionError> {
        self.start_search(fen.to_string(), SearchKind::Play)
    }

    /// Start a hint search for the player's position.
    pub fn request_hint(&mut self, fen: &str) -> Result<SearchTicket, SessionError> {
        self.start_search(fen.to_string(), SearchKind::Hint)
    }

    /// Pump the session without blocking and convert the batch into notices.
    pub fn poll(&mut self, dial: u8) -> Result<(), SessionError> {
        let batch = self.session.pump()?;
        self.handle_batch(batch, dial);
        Ok(())
    }

    /// Like [`poll`](Self::poll), but waits up to `timeout` for the first
    /// engine line.
    pub fn poll_wait(&mut self, timeout: Duration, dial: u8) -> Result<(), SessionError> {
        let batch = self.session.pump_wait(timeout)?;
        self.handle_batch(batch, dial);
        Ok(())
    }

    /// Pump until the session handshake completes.
    pub fn wait_ready(&mut self, timeout: Duration) -> Result<(), SessionError> {
        self.session.wait_ready(timeout)
    }

    pub fn queue_premove(&mut self, entry: PremoveEntry) {
        self.premoves.enqueue(entry);
        self.emit_queue_changed();
    }

    pub fn clear_premoves(&mut self) {
        self.premoves.clear();
        self.emit_queue_changed();
    }

    pub fn premoves(&self) -> Vec<PremoveEntry> {
        self.premoves.peek_all()
    }

    /// Forget everything game-specific: premoves, candidates, the running
    /// evaluation and search bookkeeping. The session and its handshake
    /// survive.
    pub fn reset(&mut self) {
        self.premoves.clear();
        self.emit_queue_changed();
        self.candidates.reset();
        self.evaluation = Evaluation::empty(Color::White);
        self.kinds.clear();
        self.last_synced_fen = None;
    }

    /// Ask the engine to cut the current search short; its terminal event
    /// still arrives and concludes normally.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        self.session.stop()
    }

    pub fn quit(&mut self) -> Result<(), SessionError> {
        self.session.quit()
    }

    fn start_search(&mut self, fen: String, kind: SearchKind) -> Result<SearchTicket, SessionError> {
        let depth = match kind {
            SearchKind::Play => self.config.search_depth,
            SearchKind::Hint => self.config.hint_depth,
        };
        self.candidates.reset();
        self.evaluation = Evaluation::empty(Color::from_fen(&fen));
        let limits = GoParams { depth: Some(depth), movetime_ms: self.config.movetime_ms };
        let ticket = self.session.evaluate_position(&fen, limits)?;
        self.kinds.insert(ticket.id, kind);
        Ok(ticket)
    }

    fn apply_one_premove(&mut self, rules: &mut dyn Rules) {
        let Some(entry) = self.premoves.dequeue_one() else {
            return;
        };
        // Promotion stays unspecified; the oracle's default applies.
        if !rules.try_move(&entry.from, &entry.to, None) {
            log::debug!(
                "premove {}{} rejected, dropping {} queued behind it",
                entry.from,
                entry.to,
                self.premoves.len()
            );
            self.premoves.clear();
        }
        self.emit_queue_changed();
    }

    fn handle_batch(&mut self, batch: Vec<SessionEvent>, dial: u8) {
        for delivered in batch {
            let event = &delivered.event;
            if event.multipv_rank > 0 {
                self.candidates.record(event);
            }
            if let Some(ticket) = delivered.concluded.clone() {
                self.conclude(ticket, event, dial);
                continue;
            }
            if event.is_terminal() {
                // Stray terminal with no outstanding search; already warned
                // by the session.
                continue;
            }
            if event.multipv_rank <= 1 {
                self.update_evaluation(event);
            }
        }
    }

    fn update_evaluation(&mut self, event: &EngineEvent) {
        self.evaluation.depth = event.depth;
        if let Some(score) = event.score {
            self.evaluation.score = Some(score);
        }
        if let Some(pv) = &event.pv {
            self.evaluation.pv = pv.clone();
        }
        self.emit(Notice::EvaluationUpdate(self.evaluation.clone()));
    }

    fn conclude(&mut self, ticket: SearchTicket, event: &EngineEvent, dial: u8) {
        let kind = self.kinds.remove(&ticket.id).unwrap_or(SearchKind::Play);
        let Some(best) = event.best_move.as_deref() else {
            return;
        };
        let choice = select_move(best, &self.candidates, dial, &mut self.rng);
        log::debug!(
            "search {} for {} concluded: {} ({}, loss {})",
            ticket.id,
            ticket.fen,
            choice.mv,
            choice.tier,
            choice.loss
        );
        self.candidates.reset();
        match kind {
            SearchKind::Play => self.emit(Notice::MoveDecided { ticket, choice }),
            SearchKind::Hint => self.emit(Notice::HintReady { ticket, choice }),
        }
    }

    fn emit_queue_changed(&mut self) {
        self.emit(Notice::PremoveQueueChanged(self.premoves.peek_all()));
    }

    fn emit(&mut self, notice: Notice) {
        // A host that dropped the receiver just stops listening.
        let _ = self.notices_tx.send(notice);
    }
}
