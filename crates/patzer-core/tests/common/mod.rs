//! Common test utilities for patzer-core tests

#![allow(dead_code)] // These utilities may be used by various test files

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crossbeam_channel::{unbounded, Receiver, Sender};
use patzer_core::rules::{Color, GameOutcome, Rules};
use patzer_core::transport::{EngineTransport, TransportError};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
pub const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

/// Transport whose engine side is played by the test itself.
pub struct FakeEngine {
    sent: Arc<Mutex<Vec<String>>>,
    rx: Receiver<String>,
}

/// Test-side handle feeding lines into a [`FakeEngine`].
pub struct EngineScript {
    sent: Arc<Mutex<Vec<String>>>,
    tx: Sender<String>,
}

impl EngineScript {
    pub fn feed(&self, line: &str) {
        self.tx.send(line.to_string()).expect("transport receiver gone");
    }

    /// Everything the session wrote to the engine, in order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Answer the initialization handshake.
    pub fn complete_handshake(&self) {
        self.feed("id name fakefish");
        self.feed("uciok");
        self.feed("readyok");
    }
}

impl EngineTransport for FakeEngine {
    fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(line.to_string());
        Ok(())
    }

    fn lines(&self) -> Receiver<String> {
        self.rx.clone()
    }
}

pub fn fake_engine() -> (FakeEngine, EngineScript) {
    let (tx, rx) = unbounded();
    let sent = Arc::new(Mutex::new(Vec::new()));
    (FakeEngine { sent: sent.clone(), rx }, EngineScript { sent, tx })
}

/// Rules oracle with scripted legality: each expected move carries the
/// position it leads to.
pub struct ScriptedRules {
    pub fen: String,
    pub outcome: Option<GameOutcome>,
    pub applied: Vec<(String, String)>,
    tape: VecDeque<(bool, String)>,
}

impl ScriptedRules {
    pub fn at(fen: &str) -> Self {
        Self {
            fen: fen.to_string(),
            outcome: None,
            applied: Vec::new(),
            tape: VecDeque::new(),
        }
    }

    pub fn expect_move(&mut self, legal: bool, next_fen: &str) {
        self.tape.push_back((legal, next_fen.to_string()));
    }
}

impl Rules for ScriptedRules {
    fn try_move(&mut self, from: &str, to: &str, _promotion: Option<char>) -> bool {
        self.applied.push((from.to_string(), to.to_string()));
        match self.tape.pop_front() {
            Some((true, next)) => {
                self.fen = next;
                true
            }
            _ => false,
        }
    }

    fn fen(&self) -> String {
        self.fen.clone()
    }

    fn side_to_move(&self) -> Color {
        Color::from_fen(&self.fen)
    }

    fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }
}
