//! Test helper functions for patzer-core tests

#[cfg(test)]
pub mod test_utils {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use crossbeam_channel::{unbounded, Receiver, Sender};

    use crate::rules::{Color, GameOutcome, Rules};
    use crate::transport::{EngineTransport, TransportError};

    pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// In-memory transport driven by the test instead of a child process.
    pub struct ScriptedTransport {
        sent: Arc<Mutex<Vec<String>>>,
        rx: Receiver<String>,
    }

    /// Test-side handle: feeds engine lines and inspects sent commands.
    pub struct ScriptHandle {
        sent: Arc<Mutex<Vec<String>>>,
        tx: Sender<String>,
    }

    impl ScriptHandle {
        pub fn feed(&self, line: &str) {
            self.tx.send(line.to_string()).unwrap();
        }

        pub fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl EngineTransport for ScriptedTransport {
        fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push(line.to_string());
            Ok(())
        }

        fn lines(&self) -> Receiver<String> {
            self.rx.clone()
        }
    }

    /// Paired transport and handle for driving a session from a test.
    pub fn scripted() -> (ScriptedTransport, ScriptHandle) {
        let (tx, rx) = unbounded();
        let sent = Arc::new(Mutex::new(Vec::new()));
        (ScriptedTransport { sent: sent.clone(), rx }, ScriptHandle { sent, tx })
    }

    /// Minimal rules oracle for driver tests. Legality is scripted per call:
    /// a legal move replaces the position with the queued follow-up FEN.
    pub struct FakeRules {
        pub fen: String,
        pub outcome: Option<GameOutcome>,
        pub moves: Vec<(String, String, Option<char>)>,
        tape: VecDeque<(bool, String)>,
    }

    impl FakeRules {
        pub fn at(fen: &str) -> Self {
            Self {
                fen: fen.to_string(),
                outcome: None,
                moves: Vec::new(),
                tape: VecDeque::new(),
            }
        }

        /// Queue the result of the next `try_move`: whether it is legal and
        /// the position it leads to.
        pub fn expect_move(&mut self, legal: bool, next_fen: &str) {
            self.tape.push_back((legal, next_fen.to_string()));
        }
    }

    impl Rules for FakeRules {
        fn try_move(&mut self, from: &str, to: &str, promotion: Option<char>) -> bool {
            self.moves.push((from.to_string(), to.to_string(), promotion));
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
}
