//! Engine session: handshake, search sequencing and event delivery
//!
//! The session owns the one live transport to the external engine and runs
//! a small state machine over it. Searches are correlated through tickets:
//! every `evaluate_position` enqueues a ticket, every terminal `bestmove`
//! event closes the oldest outstanding one. Callers that superseded a search
//! discard its late result by comparing the concluded ticket's position with
//! their current one, so the session never has to guess which results are
//! still wanted.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use patzer_uci::{parse_engine_line, EngineEvent, GoParams, GuiCommand, MAX_SEARCH_DEPTH, READY_ACK};

use crate::transport::{EngineTransport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session is terminated")]
    Terminated,
    #[error("cannot search while {state:?}")]
    NotReady { state: SessionState },
    #[error("search request carries neither depth nor movetime")]
    NoSearchLimit,
    #[error("engine transport failed: {0}")]
    Transport(#[from] TransportError),
    #[error("engine output channel closed")]
    TransportClosed,
    #[error("engine not ready after {0:?}")]
    ReadyTimeout(Duration),
}

/// Session lifecycle. Construction performs the handshake sends, so there is
/// no observable state before `Initializing`. `Terminated` is reachable from
/// every state and final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handshake sent, waiting for the readiness acknowledgement
    Initializing,
    /// Idle, accepting search requests
    Ready,
    /// At least one search outstanding
    Searching,
    /// Quit sent or transport dead; no further commands accepted
    Terminated,
}

/// Correlation token for one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub id: u64,
    /// Position the search was started for, as handed to `evaluate_position`.
    pub fen: String,
}

/// One pumped engine line together with its session-level interpretation.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub event: EngineEvent,
    /// Ticket closed by this event, when it is a terminal bestmove line.
    pub concluded: Option<SearchTicket>,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Number of ranked lines requested from the engine once it is ready.
    pub multipv: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { multipv: 5 }
    }
}

pub struct EngineSession<T: EngineTransport> {
    transport: T,
    lines_rx: Receiver<String>,
    state: SessionState,
    config: SessionConfig,
    next_ticket_id: u64,
    outstanding: VecDeque<SearchTicket>,
    subscribers: Vec<Sender<EngineEvent>>,
}

impl<T: EngineTransport> EngineSession<T> {
    /// Take ownership of the transport and start the handshake: the protocol
    /// command and the readiness probe go out immediately, the answer is
    /// observed later while pumping.
    pub fn new(transport: T, config: SessionConfig) -> Result<Self, SessionError> {
        let lines_rx = transport.lines();
        let mut session = Self {
            transport,
            lines_rx,
            state: SessionState::Initializing,
            config,
            next_ticket_id: 0,
            outstanding: VecDeque::new(),
            subscribers: Vec::new(),
        };
        session.send(&GuiCommand::Uci)?;
        session.send(&GuiCommand::IsReady)?;
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Register a subscriber. Every event parsed from now on is delivered in
    /// arrival order; there is no replay for late subscribers.
    pub fn subscribe(&mut self) -> Receiver<EngineEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Start a search for `fen`. Depth is clamped to [`MAX_SEARCH_DEPTH`],
    /// movetime passes through unmodified; at least one limit is required.
    ///
    /// Calling while a search is outstanding supersedes it: the engine is
    /// re-targeted and the old search's terminal event, when it arrives,
    /// still pops its own ticket.
    pub fn evaluate_position(
        &mut self,
        fen: &str,
        limits: GoParams,
    ) -> Result<SearchTicket, SessionError> {
        match self.state {
            SessionState::Ready | SessionState::Searching => {}
            SessionState::Terminated => return Err(SessionError::Terminated),
            state => return Err(SessionError::NotReady { state }),
        }
        let limits = GoParams {
            depth: limits.depth.map(|d| d.min(MAX_SEARCH_DEPTH)),
            movetime_ms: limits.movetime_ms,
        };
        if limits.depth.is_none() && limits.movetime_ms.is_none() {
            return Err(SessionError::NoSearchLimit);
        }

        self.send(&GuiCommand::Position { fen: fen.to_string() })?;
        self.send(&GuiCommand::Go(limits))?;

        self.next_ticket_id += 1;
        let ticket = SearchTicket {
            id: self.next_ticket_id,
            fen: fen.to_string(),
        };
        self.outstanding.push_back(ticket.clone());
        self.state = SessionState::Searching;
        Ok(ticket)
    }

    /// Ask the engine to cut the current search short. The terminal bestmove
    /// for whatever depth it reached still arrives and is processed
    /// normally. Without a search in flight this is a logged no-op.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Terminated => Err(SessionError::Terminated),
            SessionState::Searching => self.send(&GuiCommand::Stop),
            _ => {
                log::debug!("stop requested with no search in flight");
                Ok(())
            }
        }
    }

    /// Send the shutdown command and refuse all further commands. Safe to
    /// call twice; the transport itself is released on drop.
    pub fn quit(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Terminated {
            return Ok(());
        }
        let result = self.send(&GuiCommand::Quit);
        self.state = SessionState::Terminated;
        self.outstanding.clear();
        result
    }

    /// Drain every line currently available without blocking.
    pub fn pump(&mut self) -> Result<Vec<SessionEvent>, SessionError> {
        if self.state == SessionState::Terminated {
            return Err(SessionError::Terminated);
        }
        let mut out = Vec::new();
        loop {
            match self.lines_rx.try_recv() {
                Ok(line) => out.push(self.process_line(line)?),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if out.is_empty() {
                        self.state = SessionState::Terminated;
                        return Err(SessionError::TransportClosed);
                    }
                    // Deliver what was buffered; the next pump reports the
                    // dead transport.
                    break;
                }
            }
        }
        Ok(out)
    }

    /// Block up to `timeout` for the first line, then drain the rest. An
    /// empty result means the timeout passed quietly.
    pub fn pump_wait(&mut self, timeout: Duration) -> Result<Vec<SessionEvent>, SessionError> {
        if self.state == SessionState::Terminated {
            return Err(SessionError::Terminated);
        }
        match self.lines_rx.recv_timeout(timeout) {
            Ok(line) => {
                let first = self.process_line(line)?;
                let mut out = vec![first];
                out.extend(self.pump()?);
                Ok(out)
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => Ok(Vec::new()),
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                self.state = SessionState::Terminated;
                Err(SessionError::TransportClosed)
            }
        }
    }

    /// Pump until the handshake completes, giving the engine `timeout`
    /// overall.
    pub fn wait_ready(&mut self, timeout: Duration) -> Result<(), SessionError> {
        let start = Instant::now();
        while self.state == SessionState::Initializing {
            if start.elapsed() >= timeout {
                return Err(SessionError::ReadyTimeout(timeout));
            }
            self.pump_wait(Duration::from_millis(100))?;
        }
        Ok(())
    }

    fn send(&mut self, cmd: &GuiCommand) -> Result<(), SessionError> {
        log::debug!("engine <- {cmd}");
        if let Err(e) = self.transport.send_line(&cmd.to_string()) {
            // Transport failure is fatal; the host reconstructs the session.
            self.state = SessionState::Terminated;
            return Err(SessionError::Transport(e));
        }
        Ok(())
    }

    fn process_line(&mut self, line: String) -> Result<SessionEvent, SessionError> {
        log::debug!("engine -> {line}");
        let event = parse_engine_line(&line);

        // The acknowledgement is an exact unadorned line, which is why even
        // unrecognized input must flow through as an event instead of being
        // dropped.
        if self.state == SessionState::Initializing && event.raw == READY_ACK {
            let option = GuiCommand::SetOption {
                name: "MultiPV".to_string(),
                value: self.config.multipv.to_string(),
            };
            self.send(&option)?;
            self.state = SessionState::Ready;
        }

        let concluded = if event.is_terminal() {
            let ticket = self.outstanding.pop_front();
            if ticket.is_none() {
                log::warn!("terminal event without outstanding search: {line}");
            }
            if self.outstanding.is_empty() && self.state == SessionState::Searching {
                self.state = SessionState::Ready;
            }
            ticket
        } else {
            None
        };

        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        Ok(SessionEvent { event, concluded })
    }
}
