//! Session lifecycle against a scripted engine

mod common;

use std::time::Duration;

use common::{fake_engine, START_FEN};
use patzer_core::session::{EngineSession, SessionConfig, SessionError, SessionState};
use patzer_uci::GoParams;

#[test]
fn test_handshake_completes_and_sets_multipv() {
    let (transport, script) = fake_engine();
    let mut session = EngineSession::new(transport, SessionConfig::default()).unwrap();
    assert_eq!(session.state(), SessionState::Initializing);

    script.complete_handshake();
    session.wait_ready(Duration::from_secs(1)).unwrap();
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(
        script.sent(),
        vec![
            "uci".to_string(),
            "isready".to_string(),
            "setoption name MultiPV value 5".to_string(),
        ]
    );
}

#[test]
fn test_wait_ready_times_out_without_ack() {
    let (transport, _script) = fake_engine();
    let mut session = EngineSession::new(transport, SessionConfig::default()).unwrap();
    let err = session.wait_ready(Duration::from_millis(50)).unwrap_err();
    assert!(matches!(err, SessionError::ReadyTimeout(_)));
}

#[test]
fn test_search_concludes_its_own_ticket() {
    let (transport, script) = fake_engine();
    let mut session = EngineSession::new(transport, SessionConfig::default()).unwrap();
    script.complete_handshake();
    session.wait_ready(Duration::from_secs(1)).unwrap();

    let ticket = session
        .evaluate_position(START_FEN, GoParams { depth: Some(10), movetime_ms: None })
        .unwrap();
    assert_eq!(session.state(), SessionState::Searching);

    script.feed("info depth 3 multipv 1 score cp 12 pv e2e4");
    script.feed("bestmove e2e4");
    let events = session.pump().unwrap();
    let concluded: Vec<_> = events.iter().filter_map(|e| e.concluded.clone()).collect();
    assert_eq!(concluded, vec![ticket]);
    assert_eq!(session.state(), SessionState::Ready);
}

#[test]
fn test_subscribers_see_events_in_arrival_order() {
    let (transport, script) = fake_engine();
    let mut session = EngineSession::new(transport, SessionConfig::default()).unwrap();
    script.complete_handshake();
    session.wait_ready(Duration::from_secs(1)).unwrap();

    let rx = session.subscribe();
    script.feed("info depth 1 score cp 5");
    script.feed("info depth 2 score cp 8");
    script.feed("bestmove e2e4");
    session.pump().unwrap();

    let depths: Vec<u32> = rx.try_iter().map(|ev| ev.depth).collect();
    assert_eq!(depths, vec![1, 2, 0]);
}
