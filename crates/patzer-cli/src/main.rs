use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use patzer_core::candidates::CandidateBoard;
use patzer_core::selector::{select_move, MoveChoice};
use patzer_core::session::{EngineSession, SessionConfig};
use patzer_core::skill::SkillProfile;
use patzer_core::transport::ChildTransport;
use patzer_uci::{EngineEvent, GoParams, Score};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const READY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(
    name = "patzer",
    about = "Skill-profiled move selection against a UCI engine"
)]
struct Args {
    /// Path to the UCI engine executable
    #[arg(long)]
    engine: PathBuf,

    /// Position to analyze, as FEN
    #[arg(long, default_value = START_FEN)]
    fen: String,

    /// Search depth (clamped to the protocol maximum of 24)
    #[arg(long, default_value_t = 10)]
    depth: u32,

    /// Wall-clock limit per search in milliseconds
    #[arg(long)]
    movetime: Option<u64>,

    /// Skill dial: 0 plays near-perfectly, 100 blunders frequently
    #[arg(long, default_value_t = 50)]
    skill: u8,

    /// Seed for the selection RNG; omitted = OS entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    fen: String,
    depth: u32,
    skill: u8,
    profile: SkillProfile,
    seed: u64,
    evaluation: Option<Score>,
    evaluation_depth: u32,
    candidates: Vec<CandidateReport>,
    engine_bestmove: String,
    choice: MoveChoice,
}

#[derive(Debug, Serialize)]
struct CandidateReport {
    rank: u32,
    mv: String,
    cp: i32,
    loss: i32,
}

fn main() {
    let args = Args::parse();

    use std::io::Write;
    let log_level = if args.debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    );
    builder
        .format(|buf, record| {
            writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
        })
        .write_style(env_logger::WriteStyle::Never);
    builder.init();

    if let Err(e) = run(args) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let profile = SkillProfile::for_dial(args.skill);

    let transport = ChildTransport::spawn(&args.engine)
        .with_context(|| format!("failed to start engine {}", args.engine.display()))?;
    let mut session = EngineSession::new(transport, SessionConfig::default())?;
    session
        .wait_ready(READY_TIMEOUT)
        .context("engine never acknowledged readiness")?;

    let limits = GoParams { depth: Some(args.depth), movetime_ms: args.movetime };
    let ticket = session.evaluate_position(&args.fen, limits)?;

    // Aggregate ranked lines until the search's own terminal event arrives.
    let mut board = CandidateBoard::new();
    let mut evaluation: Option<Score> = None;
    let mut evaluation_depth = 0;
    let mut terminal: Option<EngineEvent> = None;
    let deadline = Instant::now() + search_budget(args.movetime);
    while terminal.is_none() {
        if Instant::now() >= deadline {
            bail!("engine did not finish the search in time");
        }
        for delivered in session.pump_wait(Duration::from_millis(200))? {
            if delivered.event.multipv_rank > 0 {
                board.record(&delivered.event);
            }
            if delivered.event.multipv_rank <= 1 {
                if let Some(score) = delivered.event.score {
                    evaluation = Some(score);
                    evaluation_depth = delivered.event.depth;
                }
            }
            if delivered.concluded.as_ref() == Some(&ticket) {
                terminal = Some(delivered.event);
            }
        }
    }

    let engine_bestmove = terminal
        .and_then(|ev| ev.best_move)
        .unwrap_or_else(|| "(none)".to_string());
    let choice = select_move(&engine_bestmove, &board, args.skill, &mut rng);

    let top = board.ranked().first().map(|c| c.cp).unwrap_or(0);
    let candidates: Vec<CandidateReport> = board
        .ranked()
        .into_iter()
        .map(|c| CandidateReport { rank: c.rank, mv: c.mv, cp: c.cp, loss: top - c.cp })
        .collect();

    session.quit()?;

    let report = Report {
        fen: args.fen,
        depth: args.depth,
        skill: args.skill,
        profile,
        seed,
        evaluation,
        evaluation_depth,
        candidates,
        engine_bestmove,
        choice,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Overall wait limit: the engine's own movetime plus margin, or a generous
/// default for depth-limited searches.
fn search_budget(movetime: Option<u64>) -> Duration {
    match movetime {
        Some(ms) => Duration::from_millis(ms) + Duration::from_secs(10),
        None => Duration::from_secs(120),
    }
}

fn print_report(report: &Report) {
    println!("Position: {}", report.fen);
    println!(
        "Profile: {} ({}), dial {}",
        report.profile,
        report.profile.description(),
        report.skill
    );
    println!("Seed: {}", report.seed);
    if let Some(score) = report.evaluation {
        println!("Eval: {} (depth {})", score, report.evaluation_depth);
    }

    println!();
    println!("=== Candidates ===");
    for c in &report.candidates {
        println!("#{}: {} score={} loss={}", c.rank, c.mv, fmt_cp(c.cp), c.loss);
    }

    println!();
    println!("Engine bestmove: {}", report.engine_bestmove);
    println!(
        "Played: {} ({}, loss {})",
        report.choice.mv, report.choice.tier, report.choice.loss
    );
}

fn fmt_cp(v: i32) -> String {
    if v >= 0 {
        format!("+{v}")
    } else {
        v.to_string()
    }
}
