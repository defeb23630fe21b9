use std::io::{self, BufRead, Write};
use std::time::Instant;

use jokenpo_ai::config::Config;
use jokenpo_ai::logging::init_tracing;
use jokenpo_ai::opponent::{
    GameSession, MatchVerdict, Move, Outcome, RoundReport, TelemetrySnapshot,
};
use jokenpo_ai::store::{FileStore, KeyValueStore, MemoryStore};

fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    let store: Box<dyn KeyValueStore> = match FileStore::open(&config.data_dir) {
        Ok(store) => {
            tracing::info!(dir = %store.root().display(), "player data directory");
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!(
                dir = %config.data_dir.display(),
                error = %e,
                "data directory unavailable, progress will not be saved"
            );
            Box::new(MemoryStore::new())
        }
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut out = io::stdout();

    let player = match config.player.clone() {
        Some(player) => player,
        None => loop {
            write!(out, "player name: ")?;
            out.flush()?;
            match lines.next() {
                Some(line) => {
                    let name = line?.trim().to_string();
                    if !name.is_empty() {
                        break name;
                    }
                }
                None => return Ok(()),
            }
        },
    };

    let mut session = GameSession::start(&player, store, config.engine.clone());
    writeln!(
        out,
        "hi {}, best of {} rounds. moves: rock|paper|scissors (r/p/s), `reset`, `quit`",
        session.player(),
        session.match_state().rounds_per_match
    )?;

    loop {
        let state = session.match_state();
        if state.is_complete() {
            write!(out, "match over. `reset` or `quit`> ")?;
        } else {
            write!(out, "round {}/{}> ", state.rounds_played + 1, state.rounds_per_match)?;
        }
        out.flush()?;

        let started = Instant::now();
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        let input = line.trim().to_lowercase();

        match input.as_str() {
            "" => continue,
            "quit" | "q" | "exit" => break,
            "reset" => {
                session.restart_match();
                writeln!(out, "new match started")?;
                continue;
            }
            _ => {}
        }

        let player_move: Move = match input.parse() {
            Ok(m) => m,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        match session.play_round(player_move, TelemetrySnapshot::latency_only(latency_ms)) {
            Ok(report) => print_report(&mut out, &report)?,
            Err(e) => writeln!(out, "{e}")?,
        }
    }

    let totals = session.totals();
    writeln!(
        out,
        "lifetime: {} wins, {} losses, {} draws over {} sessions",
        totals.wins, totals.losses, totals.draws, totals.sessions
    )?;
    Ok(())
}

fn print_report(out: &mut impl Write, report: &RoundReport) -> io::Result<()> {
    let result = match report.outcome {
        Outcome::Win => "you win",
        Outcome::Lose => "you lose",
        Outcome::Draw => "draw",
    };
    let m = &report.match_state;
    writeln!(
        out,
        "you: {}  ai: {}  -> {}   [{}-{}-{}, tier {}]",
        report.player_move, report.ai_move, result, m.wins, m.losses, m.draws, report.tier
    )?;
    if let Some(verdict) = report.verdict {
        let text = match verdict {
            MatchVerdict::PlayerWon => "you won the match",
            MatchVerdict::OpponentWon => "the opponent won the match",
        };
        writeln!(out, "{text} ({}-{}-{})", m.wins, m.losses, m.draws)?;
    }
    Ok(())
}
