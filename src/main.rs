//! Code Cascade headless runner
//!
//! Plays a seeded session with a simple solver and records the result.

use std::path::PathBuf;

use clap::Parser;

use code_cascade::consts::FRAME_MS;
use code_cascade::sim::{Color, Cue, GuessOutcome, PowerupKind, Puzzle, Screen, Session, evaluate};
use code_cascade::{HighScoreEntry, HighScores, Millis, ScoreStore, Tuning};

#[derive(Parser, Debug)]
#[command(version, about = "Run a headless Code Cascade game")]
struct Args {
    /// RNG seed for the run
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Balance overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Leaderboard file to update
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Simulated frame length
    #[arg(long, default_value_t = FRAME_MS)]
    frame_ms: Millis,

    /// Solver thinking time per guess
    #[arg(long, default_value_t = 2_500)]
    think_ms: Millis,

    /// Stop after this much simulated time
    #[arg(long, default_value_t = 30)]
    max_minutes: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let mut scores = match &args.scores {
        Some(path) => HighScores::load(path)?,
        None => HighScores::new(),
    };

    log::info!("Code Cascade (headless) starting, seed {}", args.seed);
    let mut session = Session::new(tuning, args.seed);
    let mut now: Millis = 0;
    let deadline = args.max_minutes * 60_000;
    let mut next_move = args.think_ms;

    session.start_game(now);
    while now < deadline && session.screen != Screen::GameOver {
        now += args.frame_ms.max(1);
        session.update(now);

        if session.screen == Screen::Game && now >= next_move {
            play_move(&mut session, now);
            next_move = now + args.think_ms;
        }

        for cue in session.drain_cues() {
            match cue {
                Cue::LevelUp => log::info!("[{now} ms] level {}", session.level),
                Cue::Explosion => log::warn!("[{now} ms] a code reached the bottom"),
                _ => log::trace!("[{now} ms] cue {}", cue.as_str()),
            }
        }
    }

    let Some(result) = session.final_result else {
        println!("Stopped after {} minutes, score {}", args.max_minutes, session.score);
        return Ok(());
    };

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let new_best = scores.is_new_best(result.score);
    let rank = scores.record_score(HighScoreEntry::from_result(&result, date));
    if let Some(path) = &args.scores {
        scores.save(path)?;
    }

    println!(
        "Game over after {:.1}s: score {}, level {}, {} codes cracked{}",
        now as f64 / 1000.0,
        result.score,
        result.level,
        result.puzzles_cleared,
        if new_best { " (new best!)" } else { "" }
    );
    if let Some(rank) = rank {
        println!("Leaderboard rank #{rank}");
    }
    for (i, entry) in scores.top_scores(10).iter().enumerate() {
        println!("#{:<2} {:>8}  LV{:<3} {}", i + 1, entry.score, entry.level, entry.date);
    }
    Ok(())
}

/// One solver step: optionally freeze, then guess the selected code
fn play_move(session: &mut Session, now: Millis) {
    if session.urgent && !session.frozen && session.powerups.freeze > 0 {
        if let Err(e) = session.use_powerup(PowerupKind::Freeze, now) {
            log::debug!("freeze rejected: {e}");
        }
    }

    let Some(puzzle) = session.selected().filter(|p| !p.is_cracking()) else {
        return;
    };
    // Nuke a code on its last guess
    if puzzle.guesses_left() == 1 && session.powerups.nuke > 0 {
        if let Err(e) = session.use_powerup(PowerupKind::Nuke, now) {
            log::debug!("nuke rejected: {e}");
        }
        return;
    }
    let Some(guess) = consistent_guess(puzzle) else {
        return;
    };

    if let Err(e) = session.clear_draft() {
        log::debug!("clear rejected: {e}");
        return;
    }
    for color in guess {
        if let Err(e) = session.add_color_to_draft(color) {
            log::debug!("peg rejected: {e}");
            return;
        }
    }
    match session.submit_guess(now) {
        Ok(GuessOutcome::Cracked(score)) => {
            log::info!("[{now} ms] cracked for {} points", score.points)
        }
        Ok(GuessOutcome::Exploded(_)) => log::info!("[{now} ms] code exploded"),
        Ok(GuessOutcome::Live(_)) => {}
        Err(e) => log::debug!("guess rejected: {e}"),
    }
}

/// First code that agrees with every guess made so far
fn consistent_guess(puzzle: &Puzzle) -> Option<Vec<Color>> {
    let len = puzzle.code_length();
    let base = puzzle.num_colors as usize;
    let total = base.checked_pow(len as u32)?;
    (0..total)
        .map(|mut n| {
            let mut code = vec![0; len];
            for slot in code.iter_mut().rev() {
                *slot = (n % base) as Color;
                n /= base;
            }
            code
        })
        .find(|candidate| {
            puzzle
                .guesses
                .iter()
                .all(|g| evaluate(candidate, &g.guess) == g.feedback)
        })
}
