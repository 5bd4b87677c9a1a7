//! Frame clock
//!
//! Advances descent, detects the loss, spawns new codes and flushes deferred work.
//! The host calls `update` once per frame with the current wall-clock time.

use super::events::Cue;
use super::schedule::Deferred;
use super::state::{FinalResult, Screen, Session};
use crate::Millis;

impl Session {
    /// Per-frame entry point: run due deferred actions, then tick if in play
    pub fn update(&mut self, now: Millis) {
        flush_deferred(self, now);
        tick(self, now);
    }
}

/// Apply deferred actions that have come due, skipping ones from an older run
pub fn flush_deferred(state: &mut Session, now: Millis) {
    for scheduled in state.schedule.take_due(now) {
        if scheduled.generation != state.generation {
            log::debug!(
                "Dropping stale {:?} from run {} (current {})",
                scheduled.action,
                scheduled.generation,
                state.generation
            );
            continue;
        }
        match scheduled.action {
            Deferred::RemoveCracked { puzzle_id } => {
                let cracking = state
                    .puzzles
                    .iter()
                    .any(|p| p.id == puzzle_id && p.is_cracking());
                if cracking {
                    state.retire(puzzle_id);
                }
            }
            Deferred::FinishExplosion => {
                if state.screen == Screen::Explosion {
                    state.screen = Screen::GameOver;
                    state.final_result = Some(FinalResult {
                        score: state.score,
                        level: state.level,
                        puzzles_cleared: state.puzzles_cleared,
                    });
                    log::info!(
                        "Game over: score {} at level {} ({} codes cracked)",
                        state.score,
                        state.level,
                        state.puzzles_cleared
                    );
                    state.cue(Cue::GameOver);
                }
            }
        }
    }
}

/// Advance the game clock by one frame
pub fn tick(state: &mut Session, now: Millis) {
    if state.screen != Screen::Game {
        return;
    }

    if state.frozen && now >= state.freeze_end_time {
        unfreeze(state);
    }

    if state.frozen {
        return;
    }

    // Update every playable code first, then check in board order
    for puzzle in state.puzzles.iter_mut().filter(|p| !p.is_cracking()) {
        puzzle.advance_descent(now);
    }
    let lost = state
        .live_puzzles()
        .find(|p| p.progress >= 1.0)
        .map(|p| p.id);
    if let Some(id) = lost {
        lose(state, id, now);
        return;
    }

    // Follow the code closest to the bottom
    match state.most_urgent() {
        Some((index, progress)) => {
            if index != state.selected_index {
                state.select(index);
            }
            state.set_urgent(progress > state.tuning.urgent_threshold);
        }
        None => state.set_urgent(false),
    }

    let interval = state.level_config().spawn_interval_ms;
    if now.saturating_sub(state.last_spawn_time) > interval
        && state.puzzles.len() < state.tuning.max_codes
    {
        state.spawn_puzzle(now);
        state.last_spawn_time = now;
    }
}

/// End a freeze, removing the frozen span from every timer
pub(crate) fn unfreeze(state: &mut Session) {
    let (from, until) = (state.frozen_since, state.freeze_end_time);
    for puzzle in &mut state.puzzles {
        puzzle.exclude_pause(from, until);
    }
    let spawn_overlap = from.max(state.last_spawn_time);
    if until > spawn_overlap {
        state.last_spawn_time += until - spawn_overlap;
    }
    state.frozen = false;
    log::info!("Freeze ended after {} ms", until.saturating_sub(from));
}

/// A code reached the bottom
fn lose(state: &mut Session, puzzle_id: u32, now: Millis) {
    log::info!("Code {} hit the bottom", puzzle_id);
    state.set_urgent(false);
    state.screen = Screen::Explosion;
    state.cue(Cue::Explosion);
    state.schedule.push(
        now + state.tuning.explosion_ms,
        state.generation,
        Deferred::FinishExplosion,
    );
}
