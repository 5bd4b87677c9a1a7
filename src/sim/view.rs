//! Immutable snapshot for renderers
//!
//! Built fresh each frame; renderers diff it however they like.

use serde::Serialize;

use super::Color;
use super::puzzle::{GuessAttempt, Puzzle};
use super::state::{Powerups, Screen, Session};
use crate::Millis;
use crate::tuning::PaletteColor;

/// One code as shown on the board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PuzzleView {
    pub id: u32,
    pub progress: f64,
    pub guesses: Vec<GuessAttempt>,
    pub max_guesses: usize,
    pub guesses_left: usize,
    pub code_length: usize,
    pub cracking: bool,
    /// Only shown once cracked
    pub secret: Option<Vec<Color>>,
}

impl From<&Puzzle> for PuzzleView {
    fn from(puzzle: &Puzzle) -> Self {
        Self {
            id: puzzle.id,
            progress: puzzle.progress,
            guesses: puzzle.guesses.clone(),
            max_guesses: puzzle.max_guesses,
            guesses_left: puzzle.guesses_left(),
            code_length: puzzle.code_length(),
            cracking: puzzle.is_cracking(),
            secret: puzzle.is_cracking().then(|| puzzle.secret.clone()),
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub screen: Screen,
    pub score: u64,
    pub level: u32,
    pub combo: usize,
    pub combo_multiplier: f64,
    pub frozen: bool,
    pub freeze_remaining_ms: Millis,
    pub powerups: Powerups,
    pub puzzles: Vec<PuzzleView>,
    pub selected_index: usize,
    /// Draft slots padded to the active code length
    pub draft: Vec<Option<Color>>,
    /// Colors the player can pick from right now
    pub palette: Vec<PaletteColor>,
    pub urgent: bool,
}

impl Session {
    /// Snapshot the session at `now`
    pub fn view(&self, now: Millis) -> SessionView {
        let code_length = self.active_code_length();
        let mut draft = self.draft.slots().to_vec();
        if draft.len() < code_length {
            draft.resize(code_length, None);
        }
        let num_colors = self.active_num_colors() as usize;

        SessionView {
            screen: self.screen,
            score: self.score,
            level: self.level,
            combo: self.combo,
            combo_multiplier: self.tuning.combo_multiplier(self.combo),
            frozen: self.frozen,
            freeze_remaining_ms: if self.frozen {
                self.freeze_end_time.saturating_sub(now)
            } else {
                0
            },
            powerups: self.powerups,
            puzzles: self.puzzles.iter().map(PuzzleView::from).collect(),
            selected_index: self.selected_index,
            draft,
            palette: self.tuning.palette.iter().take(num_colors).cloned().collect(),
            urgent: self.urgent,
        }
    }
}
