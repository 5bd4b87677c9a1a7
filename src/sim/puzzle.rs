//! A single descending secret code

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Color;
use super::oracle::{Feedback, evaluate};
use crate::Millis;
use crate::tuning::LevelConfig;

/// One submitted guess with its feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessAttempt {
    pub guess: Vec<Color>,
    pub feedback: Feedback,
}

/// A secret code falling toward the bottom of the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: u32,
    pub secret: Vec<Color>,
    /// Colors in play when this code spawned
    pub num_colors: u8,
    pub guesses: Vec<GuessAttempt>,
    pub max_guesses: usize,
    /// Descent start (shifted forward by freezes)
    pub start_time: Millis,
    pub descent_ms: Millis,
    /// Cached descent fraction in [0, 1]
    pub progress: f64,
    /// Set when cracked; the code leaves the board shortly after
    #[serde(default)]
    pub cracking_since: Option<Millis>,
}

impl Puzzle {
    /// Roll a fresh secret for the given level
    pub fn spawn<R: Rng>(id: u32, config: &LevelConfig, now: Millis, rng: &mut R) -> Self {
        let secret = (0..config.code_length)
            .map(|_| rng.random_range(0..config.num_colors))
            .collect();
        Self::with_secret(id, secret, config, now)
    }

    /// Build a puzzle around a known secret
    pub fn with_secret(id: u32, secret: Vec<Color>, config: &LevelConfig, now: Millis) -> Self {
        Self {
            id,
            secret,
            num_colors: config.num_colors,
            guesses: Vec::new(),
            max_guesses: config.max_guesses,
            start_time: now,
            descent_ms: config.descent_ms,
            progress: 0.0,
            cracking_since: None,
        }
    }

    pub fn code_length(&self) -> usize {
        self.secret.len()
    }

    pub fn guesses_left(&self) -> usize {
        self.max_guesses.saturating_sub(self.guesses.len())
    }

    pub fn is_cracking(&self) -> bool {
        self.cracking_since.is_some()
    }

    /// Recompute and cache progress at `now`
    pub fn advance_descent(&mut self, now: Millis) -> f64 {
        let elapsed = now.saturating_sub(self.start_time) as f64;
        self.progress = (elapsed / self.descent_ms.max(1) as f64).min(1.0);
        self.progress
    }

    /// Push the descent start forward by the part of a pause this puzzle lived through
    pub fn exclude_pause(&mut self, paused_from: Millis, paused_until: Millis) {
        let overlap_start = paused_from.max(self.start_time);
        if paused_until > overlap_start {
            self.start_time += paused_until - overlap_start;
        }
    }

    /// Score a full guess and append it to the history
    pub fn record_guess(&mut self, guess: Vec<Color>) -> Feedback {
        let feedback = evaluate(&self.secret, &guess);
        self.guesses.push(GuessAttempt { guess, feedback });
        feedback
    }

    pub fn out_of_guesses(&self) -> bool {
        self.guesses.len() >= self.max_guesses
    }
}
