//! Bulls and cows feedback
//!
//! Pure comparison of a secret against a full guess.

use serde::{Deserialize, Serialize};

use super::Color;

/// Feedback for one guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Feedback {
    /// Right color, right position
    pub bulls: usize,
    /// Right color, wrong position (each secret peg matched at most once)
    pub cows: usize,
}

impl Feedback {
    /// True when every peg is a bull
    pub fn is_solved(&self, code_length: usize) -> bool {
        self.bulls == code_length
    }
}

/// Compare `guess` against `secret`.
///
/// Both slices must be the same length. Exact matches are consumed first, then
/// each remaining guess peg takes the first unused secret peg of the same color.
pub fn evaluate(secret: &[Color], guess: &[Color]) -> Feedback {
    debug_assert_eq!(secret.len(), guess.len());
    let len = secret.len().min(guess.len());
    let mut secret_used = vec![false; len];
    let mut guess_used = vec![false; len];
    let mut feedback = Feedback::default();

    // Pass 1: bulls
    for i in 0..len {
        if guess[i] == secret[i] {
            feedback.bulls += 1;
            secret_used[i] = true;
            guess_used[i] = true;
        }
    }

    // Pass 2: cows
    for i in 0..len {
        if guess_used[i] {
            continue;
        }
        if let Some(j) = (0..len).find(|&j| !secret_used[j] && secret[j] == guess[i]) {
            secret_used[j] = true;
            feedback.cows += 1;
        }
    }

    feedback
}
